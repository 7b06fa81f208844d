use std::sync::Arc;

use crate::config::Config;
use crate::engine::ConfidenceWeights;
use crate::extraction::AdapterRegistry;
use crate::orchestration::{BenchmarkRunner, Orchestrator};

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything in here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<AdapterRegistry>,
    pub orchestrator: Arc<Orchestrator>,
    pub benchmark: Arc<BenchmarkRunner>,
}

impl AppState {
    pub fn new(config: Config, registry: Arc<AdapterRegistry>) -> Self {
        let weights = ConfidenceWeights::default();
        let orchestrator = Orchestrator::new(registry.clone())
            .with_accept_threshold(config.accept_confidence)
            .with_timeout(config.adapter_timeout)
            .with_weights(weights.clone());
        let benchmark = BenchmarkRunner::new(registry.clone(), config.adapter_timeout, weights);

        Self {
            config,
            registry,
            orchestrator: Arc::new(orchestrator),
            benchmark: Arc::new(benchmark),
        }
    }
}
