//! Benchmark mode: every applicable adapter on the same document, side by side.
//!
//! Adapters run concurrently on a `JoinSet`, each writing only its own slot, so the
//! report order is the priority order regardless of completion order. Dropping the
//! runner's future drops the `JoinSet`, which aborts whatever is still running.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use super::chain::{run_adapter, AdapterAttempt};
use super::orchestrator::OrchestrationError;
use crate::engine::ConfidenceWeights;
use crate::extraction::{AdapterRegistry, FailureKind};
use crate::models::{CandidateProfile, UploadedDocument};

/// Leading raw text shown per entry so adapters can be compared by eye.
const TEXT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkEntry {
    #[serde(flatten)]
    pub attempt: AdapterAttempt,
    /// 0.0 for failed attempts.
    pub confidence: f64,
    pub profile: Option<CandidateProfile>,
    pub text_preview: Option<String>,
}

impl From<AdapterAttempt> for BenchmarkEntry {
    fn from(attempt: AdapterAttempt) -> Self {
        Self {
            confidence: attempt.confidence().unwrap_or(0.0),
            profile: attempt.profile().cloned(),
            text_preview: attempt
                .raw_text()
                .map(|t| t.chars().take(TEXT_PREVIEW_CHARS).collect()),
            attempt,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub document_id: Uuid,
    pub filename: String,
    pub generated_at: DateTime<Utc>,
    /// Priority order, registration order on ties.
    pub entries: Vec<BenchmarkEntry>,
    pub best: Option<BenchmarkEntry>,
}

pub struct BenchmarkRunner {
    registry: Arc<AdapterRegistry>,
    timeout: Duration,
    weights: ConfidenceWeights,
}

impl BenchmarkRunner {
    pub fn new(registry: Arc<AdapterRegistry>, timeout: Duration, weights: ConfidenceWeights) -> Self {
        Self {
            registry,
            timeout,
            weights,
        }
    }

    pub async fn run(&self, doc: &UploadedDocument) -> Result<BenchmarkReport, OrchestrationError> {
        if doc.is_empty() {
            return Err(OrchestrationError::EmptyDocument);
        }
        let descriptors = self.registry.applicable(doc);
        if descriptors.is_empty() {
            return Err(OrchestrationError::UnsupportedType {
                filename: doc.filename.clone(),
                mime_type: doc.mime_type.clone(),
            });
        }

        let mut set = JoinSet::new();
        for (slot, descriptor) in descriptors.iter().cloned().enumerate() {
            let doc = doc.clone();
            let weights = self.weights.clone();
            let timeout = self.timeout;
            set.spawn(async move {
                let attempt = run_adapter(&descriptor, &doc, timeout, &weights).await;
                (slot, attempt)
            });
        }

        let mut slots: Vec<Option<AdapterAttempt>> = vec![None; descriptors.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((slot, attempt)) => slots[slot] = Some(attempt),
                Err(e) => warn!(filename = %doc.filename, error = %e, "benchmark task failed"),
            }
        }

        // A task that died without reporting still gets its row.
        let entries: Vec<BenchmarkEntry> = slots
            .into_iter()
            .zip(&descriptors)
            .map(|(attempt, descriptor)| {
                attempt.unwrap_or_else(|| {
                    AdapterAttempt::failed(
                        descriptor,
                        Duration::ZERO,
                        FailureKind::Internal,
                        "benchmark task did not complete",
                    )
                })
            })
            .map(BenchmarkEntry::from)
            .collect();

        let best = best_entry(&entries).cloned();
        info!(
            filename = %doc.filename,
            adapters = entries.len(),
            best = best.as_ref().map(|b| b.attempt.adapter).unwrap_or("none"),
            "benchmark complete"
        );

        Ok(BenchmarkReport {
            document_id: Uuid::new_v4(),
            filename: doc.filename.clone(),
            generated_at: Utc::now(),
            entries,
            best,
        })
    }
}

/// Highest confidence among successes. Entries are already in priority then
/// registration order, so the first maximum is the tie-break winner.
fn best_entry(entries: &[BenchmarkEntry]) -> Option<&BenchmarkEntry> {
    entries
        .iter()
        .filter(|e| e.profile.is_some())
        .fold(None, |best: Option<&BenchmarkEntry>, e| match best {
            Some(b) if b.confidence >= e.confidence => Some(b),
            _ => Some(e),
        })
}
