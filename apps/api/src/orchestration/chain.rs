//! Sequential fallback chain over an ordered set of adapters.

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::engine::{extract_profile, ConfidenceWeights};
use crate::extraction::{AdapterDescriptor, FailureKind};
use crate::models::{CandidateProfile, UploadedDocument};

/// Result of running one adapter plus field extraction on one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterAttempt {
    pub adapter: &'static str,
    pub priority: u8,
    #[serde(rename = "durationMs", serialize_with = "as_millis")]
    pub duration: Duration,
    pub outcome: ExtractionOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Succeeded {
        confidence: f64,
        #[serde(rename = "charCount")]
        char_count: usize,
        #[serde(skip)]
        text: String,
        #[serde(skip)]
        profile: Box<CandidateProfile>,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl AdapterAttempt {
    pub fn profile(&self) -> Option<&CandidateProfile> {
        match &self.outcome {
            ExtractionOutcome::Succeeded { profile, .. } => Some(&**profile),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    /// Raw adapter text; `None` for failures.
    pub fn raw_text(&self) -> Option<&str> {
        match &self.outcome {
            ExtractionOutcome::Succeeded { text, .. } => Some(text),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    /// Confidence of a successful attempt; `None` for failures.
    pub fn confidence(&self) -> Option<f64> {
        match &self.outcome {
            ExtractionOutcome::Succeeded { confidence, .. } => Some(*confidence),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            ExtractionOutcome::Succeeded { .. } => None,
            ExtractionOutcome::Failed { kind, .. } => Some(*kind),
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.outcome {
            ExtractionOutcome::Succeeded { .. } => None,
            ExtractionOutcome::Failed { message, .. } => Some(message),
        }
    }

    pub(crate) fn failed(
        descriptor: &AdapterDescriptor,
        duration: Duration,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            adapter: descriptor.id,
            priority: descriptor.priority,
            duration,
            outcome: ExtractionOutcome::Failed {
                kind,
                message: message.into(),
            },
        }
    }
}

pub(crate) fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Runs one adapter under `timeout`, then field extraction on its text.
///
/// Never fails: adapter errors, timeouts and panics all become a failed attempt.
pub async fn run_adapter(
    descriptor: &AdapterDescriptor,
    doc: &UploadedDocument,
    timeout: Duration,
    weights: &ConfidenceWeights,
) -> AdapterAttempt {
    let started = Instant::now();

    let raw = match tokio::time::timeout(timeout, descriptor.adapter.extract(doc)).await {
        Ok(Ok(raw)) => {
            debug!(
                adapter = descriptor.id,
                source = raw.source_label,
                chars = raw.text.chars().count(),
                "adapter returned text"
            );
            raw
        }
        Ok(Err(e)) => {
            warn!(adapter = descriptor.id, filename = %doc.filename, error = %e, "adapter failed");
            return AdapterAttempt::failed(descriptor, started.elapsed(), e.kind(), e.to_string());
        }
        Err(_) => {
            warn!(
                adapter = descriptor.id,
                filename = %doc.filename,
                timeout_ms = timeout.as_millis() as u64,
                "adapter timed out"
            );
            return AdapterAttempt::failed(
                descriptor,
                started.elapsed(),
                FailureKind::Timeout,
                format!("no result within {} ms", timeout.as_millis()),
            );
        }
    };

    // Field extraction is regex-heavy; keep it off the async workers.
    let weights = weights.clone();
    let extracted = tokio::task::spawn_blocking(move || {
        let profile = extract_profile(&raw.text, &weights);
        (raw.text, profile)
    })
    .await;
    let (text, profile) = match extracted {
        Ok(pair) => pair,
        Err(e) => {
            warn!(adapter = descriptor.id, filename = %doc.filename, error = %e, "field extraction task failed");
            return AdapterAttempt::failed(
                descriptor,
                started.elapsed(),
                FailureKind::Internal,
                format!("field extraction failed: {e}"),
            );
        }
    };

    let duration = started.elapsed();
    info!(
        adapter = descriptor.id,
        filename = %doc.filename,
        confidence = profile.confidence,
        skills = ?profile.skills.iter().collect::<Vec<_>>(),
        elapsed_ms = duration.as_millis() as u64,
        "adapter produced profile"
    );
    AdapterAttempt {
        adapter: descriptor.id,
        priority: descriptor.priority,
        duration,
        outcome: ExtractionOutcome::Succeeded {
            confidence: profile.confidence,
            char_count: text.chars().count(),
            text,
            profile: Box::new(profile),
        },
    }
}

/// Ordered adapters tried one at a time.
///
/// Dropping the future returned by `run` stops the chain; no later adapter is
/// started.
pub struct FallbackChain {
    descriptors: Vec<AdapterDescriptor>,
    timeout: Duration,
    weights: ConfidenceWeights,
}

impl FallbackChain {
    pub fn new(descriptors: Vec<AdapterDescriptor>, timeout: Duration, weights: ConfidenceWeights) -> Self {
        Self {
            descriptors,
            timeout,
            weights,
        }
    }

    /// Attempts adapters in order until `stop` returns true for an attempt.
    /// Returns every attempt made, the stopping one last.
    pub async fn run<F>(&self, doc: &UploadedDocument, stop: F) -> Vec<AdapterAttempt>
    where
        F: Fn(&AdapterAttempt) -> bool,
    {
        let mut attempts = Vec::with_capacity(self.descriptors.len());
        for descriptor in &self.descriptors {
            let attempt = run_adapter(descriptor, doc, self.timeout, &self.weights).await;
            let done = stop(&attempt);
            attempts.push(attempt);
            if done {
                break;
            }
        }
        attempts
    }
}
