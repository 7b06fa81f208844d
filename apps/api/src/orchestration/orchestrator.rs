//! Adapter orchestration for a single parse request.
//!
//! Applicable adapters run one at a time in priority order. The first profile at
//! or above the accept threshold wins. Otherwise the most confident successful
//! profile is returned as a best effort. Profiles are never merged across adapters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::chain::{AdapterAttempt, FallbackChain};
use crate::engine::ConfidenceWeights;
use crate::extraction::{AdapterRegistry, FailureKind};
use crate::models::{CandidateProfile, UploadedDocument};

pub const DEFAULT_ACCEPT_THRESHOLD: f64 = 0.70;
pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Met the accept threshold; later adapters were not tried.
    Accepted,
    /// Every adapter was tried; this was the most confident success.
    BestEffort,
}

#[derive(Debug, Clone)]
pub struct ParsedProfile {
    pub profile: CandidateProfile,
    pub adapter_used: &'static str,
    pub duration: Duration,
    pub selection: Selection,
    pub attempts: Vec<AdapterAttempt>,
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("uploaded document is empty")]
    EmptyDocument,

    #[error("no adapter accepts '{filename}' ({mime_type})")]
    UnsupportedType { filename: String, mime_type: String },

    #[error("unknown adapter '{0}'")]
    UnknownAdapter(String),

    #[error("no adapter could extract text from the document")]
    ParseFailed { attempts: Vec<AdapterAttempt> },

    #[error("adapter '{adapter}' failed internally: {message}")]
    AdapterFault {
        adapter: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: Arc<AdapterRegistry>,
    accept_threshold: f64,
    timeout: Duration,
    weights: ConfidenceWeights,
}

impl Orchestrator {
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self {
            registry,
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            timeout: DEFAULT_ADAPTER_TIMEOUT,
            weights: ConfidenceWeights::default(),
        }
    }

    pub fn with_accept_threshold(mut self, threshold: f64) -> Self {
        self.accept_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_weights(mut self, weights: ConfidenceWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Parses with every applicable adapter until one is good enough.
    pub async fn parse(&self, doc: &UploadedDocument) -> Result<ParsedProfile, OrchestrationError> {
        if doc.is_empty() {
            return Err(OrchestrationError::EmptyDocument);
        }
        let descriptors = self.registry.applicable(doc);
        debug!(
            filename = %doc.filename,
            kinds = ?doc.kinds().iter().map(|k| k.as_str()).collect::<Vec<_>>(),
            adapters = descriptors.len(),
            "resolved adapter chain"
        );
        if descriptors.is_empty() {
            return Err(unsupported(doc));
        }

        let started = Instant::now();
        let threshold = self.accept_threshold;
        let chain = FallbackChain::new(descriptors, self.timeout, self.weights.clone());
        let attempts = chain
            .run(doc, |a| a.confidence().is_some_and(|c| c >= threshold))
            .await;

        let accepted = attempts
            .last()
            .filter(|a| a.confidence().is_some_and(|c| c >= threshold));
        let (chosen, selection) = match accepted {
            Some(a) => (a, Selection::Accepted),
            None => match best_success(&attempts) {
                Some(a) => (a, Selection::BestEffort),
                None => {
                    warn!(filename = %doc.filename, attempts = attempts.len(), "every adapter failed");
                    return Err(OrchestrationError::ParseFailed { attempts });
                }
            },
        };

        let profile = chosen.profile().cloned().unwrap_or_default();
        let adapter_used = chosen.adapter;
        let duration = started.elapsed();
        info!(
            filename = %doc.filename,
            adapter = adapter_used,
            confidence = profile.confidence,
            selection = ?selection,
            elapsed_ms = duration.as_millis() as u64,
            "profile selected"
        );
        Ok(ParsedProfile {
            profile,
            adapter_used,
            duration,
            selection,
            attempts,
        })
    }

    /// Runs only the named adapter, whatever kind the document appears to be.
    pub async fn parse_with(
        &self,
        doc: &UploadedDocument,
        adapter_id: &str,
    ) -> Result<ParsedProfile, OrchestrationError> {
        let descriptor = self
            .registry
            .get(adapter_id)
            .cloned()
            .ok_or_else(|| OrchestrationError::UnknownAdapter(adapter_id.to_string()))?;
        if doc.is_empty() {
            return Err(OrchestrationError::EmptyDocument);
        }

        let started = Instant::now();
        let chain = FallbackChain::new(vec![descriptor], self.timeout, self.weights.clone());
        let attempts = chain.run(doc, |_| false).await;

        let Some(attempt) = attempts.first() else {
            return Err(OrchestrationError::ParseFailed { attempts });
        };
        let Some(profile) = attempt.profile().cloned() else {
            if attempt.failure_kind() == Some(FailureKind::Internal) {
                return Err(OrchestrationError::AdapterFault {
                    adapter: attempt.adapter,
                    message: attempt.failure_message().unwrap_or_default().to_string(),
                });
            }
            return Err(OrchestrationError::ParseFailed { attempts });
        };

        let selection = if profile.confidence >= self.accept_threshold {
            Selection::Accepted
        } else {
            Selection::BestEffort
        };
        Ok(ParsedProfile {
            adapter_used: attempt.adapter,
            profile,
            duration: started.elapsed(),
            selection,
            attempts,
        })
    }
}

/// Highest confidence among successful attempts; the earliest wins ties.
fn best_success(attempts: &[AdapterAttempt]) -> Option<&AdapterAttempt> {
    attempts
        .iter()
        .filter_map(|a| a.confidence().map(|c| (a, c)))
        .fold(None, |best: Option<(&AdapterAttempt, f64)>, (a, c)| match best {
            Some((_, best_c)) if best_c >= c => best,
            _ => Some((a, c)),
        })
        .map(|(a, _)| a)
}

fn unsupported(doc: &UploadedDocument) -> OrchestrationError {
    OrchestrationError::UnsupportedType {
        filename: doc.filename.clone(),
        mime_type: doc.mime_type.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::extraction::fixtures::pdf_with_pages;
    use crate::extraction::{AdapterDescriptor, ExtractError, TextAdapter};
    use crate::models::document::MIME_PDF;
    use crate::models::DocumentKind;
    use crate::orchestration::testing::{padded, Counting, Failing, FixedText, Slow, JANE_DOE};

    fn orchestrator(adapters: Vec<(&'static str, Arc<dyn TextAdapter>)>) -> Orchestrator {
        let registry = adapters
            .into_iter()
            .enumerate()
            .fold(AdapterRegistry::new(), |r, (i, (id, adapter))| {
                r.register(AdapterDescriptor::new(id, [DocumentKind::Pdf], (i as u8 + 1) * 10, adapter))
            });
        Orchestrator::new(Arc::new(registry))
    }

    fn pdf_doc() -> UploadedDocument {
        UploadedDocument::new(b"%PDF-1.4 stub".to_vec(), MIME_PDF, "cv.pdf")
    }

    /// Name and email only: 0.55.
    fn name_and_email() -> String {
        padded("Jane Doe\njane@example.com")
    }

    /// Phone only: 0.20.
    fn phone_only() -> String {
        padded("+44 20 7946 0958")
    }

    #[tokio::test]
    async fn test_first_acceptable_profile_stops_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let o = orchestrator(vec![
            ("good", Arc::new(FixedText(padded(JANE_DOE)))),
            ("later", Arc::new(Counting::new(calls.clone()))),
        ]);
        let parsed = o.parse(&pdf_doc()).await.unwrap();
        assert_eq!(parsed.adapter_used, "good");
        assert_eq!(parsed.selection, Selection::Accepted);
        assert_eq!(parsed.attempts.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_best_effort_never_merges_fields() {
        let o = orchestrator(vec![
            ("phone", Arc::new(FixedText(phone_only()))),
            ("contact", Arc::new(FixedText(name_and_email()))),
        ]);
        let parsed = o.parse(&pdf_doc()).await.unwrap();
        assert_eq!(parsed.selection, Selection::BestEffort);
        assert_eq!(parsed.adapter_used, "contact");
        assert_eq!(parsed.attempts.len(), 2);
        assert_eq!(parsed.profile.email.as_deref(), Some("jane@example.com"));
        // The phone only the other adapter saw must not leak in.
        assert!(parsed.profile.phone.is_none());
        assert!((parsed.profile.confidence - 0.55).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_best_effort_tie_goes_to_earliest() {
        let o = orchestrator(vec![
            ("first", Arc::new(FixedText(name_and_email()))),
            ("second", Arc::new(FixedText(name_and_email()))),
        ]);
        let parsed = o.parse(&pdf_doc()).await.unwrap();
        assert_eq!(parsed.adapter_used, "first");
    }

    #[tokio::test]
    async fn test_failures_skipped() {
        let o = orchestrator(vec![
            ("broken", Arc::new(Failing(ExtractError::MalformedContainer("bad xref".into())))),
            ("good", Arc::new(FixedText(padded(JANE_DOE)))),
        ]);
        let parsed = o.parse(&pdf_doc()).await.unwrap();
        assert_eq!(parsed.adapter_used, "good");
        assert_eq!(parsed.attempts[0].failure_kind(), Some(FailureKind::MalformedContainer));
    }

    #[tokio::test]
    async fn test_all_failed_is_parse_failed() {
        let o = orchestrator(vec![
            ("a", Arc::new(Failing(ExtractError::NoText))),
            ("b", Arc::new(Failing(ExtractError::MalformedContainer("x".into())))),
        ]);
        match o.parse(&pdf_doc()).await {
            Err(OrchestrationError::ParseFailed { attempts }) => {
                let kinds: Vec<_> = attempts.iter().filter_map(|a| a.failure_kind()).collect();
                assert_eq!(kinds, vec![FailureKind::NoText, FailureKind::MalformedContainer]);
            }
            other => panic!("expected ParseFailed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let o = orchestrator(vec![
            ("slow", Arc::new(Slow(Duration::from_secs(60)))),
            ("fast", Arc::new(FixedText(padded(JANE_DOE)))),
        ])
        .with_timeout(Duration::from_millis(100));
        let parsed = o.parse(&pdf_doc()).await.unwrap();
        assert_eq!(parsed.adapter_used, "fast");
        assert_eq!(parsed.attempts[0].failure_kind(), Some(FailureKind::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_parse_starts_no_further_adapter() {
        let calls = Arc::new(AtomicUsize::new(0));
        let o = orchestrator(vec![
            ("slow", Arc::new(Slow(Duration::from_secs(60)))),
            ("later", Arc::new(Counting::new(calls.clone()))),
        ]);
        let doc = pdf_doc();
        let cut_short = tokio::time::timeout(Duration::from_millis(50), o.parse(&doc)).await;
        assert!(cut_short.is_err());
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_applicable_adapter() {
        let o = orchestrator(vec![("pdf", Arc::new(FixedText(padded(JANE_DOE))))]);
        let doc = UploadedDocument::new(b"GIF89a".to_vec(), "image/gif", "photo.gif");
        assert!(matches!(
            o.parse(&doc).await,
            Err(OrchestrationError::UnsupportedType { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_document() {
        let o = orchestrator(vec![("pdf", Arc::new(FixedText(padded(JANE_DOE))))]);
        let doc = UploadedDocument::new(Vec::new(), MIME_PDF, "cv.pdf");
        assert!(matches!(o.parse(&doc).await, Err(OrchestrationError::EmptyDocument)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_with_real_adapters_is_parse_failed() {
        let o = Orchestrator::new(Arc::new(AdapterRegistry::with_defaults()));
        let doc = UploadedDocument::new(b"%PDF-1.4\nnot really a pdf".to_vec(), MIME_PDF, "cv.pdf");
        match o.parse(&doc).await {
            Err(OrchestrationError::ParseFailed { attempts }) => {
                let ids: Vec<_> = attempts.iter().map(|a| a.adapter).collect();
                assert_eq!(ids, vec!["pdf_extract", "lopdf_text"]);
            }
            other => panic!("expected ParseFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_real_pdf_parses() {
        let o = Orchestrator::new(Arc::new(AdapterRegistry::with_defaults()));
        let bytes = pdf_with_pages(&[&["Jane Doe", "jane.doe@example.com", "+44 20 7946 0958"]]);
        let parsed = o.parse(&UploadedDocument::new(bytes, MIME_PDF, "cv.pdf")).await.unwrap();
        assert!(parsed.profile.confidence > 0.0);
        assert!(parsed.profile.confidence <= 1.0);
        assert_eq!(parsed.profile.email.as_deref(), Some("jane.doe@example.com"));
    }

    #[tokio::test]
    async fn test_forced_adapter_runs_alone() {
        let calls = Arc::new(AtomicUsize::new(0));
        let o = orchestrator(vec![
            ("counted", Arc::new(Counting::new(calls.clone()))),
            ("forced", Arc::new(FixedText(name_and_email()))),
        ]);
        let parsed = o.parse_with(&pdf_doc(), "forced").await.unwrap();
        assert_eq!(parsed.adapter_used, "forced");
        assert_eq!(parsed.selection, Selection::BestEffort);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_forced_unknown_adapter() {
        let o = orchestrator(vec![("pdf", Arc::new(FixedText(padded(JANE_DOE))))]);
        assert!(matches!(
            o.parse_with(&pdf_doc(), "ocr").await,
            Err(OrchestrationError::UnknownAdapter(id)) if id == "ocr"
        ));
    }

    #[tokio::test]
    async fn test_forced_internal_fault_vs_parse_failure() {
        let o = orchestrator(vec![
            ("crashy", Arc::new(Failing(ExtractError::Internal("reader panicked".into())))),
            ("empty", Arc::new(Failing(ExtractError::NoText))),
        ]);
        assert!(matches!(
            o.parse_with(&pdf_doc(), "crashy").await,
            Err(OrchestrationError::AdapterFault { adapter: "crashy", .. })
        ));
        assert!(matches!(
            o.parse_with(&pdf_doc(), "empty").await,
            Err(OrchestrationError::ParseFailed { .. })
        ));
    }
}
