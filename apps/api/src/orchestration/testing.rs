//! Fake adapters for chain, orchestrator and benchmark tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::extraction::{ExtractError, RawText, TextAdapter};
use crate::models::UploadedDocument;

pub const JANE_DOE: &str = "Jane Doe\njane.doe@example.com\n+44 20 7946 0958\nSenior Policy Advisor at Acme Consulting Ltd";

/// Appends enough neutral body text to clear the short-document ceiling.
pub fn padded(head: &str) -> String {
    let body = "Experienced in drafting briefings and coordinating responses across teams.";
    format!("{head}\n\n{body}\n{body}\n{body}\n{body}\n{body}")
}

pub struct FixedText(pub String);

#[async_trait]
impl TextAdapter for FixedText {
    async fn extract(&self, _doc: &UploadedDocument) -> Result<RawText, ExtractError> {
        Ok(RawText::new(self.0.clone(), "fixed"))
    }
}

pub struct Failing(pub ExtractError);

#[async_trait]
impl TextAdapter for Failing {
    async fn extract(&self, _doc: &UploadedDocument) -> Result<RawText, ExtractError> {
        Err(self.0.clone())
    }
}

pub struct Slow(pub Duration);

#[async_trait]
impl TextAdapter for Slow {
    async fn extract(&self, _doc: &UploadedDocument) -> Result<RawText, ExtractError> {
        tokio::time::sleep(self.0).await;
        Ok(RawText::new(padded(JANE_DOE), "slow"))
    }
}

/// Counts invocations and returns the full Jane Doe document.
pub struct Counting {
    calls: Arc<AtomicUsize>,
}

impl Counting {
    pub fn new(calls: Arc<AtomicUsize>) -> Self {
        Self { calls }
    }
}

#[async_trait]
impl TextAdapter for Counting {
    async fn extract(&self, _doc: &UploadedDocument) -> Result<RawText, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawText::new(padded(JANE_DOE), "counting"))
    }
}
