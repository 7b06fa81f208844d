pub mod benchmark;
pub mod chain;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use benchmark::{BenchmarkReport, BenchmarkRunner};
pub use chain::AdapterAttempt;
pub use orchestrator::{OrchestrationError, Orchestrator, ParsedProfile, Selection};
