//! Generative text integration.
//!
//! [`GenerativeTextService`] is the seam to the remote model; Gemini is the
//! shipped implementation. [`test_cases`] builds prompts, interprets the
//! free-text output and falls back to local templates while the service is
//! unavailable.

pub mod error;
pub mod gemini;
pub mod health;
pub mod service;
pub mod test_cases;

pub use error::AiError;
pub use gemini::{GeminiConfig, GeminiTextService};
pub use health::{HealthReport, HealthStatus, check_health};
pub use service::{GenerationOptions, GenerativeTextService, generate_with_retry};
pub use test_cases::{
    GeneratedTestCode, SourceSnippet, TestCaseGenerator, TestSummaryReport,
};

#[cfg(test)]
pub use service::MockGenerativeTextService;
