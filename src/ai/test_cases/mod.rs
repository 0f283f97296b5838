//! Test-case summaries and test code generated from source files.

mod fallback;
mod frameworks;
mod functions;
mod generator;
mod model;
mod parse;
mod prompts;

pub use fallback::{fallback_summaries, fallback_test_code};
pub use frameworks::{DEFAULT_FRAMEWORK, default_framework, supported_frameworks, test_file_extension};
pub use functions::extract_function_names;
pub use generator::TestCaseGenerator;
pub use model::{FileTestSummary, GeneratedTestCode, SourceSnippet, TestSummaryReport};
pub use parse::{parse_code_response, parse_summary_response};
pub use prompts::{code_prompt, summary_prompt};
