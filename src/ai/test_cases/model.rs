//! Inputs and outputs of test-case generation.

use serde::{Deserialize, Serialize};

use crate::github::{FileContent, GitHubError, RemoteFile};

use super::frameworks::test_file_extension;

/// A source file handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnippet {
    /// Repository-relative path.
    pub path: String,
    /// File content.
    pub content: String,
}

impl SourceSnippet {
    /// Creates a snippet.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns `true` when both path and content are non-blank.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.path.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// Lowercase extension without the dot, or an empty string.
    #[must_use]
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }

    /// Final path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(self.path.as_str())
    }
}

impl From<FileContent> for SourceSnippet {
    fn from(file: FileContent) -> Self {
        Self::new(file.path, file.content)
    }
}

pub(crate) fn extension_of(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Suggested tests for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTestSummary {
    /// Repository-relative path.
    #[serde(default)]
    pub path: String,
    /// What the code does.
    #[serde(default)]
    pub description: String,
    /// Functions worth testing.
    #[serde(default)]
    pub functions: Vec<String>,
    /// Suggested scenarios.
    #[serde(default)]
    pub test_scenarios: Vec<String>,
    /// Recommended framework.
    #[serde(default)]
    pub framework: String,
    /// `High`, `Medium` or `Low`.
    #[serde(default)]
    pub priority: String,
}

/// Test-case summary across all selected files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummaryReport {
    /// Per-file summaries.
    #[serde(default)]
    pub files: Vec<FileTestSummary>,
    /// General advice.
    #[serde(default)]
    pub overall_recommendations: String,
    /// Model output kept verbatim when it held no JSON object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// Set when the report came from offline templates.
    #[serde(default)]
    pub is_fallback: bool,
}

/// Generated test code, one block per test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTestCode {
    /// Framework the code targets.
    pub framework: String,
    /// Test file bodies.
    pub blocks: Vec<String>,
    /// Set when the code came from offline templates.
    pub is_fallback: bool,
}

impl GeneratedTestCode {
    /// Lays the blocks out as `<test_dir>/test-<n>.<ext>` files.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidPath`] when the resulting path is blank.
    pub fn to_remote_files(&self, test_dir: &str) -> Result<Vec<RemoteFile>, GitHubError> {
        let directory = test_dir.trim().trim_matches('/');
        let extension = test_file_extension(&self.framework);
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                let name = format!("test-{}.{extension}", index + 1);
                let path = if directory.is_empty() {
                    name
                } else {
                    format!("{directory}/{name}")
                };
                RemoteFile::new(path, block.as_str())
            })
            .collect()
    }
}
