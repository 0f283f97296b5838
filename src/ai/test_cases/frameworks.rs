//! Test framework lookup by file extension.

/// Framework used when nothing better is known.
pub const DEFAULT_FRAMEWORK: &str = "jest";

/// Frameworks commonly used for files with `extension` (no leading dot),
/// most common first.
#[must_use]
pub fn supported_frameworks(extension: &str) -> &'static [&'static str] {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "js" | "ts" => &["jest", "mocha", "vitest"],
        "jsx" | "tsx" => &["jest", "react-testing-library", "vitest"],
        "py" => &["pytest", "unittest", "nose"],
        "java" => &["junit", "testng"],
        "cpp" => &["gtest", "catch2"],
        "cs" => &["nunit", "xunit", "mstest"],
        "php" => &["phpunit", "codeception"],
        "rb" => &["rspec", "minitest"],
        "go" => &["testing", "testify"],
        "rs" => &["cargo-test"],
        _ => &[DEFAULT_FRAMEWORK],
    }
}

/// First entry of [`supported_frameworks`].
#[must_use]
pub fn default_framework(extension: &str) -> &'static str {
    supported_frameworks(extension)
        .first()
        .copied()
        .unwrap_or(DEFAULT_FRAMEWORK)
}

/// Extension given to generated test files.
#[must_use]
pub fn test_file_extension(framework: &str) -> &'static str {
    if framework.eq_ignore_ascii_case("pytest") {
        "py"
    } else {
        "js"
    }
}
