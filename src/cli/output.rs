//! Output formatting utilities for CLI operations.

use std::io::Write;

use casewright::ai::test_cases::supported_frameworks;
use casewright::ai::{GeneratedTestCode, HealthReport, TestSummaryReport};
use casewright::github::{PullRequestResult, RepositorySummary, SourceFile};
use casewright::{BranchRequest, CliError, RemoteFile, RepositoryLocator};

/// Writes the authenticated user's repositories.
pub fn write_repository_listing<W: Write>(
    writer: &mut W,
    repositories: &[RepositorySummary],
) -> Result<(), CliError> {
    writeln!(writer, "Repositories ({}):", repositories.len())?;
    writeln!(writer)?;

    for repository in repositories {
        let visibility = if repository.private {
            "private"
        } else {
            "public"
        };
        let language = repository.language.as_deref().unwrap_or("unknown");
        write!(
            writer,
            "  {} [{visibility}] {language} ★{}",
            repository.full_name, repository.stargazers_count
        )?;
        if let Some(description) = repository.description.as_deref() {
            write!(writer, " - {description}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes source files found under a repository directory.
pub fn write_source_listing<W: Write>(
    writer: &mut W,
    locator: &RepositoryLocator,
    files: &[SourceFile],
) -> Result<(), CliError> {
    writeln!(
        writer,
        "Source files in {}/{} ({}):",
        locator.owner().as_str(),
        locator.repository().as_str(),
        files.len()
    )?;
    writeln!(writer)?;

    for file in files {
        writeln!(writer, "  {} ({} bytes)", file.path, file.size)?;
    }
    write_framework_choices(writer, files)
}

/// Writes the test frameworks available for each listed extension, default
/// first, in the order the extensions first appear.
fn write_framework_choices<W: Write>(
    writer: &mut W,
    files: &[SourceFile],
) -> Result<(), CliError> {
    let mut extensions: Vec<&str> = Vec::new();
    for file in files {
        if let Some((_, extension)) = file.name.rsplit_once('.')
            && !extensions.contains(&extension)
        {
            extensions.push(extension);
        }
    }
    if extensions.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "Test frameworks (choose with --framework):")?;
    for extension in extensions {
        let mut choices = supported_frameworks(extension).iter();
        let Some(default) = choices.next() else {
            continue;
        };
        write!(writer, "  .{extension}: {default} (default)")?;
        for alternative in choices {
            write!(writer, ", {alternative}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes per-file test summaries and the overall recommendations.
pub fn write_summary_report<W: Write>(
    writer: &mut W,
    report: &TestSummaryReport,
) -> Result<(), CliError> {
    if report.is_fallback {
        writeln!(
            writer,
            "AI service unavailable; showing locally generated summaries."
        )?;
        writeln!(writer)?;
    }

    for file in &report.files {
        writeln!(writer, "{} [{} priority, {}]", file.path, file.priority, file.framework)?;
        if !file.description.is_empty() {
            writeln!(writer, "  {}", file.description)?;
        }
        if !file.functions.is_empty() {
            writeln!(writer, "  Functions: {}", file.functions.join(", "))?;
        }
        for scenario in &file.test_scenarios {
            writeln!(writer, "  - {scenario}")?;
        }
        writeln!(writer)?;
    }

    if !report.overall_recommendations.is_empty() {
        writeln!(writer, "Recommendations:")?;
        writeln!(writer, "{}", report.overall_recommendations)?;
    }
    Ok(())
}

/// Writes each generated test file with the path it would be published at.
pub fn write_generated_code<W: Write>(
    writer: &mut W,
    code: &GeneratedTestCode,
    files: &[RemoteFile],
) -> Result<(), CliError> {
    let source = if code.is_fallback {
        "offline templates"
    } else {
        "AI service"
    };
    writeln!(
        writer,
        "Generated {} {} test file(s) from {source}:",
        files.len(),
        code.framework
    )?;

    for file in files {
        writeln!(writer)?;
        writeln!(writer, "// {}", file.path())?;
        writeln!(writer, "{}", file.content())?;
    }
    Ok(())
}

/// Writes the result of an AI health check.
pub fn write_health_report<W: Write>(
    writer: &mut W,
    report: &HealthReport,
) -> Result<(), CliError> {
    if let Some(preview) = report.response_preview.as_deref() {
        writeln!(writer, "Gemini AI: {}", report.status)?;
        writeln!(writer, "Response: {preview}")?;
        return Ok(());
    }
    writeln!(
        writer,
        "Gemini AI: {} after {} attempt(s)",
        report.status, report.attempts
    )?;
    if report.fallback_available() {
        writeln!(writer, "Offline test templates remain available.")?;
    }
    Ok(())
}

/// Writes the outcome of a successful publish.
pub fn write_publish_summary<W: Write>(
    writer: &mut W,
    branch: &BranchRequest,
    file_count: usize,
    pull_request: &PullRequestResult,
) -> Result<(), CliError> {
    let url = pull_request
        .url
        .as_deref()
        .unwrap_or("no HTML URL provided");
    writeln!(
        writer,
        "Opened PR #{} on {}: {} -> {} ({file_count} file(s))",
        pull_request.number,
        branch.repository_label(),
        branch.new_branch(),
        branch.base_branch()
    )?;
    writeln!(writer, "URL: {url}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use casewright::ai::TestSummaryReport;
    use casewright::ai::test_cases::FileTestSummary;
    use casewright::github::{PullRequestResult, RepositorySummary, SourceFile};
    use casewright::{BranchRequest, RepositoryLocator};

    use super::{
        write_publish_summary, write_repository_listing, write_source_listing,
        write_summary_report,
    };

    fn render(write: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer);
        String::from_utf8(buffer).expect("output should be valid UTF-8")
    }

    #[test]
    fn repository_listing_shows_visibility_and_description() {
        let repositories = vec![RepositorySummary {
            id: 1,
            name: "widgets".to_owned(),
            full_name: "acme/widgets".to_owned(),
            owner: Some("acme".to_owned()),
            description: Some("Widget factory".to_owned()),
            language: Some("JavaScript".to_owned()),
            updated_at: None,
            private: true,
            fork: false,
            stargazers_count: 7,
            forks_count: 0,
        }];

        let output = render(|buffer| {
            write_repository_listing(buffer, &repositories).expect("write should succeed");
        });

        assert!(output.starts_with("Repositories (1):"), "missing header: {output}");
        assert!(
            output.contains("  acme/widgets [private] JavaScript ★7 - Widget factory"),
            "unexpected line: {output}"
        );
    }

    #[test]
    fn summary_report_flags_fallback_and_lists_scenarios() {
        let report = TestSummaryReport {
            files: vec![FileTestSummary {
                path: "src/a.js".to_owned(),
                description: "Adds numbers".to_owned(),
                functions: vec!["add".to_owned()],
                test_scenarios: vec!["adds two positives".to_owned()],
                framework: "jest".to_owned(),
                priority: "High".to_owned(),
            }],
            overall_recommendations: "Start with add.".to_owned(),
            raw_response: None,
            is_fallback: true,
        };

        let output = render(|buffer| {
            write_summary_report(buffer, &report).expect("write should succeed");
        });

        assert!(output.contains("AI service unavailable"));
        assert!(output.contains("src/a.js [High priority, jest]"));
        assert!(output.contains("  Functions: add"));
        assert!(output.contains("  - adds two positives"));
        assert!(output.contains("Recommendations:\nStart with add."));
    }

    #[test]
    fn publish_summary_names_branches_and_url() {
        let locator =
            RepositoryLocator::from_owner_repo("acme", "widgets").expect("locator should build");
        let branch = BranchRequest::new(locator, "main", "auto-generated-tests-1")
            .expect("branch request should build");
        let pull_request = PullRequestResult {
            id: 10,
            number: 42,
            url: Some("https://github.com/acme/widgets/pull/42".to_owned()),
            state: Some("open".to_owned()),
            title: None,
        };

        let output = render(|buffer| {
            write_publish_summary(buffer, &branch, 2, &pull_request).expect("write should succeed");
        });

        assert_eq!(
            output,
            "Opened PR #42 on acme/widgets: auto-generated-tests-1 -> main (2 file(s))\n\
             URL: https://github.com/acme/widgets/pull/42\n"
        );
    }

    #[test]
    fn source_listing_names_frameworks_once_per_extension() {
        let locator =
            RepositoryLocator::from_owner_repo("acme", "widgets").expect("locator should build");
        let files: Vec<SourceFile> = ["src/a.tsx", "src/b.tsx", "lib/c.rs"]
            .into_iter()
            .map(|path| SourceFile {
                path: path.to_owned(),
                name: path.rsplit('/').next().unwrap_or(path).to_owned(),
                size: 1,
            })
            .collect();

        let output = render(|buffer| {
            write_source_listing(buffer, &locator, &files).expect("write should succeed");
        });

        assert_eq!(output.matches(".tsx:").count(), 1, "{output}");
        assert!(
            output.contains("  .tsx: jest (default), react-testing-library, vitest\n"),
            "{output}"
        );
        assert!(output.ends_with("  .rs: cargo-test (default)\n"), "{output}");
    }

    #[test]
    fn empty_source_listing_omits_framework_section() {
        let locator =
            RepositoryLocator::from_owner_repo("acme", "widgets").expect("locator should build");

        let output = render(|buffer| {
            write_source_listing(buffer, &locator, &[]).expect("write should succeed");
        });

        assert_eq!(output, "Source files in acme/widgets (0):\n\n");
    }
}
