//! Prompt construction.

use std::fmt::Write as _;

use super::model::{SourceSnippet, TestSummaryReport};

fn append_sources(prompt: &mut String, files: &[SourceSnippet]) {
    for (index, file) in files.iter().enumerate() {
        if index > 0 {
            prompt.push('\n');
        }
        let _infallible = write!(prompt, "File: {}\nContent:\n{}\n---\n", file.path, file.content);
    }
}

/// Prompt asking for a JSON test summary of `files`.
#[must_use]
pub fn summary_prompt(files: &[SourceSnippet]) -> String {
    let mut prompt = String::from(concat!(
        "You are an expert software tester and developer. Analyze the following source code ",
        "files and generate comprehensive test case summaries.\n\n",
        "For each file, provide:\n",
        "1. A brief description of what the code does\n",
        "2. Key functions/methods that need testing\n",
        "3. Suggested test scenarios (unit tests, integration tests, edge cases)\n",
        "4. Recommended testing framework based on the code type\n",
        "5. Priority level (High/Medium/Low) for testing\n\n",
        "Source Code Files:\n",
    ));
    append_sources(&mut prompt, files);
    prompt.push_str(concat!(
        "\nPlease provide your analysis in the following JSON format:\n",
        "{\n",
        "  \"files\": [\n",
        "    {\n",
        "      \"path\": \"file path\",\n",
        "      \"description\": \"brief description\",\n",
        "      \"functions\": [\"function1\", \"function2\"],\n",
        "      \"testScenarios\": [\"scenario1\", \"scenario2\"],\n",
        "      \"framework\": \"recommended framework\",\n",
        "      \"priority\": \"High/Medium/Low\"\n",
        "    }\n",
        "  ],\n",
        "  \"overallRecommendations\": \"general testing recommendations\"\n",
        "}",
    ));
    prompt
}

/// Prompt asking for complete test code for `files` in `framework`.
#[must_use]
pub fn code_prompt(summary: &TestSummaryReport, files: &[SourceSnippet], framework: &str) -> String {
    let summary_json = serde_json::to_string(summary).unwrap_or_default();
    let mut prompt = String::from(
        "You are an expert software tester. Generate complete, production-ready test code for the following source code files.\n\n",
    );
    let _infallible = write!(prompt, "Test Summary: {summary_json}\n\nSource Code Files:\n");
    append_sources(&mut prompt, files);
    let _infallible = write!(
        prompt,
        concat!(
            "\nRequirements:\n",
            "1. Generate complete test files with proper imports and setup\n",
            "2. Use {framework} framework\n",
            "3. Include comprehensive test cases covering all scenarios mentioned in the summary\n",
            "4. Add proper test descriptions and comments\n",
            "5. Include edge cases and error handling tests\n",
            "6. Follow best practices for the chosen framework\n",
            "7. Make tests readable and maintainable\n\n",
            "Please provide the complete test code with proper file structure and naming conventions."
        ),
        framework = framework
    );
    prompt
}
