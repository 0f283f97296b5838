//! Best-effort function name extraction for offline summaries.

use std::sync::LazyLock;

use regex::Regex;

const FALLBACK_FUNCTION: &str = "main";

static SCRIPT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"function\s+(\w+)\s*\(",
        r"const\s+(\w+)\s*=\s*\(",
        r"let\s+(\w+)\s*=\s*\(",
        r"var\s+(\w+)\s*=\s*\(",
        r"(\w+)\s*:\s*function\s*\(",
        r"(\w+)\s*\(",
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static PYTHON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    Regex::new(r"def\s+(\w+)\s*\(")
        .ok()
        .into_iter()
        .collect()
});

/// Names of functions found in `content`, in discovery order.
///
/// JavaScript and TypeScript (`js`, `jsx`, `ts`, `tsx`) and Python (`py`)
/// are scanned; other languages, and files where nothing matches, yield
/// `["main"]`. The JavaScript scan is deliberately loose and also reports
/// plain call sites.
#[must_use]
pub fn extract_function_names(content: &str, extension: &str) -> Vec<String> {
    let patterns: &[Regex] = match extension.trim_start_matches('.') {
        "js" | "jsx" | "ts" | "tsx" => &SCRIPT_PATTERNS,
        "py" => &PYTHON_PATTERNS,
        _ => &[],
    };

    let mut names: Vec<String> = Vec::new();
    for pattern in patterns {
        for captures in pattern.captures_iter(content) {
            let Some(name) = captures.get(1).map(|found| found.as_str()) else {
                continue;
            };
            if !names.iter().any(|known| known == name) {
                names.push(name.to_owned());
            }
        }
    }

    if names.is_empty() {
        names.push(FALLBACK_FUNCTION.to_owned());
    }
    names
}
