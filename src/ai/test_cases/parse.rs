//! Interpreting free-text model output.

use tracing::debug;

use super::model::TestSummaryReport;

const FENCE: &str = "```";

/// Parses a summary response.
///
/// The text between the first `{` and the last `}` is read as a
/// [`TestSummaryReport`]. When there is no such span, or it is not valid JSON,
/// the whole response becomes the overall recommendation and is kept in
/// `raw_response`.
#[must_use]
pub fn parse_summary_response(response: &str) -> TestSummaryReport {
    let parsed = json_object_span(response)
        .and_then(|span| serde_json::from_str::<TestSummaryReport>(span).ok());

    parsed.unwrap_or_else(|| {
        debug!("summary response held no usable JSON object");
        TestSummaryReport {
            files: Vec::new(),
            overall_recommendations: response.to_owned(),
            raw_response: Some(response.to_owned()),
            is_fallback: false,
        }
    })
}

fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// Extracts fenced code blocks from a code response.
///
/// The language tag after the opening fence is dropped and each block is
/// trimmed. A response without a complete fenced block is returned whole.
#[must_use]
pub fn parse_code_response(response: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut rest = response;

    while let Some((_, after_open)) = rest.split_once(FENCE) {
        let Some((inside, after_close)) = after_open.split_once(FENCE) else {
            break;
        };
        blocks.push(strip_language_tag(inside).trim().to_owned());
        rest = after_close;
    }

    if blocks.is_empty() {
        return vec![response.to_owned()];
    }
    blocks
}

fn strip_language_tag(block: &str) -> &str {
    let tag_end = block
        .find(|character: char| !(character.is_alphanumeric() || character == '_'))
        .unwrap_or(block.len());
    let (_, body) = block.split_at(tag_end);
    body.strip_prefix('\n').unwrap_or(body)
}
