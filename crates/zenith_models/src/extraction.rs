//! Utilities for turning a model reply into a character record.
//!
//! Model replies often wrap the JSON object in a markdown code block or add a
//! sentence of preamble despite being told not to. Extraction recovers the
//! object in those cases; anything it cannot recover is reported as
//! [`GenerationErrorKind::Malformed`] so the caller can ask again.
//!
//! [`GenerationErrorKind::Malformed`]: zenith_error::GenerationErrorKind::Malformed

use zenith_core::{CharacterRecord, RecordIssue};
use zenith_error::{GenerationError, GenerationResult};

/// Extract a JSON object from a reply that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Markdown code blocks: ```json ... ``` or ``` ... ```
/// 2. Balanced braces: { ... }, aware of strings and escapes
///
/// # Errors
///
/// Returns a malformed-output error if no object is found.
///
/// # Examples
///
/// ```
/// use zenith_models::extract_json;
///
/// let reply = "Sure! Here is your citizen:\n\
///     ```json\n\
///     {\"Name\": \"Ilsa\", \"Age\": 31}\n\
///     ```\n";
///
/// let json = extract_json(reply).unwrap();
/// assert!(json.starts_with('{'));
/// assert!(json.contains("Ilsa"));
/// ```
pub fn extract_json(response: &str) -> GenerationResult<String> {
    if let Some(block) = extract_from_code_block(response, "json") {
        if let Some(json) = extract_balanced(&block, '{', '}') {
            return Ok(json);
        }
    }

    if let Some(json) = extract_balanced(response, '{', '}') {
        return Ok(json);
    }

    tracing::warn!(
        response_length = response.len(),
        "No JSON object found in model reply"
    );

    Err(GenerationError::malformed(format!(
        "No JSON object found in reply (length: {})",
        response.len()
    )))
}

/// Extract, parse and validate a record from raw model text.
///
/// # Errors
///
/// Returns a malformed-output error naming every problem found.
///
/// # Examples
///
/// ```
/// use zenith_models::parse_record;
///
/// let reply = r#"{"Name": "Brask", "Age": 51, "Species": "Dwarf",
///     "PhysicalDescription": "Broad.", "PersonalityDescription": "Gruff.",
///     "ResidentDistrict": "Anvil Row"}"#;
/// let record = parse_record(reply).unwrap();
/// assert_eq!(record.species(), "Dwarf");
///
/// assert!(parse_record("I'd rather not.").is_err());
/// ```
pub fn parse_record(response: &str) -> GenerationResult<CharacterRecord> {
    let json = extract_json(response)?;

    let value: serde_json::Value = serde_json::from_str(&json).map_err(|e| {
        let preview = json.chars().take(100).collect::<String>();

        tracing::warn!(
            error = %e,
            json_preview = %preview,
            "JSON parsing failed"
        );

        GenerationError::malformed(format!("Failed to parse JSON: {} (JSON: {}...)", e, preview))
    })?;

    CharacterRecord::from_value(&value).map_err(|issues| {
        let reason = RecordIssue::join(&issues);
        tracing::warn!(issues = %reason, "Reply failed record validation");
        GenerationError::malformed(reason)
    })
}

/// Extract content from markdown code blocks.
///
/// Looks for patterns like:
/// - ```language\n...\n```
/// - ``` ... ``` (no language specified)
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);

    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        if let Some(end) = response[content_start..].find("```") {
            let content = &response[content_start..content_start + end];
            return Some(content.trim().to_string());
        }
        // Truncated reply: keep everything after the fence
        return Some(response[content_start..].trim().to_string());
    }

    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        // Skip a language tag if present
        let skip_to = response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);

        if let Some(end) = response[skip_to..].find("```") {
            let content = &response[skip_to..skip_to + end];
            return Some(content.trim().to_string());
        }
        return Some(response[skip_to..].trim().to_string());
    }

    None
}

/// Extract content between balanced delimiters.
///
/// Finds the first occurrence of `open` and extracts content up to the
/// matching `close`. Delimiters inside JSON strings are ignored.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
