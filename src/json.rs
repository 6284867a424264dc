//! JSON parsing with errors that point at the offending spot.

use serde::de::DeserializeOwned;

/// A deserialization failure with its location and a snippet of the input.
#[derive(Debug, thiserror::Error)]
#[error("{}{detail} (line {line} col {column})\n{snippet}", location_prefix(.path))]
pub struct JsonParseError {
    /// serde path to the failing value, e.g. `[3].url`
    pub path: String,
    pub detail: String,
    pub line: usize,
    pub column: usize,
    pub snippet: String,
}

fn location_prefix(path: &str) -> String {
    if path.is_empty() || path == "." {
        String::new()
    } else {
        format!("at path '{path}': ")
    }
}

/// Parse `body`, reporting failures as a [`JsonParseError`].
pub fn parse_json_with_context<T: DeserializeOwned>(body: &str) -> Result<T, JsonParseError> {
    let de = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        let (line, column) = (inner.line(), inner.column());

        let msg = inner.to_string();
        let loc = format!(" at line {line} column {column}");
        let detail = describe_mismatch(msg.strip_suffix(&loc).unwrap_or(&msg));

        JsonParseError {
            path,
            detail,
            line,
            column,
            snippet: snippet_around(body, line, column, 20),
        }
    })
}

/// Reword serde's `invalid type: X, expected Y` as `expected Y, got X`.
fn describe_mismatch(msg: &str) -> String {
    if let Some(rest) = msg.split_once("invalid type: ").map(|(_, rest)| rest)
        && let Some((actual, expected)) = rest.split_once(", expected ")
    {
        return format!("expected {}, got {}", expected.trim(), actual);
    }
    msg.to_string()
}

/// A window of `width` chars around the error column with a caret under it.
fn snippet_around(body: &str, line: usize, column: usize, width: usize) -> String {
    let target: Vec<char> = body
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .chars()
        .collect();
    if target.is_empty() {
        return "(empty line)".to_string();
    }

    let error_idx = column.saturating_sub(1).min(target.len());
    let start = error_idx.saturating_sub(width / 2);
    let end = (error_idx + width / 2).min(target.len());

    let slice: String = target[start..end].iter().collect();
    let caret = " ".repeat(error_idx - start) + "^";
    format!("...{slice}...\n   {caret}")
}
