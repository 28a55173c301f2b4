//! Conversions between JS values and fencelight types.

use fencelight_core::{Document, HighlightConfig};
use fencelight_highlight::{HighlightError, HighlightSummary, Highlighter};
use napi::{Error, Status};
use serde_json::Value as JsonValue;

/// Reads an optional JS options object into a `HighlightConfig`.
pub(crate) fn parse_config(config: Option<JsonValue>) -> napi::Result<HighlightConfig> {
    match config {
        None | Some(JsonValue::Null) => Ok(HighlightConfig::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid highlighter options: {e}"))),
    }
}

/// Maps highlighter errors to JS exceptions; configuration problems are
/// reported as invalid arguments.
pub(crate) fn to_napi_error(err: HighlightError) -> Error {
    let status = if err.is_configuration() {
        Status::InvalidArg
    } else {
        Status::GenericFailure
    };
    Error::new(status, err.to_string())
}

/// Highlights a unist JSON tree. `null` passes through.
pub(crate) fn highlight_json(
    highlighter: &Highlighter,
    tree: JsonValue,
) -> Result<(JsonValue, HighlightSummary), HighlightError> {
    if tree.is_null() {
        return Ok((JsonValue::Null, HighlightSummary::default()));
    }
    let mut doc = Document::from_json(tree)?;
    let summary = highlighter.highlight_in_place(&mut doc)?;
    Ok((doc.to_json(), summary))
}
