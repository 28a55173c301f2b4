#![deny(missing_docs)]
//! Node.js bindings that surface fencelight's code block highlighter.

use fencelight_highlight::EngineCache;
use napi_derive::napi;
use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;

/// Batch processing types and functions.
pub mod batch;
/// The stateful highlighter.
pub mod highlighter;
/// NAPI-exposed data structures.
pub mod types;
/// Utility helpers.
mod utils;

pub use batch::*;
pub use highlighter::JsHighlighter;
pub use types::*;
use utils::{highlight_json, parse_config, to_napi_error};

/// Engines shared by every call in this process, keyed by configuration.
pub(crate) static ENGINES: Lazy<EngineCache> = Lazy::new(EngineCache::new);

/// Highlights every code block in a unist tree.
///
/// Returns `null` when `tree` is absent without loading any theme. Repeated
/// calls with the same options reuse one engine.
#[napi]
pub fn highlight(tree: Option<JsonValue>, config: Option<JsonValue>) -> napi::Result<Option<JsonValue>> {
    let tree = match tree {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(tree) => tree,
    };
    let config = parse_config(config)?;
    let highlighter = ENGINES.highlighter(&config).map_err(to_napi_error)?;
    let (tree, _) = highlight_json(&highlighter, tree).map_err(to_napi_error)?;
    Ok(Some(tree))
}

/// Names accepted as `theme` / `themes`.
#[napi(js_name = "availableThemes")]
pub fn available_themes() -> Vec<String> {
    fencelight_highlight::available_themes()
        .into_iter()
        .map(str::to_string)
        .collect()
}
