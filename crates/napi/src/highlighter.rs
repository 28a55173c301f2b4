//! The stateful highlighter exposed to Node callers.

use crate::batch::{BatchInput, BatchOptions, BatchProcessingResult, run_batch};
use crate::types::HighlightResult;
use crate::utils::{highlight_json, parse_config, to_napi_error};
use crate::ENGINES;
use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Highlighter bound to one configuration.
///
/// Themes and grammars load once in the constructor; every call afterwards
/// reuses them.
#[napi(js_name = "Highlighter")]
pub struct JsHighlighter {
    inner: fencelight_highlight::Highlighter,
}

#[napi]
impl JsHighlighter {
    #[napi(constructor)]
    /// Creates a highlighter, failing on unknown themes or malformed options.
    pub fn new(config: Option<JsonValue>) -> napi::Result<Self> {
        let config = parse_config(config)?;
        let inner = ENGINES.highlighter(&config).map_err(to_napi_error)?;
        Ok(Self { inner })
    }

    /// Theme names in effect, primary theme first.
    #[napi(getter)]
    pub fn themes(&self) -> Vec<String> {
        self.inner.options().themes.clone()
    }

    /// Languages requested for loading.
    #[napi(getter)]
    pub fn langs(&self) -> Vec<String> {
        self.inner.options().langs.clone()
    }

    /// Highlights every code block in a unist tree.
    ///
    /// `null` is returned unchanged with zero counts.
    #[napi(js_name = "highlight")]
    pub fn highlight_tree(&self, tree: JsonValue) -> napi::Result<HighlightResult> {
        let (tree, summary) = highlight_json(&self.inner, tree).map_err(to_napi_error)?;
        Ok(HighlightResult {
            tree,
            stats: summary.into(),
        })
    }

    /// Highlights multiple trees in parallel using Rayon.
    #[napi(js_name = "highlightBatch")]
    pub fn highlight_batch(
        &self,
        inputs: Vec<BatchInput>,
        options: Option<BatchOptions>,
    ) -> BatchProcessingResult {
        run_batch(&self.inner, inputs, options)
    }
}
