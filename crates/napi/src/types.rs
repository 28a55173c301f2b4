//! NAPI-exposed data structures.

use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Counts returned alongside a highlighted tree.
#[napi(object)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightStats {
    /// Blocks rendered by the highlighting engine.
    pub highlighted: u32,
    /// Blocks rendered with the `shiki-unknown` fallback.
    pub fallback: u32,
}

/// A highlighted tree plus block counts.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct HighlightResult {
    /// Transformed unist tree.
    pub tree: JsonValue,
    /// Block counts.
    pub stats: HighlightStats,
}

impl From<fencelight_highlight::HighlightSummary> for HighlightStats {
    fn from(summary: fencelight_highlight::HighlightSummary) -> Self {
        Self {
            highlighted: summary.highlighted as u32,
            fallback: summary.fallback as u32,
        }
    }
}
