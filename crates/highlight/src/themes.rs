//! Theme lookup: syntect's bundled themes plus embedded GitHub palettes.

use crate::error::HighlightError;
use once_cell::sync::Lazy;
use std::io::Cursor;
use syntect::highlighting::{Theme, ThemeSet};

static BUNDLED: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const EMBEDDED: &[(&str, &str)] = &[
    (
        "github-dark-default",
        include_str!("../themes/github-dark-default.tmTheme"),
    ),
    (
        "github-light-default",
        include_str!("../themes/github-light-default.tmTheme"),
    ),
];

/// Names of every theme [`load_theme`] can resolve.
pub fn available_themes() -> Vec<&'static str> {
    EMBEDDED
        .iter()
        .map(|(name, _)| *name)
        .chain(BUNDLED.themes.keys().map(String::as_str))
        .collect()
}

/// Loads a theme by exact name.
pub fn load_theme(name: &str) -> Result<Theme, HighlightError> {
    if let Some((_, source)) = EMBEDDED.iter().find(|(embedded, _)| *embedded == name) {
        return parse_theme(name, source);
    }
    BUNDLED
        .themes
        .get(name)
        .cloned()
        .ok_or_else(|| HighlightError::ThemeNotFound {
            name: name.to_string(),
            available: available_themes().join(", "),
        })
}

fn parse_theme(name: &str, source: &str) -> Result<Theme, HighlightError> {
    ThemeSet::load_from_reader(&mut Cursor::new(source.as_bytes())).map_err(|source| {
        HighlightError::ThemeLoad {
            name: name.to_string(),
            source,
        }
    })
}
