//! Highlighter configuration.
//!
//! [`HighlightConfig`] mirrors the loosely-typed options object a build
//! pipeline passes in; [`HighlightConfig::resolve`] validates it and applies
//! defaults, yielding the [`HighlightOptions`] the highlighter works with.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Theme used when the configuration names none.
pub const DEFAULT_THEME: &str = "github-dark-default";

/// Languages loaded when the configuration names none.
pub const DEFAULT_LANGS: &[&str] = &[
    "text",
    "javascript",
    "typescript",
    "tsx",
    "angular-ts",
    "vue",
    "html",
    "json",
    "bash",
    "docker",
];

/// A single theme name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeSetting {
    /// One theme.
    One(String),
    /// Several themes; the first one is the primary palette.
    Many(Vec<String>),
}

/// Raw highlighter options as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightConfig {
    /// Theme name(s).
    pub theme: Option<ThemeSetting>,
    /// Additional theme names.
    pub themes: Vec<String>,
    /// Language identifiers to load.
    pub langs: Vec<String>,
    /// Render code blocks of one document in parallel.
    pub parallel: bool,
}

impl HighlightConfig {
    /// Parses a configuration from a JSON options object.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Config with a single theme and the default languages.
    pub fn with_theme(theme: impl Into<String>) -> Self {
        Self {
            theme: Some(ThemeSetting::One(theme.into())),
            ..Self::default()
        }
    }

    /// Replaces the language list.
    pub fn langs<I, S>(mut self, langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.langs = langs.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the configuration and fills in defaults.
    pub fn resolve(&self) -> Result<HighlightOptions, ConfigError> {
        let from_theme: Vec<&str> = match &self.theme {
            None => Vec::new(),
            Some(ThemeSetting::One(name)) => vec![name.as_str()],
            Some(ThemeSetting::Many(names)) => names.iter().map(String::as_str).collect(),
        };

        let mut themes: Vec<String> = Vec::new();
        for name in from_theme
            .into_iter()
            .chain(self.themes.iter().map(String::as_str))
        {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::BlankTheme);
            }
            if !themes.iter().any(|t| t == name) {
                themes.push(name.to_string());
            }
        }
        if themes.is_empty() {
            themes.push(DEFAULT_THEME.to_string());
        }

        let mut langs: Vec<String> = Vec::new();
        for lang in &self.langs {
            let lang = lang.trim().to_ascii_lowercase();
            if lang.is_empty() {
                return Err(ConfigError::BlankLanguage);
            }
            if !langs.contains(&lang) {
                langs.push(lang);
            }
        }
        if langs.is_empty() {
            langs = DEFAULT_LANGS.iter().map(|l| l.to_string()).collect();
        }

        Ok(HighlightOptions {
            themes,
            langs,
            parallel: self.parallel,
        })
    }
}

/// Validated highlighter options.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HighlightOptions {
    /// Non-empty, duplicate-free theme names; the first is the primary palette.
    pub themes: Vec<String>,
    /// Non-empty, lowercased, duplicate-free language identifiers.
    pub langs: Vec<String>,
    /// Render code blocks of one document in parallel.
    pub parallel: bool,
}

impl HighlightOptions {
    /// The primary theme.
    pub fn primary_theme(&self) -> &str {
        // `resolve` guarantees at least one theme.
        self.themes.first().map(String::as_str).unwrap_or(DEFAULT_THEME)
    }
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            themes: vec![DEFAULT_THEME.to_string()],
            langs: DEFAULT_LANGS.iter().map(|l| l.to_string()).collect(),
            parallel: false,
        }
    }
}
