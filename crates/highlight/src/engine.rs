//! Highlighting engines.
//!
//! [`HighlightEngine`] is the seam between the document transform and the
//! tokenizer. [`SyntectEngine`] is the production implementation: it loads
//! its themes and resolves its languages once, up front, and is read-only
//! afterwards so one instance can serve many documents on many threads.

use crate::error::HighlightError;
use crate::html::{self, ThemeColors, Token};
use crate::languages::{find_syntax, syntax_set};
use crate::themes::load_theme;
use fencelight_core::HighlightOptions;
use std::collections::HashSet;
use syntect::highlighting::{
    Color, HighlightIterator, HighlightState, Highlighter, Style, Theme,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Turns source text into highlighted HTML.
pub trait HighlightEngine: Send + Sync {
    /// Highlights `code` as `lang` using `themes` (first theme is primary).
    fn code_to_html(
        &self,
        code: &str,
        lang: &str,
        themes: &[String],
    ) -> Result<String, HighlightError>;
}

struct LoadedTheme {
    name: String,
    theme: Theme,
}

/// syntect-backed engine with a fixed set of themes and languages.
pub struct SyntectEngine {
    syntaxes: &'static SyntaxSet,
    themes: Vec<LoadedTheme>,
    /// Names of the grammars resolved from the configured languages.
    grammars: HashSet<String>,
}

impl SyntectEngine {
    /// Loads every theme and resolves every language named in `options`.
    ///
    /// Fails if any theme cannot be loaded. Languages the grammar bundle does
    /// not know are skipped with a warning; blocks declaring them fail later
    /// with [`HighlightError::LanguageNotLoaded`].
    ///
    /// A block may name a loaded grammar through any of its aliases, so
    /// loading `typescript` also serves blocks declaring `ts`.
    pub fn new(options: &HighlightOptions) -> Result<Self, HighlightError> {
        let themes = options
            .themes
            .iter()
            .map(|name| {
                Ok(LoadedTheme {
                    name: name.clone(),
                    theme: load_theme(name)?,
                })
            })
            .collect::<Result<Vec<_>, HighlightError>>()?;

        let syntaxes = syntax_set();
        let mut grammars = HashSet::new();
        let mut loaded = 0;
        for lang in &options.langs {
            match find_syntax(syntaxes, lang) {
                Some(syntax) => {
                    grammars.insert(syntax.name.clone());
                    loaded += 1;
                }
                None => log::warn!("No grammar for language `{}`; it will not be loaded", lang),
            }
        }

        log::debug!(
            "Highlighter ready: themes [{}], {} of {} languages loaded",
            options.themes.join(", "),
            loaded,
            options.langs.len()
        );

        Ok(Self {
            syntaxes,
            themes,
            grammars,
        })
    }

    /// Names of the loaded themes, primary first.
    pub fn theme_names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.name.as_str())
    }

    /// Whether blocks declaring `lang` can be highlighted.
    pub fn supports(&self, lang: &str) -> bool {
        self.loaded_syntax(lang).is_some()
    }

    fn loaded_syntax(&self, lang: &str) -> Option<&'static SyntaxReference> {
        find_syntax(self.syntaxes, lang).filter(|syntax| self.grammars.contains(&syntax.name))
    }

    fn syntax_for(&self, lang: &str) -> Result<&'static SyntaxReference, HighlightError> {
        self.loaded_syntax(lang)
            .ok_or_else(|| HighlightError::LanguageNotLoaded {
                lang: lang.to_string(),
            })
    }

    fn active_themes(&self, names: &[String]) -> Result<Vec<&LoadedTheme>, HighlightError> {
        if names.is_empty() {
            return Ok(self.themes.iter().take(1).collect());
        }
        names
            .iter()
            .map(|name| {
                self.themes
                    .iter()
                    .find(|t| &t.name == name)
                    .ok_or_else(|| HighlightError::ThemeNotLoaded { name: name.clone() })
            })
            .collect()
    }
}

impl HighlightEngine for SyntectEngine {
    fn code_to_html(
        &self,
        code: &str,
        lang: &str,
        themes: &[String],
    ) -> Result<String, HighlightError> {
        let syntax = self.syntax_for(lang)?;
        let active = self.active_themes(themes)?;

        let colors: Vec<ThemeColors<'_>> = active
            .iter()
            .map(|t| ThemeColors {
                name: &t.name,
                foreground: t.theme.settings.foreground.unwrap_or(Color::WHITE),
                background: t.theme.settings.background.unwrap_or(Color::BLACK),
            })
            .collect();
        let defaults: Vec<Style> = colors.iter().map(ThemeColors::default_style).collect();

        let highlighters: Vec<Highlighter<'_>> =
            active.iter().map(|t| Highlighter::new(&t.theme)).collect();
        let mut states: Vec<HighlightState> = highlighters
            .iter()
            .map(|h| HighlightState::new(h, ScopeStack::new()))
            .collect();
        let mut parse_state = ParseState::new(syntax);

        let mut lines: Vec<Vec<Token>> = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ops = parse_state
                .parse_line(line, self.syntaxes)
                .map_err(|source| HighlightError::Render {
                    lang: lang.to_string(),
                    source,
                })?;
            let per_theme: Vec<Vec<(Style, &str)>> = highlighters
                .iter()
                .zip(states.iter_mut())
                .map(|(highlighter, state)| {
                    HighlightIterator::new(state, &ops, line, highlighter).collect()
                })
                .collect();
            lines.push(html::align_line(line, &per_theme, &defaults));
        }
        if lines.is_empty() {
            lines.push(Vec::new());
        }

        Ok(html::render_pre(&colors, &lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fencelight_core::HighlightConfig;

    fn engine(langs: &[&str]) -> SyntectEngine {
        let options = HighlightConfig::with_theme("github-dark-default")
            .langs(langs.iter().copied())
            .resolve()
            .unwrap();
        SyntectEngine::new(&options).unwrap()
    }

    #[test]
    fn highlights_json_with_inline_styles() {
        let engine = engine(&["json"]);
        let html = engine.code_to_html(r#"{"a":1}"#, "json", &[]).unwrap();

        assert!(html.starts_with(
            r#"<pre class="shiki github-dark-default" style="background-color:#0D1117;color:#E6EDF3" tabindex="0"><code><span class="line">"#
        ));
        assert!(html.ends_with("</span></code></pre>"));
        assert!(html.contains("<span style=\"color:#"));
        assert!(html.contains("&quot;a&quot;") || html.contains("\"a\"") || html.contains(">a<"));
    }

    #[test]
    fn one_line_per_source_line() {
        let engine = engine(&["bash"]);
        let html = engine.code_to_html("echo a\necho b\n", "bash", &[]).unwrap();
        assert_eq!(html.matches(r#"<span class="line">"#).count(), 2);

        let empty = engine.code_to_html("", "bash", &[]).unwrap();
        assert!(empty.contains(r#"<code><span class="line"></span></code>"#));
    }

    #[test]
    fn escapes_source_text() {
        let engine = engine(&["text"]);
        let html = engine.code_to_html("<b> & </b>", "text", &[]).unwrap();
        assert!(html.contains("&lt;b&gt; &amp; &lt;/b&gt;"));
    }

    #[test]
    fn unloaded_language_is_an_error() {
        let engine = engine(&["json"]);
        assert!(engine.supports("JSON"));
        assert!(!engine.supports("python"));
        let err = engine.code_to_html("print(1)", "python", &[]).unwrap_err();
        assert!(matches!(err, HighlightError::LanguageNotLoaded { lang } if lang == "python"));
    }

    #[test]
    fn unknown_grammars_are_skipped_not_fatal() {
        let engine = engine(&["json", "not-a-real-language"]);
        assert!(engine.supports("json"));
        assert!(!engine.supports("not-a-real-language"));
    }

    #[test]
    fn block_languages_resolve_through_aliases() {
        let engine = engine(&["typescript", "bash", "javascript"]);
        for lang in ["ts", "TypeScript", "sh", "shell", "zsh", "js", "mjs"] {
            assert!(engine.supports(lang), "{lang} should resolve to a loaded grammar");
        }
        assert!(!engine.supports("json"));

        let html = engine.code_to_html("echo hi\n", "sh", &[]).unwrap();
        assert_eq!(html.matches(r#"<span class="line">"#).count(), 1);
    }

    #[test]
    fn secondary_themes_become_css_variables() {
        let options = HighlightConfig::default()
            .langs(["ts"])
            .resolve()
            .map(|mut o| {
                o.themes = vec!["github-light-default".into(), "github-dark-default".into()];
                o
            })
            .unwrap();
        let engine = SyntectEngine::new(&options).unwrap();
        let html = engine
            .code_to_html("const a = 1;", "ts", &options.themes)
            .unwrap();

        assert!(html.starts_with(
            r#"<pre class="shiki shiki-themes github-light-default github-dark-default" style="background-color:#FFFFFF;color:#1F2328;--shiki-github-dark-default:#E6EDF3;--shiki-github-dark-default-bg:#0D1117""#
        ));
        assert!(html.contains(";--shiki-github-dark-default:#"));
    }

    #[test]
    fn theme_outside_engine_is_rejected() {
        let engine = engine(&["json"]);
        let err = engine
            .code_to_html("{}", "json", &["InspiredGitHub".to_string()])
            .unwrap_err();
        assert!(matches!(err, HighlightError::ThemeNotLoaded { .. }));
    }

    #[test]
    fn missing_theme_fails_construction() {
        let options = HighlightConfig::with_theme("no-such-theme").resolve().unwrap();
        let err = SyntectEngine::new(&options).err().unwrap();
        assert!(err.is_configuration());
    }
}
