//! Grammar bundle and language identifier resolution.

use once_cell::sync::Lazy;
use syntect::parsing::{SyntaxReference, SyntaxSet};

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(two_face::syntax::extra_newlines);

/// Identifiers rendered with the plain-text grammar.
const PLAIN_TEXT: &[&str] = &["text", "txt", "plain", "plaintext"];

/// Shiki-style identifiers mapped to a token the grammar bundle knows.
const ALIASES: &[(&str, &str)] = &[
    ("javascript", "js"),
    ("cjs", "js"),
    ("mjs", "js"),
    ("typescript", "ts"),
    ("angular-ts", "ts"),
    ("cts", "ts"),
    ("mts", "ts"),
    ("shell", "bash"),
    ("shellscript", "bash"),
    ("sh", "bash"),
    ("zsh", "bash"),
    ("docker", "Dockerfile"),
    ("dockerfile", "Dockerfile"),
    ("yml", "yaml"),
    ("markdown", "md"),
    ("rust", "rs"),
    ("python", "py"),
    ("ruby", "rb"),
    ("csharp", "cs"),
    ("c#", "cs"),
    ("c++", "cpp"),
];

/// The grammar bundle shared by every engine in the process.
pub fn syntax_set() -> &'static SyntaxSet {
    &SYNTAXES
}

/// Finds the grammar for a language identifier, honoring aliases.
pub fn find_syntax<'a>(set: &'a SyntaxSet, lang: &str) -> Option<&'a SyntaxReference> {
    let lang = lang.trim().to_ascii_lowercase();
    if PLAIN_TEXT.contains(&lang.as_str()) {
        return Some(set.find_syntax_plain_text());
    }

    let token = ALIASES
        .iter()
        .find(|(alias, _)| *alias == lang)
        .map(|(_, token)| *token)
        .unwrap_or(lang.as_str());

    set.find_syntax_by_token(token)
        .or_else(|| set.find_syntax_by_token(&lang))
        .or_else(|| {
            set.syntaxes()
                .iter()
                .find(|syntax| syntax.name.eq_ignore_ascii_case(&lang))
        })
}
