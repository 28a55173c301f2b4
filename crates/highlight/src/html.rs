//! HTML emission for highlighted and fallback code blocks.

use std::collections::BTreeSet;
use std::fmt::Write;
use syntect::highlighting::{Color, FontStyle, Style};

/// Class of the wrapper emitted for blocks without a declared language.
pub const FALLBACK_CLASS: &str = "shiki-unknown";

/// Wraps raw text in the generic, unhighlighted container.
pub fn fallback_html(code: &str) -> String {
    format!(
        r#"<pre class="{FALLBACK_CLASS}"><code>{}</code></pre>"#,
        html_escape::encode_text(code)
    )
}

/// Palette-level colors of one active theme.
#[derive(Debug, Clone)]
pub(crate) struct ThemeColors<'a> {
    pub name: &'a str,
    pub foreground: Color,
    pub background: Color,
}

impl ThemeColors<'_> {
    /// Style applied to text no scope rule matched.
    pub fn default_style(&self) -> Style {
        Style {
            foreground: self.foreground,
            background: self.background,
            font_style: FontStyle::empty(),
        }
    }
}

/// A run of text styled identically under every active theme.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub text: String,
    /// One style per active theme, in theme order.
    pub styles: Vec<Style>,
}

/// Merges per-theme tokenizations of one line into tokens on shared boundaries.
///
/// Every entry of `per_theme` must cover `line` exactly. The line terminator
/// is dropped.
pub(crate) fn align_line(
    line: &str,
    per_theme: &[Vec<(Style, &str)>],
    defaults: &[Style],
) -> Vec<Token> {
    let content_len = line.trim_end_matches(['\n', '\r']).len();

    let mut cuts = BTreeSet::from([0, content_len]);
    let ranges: Vec<Vec<(usize, usize, Style)>> = per_theme
        .iter()
        .map(|pieces| {
            let mut offset = 0;
            pieces
                .iter()
                .map(|(style, text)| {
                    let start = offset;
                    offset += text.len();
                    if offset < content_len {
                        cuts.insert(offset);
                    }
                    (start, offset, *style)
                })
                .collect()
        })
        .collect();

    let cuts: Vec<usize> = cuts.into_iter().collect();
    let mut tokens: Vec<Token> = Vec::new();
    for window in cuts.windows(2) {
        let (start, end) = (window[0], window[1]);
        if start == end {
            continue;
        }
        let styles: Vec<Style> = ranges
            .iter()
            .zip(defaults)
            .map(|(theme_ranges, fallback)| {
                theme_ranges
                    .iter()
                    .find(|(s, e, _)| *s <= start && start < *e)
                    .map(|(_, _, style)| *style)
                    .unwrap_or(*fallback)
            })
            .collect();
        let text = &line[start..end];
        match tokens.last_mut() {
            Some(last) if last.styles == styles => last.text.push_str(text),
            _ => tokens.push(Token {
                text: text.to_string(),
                styles,
            }),
        }
    }
    tokens
}

/// Renders tokenized lines as a shiki-compatible `<pre>` fragment.
pub(crate) fn render_pre(themes: &[ThemeColors<'_>], lines: &[Vec<Token>]) -> String {
    let mut out = String::new();
    out.push_str(r#"<pre class="shiki"#);
    if themes.len() > 1 {
        out.push_str(" shiki-themes");
    }
    for theme in themes {
        out.push(' ');
        out.push_str(&css_ident(theme.name));
    }
    out.push_str(r#"" style=""#);
    if let Some((primary, rest)) = themes.split_first() {
        let _ = write!(
            out,
            "background-color:{};color:{}",
            css_color(primary.background),
            css_color(primary.foreground)
        );
        for theme in rest {
            let ident = css_ident(theme.name);
            let _ = write!(
                out,
                ";--shiki-{ident}:{};--shiki-{ident}-bg:{}",
                css_color(theme.foreground),
                css_color(theme.background)
            );
        }
    }
    out.push_str(r#"" tabindex="0"><code>"#);

    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(r#"<span class="line">"#);
        for token in line {
            render_token(&mut out, themes, token);
        }
        out.push_str("</span>");
    }

    out.push_str("</code></pre>");
    out
}

fn render_token(out: &mut String, themes: &[ThemeColors<'_>], token: &Token) {
    let Some((primary, rest)) = token.styles.split_first() else {
        out.push_str(&html_escape::encode_text(&token.text));
        return;
    };

    let _ = write!(out, r#"<span style="color:{}"#, css_color(primary.foreground));
    if primary.font_style.contains(FontStyle::ITALIC) {
        out.push_str(";font-style:italic");
    }
    if primary.font_style.contains(FontStyle::BOLD) {
        out.push_str(";font-weight:bold");
    }
    if primary.font_style.contains(FontStyle::UNDERLINE) {
        out.push_str(";text-decoration:underline");
    }
    for (theme, style) in themes.iter().skip(1).zip(rest) {
        let _ = write!(
            out,
            ";--shiki-{}:{}",
            css_ident(theme.name),
            css_color(style.foreground)
        );
    }
    out.push_str(r#"">"#);
    out.push_str(&html_escape::encode_text(&token.text));
    out.push_str("</span>");
}

/// `#RRGGBB`, or `#RRGGBBAA` when translucent.
pub(crate) fn css_color(color: Color) -> String {
    if color.a == 0xFF {
        format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
    } else {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            color.r, color.g, color.b, color.a
        )
    }
}

/// Theme name made safe for class names and custom property names.
pub(crate) fn css_ident(name: &str) -> String {
    let mut ident = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            ident.push(c.to_ascii_lowercase());
        } else if !ident.ends_with('-') {
            ident.push('-');
        }
    }
    ident.trim_matches('-').to_string()
}
