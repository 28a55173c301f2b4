//! The code block highlighting transform.

use crate::engine::{HighlightEngine, SyntectEngine};
use crate::error::HighlightError;
use crate::html::fallback_html;
use fencelight_core::{CodeBlock, Document, HighlightConfig, HighlightOptions, Node, select_code};
use rayon::prelude::*;
use std::sync::Arc;

/// Counts reported by [`Highlighter::highlight_in_place`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightSummary {
    /// Blocks rendered by the engine.
    pub highlighted: usize,
    /// Blocks rendered with the fallback wrapper.
    pub fallback: usize,
}

impl HighlightSummary {
    /// Total number of code blocks replaced.
    pub fn total(&self) -> usize {
        self.highlighted + self.fallback
    }
}

/// Replaces `code` nodes with pre-rendered HTML.
///
/// Holds a fully constructed engine, so creating a `Highlighter` is where
/// theme and grammar loading happens and where configuration errors surface.
/// It is cheap to clone and can be shared across threads.
#[derive(Clone)]
pub struct Highlighter {
    engine: Arc<dyn HighlightEngine>,
    options: HighlightOptions,
}

impl Highlighter {
    /// Resolves `config` and builds a syntect engine for it.
    pub fn new(config: &HighlightConfig) -> Result<Self, HighlightError> {
        let options = config.resolve()?;
        let engine = SyntectEngine::new(&options)?;
        Ok(Self::with_engine(Arc::new(engine), options))
    }

    /// Uses an existing engine.
    pub fn with_engine(engine: Arc<dyn HighlightEngine>, options: HighlightOptions) -> Self {
        Self { engine, options }
    }

    /// The resolved options.
    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Transforms `document`, passing an absent document through untouched.
    pub fn highlight(&self, document: Option<Document>) -> Result<Option<Document>, HighlightError> {
        match document {
            None => Ok(None),
            Some(mut doc) => {
                self.highlight_in_place(&mut doc)?;
                Ok(Some(doc))
            }
        }
    }

    /// Replaces every reachable `code` node of `doc` with an `html` node.
    ///
    /// All blocks are rendered before any node is replaced, so on error the
    /// document is left exactly as it was.
    pub fn highlight_in_place(&self, doc: &mut Document) -> Result<HighlightSummary, HighlightError> {
        let jobs: Vec<_> = select_code(doc)
            .into_iter()
            .filter_map(|id| doc[id].as_code().map(|block| (id, block)))
            .collect();
        if jobs.is_empty() {
            return Ok(HighlightSummary::default());
        }

        let fallback = jobs.iter().filter(|(_, b)| b.lang.is_none()).count();
        let summary = HighlightSummary {
            highlighted: jobs.len() - fallback,
            fallback,
        };

        let rendered: Vec<_> = if self.options.parallel {
            jobs.par_iter()
                .map(|(id, block)| self.render_block(block).map(|html| (*id, html)))
                .collect::<Result<_, _>>()?
        } else {
            jobs.iter()
                .map(|(id, block)| self.render_block(block).map(|html| (*id, html)))
                .collect::<Result<_, _>>()?
        };

        for (id, html) in rendered {
            doc.replace_with(id, |old| {
                let mut fields = old.fields;
                fields.remove("children");
                Node::html(html).with_fields(fields)
            })?;
        }

        log::debug!(
            "Highlighted {} code blocks ({} without a language)",
            summary.total(),
            summary.fallback
        );
        Ok(summary)
    }

    /// Renders one block: the engine for declared languages, the fallback
    /// wrapper otherwise.
    pub fn render_block(&self, block: &CodeBlock) -> Result<String, HighlightError> {
        match block.language() {
            Some(lang) => self
                .engine
                .code_to_html(&block.value, lang, &self.options.themes),
            None => Ok(fallback_html(&block.value)),
        }
    }
}

/// Highlights `document` with a highlighter built from `config`.
///
/// An absent document is returned as-is without loading anything. Otherwise
/// the engine is built first, and a configuration error aborts before any
/// node is touched.
pub fn highlight(
    document: Option<Document>,
    config: &HighlightConfig,
) -> Result<Option<Document>, HighlightError> {
    if document.is_none() {
        return Ok(None);
    }
    Highlighter::new(config)?.highlight(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fencelight_core::NodeKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records calls and echoes its input.
    #[derive(Default)]
    struct EchoEngine {
        calls: AtomicUsize,
    }

    impl HighlightEngine for EchoEngine {
        fn code_to_html(
            &self,
            code: &str,
            lang: &str,
            themes: &[String],
        ) -> Result<String, HighlightError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if lang == "broken" {
                return Err(HighlightError::LanguageNotLoaded {
                    lang: lang.to_string(),
                });
            }
            Ok(format!("[{lang}|{}]{code}", themes.join(",")))
        }
    }

    fn doc_with(blocks: Vec<CodeBlock>) -> Document {
        let mut doc = Document::root_document();
        let root = doc.root();
        for block in blocks {
            doc.append_child(root, Node::code(block)).unwrap();
        }
        doc
    }

    fn echo_highlighter(parallel: bool) -> (Arc<EchoEngine>, Highlighter) {
        let engine = Arc::new(EchoEngine::default());
        let options = HighlightOptions {
            parallel,
            ..HighlightOptions::default()
        };
        (engine.clone(), Highlighter::with_engine(engine, options))
    }

    #[test]
    fn declared_languages_go_through_the_engine() {
        let (engine, highlighter) = echo_highlighter(false);
        let mut doc = doc_with(vec![CodeBlock::new("x = 1").with_lang("ts")]);

        let summary = highlighter.highlight_in_place(&mut doc).unwrap();
        assert_eq!(summary, HighlightSummary { highlighted: 1, fallback: 0 });
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);

        let id = doc.children(doc.root())[0];
        assert_eq!(doc[id].as_html(), Some("[ts|github-dark-default]x = 1"));
        assert!(doc[id].children.is_empty());
    }

    #[test]
    fn missing_language_skips_the_engine() {
        let (engine, highlighter) = echo_highlighter(false);
        let mut doc = doc_with(vec![CodeBlock::new("echo hi")]);

        highlighter.highlight_in_place(&mut doc).unwrap();
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
        let id = doc.children(doc.root())[0];
        assert_eq!(
            doc[id].kind,
            NodeKind::Html(r#"<pre class="shiki-unknown"><code>echo hi</code></pre>"#.into())
        );
    }

    #[test]
    fn engine_errors_leave_document_untouched() {
        let (_, highlighter) = echo_highlighter(false);
        let mut doc = doc_with(vec![
            CodeBlock::new("fine").with_lang("ts"),
            CodeBlock::new("bad").with_lang("broken"),
        ]);
        let before = doc.clone();

        let err = highlighter.highlight_in_place(&mut doc).unwrap_err();
        assert!(matches!(err, HighlightError::LanguageNotLoaded { .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn parallel_rendering_matches_sequential() {
        let blocks: Vec<CodeBlock> = (0..32)
            .map(|i| {
                let block = CodeBlock::new(format!("line {i}"));
                if i % 3 == 0 { block } else { block.with_lang("ts") }
            })
            .collect();

        let (_, sequential) = echo_highlighter(false);
        let (_, parallel) = echo_highlighter(true);
        let mut a = doc_with(blocks.clone());
        let mut b = doc_with(blocks);

        assert_eq!(
            sequential.highlight_in_place(&mut a).unwrap(),
            parallel.highlight_in_place(&mut b).unwrap()
        );
        assert_eq!(a, b);
    }

    #[test]
    fn absent_document_is_passed_through() {
        let (engine, highlighter) = echo_highlighter(false);
        assert_eq!(highlighter.highlight(None).unwrap(), None);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);

        let config = HighlightConfig::with_theme("no-such-theme");
        assert_eq!(highlight(None, &config).unwrap(), None);
    }
}
