//! Caller-owned cache of engines keyed by configuration.

use crate::engine::SyntectEngine;
use crate::error::HighlightError;
use crate::transform::Highlighter;
use fencelight_core::{HighlightConfig, HighlightOptions};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EngineKey {
    themes: Vec<String>,
    langs: Vec<String>,
}

impl EngineKey {
    fn new(options: &HighlightOptions) -> Self {
        let mut langs = options.langs.clone();
        langs.sort();
        Self {
            themes: options.themes.clone(),
            langs,
        }
    }
}

/// Builds each distinct engine once and hands out shared handles.
///
/// The map lock only guards slot lookup. Each configuration has its own
/// slot, so concurrent requests for the same configuration wait for one
/// build while other configurations stay available.
#[derive(Default)]
pub struct EngineCache {
    engines: Mutex<HashMap<EngineKey, Arc<OnceCell<Arc<SyntectEngine>>>>>,
}

impl EngineCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the engine for `options`, building it on first use.
    ///
    /// A failed build leaves the slot empty, so the next request retries.
    pub fn engine(&self, options: &HighlightOptions) -> Result<Arc<SyntectEngine>, HighlightError> {
        let key = EngineKey::new(options);
        let slot = {
            let mut engines = self.engines.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(engines.entry(key).or_default())
        };
        if let Some(engine) = slot.get() {
            log::debug!("Reusing highlighter for themes [{}]", options.themes.join(", "));
            return Ok(Arc::clone(engine));
        }
        slot.get_or_try_init(|| SyntectEngine::new(options).map(Arc::new))
            .map(Arc::clone)
    }

    /// Resolves `config` and returns a highlighter backed by a cached engine.
    pub fn highlighter(&self, config: &HighlightConfig) -> Result<Highlighter, HighlightError> {
        let options = config.resolve()?;
        let engine = self.engine(&options)?;
        Ok(Highlighter::with_engine(engine, options))
    }

    /// Number of engines built so far.
    pub fn len(&self) -> usize {
        self.engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Whether no engine has been built yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
