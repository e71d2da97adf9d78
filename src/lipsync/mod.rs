//! Text → viseme conversion.
//!
//! Each supported language provides a [`LipsyncProcessor`]: a text normalizer
//! plus a letter-to-sound engine that turns one word into a relative viseme
//! timeline. Processors are looked up by language code through a
//! [`LanguageRegistry`].

pub mod converter;
pub mod english;
pub mod normalize;
pub mod numbers;
pub mod rules;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{LipsyncError, Result};

pub use converter::{MERGE_DURATION_WEIGHT, WordVisemeResult};
pub use english::EnglishProcessor;

/// Per-language text analysis.
pub trait LipsyncProcessor: Send + Sync {
    /// Language code this processor handles (e.g. `"en"`).
    fn language(&self) -> &str;

    /// Canonicalize raw text for phonetic analysis.
    ///
    /// Must be idempotent: `normalize(normalize(x)) == normalize(x)`.
    fn normalize(&self, raw: &str, expand_numbers: bool) -> String;

    /// Convert one normalized word to a relative viseme timeline.
    ///
    /// Returns `None` when the word yields no visemes.
    fn word_to_visemes(&self, word: &str) -> Option<WordVisemeResult>;
}

/// Processors keyed by language code.
#[derive(Default)]
pub struct LanguageRegistry {
    processors: HashMap<String, Arc<dyn LipsyncProcessor>>,
}

impl LanguageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in language registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in rule table fails to compile.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(EnglishProcessor::new()?));
        Ok(registry)
    }

    /// Register a processor. Replaces any existing processor for the same language.
    pub fn register(&mut self, processor: Arc<dyn LipsyncProcessor>) {
        self.processors
            .insert(processor.language().to_owned(), processor);
    }

    /// Processor for `language`, if registered.
    pub fn get(&self, language: &str) -> Option<Arc<dyn LipsyncProcessor>> {
        self.processors.get(language).cloned()
    }

    /// Like [`get`](Self::get), but an unknown language is an error.
    ///
    /// # Errors
    ///
    /// Returns [`LipsyncError::UnknownLanguage`] if nothing is registered for `language`.
    pub fn require(&self, language: &str) -> Result<Arc<dyn LipsyncProcessor>> {
        self.get(language)
            .ok_or_else(|| LipsyncError::UnknownLanguage(language.to_owned()))
    }

    /// Registered language codes, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.processors.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

impl std::fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageRegistry")
            .field("languages", &self.languages())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    struct Silent;

    impl LipsyncProcessor for Silent {
        fn language(&self) -> &str {
            "xx"
        }

        fn normalize(&self, raw: &str, _expand_numbers: bool) -> String {
            raw.to_owned()
        }

        fn word_to_visemes(&self, _word: &str) -> Option<WordVisemeResult> {
            None
        }
    }

    #[test]
    fn defaults_include_english() {
        let registry = LanguageRegistry::with_defaults().unwrap();
        assert_eq!(registry.languages(), vec!["en"]);
        assert_eq!(registry.require("en").unwrap().language(), "en");
    }

    #[test]
    fn unknown_language_is_an_error() {
        let registry = LanguageRegistry::with_defaults().unwrap();
        assert!(registry.get("fr").is_none());
        match registry.require("fr") {
            Err(LipsyncError::UnknownLanguage(lang)) => assert_eq!(lang, "fr"),
            other => panic!("expected UnknownLanguage, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn register_adds_and_replaces() {
        let mut registry = LanguageRegistry::with_defaults().unwrap();
        registry.register(Arc::new(Silent));
        assert_eq!(registry.languages(), vec!["en", "xx"]);
        registry.register(Arc::new(Silent));
        assert_eq!(registry.languages().len(), 2);
        assert!(registry.require("xx").unwrap().word_to_visemes("A").is_none());
    }
}
