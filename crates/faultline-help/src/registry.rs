//! Help text registry
//!
//! Maps exact classifications to help text rules. Lookup never walks the
//! taxonomy: a rule for `EnvironmentError` does not apply to a
//! `ConfigurationError`.

use crate::translator::{FnTranslator, TranslationContext, Translator};
use dashmap::DashMap;
use faultline_core::{AnyFailure, Classification, Message};
use once_cell::sync::Lazy;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

static GLOBAL: Lazy<HelpTextRegistry> = Lazy::new(HelpTextRegistry::new);

/// Concurrent registry of help text rules
///
/// Registration is last-write-wins per classification and never fails. Rules
/// are never removed.
#[derive(Default)]
pub struct HelpTextRegistry {
    texts: DashMap<Classification, Message>,
    translators: DashMap<Classification, Arc<dyn Translator>>,
}

impl HelpTextRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Register fixed help text for exactly `classification`
    pub fn register_text(&self, classification: impl Into<Classification>, text: impl Into<Message>) {
        let classification = classification.into();
        let text = text.into();
        tracing::debug!(%classification, template = text.template(), "registering help text");
        self.texts.insert(classification, text);
    }

    /// Register a translator for exactly `classification`
    pub fn register_translator(
        &self,
        classification: impl Into<Classification>,
        translator: impl Translator + 'static,
    ) {
        self.register_shared_translator(classification, Arc::new(translator));
    }

    /// Register an already shared translator, e.g. one used for several classifications
    pub fn register_shared_translator(
        &self,
        classification: impl Into<Classification>,
        translator: Arc<dyn Translator>,
    ) {
        let classification = classification.into();
        tracing::debug!(%classification, "registering help translator");
        self.translators.insert(classification, translator);
    }

    /// Register a closure as translator
    pub fn register_translator_fn<F>(&self, classification: impl Into<Classification>, f: F)
    where
        F: Fn(&TranslationContext<'_>, &AnyFailure) -> Option<Message> + Send + Sync + 'static,
    {
        self.register_translator(classification, FnTranslator::new(f));
    }

    /// Direct help text registered for `classification`
    #[must_use]
    pub fn text_for(&self, classification: &Classification) -> Option<Message> {
        self.texts.get(classification).map(|entry| entry.value().clone())
    }

    /// Translator registered for `classification`
    ///
    /// Cloned out of the map so no lock is held while it runs.
    #[must_use]
    pub fn translator_for(&self, classification: &Classification) -> Option<Arc<dyn Translator>> {
        self.translators
            .get(classification)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Check if direct help text exists for `classification`
    #[inline]
    #[must_use]
    pub fn has_text(&self, classification: &Classification) -> bool {
        self.texts.contains_key(classification)
    }

    /// Check if a translator exists for `classification`
    #[inline]
    #[must_use]
    pub fn has_translator(&self, classification: &Classification) -> bool {
        self.translators.contains_key(classification)
    }

    /// Number of registered rules of both sorts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len() + self.translators.len()
    }

    /// Check if no rule is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.translators.is_empty()
    }
}

impl Debug for HelpTextRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpTextRegistry")
            .field("texts", &self.texts.len())
            .field("translators", &self.translators.len())
            .finish()
    }
}
