//! Help text resolution
//!
//! Resolution is total: every failure gets non-empty help text. The first
//! step that yields a non-empty message wins:
//!
//! 1. explicit help text on the failure
//! 2. the storage layer's "no transaction" condition, for foreign failures
//! 3. direct text registered for the exact classification
//! 4. a translator registered for the exact classification
//! 5. text generated from the configured fallback template

use crate::registry::HelpTextRegistry;
use crate::translator::TranslationContext;
use faultline_core::config::{self, DEFAULT_FALLBACK_TEMPLATE};
use faultline_core::{AnyFailure, CallContext, Message};
use serde::{Deserialize, Serialize};

/// Display text by which the storage layer reports a missing transaction
///
/// Matched literally; a reworded driver message silently disables step 2.
pub const NO_TRANSACTION_MESSAGE: &str = "No transaction is currently active";

/// Step that produced a resolved help text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Help text supplied when the failure was built
    Explicit,
    /// Foreign "no transaction" condition
    ForeignCondition,
    /// Direct text rule
    DirectText,
    /// Translator rule
    Translator,
    /// Generated from the fallback template
    Fallback,
}

/// Resolved help text and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Help text, never empty
    pub text: Message,
    /// Producing step
    pub source: ResolutionSource,
}

impl HelpTextRegistry {
    /// Help text for `failure`
    #[must_use]
    pub fn resolve(&self, cx: &CallContext, failure: &AnyFailure) -> Message {
        self.resolve_traced(cx, failure).text
    }

    /// Help text for `failure`, rendered through the context's catalog
    #[must_use]
    pub fn resolve_text(&self, cx: &CallContext, failure: &AnyFailure) -> String {
        self.resolve(cx, failure).render(cx)
    }

    /// Help text for `failure` together with the step that produced it
    #[must_use]
    pub fn resolve_traced(&self, cx: &CallContext, failure: &AnyFailure) -> Resolution {
        let classification = failure.classification();
        let found = |text: Message, source: ResolutionSource| {
            tracing::debug!(%classification, ?source, "resolved help text");
            Resolution { text, source }
        };

        if let Some(help) = failure.help_text().filter(|m| !is_blank(cx, m)) {
            return found(help.clone(), ResolutionSource::Explicit);
        }

        if matches!(failure, AnyFailure::Foreign(_))
            && failure.message(false) == NO_TRANSACTION_MESSAGE
        {
            if let Some(text) = self.non_empty_text(cx, &classification) {
                return found(text, ResolutionSource::ForeignCondition);
            }
        }

        if let Some(text) = self.non_empty_text(cx, &classification) {
            return found(text, ResolutionSource::DirectText);
        }

        if let Some(translator) = self.translator_for(&classification) {
            let tcx = TranslationContext::new(cx, self);
            match translator.translate(&tcx, failure) {
                Some(text) if !is_blank(cx, &text) => {
                    return found(text, ResolutionSource::Translator);
                }
                _ => tracing::debug!(%classification, "translator produced no help text"),
            }
        }

        found(fallback(failure), ResolutionSource::Fallback)
    }

    fn non_empty_text(
        &self,
        cx: &CallContext,
        classification: &faultline_core::Classification,
    ) -> Option<Message> {
        self.text_for(classification).filter(|m| !is_blank(cx, m))
    }
}

/// Blank once translated and substituted for `cx`
fn is_blank(cx: &CallContext, text: &Message) -> bool {
    text.render(cx).trim().is_empty()
}

/// Generated help text naming the classification and the raw technical message
#[must_use]
pub fn fallback(failure: &AnyFailure) -> Message {
    let template = config::current().fallback_template.clone();
    let text = Message::new(template)
        .with("class", failure.classification().short_name())
        .with("message", failure.message(false));
    if text.is_empty() {
        return Message::new(DEFAULT_FALLBACK_TEMPLATE)
            .with("class", failure.classification().short_name())
            .with("message", failure.message(false));
    }
    text
}
