//! Translators: help text computed from the failure itself
//!
//! A direct-text rule maps a classification to a fixed message. When the
//! right help depends on the failure's content or its causes, register a
//! [`Translator`] instead.

use crate::registry::HelpTextRegistry;
use faultline_core::{AnyFailure, CallContext, Message};
use std::fmt::{self, Debug, Formatter};

/// Everything a translator may consult besides the failure
#[derive(Debug, Clone, Copy)]
pub struct TranslationContext<'a> {
    call: &'a CallContext,
    registry: &'a HelpTextRegistry,
}

impl<'a> TranslationContext<'a> {
    pub(crate) fn new(call: &'a CallContext, registry: &'a HelpTextRegistry) -> Self {
        Self { call, registry }
    }

    /// Ambient call context
    #[inline]
    #[must_use]
    pub fn call_context(&self) -> &'a CallContext {
        self.call
    }

    /// Registry performing the resolution
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &'a HelpTextRegistry {
        self.registry
    }

    /// Full resolution of another failure, e.g. a cause
    #[must_use]
    pub fn resolve(&self, failure: &AnyFailure) -> Message {
        self.registry.resolve(self.call, failure)
    }
}

/// Computes help text for failures of one classification
pub trait Translator: Send + Sync {
    /// Help text for `failure`, or `None` to fall through to the generated text
    fn translate(&self, cx: &TranslationContext<'_>, failure: &AnyFailure) -> Option<Message>;
}

/// Adapter turning a closure into a [`Translator`]
pub struct FnTranslator<F>(F);

impl<F> FnTranslator<F>
where
    F: Fn(&TranslationContext<'_>, &AnyFailure) -> Option<Message> + Send + Sync,
{
    /// Wrap `f`
    #[inline]
    #[must_use]
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Translator for FnTranslator<F>
where
    F: Fn(&TranslationContext<'_>, &AnyFailure) -> Option<Message> + Send + Sync,
{
    fn translate(&self, cx: &TranslationContext<'_>, failure: &AnyFailure) -> Option<Message> {
        (self.0)(cx, failure)
    }
}

impl<F> Debug for FnTranslator<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("FnTranslator")
    }
}

/// Uses the help text of the failure's first cause
///
/// For wrapper failures whose own classification says nothing useful to an
/// end user. Produces nothing when the failure has no cause.
#[derive(Debug, Clone, Copy, Default)]
pub struct CauseTranslator;

impl Translator for CauseTranslator {
    fn translate(&self, cx: &TranslationContext<'_>, failure: &AnyFailure) -> Option<Message> {
        failure.cause().map(|cause| cx.resolve(cause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::{ReturnCode, Unrecoverable};

    #[test]
    fn cause_translator_without_cause() {
        let registry = HelpTextRegistry::new();
        let call = CallContext::new();
        let cx = TranslationContext::new(&call, &registry);
        let failure: AnyFailure = Unrecoverable::limitation("x").into();
        assert!(CauseTranslator.translate(&cx, &failure).is_none());
    }

    #[test]
    fn cause_translator_resolves_cause() {
        let registry = HelpTextRegistry::new();
        registry.register_text(faultline_core::FailureKind::SecurityViolation, "Access denied.");
        let call = CallContext::new();
        let cx = TranslationContext::new(&call, &registry);

        let failure: AnyFailure = ReturnCode::new("wrapped")
            .caused_by(Unrecoverable::security_violation("no token"))
            .into();
        let text = CauseTranslator.translate(&cx, &failure).unwrap();
        assert_eq!(text.to_string(), "Access denied.");
    }

    #[test]
    fn closures_translate() {
        let translator = FnTranslator::new(|_cx: &TranslationContext<'_>, failure: &AnyFailure| {
            Some(Message::new("saw %(m)").with("m", failure.message(false)))
        });
        let registry = HelpTextRegistry::new();
        let call = CallContext::new();
        let cx = TranslationContext::new(&call, &registry);
        let failure: AnyFailure = Unrecoverable::limitation("x").into();
        assert_eq!(
            translator.translate(&cx, &failure).unwrap().to_string(),
            "saw x"
        );
    }
}
