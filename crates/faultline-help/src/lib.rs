//! Faultline Help - end-user help text for failures
//!
//! Developers attach help text to failures where they know what to tell the
//! user. Everywhere else the registry derives it:
//! - fixed text registered per exact classification
//! - translators that compute it from the failure or its causes
//! - a generated fallback, so the user always sees something
//!
//! # Example
//!
//! ```rust
//! use faultline_core::{AnyFailure, CallContext, FailureKind, Unrecoverable};
//! use faultline_help::HelpTextRegistry;
//!
//! let registry = HelpTextRegistry::new();
//! registry.register_text(FailureKind::InstallationError, "Please reinstall the application.");
//!
//! let failure: AnyFailure = Unrecoverable::installation_error("libfoo.so missing").into();
//! let help = registry.resolve_text(&CallContext::new(), &failure);
//! assert_eq!(help, "Please reinstall the application.");
//! ```

#![warn(unreachable_pub)]

pub mod registry;
pub mod report;
pub mod resolve;
pub mod translator;

// Re-exports for convenience
pub use registry::HelpTextRegistry;
pub use report::{Report, ReportError};
pub use resolve::{fallback, Resolution, ResolutionSource, NO_TRANSACTION_MESSAGE};
pub use translator::{CauseTranslator, FnTranslator, TranslationContext, Translator};

use faultline_core::{AnyFailure, CallContext, Classification, Message};

/// Register fixed help text in the process-wide registry
pub fn register_text(classification: impl Into<Classification>, text: impl Into<Message>) {
    HelpTextRegistry::global().register_text(classification, text);
}

/// Register a translator in the process-wide registry
pub fn register_translator(
    classification: impl Into<Classification>,
    translator: impl Translator + 'static,
) {
    HelpTextRegistry::global().register_translator(classification, translator);
}

/// Resolve help text through the process-wide registry
#[must_use]
pub fn resolve(cx: &CallContext, failure: &AnyFailure) -> Message {
    HelpTextRegistry::global().resolve(cx, failure)
}

/// Resolve and render help text through the process-wide registry
#[must_use]
pub fn resolve_text(cx: &CallContext, failure: &AnyFailure) -> String {
    HelpTextRegistry::global().resolve_text(cx, failure)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
