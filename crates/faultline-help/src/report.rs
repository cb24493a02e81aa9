//! Failure reports for a reporting layer
//!
//! A [`Report`] bundles what an operator or end user needs about one failure:
//! the resolved help text, the classification, the detailed technical message
//! and the structured dump of the whole cause graph.

use crate::registry::HelpTextRegistry;
use crate::resolve::ResolutionSource;
use faultline_core::{AnyFailure, CallContext, DumpNode, Dumpable, FailureKind};
use serde::Serialize;

/// Report errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Report could not be serialized
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serializable description of one failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Qualified classification name
    pub classification: String,
    /// Taxonomy kind, absent for foreign failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    /// Help text rendered for the end user
    pub help_text: String,
    /// Step that produced the help text
    pub help_source: ResolutionSource,
    /// Detailed technical message
    pub technical_message: String,
    /// Structured dump
    pub dump: DumpNode,
}

impl Report {
    /// Full report including backtraces and step traces
    #[must_use]
    pub fn build(cx: &CallContext, registry: &HelpTextRegistry, failure: &AnyFailure) -> Self {
        Self::with_dump(cx, registry, failure, DumpNode::new("Failure"))
    }

    /// Report whose dump omits backtraces and step traces
    #[must_use]
    pub fn build_redacted(
        cx: &CallContext,
        registry: &HelpTextRegistry,
        failure: &AnyFailure,
    ) -> Self {
        Self::with_dump(cx, registry, failure, DumpNode::without_technical("Failure"))
    }

    fn with_dump(
        cx: &CallContext,
        registry: &HelpTextRegistry,
        failure: &AnyFailure,
        mut dump: DumpNode,
    ) -> Self {
        let resolution = registry.resolve_traced(cx, failure);
        failure.dump(&mut dump);
        Self {
            classification: failure.classification().qualified_name().into_owned(),
            kind: failure.kind(),
            help_text: resolution.text.render(cx),
            help_source: resolution.source,
            technical_message: failure.message(true),
            dump,
        }
    }

    /// Serialize as pretty-printed JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Log the report at error level
    pub fn log(&self) {
        tracing::error!(
            classification = %self.classification,
            help = %self.help_text,
            technical = %self.technical_message,
            "failure reported"
        );
    }
}
