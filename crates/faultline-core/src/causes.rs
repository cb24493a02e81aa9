//! Ordered cause collections
//!
//! Recoverable failures may accumulate several independent causes over their
//! lifetime, e.g. a rollback touching several subsystems. [`CauseList`] keeps
//! them in insertion order; it only grows.

use crate::config;
use crate::failure::AnyFailure;
use std::fmt::Display;

/// Append-only, insertion-ordered list of causes
#[derive(Debug, Default)]
pub struct CauseList {
    causes: Vec<AnyFailure>,
}

impl CauseList {
    /// Empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List holding `cause`, or empty for `None`
    #[must_use]
    pub fn from_optional(cause: Option<AnyFailure>) -> Self {
        Self {
            causes: cause.into_iter().collect(),
        }
    }

    /// Append a cause
    #[inline]
    pub fn push(&mut self, cause: AnyFailure) {
        self.causes.push(cause);
    }

    /// All causes, in insertion order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[AnyFailure] {
        &self.causes
    }

    /// Number of causes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.causes.len()
    }

    /// True without causes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, AnyFailure> {
        self.causes.iter()
    }

    /// First cause, for single-cause views
    ///
    /// When more than one cause exists the others are lost to the caller, so a
    /// warning naming every cause is logged (unless disabled in the config).
    #[must_use]
    pub fn first_reported(&self, owner: &dyn Display) -> Option<&AnyFailure> {
        if self.causes.len() > 1 && config::current().warn_on_ambiguous_cause {
            let listed: Vec<String> = self.causes.iter().map(ToString::to_string).collect();
            tracing::warn!(
                failure = %owner,
                count = self.causes.len(),
                causes = ?listed,
                "failure has more than one cause, cannot report only the first"
            );
        }
        self.causes.first()
    }

    /// Rendering appended to detailed messages; empty without causes
    #[must_use]
    pub fn render(&self) -> String {
        if self.causes.is_empty() {
            return String::new();
        }
        let rendered: Vec<String> = self.causes.iter().map(ToString::to_string).collect();
        format!("\n[causes: {}]", rendered.join(",\n"))
    }
}

impl<'a> IntoIterator for &'a CauseList {
    type Item = &'a AnyFailure;
    type IntoIter = std::slice::Iter<'a, AnyFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.iter()
    }
}
