//! Logical call steps and diagnostic snapshots
//!
//! Code announces what it is doing with [`RuntimeStep::enter`]; the step stays
//! on the current thread's step stack until the returned guard drops. Each
//! failure takes a [`DiagnosticSnapshot`] of that stack, plus a native
//! backtrace, when it is constructed.
//!
//! ```rust
//! use faultline_core::context::{current_steps, RuntimeStep};
//!
//! let _outer = RuntimeStep::enter("loading configuration");
//! {
//!     let _inner = RuntimeStep::enter("reading /etc/app.toml");
//!     assert_eq!(current_steps().len(), 2);
//! }
//! assert_eq!(current_steps(), vec!["loading configuration".to_string()]);
//! ```

use crate::config::{self, BacktraceMode};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};
use tracing::span::EnteredSpan;

thread_local! {
    static STEPS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Guard for one logical step on the current thread
///
/// Also enters a `runtime_step` tracing span for the step's lifetime.
#[must_use = "the step ends when the guard is dropped"]
pub struct RuntimeStep {
    depth: usize,
    _span: EnteredSpan,
}

impl RuntimeStep {
    /// Push a step onto the current thread's step stack
    pub fn enter(description: impl Into<String>) -> Self {
        let description = description.into();
        let span = tracing::debug_span!("runtime_step", step = %description).entered();
        let depth = STEPS.with(|steps| {
            let mut steps = steps.borrow_mut();
            steps.push(description);
            steps.len() - 1
        });
        Self { depth, _span: span }
    }
}

impl Drop for RuntimeStep {
    fn drop(&mut self) {
        // truncating also discards steps whose guards leaked; the stack may
        // already be gone when the guard lives in another thread-local
        let _ = STEPS.try_with(|steps| steps.borrow_mut().truncate(self.depth));
    }
}

impl Debug for RuntimeStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeStep").field("depth", &self.depth).finish()
    }
}

/// Current logical steps, outermost first
#[must_use]
pub fn current_steps() -> Vec<String> {
    STEPS.with(|steps| steps.borrow().clone())
}

/// Immutable capture of the diagnostic context at failure construction
pub struct DiagnosticSnapshot {
    steps: Vec<String>,
    backtrace: Backtrace,
}

impl DiagnosticSnapshot {
    /// Capture the current steps and, per configuration, a native backtrace
    #[must_use]
    pub fn capture() -> Self {
        let backtrace = match config::current().backtrace {
            BacktraceMode::Auto => Backtrace::capture(),
            BacktraceMode::Always => Backtrace::force_capture(),
            BacktraceMode::Never => Backtrace::disabled(),
        };
        Self {
            steps: current_steps(),
            backtrace,
        }
    }

    /// Snapshot with the given steps and no backtrace
    #[must_use]
    pub fn from_steps(steps: Vec<String>) -> Self {
        Self {
            steps,
            backtrace: Backtrace::disabled(),
        }
    }

    /// Logical steps at capture time, outermost first
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Native backtrace
    #[inline]
    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Whether a native backtrace was captured
    #[inline]
    #[must_use]
    pub fn has_backtrace(&self) -> bool {
        self.backtrace.status() == BacktraceStatus::Captured
    }

    /// Native backtrace as lines; empty when none was captured
    #[must_use]
    pub fn backtrace_lines(&self) -> Vec<String> {
        if !self.has_backtrace() {
            return Vec::new();
        }
        self.backtrace
            .to_string()
            .lines()
            .map(|line| line.trim_end().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Step trace as appended to detailed messages; empty without steps
    #[must_use]
    pub fn render_steps(&self) -> String {
        if self.steps.is_empty() {
            return String::new();
        }
        let mut out = String::from("\n[runtime steps:");
        for step in self.steps.iter().rev() {
            out.push_str("\n  at ");
            out.push_str(step);
        }
        out.push(']');
        out
    }
}

impl Debug for DiagnosticSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSnapshot")
            .field("steps", &self.steps)
            .field("backtrace", &self.backtrace.status())
            .finish()
    }
}
