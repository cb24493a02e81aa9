//! Failure instances
//!
//! Every failure shares one [`Failure`] record: kind, technical message,
//! optional end-user help text and the diagnostic snapshot taken when it was
//! built. The family decides how it travels and how many causes it may have:
//!
//! - [`Unrecoverable`]: real errors, at most one cause, unwinds to a top-level loop
//! - [`ReturnCode`]: expected outcomes, any number of causes, returned as `Err`
//! - [`TransactionFailure`]: any number of causes, unwinds to the transaction boundary
//!
//! [`ForeignFailure`] wraps errors from outside the taxonomy and [`AnyFailure`]
//! is the sum of all four, used wherever an arbitrary failure is accepted.

use crate::causes::CauseList;
use crate::classification::{Classification, ForeignType};
use crate::context::DiagnosticSnapshot;
use crate::dump::{DumpNode, Dumpable, CAUSE_LABEL};
use crate::kind::{Family, FailureKind};
use crate::message::Message;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Result whose error is a declared, expected outcome
pub type Outcome<T> = Result<T, ReturnCode>;

/// Kind does not belong to the requested family
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} belongs to the {actual:?} family, not {expected:?}")]
pub struct FamilyMismatch {
    /// Requested kind
    pub kind: FailureKind,
    /// Family of the requested kind
    pub actual: Family,
    /// Family of the type being constructed
    pub expected: Family,
}

/// Fields shared by every taxonomy failure
#[derive(Debug)]
pub struct Failure {
    kind: FailureKind,
    variant: Option<&'static str>,
    message: Message,
    help_text: Option<Message>,
    snapshot: DiagnosticSnapshot,
}

impl Failure {
    fn new(kind: FailureKind, message: Message) -> Self {
        Self {
            kind,
            variant: None,
            message,
            help_text: None,
            snapshot: DiagnosticSnapshot::capture(),
        }
    }

    /// Taxonomy kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Application-defined variant name, if any
    #[inline]
    #[must_use]
    pub fn variant(&self) -> Option<&'static str> {
        self.variant
    }

    /// Exact classification used for help text lookup
    #[must_use]
    pub fn classification(&self) -> Classification {
        match self.variant {
            Some(variant) => Classification::Variant(self.kind, variant),
            None => Classification::Taxonomy(self.kind),
        }
    }

    /// Technical message
    #[inline]
    #[must_use]
    pub fn message_object(&self) -> &Message {
        &self.message
    }

    /// Explicit end-user help text
    #[inline]
    #[must_use]
    pub fn help_text(&self) -> Option<&Message> {
        self.help_text.as_ref()
    }

    /// Diagnostic snapshot taken at construction
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &DiagnosticSnapshot {
        &self.snapshot
    }

    fn dump_own(&self, node: &mut DumpNode) {
        node.dump("Kind", self.classification().short_name());
        node.dump("Message", self.message.to_string());
        dump_snapshot(&self.snapshot, node);
    }
}

fn dump_snapshot(snapshot: &DiagnosticSnapshot, node: &mut DumpNode) {
    if !snapshot.steps().is_empty() {
        if let Some(steps) = node.open_technical("RuntimeSteps") {
            for step in snapshot.steps() {
                steps.dump_line(step.as_str());
            }
        }
    }
    if let Some(trace) = node.open_technical("StackTrace") {
        for line in snapshot.backtrace_lines() {
            trace.dump_line(line);
        }
    }
}

// ============================================================================
// Unrecoverable
// ============================================================================

/// Non-recoverable failure: environment, verification, contract or limitation
///
/// Never part of a declared signature. Raise it with [`Unrecoverable::raise`];
/// only top-level loops and reporting layers catch it.
#[derive(Debug)]
pub struct Unrecoverable {
    failure: Failure,
    cause: Option<Box<AnyFailure>>,
}

macro_rules! unrecoverable_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)*) => {
        impl Unrecoverable {
            $(
                $(#[$doc])*
                #[must_use]
                pub fn $name(message: impl Into<Message>) -> Self {
                    Self::build(FailureKind::$kind, message.into())
                }
            )*
        }
    };
}

unrecoverable_constructors! {
    /// The environment is defective
    environment_error => EnvironmentError;
    /// The software is not configured properly
    configuration_error => ConfigurationError;
    /// The installation is erroneous
    installation_error => InstallationError;
    /// A verification check proved false
    verification_failure => VerificationFailure;
    /// An assertion proved false
    assertion_proved_false => AssertionProvedFalse;
    /// An impossible state was reached
    impossible_state => ImpossibleState;
    /// A contract was violated
    contract_violation => ContractViolation;
    /// A precondition was violated
    precondition_violation => PreConditionViolation;
    /// The object protocol was violated
    protocol_violation => ProtocolViolation;
    /// A postcondition was violated
    postcondition_violation => PostConditionViolation;
    /// A security check failed
    security_violation => SecurityViolation;
    /// A limitation was encountered
    limitation => Limitation;
}

impl Unrecoverable {
    fn build(kind: FailureKind, message: Message) -> Self {
        Self {
            failure: Failure::new(kind, message),
            cause: None,
        }
    }

    /// Failure of any unrecoverable kind
    ///
    /// # Errors
    /// Returns error if `kind` belongs to a recoverable family
    pub fn try_new(kind: FailureKind, message: impl Into<Message>) -> Result<Self, FamilyMismatch> {
        check_family(kind, Family::Unrecoverable)?;
        Ok(Self::build(kind, message.into()))
    }

    /// Set the direct cause, replacing any previous one
    #[must_use]
    pub fn caused_by(mut self, cause: impl Into<AnyFailure>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }

    /// Attach explicit end-user help text
    #[must_use]
    pub fn with_help(mut self, help: impl Into<Message>) -> Self {
        self.failure.help_text = Some(help.into());
        self
    }

    /// Classify as an application-defined variant of this kind
    #[must_use]
    pub fn with_variant(mut self, variant: &'static str) -> Self {
        self.failure.variant = Some(variant);
        self
    }

    /// Shared failure fields
    #[inline]
    #[must_use]
    pub fn failure(&self) -> &Failure {
        &self.failure
    }

    /// Direct cause
    #[inline]
    #[must_use]
    pub fn cause(&self) -> Option<&AnyFailure> {
        self.cause.as_deref()
    }

    /// Explicit end-user help text
    #[inline]
    #[must_use]
    pub fn help_text(&self) -> Option<&Message> {
        self.failure.help_text()
    }

    /// Diagnostic snapshot taken at construction
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &DiagnosticSnapshot {
        self.failure.snapshot()
    }

    /// Technical message; `detailed` appends the cause and the step trace
    #[must_use]
    pub fn message(&self, detailed: bool) -> String {
        let mut out = self.failure.message.to_string();
        if detailed {
            if let Some(cause) = &self.cause {
                out.push_str(&format!("\n[cause: {cause}]"));
            }
            out.push_str(&self.failure.snapshot.render_steps());
        }
        out
    }

    /// Unwind to the nearest [`top_level`](crate::boundary::top_level) boundary
    ///
    /// The unwind bypasses the panic hook, so the full failure is logged at
    /// error level first; it stays visible even if no boundary catches it.
    pub fn raise(self) -> ! {
        tracing::error!(failure = %self, "raising unrecoverable failure");
        std::panic::resume_unwind(Box::new(self))
    }
}

impl Display for Unrecoverable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {}",
            self.failure.classification(),
            self.message(true)
        )
    }
}

impl Error for Unrecoverable {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

impl Dumpable for Unrecoverable {
    fn dump(&self, node: &mut DumpNode) {
        self.failure.dump_own(node);
        if let Some(cause) = &self.cause {
            node.dump_nested(CAUSE_LABEL, cause.as_ref());
        }
    }
}

// ============================================================================
// ReturnCode / TransactionFailure
// ============================================================================

/// Expected alternate outcome
///
/// Declared in signatures through [`Outcome`] and handled by the caller.
/// Causes may be added after construction.
#[derive(Debug)]
pub struct ReturnCode {
    failure: Failure,
    causes: CauseList,
}

/// Failure tied to a transaction boundary
///
/// Any modifying operation may produce one, so it is not declared per
/// operation; it unwinds with [`TransactionFailure::raise`] to the
/// [`transaction`](crate::boundary::transaction) boundary, where the invoker
/// has enough information to handle it.
#[derive(Debug)]
pub struct TransactionFailure {
    failure: Failure,
    causes: CauseList,
}

impl ReturnCode {
    /// Return code with a technical message
    #[must_use]
    pub fn new(message: impl Into<Message>) -> Self {
        Self {
            failure: Failure::new(FailureKind::ReturnCode, message.into()),
            causes: CauseList::new(),
        }
    }
}

impl TransactionFailure {
    /// Transaction failure with a technical message
    #[must_use]
    pub fn new(message: impl Into<Message>) -> Self {
        Self {
            failure: Failure::new(FailureKind::TransactionFailure, message.into()),
            causes: CauseList::new(),
        }
    }

    /// Unwind to the nearest [`transaction`](crate::boundary::transaction) boundary
    ///
    /// Logged at error level before unwinding, like [`Unrecoverable::raise`].
    pub fn raise(self) -> ! {
        tracing::error!(failure = %self, "raising transaction failure");
        std::panic::resume_unwind(Box::new(self))
    }
}

macro_rules! multi_cause_failure {
    ($ty:ident) => {
        impl $ty {
            /// Append a cause given at construction
            #[must_use]
            pub fn caused_by(mut self, cause: impl Into<AnyFailure>) -> Self {
                self.causes.push(cause.into());
                self
            }

            /// Attach explicit end-user help text
            #[must_use]
            pub fn with_help(mut self, help: impl Into<Message>) -> Self {
                self.failure.help_text = Some(help.into());
                self
            }

            /// Classify as an application-defined variant
            #[must_use]
            pub fn with_variant(mut self, variant: &'static str) -> Self {
                self.failure.variant = Some(variant);
                self
            }

            /// Shared failure fields
            #[inline]
            #[must_use]
            pub fn failure(&self) -> &Failure {
                &self.failure
            }

            /// Explicit end-user help text
            #[inline]
            #[must_use]
            pub fn help_text(&self) -> Option<&Message> {
                self.failure.help_text()
            }

            /// Diagnostic snapshot taken at construction
            #[inline]
            #[must_use]
            pub fn snapshot(&self) -> &DiagnosticSnapshot {
                self.failure.snapshot()
            }

            /// Append a cause; never fails
            #[inline]
            pub fn add_cause(&mut self, cause: impl Into<AnyFailure>) {
                self.causes.push(cause.into());
            }

            /// All causes, in the order they were added
            #[inline]
            #[must_use]
            pub fn causes(&self) -> &[AnyFailure] {
                self.causes.as_slice()
            }

            /// First cause; logs a warning if others exist
            #[must_use]
            pub fn cause(&self) -> Option<&AnyFailure> {
                self.causes.first_reported(&self.failure.classification())
            }

            /// Technical message; `detailed` appends every cause and the step trace
            #[must_use]
            pub fn message(&self, detailed: bool) -> String {
                let mut out = self.failure.message.to_string();
                if detailed {
                    out.push_str(&self.causes.render());
                    out.push_str(&self.failure.snapshot.render_steps());
                }
                out
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{} : {}",
                    self.failure.classification(),
                    self.message(true)
                )
            }
        }

        impl Error for $ty {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                self.cause().map(|c| c as &(dyn Error + 'static))
            }
        }

        impl Dumpable for $ty {
            fn dump(&self, node: &mut DumpNode) {
                self.failure.dump_own(node);
                let causes = node.open("Causes");
                for cause in &self.causes {
                    causes.dump_nested(CAUSE_LABEL, cause);
                }
            }
        }
    };
}

multi_cause_failure!(ReturnCode);
multi_cause_failure!(TransactionFailure);

fn check_family(kind: FailureKind, expected: Family) -> Result<(), FamilyMismatch> {
    let actual = kind.family();
    if actual == expected {
        Ok(())
    } else {
        Err(FamilyMismatch {
            kind,
            actual,
            expected,
        })
    }
}

// ============================================================================
// Foreign failures
// ============================================================================

/// Error from outside the taxonomy, classified by its concrete type
#[derive(Debug)]
pub struct ForeignFailure {
    ty: ForeignType,
    error: Box<dyn Error + Send + Sync + 'static>,
    snapshot: DiagnosticSnapshot,
}

impl ForeignFailure {
    /// Wrap `error`, remembering its exact type
    pub fn new<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self {
            ty: ForeignType::of::<E>(),
            error: Box::new(error),
            snapshot: DiagnosticSnapshot::capture(),
        }
    }

    /// Exact classification
    #[inline]
    #[must_use]
    pub fn classification(&self) -> Classification {
        Classification::Foreign(self.ty)
    }

    /// Wrapped error
    #[inline]
    #[must_use]
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    /// Wrapped error as `E`
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    /// Snapshot taken when the error was wrapped
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &DiagnosticSnapshot {
        &self.snapshot
    }

    /// The error's own message; `detailed` appends its source and the step trace
    #[must_use]
    pub fn message(&self, detailed: bool) -> String {
        let mut out = self.error.to_string();
        if detailed {
            if let Some(source) = self.error.source() {
                out.push_str(&format!("\n[cause: {source}]"));
            }
            out.push_str(&self.snapshot.render_steps());
        }
        out
    }
}

impl Display for ForeignFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.ty.name(), self.message(true))
    }
}

impl Error for ForeignFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

impl Dumpable for ForeignFailure {
    fn dump(&self, node: &mut DumpNode) {
        node.dump("Kind", self.classification().short_name());
        node.dump("Message", self.error.to_string());
        dump_snapshot(&self.snapshot, node);
        let mut source = self.error.source();
        let mut level = &mut *node;
        while let Some(err) = source {
            level = level.open(CAUSE_LABEL);
            level.dump("Message", err.to_string());
            source = err.source();
        }
    }
}

// ============================================================================
// AnyFailure
// ============================================================================

/// Any failure: one of the three families or a foreign error
#[derive(Debug)]
pub enum AnyFailure {
    /// Non-recoverable failure
    Unrecoverable(Unrecoverable),
    /// Declared alternate outcome
    ReturnCode(ReturnCode),
    /// Transaction boundary failure
    Transaction(TransactionFailure),
    /// Error from outside the taxonomy
    Foreign(ForeignFailure),
}

impl AnyFailure {
    /// Wrap a foreign error
    pub fn foreign<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::Foreign(ForeignFailure::new(error))
    }

    /// Exact classification
    #[must_use]
    pub fn classification(&self) -> Classification {
        match self {
            Self::Unrecoverable(f) => f.failure.classification(),
            Self::ReturnCode(f) => f.failure.classification(),
            Self::Transaction(f) => f.failure.classification(),
            Self::Foreign(f) => f.classification(),
        }
    }

    /// Taxonomy kind, `None` for foreign errors
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        self.taxonomy().map(Failure::kind)
    }

    /// Family, `None` for foreign errors
    #[must_use]
    pub fn family(&self) -> Option<Family> {
        self.kind().map(FailureKind::family)
    }

    /// Shared failure fields, `None` for foreign errors
    #[must_use]
    pub fn taxonomy(&self) -> Option<&Failure> {
        match self {
            Self::Unrecoverable(f) => Some(&f.failure),
            Self::ReturnCode(f) => Some(&f.failure),
            Self::Transaction(f) => Some(&f.failure),
            Self::Foreign(_) => None,
        }
    }

    /// Explicit end-user help text
    #[must_use]
    pub fn help_text(&self) -> Option<&Message> {
        self.taxonomy().and_then(Failure::help_text)
    }

    /// Diagnostic snapshot
    #[must_use]
    pub fn snapshot(&self) -> &DiagnosticSnapshot {
        match self {
            Self::Unrecoverable(f) => &f.failure.snapshot,
            Self::ReturnCode(f) => &f.failure.snapshot,
            Self::Transaction(f) => &f.failure.snapshot,
            Self::Foreign(f) => &f.snapshot,
        }
    }

    /// Technical message; see the family types for what `detailed` adds
    #[must_use]
    pub fn message(&self, detailed: bool) -> String {
        match self {
            Self::Unrecoverable(f) => f.message(detailed),
            Self::ReturnCode(f) => f.message(detailed),
            Self::Transaction(f) => f.message(detailed),
            Self::Foreign(f) => f.message(detailed),
        }
    }

    /// All direct causes in order; foreign errors report none
    #[must_use]
    pub fn causes(&self) -> &[AnyFailure] {
        match self {
            Self::Unrecoverable(f) => match f.cause.as_deref() {
                Some(cause) => std::slice::from_ref(cause),
                None => &[],
            },
            Self::ReturnCode(f) => f.causes(),
            Self::Transaction(f) => f.causes(),
            Self::Foreign(_) => &[],
        }
    }

    /// Single-cause view; warns when a multi-cause failure has more than one
    #[must_use]
    pub fn cause(&self) -> Option<&AnyFailure> {
        match self {
            Self::Unrecoverable(f) => f.cause(),
            Self::ReturnCode(f) => f.cause(),
            Self::Transaction(f) => f.cause(),
            Self::Foreign(_) => None,
        }
    }

    fn as_error(&self) -> &(dyn Error + 'static) {
        match self {
            Self::Unrecoverable(f) => f as &(dyn Error + 'static),
            Self::ReturnCode(f) => f,
            Self::Transaction(f) => f,
            Self::Foreign(f) => f,
        }
    }
}

impl Display for AnyFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecoverable(e) => Display::fmt(e, f),
            Self::ReturnCode(e) => Display::fmt(e, f),
            Self::Transaction(e) => Display::fmt(e, f),
            Self::Foreign(e) => Display::fmt(e, f),
        }
    }
}

impl Error for AnyFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.as_error().source()
    }
}

impl Dumpable for AnyFailure {
    fn dump(&self, node: &mut DumpNode) {
        match self {
            Self::Unrecoverable(f) => f.dump(node),
            Self::ReturnCode(f) => f.dump(node),
            Self::Transaction(f) => f.dump(node),
            Self::Foreign(f) => f.dump(node),
        }
    }
}

impl From<Unrecoverable> for AnyFailure {
    fn from(value: Unrecoverable) -> Self {
        Self::Unrecoverable(value)
    }
}

impl From<ReturnCode> for AnyFailure {
    fn from(value: ReturnCode) -> Self {
        Self::ReturnCode(value)
    }
}

impl From<TransactionFailure> for AnyFailure {
    fn from(value: TransactionFailure) -> Self {
        Self::Transaction(value)
    }
}

impl From<ForeignFailure> for AnyFailure {
    fn from(value: ForeignFailure) -> Self {
        Self::Foreign(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuntimeStep;
    use pretty_assertions::assert_eq;

    #[derive(Debug, thiserror::Error)]
    #[error("socket closed")]
    struct SocketClosed;

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct RequestFailed(#[source] SocketClosed);

    #[test]
    fn constructors_set_kind() {
        assert_eq!(
            Unrecoverable::configuration_error("x").failure().kind(),
            FailureKind::ConfigurationError
        );
        assert_eq!(
            Unrecoverable::protocol_violation("x").failure().kind(),
            FailureKind::ProtocolViolation
        );
        assert_eq!(ReturnCode::new("x").failure().kind(), FailureKind::ReturnCode);
        assert_eq!(
            TransactionFailure::new("x").failure().kind(),
            FailureKind::TransactionFailure
        );
    }

    #[test]
    fn try_new_checks_family() {
        assert!(Unrecoverable::try_new(FailureKind::SecurityViolation, "denied").is_ok());
        let err = Unrecoverable::try_new(FailureKind::ReturnCode, "nope").unwrap_err();
        assert_eq!(err.actual, Family::ReturnCode);
        assert_eq!(err.expected, Family::Unrecoverable);
    }

    #[test]
    fn plain_message_excludes_cause_and_steps() {
        let _step = RuntimeStep::enter("loading settings");
        let failure = Unrecoverable::configuration_error("missing file")
            .caused_by(AnyFailure::foreign(SocketClosed));

        assert_eq!(failure.message(false), "missing file");

        let detailed = failure.message(true);
        assert!(detailed.starts_with("missing file\n[cause: "));
        assert!(detailed.contains("socket closed"));
        assert!(detailed.contains("at loading settings"));
    }

    #[test]
    fn display_is_qualified() {
        let failure = Unrecoverable::limitation("too many columns");
        assert_eq!(failure.to_string(), "faultline::Limitation : too many columns");
    }

    #[test]
    fn return_code_causes_in_order() {
        let mut code = ReturnCode::new("rollback incomplete");
        assert!(code.cause().is_none());
        code.add_cause(Unrecoverable::environment_error("disk"));
        code.add_cause(AnyFailure::foreign(SocketClosed));

        let messages: Vec<_> = code.causes().iter().map(|c| c.message(false)).collect();
        assert_eq!(messages, vec!["disk", "socket closed"]);
        assert_eq!(code.cause().unwrap().message(false), "disk");
    }

    #[test]
    fn multi_cause_detailed_message_lists_all() {
        let tx = TransactionFailure::new("commit failed")
            .caused_by(Unrecoverable::environment_error("disk"))
            .caused_by(Unrecoverable::limitation("quota"));
        let detailed = tx.message(true);
        assert!(detailed.contains("[causes: faultline::EnvironmentError : disk,\n"));
        assert!(detailed.contains("faultline::Limitation : quota]"));
        assert_eq!(tx.message(false), "commit failed");
    }

    #[test]
    fn variant_changes_classification() {
        let code = ReturnCode::new("no such user").with_variant("NotFound");
        assert_eq!(
            code.failure().classification(),
            Classification::Variant(FailureKind::ReturnCode, "NotFound")
        );
        assert!(code.to_string().starts_with("faultline::ReturnCode::NotFound : "));
    }

    #[test]
    fn help_text_is_optional() {
        assert!(ReturnCode::new("x").failure().help_text().is_none());
        let failure = Unrecoverable::security_violation("denied").with_help("Please log in.");
        assert_eq!(
            failure.failure().help_text().map(ToString::to_string),
            Some("Please log in.".to_string())
        );
    }

    #[test]
    fn error_source_chain() {
        let failure = Unrecoverable::environment_error("network down")
            .caused_by(AnyFailure::foreign(RequestFailed(SocketClosed)));
        let source = failure.source().unwrap();
        assert!(source.to_string().contains("request failed"));
        let inner = source.source().unwrap();
        assert_eq!(inner.to_string(), "socket closed");
    }

    #[test]
    fn foreign_keeps_type_and_downcasts() {
        let any = AnyFailure::foreign(SocketClosed);
        assert_eq!(any.classification(), Classification::foreign::<SocketClosed>());
        assert_eq!(any.kind(), None);
        assert!(any.help_text().is_none());
        match &any {
            AnyFailure::Foreign(f) => assert!(f.downcast_ref::<SocketClosed>().is_some()),
            other => panic!("expected foreign, got {other:?}"),
        }
    }

    #[test]
    fn any_failure_causes_view() {
        let leaf: AnyFailure = Unrecoverable::limitation("x").into();
        assert!(leaf.causes().is_empty());

        let wrapped: AnyFailure = Unrecoverable::impossible_state("y")
            .caused_by(Unrecoverable::limitation("x"))
            .into();
        assert_eq!(wrapped.causes().len(), 1);
        assert_eq!(wrapped.family(), Some(Family::Unrecoverable));
    }

    #[test]
    fn dump_contains_kind_message_and_causes() {
        let failure = ReturnCode::new("partial")
            .caused_by(Unrecoverable::installation_error("lib missing"));
        let dump = failure.to_dump();

        assert_eq!(dump.value_of("Kind"), Some("ReturnCode"));
        assert_eq!(dump.value_of("Message"), Some("partial"));
        assert!(dump.child("StackTrace").is_some());
        let causes = dump.child("Causes").unwrap();
        assert_eq!(causes.children.len(), 1);
        assert_eq!(
            causes.children[0].value_of("Kind"),
            Some("InstallationError")
        );
    }

    #[test]
    fn dump_depth_follows_cause_chain() {
        let failure = Unrecoverable::impossible_state("outer").caused_by(
            Unrecoverable::assertion_proved_false("middle")
                .caused_by(Unrecoverable::limitation("inner")),
        );
        assert_eq!(failure.to_dump().failure_depth(), 3);
    }

    #[test]
    fn foreign_dump_walks_sources() {
        let dump = AnyFailure::foreign(RequestFailed(SocketClosed)).to_dump();
        assert_eq!(dump.value_of("Kind"), Some("RequestFailed"));
        assert_eq!(dump.failure_depth(), 2);
    }

    #[test]
    fn failures_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<AnyFailure>();
        assert_send_sync::<Unrecoverable>();
        assert_send_sync::<ReturnCode>();
        assert_send_sync::<TransactionFailure>();
    }
}
