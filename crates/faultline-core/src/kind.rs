//! Failure taxonomy
//!
//! Provides [`FailureKind`], the closed classification tree every failure
//! belongs to, and [`Family`], the three handling regimes the tree splits into.
//!
//! ```text
//! EnvironmentError ─┬─ ConfigurationError
//!                   └─ InstallationError
//! VerificationFailure ── AssertionProvedFalse ── ImpossibleState
//! ContractViolation ─┬─ PreConditionViolation ── ProtocolViolation
//!                    ├─ PostConditionViolation
//!                    └─ SecurityViolation
//! Limitation
//! ReturnCode                (recoverable, declared)
//! TransactionFailure        (recoverable, undeclared)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Namespace prefix used by [`FailureKind::qualified_name`]
pub const NAMESPACE: &str = "faultline";

/// Failure classification
///
/// Each value is a node of a single-parent tree. The tree is descriptive:
/// registry lookups match the exact kind only, never an ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureKind {
    /// External setup failure, recoverable only by operator action
    EnvironmentError,
    /// Missing parameters, invalid values or no configuration at all
    ConfigurationError,
    /// Missing libraries, incorrect paths or version mismatches
    InstallationError,

    /// A check added for verification purposes proved false
    VerificationFailure,
    /// An assertion that is neither a pre- nor a postcondition failed
    AssertionProvedFalse,
    /// A state the author considered impossible was reached
    ImpossibleState,

    /// A caller/callee contract was breached
    ContractViolation,
    /// The caller did not satisfy a precondition
    PreConditionViolation,
    /// A method was called while the object was not in a required state
    ProtocolViolation,
    /// A postcondition or the class invariant on exit does not hold
    PostConditionViolation,
    /// Unauthorised access, missing credentials or insufficient privileges
    SecurityViolation,

    /// A known and accepted capability gap
    Limitation,

    /// Normal alternate outcome that callers must handle
    ReturnCode,

    /// Failure tied to a transaction boundary
    TransactionFailure,
}

/// Handling regime of a [`FailureKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Real errors; never declared, caught only by top-level loops
    Unrecoverable,
    /// Expected outcomes; declared in signatures and handled by the caller
    ReturnCode,
    /// Undeclared; handled only at the transaction boundary
    Transaction,
}

impl Family {
    /// Whether a reasonable caller is expected to recover
    #[inline]
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        !matches!(self, Self::Unrecoverable)
    }

    /// Whether failures of this family may carry more than one cause
    #[inline]
    #[must_use]
    pub const fn allows_multiple_causes(self) -> bool {
        self.is_recoverable()
    }
}

impl FailureKind {
    const ALL: [Self; 14] = [
        Self::EnvironmentError,
        Self::ConfigurationError,
        Self::InstallationError,
        Self::VerificationFailure,
        Self::AssertionProvedFalse,
        Self::ImpossibleState,
        Self::ContractViolation,
        Self::PreConditionViolation,
        Self::ProtocolViolation,
        Self::PostConditionViolation,
        Self::SecurityViolation,
        Self::Limitation,
        Self::ReturnCode,
        Self::TransactionFailure,
    ];

    /// Every kind, roots before their descendants
    #[inline]
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Direct parent in the taxonomy tree, `None` for roots
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::ConfigurationError | Self::InstallationError => Some(Self::EnvironmentError),
            Self::AssertionProvedFalse => Some(Self::VerificationFailure),
            Self::ImpossibleState => Some(Self::AssertionProvedFalse),
            Self::PreConditionViolation
            | Self::PostConditionViolation
            | Self::SecurityViolation => Some(Self::ContractViolation),
            Self::ProtocolViolation => Some(Self::PreConditionViolation),
            Self::EnvironmentError
            | Self::VerificationFailure
            | Self::ContractViolation
            | Self::Limitation
            | Self::ReturnCode
            | Self::TransactionFailure => None,
        }
    }

    /// Ancestors from the direct parent up to the root
    pub fn ancestors(self) -> impl Iterator<Item = Self> {
        std::iter::successors(self.parent(), |kind| kind.parent())
    }

    /// Root of the subtree this kind belongs to
    #[must_use]
    pub fn root(self) -> Self {
        self.ancestors().last().unwrap_or(self)
    }

    /// Whether `self` equals `other` or descends from it
    #[must_use]
    pub fn is_a(self, other: Self) -> bool {
        self == other || self.ancestors().any(|kind| kind == other)
    }

    /// Handling regime
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::ReturnCode => Family::ReturnCode,
            Self::TransactionFailure => Family::Transaction,
            _ => Family::Unrecoverable,
        }
    }

    /// Checks of this kind may be compiled out of production builds
    #[inline]
    #[must_use]
    pub fn is_disableable(self) -> bool {
        self.is_a(Self::VerificationFailure)
    }

    /// Short name, e.g. `ConfigurationError`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EnvironmentError => "EnvironmentError",
            Self::ConfigurationError => "ConfigurationError",
            Self::InstallationError => "InstallationError",
            Self::VerificationFailure => "VerificationFailure",
            Self::AssertionProvedFalse => "AssertionProvedFalse",
            Self::ImpossibleState => "ImpossibleState",
            Self::ContractViolation => "ContractViolation",
            Self::PreConditionViolation => "PreConditionViolation",
            Self::ProtocolViolation => "ProtocolViolation",
            Self::PostConditionViolation => "PostConditionViolation",
            Self::SecurityViolation => "SecurityViolation",
            Self::Limitation => "Limitation",
            Self::ReturnCode => "ReturnCode",
            Self::TransactionFailure => "TransactionFailure",
        }
    }

    /// Namespace-qualified name, e.g. `faultline::ConfigurationError`
    #[must_use]
    pub fn qualified_name(self) -> String {
        format!("{NAMESPACE}::{}", self.name())
    }

    /// Why failures of this shape occur
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::EnvironmentError => {
                "The environment the software runs in is defective; only operator action helps."
            }
            Self::ConfigurationError => {
                "The software is not configured properly: missing parameters, invalid values \
                 (e.g. non existent files) or no configuration at all."
            }
            Self::InstallationError => {
                "The installation is erroneous: missing libraries, incorrect paths or version \
                 mismatches."
            }
            Self::VerificationFailure => {
                "A check added for verification purposes proved false, which indicates a \
                 programming error. Such checks may be disabled in production and must not be \
                 used for user input validation."
            }
            Self::AssertionProvedFalse => {
                "An assertion that is neither a pre- nor a postcondition failed: programming \
                 errors, insufficiently validated data or an assertion that is itself untrue."
            }
            Self::ImpossibleState => {
                "A state that is impossible under normal circumstances was detected, typically \
                 as a consequence of a previous error such as corrupt memory."
            }
            Self::ContractViolation => {
                "A software contract between caller and callee was violated."
            }
            Self::PreConditionViolation => {
                "The caller did not fulfil a precondition of the called operation."
            }
            Self::ProtocolViolation => {
                "The object protocol was violated: a method was called while the object was not \
                 in a required state, e.g. still under construction or invalidated meanwhile."
            }
            Self::PostConditionViolation => {
                "A postcondition of a method is not fulfilled, or the invariant on method entry \
                 does not hold."
            }
            Self::SecurityViolation => {
                "A security check failed: unauthorised access, missing credentials or \
                 insufficient privileges."
            }
            Self::Limitation => {
                "A limitation of the software was encountered. Neither user nor developer made \
                 a mistake; the capability may or may not be added in the future."
            }
            Self::ReturnCode => {
                "A normal processing result in addition to the return value. It is declared and \
                 must be handled by the caller."
            }
            Self::TransactionFailure => {
                "A transaction failed due to conflicts or storage reasons. It is not declared \
                 per operation and is handled at the transaction boundary."
            }
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown failure kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown failure kind: '{0}'")]
pub struct KindParseError(pub String);

impl FromStr for FailureKind {
    type Err = KindParseError;

    /// Accepts the short or the namespace-qualified name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s
            .strip_prefix(NAMESPACE)
            .and_then(|rest| rest.strip_prefix("::"))
            .unwrap_or(s);
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == short)
            .ok_or_else(|| KindParseError(s.to_string()))
    }
}
