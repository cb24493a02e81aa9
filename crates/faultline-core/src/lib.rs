//! Faultline Core - failure taxonomy and diagnostics
//!
//! Gives every failure in an application a place in a fixed taxonomy:
//! - Unrecoverable failures: environment, verification, contract, limitation
//! - Return codes: declared, expected alternate outcomes
//! - Transaction failures: handled at the transaction boundary
//!
//! Each failure carries a technical message, optional end-user help text, its
//! causes and a snapshot of the logical call steps at construction.
//!
//! # Example
//!
//! ```rust
//! use faultline_core::prelude::*;
//!
//! fn lookup(user: &str) -> Outcome<u32> {
//!     let _step = RuntimeStep::enter(format!("looking up {user}"));
//!     Err(ReturnCode::new(Message::new("no user %(name)").with("name", user))
//!         .with_variant("NotFound"))
//! }
//!
//! let err = lookup("ada").unwrap_err();
//! assert_eq!(err.message(false), "no user ada");
//! assert!(err.message(true).contains("at looking up ada"));
//! ```

#![warn(unreachable_pub)]

pub mod boundary;
pub mod causes;
pub mod classification;
pub mod config;
pub mod context;
pub mod dump;
pub mod failure;
pub mod kind;
pub mod message;

// Re-exports for convenience
pub use causes::CauseList;
pub use classification::{strip_namespace, Classification, ForeignType};
pub use config::{BacktraceMode, ConfigError, ReportConfig};
pub use context::{current_steps, DiagnosticSnapshot, RuntimeStep};
pub use dump::{DumpNode, Dumpable, CAUSE_LABEL};
pub use failure::{
    AnyFailure, Failure, FamilyMismatch, ForeignFailure, Outcome, ReturnCode,
    TransactionFailure, Unrecoverable,
};
pub use kind::{FailureKind, Family, KindParseError, NAMESPACE};
pub use message::{CallContext, Message, MessageCatalog};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for raising and inspecting failures
    pub use crate::{
        AnyFailure, CallContext, Classification, Dumpable, FailureKind, Message, Outcome,
        ReturnCode, RuntimeStep, TransactionFailure, Unrecoverable,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
