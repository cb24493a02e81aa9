//! Catch points for unwinding failures
//!
//! [`Unrecoverable::raise`] and [`TransactionFailure::raise`] unwind without
//! running the panic hook. The functions here stop that unwind at the place
//! that can handle it and turn it back into a value. Any other payload, such
//! as an ordinary panic, keeps unwinding.
//!
//! ```rust
//! use faultline_core::boundary;
//! use faultline_core::failure::Unrecoverable;
//!
//! let result: Result<(), _> = boundary::top_level(|| {
//!     Unrecoverable::configuration_error("missing file").raise()
//! });
//! assert_eq!(result.unwrap_err().message(false), "missing file");
//! ```

use crate::failure::{AnyFailure, TransactionFailure, Unrecoverable};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run `f` as a top-level unit of work, e.g. one iteration of a server loop
///
/// Catches raised [`Unrecoverable`] failures. A [`TransactionFailure`] that
/// escaped its transaction boundary is caught too and logged, since that
/// boundary was missing.
///
/// # Errors
/// Returns the failure that unwound out of `f`
pub fn top_level<T>(f: impl FnOnce() -> T) -> Result<T, AnyFailure> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let failure = match payload.downcast::<Unrecoverable>() {
            Ok(failure) => AnyFailure::from(*failure),
            Err(payload) => match payload.downcast::<TransactionFailure>() {
                Ok(failure) => {
                    tracing::warn!(
                        failure = %failure,
                        "transaction failure escaped to the top level"
                    );
                    AnyFailure::from(*failure)
                }
                Err(payload) => panic::resume_unwind(payload),
            },
        };
        tracing::debug!(failure = %failure.classification(), "caught failure at top level");
        failure
    })
}

/// Run `f` as one transaction
///
/// Only raised [`TransactionFailure`]s are caught; unrecoverable failures and
/// panics continue to the enclosing boundary.
///
/// # Errors
/// Returns the transaction failure that unwound out of `f`
pub fn transaction<T>(f: impl FnOnce() -> T) -> Result<T, TransactionFailure> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let failure = downcast_or_resume::<TransactionFailure>(payload);
        tracing::debug!(failure = %failure.failure().classification(), "transaction rolled back");
        failure
    })
}

fn downcast_or_resume<T: Any>(payload: Box<dyn Any + Send>) -> T {
    match payload.downcast::<T>() {
        Ok(value) => *value,
        Err(other) => panic::resume_unwind(other),
    }
}

/// Check a condition in debug builds, raising [`AssertionProvedFalse`] if it fails
///
/// The message takes `format!` arguments. Release builds skip the check.
///
/// [`AssertionProvedFalse`]: crate::kind::FailureKind::AssertionProvedFalse
#[macro_export]
macro_rules! verify {
    ($cond:expr, $($arg:tt)+) => {
        if cfg!(debug_assertions) && !$cond {
            $crate::failure::Unrecoverable::assertion_proved_false(format!($($arg)+)).raise()
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FailureKind;

    #[test]
    fn top_level_passes_value_through() {
        assert_eq!(top_level(|| 42).unwrap(), 42);
    }

    #[test]
    fn top_level_catches_unrecoverable() {
        let err = top_level(|| -> u8 { Unrecoverable::limitation("too deep").raise() }).unwrap_err();
        assert_eq!(err.kind(), Some(FailureKind::Limitation));
    }

    #[test]
    fn top_level_catches_escaped_transaction_failure() {
        let err = top_level(|| TransactionFailure::new("conflict").raise()).unwrap_err();
        assert_eq!(err.kind(), Some(FailureKind::TransactionFailure));
    }

    #[test]
    fn transaction_catches_only_transaction_failures() {
        let err = transaction(|| TransactionFailure::new("conflict").raise()).unwrap_err();
        assert_eq!(err.message(false), "conflict");

        let outer = top_level(|| {
            let _ = transaction(|| Unrecoverable::impossible_state("broken").raise());
            unreachable!("unrecoverable failure must pass the transaction boundary")
        });
        assert_eq!(outer.unwrap_err().kind(), Some(FailureKind::ImpossibleState));
    }

    #[test]
    fn ordinary_panics_are_resumed() {
        let caught = std::panic::catch_unwind(|| top_level(|| panic!("plain panic")));
        let payload = caught.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"plain panic"));
    }

    #[test]
    fn verify_macro_raises_in_debug() {
        let ok = top_level(|| crate::verify!(1 + 1 == 2, "math works"));
        assert!(ok.is_ok());

        if cfg!(debug_assertions) {
            let err = top_level(|| crate::verify!(1 > 2, "expected {} > {}", 1, 2)).unwrap_err();
            assert_eq!(err.kind(), Some(FailureKind::AssertionProvedFalse));
            assert_eq!(err.message(false), "expected 1 > 2");
        }
    }
}
