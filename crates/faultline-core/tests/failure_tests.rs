//! Functional tests for the failure taxonomy and the multi-cause model.
//!
//! These anchor the observable contracts of failures:
//! - every kind belongs to a single-parent tree and its family matches the subtree
//! - plain messages never contain causes or step traces, detailed ones always
//!   do, for every family and for foreign errors
//! - recoverable failures keep every cause, in order, without deduplication

use faultline_core::prelude::*;
use faultline_core::{boundary, Family};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = FailureKind> {
    proptest::sample::select(FailureKind::all().to_vec())
}

fn unrecoverable_kind() -> impl Strategy<Value = FailureKind> {
    any_kind().prop_filter("unrecoverable family", |k| {
        k.family() == Family::Unrecoverable
    })
}

#[derive(Debug, thiserror::Error)]
#[error("inner detail")]
struct InnerDetail;

#[derive(Debug, thiserror::Error)]
#[error("{text}")]
struct DriverError {
    text: String,
    #[source]
    source: InnerDetail,
}

/// One failure of each family plus a foreign one, built inside a step with a cause
fn failure_of_family(index: usize, text: &str) -> AnyFailure {
    let _step = RuntimeStep::enter("applying batch");
    let cause = || Unrecoverable::limitation("inner detail");
    match index % 4 {
        0 => Unrecoverable::impossible_state(text.to_string())
            .caused_by(cause())
            .into(),
        1 => ReturnCode::new(text.to_string()).caused_by(cause()).into(),
        2 => TransactionFailure::new(text.to_string())
            .caused_by(cause())
            .into(),
        _ => AnyFailure::foreign(DriverError {
            text: text.to_string(),
            source: InnerDetail,
        }),
    }
}

/// Tenet: a foreign error reports its own text plainly and its source chain in detail.
#[test]
fn foreign_message_plain_and_detailed() {
    let failure = {
        let _step = RuntimeStep::enter("syncing mirror");
        AnyFailure::foreign(DriverError {
            text: "connection reset".into(),
            source: InnerDetail,
        })
    };

    assert_eq!(failure.message(false), "connection reset");
    assert_eq!(
        failure.message(true),
        "connection reset\n[cause: inner detail]\n[runtime steps:\n  at syncing mirror]"
    );
}

/// Tenet: without causes or steps the detailed message adds nothing.
#[test]
fn detailed_message_without_extras_is_plain() {
    let failures: Vec<AnyFailure> = vec![
        Unrecoverable::limitation("bare").into(),
        ReturnCode::new("bare").into(),
        TransactionFailure::new("bare").into(),
        AnyFailure::foreign(InnerDetail),
    ];
    for failure in failures {
        assert_eq!(failure.message(true), failure.message(false));
    }
}

/// Tenet: a configuration error raised deep inside a step reports the step only
/// in its detailed message.
#[test]
fn configuration_error_inside_step() {
    let failure = {
        let _step = RuntimeStep::enter("reading settings.toml");
        Unrecoverable::configuration_error("missing file")
    };

    assert_eq!(failure.message(false), "missing file");
    assert_eq!(
        failure.message(true),
        "missing file\n[runtime steps:\n  at reading settings.toml]"
    );
    assert_eq!(
        failure.to_string(),
        "faultline::ConfigurationError : missing file\n[runtime steps:\n  at reading settings.toml]"
    );
}

/// Tenet: a return code may gain causes after construction, all are kept.
#[test]
fn return_code_add_cause_twice() {
    let mut code = ReturnCode::new("cleanup incomplete");
    code.add_cause(Unrecoverable::environment_error("disk A offline"));
    code.add_cause(Unrecoverable::environment_error("disk B offline"));

    assert_eq!(code.causes().len(), 2);
    assert_eq!(code.causes()[0].message(false), "disk A offline");
    assert_eq!(code.causes()[1].message(false), "disk B offline");

    let detailed = code.message(true);
    let a = detailed.find("disk A offline").unwrap();
    let b = detailed.find("disk B offline").unwrap();
    assert!(a < b, "causes must render in insertion order");
}

/// Tenet: outcomes travel as `Result` and can be matched by variant.
#[test]
fn outcome_is_declared_in_signature() {
    fn open(name: &str) -> Outcome<usize> {
        if name.is_empty() {
            return Err(ReturnCode::new("empty name").with_variant("InvalidName"));
        }
        Ok(name.len())
    }

    assert_eq!(open("ledger").unwrap(), 6);
    let err = open("").unwrap_err();
    assert_eq!(
        err.failure().classification(),
        Classification::Variant(FailureKind::ReturnCode, "InvalidName")
    );
}

/// Tenet: a failed transaction stops at its boundary with its causes intact.
#[test]
fn transaction_boundary_keeps_causes() {
    let err = boundary::transaction(|| {
        TransactionFailure::new("optimistic lock lost")
            .caused_by(ReturnCode::new("row changed"))
            .raise()
    })
    .unwrap_err();

    assert_eq!(err.causes().len(), 1);
    assert_eq!(err.causes()[0].kind(), Some(FailureKind::ReturnCode));
}

proptest! {
    #[test]
    fn prop_every_kind_reaches_a_root(kind in any_kind()) {
        let root = kind.root();
        prop_assert!(root.parent().is_none());
        prop_assert!(kind.is_a(root));
        prop_assert_eq!(kind.family(), root.family());
        prop_assert!(kind.ancestors().count() < FailureKind::all().len());
    }

    #[test]
    fn prop_plain_message_is_raw(kind in unrecoverable_kind(), text in "[a-z ]{1,24}") {
        let failure = {
            let _step = RuntimeStep::enter("step");
            Unrecoverable::try_new(kind, text.clone())
                .unwrap()
                .caused_by(Unrecoverable::limitation("inner"))
        };
        prop_assert_eq!(failure.message(false), text.clone());

        let detailed = failure.message(true);
        prop_assert!(detailed.starts_with(&text));
        prop_assert!(detailed.contains("[cause: faultline::Limitation : inner"));
        prop_assert!(detailed.contains("at step"));
    }

    #[test]
    fn prop_detailed_message_for_every_family(index in 0usize..4, text in "[A-Z][A-Z ]{0,23}") {
        let failure = failure_of_family(index, &text);

        let plain = failure.message(false);
        prop_assert_eq!(&plain, &text);
        prop_assert!(!plain.contains("inner detail"));
        prop_assert!(!plain.contains("applying batch"));

        let detailed = failure.message(true);
        prop_assert!(detailed.starts_with(&text));
        prop_assert!(detailed.contains("inner detail"));
        prop_assert!(detailed.contains("\n[runtime steps:\n  at applying batch]"));
    }

    #[test]
    fn prop_causes_keep_order_and_duplicates(messages in proptest::collection::vec("[a-z]{1,6}", 0..12)) {
        let mut tx = TransactionFailure::new("batch failed");
        for message in &messages {
            tx.add_cause(Unrecoverable::limitation(message.clone()));
        }

        let seen: Vec<String> = tx.causes().iter().map(|c| c.message(false)).collect();
        prop_assert_eq!(&seen, &messages);
        prop_assert_eq!(tx.cause().map(|c| c.message(false)), messages.first().cloned());
    }
}
