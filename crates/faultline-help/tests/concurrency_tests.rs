//! Concurrent registration and resolution.
//!
//! The registry is shared process-wide, so registration and resolution from
//! many threads must complete and leave last-write-wins state behind.

use faultline_core::prelude::*;
use faultline_help::{CauseTranslator, HelpTextRegistry, ResolutionSource};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const ROUNDS: usize = 200;

#[test]
fn concurrent_registration_and_resolution() {
    let registry = Arc::new(HelpTextRegistry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for round in 0..ROUNDS {
                    registry.register_text(FailureKind::Limitation, format!("thread {t} round {round}"));
                    registry.register_translator(FailureKind::ReturnCode, CauseTranslator);

                    let failure: AnyFailure = ReturnCode::new("busy")
                        .caused_by(Unrecoverable::limitation("pool exhausted"))
                        .into();
                    let resolution = registry.resolve_traced(&CallContext::new(), &failure);
                    assert_eq!(resolution.source, ResolutionSource::Translator);
                    assert!(resolution.text.to_string().starts_with("thread "));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let key = Classification::from(FailureKind::Limitation);
    let last = registry.text_for(&key).unwrap().to_string();
    assert!(last.ends_with(&format!("round {}", ROUNDS - 1)));
    assert_eq!(registry.len(), 2);
}

#[test]
fn translator_may_register_while_resolving() {
    let registry = HelpTextRegistry::new();
    registry.register_translator_fn(FailureKind::SecurityViolation, |cx, failure| {
        // registering from inside a translator must not deadlock
        cx.registry()
            .register_text(FailureKind::Limitation, "registered during resolution");
        Some(Message::new("denied: %(m)").with("m", failure.message(false)))
    });

    let failure: AnyFailure = Unrecoverable::security_violation("no token").into();
    let text = registry.resolve_text(&CallContext::new(), &failure);
    assert_eq!(text, "denied: no token");
    assert!(registry.has_text(&FailureKind::Limitation.into()));
}
