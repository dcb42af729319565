//! Span macros produce the documented span names.

use kb_observability::tracing_setup::spans::names;
use kb_observability::{embedding_span, feedback_span, gate_span, search_span, solutions_span};

#[test]
fn macros_use_documented_names() {
    tracing::subscriber::with_default(tracing_subscriber::registry(), || {
        let cases = [
            (search_span!(5usize, Some("billing")), names::SEARCH),
            (gate_span!(42usize), names::GATE),
            (feedback_span!("dialog-1", "helpful"), names::FEEDBACK),
            (solutions_span!(None::<&str>), names::SOLUTIONS),
            (embedding_span!("hashed", 64usize), names::EMBEDDING),
        ];
        for (span, expected) in cases {
            let meta = span.metadata().expect("span enabled under registry");
            assert_eq!(meta.name(), expected);
        }
    });
}
