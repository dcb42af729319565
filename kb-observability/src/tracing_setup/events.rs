//! Structured log events for decisions other systems act on.

pub fn auto_answered(dialog_id: &str, similarity: f64) {
    tracing::info!(
        event = "auto_answered",
        dialog_id = %dialog_id,
        similarity,
        "question auto-answered"
    );
}

pub fn escalated(reason: &str) {
    tracing::info!(event = "escalated", reason = %reason, "question escalated");
}

pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degraded mode"
    );
}

pub fn degradation_recovered(component: &str) {
    tracing::info!(
        event = "degradation_recovered",
        component = %component,
        "component recovered"
    );
}

pub fn automation_fired(rule: &str, action: &str) {
    tracing::debug!(event = "automation_fired", rule = %rule, action = %action, "automation rule matched");
}
