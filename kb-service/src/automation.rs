//! Turning engine events into planned automation actions.

use tracing::warn;

use kb_core::automation::{render_template, Action, AutomationRule, EngineEvent, TemplateFields};
use kb_core::models::SideEffect;
use kb_observability::tracing_setup::events;

use crate::plan::PlannedAction;

fn action_kind(action: &Action) -> &'static str {
    match action {
        Action::Notify { .. } => "notify",
        Action::AssignToAgent { .. } => "assign_to_agent",
        Action::SetPriority { .. } => "set_priority",
        Action::AddTag { .. } => "add_tag",
    }
}

/// Actions of every enabled rule matching `event`, with notification text
/// rendered. A template that fails to render marks only that action failed.
pub fn plan_actions(
    rules: &[AutomationRule],
    event: &EngineEvent,
    fields: &TemplateFields,
) -> Vec<PlannedAction> {
    AutomationRule::evaluate(rules, event)
        .into_iter()
        .map(|(rule, action)| {
            events::automation_fired(rule, action_kind(action));
            let (message, status) = match action {
                Action::Notify { template, .. } => match render_template(template, fields) {
                    Ok(text) => (Some(text), SideEffect::Recorded),
                    Err(e) => {
                        warn!(rule, error = %e, "notification template not rendered");
                        (None, SideEffect::Failed(e.to_string()))
                    }
                },
                _ => (None, SideEffect::Recorded),
            };
            PlannedAction {
                rule: rule.to_string(),
                action: action.clone(),
                message,
                status,
            }
        })
        .collect()
}
