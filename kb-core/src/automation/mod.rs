//! Typed automation rules and notification templates.
//!
//! Rules map engine outcomes to actions the case-management layer executes.
//! The engine never delivers messages itself.

mod rules;
mod template;

pub use rules::{Action, AutomationRule, EngineEvent, Trigger};
pub use template::{render_template, TemplateField, TemplateFields};
