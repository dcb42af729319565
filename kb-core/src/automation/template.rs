use std::collections::BTreeMap;

use crate::errors::{KbError, KbResult};

/// The fixed set of placeholders a notification template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TemplateField {
    Company,
    Lead,
    Question,
    Category,
    Confidence,
    DialogId,
}

impl TemplateField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "company" => Some(Self::Company),
            "lead" => Some(Self::Lead),
            "question" => Some(Self::Question),
            "category" => Some(Self::Category),
            "confidence" => Some(Self::Confidence),
            "dialog_id" => Some(Self::DialogId),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Lead => "lead",
            Self::Question => "question",
            Self::Category => "category",
            Self::Confidence => "confidence",
            Self::DialogId => "dialog_id",
        }
    }
}

/// Values available to a template render.
#[derive(Debug, Clone, Default)]
pub struct TemplateFields {
    values: BTreeMap<TemplateField, String>,
}

impl TemplateFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: TemplateField, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn get(&self, field: TemplateField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }
}

/// Render `{placeholder}` references against `fields` in a single pass.
///
/// `{{` and `}}` emit literal braces. An unknown placeholder or a known one
/// without a value is an error.
pub fn render_template(template: &str, fields: &TemplateFields) -> KbResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(KbError::Template {
                        reason: format!("unclosed placeholder '{{{name}'"),
                    });
                }
                let field = TemplateField::parse(name.trim()).ok_or_else(|| KbError::Template {
                    reason: format!("unknown placeholder '{{{name}}}'"),
                })?;
                let value = fields.get(field).ok_or_else(|| KbError::Template {
                    reason: format!("no value for placeholder '{{{}}}'", field.name()),
                })?;
                out.push_str(value);
            }
            '}' => {
                return Err(KbError::Template {
                    reason: "unmatched '}'".to_string(),
                })
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_known_fields() {
        let fields = TemplateFields::new()
            .set(TemplateField::Company, "Acme")
            .set(TemplateField::Lead, "Dana");
        let out = render_template("{company}: case for {lead}", &fields).unwrap();
        assert_eq!(out, "Acme: case for Dana");
    }

    #[test]
    fn values_are_not_re_expanded() {
        let fields = TemplateFields::new()
            .set(TemplateField::Question, "what is {company}?")
            .set(TemplateField::Company, "Acme");
        let out = render_template("Q: {question}", &fields).unwrap();
        assert_eq!(out, "Q: what is {company}?");
    }

    #[test]
    fn missing_value_is_error() {
        let err = render_template("hi {lead}", &TemplateFields::new()).unwrap_err();
        assert!(err.to_string().contains("lead"));
    }

    #[test]
    fn unknown_placeholder_is_error() {
        let err = render_template("hi {manager}", &TemplateFields::new()).unwrap_err();
        assert!(err.to_string().contains("manager"));
    }

    #[test]
    fn escaped_braces_pass_through() {
        let out = render_template("{{literal}}", &TemplateFields::new()).unwrap();
        assert_eq!(out, "{literal}");
    }

    #[test]
    fn unclosed_placeholder_is_error() {
        assert!(render_template("hi {lead", &TemplateFields::new()).is_err());
    }
}
