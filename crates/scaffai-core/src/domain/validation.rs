use serde_json::Value;

use crate::domain::{entities::Template, error::DomainError};

/// Fields every template definition must carry, in check order.
const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "name",
    "version",
    "category",
    "content",
    "variables",
    "metadata",
];

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across loaders.
pub struct DomainValidator;

impl DomainValidator {
    /// Structural check of an untyped template definition.
    ///
    /// Fails with [`DomainError::TemplateValidation`] naming the first missing
    /// or malformed field.
    pub fn validate_candidate(candidate: &Value) -> Result<(), DomainError> {
        let object = candidate
            .as_object()
            .ok_or_else(|| DomainError::validation("<root>", "expected a JSON object"))?;

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                None | Some(Value::Null) => {
                    return Err(DomainError::validation(field, "missing required field"));
                }
                Some(_) => {}
            }
        }

        if !object["content"].is_string() {
            return Err(DomainError::validation("content", "must be a string"));
        }
        if !object["variables"].is_array() {
            return Err(DomainError::validation("variables", "must be an array"));
        }

        Ok(())
    }

    /// Validate a candidate, then deserialize and check domain invariants.
    pub fn template_from_value(candidate: Value) -> Result<Template, DomainError> {
        Self::validate_candidate(&candidate)?;
        let template: Template = serde_json::from_value(candidate)
            .map_err(|e| DomainError::validation("<definition>", e.to_string()))?;
        Self::validate_template(&template)?;
        Ok(template)
    }

    pub fn validate_template(template: &Template) -> Result<(), DomainError> {
        template.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate() -> Value {
        json!({
            "id": "x",
            "name": "X",
            "version": "1.0.0",
            "category": "testing",
            "content": "hello {{who}}",
            "variables": [],
            "metadata": {}
        })
    }

    fn failing_field(value: &Value) -> String {
        match DomainValidator::validate_candidate(value) {
            Err(DomainError::TemplateValidation { field, .. }) => field,
            other => panic!("expected TemplateValidation, got {other:?}"),
        }
    }

    #[test]
    fn complete_candidate_passes() {
        assert!(DomainValidator::validate_candidate(&candidate()).is_ok());
    }

    #[test]
    fn missing_content_is_named() {
        let mut c = candidate();
        c.as_object_mut().unwrap().remove("content");
        assert_eq!(failing_field(&c), "content");
    }

    #[test]
    fn first_missing_field_wins() {
        let mut c = candidate();
        let obj = c.as_object_mut().unwrap();
        obj.remove("metadata");
        obj.remove("version");
        assert_eq!(failing_field(&c), "version");
    }

    #[test]
    fn variables_must_be_array() {
        let mut c = candidate();
        c["variables"] = json!({"a": 1});
        assert_eq!(failing_field(&c), "variables");
    }

    #[test]
    fn content_is_reported_before_variables() {
        let mut c = candidate();
        c["content"] = json!(42);
        c["variables"] = json!("nope");
        assert_eq!(failing_field(&c), "content");
    }

    #[test]
    fn content_must_be_string() {
        let mut c = candidate();
        c["content"] = json!(42);
        assert_eq!(failing_field(&c), "content");
    }

    #[test]
    fn non_object_is_rejected() {
        assert_eq!(failing_field(&json!([1, 2])), "<root>");
    }

    #[test]
    fn template_from_value_checks_grammar() {
        let mut c = candidate();
        c["content"] = json!("{{#if a}}open");
        assert!(matches!(
            DomainValidator::template_from_value(c),
            Err(DomainError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn template_from_value_reports_bad_category() {
        let mut c = candidate();
        c["category"] = json!("deployment");
        assert!(matches!(
            DomainValidator::template_from_value(c),
            Err(DomainError::TemplateValidation { field, .. }) if field == "<definition>"
        ));
    }
}
