use serde_json::Value;
use thiserror::Error;

use crate::config::ValidationConfig;
use crate::models::{RecordThoughtParams, ThoughtRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {field}: must be a string")]
    NotText { field: &'static str },

    #[error("Invalid {field}: must be an integer")]
    NotInteger { field: &'static str },

    #[error("Invalid {field}: must be a boolean")]
    NotBoolean { field: &'static str },

    #[error("Invalid {field}: {value} is not a positive number")]
    NotPositive { field: &'static str, value: i64 },

    #[error("Thought content too long: {actual} chars (max: {max})")]
    ThoughtTooLong { actual: usize, max: usize },
}

impl ValidationError {
    /// Name of the offending tool argument
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NotText { field }
            | ValidationError::NotInteger { field }
            | ValidationError::NotBoolean { field }
            | ValidationError::NotPositive { field, .. } => field,
            ValidationError::ThoughtTooLong { .. } => "thought",
        }
    }
}

type Checked<T> = std::result::Result<T, ValidationError>;

#[derive(Clone)]
pub struct InputValidator {
    max_thought_length: Option<usize>,
}

impl InputValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            max_thought_length: config.max_thought_length,
        }
    }

    /// Check every field of a raw record_thought call and build the record.
    /// The first offending field wins; nothing is stored on failure.
    pub fn validate_record(&self, params: &RecordThoughtParams) -> Checked<ThoughtRecord> {
        let user_id = required_text("user_id", &params.user_id)?;
        let thread_id = required_text("thread_id", &params.thread_id)?;
        let thought = required_text("thought", &params.thought)?;
        let thought_number = required_positive("thought_number", &params.thought_number)?;
        let total_thoughts = required_positive("total_thoughts", &params.total_thoughts)?;
        let next_thought_needed =
            optional_bool("next_thought_needed", &params.next_thought_needed)?.unwrap_or(true);

        let is_revision = optional_bool("is_revision", &params.is_revision)?;
        let revises_thought = optional_positive("revises_thought", &params.revises_thought)?;
        let branch_from_thought =
            optional_positive("branch_from_thought", &params.branch_from_thought)?;
        let branch_id = optional_text("branch_id", &params.branch_id)?;
        let needs_more_thoughts = optional_bool("needs_more_thoughts", &params.needs_more_thoughts)?;

        self.validate_thought_content(&thought)?;

        Ok(ThoughtRecord {
            user_id,
            thread_id,
            thought,
            thought_number,
            total_thoughts,
            next_thought_needed,
            is_revision,
            revises_thought,
            branch_from_thought,
            branch_id,
            needs_more_thoughts,
        })
    }

    pub fn validate_thought_content(&self, content: &str) -> Checked<()> {
        let Some(max) = self.max_thought_length else {
            return Ok(());
        };
        let length = content.chars().count();
        if length > max {
            return Err(ValidationError::ThoughtTooLong { actual: length, max });
        }
        Ok(())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

fn required_text(field: &'static str, value: &Value) -> Checked<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::NotText { field })
}

fn optional_text(field: &'static str, value: &Value) -> Checked<Option<String>> {
    match value {
        Value::Null => Ok(None),
        other => required_text(field, other).map(Some),
    }
}

fn required_positive(field: &'static str, value: &Value) -> Checked<i64> {
    // JSON floats and booleans are rejected, only integral numbers pass.
    let number = value.as_i64().ok_or(ValidationError::NotInteger { field })?;
    if number < 1 {
        return Err(ValidationError::NotPositive { field, value: number });
    }
    Ok(number)
}

fn optional_positive(field: &'static str, value: &Value) -> Checked<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        other => required_positive(field, other).map(Some),
    }
}

fn optional_bool(field: &'static str, value: &Value) -> Checked<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(*flag)),
        _ => Err(ValidationError::NotBoolean { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> RecordThoughtParams {
        serde_json::from_value(value).expect("params should deserialize")
    }

    fn base() -> Value {
        json!({
            "user_id": "u1",
            "thread_id": "t1",
            "thought": "Step A",
            "thought_number": 1,
            "total_thoughts": 2
        })
    }

    #[test]
    fn test_minimal_record_defaults_next_thought_needed() {
        let validator = InputValidator::default();
        let record = validator.validate_record(&params(base())).unwrap();

        assert_eq!(record.user_id, "u1");
        assert_eq!(record.thread_id, "t1");
        assert_eq!(record.thought_number, 1);
        assert_eq!(record.total_thoughts, 2);
        assert!(record.next_thought_needed);
        assert_eq!(record.is_revision, None);
        assert_eq!(record.branch_id, None);
    }

    #[test]
    fn test_non_text_user_id_is_rejected() {
        let validator = InputValidator::default();
        let mut raw = base();
        raw["user_id"] = json!(123);

        let err = validator.validate_record(&params(raw)).unwrap_err();
        assert_eq!(err, ValidationError::NotText { field: "user_id" });
        assert_eq!(err.to_string(), "Invalid user_id: must be a string");
    }

    #[test]
    fn test_missing_thread_id_is_rejected() {
        let validator = InputValidator::default();
        let mut raw = base();
        raw.as_object_mut().unwrap().remove("thread_id");

        let err = validator.validate_record(&params(raw)).unwrap_err();
        assert_eq!(err.field(), "thread_id");
    }

    #[test]
    fn test_float_and_string_numbers_are_rejected() {
        let validator = InputValidator::default();

        let mut raw = base();
        raw["thought_number"] = json!(1.5);
        assert_eq!(
            validator.validate_record(&params(raw)).unwrap_err(),
            ValidationError::NotInteger { field: "thought_number" }
        );

        let mut raw = base();
        raw["total_thoughts"] = json!("3");
        assert_eq!(
            validator.validate_record(&params(raw)).unwrap_err(),
            ValidationError::NotInteger { field: "total_thoughts" }
        );
    }

    #[test]
    fn test_non_positive_numbers_are_rejected() {
        let validator = InputValidator::default();
        let mut raw = base();
        raw["thought_number"] = json!(0);

        assert!(matches!(
            validator.validate_record(&params(raw)),
            Err(ValidationError::NotPositive { field: "thought_number", value: 0 })
        ));
    }

    #[test]
    fn test_non_boolean_next_thought_needed_is_rejected() {
        let validator = InputValidator::default();
        let mut raw = base();
        raw["next_thought_needed"] = json!("false");

        assert_eq!(
            validator.validate_record(&params(raw)).unwrap_err(),
            ValidationError::NotBoolean { field: "next_thought_needed" }
        );
    }

    #[test]
    fn test_optional_fields_accept_null_and_values() {
        let validator = InputValidator::default();
        let mut raw = base();
        raw["is_revision"] = Value::Null;
        raw["branch_from_thought"] = json!(1);
        raw["branch_id"] = json!("alt");
        raw["needs_more_thoughts"] = json!(true);

        let record = validator.validate_record(&params(raw)).unwrap();
        assert_eq!(record.is_revision, None);
        assert_eq!(record.branch_from_thought, Some(1));
        assert_eq!(record.branch_id.as_deref(), Some("alt"));
        assert_eq!(record.needs_more_thoughts, Some(true));
    }

    #[test]
    fn test_wrongly_typed_optional_field_is_rejected() {
        let validator = InputValidator::default();
        let mut raw = base();
        raw["branch_id"] = json!(7);

        assert_eq!(
            validator.validate_record(&params(raw)).unwrap_err().field(),
            "branch_id"
        );
    }

    #[test]
    fn test_oversized_thought_content() {
        let validator = InputValidator::new(&ValidationConfig {
            max_thought_length: Some(10),
        });
        assert!(validator.validate_thought_content("0123456789").is_ok());
        assert!(matches!(
            validator.validate_thought_content("0123456789x"),
            Err(ValidationError::ThoughtTooLong { actual: 11, max: 10 })
        ));
    }

    #[test]
    fn test_empty_thought_is_accepted() {
        let validator = InputValidator::default();
        let mut raw = base();
        raw["thought"] = json!("");

        assert!(validator.validate_record(&params(raw)).is_ok());
    }

    #[test]
    fn test_long_thought_is_accepted_without_a_cap() {
        let validator = InputValidator::default();
        let mut raw = base();
        raw["thought"] = json!("x".repeat(10_001));

        let record = validator.validate_record(&params(raw)).unwrap();
        assert_eq!(record.thought.chars().count(), 10_001);
    }
}
