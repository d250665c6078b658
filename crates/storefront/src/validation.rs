//! Form field validation errors.

use thiserror::Error;

/// One invalid form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every invalid field of a submitted form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_fields(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Record `message` for `field` when `condition` is false.
    pub fn check(&mut self, condition: bool, field: &'static str, message: &str) {
        if !condition {
            self.push(field, message);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut errors = ValidationErrors::new();
        errors.check(false, "name", "Name is required");
        errors.check(true, "email", "unused");
        errors.check(false, "message", "Message is required");

        assert_eq!(errors.fields(), ["name", "message"]);
        assert_eq!(errors.message_for("name"), Some("Name is required"));
        assert_eq!(errors.message_for("email"), None);
        assert_eq!(
            errors.to_string(),
            "name: Name is required; message: Message is required"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_is_std_error() {
        let mut errors = ValidationErrors::new();
        errors.push("zip", "ZIP code is required");

        let err: Box<dyn std::error::Error> = Box::new(errors);
        assert_eq!(err.to_string(), "zip: ZIP code is required");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_empty_is_ok() {
        assert_eq!(ValidationErrors::new().into_result(), Ok(()));
    }
}
