//! Configuration validation utilities and rules

use crate::WardError;

/// Configuration validation result
pub type ValidationResult = Result<(), ValidationError>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Value is required but missing
    #[error("Field '{field}' is required but missing")]
    Required { field: String },
    /// Value must be strictly positive
    #[error("Field '{field}' must be greater than zero")]
    NotPositive { field: String },
    /// Value is out of acceptable range
    #[error("Field '{field}' must be at most {max} (got {actual})")]
    TooLarge { field: String, max: u64, actual: u64 },
    /// Custom validation failed
    #[error("Field '{field}': {message}")]
    Custom { field: String, message: String },
}

impl From<ValidationError> for WardError {
    fn from(err: ValidationError) -> Self {
        WardError::invalid(err.to_string())
    }
}

/// Configuration validator that accumulates validation rules
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
    field_prefix: String,
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator for a nested field
    pub fn for_field(&self, field_name: &str) -> Self {
        Self {
            errors: Vec::new(),
            field_prefix: self.qualify(field_name),
        }
    }

    fn qualify(&self, field: &str) -> String {
        if self.field_prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.field_prefix, field)
        }
    }

    /// Require a strictly positive integer
    pub fn require_positive(&mut self, field: &str, value: u64) -> &mut Self {
        if value == 0 {
            self.errors.push(ValidationError::NotPositive {
                field: self.qualify(field),
            });
        }
        self
    }

    /// Require a value no larger than `max`
    pub fn require_at_most(&mut self, field: &str, value: u64, max: u64) -> &mut Self {
        if value > max {
            self.errors.push(ValidationError::TooLarge {
                field: self.qualify(field),
                max,
                actual: value,
            });
        }
        self
    }

    /// Record a custom failure when `ok` is false
    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(ValidationError::Custom {
                field: self.qualify(field),
                message: message.into(),
            });
        }
        self
    }

    /// Fold a nested validator's errors into this one
    pub fn merge(&mut self, nested: ConfigValidator) -> &mut Self {
        self.errors.extend(nested.errors);
        self
    }

    /// Errors collected so far
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Finish validation, joining every collected error into one
    pub fn finish(self) -> Result<(), WardError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(WardError::invalid(joined))
    }
}
