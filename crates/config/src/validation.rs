//! Validation system for configuration values
//!
//! Each config section implements the `ConfigSection` trait which includes validation.

pub use crate::error::ValidationError;

/// Trait for configuration sections that can validate themselves
///
/// `ServerConfiguration` and the sections it composes implement this trait,
/// so a section can be checked, merged and reported on its own.
pub trait ConfigSection: Default {
    /// Validates the configuration section
    ///
    /// Returns every validation error found. `Ok` means valid.
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another config section into this one
    ///
    /// Values from `other` take precedence. This is used for override chains.
    fn merge(&mut self, other: Self);

    /// Returns the section name for error reporting
    fn section_name(&self) -> &'static str;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a numeric value is within a range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::with_value(
                field,
                format!("must be between {} and {}", min, max),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that `lower` is strictly less than `upper`
    ///
    /// The error is reported against the lower field.
    pub fn less_than<T>(
        lower: T,
        upper: T,
        field: &str,
        upper_field: &str,
    ) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if lower < upper {
            Ok(())
        } else {
            Err(ValidationError::with_value(
                field,
                format!("must be less than {} ({})", upper_field, upper),
                lower,
            ))
        }
    }

    /// Validates that two values differ
    pub fn distinct<T>(
        value: T,
        other: T,
        field: &str,
        other_field: &str,
    ) -> Result<(), ValidationError>
    where
        T: PartialEq + std::fmt::Display + Copy,
    {
        if value == other {
            Err(ValidationError::with_value(
                field,
                format!("must differ from {}", other_field),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a string is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
