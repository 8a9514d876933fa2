use std::fmt;

use crate::{ErrorCode, ErrorDetail, FieldOptions, ValidationError};

/// A rule applied to a converted value.
///
/// Closures taking `&T` and returning `Result<(), ErrorDetail>` are validators.
pub trait Validator<T: ?Sized>: Send + Sync {
    fn validate(&self, value: &T) -> Result<(), ErrorDetail>;
}

impl<T: ?Sized, F> Validator<T> for F
where
    F: Fn(&T) -> Result<(), ErrorDetail> + Send + Sync,
{
    fn validate(&self, value: &T) -> Result<(), ErrorDetail> {
        self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLengthValidator(pub usize);

impl Validator<str> for MaxLengthValidator {
    fn validate(&self, value: &str) -> Result<(), ErrorDetail> {
        if value.chars().count() > self.0 {
            return Err(ErrorDetail::new(
                ErrorCode::Emaxlength,
                &format!("Ensure this field has no more than {} characters.", self.0),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLengthValidator(pub usize);

impl Validator<str> for MinLengthValidator {
    fn validate(&self, value: &str) -> Result<(), ErrorDetail> {
        if value.chars().count() < self.0 {
            return Err(ErrorDetail::new(
                ErrorCode::Eminlength,
                &format!("Ensure this field has at least {} characters.", self.0),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxValueValidator(pub i64);

impl Validator<i64> for MaxValueValidator {
    fn validate(&self, value: &i64) -> Result<(), ErrorDetail> {
        if *value > self.0 {
            return Err(ErrorDetail::new(
                ErrorCode::Emaxvalue,
                &format!("Ensure this value is less than or equal to {}.", self.0),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinValueValidator(pub i64);

impl Validator<i64> for MinValueValidator {
    fn validate(&self, value: &i64) -> Result<(), ErrorDetail> {
        if *value < self.0 {
            return Err(ErrorDetail::new(
                ErrorCode::Eminvalue,
                &format!("Ensure this value is greater than or equal to {}.", self.0),
            ));
        }
        Ok(())
    }
}

/// Ordered validators attached to a field.
pub struct Validators<T: ?Sized> {
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T: ?Sized> Default for Validators<T> {
    fn default() -> Self {
        Self {
            validators: Vec::new(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Validators<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validators({})", self.validators.len())
    }
}

impl<T: ?Sized> Validators<T> {
    pub fn push(&mut self, validator: impl Validator<T> + 'static) {
        self.validators.push(Box::new(validator));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Runs every validator and reports all failures at once.
    pub fn run(&self, value: &T, options: &FieldOptions) -> Result<(), ValidationError> {
        let details: Vec<ErrorDetail> = self
            .validators
            .iter()
            .filter_map(|v| v.validate(value).err())
            .map(|detail| options.localize(detail))
            .collect();

        if details.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(crate::ErrorMessages::List(details)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorMessages;

    #[test]
    fn test_max_length_counts_characters() {
        let v = MaxLengthValidator(5);
        assert!(v.validate("12345").is_ok());
        assert!(v.validate("héllo").is_ok());
        let err = v.validate("123456").unwrap_err();
        assert_eq!(err.code, ErrorCode::Emaxlength);
        assert!(err.message.contains('5'));
    }

    #[test]
    fn test_min_length() {
        let v = MinLengthValidator(2);
        assert!(v.validate("ab").is_ok());
        assert_eq!(v.validate("a").unwrap_err().code, ErrorCode::Eminlength);
    }

    #[test]
    fn test_value_bounds() {
        assert!(MaxValueValidator(10).validate(&10).is_ok());
        assert_eq!(
            MaxValueValidator(10).validate(&11).unwrap_err().code,
            ErrorCode::Emaxvalue
        );
        assert!(MinValueValidator(-1).validate(&-1).is_ok());
        assert_eq!(
            MinValueValidator(-1).validate(&-2).unwrap_err().code,
            ErrorCode::Eminvalue
        );
    }

    #[test]
    fn test_run_collects_all_failures() {
        let mut validators: Validators<str> = Validators::default();
        validators.push(MaxLengthValidator(3));
        validators.push(|value: &str| {
            if value.starts_with('x') {
                Err(ErrorDetail::new(ErrorCode::Einvalid, "no x"))
            } else {
                Ok(())
            }
        });
        assert_eq!(validators.len(), 2);

        let options = FieldOptions::default();
        assert!(validators.run("abc", &options).is_ok());

        let err = validators.run("xylophone", &options).unwrap_err();
        let ValidationError::Invalid(ErrorMessages::List(details)) = err else {
            panic!("expected a flat list of details");
        };
        let codes: Vec<_> = details.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![ErrorCode::Emaxlength, ErrorCode::Einvalid]);
    }

    #[test]
    fn test_run_applies_message_overrides() {
        let mut validators: Validators<str> = Validators::default();
        validators.push(MaxLengthValidator(1));
        let mut options = FieldOptions::default();
        options
            .error_messages
            .insert(ErrorCode::Emaxlength, "Too long.".to_string());

        let err = validators.run("ab", &options).unwrap_err();
        assert_eq!(err.to_string(), "Too long.");
    }
}
