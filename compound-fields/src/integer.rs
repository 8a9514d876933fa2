use serde_json::Value;

use crate::constants::{
    INTEGER_STRING_TOO_LARGE_MESSAGE, INVALID_INTEGER_MESSAGE, MAX_INTEGER_STRING_LENGTH,
    NULL_MESSAGE,
};
use crate::field::impl_field_options;
use crate::{
    ConvertsScalar, ErrorCode, Field, FieldOptions, MaxValueValidator, MinValueValidator,
    ValidatesScalar, ValidationError, Validator, Validators,
};

/// Signed 64-bit integer field. Integer strings are accepted.
#[derive(Debug, Default)]
pub struct IntegerField {
    options: FieldOptions,
    validators: Validators<i64>,
}

impl_field_options!(IntegerField);

impl IntegerField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_value(self, max_value: i64) -> Self {
        self.validator(MaxValueValidator(max_value))
    }

    #[must_use]
    pub fn min_value(self, min_value: i64) -> Self {
        self.validator(MinValueValidator(min_value))
    }

    #[must_use]
    pub fn validator(mut self, validator: impl Validator<i64> + 'static) -> Self {
        self.validators.push(validator);
        self
    }

    fn parse_str(&self, s: &str) -> Result<i64, ValidationError> {
        if s.len() > MAX_INTEGER_STRING_LENGTH {
            return Err(self
                .options
                .error(ErrorCode::Einvalid, INTEGER_STRING_TOO_LARGE_MESSAGE));
        }
        let s = s.trim();
        // Integral decimals such as "7.0" or "7." are whole numbers.
        let digits = match s.split_once('.') {
            Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
            Some(_) | None => s,
        };
        digits
            .parse::<i64>()
            .map_err(|_| self.options.error(ErrorCode::Einvalid, INVALID_INTEGER_MESSAGE))
    }
}

impl ConvertsScalar for IntegerField {
    type Native = i64;

    fn to_representation(&self, value: &i64) -> Result<Value, ValidationError> {
        Ok(Value::from(*value))
    }

    fn to_internal(&self, data: &Value) -> Result<i64, ValidationError> {
        match data {
            Value::Number(n) => match n.as_i64() {
                Some(value) => Ok(value),
                None => self.parse_str(&n.to_string()),
            },
            Value::String(s) => self.parse_str(s),
            Value::Null => Err(self.options.error(ErrorCode::Enull, NULL_MESSAGE)),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                Err(self.options.error(ErrorCode::Einvalid, INVALID_INTEGER_MESSAGE))
            }
        }
    }
}

impl ValidatesScalar for IntegerField {
    fn run_validators(&self, value: &i64) -> Result<(), ValidationError> {
        self.validators.run(value, &self.options)
    }
}

impl Field for IntegerField {
    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn kind(&self) -> String {
        "integer".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_internal_number_and_string() {
        let field = IntegerField::new();
        assert_eq!(field.to_internal(&json!(12)).unwrap(), 12);
        assert_eq!(field.to_internal(&json!("-3")).unwrap(), -3);
    }

    #[test]
    fn test_to_internal_rejects_fractions_and_text() {
        let field = IntegerField::new();
        for data in [json!(1.5), json!("abc"), json!(true), json!([1])] {
            let err = field.to_internal(&data).unwrap_err();
            assert_eq!(err.to_string(), INVALID_INTEGER_MESSAGE);
        }
    }

    #[test]
    fn test_to_internal_accepts_integral_decimals() {
        let field = IntegerField::new();
        assert_eq!(field.to_internal(&json!(1.0)).unwrap(), 1);
        assert_eq!(field.to_internal(&json!("1.0")).unwrap(), 1);
        assert_eq!(field.to_internal(&json!(" -4.000 ")).unwrap(), -4);
        assert_eq!(field.to_internal(&json!("12.")).unwrap(), 12);
        for data in [json!("1.01"), json!("."), json!(2.5), json!(1e20)] {
            assert!(field.to_internal(&data).is_err(), "{data}");
        }
    }

    #[test]
    fn test_to_internal_rejects_huge_strings() {
        let field = IntegerField::new();
        let huge = "9".repeat(MAX_INTEGER_STRING_LENGTH + 1);
        let err = field.to_internal(&json!(huge)).unwrap_err();
        assert_eq!(err.to_string(), INTEGER_STRING_TOO_LARGE_MESSAGE);
    }

    #[test]
    fn test_bounds_report_together() {
        let field = IntegerField::new()
            .min_value(10)
            .max_value(5)
            .label("count");
        let err = field.run_validators(&7).unwrap_err();
        assert_eq!(err.messages().details().count(), 2);
        assert!(field.run_validators(&7).is_err());
    }

    #[test]
    fn test_within_bounds() {
        let field = IntegerField::new().min_value(0).max_value(10);
        assert!(field.run_validators(&0).is_ok());
        assert!(field.run_validators(&10).is_ok());
        assert!(field.run_validators(&11).is_err());
    }

    #[test]
    fn test_round_trip() {
        let field = IntegerField::new();
        let repr = field.to_representation(&-42).unwrap();
        assert_eq!(repr, json!(-42));
        assert_eq!(field.to_internal(&repr).unwrap(), -42);
    }
}
