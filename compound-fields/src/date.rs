use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde_json::Value;

use crate::constants::{ISO_8601, ISO_8601_DATE_PATTERN, NULL_MESSAGE};
use crate::field::impl_field_options;
use crate::{
    ConvertsScalar, ErrorCode, Field, FieldOptions, ValidatesScalar, ValidationError, Validator,
    Validators,
};

#[derive(Debug, Clone)]
pub struct InvalidDateFormat(pub String);

impl fmt::Display for InvalidDateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InvalidDateFormat {}

/// Date text format: ISO 8601 or a `strftime` pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    Iso8601,
    Pattern(String),
}

impl DateFormat {
    fn pattern(&self) -> &str {
        match self {
            Self::Iso8601 => ISO_8601_DATE_PATTERN,
            Self::Pattern(p) => p,
        }
    }

    pub fn format(&self, date: &NaiveDate) -> Result<String, fmt::Error> {
        let mut out = String::new();
        write!(out, "{}", date.format(self.pattern()))?;
        Ok(out)
    }

    #[must_use]
    pub fn parse(&self, s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, self.pattern()).ok()
    }

    /// A sample date must survive formatting then parsing unchanged.
    fn round_trips(&self) -> bool {
        let Some(sample) = NaiveDate::from_ymd_opt(2000, 1, 2) else {
            return false;
        };
        self.format(&sample)
            .ok()
            .and_then(|text| self.parse(&text))
            == Some(sample)
    }

    /// Human readable form used in error messages, e.g. `DD/MM/YYYY`.
    #[must_use]
    pub fn hint(&self) -> String {
        [
            ("%Y", "YYYY"),
            ("%y", "YY"),
            ("%m", "MM"),
            ("%d", "DD"),
            ("%b", "[Jan-Dec]"),
            ("%B", "[January-December]"),
            ("%j", "DDD"),
        ]
        .iter()
        .fold(self.pattern().to_string(), |acc, (from, to)| {
            acc.replace(from, to)
        })
    }
}

impl FromStr for DateFormat {
    type Err = InvalidDateFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ISO_8601) {
            return Ok(Self::Iso8601);
        }
        if s.is_empty() {
            return Err(InvalidDateFormat("Date format cannot be empty".to_string()));
        }
        if StrftimeItems::new(s).any(|item| matches!(item, Item::Error)) {
            return Err(InvalidDateFormat(format!(
                "Date format '{s}' is not a valid strftime pattern"
            )));
        }
        let format = Self::Pattern(s.to_string());
        if !format.round_trips() {
            return Err(InvalidDateFormat(format!(
                "Date format '{s}' cannot both render and read back a full date"
            )));
        }
        Ok(format)
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iso8601 => f.write_str(ISO_8601),
            Self::Pattern(p) => f.write_str(p),
        }
    }
}

/// Calendar date field backed by [`NaiveDate`].
#[derive(Debug)]
pub struct DateField {
    options: FieldOptions,
    format: DateFormat,
    input_formats: Vec<DateFormat>,
    validators: Validators<NaiveDate>,
}

impl Default for DateField {
    fn default() -> Self {
        Self {
            options: FieldOptions::default(),
            format: DateFormat::Iso8601,
            input_formats: vec![DateFormat::Iso8601],
            validators: Validators::default(),
        }
    }
}

impl_field_options!(DateField);

impl DateField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Output format.
    #[must_use]
    pub fn format(mut self, format: DateFormat) -> Self {
        self.format = format;
        self
    }

    /// Accepted input formats, tried in order.
    #[must_use]
    pub fn input_formats(mut self, input_formats: Vec<DateFormat>) -> Self {
        self.input_formats = input_formats;
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: impl Validator<NaiveDate> + 'static) -> Self {
        self.validators.push(validator);
        self
    }

    fn wrong_format(&self) -> ValidationError {
        let hints: Vec<String> = self.input_formats.iter().map(DateFormat::hint).collect();
        self.options.error(
            ErrorCode::Einvalid,
            &format!(
                "Date has wrong format. Use one of these formats instead: {}.",
                hints.join(", ")
            ),
        )
    }
}

impl ConvertsScalar for DateField {
    type Native = NaiveDate;

    fn to_representation(&self, value: &NaiveDate) -> Result<Value, ValidationError> {
        self.format
            .format(value)
            .map(Value::String)
            .map_err(|_| self.options.error(ErrorCode::Einvalid, "Date cannot be formatted."))
    }

    fn to_internal(&self, data: &Value) -> Result<NaiveDate, ValidationError> {
        match data {
            Value::String(s) => self
                .input_formats
                .iter()
                .find_map(|format| format.parse(s.trim()))
                .ok_or_else(|| self.wrong_format()),
            Value::Null => Err(self.options.error(ErrorCode::Enull, NULL_MESSAGE)),
            Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
                Err(self.wrong_format())
            }
        }
    }
}

impl ValidatesScalar for DateField {
    fn run_validators(&self, value: &NaiveDate) -> Result<(), ValidationError> {
        self.validators.run(value, &self.options)
    }
}

impl Field for DateField {
    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn kind(&self) -> String {
        "date".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorDetail;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_round_trip() {
        let field = DateField::new().format(DateFormat::Iso8601);
        let repr = field.to_representation(&date(2024, 2, 29)).unwrap();
        assert_eq!(repr, json!("2024-02-29"));
        assert_eq!(field.to_internal(&repr).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_custom_output_format() {
        let field = DateField::new().format("%d/%m/%Y".parse().unwrap());
        assert_eq!(
            field.to_representation(&date(2023, 1, 9)).unwrap(),
            json!("09/01/2023")
        );
    }

    #[test]
    fn test_input_formats_tried_in_order() {
        let field = DateField::new().input_formats(vec![
            DateFormat::Iso8601,
            "%d/%m/%Y".parse().unwrap(),
        ]);
        assert_eq!(field.to_internal(&json!("2023-01-09")).unwrap(), date(2023, 1, 9));
        assert_eq!(field.to_internal(&json!("09/01/2023")).unwrap(), date(2023, 1, 9));
    }

    #[test]
    fn test_wrong_format_lists_hints() {
        let field = DateField::new().input_formats(vec![
            DateFormat::Iso8601,
            "%d/%m/%Y".parse().unwrap(),
        ]);
        let err = field.to_internal(&json!("January 9th")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Date has wrong format. Use one of these formats instead: YYYY-MM-DD, DD/MM/YYYY."
        );
        assert!(field.to_internal(&json!(20_230_109)).is_err());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("iso-8601".parse::<DateFormat>().unwrap(), DateFormat::Iso8601);
        assert!("".parse::<DateFormat>().is_err());
        assert!("%Q%".parse::<DateFormat>().is_err());
        assert!("%d/%m/%y".parse::<DateFormat>().is_ok());
        assert_eq!(DateFormat::Iso8601.to_string(), ISO_8601);
    }

    #[test]
    fn test_format_must_hold_a_full_date() {
        for pattern in ["%H:%M", "%Y-%m", "%Y", "%d %H"] {
            let err = pattern.parse::<DateFormat>().unwrap_err();
            assert!(err.to_string().contains("full date"), "{pattern}: {err}");
        }
        assert!("%Y-%j".parse::<DateFormat>().is_ok());
    }

    #[test]
    fn test_validator() {
        let cutoff = date(2000, 1, 1);
        let field = DateField::new().validator(move |d: &NaiveDate| {
            if *d < cutoff {
                Err(ErrorDetail::new(ErrorCode::Eminvalue, "too early"))
            } else {
                Ok(())
            }
        });
        assert!(field.run_validators(&date(2001, 1, 1)).is_ok());
        assert!(field.run_validators(&date(1999, 1, 1)).is_err());
    }
}
