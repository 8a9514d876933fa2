use serde_json::Value;

use crate::constants::{BLANK_MESSAGE, INVALID_STRING_MESSAGE, NULL_MESSAGE};
use crate::field::impl_field_options;
use crate::{
    ConvertsScalar, ErrorCode, Field, FieldOptions, MaxLengthValidator, MinLengthValidator,
    ValidatesScalar, ValidationError, Validator, Validators,
};

/// Text field. Numbers are accepted and rendered as text.
#[derive(Debug)]
pub struct CharField {
    options: FieldOptions,
    allow_blank: bool,
    trim_whitespace: bool,
    validators: Validators<str>,
}

impl Default for CharField {
    fn default() -> Self {
        Self {
            options: FieldOptions::default(),
            allow_blank: false,
            trim_whitespace: true,
            validators: Validators::default(),
        }
    }
}

impl_field_options!(CharField);

impl CharField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_length(self, max_length: usize) -> Self {
        self.validator(MaxLengthValidator(max_length))
    }

    #[must_use]
    pub fn min_length(self, min_length: usize) -> Self {
        self.validator(MinLengthValidator(min_length))
    }

    #[must_use]
    pub const fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    #[must_use]
    pub const fn trim_whitespace(mut self, trim_whitespace: bool) -> Self {
        self.trim_whitespace = trim_whitespace;
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: impl Validator<str> + 'static) -> Self {
        self.validators.push(validator);
        self
    }
}

impl ConvertsScalar for CharField {
    type Native = String;

    fn to_representation(&self, value: &String) -> Result<Value, ValidationError> {
        Ok(Value::String(value.clone()))
    }

    fn to_internal(&self, data: &Value) -> Result<String, ValidationError> {
        let text = match data {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Null => return Err(self.options.error(ErrorCode::Enull, NULL_MESSAGE)),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                return Err(self.options.error(ErrorCode::Einvalid, INVALID_STRING_MESSAGE));
            }
        };

        if self.trim_whitespace {
            Ok(text.trim().to_string())
        } else {
            Ok(text)
        }
    }
}

impl ValidatesScalar for CharField {
    fn run_validators(&self, value: &String) -> Result<(), ValidationError> {
        if value.is_empty() {
            if self.allow_blank {
                return Ok(());
            }
            return Err(self.options.error(ErrorCode::Eblank, BLANK_MESSAGE));
        }
        self.validators.run(value, &self.options)
    }
}

impl Field for CharField {
    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn kind(&self) -> String {
        "char".to_string()
    }
}
