use serde_json::Value;

use crate::constants::{EMPTY_MESSAGE, NULL_MESSAGE};
use crate::field::{collect_indexed, impl_field_options};
use crate::shape::type_name;
use crate::{
    ConvertsScalar, ErrorCode, ErrorMap, Field, FieldOptions, ValidatesScalar, ValidationError,
};

/// A field that always holds a list of inner values.
#[derive(Debug)]
pub struct ListField<F> {
    inner: F,
    options: FieldOptions,
    allow_empty: bool,
}

impl<F: Default> Default for ListField<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl_field_options!(ListField<F>);

impl<F> ListField<F> {
    #[must_use]
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            options: FieldOptions::default(),
            allow_empty: true,
        }
    }

    #[must_use]
    pub const fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    #[must_use]
    pub const fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: Field> ConvertsScalar for ListField<F> {
    type Native = Vec<F::Native>;

    fn to_representation(&self, value: &Self::Native) -> Result<Value, ValidationError> {
        collect_indexed(value, |item| self.inner.to_representation(item)).map(Value::Array)
    }

    fn to_internal(&self, data: &Value) -> Result<Self::Native, ValidationError> {
        match data {
            Value::Array(items) => collect_indexed(items, |item| self.inner.to_internal(item)),
            Value::Null => Err(self.options.error(ErrorCode::Enull, NULL_MESSAGE)),
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
                Err(self.options.error(
                    ErrorCode::Enotalist,
                    &format!(
                        "Expected a list of items but got type \"{}\".",
                        type_name(data)
                    ),
                ))
            }
        }
    }
}

impl<F: Field> ValidatesScalar for ListField<F> {
    fn run_validators(&self, value: &Self::Native) -> Result<(), ValidationError> {
        if value.is_empty() && !self.allow_empty {
            return Err(self.options.error(ErrorCode::Eempty, EMPTY_MESSAGE));
        }

        let mut errors = ErrorMap::new();
        for (index, item) in value.iter().enumerate() {
            if let Err(e) = self.inner.run_validators(item) {
                errors.add(index, e);
            }
        }
        errors.finish()
    }
}

impl<F: Field> Field for ListField<F> {
    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn kind(&self) -> String {
        format!("list<{}>", self.inner.kind())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{CharField, ErrorMessages, IntegerField};
    use serde_json::json;

    #[test]
    fn test_to_internal_list() {
        let field = ListField::new(IntegerField::new());
        assert_eq!(field.to_internal(&json!([1, "2"])).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_scalar_rejected() {
        let field = ListField::new(CharField::new());
        let err = field.to_internal(&json!("abc")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected a list of items but got type \"str\"."
        );
        let err = field.to_internal(&json!({"a": 1})).unwrap_err();
        assert!(err.to_string().contains("\"dict\""));
    }

    #[test]
    fn test_run_validators_reports_failing_indices() {
        let field = ListField::new(CharField::new().max_length(2));
        let err = field
            .run_validators(&vec!["abc".into(), "ab".into(), "abcd".into()])
            .unwrap_err();
        let ValidationError::Invalid(ErrorMessages::Indexed(map)) = err else {
            panic!("expected index-keyed messages");
        };
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_allow_empty() {
        let field = ListField::new(CharField::new());
        assert!(field.run_validators(&Vec::new()).is_ok());
        let field = ListField::new(CharField::new()).allow_empty(false);
        assert_eq!(field.run_validators(&Vec::new()).unwrap_err().to_string(), EMPTY_MESSAGE);
    }

    #[test]
    fn test_round_trip() {
        let field = ListField::<IntegerField>::default();
        let repr = field.to_representation(&vec![5, 4]).unwrap();
        assert_eq!(repr, json!([5, 4]));
        assert_eq!(field.to_internal(&repr).unwrap(), vec![5, 4]);
    }
}
