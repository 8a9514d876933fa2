use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::constants::{EMPTY_MESSAGE, NULL_MESSAGE};
use crate::field::{collect_keyed, impl_field_options};
use crate::shape::type_name;
use crate::{
    ConvertsScalar, ErrorCode, ErrorMap, Field, FieldOptions, ValidatesScalar, ValidationError,
};

/// A field holding a string-keyed map of inner values.
#[derive(Debug)]
pub struct DictField<F> {
    inner: F,
    options: FieldOptions,
    allow_empty: bool,
}

impl<F: Default> Default for DictField<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl_field_options!(DictField<F>);

impl<F> DictField<F> {
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

impl<F: Field> ConvertsScalar for DictField<F> {
    type Native = BTreeMap<String, F::Native>;

    fn to_representation(&self, value: &Self::Native) -> Result<Value, ValidationError> {
        let map = collect_keyed(value, |item| self.inner.to_representation(item))?;
        Ok(Value::Object(map.into_iter().collect::<Map<String, Value>>()))
    }

    fn to_internal(&self, data: &Value) -> Result<Self::Native, ValidationError> {
        match data {
            Value::Object(map) => collect_keyed(map, |item| self.inner.to_internal(item)),
            Value::Null => Err(self.options.error(ErrorCode::Enull, NULL_MESSAGE)),
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                Err(self.options.error(
                    ErrorCode::Enotadict,
                    &format!(
                        "Expected a dictionary of items but got type \"{}\".",
                        type_name(data)
                    ),
                ))
            }
        }
    }
}

impl<F: Field> ValidatesScalar for DictField<F> {
    fn run_validators(&self, value: &Self::Native) -> Result<(), ValidationError> {
        if value.is_empty() && !self.allow_empty {
            return Err(self.options.error(ErrorCode::Eempty, EMPTY_MESSAGE));
        }

        let mut errors = ErrorMap::new();
        for (key, item) in value {
            if let Err(e) = self.inner.run_validators(item) {
                errors.add(key.clone(), e);
            }
        }
        errors.finish()
    }
}

impl<F: Field> Field for DictField<F> {
    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn kind(&self) -> String {
        format!("dict<{}>", self.inner.kind())
    }
}
