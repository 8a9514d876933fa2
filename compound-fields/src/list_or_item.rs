//! A field accepting either one value or a list of values.
//!
//! [`ListOrItemField`] wraps a single inner field and behaves like a list field
//! or like the inner field itself, depending on the shape of each value it is
//! given. The shape is decided once, when the incoming JSON is classified into
//! a [`Shape`], and is preserved in both directions: a list comes back as a
//! list, a scalar as a scalar.
//!
//! Errors keep the same split. A failing scalar reports exactly what the inner
//! field reports. A list reports every failing element, keyed by its index.

use serde_json::Value;

use crate::constants::EMPTY_MESSAGE;
use crate::field::{collect_indexed, impl_field_options};
use crate::{
    ConvertsScalar, ErrorCode, ErrorMap, Field, FieldOptions, Shape, ValidatesScalar,
    ValidationError,
};

#[derive(Debug)]
pub struct ListOrItemField<F> {
    inner: F,
    options: FieldOptions,
    allow_empty: bool,
}

impl<F: Default> Default for ListOrItemField<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl_field_options!(ListOrItemField<F>);

impl<F> ListOrItemField<F> {
    #[must_use]
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            options: FieldOptions::default(),
            allow_empty: true,
        }
    }

    /// An empty list is a valid, present value unless disabled here.
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

impl<F: Field> ConvertsScalar for ListOrItemField<F> {
    type Native = Shape<F::Native>;

    fn to_representation(&self, value: &Self::Native) -> Result<Value, ValidationError> {
        match value {
            Shape::Scalar(item) => self.inner.to_representation(item),
            Shape::Sequence(items) => {
                collect_indexed(items, |item| self.inner.to_representation(item)).map(Value::Array)
            }
        }
    }

    fn to_internal(&self, data: &Value) -> Result<Self::Native, ValidationError> {
        match Shape::of(data) {
            Shape::Scalar(item) => self.inner.to_internal(item).map(Shape::Scalar),
            Shape::Sequence(items) => {
                collect_indexed(items, |item| self.inner.to_internal(item)).map(Shape::Sequence)
            }
        }
    }
}

impl<F: Field> ValidatesScalar for ListOrItemField<F> {
    fn run_validators(&self, value: &Self::Native) -> Result<(), ValidationError> {
        let items = match value {
            Shape::Scalar(item) => return self.inner.run_validators(item),
            Shape::Sequence(items) => items,
        };

        if items.is_empty() && !self.allow_empty {
            return Err(self.options.error(ErrorCode::Eempty, EMPTY_MESSAGE));
        }

        let mut errors = ErrorMap::new();
        for (index, item) in items.iter().enumerate() {
            if let Err(e) = self.inner.run_validators(item) {
                errors.add(index, e);
            }
        }
        errors.finish()
    }
}

impl<F: Field> Field for ListOrItemField<F> {
    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn kind(&self) -> String {
        format!("list-or-item<{}>", self.inner.kind())
    }
}
