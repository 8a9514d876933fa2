//! Capability traits every field implements, and the options they share.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::REQUIRED_MESSAGE;
use crate::{ErrorCode, ErrorDetail, ErrorMap, ValidationError};

/// Standard options carried by every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// An absent or null value is an error when set.
    pub required: bool,
    pub label: Option<String>,
    pub help_text: Option<String>,
    /// Replacement messages by error code.
    pub error_messages: BTreeMap<ErrorCode, String>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            required: true,
            label: None,
            help_text: None,
            error_messages: BTreeMap::new(),
        }
    }
}

impl FieldOptions {
    /// Swaps in the configured message for the detail's code, if any.
    #[must_use]
    pub fn localize(&self, detail: ErrorDetail) -> ErrorDetail {
        match self.error_messages.get(&detail.code) {
            Some(message) => ErrorDetail::new(detail.code, message),
            None => detail,
        }
    }

    #[must_use]
    pub fn error(&self, code: ErrorCode, message: &str) -> ValidationError {
        ValidationError::Invalid(self.localize(ErrorDetail::new(code, message)).into())
    }

    #[must_use]
    pub fn required_error(&self) -> ValidationError {
        ValidationError::Required(
            self.localize(ErrorDetail::new(ErrorCode::Erequired, REQUIRED_MESSAGE)),
        )
    }
}

/// Conversion between a JSON representation and a typed internal value.
pub trait ConvertsScalar {
    type Native;

    fn to_representation(&self, value: &Self::Native) -> Result<Value, ValidationError>;

    fn to_internal(&self, data: &Value) -> Result<Self::Native, ValidationError>;
}

/// Validation of an already converted value.
pub trait ValidatesScalar: ConvertsScalar {
    fn run_validators(&self, value: &Self::Native) -> Result<(), ValidationError>;
}

pub trait Field: ValidatesScalar {
    fn options(&self) -> &FieldOptions;

    /// Type name reported to clients, e.g. `list<date>`.
    fn kind(&self) -> String;

    fn validate(&self, value: Option<&Self::Native>) -> Result<(), ValidationError> {
        match value {
            None if self.options().required => Err(self.options().required_error()),
            None => Ok(()),
            Some(value) => self.run_validators(value),
        }
    }

    /// Converts and validates one incoming value. Absent and null are the same.
    fn clean(&self, data: Option<&Value>) -> Result<Option<Self::Native>, ValidationError> {
        match data {
            None | Some(Value::Null) => self.validate(None).map(|()| None),
            Some(data) => {
                let value = self.to_internal(data)?;
                self.validate(Some(&value))?;
                Ok(Some(value))
            }
        }
    }
}

/// Object-safe view of a [`Field`], normalizing JSON to JSON.
pub trait DynField: Send + Sync {
    fn field_options(&self) -> &FieldOptions;

    fn field_kind(&self) -> String;

    fn clean_value(&self, data: Option<&Value>) -> Result<Option<Value>, ValidationError>;
}

impl<F> DynField for F
where
    F: Field + Send + Sync,
{
    fn field_options(&self) -> &FieldOptions {
        self.options()
    }

    fn field_kind(&self) -> String {
        self.kind()
    }

    fn clean_value(&self, data: Option<&Value>) -> Result<Option<Value>, ValidationError> {
        self.clean(data)?
            .map(|value| self.to_representation(&value))
            .transpose()
    }
}

/// Applies `f` to every item, keeping successes in order and failures by index.
pub(crate) fn collect_indexed<T, U>(
    items: impl IntoIterator<Item = T>,
    mut f: impl FnMut(T) -> Result<U, ValidationError>,
) -> Result<Vec<U>, ValidationError> {
    let mut out = Vec::new();
    let mut errors = ErrorMap::new();
    for (index, item) in items.into_iter().enumerate() {
        match f(item) {
            Ok(value) => out.push(value),
            Err(e) => errors.add(index, e),
        }
    }
    errors.finish()?;
    Ok(out)
}

/// Same as [`collect_indexed`] for named entries.
pub(crate) fn collect_keyed<'a, T, U>(
    items: impl IntoIterator<Item = (&'a String, T)>,
    mut f: impl FnMut(T) -> Result<U, ValidationError>,
) -> Result<BTreeMap<String, U>, ValidationError> {
    let mut out = BTreeMap::new();
    let mut errors = ErrorMap::new();
    for (key, item) in items {
        match f(item) {
            Ok(value) => {
                out.insert(key.clone(), value);
            }
            Err(e) => errors.add(key.clone(), e),
        }
    }
    errors.finish()?;
    Ok(out)
}

/// Builder methods for the shared [`FieldOptions`].
macro_rules! impl_field_options {
    ($($ty:ident $(<$param:ident>)?),+ $(,)?) => {
        $(
            impl$(<$param>)? $ty$(<$param>)? {
                #[must_use]
                pub fn required(mut self, required: bool) -> Self {
                    self.options.required = required;
                    self
                }

                #[must_use]
                pub fn label(mut self, label: impl Into<String>) -> Self {
                    self.options.label = Some(label.into());
                    self
                }

                #[must_use]
                pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
                    self.options.help_text = Some(help_text.into());
                    self
                }

                #[must_use]
                pub fn error_message(
                    mut self,
                    code: $crate::ErrorCode,
                    message: impl Into<String>,
                ) -> Self {
                    self.options.error_messages.insert(code, message.into());
                    self
                }

                #[must_use]
                pub fn with_options(mut self, options: $crate::FieldOptions) -> Self {
                    self.options = options;
                    self
                }
            }
        )+
    };
}

pub(crate) use impl_field_options;
