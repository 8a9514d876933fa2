use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::shape::type_name;
use crate::{DynField, ErrorCode, ErrorDetail, ErrorMap, ValidationError};

/// Public description of one schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo<'a> {
    pub name: &'a str,
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<&'a str>,
}

/// A named, ordered set of fields validating one JSON object.
pub struct Schema {
    name: String,
    fields: Vec<(String, Box<dyn DynField>)>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

impl Schema {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: impl DynField + 'static) -> Self {
        self.push(name, Box::new(field));
        self
    }

    pub fn push(&mut self, name: impl Into<String>, field: Box<dyn DynField>) {
        self.fields.push((name.into(), field));
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn DynField> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field.as_ref())
    }

    /// Describes every field, in declaration order.
    #[must_use]
    pub fn describe(&self) -> Vec<FieldInfo<'_>> {
        self.fields
            .iter()
            .map(|(name, field)| {
                let options = field.field_options();
                FieldInfo {
                    name: name.as_str(),
                    kind: field.field_kind(),
                    required: options.required,
                    label: options.label.as_deref(),
                    help_text: options.help_text.as_deref(),
                }
            })
            .collect()
    }

    /// Cleans every declared field and returns the normalized object.
    ///
    /// Each field is validated independently and all failures are reported
    /// together, keyed by field name. Absent optional fields are left out of
    /// the output. Keys that no field declares are ignored.
    pub fn validate(&self, data: &Value) -> Result<Map<String, Value>, ValidationError> {
        let Value::Object(object) = data else {
            return Err(ValidationError::Invalid(
                ErrorDetail::new(
                    ErrorCode::Einvalid,
                    &format!(
                        "Invalid data. Expected a dictionary, but got {}.",
                        type_name(data)
                    ),
                )
                .into(),
            ));
        };

        let mut out = Map::new();
        let mut errors = ErrorMap::new();
        for (name, field) in &self.fields {
            match field.clean_value(object.get(name)) {
                Ok(Some(value)) => {
                    out.insert(name.clone(), value);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(schema = %self.name, field = %name, error = %e, "field failed validation");
                    errors.add(name.clone(), e);
                }
            }
        }
        errors.finish()?;
        Ok(out)
    }
}
