//! Declarative field and schema definitions.
//!
//! Declarations are plain serde types so they can live in configuration files.
//! `build` turns them into live fields, rejecting options that do not apply to
//! the declared type.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    CharField, DateField, DateFormat, DictField, DynField, ErrorCode, Field, FieldOptions,
    IntegerField, ListField, ListOrItemField, Schema,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Char,
    Integer,
    Date,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char => write!(f, "char"),
            Self::Integer => write!(f, "integer"),
            Self::Date => write!(f, "date"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldShape {
    #[default]
    Item,
    List,
    ListOrItem,
    Dict,
}

#[derive(Debug, thiserror::Error)]
pub enum DeclError {
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },
    #[error("field '{field}': option '{option}' does not apply to {field_type} fields")]
    InapplicableOption {
        field: String,
        option: &'static str,
        field_type: FieldType,
    },
    #[error("field '{field}': option 'allow_empty' only applies to list, list-or-item and dict shapes")]
    InapplicableShapeOption { field: String },
    #[error("field '{field}': {message}")]
    InvalidOption { field: String, message: String },
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub shape: FieldShape,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default = "default_true")]
    pub allow_empty: bool,
    #[serde(default)]
    pub allow_blank: bool,
    #[serde(default = "default_true")]
    pub trim_whitespace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub error_messages: BTreeMap<ErrorCode, String>,
}

impl FieldDecl {
    /// Options of the outermost field. Wrapped inner fields keep defaults.
    fn options(&self) -> FieldOptions {
        FieldOptions {
            required: self.required,
            label: self.label.clone(),
            help_text: self.help_text.clone(),
            error_messages: self.error_messages.clone(),
        }
    }

    fn inner_options(&self) -> FieldOptions {
        match self.shape {
            FieldShape::Item => self.options(),
            FieldShape::List | FieldShape::ListOrItem | FieldShape::Dict => {
                FieldOptions::default()
            }
        }
    }

    fn inapplicable(&self, option: &'static str) -> DeclError {
        DeclError::InapplicableOption {
            field: self.name.clone(),
            option,
            field_type: self.field_type,
        }
    }

    fn check_options(&self) -> Result<(), DeclError> {
        let text_only = [
            ("max_length", self.max_length.is_some()),
            ("min_length", self.min_length.is_some()),
            ("allow_blank", self.allow_blank),
            ("trim_whitespace", !self.trim_whitespace),
        ];
        let integer_only = [
            ("max_value", self.max_value.is_some()),
            ("min_value", self.min_value.is_some()),
        ];
        let date_only = [
            ("format", self.format.is_some()),
            ("input_formats", !self.input_formats.is_empty()),
        ];

        let foreign = match self.field_type {
            FieldType::Char => [integer_only.as_slice(), date_only.as_slice()],
            FieldType::Integer => [text_only.as_slice(), date_only.as_slice()],
            FieldType::Date => [text_only.as_slice(), integer_only.as_slice()],
        };
        if let Some((option, _)) = foreign.iter().flat_map(|s| s.iter()).find(|(_, set)| *set) {
            return Err(self.inapplicable(*option));
        }

        if self.shape == FieldShape::Item && !self.allow_empty {
            return Err(DeclError::InapplicableShapeOption {
                field: self.name.clone(),
            });
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length)
            && min > max
        {
            return Err(self.invalid(format!(
                "min_length ({min}) is greater than max_length ({max})"
            )));
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value)
            && min > max
        {
            return Err(self.invalid(format!(
                "min_value ({min}) is greater than max_value ({max})"
            )));
        }
        Ok(())
    }

    fn invalid(&self, message: String) -> DeclError {
        DeclError::InvalidOption {
            field: self.name.clone(),
            message,
        }
    }

    fn char_field(&self) -> CharField {
        let mut field = CharField::new()
            .with_options(self.inner_options())
            .allow_blank(self.allow_blank)
            .trim_whitespace(self.trim_whitespace);
        if let Some(n) = self.min_length {
            field = field.min_length(n);
        }
        if let Some(n) = self.max_length {
            field = field.max_length(n);
        }
        field
    }

    fn integer_field(&self) -> IntegerField {
        let mut field = IntegerField::new().with_options(self.inner_options());
        if let Some(n) = self.min_value {
            field = field.min_value(n);
        }
        if let Some(n) = self.max_value {
            field = field.max_value(n);
        }
        field
    }

    fn date_field(&self) -> Result<DateField, DeclError> {
        let parse = |s: &str| {
            s.parse::<DateFormat>()
                .map_err(|e| self.invalid(e.to_string()))
        };
        let mut field = DateField::new().with_options(self.inner_options());
        if let Some(format) = &self.format {
            field = field.format(parse(format)?);
        }
        if !self.input_formats.is_empty() {
            let formats = self
                .input_formats
                .iter()
                .map(|s| parse(s))
                .collect::<Result<Vec<_>, _>>()?;
            field = field.input_formats(formats);
        }
        Ok(field)
    }

    fn wrap<F>(&self, inner: F) -> Box<dyn DynField>
    where
        F: Field + Send + Sync + 'static,
    {
        match self.shape {
            FieldShape::Item => Box::new(inner),
            FieldShape::List => Box::new(
                ListField::new(inner)
                    .with_options(self.options())
                    .allow_empty(self.allow_empty),
            ),
            FieldShape::ListOrItem => Box::new(
                ListOrItemField::new(inner)
                    .with_options(self.options())
                    .allow_empty(self.allow_empty),
            ),
            FieldShape::Dict => Box::new(
                DictField::new(inner)
                    .with_options(self.options())
                    .allow_empty(self.allow_empty),
            ),
        }
    }

    pub fn build(&self) -> Result<Box<dyn DynField>, DeclError> {
        self.check_options()?;
        match self.field_type {
            FieldType::Char => Ok(self.wrap(self.char_field())),
            FieldType::Integer => Ok(self.wrap(self.integer_field())),
            FieldType::Date => Ok(self.wrap(self.date_field()?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl SchemaDecl {
    pub fn build(&self) -> Result<Schema, DeclError> {
        let mut seen = BTreeSet::new();
        let mut schema = Schema::new(&self.name);
        for decl in &self.fields {
            if !seen.insert(decl.name.as_str()) {
                return Err(DeclError::DuplicateField {
                    schema: self.name.clone(),
                    field: decl.name.clone(),
                });
            }
            schema.push(&decl.name, decl.build()?);
        }
        Ok(schema)
    }
}
