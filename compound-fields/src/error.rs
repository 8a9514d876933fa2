use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::REQUIRED_MESSAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCode {
    Erequired,
    Einvalid,
    Enull,
    Eblank,
    Emaxlength,
    Eminlength,
    Emaxvalue,
    Eminvalue,
    Eempty,
    Enotalist,
    Enotadict,
}

const ERROR_CODE_NAMES: &[&str] = &[
    "required",
    "invalid",
    "null",
    "blank",
    "max_length",
    "min_length",
    "max_value",
    "min_value",
    "empty",
    "not_a_list",
    "not_a_dict",
];

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Erequired => "required",
            Self::Einvalid => "invalid",
            Self::Enull => "null",
            Self::Eblank => "blank",
            Self::Emaxlength => "max_length",
            Self::Eminlength => "min_length",
            Self::Emaxvalue => "max_value",
            Self::Eminvalue => "min_value",
            Self::Eempty => "empty",
            Self::Enotalist => "not_a_list",
            Self::Enotadict => "not_a_dict",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(Self::Erequired),
            "invalid" => Ok(Self::Einvalid),
            "null" => Ok(Self::Enull),
            "blank" => Ok(Self::Eblank),
            "max_length" => Ok(Self::Emaxlength),
            "min_length" => Ok(Self::Eminlength),
            "max_value" => Ok(Self::Emaxvalue),
            "min_value" => Ok(Self::Eminvalue),
            "empty" => Ok(Self::Eempty),
            "not_a_list" => Ok(Self::Enotalist),
            "not_a_dict" => Ok(Self::Enotadict),
            _ => Err(()),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ErrorCodeVisitor;

        impl Visitor<'_> for ErrorCodeVisitor {
            type Value = ErrorCode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid error code string")
            }

            fn visit_str<E>(self, value: &str) -> Result<ErrorCode, E>
            where
                E: de::Error,
            {
                ErrorCode::from_str(value)
                    .map_err(|()| de::Error::unknown_variant(value, ERROR_CODE_NAMES))
            }
        }

        deserializer.deserialize_str(ErrorCodeVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorDetail {
    #[must_use]
    pub fn new(code: ErrorCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Structured payload of an invalid-value error.
///
/// Scalars report a flat list of details. Lists report a map from the index of
/// each failing element to that element's own payload, dicts and schemas do the
/// same keyed by name. Passing entries never appear in a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorMessages {
    List(Vec<ErrorDetail>),
    Indexed(BTreeMap<usize, ErrorMessages>),
    Keyed(BTreeMap<String, ErrorMessages>),
}

impl ErrorMessages {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(details) => details.is_empty(),
            Self::Indexed(map) => map.is_empty(),
            Self::Keyed(map) => map.is_empty(),
        }
    }

    /// Iterates over every detail, depth first.
    pub fn details(&self) -> Box<dyn Iterator<Item = &ErrorDetail> + '_> {
        match self {
            Self::List(details) => Box::new(details.iter()),
            Self::Indexed(map) => Box::new(map.values().flat_map(Self::details)),
            Self::Keyed(map) => Box::new(map.values().flat_map(Self::details)),
        }
    }
}

impl From<ErrorDetail> for ErrorMessages {
    fn from(detail: ErrorDetail) -> Self {
        Self::List(vec![detail])
    }
}

impl From<BTreeMap<usize, ErrorMessages>> for ErrorMessages {
    fn from(map: BTreeMap<usize, ErrorMessages>) -> Self {
        Self::Indexed(map)
    }
}

impl From<BTreeMap<String, ErrorMessages>> for ErrorMessages {
    fn from(map: BTreeMap<String, ErrorMessages>) -> Self {
        Self::Keyed(map)
    }
}

impl fmt::Display for ErrorMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(details) => {
                for (i, detail) in details.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{detail}")?;
                }
                Ok(())
            }
            Self::Indexed(map) => {
                for (i, (index, messages)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "[{index}]: {messages}")?;
                }
                Ok(())
            }
            Self::Keyed(map) => {
                for (i, (key, messages)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{key}: {messages}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Value absent on a required field.
    #[error("{0}")]
    Required(ErrorDetail),
    /// Conversion or validator failure.
    #[error("{0}")]
    Invalid(ErrorMessages),
}

impl ValidationError {
    #[must_use]
    pub fn required() -> Self {
        Self::Required(ErrorDetail::new(ErrorCode::Erequired, REQUIRED_MESSAGE))
    }

    #[must_use]
    pub fn invalid(code: ErrorCode, message: &str) -> Self {
        Self::Invalid(ErrorDetail::new(code, message).into())
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Required(_) => ErrorCode::Erequired,
            Self::Invalid(_) => ErrorCode::Einvalid,
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required(_))
    }

    #[must_use]
    pub fn messages(&self) -> ErrorMessages {
        self.clone().into_messages()
    }

    #[must_use]
    pub fn into_messages(self) -> ErrorMessages {
        match self {
            Self::Required(detail) => detail.into(),
            Self::Invalid(messages) => messages,
        }
    }
}

/// Accumulates failures keyed by index or name without stopping at the first.
#[derive(Debug)]
pub struct ErrorMap<K> {
    errors: BTreeMap<K, ErrorMessages>,
}

impl<K: Ord> Default for ErrorMap<K> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<K: Ord> ErrorMap<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K, error: ValidationError) {
        self.errors.insert(key, error.into_messages());
    }

    pub fn finish(self) -> Result<(), ValidationError>
    where
        BTreeMap<K, ErrorMessages>: Into<ErrorMessages>,
    {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(self.errors.into()))
        }
    }
}
