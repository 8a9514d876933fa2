//! Composable JSON fields for API validation.
//!
//! A field converts one value between its JSON representation and a typed
//! internal value, then validates it. Scalar fields ([`CharField`],
//! [`IntegerField`], [`DateField`]) can be wrapped by composite fields:
//!
//! - [`ListOrItemField`] accepts a single value or a list of values
//! - [`ListField`] accepts a list only
//! - [`DictField`] accepts a string-keyed object
//!
//! A [`Schema`] validates a whole object with named fields and can be built
//! from a [`SchemaDecl`] loaded from configuration.

mod constants;
mod date;
mod decl;
mod dict;
mod error;
mod field;
mod integer;
mod list;
mod list_or_item;
mod schema;
mod shape;
mod text;
mod validation;

pub use constants::*;
pub use date::{DateField, DateFormat, InvalidDateFormat};
pub use decl::{DeclError, FieldDecl, FieldShape, FieldType, SchemaDecl};
pub use dict::DictField;
pub use error::{ErrorCode, ErrorDetail, ErrorMap, ErrorMessages, ValidationError};
pub use field::{ConvertsScalar, DynField, Field, FieldOptions, ValidatesScalar};
pub use integer::IntegerField;
pub use list::ListField;
pub use list_or_item::ListOrItemField;
pub use schema::{FieldInfo, Schema};
pub use shape::{Shape, type_name};
pub use text::CharField;
pub use validation::{
    MaxLengthValidator, MaxValueValidator, MinLengthValidator, MinValueValidator, Validator,
    Validators,
};
