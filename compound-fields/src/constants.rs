pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NULL_MESSAGE: &str = "This field may not be null.";
pub const BLANK_MESSAGE: &str = "This field may not be blank.";
pub const EMPTY_MESSAGE: &str = "This list may not be empty.";
pub const INVALID_STRING_MESSAGE: &str = "Not a valid string.";
pub const INVALID_INTEGER_MESSAGE: &str = "A valid integer is required.";
pub const INTEGER_STRING_TOO_LARGE_MESSAGE: &str = "String value too large.";
pub const MAX_INTEGER_STRING_LENGTH: usize = 1000;
pub const ISO_8601: &str = "iso-8601";
pub const ISO_8601_DATE_PATTERN: &str = "%Y-%m-%d";
