//! Error types for structwire operations.

use thiserror::Error;

/// Core error type shared by declarations, records and field codecs.
#[derive(Debug, Error)]
pub enum Error {
    /// The record or field configuration does not allow the operation.
    ///
    /// Raised for unknown field names, unresolved dependent fields, invalid
    /// endianness tokens and inconsistent record hierarchies.
    #[error("configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },

    /// An assigned or decoded value violates the field's constraints.
    #[error("value out of range: {message}")]
    ValueRange {
        /// Error message.
        message: String,
    },

    /// The byte source ended before the field encoding was complete.
    #[error("insufficient data: required {required} bytes, available {available} bytes")]
    InsufficientData {
        /// Required number of bytes.
        required: usize,
        /// Available number of bytes.
        available: usize,
    },

    /// IO error from an external sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a configuration error for a field name the schema does not know.
    pub fn unknown_field(name: impl AsRef<str>) -> Self {
        Self::Configuration {
            message: format!("unknown field '{}'", name.as_ref()),
        }
    }

    /// Creates a value-range error.
    pub fn value_range(message: impl Into<String>) -> Self {
        Self::ValueRange {
            message: message.into(),
        }
    }

    /// Creates an insufficient-data error.
    #[must_use]
    pub const fn insufficient(required: usize, available: usize) -> Self {
        Self::InsufficientData {
            required,
            available,
        }
    }

    /// Prefixes configuration and value-range messages with a field name.
    ///
    /// Nested records apply this once per level, so the message reads as a
    /// path from the outermost field.
    #[must_use]
    pub fn in_field(self, name: &str) -> Self {
        match self {
            Self::Configuration { message } => Self::Configuration {
                message: format!("field '{name}': {message}"),
            },
            Self::ValueRange { message } => Self::ValueRange {
                message: format!("field '{name}': {message}"),
            },
            other => other,
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns true if this is a value-range error.
    #[must_use]
    pub const fn is_value_range(&self) -> bool {
        matches!(self, Self::ValueRange { .. })
    }

    /// Returns true if this is an insufficient-data error.
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

/// Result type alias for structwire operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_insufficient_data() {
        let err = Error::insufficient(5, 4);
        let msg = err.to_string();
        assert!(msg.contains("insufficient data"));
        assert!(msg.contains("required 5"));
        assert!(msg.contains("available 4"));
    }

    #[test]
    fn test_unknown_field_names_the_field() {
        let err = Error::unknown_field("checksum");
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'checksum'"));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(Error::value_range("too big").is_value_range());
        assert!(!Error::value_range("too big").is_configuration());
        assert!(Error::insufficient(1, 0).is_insufficient_data());
    }

    #[test]
    fn test_in_field_prefixes_path() {
        let err = Error::value_range("300 is too big")
            .in_field("code")
            .in_field("header");
        assert_eq!(
            err.to_string(),
            "value out of range: field 'header': field 'code': 300 is too big"
        );

        let err = Error::insufficient(2, 1).in_field("code");
        assert!(matches!(
            err,
            Error::InsufficientData {
                required: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::WriteZero, "sink closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("sink closed"));
    }
}
