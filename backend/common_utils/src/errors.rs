//! Shared error primitives.

/// Type alias for `Result` carrying an [`error_stack::Report`].
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Errors while converting between amount representations or parsing
/// structures off the wire.
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    /// Failed to lift an i64 amount into a decimal.
    #[error("Failed to convert i64 value to Decimal")]
    I64ToDecimalConversionFailure,
    /// Failed to narrow a decimal amount back to i64.
    #[error("Failed to convert Decimal value to i64")]
    DecimalToI64ConversionFailure,
    /// The amount carries more fractional digits than the currency allows.
    #[error("Amount has more fractional digits than the currency exponent")]
    DecimalPrecisionExceeded,
    /// Failed to deserialize a structure from raw bytes.
    #[error("Failed to parse {0}")]
    StructParseFailure(&'static str),
}

/// Validation failures on caller-supplied data.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A required field was not provided.
    #[error("Missing required field: {field_name}")]
    MissingRequiredField {
        /// Name of the missing field
        field_name: &'static str,
    },
    /// A field value failed validation.
    #[error("Incorrect value provided for field: {field_name}")]
    IncorrectValueProvided {
        /// Name of the offending field
        field_name: &'static str,
    },
}
