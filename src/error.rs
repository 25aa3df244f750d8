use thiserror::Error;

/// Crate result type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by the codec primitives and passed through the cursor layer unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// A read touched bytes beyond the end of the buffer.
    #[error("cannot access {size} bytes at offset {offset}: buffer length is {len}")]
    OutOfRange {
        /// Offset the access started at.
        offset: usize,
        /// Number of bytes the access needed.
        size: usize,
        /// Length of the buffer at the time of the access.
        len: usize,
    },

    /// A variable-width integer was requested with an unsupported byte length.
    #[error("byte length must be between 1 and 6, got {0}")]
    InvalidByteLength(usize),

    /// The value does not fit in the target encoding.
    #[error("value {value} is out of range for {kind}")]
    ValueOutOfRange {
        /// Name of the target encoding.
        kind: &'static str,
        /// The rejected value, formatted.
        value: String,
    },

    /// A numeric string could not be parsed.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// A dynamic value has the wrong shape for the requested type.
    #[error("{kind} cannot be written from a {found} value")]
    TypeMismatch {
        /// Name of the target encoding.
        kind: &'static str,
        /// Shape of the value that was supplied.
        found: &'static str,
    },

    /// The text encoding name is not recognized.
    #[error("unknown text encoding: {0:?}")]
    UnknownEncoding(String),

    /// The text could not be converted to bytes in the requested encoding.
    #[error("invalid {encoding} text: {reason}")]
    InvalidText {
        /// Name of the encoding.
        encoding: &'static str,
        /// Description from the underlying decoder.
        reason: String,
    },

    /// The value type name is not recognized.
    #[error("unknown value type: {0:?}")]
    UnknownType(String),
}
