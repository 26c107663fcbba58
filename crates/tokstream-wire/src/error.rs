/// Errors raised by the fixed-width codec table.
///
/// Every encode path validates before it writes, so any of these errors
/// means the destination buffer was left untouched.
///
/// ```text
///   WireError
///   ├── OutOfRange        ← integer does not fit the token's width/signedness
///   ├── UnexpectedEof     ← decode input shorter than the token length
///   ├── BufferTooSmall    ← encode destination shorter than the token length
///   ├── LengthMismatch    ← byte/text payload is not exactly the token length
///   ├── ValueMismatch     ← value kind does not match the token kind
///   ├── NotEncodable      ← ignore markers never produce bytes
///   ├── Unencodable       ← text cannot be represented in the encoding
///   ├── InvalidToken      ← token spec string could not be parsed
///   └── UnknownEncoding   ← encoding name not recognised
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Integer value outside the range implied by the token's width.
    #[error("value {value} out of range for {token} ({min}..={max})")]
    OutOfRange {
        token: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Input ended before a complete value could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// Destination buffer cannot hold the encoded value.
    #[error("destination holds {available} bytes, {needed} needed")]
    BufferTooSmall { needed: usize, available: usize },

    /// A byte or text payload does not have the token's fixed length.
    #[error("payload is {actual} bytes, token length is {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The value variant cannot be written by this token.
    #[error("cannot encode {value} with token {token}")]
    ValueMismatch { token: String, value: &'static str },

    /// The token has no byte representation (ignore markers).
    #[error("token {token} cannot be encoded")]
    NotEncodable { token: String },

    /// Text contains something the encoding cannot represent.
    #[error("text not representable as {encoding}: {reason}")]
    Unencodable {
        encoding: &'static str,
        reason: String,
    },

    /// A textual token spec did not parse.
    #[error("invalid token spec {0:?}")]
    InvalidToken(String),

    /// An encoding name did not match any supported encoding.
    #[error("unknown encoding {0:?}")]
    UnknownEncoding(String),
}
