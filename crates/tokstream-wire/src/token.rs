use std::fmt;
use std::str::FromStr;

use crate::encoding::Encoding;
use crate::error::WireError;
use crate::int::{ByteOrder, IntToken};

pub const UINT8: Token = Token::Int(IntToken::fixed(1, false, ByteOrder::Big));
pub const UINT16_LE: Token = Token::Int(IntToken::fixed(2, false, ByteOrder::Little));
pub const UINT16_BE: Token = Token::Int(IntToken::fixed(2, false, ByteOrder::Big));
pub const UINT24_LE: Token = Token::Int(IntToken::fixed(3, false, ByteOrder::Little));
pub const UINT24_BE: Token = Token::Int(IntToken::fixed(3, false, ByteOrder::Big));
pub const UINT32_LE: Token = Token::Int(IntToken::fixed(4, false, ByteOrder::Little));
pub const UINT32_BE: Token = Token::Int(IntToken::fixed(4, false, ByteOrder::Big));
pub const INT8: Token = Token::Int(IntToken::fixed(1, true, ByteOrder::Big));
pub const INT16_BE: Token = Token::Int(IntToken::fixed(2, true, ByteOrder::Big));
pub const INT24_BE: Token = Token::Int(IntToken::fixed(3, true, ByteOrder::Big));
pub const INT32_BE: Token = Token::Int(IntToken::fixed(4, true, ByteOrder::Big));

/// A fixed-length unit the tokenizer can be asked to read next.
///
/// The length of every variant is known before any of its bytes are
/// consumed. Tokens are `Copy` and can be reused for any number of decodes.
///
/// ```text
/// ┌──────────────┬──────────────┬──────────────────────────────────┐
/// │ Variant      │ Spec string  │ Decodes to                       │
/// ├──────────────┼──────────────┼──────────────────────────────────┤
/// │ Int          │ u8, i16be …  │ Value::Int                       │
/// │ Bytes(n)     │ bytes:N      │ Value::Bytes (owned copy)        │
/// │ Text { .. }  │ text:N[:enc] │ Value::Text                      │
/// │ Ignore(n)    │ skip:N       │ Value::Skipped (bytes never seen)│
/// └──────────────┴──────────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Int(IntToken),
    Bytes(usize),
    Text { len: usize, encoding: Encoding },
    Ignore(usize),
}

impl Token {
    /// Shorthand for a text token.
    #[must_use]
    pub const fn text(len: usize, encoding: Encoding) -> Self {
        Self::Text { len, encoding }
    }

    /// Number of stream bytes this token covers.
    #[must_use]
    pub const fn len(&self) -> usize {
        match *self {
            Self::Int(int) => int.len(),
            Self::Bytes(len) | Self::Text { len, .. } | Self::Ignore(len) => len,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn is_ignore(&self) -> bool {
        matches!(self, Self::Ignore(_))
    }

    /// Decode a value from the first `len()` bytes of `buf`.
    ///
    /// [`Token::Ignore`] never looks at `buf` and always yields
    /// [`Value::Skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnexpectedEof`] if `buf` is too short.
    pub fn decode(&self, buf: &[u8]) -> Result<Value, WireError> {
        match *self {
            Self::Int(int) => int.decode(buf).map(Value::Int),
            Self::Ignore(_) => Ok(Value::Skipped),
            Self::Bytes(len) => Ok(Value::Bytes(take(buf, len)?.to_vec())),
            Self::Text { len, encoding } => Ok(Value::Text(encoding.decode(take(buf, len)?))),
        }
    }

    /// Check that `value` can be written by this token without writing it.
    ///
    /// # Errors
    ///
    /// The same validation errors as [`Token::encode`], minus
    /// [`WireError::BufferTooSmall`].
    pub fn validate(&self, value: &Value) -> Result<(), WireError> {
        match (*self, value) {
            (Self::Int(int), Value::Int(v)) => int.check(*v),
            (Self::Bytes(len), Value::Bytes(bytes)) => check_len(len, bytes.len()),
            (Self::Text { len, encoding }, Value::Text(text)) => {
                check_len(len, encoding.encode(text)?.len())
            }
            (Self::Ignore(_), _) => Err(WireError::NotEncodable {
                token: self.to_string(),
            }),
            (_, other) => Err(WireError::ValueMismatch {
                token: self.to_string(),
                value: other.kind(),
            }),
        }
    }

    /// Encode `value` into the first `len()` bytes of `dest`.
    ///
    /// Validation happens before any byte is written.
    ///
    /// # Errors
    ///
    /// - [`WireError::OutOfRange`] for integers that do not fit.
    /// - [`WireError::ValueMismatch`] when the value variant does not match.
    /// - [`WireError::LengthMismatch`] when a byte/text payload is not
    ///   exactly `len()` bytes.
    /// - [`WireError::NotEncodable`] for [`Token::Ignore`].
    /// - [`WireError::BufferTooSmall`] when `dest` is too short.
    pub fn encode(&self, value: &Value, dest: &mut [u8]) -> Result<usize, WireError> {
        match (*self, value) {
            (Self::Int(int), Value::Int(v)) => int.encode(*v, dest),
            (Self::Bytes(len), Value::Bytes(bytes)) => write_exact(len, bytes, dest),
            (Self::Text { len, encoding }, Value::Text(text)) => {
                write_exact(len, &encoding.encode(text)?, dest)
            }
            (Self::Ignore(_), _) => Err(WireError::NotEncodable {
                token: self.to_string(),
            }),
            (_, other) => Err(WireError::ValueMismatch {
                token: self.to_string(),
                value: other.kind(),
            }),
        }
    }
}

fn take(buf: &[u8], len: usize) -> Result<&[u8], WireError> {
    buf.get(..len)
        .ok_or(WireError::UnexpectedEof { offset: buf.len() })
}

fn check_len(expected: usize, actual: usize) -> Result<(), WireError> {
    if expected == actual {
        Ok(())
    } else {
        Err(WireError::LengthMismatch { expected, actual })
    }
}

fn write_exact(len: usize, src: &[u8], dest: &mut [u8]) -> Result<usize, WireError> {
    check_len(len, src.len())?;
    let available = dest.len();
    let out = dest.get_mut(..len).ok_or(WireError::BufferTooSmall {
        needed: len,
        available,
    })?;
    out.copy_from_slice(src);
    Ok(len)
}

impl FromStr for Token {
    type Err = WireError;

    /// Parse the compact spec form, e.g. `u32be`, `bytes:5`, `text:4:hex`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WireError::InvalidToken(s.to_string());
        let spec = s.trim().to_ascii_lowercase();
        let mut parts = spec.split(':');
        let head = parts.next().unwrap_or_default();

        let token = match head {
            "bytes" | "skip" | "text" => {
                let len = parts
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(invalid)?;
                match head {
                    "bytes" => Self::Bytes(len),
                    "skip" => Self::Ignore(len),
                    _ => {
                        let encoding = parts.next().map(str::parse::<Encoding>).transpose()?;
                        Self::text(len, encoding.unwrap_or_default())
                    }
                }
            }
            _ => Self::Int(parse_int(head).ok_or_else(invalid)?),
        };

        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(token)
    }
}

/// `u8`, `i8`, or `[ui](16|24|32)(le|be)`.
fn parse_int(s: &str) -> Option<IntToken> {
    let signed = match s.as_bytes().first()? {
        b'u' => false,
        b'i' => true,
        _ => return None,
    };
    let rest = &s[1..];
    if rest == "8" {
        return IntToken::new(1, signed, ByteOrder::Big);
    }
    let (bits, order) = if let Some(bits) = rest.strip_suffix("le") {
        (bits, ByteOrder::Little)
    } else {
        (rest.strip_suffix("be")?, ByteOrder::Big)
    };
    let width = match bits {
        "16" => 2,
        "24" => 3,
        "32" => 4,
        _ => return None,
    };
    IntToken::new(width, signed, order)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => fmt::Display::fmt(int, f),
            Self::Bytes(len) => write!(f, "bytes:{len}"),
            Self::Text { len, encoding } => write!(f, "text:{len}:{encoding}"),
            Self::Ignore(len) => write!(f, "skip:{len}"),
        }
    }
}

/// A decoded token value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
    /// An ignore marker finished; no payload was read.
    Skipped,
}

impl Value {
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Self::Text(t) => write!(f, "{t:?}"),
            Self::Skipped => f.write_str("<skipped>"),
        }
    }
}
