use std::fmt;
use std::str::FromStr;

use crate::error::WireError;

/// Character encodings understood by [`Token::Text`](crate::Token::Text).
///
/// ```text
/// ┌──────────┬──────────────────────────────┬──────────────────────────────┐
/// │ Encoding │ Decode                       │ Encode                       │
/// ├──────────┼──────────────────────────────┼──────────────────────────────┤
/// │ Utf8     │ lossy, bad sequences → U+FFFD│ UTF-8 bytes                  │
/// │ Ascii    │ high bit of each byte dropped│ chars < 0x80 only            │
/// │ Latin1   │ byte → U+0000..=U+00FF       │ chars ≤ U+00FF only          │
/// │ Utf16Le  │ lossy, odd trailing byte lost│ UTF-16 code units, LE        │
/// │ Hex      │ lowercase hex digits         │ hex digit pairs              │
/// └──────────┴──────────────────────────────┴──────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
    Utf16Le,
    Hex,
}

impl Encoding {
    /// Canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Ascii => "ascii",
            Self::Latin1 => "latin1",
            Self::Utf16Le => "utf16le",
            Self::Hex => "hex",
        }
    }

    /// Decode `bytes` to text. Never fails; see the table above.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Ascii => bytes.iter().map(|&b| char::from(b & 0x7F)).collect(),
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Utf16Le => {
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
                char::decode_utf16(units)
                    .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            }
            Self::Hex => hex::encode(bytes),
        }
    }

    /// Encode `text` to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Unencodable`] if a character has no
    /// representation in this encoding, or if hex text is malformed.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, WireError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Ascii => self.narrow(text, 0x7F),
            Self::Latin1 => self.narrow(text, 0xFF),
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Self::Hex => hex::decode(text).map_err(|e| WireError::Unencodable {
                encoding: self.name(),
                reason: e.to_string(),
            }),
        }
    }

    fn narrow(self, text: &str, max: u32) -> Result<Vec<u8>, WireError> {
        text.chars()
            .map(|c| {
                u8::try_from(u32::from(c))
                    .ok()
                    .filter(|&b| u32::from(b) <= max)
                    .ok_or_else(|| WireError::Unencodable {
                        encoding: self.name(),
                        reason: format!("character {c:?}"),
                    })
            })
            .collect()
    }
}

impl FromStr for Encoding {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "ascii" => Ok(Self::Ascii),
            "latin1" | "binary" => Ok(Self::Latin1),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(Self::Utf16Le),
            "hex" => Ok(Self::Hex),
            _ => Err(WireError::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
