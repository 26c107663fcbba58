use std::fmt;

use crate::error::WireError;

/// Byte order of a multi-byte integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Descriptor for a fixed-width integer of 1 to 4 bytes.
///
/// Decoded values are widened to `i64`, so a 32-bit unsigned value with the
/// top bit set stays positive and a signed value keeps its sign.
///
/// ```text
/// ┌────────────┬───────┬────────┬───────┬───────────────────────────┐
/// │ Constant   │ Bytes │ Signed │ Order │ Range                     │
/// ├────────────┼───────┼────────┼───────┼───────────────────────────┤
/// │ UINT8      │ 1     │ no     │ -     │ 0 ..= 0xFF                │
/// │ UINT16_*   │ 2     │ no     │ LE/BE │ 0 ..= 0xFFFF              │
/// │ UINT24_*   │ 3     │ no     │ LE/BE │ 0 ..= 0xFF_FFFF           │
/// │ UINT32_*   │ 4     │ no     │ LE/BE │ 0 ..= 0xFFFF_FFFF         │
/// │ INT8       │ 1     │ yes    │ -     │ -0x80 ..= 0x7F            │
/// │ INT16_BE   │ 2     │ yes    │ BE    │ -0x8000 ..= 0x7FFF        │
/// │ INT24_BE   │ 3     │ yes    │ BE    │ -0x80_0000 ..= 0x7F_FFFF  │
/// │ INT32_BE   │ 4     │ yes    │ BE    │ i32::MIN ..= i32::MAX     │
/// └────────────┴───────┴────────┴───────┴───────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntToken {
    width: u8,
    signed: bool,
    order: ByteOrder,
}

impl IntToken {
    /// Build a descriptor. Returns `None` unless `width` is 1 to 4.
    #[must_use]
    pub const fn new(width: u8, signed: bool, order: ByteOrder) -> Option<Self> {
        if width == 0 || width > 4 {
            return None;
        }
        Some(Self {
            width,
            signed,
            order,
        })
    }

    pub(crate) const fn fixed(width: u8, signed: bool, order: ByteOrder) -> Self {
        Self {
            width,
            signed,
            order,
        }
    }

    /// Encoded length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.width as usize
    }

    /// Always false; integers have a width of at least one byte.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    #[must_use]
    pub const fn is_signed(self) -> bool {
        self.signed
    }

    #[must_use]
    pub const fn order(self) -> ByteOrder {
        self.order
    }

    const fn bits(self) -> u32 {
        self.width as u32 * 8
    }

    /// Smallest value this token can encode.
    #[must_use]
    pub const fn min(self) -> i64 {
        if self.signed {
            -(1i64 << (self.bits() - 1))
        } else {
            0
        }
    }

    /// Largest value this token can encode.
    #[must_use]
    pub const fn max(self) -> i64 {
        if self.signed {
            (1i64 << (self.bits() - 1)) - 1
        } else {
            (1i64 << self.bits()) - 1
        }
    }

    /// Check that `value` fits this token.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfRange`] otherwise.
    pub fn check(self, value: i64) -> Result<(), WireError> {
        if value < self.min() || value > self.max() {
            return Err(WireError::OutOfRange {
                token: self.to_string(),
                value,
                min: self.min(),
                max: self.max(),
            });
        }
        Ok(())
    }

    /// Decode the integer from the first `len()` bytes of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnexpectedEof`] if `buf` is shorter than the
    /// token width.
    pub fn decode(self, buf: &[u8]) -> Result<i64, WireError> {
        let bytes = buf
            .get(..self.len())
            .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;

        let raw = match self.order {
            ByteOrder::Big => bytes
                .iter()
                .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
            ByteOrder::Little => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
        };

        let value = i64::from(raw);
        let sign_bit = 1i64 << (self.bits() - 1);
        if self.signed && value & sign_bit != 0 {
            Ok(value - (1i64 << self.bits()))
        } else {
            Ok(value)
        }
    }

    /// Encode `value` into the first `len()` bytes of `dest`.
    ///
    /// Nothing is written unless the whole encode succeeds.
    ///
    /// # Returns
    ///
    /// The number of bytes written (always `len()`).
    ///
    /// # Errors
    ///
    /// - [`WireError::OutOfRange`] if `value` does not fit the token.
    /// - [`WireError::BufferTooSmall`] if `dest` is shorter than the token.
    pub fn encode(self, value: i64, dest: &mut [u8]) -> Result<usize, WireError> {
        self.check(value)?;
        let len = self.len();
        let available = dest.len();
        let out = dest.get_mut(..len).ok_or(WireError::BufferTooSmall {
            needed: len,
            available,
        })?;

        // Two's complement bits of the low `width` bytes.
        #[allow(clippy::cast_sign_loss)]
        let raw = value as u64;
        for i in 0..len {
            #[allow(clippy::cast_possible_truncation)]
            let byte = ((raw >> (8 * i)) & 0xFF) as u8;
            match self.order {
                ByteOrder::Little => out[i] = byte,
                ByteOrder::Big => out[len - 1 - i] = byte,
            }
        }
        Ok(len)
    }
}

impl fmt::Display for IntToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signed { 'i' } else { 'u' };
        if self.width == 1 {
            return write!(f, "{sign}8");
        }
        let order = match self.order {
            ByteOrder::Little => "le",
            ByteOrder::Big => "be",
        };
        write!(f, "{sign}{}{order}", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U16_BE: IntToken = IntToken::fixed(2, false, ByteOrder::Big);
    const U24_LE: IntToken = IntToken::fixed(3, false, ByteOrder::Little);
    const U32_BE: IntToken = IntToken::fixed(4, false, ByteOrder::Big);
    const U32_LE: IntToken = IntToken::fixed(4, false, ByteOrder::Little);
    const I8: IntToken = IntToken::fixed(1, true, ByteOrder::Big);
    const I24_BE: IntToken = IntToken::fixed(3, true, ByteOrder::Big);
    const I32_BE: IntToken = IntToken::fixed(4, true, ByteOrder::Big);

    fn encode(token: IntToken, value: i64) -> Vec<u8> {
        let mut buf = [0u8; 4];
        let n = token.encode(value, &mut buf).unwrap();
        buf[..n].to_vec()
    }

    #[test]
    fn new_rejects_bad_widths() {
        assert!(IntToken::new(0, false, ByteOrder::Big).is_none());
        assert!(IntToken::new(5, true, ByteOrder::Little).is_none());
        assert_eq!(IntToken::new(2, false, ByteOrder::Big), Some(U16_BE));
    }

    #[test]
    fn ranges() {
        assert_eq!(U32_BE.max(), 0xFFFF_FFFF);
        assert_eq!(I8.min(), -128);
        assert_eq!(I8.max(), 127);
        assert_eq!(I24_BE.min(), -0x80_0000);
        assert_eq!(I32_BE.min(), i64::from(i32::MIN));
    }

    #[test]
    fn u32_high_bit_stays_positive() {
        assert_eq!(U32_BE.decode(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap(), 0xFFFF_FFFF);
        assert_eq!(U32_LE.decode(&[0x00, 0x00, 0x00, 0x80]).unwrap(), 0x8000_0000);
    }

    #[test]
    fn u32_byte_orders() {
        assert_eq!(encode(U32_BE, 0xAABB_CCDD), vec![0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(encode(U32_LE, 0xAABB_CCDD), vec![0xDD, 0xCC, 0xBB, 0xAA]);
    }

    #[test]
    fn u24_le_decode() {
        assert_eq!(U24_LE.decode(&[0x01, 0x02, 0x03]).unwrap(), 0x03_0201);
    }

    #[test]
    fn i24_known_vectors() {
        assert_eq!(encode(I24_BE, 0x0F_0BA0), vec![0x0F, 0x0B, 0xA0]);
        assert_eq!(encode(I24_BE, -0x0F_0BCC), vec![0xF0, 0xF4, 0x34]);
        assert_eq!(I24_BE.decode(&[0xFF, 0xFF, 0xFF]).unwrap(), -1);
        assert_eq!(I24_BE.decode(&[0x10, 0x00, 0xFF]).unwrap(), 1_048_831);
        assert_eq!(I24_BE.decode(&[0x80, 0x00, 0x00]).unwrap(), -8_388_608);
    }

    #[test]
    fn i32_min_roundtrip() {
        let bytes = encode(I32_BE, i64::from(i32::MIN));
        assert_eq!(bytes, vec![0x80, 0, 0, 0]);
        assert_eq!(I32_BE.decode(&bytes).unwrap(), i64::from(i32::MIN));
    }

    #[test]
    fn out_of_range_writes_nothing() {
        let mut buf = [0x55u8; 4];
        let err = I8.encode(128, &mut buf).unwrap_err();
        assert!(matches!(err, WireError::OutOfRange { value: 128, .. }));
        assert_eq!(buf, [0x55; 4]);

        assert!(U16_BE.encode(-1, &mut buf).is_err());
        assert!(U16_BE.encode(0x1_0000, &mut buf).is_err());
    }

    #[test]
    fn short_buffers() {
        let mut buf = [0u8; 2];
        assert!(matches!(
            U32_BE.encode(1, &mut buf),
            Err(WireError::BufferTooSmall { needed: 4, available: 2 })
        ));
        assert!(matches!(
            U32_BE.decode(&[1, 2, 3]),
            Err(WireError::UnexpectedEof { offset: 3 })
        ));
    }

    #[test]
    fn display_names() {
        assert_eq!(I8.to_string(), "i8");
        assert_eq!(U16_BE.to_string(), "u16be");
        assert_eq!(U24_LE.to_string(), "u24le");
        assert_eq!(I32_BE.to_string(), "i32be");
    }
}
