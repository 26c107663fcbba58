use std::io;

use tokstream_wire::{Token, Value};

use crate::error::EncodeError;

/// Drain callback invoked when a working buffer runs out of room.
///
/// Called as `flush(buf, offset)`: bytes `buf[..offset]` are the pending
/// output and must be consumed. When it returns `Ok`, the buffer is written
/// again from offset 0.
pub type Flush<'a> = dyn FnMut(&mut [u8], usize) -> io::Result<()> + 'a;

/// Write `value` as `token` into `buf` at `offset`.
///
/// If `offset + token.len()` would run past the end of `buf`, the
/// `flush` callback drains `buf[..offset]` and the value is written at
/// offset 0 instead. Without a flush, the write fails.
///
/// # Returns
///
/// How far the caller should move its offset. This is `token.len()` when
/// the value fit, and `token.len() - offset` (zero or negative) after a
/// flush reset the buffer, so back-to-back calls can keep a single running
/// offset:
///
/// ```text
///   offset = 6, len = 4, capacity = 8
///
///   ┌──────────────┬────┐           ┌────────┬────────┐
///   │ pending (6)  │ ?? │  flush →  │ value  │        │
///   └──────────────┴────┘           └────────┴────────┘
///                                    advance = 4 - 6 = -2, new offset = 4
/// ```
///
/// # Errors
///
/// - [`EncodeError::Wire`] if the value is rejected by the token. This is
///   checked before the flush runs, and nothing is written.
/// - [`EncodeError::BufferOverflow`] if the token is longer than the whole
///   buffer, or it does not fit and no flush was supplied.
/// - [`EncodeError::Io`] if the flush fails.
pub fn put(
    token: &Token,
    buf: &mut [u8],
    offset: usize,
    value: &Value,
    flush: Option<&mut Flush<'_>>,
) -> Result<isize, EncodeError> {
    let len = token.len();
    let capacity = buf.len();
    let overflow = || EncodeError::BufferOverflow {
        needed: len,
        offset,
        capacity,
    };
    if len > capacity || offset > capacity {
        return Err(overflow());
    }

    let start = if offset + len > capacity {
        let flush = flush.ok_or_else(overflow)?;
        token.validate(value)?;
        tracing::trace!(pending = offset, %token, "flushing working buffer");
        flush(&mut *buf, offset)?;
        0
    } else {
        offset
    };

    let written = token.encode(value, &mut buf[start..])?;

    #[allow(clippy::cast_possible_wrap)]
    Ok(start as isize - offset as isize + written as isize)
}
