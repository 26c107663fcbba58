use std::io::Write;

use tokstream_wire::{Token, Value};

use crate::config::WriterConfig;
use crate::error::EncodeError;
use crate::put::put;

/// Writes tokens through a fixed-size working buffer into a sink.
///
/// `TokenWriter` keeps a single buffer of `buffer_capacity` bytes and a
/// running offset. Each [`put`](Self::put) goes through [`crate::put`]
/// with a flush that hands the pending prefix to the sink, so the buffer
/// never grows no matter how many values are written.
///
/// ```text
///   put(v1) put(v2) put(v3) ... ──▶ [ working buffer ] ──flush──▶ sink (impl Write)
/// ```
///
/// Call [`flush`](Self::flush) or [`into_inner`](Self::into_inner) to push
/// out whatever is still buffered; dropping the writer discards it.
pub struct TokenWriter<W: Write> {
    sink: W,
    buf: Vec<u8>,
    pos: usize,
}

impl<W: Write> TokenWriter<W> {
    /// Create a writer with the default [`WriterConfig`].
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, WriterConfig::default())
    }

    pub fn with_config(sink: W, config: WriterConfig) -> Self {
        Self {
            sink,
            buf: vec![0; config.buffer_capacity],
            pos: 0,
        }
    }

    /// Encode one value into the working buffer, draining it into the sink
    /// first if there is not enough room.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Wire`] for rejected values,
    /// [`EncodeError::BufferOverflow`] if the token is longer than the
    /// working buffer, and [`EncodeError::Io`] if the sink fails.
    pub fn put(&mut self, token: &Token, value: &Value) -> Result<&mut Self, EncodeError> {
        let sink = &mut self.sink;
        let mut drain = |buf: &mut [u8], upto: usize| sink.write_all(&buf[..upto]);
        let advance = put(token, &mut self.buf, self.pos, value, Some(&mut drain))?;
        self.pos = self.pos.saturating_add_signed(advance);
        Ok(self)
    }

    /// Bytes written but not yet handed to the sink.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Write all buffered bytes to the sink and flush it.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Io`] if the sink fails.
    pub fn flush(&mut self) -> Result<(), EncodeError> {
        if self.pos > 0 {
            tracing::trace!(bytes = self.pos, "draining token writer");
            self.sink.write_all(&self.buf[..self.pos])?;
            self.pos = 0;
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Flush and return the sink.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Io`] if the final flush fails.
    pub fn into_inner(mut self) -> Result<W, EncodeError> {
        self.flush()?;
        Ok(self.sink)
    }
}
