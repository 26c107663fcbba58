use std::io::Cursor;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::TokenizerConfig;
use crate::error::DecodeError;
use crate::signal::Driver;
use crate::tokenizer::{EngineState, Tokenizer};

/// Why [`StreamingTokenizer::pump`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pump {
    /// The driver deferred. Resolve through
    /// [`tokenizer_mut`](StreamingTokenizer::tokenizer_mut), then pump again.
    Deferred,
    /// The reader hit end of file while the driver still awaited a token.
    Eof,
    /// The driver is done. Unconsumed bytes are available from
    /// [`into_rest`](StreamingTokenizer::into_rest).
    Done,
}

/// Async front end that reads chunks from a tokio reader and feeds them to
/// a [`Tokenizer`].
///
/// Reads are issued only while the driver awaits a token, so nothing past
/// what is needed is pulled from the reader once the driver defers or is
/// done. Each read asks for at most `read_chunk_size` bytes.
///
/// # Example
///
/// ```rust,no_run
/// use tokstream_decoder::{Pump, Resolver, Signal, StreamingTokenizer, Value};
/// use tokio::io::AsyncRead;
/// use tokstream_wire::UINT32_BE;
///
/// async fn first_word(reader: impl AsyncRead + Unpin) -> Option<i64> {
///     let mut word = None;
///     let mut stream = StreamingTokenizer::new(reader, |value: Option<Value>, _: Resolver| {
///         match value {
///             None => Signal::Token(UINT32_BE),
///             Some(v) => {
///                 word = v.as_int();
///                 Signal::Done
///             }
///         }
///     });
///     let outcome = stream.pump().await.ok()?;
///     drop(stream);
///     (outcome == Pump::Done).then_some(word).flatten()
/// }
/// ```
pub struct StreamingTokenizer<R, D> {
    reader: R,
    tokenizer: Tokenizer<D>,
    buf: BytesMut,
    chunk_size: usize,
}

impl<R: AsyncRead + Unpin, D: Driver> StreamingTokenizer<R, D> {
    pub fn new(reader: R, driver: D) -> Self {
        Self::with_config(reader, driver, TokenizerConfig::default())
    }

    pub fn with_config(reader: R, driver: D, config: TokenizerConfig) -> Self {
        Self {
            reader,
            tokenizer: Tokenizer::with_config(driver, config),
            buf: BytesMut::new(),
            chunk_size: config.read_chunk_size.max(1),
        }
    }

    /// Read and feed chunks until the driver defers, is done, or the reader
    /// is exhausted.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Io`] if a read fails, or any error from
    /// [`Tokenizer::feed`].
    pub async fn pump(&mut self) -> Result<Pump, DecodeError> {
        loop {
            match self.tokenizer.state() {
                EngineState::Deferred => return Ok(Pump::Deferred),
                EngineState::Done => return Ok(Pump::Done),
                EngineState::Awaiting(_) => {}
            }

            self.buf.resize(self.chunk_size, 0);
            let n = self.reader.read(&mut self.buf).await?;
            if n == 0 {
                tracing::debug!(buffered = self.tokenizer.buffered_len(), "reader exhausted");
                return Ok(Pump::Eof);
            }
            self.buf.truncate(n);
            let chunk = self.buf.split().freeze();
            tracing::trace!(bytes = n, "read chunk");
            self.tokenizer.feed(chunk)?;
        }
    }

    #[must_use]
    pub fn tokenizer(&self) -> &Tokenizer<D> {
        &self.tokenizer
    }

    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer<D> {
        &mut self.tokenizer
    }

    /// Consume the front end and return a reader that yields the bytes the
    /// tokenizer did not consume, followed by the rest of the original
    /// reader.
    ///
    /// Before the driver is done nothing is treated as unconsumed, so only
    /// the original reader remains.
    pub fn into_rest(self) -> impl AsyncRead + Unpin {
        let (rest, reader) = self.into_parts();
        let rest: Bytes = rest.concat().into();
        Cursor::new(rest).chain(reader)
    }

    /// Split into the unconsumed chunks and the underlying reader.
    pub fn into_parts(self) -> (Vec<Bytes>, R) {
        (self.tokenizer.into_remainder(), self.reader)
    }
}
