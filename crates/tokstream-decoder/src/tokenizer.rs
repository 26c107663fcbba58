use bytes::Bytes;
use tokstream_wire::{Token, Value};

use crate::config::TokenizerConfig;
use crate::error::{DecodeError, InvariantViolation, ProtocolViolation};
use crate::queue::ChunkQueue;
use crate::scratch::ScratchBuffer;
use crate::signal::{Driver, Resolver, Signal};
use crate::source::Source;

/// Where the tokenizer is in its lifecycle.
///
/// ```text
///              feed / resolve
///   ┌──────────────┐ ◀──────────── ┌──────────┐
///   │ Awaiting(t)  │               │ Deferred │
///   └──────┬───────┘ ────────────▶ └────┬─────┘
///          │          driver: Defer      │ resolve(.., Done)
///          │ driver: Done                ▼
///          └──────────────────────▶ ┌──────┐
///                                   │ Done │  (terminal)
///                                   └──────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Waiting for `t.len()` bytes to decode the token `t`.
    Awaiting(Token),
    /// Decoding is frozen until the pending [`Resolver`] is used.
    Deferred,
    Done,
}

impl EngineState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Awaiting(_) => "awaiting",
            Self::Deferred => "deferred",
            Self::Done => "done",
        }
    }
}

/// Push-driven streaming tokenizer.
///
/// Chunks of any size arrive through [`feed`](Self::feed). Whenever enough
/// bytes are buffered for the token the driver asked for, the token is
/// decoded and handed to the driver, which answers with the next
/// [`Signal`]. Decoded values never depend on where the chunk boundaries
/// fall.
///
/// A token that fits inside the head chunk is decoded in place. One that
/// straddles chunks is first copied into a per-engine scratch buffer.
/// [`Token::Ignore`] spans are dropped without being decoded; if they reach
/// past the buffered data, the shortfall is carried as skip debt and trimmed
/// off the front of later chunks.
///
/// # Example
///
/// ```rust
/// use tokstream_decoder::{Resolver, Signal, Tokenizer, Token, Value};
/// use tokstream_wire::UINT8;
///
/// let mut tokenizer = Tokenizer::new(|value: Option<Value>, _: Resolver| match value {
///     None => Signal::Token(UINT8),
///     Some(Value::Int(len)) => Signal::Token(Token::Bytes(len as usize)),
///     Some(_) => Signal::Done,
/// });
/// tokenizer.feed(b"\x05pe".as_slice().into()).unwrap();
/// tokenizer.feed(b"ter".as_slice().into()).unwrap();
/// assert!(tokenizer.is_done());
/// ```
pub struct Tokenizer<D> {
    driver: D,
    state: EngineState,
    queue: ChunkQueue,
    scratch: ScratchBuffer,
    skip_debt: usize,
    /// Ticket for the next driver call.
    tickets: u64,
    /// Ticket of the resolver that may end the current deferral.
    pending: Option<u64>,
    poisoned: bool,
}

impl<D: Driver> Tokenizer<D> {
    /// Build a tokenizer and ask the driver for its first token.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, TokenizerConfig::default())
    }

    pub fn with_config(driver: D, config: TokenizerConfig) -> Self {
        let mut tokenizer = Self {
            driver,
            state: EngineState::Done,
            queue: ChunkQueue::new(),
            scratch: ScratchBuffer::new(config.scratch_capacity),
            skip_debt: 0,
            tickets: 0,
            pending: None,
            poisoned: false,
        };
        let (signal, ticket) = tokenizer.call_driver(None);
        if let Err(violation) = tokenizer.apply(signal, ticket) {
            // Surfaces as `Poisoned` on the first call.
            tokenizer.poison(violation);
        }
        tokenizer
    }

    /// Queue a chunk and decode as far as the buffered bytes allow.
    ///
    /// Outstanding skip debt is trimmed off the chunk before anything is
    /// queued. While deferred the chunk is only queued. Empty chunks are
    /// accepted and change nothing.
    ///
    /// # Errors
    ///
    /// - [`ProtocolViolation::AfterDone`] if the tokenizer already finished.
    ///   The chunk is handed back inside the error.
    /// - [`DecodeError::Invariant`] on an internal bookkeeping failure, or
    ///   [`DecodeError::Wire`] if a token cannot be decoded. The tokenizer is
    ///   poisoned afterwards.
    pub fn feed(&mut self, chunk: Bytes) -> Result<EngineState, DecodeError> {
        self.check_poisoned()?;
        if self.state == EngineState::Done {
            return Err(ProtocolViolation::AfterDone { chunk }.into());
        }

        let mut chunk = chunk;
        if self.skip_debt > 0 {
            if !self.queue.is_empty() {
                let queued = self.queue.len();
                return Err(self.poison(InvariantViolation::DebtWithQueuedBytes {
                    debt: self.skip_debt,
                    queued,
                }));
            }
            let paid = self.skip_debt.min(chunk.len());
            chunk = chunk.slice(paid..);
            self.skip_debt -= paid;
            tracing::trace!(paid, outstanding = self.skip_debt, "skip debt applied");
        }

        self.queue.push(chunk);
        self.run()?;
        Ok(self.state)
    }

    /// End the pending deferral with `signal`, then resume decoding.
    ///
    /// # Errors
    ///
    /// Fails with a [`ProtocolViolation`], leaving the tokenizer untouched,
    /// when it is not deferred, when `resolver` is not the one handed out
    /// with the deferring call, or when `signal` is another
    /// [`Signal::Defer`] (the resolver is returned in that case).
    pub fn resolve(&mut self, resolver: Resolver, signal: Signal) -> Result<EngineState, DecodeError> {
        self.check_poisoned()?;
        if self.state != EngineState::Deferred {
            return Err(ProtocolViolation::NotDeferred {
                state: self.state.name(),
            }
            .into());
        }
        if self.pending != Some(resolver.ticket()) {
            return Err(ProtocolViolation::StaleResolver {
                ticket: resolver.ticket(),
            }
            .into());
        }
        if signal == Signal::Defer {
            return Err(ProtocolViolation::DeferredResolution { resolver }.into());
        }

        tracing::debug!(ticket = resolver.ticket(), buffered = self.queue.len(), "deferral resolved");
        self.pending = None;
        if let Err(violation) = self.apply(signal, resolver.ticket()) {
            return Err(self.poison(violation));
        }
        self.run()?;
        Ok(self.state)
    }

    /// Pull chunks from `source` until it runs dry, the driver defers, or
    /// the driver is done.
    ///
    /// When done, every byte the tokenizer did not consume is pushed back
    /// into `source` in its original order, ready for the next reader.
    ///
    /// # Errors
    ///
    /// Any error from [`feed`](Self::feed).
    pub fn drive<S: Source + ?Sized>(&mut self, source: &mut S) -> Result<EngineState, DecodeError> {
        self.check_poisoned()?;
        loop {
            match self.state {
                EngineState::Deferred => return Ok(self.state),
                EngineState::Done => {
                    source.unread_all(self.take_remainder());
                    return Ok(self.state);
                }
                EngineState::Awaiting(_) => match source.next_chunk() {
                    Some(chunk) => {
                        self.feed(chunk)?;
                    }
                    None => return Ok(self.state),
                },
            }
        }
    }
}

impl<D> Tokenizer<D> {
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == EngineState::Done
    }

    /// Bytes queued and not yet decoded.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.queue.len()
    }

    /// Bytes still to be dropped from the front of future chunks.
    #[must_use]
    pub fn skip_debt(&self) -> usize {
        self.skip_debt
    }

    #[must_use]
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// Hand back every byte still queued, as the original chunks in order
    /// (the first one sliced past what was consumed).
    ///
    /// Returns nothing unless the tokenizer is done.
    pub fn take_remainder(&mut self) -> Vec<Bytes> {
        if self.state != EngineState::Done {
            return Vec::new();
        }
        let rest = self.queue.drain();
        if !rest.is_empty() {
            tracing::debug!(chunks = rest.len(), "handing back remainder");
        }
        rest
    }

    /// Consume the tokenizer, returning the remainder as
    /// [`take_remainder`](Self::take_remainder) would.
    #[must_use]
    pub fn into_remainder(mut self) -> Vec<Bytes> {
        self.take_remainder()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn check_poisoned(&self) -> Result<(), DecodeError> {
        if self.poisoned {
            return Err(InvariantViolation::Poisoned.into());
        }
        Ok(())
    }

    fn poison(&mut self, err: impl Into<DecodeError>) -> DecodeError {
        let err = err.into();
        tracing::error!(error = %err, "tokenizer poisoned");
        self.poisoned = true;
        self.state = EngineState::Done;
        self.pending = None;
        err
    }
}

impl<D: Driver> Tokenizer<D> {
    fn call_driver(&mut self, value: Option<Value>) -> (Signal, u64) {
        let ticket = self.tickets;
        self.tickets += 1;
        (self.driver.next_token(value, Resolver::new(ticket)), ticket)
    }

    /// Install `signal` as the next state. Ignore markers are settled here:
    /// the span is dropped from the queue (or carried as debt) and the
    /// driver is asked again with [`Value::Skipped`].
    fn apply(&mut self, signal: Signal, ticket: u64) -> Result<(), InvariantViolation> {
        let (mut signal, mut ticket) = (signal, ticket);
        loop {
            match signal {
                Signal::Token(Token::Ignore(n)) => {
                    let dropped = self.queue.discard(n);
                    self.skip_debt = self.skip_debt.checked_add(n - dropped).ok_or(
                        InvariantViolation::SkipDebtOverflow {
                            debt: self.skip_debt,
                            skip: n,
                        },
                    )?;
                    if self.skip_debt > 0 {
                        tracing::debug!(skip = n, debt = self.skip_debt, "skip carried past buffered data");
                    }
                    (signal, ticket) = self.call_driver(Some(Value::Skipped));
                }
                Signal::Token(token) => {
                    self.state = EngineState::Awaiting(token);
                    return Ok(());
                }
                Signal::Defer => {
                    tracing::debug!(ticket, buffered = self.queue.len(), "driver deferred");
                    self.state = EngineState::Deferred;
                    self.pending = Some(ticket);
                    return Ok(());
                }
                Signal::Done => {
                    tracing::debug!(remaining = self.queue.len(), "driver done");
                    self.state = EngineState::Done;
                    return Ok(());
                }
            }
        }
    }

    /// Decode tokens while the driver is awaiting one and enough bytes are
    /// queued for it.
    fn run(&mut self) -> Result<(), DecodeError> {
        while let EngineState::Awaiting(token) = self.state {
            let len = token.len();
            if self.queue.len() < len {
                break;
            }
            let value = match self.decode_next(token) {
                Ok(value) => value,
                Err(err) => return Err(self.poison(err)),
            };
            let (signal, ticket) = self.call_driver(Some(value));
            if let Err(violation) = self.apply(signal, ticket) {
                return Err(self.poison(violation));
            }
        }
        Ok(())
    }

    fn decode_next(&mut self, token: Token) -> Result<Value, DecodeError> {
        let len = token.len();
        let head_len = self.queue.head()?.len();

        if head_len >= len {
            let value = token.decode(self.queue.head()?)?;
            self.queue.consume_head(len)?;
            tracing::trace!(%token, len, spanning = false, "token decoded");
            return Ok(value);
        }

        let span = self.scratch.span_mut(len);
        let copied = self.queue.copy_out(span);
        if copied != len {
            return Err(InvariantViolation::SpanMismatch {
                expected: len,
                copied,
            }
            .into());
        }
        let value = token.decode(span)?;
        tracing::trace!(%token, len, spanning = true, "token decoded");
        Ok(value)
    }
}
