use tokstream_wire::{Token, Value};

/// What the driver wants the tokenizer to do next.
///
/// ```text
///   Signal
///   ├── Token(t)  ← read t.len() bytes and decode them as t
///   ├── Defer     ← stop decoding until the handed-out Resolver is used
///   └── Done      ← stop for good; queued bytes become the remainder
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Token(Token),
    Defer,
    Done,
}

impl From<Token> for Signal {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

/// One-shot handle for resolving a [`Signal::Defer`].
///
/// Every driver call gets a fresh resolver. Only the one handed out with
/// the call that returned `Defer` is accepted by
/// [`Tokenizer::resolve`](crate::Tokenizer::resolve); any other is stale.
/// The type is neither `Clone` nor `Copy`, and `resolve` consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct Resolver {
    ticket: u64,
}

impl Resolver {
    pub(crate) fn new(ticket: u64) -> Self {
        Self { ticket }
    }

    /// Sequence number of the driver call this resolver was issued with.
    #[must_use]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

/// The consumer side of a tokenizer.
///
/// `next_token` is called once with `None` when the tokenizer is built,
/// then once per decoded value in stream order. An ignored span yields
/// [`Value::Skipped`]. Any `FnMut(Option<Value>, Resolver) -> Signal`
/// closure is a driver.
pub trait Driver {
    fn next_token(&mut self, value: Option<Value>, resolver: Resolver) -> Signal;
}

impl<F> Driver for F
where
    F: FnMut(Option<Value>, Resolver) -> Signal,
{
    fn next_token(&mut self, value: Option<Value>, resolver: Resolver) -> Signal {
        self(value, resolver)
    }
}
