//! Shared helpers for the tokstream integration tests and benches.
//!
//! ```text
//! ┌────────────────┬──────────────────────────────────────────────────────┐
//! │ Helper         │ Use                                                  │
//! ├────────────────┼──────────────────────────────────────────────────────┤
//! │ split_fixed    │ equal-sized chunks (last may be short)               │
//! │ split_by       │ chunk sizes taken cyclically from a pattern          │
//! │ split_random   │ reproducible random chunk sizes from a seed          │
//! │ ScriptedDriver │ state table: expected value in, signal out, per call │
//! │ Recorder       │ cycles through a layout forever, recording values    │
//! │ SinkBuffer     │ flush target that grows in fixed increments          │
//! └────────────────┴──────────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::io;

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokstream_decoder::{Driver, Resolver, Signal, Tokenizer};
use tokstream_wire::{Token, Value};

// ── Chunk splitters ───────────────────────────────────────────────────────────

/// Split `data` into chunks of `size` bytes.
#[must_use]
pub fn split_fixed(data: &[u8], size: usize) -> Vec<Bytes> {
    data.chunks(size.max(1)).map(Bytes::copy_from_slice).collect()
}

/// Split `data` using chunk sizes drawn cyclically from `pattern`.
///
/// `split_by(b"abcdefg", &[1, 2])` yields `a`, `bc`, `d`, `ef`, `g`.
#[must_use]
pub fn split_by(data: &[u8], pattern: &[usize]) -> Vec<Bytes> {
    let mut out = Vec::new();
    let mut rest = data;
    for &size in pattern.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(size.clamp(1, rest.len()));
        out.push(Bytes::copy_from_slice(chunk));
        rest = tail;
    }
    out
}

/// Split `data` into chunks of 1 to `max` bytes chosen by a seeded RNG.
#[must_use]
pub fn split_random(data: &[u8], seed: u64, max: usize) -> Vec<Bytes> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        let size = rng.random_range(1..=max.max(1)).min(rest.len());
        let (chunk, tail) = rest.split_at(size);
        out.push(Bytes::copy_from_slice(chunk));
        rest = tail;
    }
    out
}

/// Feed every chunk, stopping at the first error.
///
/// # Panics
///
/// Panics if the tokenizer rejects a chunk.
pub fn feed_all<D: Driver>(tokenizer: &mut Tokenizer<D>, chunks: &[Bytes]) {
    for (i, chunk) in chunks.iter().enumerate() {
        if let Err(e) = tokenizer.feed(chunk.clone()) {
            panic!("chunk {i} rejected: {e}");
        }
    }
}

// ── Drivers ───────────────────────────────────────────────────────────────────

/// One row of a [`ScriptedDriver`] table.
#[derive(Clone, Debug)]
pub struct Step {
    /// Value the driver must receive on this call; `None` for the first call.
    pub expect: Option<Value>,
    pub signal: Signal,
}

/// Build a [`Step`].
pub fn step(expect: impl Into<Option<Value>>, signal: impl Into<Signal>) -> Step {
    Step {
        expect: expect.into(),
        signal: signal.into(),
    }
}

/// A driver that walks a state table, asserting each value it receives.
///
/// A [`Signal::Defer`] step parks the resolver it was handed so the test can
/// pick it up with [`take_resolver`](Self::take_resolver).
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    steps: VecDeque<Step>,
    calls: usize,
    received: Vec<Value>,
    parked: Option<Resolver>,
}

impl ScriptedDriver {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// True once every step has been used.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn received(&self) -> &[Value] {
        &self.received
    }

    pub fn take_resolver(&mut self) -> Option<Resolver> {
        self.parked.take()
    }
}

impl Driver for ScriptedDriver {
    fn next_token(&mut self, value: Option<Value>, resolver: Resolver) -> Signal {
        let call = self.calls;
        self.calls += 1;
        let Some(step) = self.steps.pop_front() else {
            panic!("driver called {} times, script has {call} steps", call + 1);
        };
        assert_eq!(value, step.expect, "unexpected value on call {call}");
        if let Some(v) = value {
            self.received.push(v);
        }
        if step.signal == Signal::Defer {
            self.parked = Some(resolver);
        }
        step.signal
    }
}

/// A driver that requests `layout` over and over and records every value.
///
/// The layout must contain a token that consumes bytes and is not an
/// ignore marker, or the tokenizer would spin without input.
#[derive(Debug)]
pub struct Recorder {
    layout: Vec<Token>,
    next: usize,
    values: Vec<Value>,
}

impl Recorder {
    #[must_use]
    pub fn new(layout: Vec<Token>) -> Self {
        assert!(
            layout.iter().any(|t| !t.is_ignore() && !t.is_empty()),
            "layout never consumes input"
        );
        Self {
            layout,
            next: 0,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Driver for Recorder {
    fn next_token(&mut self, value: Option<Value>, _resolver: Resolver) -> Signal {
        if let Some(v) = value {
            self.values.push(v);
        }
        let token = self.layout[self.next % self.layout.len()];
        self.next += 1;
        Signal::Token(token)
    }
}

/// Run `chunks` through a [`Recorder`] and return what it saw, plus the
/// bytes left buffered and the outstanding skip debt.
#[must_use]
pub fn record(layout: &[Token], chunks: &[Bytes]) -> (Vec<Value>, usize, usize) {
    let mut tokenizer = Tokenizer::new(Recorder::new(layout.to_vec()));
    feed_all(&mut tokenizer, chunks);
    let buffered = tokenizer.buffered_len();
    let debt = tokenizer.skip_debt();
    (tokenizer.driver().values().to_vec(), buffered, debt)
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Flush target that collects drained bytes, growing its storage in fixed
/// increments.
#[derive(Debug)]
pub struct SinkBuffer {
    data: Vec<u8>,
    increment: usize,
    flushes: usize,
}

impl SinkBuffer {
    #[must_use]
    pub fn new(increment: usize) -> Self {
        let increment = increment.max(1);
        Self {
            data: Vec::with_capacity(increment),
            increment,
            flushes: 0,
        }
    }

    /// Take `buf[..upto]`, matching the `put` flush signature.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` matches the flush contract.
    pub fn absorb(&mut self, buf: &mut [u8], upto: usize) -> io::Result<()> {
        let needed = self.data.len() + upto;
        if needed > self.data.capacity() {
            let target = needed.div_ceil(self.increment) * self.increment;
            self.data.reserve_exact(target - self.data.len());
        }
        self.data.extend_from_slice(&buf[..upto]);
        self.flushes += 1;
        Ok(())
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn reset(&mut self) {
        self.data.clear();
        self.flushes = 0;
    }
}

impl io::Write for SinkBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut owned = buf.to_vec();
        self.absorb(&mut owned, buf.len())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
