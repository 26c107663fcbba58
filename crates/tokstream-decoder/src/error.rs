use bytes::Bytes;
use tokstream_wire::WireError;

use crate::signal::Resolver;

/// Errors that can occur while driving the tokenizer.
///
/// ```text
///   DecodeError
///   ├── Protocol(ProtocolViolation)   ← caller misused resolve/feed
///   ├── Invariant(InvariantViolation) ← internal bookkeeping contradiction (fatal)
///   ├── Wire(WireError)               ← codec table rejected a decode
///   └── Io(std::io::Error)            ← from the async reader
/// ```
///
/// Protocol violations leave the tokenizer exactly as it was. Any other
/// failure while decoding poisons it: every later call fails with
/// [`InvariantViolation::Poisoned`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("tokenizer invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Misuse of the deferral or termination protocol.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolViolation {
    /// `resolve` was called while the tokenizer was not deferred.
    #[error("resolve called while {state}, not deferred")]
    NotDeferred { state: &'static str },

    /// The resolver was handed out by an earlier driver call and does not
    /// belong to the pending deferral.
    #[error("resolver #{ticket} does not belong to the pending deferral")]
    StaleResolver { ticket: u64 },

    /// A deferral was resolved with another `Defer`. The resolver is
    /// handed back so the deferral can still be resolved.
    #[error("a deferral must be resolved with a token or done, not another defer")]
    DeferredResolution { resolver: Resolver },

    /// A chunk arrived after the tokenizer finished. The chunk is returned
    /// untouched.
    #[error("chunk of {} bytes fed after done", .chunk.len())]
    AfterDone { chunk: Bytes },
}

/// Internal bookkeeping contradictions. These indicate a defect, not bad
/// input, and are never retried.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("spanning copy produced {copied} bytes, token needs {expected}")]
    SpanMismatch { expected: usize, copied: usize },

    #[error("head offset {offset} outside chunk of {len} bytes")]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[error("skip debt of {debt} bytes outstanding with {queued} bytes queued")]
    DebtWithQueuedBytes { debt: usize, queued: usize },

    #[error("skip of {skip} bytes overflows outstanding skip debt of {debt}")]
    SkipDebtOverflow { debt: usize, skip: usize },

    #[error("tokenizer was poisoned by an earlier failure")]
    Poisoned,
}
