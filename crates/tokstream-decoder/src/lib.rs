#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod signal;
pub mod source;
pub mod streaming;
pub mod tokenizer;

mod queue;
mod scratch;

pub use config::TokenizerConfig;
pub use error::{DecodeError, InvariantViolation, ProtocolViolation};
pub use signal::{Driver, Resolver, Signal};
pub use source::{MemorySource, Source};
pub use streaming::{Pump, StreamingTokenizer};
pub use tokenizer::{EngineState, Tokenizer};
pub use tokstream_wire::{Token, Value};
