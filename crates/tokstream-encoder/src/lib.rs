#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod put;
pub mod writer;

pub use config::WriterConfig;
pub use error::EncodeError;
pub use put::{Flush, put};
pub use writer::TokenWriter;
