#![warn(clippy::pedantic)]

pub mod encoding;
pub mod error;
pub mod int;
pub mod token;

pub use encoding::Encoding;
pub use error::WireError;
pub use int::{ByteOrder, IntToken};
pub use token::{
    INT8, INT16_BE, INT24_BE, INT32_BE, Token, UINT8, UINT16_BE, UINT16_LE, UINT24_BE, UINT24_LE,
    UINT32_BE, UINT32_LE, Value,
};
