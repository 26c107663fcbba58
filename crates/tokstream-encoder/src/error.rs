use tokstream_wire::WireError;

/// Errors that can occur while writing tokens into a working buffer.
///
/// ```text
///   EncodeError
///   ├── BufferOverflow     ← no room left and no flush to make room
///   ├── Wire(WireError)    ← value rejected by the codec table
///   └── Io(std::io::Error) ← flush or sink write failed
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The value does not fit in the remaining buffer and there is no
    /// flush to drain it, or the token is longer than the whole buffer.
    #[error("buffer out of space: {needed} bytes needed at offset {offset}, capacity {capacity}")]
    BufferOverflow {
        needed: usize,
        offset: usize,
        capacity: usize,
    },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
