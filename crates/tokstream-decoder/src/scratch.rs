/// Per-engine buffer for tokens that straddle chunk boundaries.
///
/// Capacity is always a power of two and never shrinks. Contents are only
/// meaningful for the decode that filled them.
#[derive(Debug)]
pub(crate) struct ScratchBuffer {
    buf: Vec<u8>,
}

impl ScratchBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.max(1).next_power_of_two()],
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// A writable span of exactly `len` bytes, growing the buffer first if
    /// needed.
    pub(crate) fn span_mut(&mut self, len: usize) -> &mut [u8] {
        if len > self.buf.len() {
            let grown = len.next_power_of_two();
            tracing::debug!(from = self.buf.len(), to = grown, "growing scratch buffer");
            self.buf.resize(grown, 0);
        }
        &mut self.buf[..len]
    }
}
