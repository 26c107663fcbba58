use std::collections::VecDeque;

use bytes::Bytes;

/// A pull-style supplier of chunks that can take chunks back.
///
/// [`Tokenizer::drive`](crate::Tokenizer::drive) pulls from a source and,
/// once the driver is done, unreads the bytes it did not consume so the
/// next reader of the source sees them first.
pub trait Source {
    /// The next chunk, or `None` once the source is exhausted.
    fn next_chunk(&mut self) -> Option<Bytes>;

    /// Push `chunk` back to the front of the source.
    fn unread(&mut self, chunk: Bytes);

    /// Push `chunks` back so they are read again in the given order.
    fn unread_all(&mut self, chunks: Vec<Bytes>) {
        for chunk in chunks.into_iter().rev() {
            self.unread(chunk);
        }
    }
}

/// In-memory [`Source`] over a queue of chunks.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    chunks: VecDeque<Bytes>,
}

impl MemorySource {
    pub fn new(chunks: impl IntoIterator<Item = Bytes>) -> Self {
        Self {
            chunks: chunks.into_iter().filter(|c| !c.is_empty()).collect(),
        }
    }

    /// Split `data` into chunks of `size` bytes (the last may be shorter).
    /// A `size` of zero is treated as one.
    pub fn from_split(data: impl Into<Bytes>, size: usize) -> Self {
        let data = data.into();
        let size = size.max(1);
        let chunks = (0..data.len())
            .step_by(size)
            .map(|start| data.slice(start..data.len().min(start + size)));
        Self::new(chunks)
    }

    /// Number of chunks still queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Every byte still queued, concatenated.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.chunks.iter().flat_map(|c| c.iter().copied()).collect()
    }
}

impl Source for MemorySource {
    fn next_chunk(&mut self) -> Option<Bytes> {
        self.chunks.pop_front()
    }

    fn unread(&mut self, chunk: Bytes) {
        if !chunk.is_empty() {
            self.chunks.push_front(chunk);
        }
    }
}
