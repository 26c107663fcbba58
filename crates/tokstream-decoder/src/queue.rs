use std::collections::VecDeque;

use bytes::Bytes;

use crate::error::InvariantViolation;

/// Ordered queue of received chunks that have not been consumed yet.
///
/// The first unconsumed byte is always `chunks[0][offset]`. Chunks are
/// reference-counted [`Bytes`], so queueing and handing them back never
/// copies payload.
///
/// ```text
///   offset
///     │
///   ┌─▼──────────┐ ┌──────┐ ┌────────────────┐
///   │xx..........│ │......│ │................│   len = total − offset
///   └────────────┘ └──────┘ └────────────────┘
///     head chunk
/// ```
#[derive(Debug, Default)]
pub(crate) struct ChunkQueue {
    chunks: VecDeque<Bytes>,
    offset: usize,
    len: usize,
}

impl ChunkQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Bytes buffered and not yet consumed.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a non-empty chunk.
    pub(crate) fn push(&mut self, chunk: Bytes) {
        if chunk.is_empty() {
            return;
        }
        self.len += chunk.len();
        self.chunks.push_back(chunk);
    }

    /// Unconsumed bytes of the head chunk.
    pub(crate) fn head(&self) -> Result<&[u8], InvariantViolation> {
        let Some(head) = self.chunks.front() else {
            return Ok(&[]);
        };
        if self.offset >= head.len() {
            return Err(InvariantViolation::OffsetOutOfBounds {
                offset: self.offset,
                len: head.len(),
            });
        }
        Ok(&head[self.offset..])
    }

    /// Consume `n` bytes that lie within the head chunk.
    pub(crate) fn consume_head(&mut self, n: usize) -> Result<(), InvariantViolation> {
        let head_len = self.head()?.len();
        if n > head_len {
            return Err(InvariantViolation::OffsetOutOfBounds {
                offset: self.offset + n,
                len: self.offset + head_len,
            });
        }
        if n == head_len {
            self.chunks.pop_front();
            self.offset = 0;
        } else {
            self.offset += n;
        }
        self.len -= n;
        Ok(())
    }

    /// Copy exactly `dest.len()` bytes off the front of the queue, chunk by
    /// chunk, dequeuing every chunk that is used up.
    ///
    /// Returns the number of bytes copied, which is less than `dest.len()`
    /// only if the queue ran dry.
    pub(crate) fn copy_out(&mut self, dest: &mut [u8]) -> usize {
        let want = dest.len();
        let mut copied = 0;
        while copied < want {
            let Some(chunk) = self.chunks.front() else {
                break;
            };
            let available = chunk.len() - self.offset;
            let n = available.min(want - copied);
            dest[copied..copied + n].copy_from_slice(&chunk[self.offset..self.offset + n]);
            copied += n;
            if n < available {
                self.offset += n;
            } else {
                self.chunks.pop_front();
                self.offset = 0;
            }
        }
        self.len -= copied;
        copied
    }

    /// Drop up to `n` bytes from the front without looking at them.
    ///
    /// Returns how many bytes were dropped; the caller carries the rest as
    /// skip debt.
    pub(crate) fn discard(&mut self, n: usize) -> usize {
        if n >= self.len {
            let dropped = self.len;
            self.clear();
            return dropped;
        }

        let mut remaining = n;
        while let Some(head) = self.chunks.front() {
            let available = head.len() - self.offset;
            if remaining < available {
                self.offset += remaining;
                break;
            }
            remaining -= available;
            self.chunks.pop_front();
            self.offset = 0;
        }
        self.len -= n;
        n
    }

    /// Remove and return everything still queued, head chunk sliced at its
    /// consumption offset.
    pub(crate) fn drain(&mut self) -> Vec<Bytes> {
        let offset = std::mem::take(&mut self.offset);
        self.len = 0;
        let mut out: Vec<Bytes> = self.chunks.drain(..).collect();
        if let Some(head) = out.first_mut() {
            *head = head.slice(offset..);
        }
        out
    }

    fn clear(&mut self) {
        self.chunks.clear();
        self.offset = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(chunks: &[&'static [u8]]) -> ChunkQueue {
        let mut q = ChunkQueue::new();
        for c in chunks {
            q.push(Bytes::from_static(c));
        }
        q
    }

    #[test]
    fn push_skips_empty_chunks() {
        let q = queue(&[b"ab", b"", b"c"]);
        assert_eq!(q.len(), 3);
        assert_eq!(q.chunks.len(), 2);
    }

    #[test]
    fn consume_head_advances_then_dequeues() {
        let mut q = queue(&[b"abc", b"de"]);
        q.consume_head(2).unwrap();
        assert_eq!(q.head().unwrap(), b"c");
        q.consume_head(1).unwrap();
        assert_eq!(q.head().unwrap(), b"de");
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn consume_head_past_chunk_is_an_invariant_failure() {
        let mut q = queue(&[b"ab", b"cd"]);
        assert!(q.consume_head(3).is_err());
    }

    #[test]
    fn copy_out_spans_chunks() {
        let mut q = queue(&[b"ab", b"c", b"def"]);
        q.consume_head(1).unwrap();
        let mut dest = [0u8; 4];
        assert_eq!(q.copy_out(&mut dest), 4);
        assert_eq!(&dest, b"bcde");
        assert_eq!(q.head().unwrap(), b"f");
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn copy_out_reports_short_queue() {
        let mut q = queue(&[b"ab"]);
        let mut dest = [0u8; 3];
        assert_eq!(q.copy_out(&mut dest), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn discard_within_head() {
        let mut q = queue(&[b"abcd", b"ef"]);
        assert_eq!(q.discard(2), 2);
        assert_eq!(q.head().unwrap(), b"cd");
        assert_eq!(q.len(), 4);
    }

    #[test]
    fn discard_across_whole_chunks() {
        let mut q = queue(&[b"ab", b"cd", b"efg"]);
        q.consume_head(1).unwrap();
        assert_eq!(q.discard(4), 4);
        assert_eq!(q.head().unwrap(), b"fg");
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn discard_exactly_to_chunk_boundary() {
        let mut q = queue(&[b"ab", b"cd"]);
        assert_eq!(q.discard(2), 2);
        assert_eq!(q.head().unwrap(), b"cd");
    }

    #[test]
    fn discard_more_than_buffered() {
        let mut q = queue(&[b"ab", b"cd"]);
        assert_eq!(q.discard(10), 4);
        assert!(q.is_empty());
        assert!(q.head().unwrap().is_empty());
    }

    #[test]
    fn drain_respects_head_offset() {
        let mut q = queue(&[b"\xff\x11\x22", b"abcdef\xff"]);
        q.consume_head(1).unwrap();
        let rest = q.drain();
        assert_eq!(rest, vec![Bytes::from_static(b"\x11\x22"), Bytes::from_static(b"abcdef\xff")]);
        assert!(q.is_empty());
    }
}
