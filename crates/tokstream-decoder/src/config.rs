/// Configuration for [`Tokenizer`](crate::Tokenizer) and
/// [`StreamingTokenizer`](crate::StreamingTokenizer).
///
/// ```text
/// ┌──────────────────┬─────────┬──────────────────────────────────────────┐
/// │ Field            │ Default │ Purpose                                  │
/// ├──────────────────┼─────────┼──────────────────────────────────────────┤
/// │ scratch_capacity │ 1024    │ Starting size of the span buffer used    │
/// │                  │         │ when a token straddles chunks. Rounded   │
/// │                  │         │ up to a power of two; grows on demand.   │
/// │ read_chunk_size  │ 8192    │ Bytes requested per read by the async    │
/// │                  │         │ streaming front end.                     │
/// └──────────────────┴─────────┴──────────────────────────────────────────┘
/// ```
///
/// Nothing here bounds how much is queued while the driver has deferred;
/// see [`Signal::Defer`](crate::Signal::Defer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenizerConfig {
    pub scratch_capacity: usize,
    pub read_chunk_size: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: 1024,
            read_chunk_size: 8192,
        }
    }
}
