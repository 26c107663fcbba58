/// Configuration for [`TokenWriter`](crate::TokenWriter).
///
/// ```text
/// ┌─────────────────┬─────────┬──────────────────────────────────────────┐
/// │ Field           │ Default │ Purpose                                  │
/// ├─────────────────┼─────────┼──────────────────────────────────────────┤
/// │ buffer_capacity │ 1024    │ Size of the fixed working buffer. Tokens │
/// │                 │         │ longer than this can never be written.   │
/// └─────────────────┴─────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    pub buffer_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 1024,
        }
    }
}
