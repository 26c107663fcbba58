/// Implementation of `tokstream inspect`.
///
/// Splits a file the same way `decode` would and prints each chunk with its
/// stream offset, 16 bytes per line.
///
/// ```text
/// chunk 0 @ 0x000000 (16 bytes)
///   057065746572ffff0102030405060708
/// chunk 1 @ 0x000010 (3 bytes)
///   aabbcc
/// ---
/// 2 chunks, 19 bytes
/// ```
use std::fs;

use anyhow::{Context, Result};
use tokstream_decoder::{MemorySource, Source};

use crate::InspectArgs;

/// Run the `tokstream inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes = fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;
    let mut source = MemorySource::from_split(bytes, args.chunk_size);

    let mut offset = 0usize;
    let mut count = 0usize;
    while let Some(chunk) = source.next_chunk() {
        println!("chunk {count} @ 0x{offset:06x} ({} bytes)", chunk.len());
        for line in chunk.chunks(16) {
            println!("  {}", hex::encode(line));
        }
        offset += chunk.len();
        count += 1;
    }
    println!("---");
    println!("{count} chunk{}, {offset} bytes", if count == 1 { "" } else { "s" });
    Ok(())
}
