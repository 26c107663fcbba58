/// Implementation of `tokstream encode`.
///
/// Pairs each value with its layout token and writes them through a
/// [`TokenWriter`] into the output file.
///
/// ```text
/// $ tokstream encode --layout u8,bytes:5 --values 5,peter -o out.bin
/// wrote 6 bytes (2 tokens) to out.bin
/// ```
use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use tokstream_encoder::TokenWriter;

use crate::EncodeArgs;
use crate::layout::{parse_layout, parse_values};

/// Run the `tokstream encode` command.
///
/// # Errors
///
/// Returns an error for an invalid layout or value, or if the output file
/// cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let tokens = parse_layout(&args.layout)?;
    let values = parse_values(&tokens, &args.values)?;

    let file =
        File::create(&args.output).with_context(|| format!("cannot create {}", args.output.display()))?;
    let mut writer = TokenWriter::new(BufWriter::new(file));
    for (token, value) in tokens.iter().zip(&values) {
        writer
            .put(token, value)
            .with_context(|| format!("cannot write {value} as {token}"))?;
    }
    writer
        .into_inner()
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    let total: usize = tokens.iter().map(|t| t.len()).sum();
    println!(
        "wrote {total} bytes ({} token{}) to {}",
        tokens.len(),
        if tokens.len() == 1 { "" } else { "s" },
        args.output.display()
    );
    Ok(())
}
