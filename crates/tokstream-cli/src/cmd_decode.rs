/// Implementation of `tokstream decode`.
///
/// Feeds the file through a [`Tokenizer`] in chunks of `--chunk-size`
/// bytes, with a [`LayoutDriver`] asking for the layout's tokens, then
/// prints every value it received.
///
/// # Output format
///
/// ```text
///    0  u8          5
///    1  bytes:5     0x7065746572
///    2  skip:2      <skipped>
///    3  text:4:utf8  "aoeu"
/// ---
/// 3 bytes not decoded
/// ```
///
/// With `--json` the values are printed as an array of
/// `{"token": .., "value": ..}` objects; integers are numbers, bytes are
/// hex strings, skips are `null`.
use std::fs;

use anyhow::{Context, Result};
use serde_json::json;
use tokstream_decoder::{EngineState, MemorySource, Tokenizer, TokenizerConfig};
use tokstream_wire::Value;

use crate::DecodeArgs;
use crate::layout::{LayoutDriver, parse_layout};

/// Run the `tokstream decode` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the layout is invalid, or
/// the tokenizer fails.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let bytes = fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;
    let tokens = parse_layout(&args.layout)?;
    let driver = LayoutDriver::new(tokens, args.repeat)?;

    let config = TokenizerConfig {
        read_chunk_size: args.chunk_size,
        ..TokenizerConfig::default()
    };
    let mut source = MemorySource::from_split(bytes, args.chunk_size);
    let mut tokenizer = Tokenizer::with_config(driver, config);
    let state = tokenizer
        .drive(&mut source)
        .with_context(|| format!("failed to tokenize {}", args.file.display()))?;

    let pending = match state {
        EngineState::Awaiting(token) if tokenizer.buffered_len() > 0 => Some(token),
        _ => None,
    };
    let undecoded = tokenizer.buffered_len() + source.to_vec().len();
    tracing::debug!(
        state = state.name(),
        values = tokenizer.driver().values().len(),
        undecoded,
        "decode finished"
    );

    if args.json {
        let values: Vec<_> = tokenizer
            .driver()
            .values()
            .iter()
            .map(|(token, value)| json!({ "token": token.to_string(), "value": to_json(value) }))
            .collect();
        let out = json!({ "values": values, "undecoded": undecoded });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (idx, (token, value)) in tokenizer.driver().values().iter().enumerate() {
        println!("{idx:>4}  {:<10}  {value}", token.to_string());
    }
    println!("---");
    if let Some(token) = pending {
        println!("incomplete {token} at end of input");
    }
    println!("{undecoded} byte{} not decoded", if undecoded == 1 { "" } else { "s" });
    Ok(())
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(n) => json!(n),
        Value::Bytes(bytes) => json!(hex::encode(bytes)),
        Value::Text(text) => json!(text),
        Value::Skipped => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shapes() {
        assert_eq!(to_json(&Value::Int(-3)), json!(-3));
        assert_eq!(to_json(&Value::Bytes(vec![0xAB, 1])), json!("ab01"));
        assert_eq!(to_json(&Value::Skipped), serde_json::Value::Null);
    }

    #[test]
    fn decodes_a_file_in_small_chunks() {
        let path = std::env::temp_dir().join(format!("tokstream-decode-{}.bin", std::process::id()));
        fs::write(&path, b"\x05peter\x00\x07!").unwrap();
        let args = DecodeArgs {
            file: path.clone(),
            layout: "u8,bytes:5,u16be".into(),
            repeat: false,
            chunk_size: 3,
            json: false,
        };
        let result = run(&args);
        fs::remove_file(&path).unwrap();
        result.unwrap();
    }

    #[test]
    fn missing_file_is_reported() {
        let args = DecodeArgs {
            file: "/nonexistent/tokstream.bin".into(),
            layout: "u8".into(),
            repeat: false,
            chunk_size: 8,
            json: true,
        };
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
