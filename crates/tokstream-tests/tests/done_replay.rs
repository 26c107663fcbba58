//! Once the driver is done, every undecoded byte is handed back unchanged
//! and in order, whatever the chunking.

use bytes::Bytes;
use tokstream_decoder::{EngineState, MemorySource, Signal, Source, Tokenizer, Value};
use tokstream_tests::{ScriptedDriver, feed_all, split_random, step};
use tokstream_wire::{UINT16_BE, UINT8};

fn header_then_done() -> ScriptedDriver {
    ScriptedDriver::new([
        step(None, UINT8),
        step(Value::Int(0xFF), UINT16_BE),
        step(Value::Int(0x1122), Signal::Done),
    ])
}

#[test]
fn remainder_is_byte_for_byte() {
    let data: Vec<u8> = [&b"\xff\x11\x22"[..], &b"abcdef\xff"[..], &[0u8; 300][..]].concat();
    for seed in 0..32 {
        let chunks = split_random(&data, seed, 40);
        let mut tokenizer = Tokenizer::new(header_then_done());
        let mut fed = 0;
        for chunk in &chunks {
            fed += 1;
            tokenizer.feed(chunk.clone()).unwrap();
            if tokenizer.is_done() {
                break;
            }
        }
        let mut rest = tokenizer.into_remainder().concat();
        for chunk in &chunks[fed..] {
            rest.extend_from_slice(chunk);
        }
        assert_eq!(rest, &data[3..], "seed {seed}");
    }
}

#[test]
fn remainder_keeps_original_chunks() {
    let mut tokenizer = Tokenizer::new(header_then_done());
    feed_all(&mut tokenizer, &[Bytes::from_static(b"\xff\x11")]);
    tokenizer.feed(Bytes::from_static(b"\x22abc")).unwrap();
    assert!(tokenizer.is_done());
    assert_eq!(tokenizer.take_remainder(), vec![Bytes::from_static(b"abc")]);
}

#[test]
fn drive_returns_rest_to_the_source() {
    let data = b"\xff\x11\x22abcdef\xff";
    for size in 1..=data.len() {
        let mut source = MemorySource::from_split(&data[..], size);
        let mut tokenizer = Tokenizer::new(header_then_done());
        assert_eq!(tokenizer.drive(&mut source).unwrap(), EngineState::Done);
        assert_eq!(source.to_vec(), b"abcdef\xff", "chunk size {size}");

        // The next reader picks up exactly where the tokenizer stopped.
        let next = source.next_chunk().unwrap();
        assert_eq!(next[0], b'a');
    }
}
