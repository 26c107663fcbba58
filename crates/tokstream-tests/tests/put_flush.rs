//! The encode helper and the buffered writer built on it.

use std::io;

use tokstream_decoder::Tokenizer;
use tokstream_encoder::{EncodeError, TokenWriter, WriterConfig, put};
use tokstream_tests::{Recorder, SinkBuffer, feed_all, split_random};
use tokstream_wire::{Encoding, INT24_BE, Token, UINT8, UINT32_BE, UINT32_LE, Value};

#[test]
fn put_without_flush_overflows() {
    let mut buf = [0u8; 6];
    let adv = put(&UINT32_BE, &mut buf, 0, &Value::Int(1), None).unwrap();
    assert_eq!(adv, 4);
    let err = put(&UINT32_BE, &mut buf, 4, &Value::Int(2), None).unwrap_err();
    assert!(matches!(err, EncodeError::BufferOverflow { .. }));
}

#[test]
fn running_offset_tracks_flushes() {
    let mut buf = [0u8; 10];
    let mut sink = SinkBuffer::new(8);
    let mut offset = 0usize;

    for v in 0..100 {
        let mut flush = |b: &mut [u8], upto: usize| sink.absorb(b, upto);
        let adv = put(&UINT32_LE, &mut buf, offset, &Value::Int(v), Some(&mut flush)).unwrap();
        offset = offset.checked_add_signed(adv).unwrap();
        assert!(offset <= buf.len());
    }
    sink.absorb(&mut buf, offset).unwrap();

    let expected: Vec<u8> = (0u32..100).flat_map(u32::to_le_bytes).collect();
    assert_eq!(sink.bytes(), expected.as_slice());
    // Two words fit per buffer, so every second put drains it.
    assert_eq!(sink.flushes(), 50);
}

#[test]
fn flush_failure_surfaces_as_io() {
    let mut buf = [0u8; 4];
    let mut flush = |_: &mut [u8], _: usize| -> io::Result<()> { Err(io::Error::other("closed")) };
    let err = put(&UINT32_BE, &mut buf, 2, &Value::Int(1), Some(&mut flush)).unwrap_err();
    assert!(matches!(err, EncodeError::Io(_)));
}

#[test]
fn writer_output_is_the_concatenated_encodings() {
    let layout = [UINT8, Token::Bytes(5), INT24_BE, Token::text(4, Encoding::Hex)];
    let values = [
        Value::Int(5),
        Value::Bytes(b"peter".to_vec()),
        Value::Int(-2),
        Value::Text("c0ffee01".into()),
    ];

    let mut writer = TokenWriter::with_config(SinkBuffer::new(16), WriterConfig { buffer_capacity: 7 });
    for (token, value) in layout.iter().zip(&values) {
        writer.put(token, value).unwrap();
    }
    let sink = writer.into_inner().unwrap();
    assert_eq!(sink.bytes(), b"\x05peter\xff\xff\xfe\xc0\xff\xee\x01");
}

#[test]
fn written_records_decode_under_any_split() {
    let layout = vec![UINT32_BE, Token::text(3, Encoding::Latin1)];
    let mut writer = TokenWriter::new(Vec::new());
    let mut expected = Vec::new();
    for i in 0..200i64 {
        let word = Value::Int(i * 7919);
        let text = Value::Text(format!("{:03}", i % 1000));
        writer.put(&layout[0], &word).unwrap();
        writer.put(&layout[1], &text).unwrap();
        expected.push(word);
        expected.push(text);
    }
    let bytes = writer.into_inner().unwrap();
    assert_eq!(bytes.len(), 200 * 7);

    for seed in 0..4 {
        let mut tokenizer = Tokenizer::new(Recorder::new(layout.clone()));
        feed_all(&mut tokenizer, &split_random(&bytes, seed, 13));
        assert_eq!(tokenizer.driver().values(), expected.as_slice());
        assert_eq!(tokenizer.buffered_len(), 0);
    }
}
