#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use tokstream_tests::record;
use tokstream_wire::{ByteOrder, Encoding, IntToken, Token};

// Fuzz target: decoding the same bytes under an arbitrary chunking must give
// the same values, buffered length and skip debt as decoding them whole.

#[derive(Debug, Arbitrary)]
struct Input {
    head: u8,
    layout: Vec<(u8, u8)>,
    data: Vec<u8>,
    splits: Vec<u8>,
}

fn int_token(byte: u8) -> Token {
    let width = byte % 4 + 1;
    let order = if byte & 0x10 == 0 { ByteOrder::Big } else { ByteOrder::Little };
    IntToken::new(width, byte & 0x20 != 0, order).map_or(Token::Bytes(1), Token::Int)
}

fn token(kind: u8, len: u8) -> Token {
    let len = usize::from(len % 32);
    match kind % 8 {
        0 | 1 => int_token(kind),
        2 | 3 => Token::Bytes(len),
        4 => Token::Ignore(len),
        5 => Token::text(len, Encoding::Utf8),
        6 => Token::text(len, Encoding::Utf16Le),
        _ => Token::text(len, Encoding::Hex),
    }
}

fuzz_target!(|input: Input| {
    let mut layout = vec![int_token(input.head)];
    layout.extend(input.layout.iter().take(16).map(|&(k, l)| token(k, l)));

    let whole = record(&layout, &[Bytes::from(input.data.clone())]);

    let mut chunks = Vec::new();
    let mut rest = input.data.as_slice();
    for &s in &input.splits {
        if rest.is_empty() {
            break;
        }
        let size = 1 + usize::from(s) % rest.len();
        let (chunk, tail) = rest.split_at(size);
        chunks.push(Bytes::copy_from_slice(chunk));
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(Bytes::copy_from_slice(rest));
    }

    assert_eq!(record(&layout, &chunks), whole);
});
