#![no_main]

use libfuzzer_sys::fuzz_target;
use tokstream_wire::{ByteOrder, IntToken};

// Fuzz target: fixed-width integer codec.
//
// The first byte picks width, signedness and byte order. The next four bytes
// are decoded and must re-encode to the same bytes; the following eight are
// taken as an i64 that must round trip when in range and be rejected, with
// nothing written, when not.
fuzz_target!(|data: &[u8]| {
    if data.len() < 13 {
        return;
    }
    let selector = data[0];
    let order = if selector & 0x10 == 0 { ByteOrder::Big } else { ByteOrder::Little };
    let Some(token) = IntToken::new(selector % 4 + 1, selector & 0x20 != 0, order) else {
        return;
    };

    let raw = &data[1..1 + token.len()];
    let decoded = token.decode(raw).unwrap();
    let mut buf = [0u8; 4];
    token.encode(decoded, &mut buf).unwrap();
    assert_eq!(&buf[..token.len()], raw);

    let value = i64::from_le_bytes(data[5..13].try_into().unwrap());
    let mut out = [0x5Au8; 4];
    match token.encode(value, &mut out) {
        Ok(n) => assert_eq!(token.decode(&out[..n]).unwrap(), value),
        Err(_) => {
            assert!(value < token.min() || value > token.max());
            assert_eq!(out, [0x5A; 4]);
        }
    }
});
