//! Deferral: decoding freezes, bytes keep queueing, and resolution resumes
//! in arrival order without loss or duplication.

use bytes::Bytes;
use tokstream_decoder::{
    DecodeError, EngineState, ProtocolViolation, Signal, Token, Tokenizer, Value,
};
use tokstream_tests::{ScriptedDriver, split_random, step};
use tokstream_wire::{UINT8, UINT16_LE};

fn script() -> ScriptedDriver {
    ScriptedDriver::new([
        step(None, UINT8),
        step(Value::Int(3), Signal::Defer),
        step(Value::Bytes(b"abc".to_vec()), UINT16_LE),
        step(Value::Int(0x0201), Signal::Done),
    ])
}

#[test]
fn queued_bytes_decode_in_arrival_order() {
    let data = b"\x03abc\x01\x02tail";
    for seed in 0..16 {
        let mut tokenizer = Tokenizer::new(script());
        for chunk in split_random(data, seed, 3) {
            let state = tokenizer.feed(chunk).unwrap();
            assert_ne!(state, EngineState::Done, "seed {seed}");
        }
        assert_eq!(tokenizer.state(), EngineState::Deferred);
        assert_eq!(tokenizer.buffered_len(), data.len() - 1);

        let resolver = tokenizer.driver_mut().take_resolver().unwrap();
        let state = tokenizer.resolve(resolver, Signal::Token(Token::Bytes(3))).unwrap();
        assert_eq!(state, EngineState::Done);
        assert!(tokenizer.driver().is_finished());
        assert_eq!(tokenizer.into_remainder().concat(), b"tail");
    }
}

#[test]
fn resolve_before_bytes_arrive() {
    let mut tokenizer = Tokenizer::new(script());
    tokenizer.feed(Bytes::from_static(b"\x03")).unwrap();
    let resolver = tokenizer.driver_mut().take_resolver().unwrap();

    let state = tokenizer.resolve(resolver, Signal::Token(Token::Bytes(3))).unwrap();
    assert_eq!(state, EngineState::Awaiting(Token::Bytes(3)));

    tokenizer.feed(Bytes::from_static(b"ab")).unwrap();
    tokenizer.feed(Bytes::from_static(b"c\x01")).unwrap();
    tokenizer.feed(Bytes::from_static(b"\x02")).unwrap();
    assert!(tokenizer.is_done());
}

#[test]
fn misuse_leaves_the_deferral_intact() {
    let mut tokenizer = Tokenizer::new(script());
    tokenizer.feed(Bytes::from_static(b"\x03ab")).unwrap();
    let resolver = tokenizer.driver_mut().take_resolver().unwrap();

    let err = tokenizer.resolve(resolver, Signal::Defer).unwrap_err();
    let DecodeError::Protocol(ProtocolViolation::DeferredResolution { resolver }) = err else {
        panic!("expected the resolver back");
    };
    assert_eq!(tokenizer.state(), EngineState::Deferred);
    assert_eq!(tokenizer.buffered_len(), 2);

    tokenizer.resolve(resolver, Signal::Token(Token::Bytes(3))).unwrap();
    tokenizer.feed(Bytes::from_static(b"c\x01\x02")).unwrap();
    assert!(tokenizer.driver().is_finished());
}

#[test]
fn resolving_twice_is_rejected() {
    let mut tokenizer = Tokenizer::new(ScriptedDriver::new([
        step(None, UINT8),
        step(Value::Int(1), Signal::Defer),
        step(Value::Int(2), Signal::Defer),
    ]));
    tokenizer.feed(Bytes::from_static(b"\x01\x02")).unwrap();
    let first = tokenizer.driver_mut().take_resolver().unwrap();
    let first_ticket = first.ticket();
    tokenizer.resolve(first, Signal::Token(UINT8)).unwrap();

    // The second deferral hands out a fresh ticket.
    let second = tokenizer.driver_mut().take_resolver().unwrap();
    assert_ne!(second.ticket(), first_ticket);
    tokenizer.resolve(second, Signal::Done).unwrap();

    let err = tokenizer.feed(Bytes::from_static(b"x")).unwrap_err();
    assert!(matches!(err, DecodeError::Protocol(ProtocolViolation::AfterDone { .. })));
}
