//! The tokio front end: chunked reads, deferral across awaits, and handing
//! the unread stream on to the next reader.

use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
use tokstream_decoder::{Pump, Signal, StreamingTokenizer, Token, TokenizerConfig, Value};
use tokstream_tests::{Recorder, ScriptedDriver, step};
use tokstream_wire::{UINT8, UINT16_BE};

fn config(read_chunk_size: usize) -> TokenizerConfig {
    TokenizerConfig {
        read_chunk_size,
        ..TokenizerConfig::default()
    }
}

#[tokio::test]
async fn frames_from_a_pipe() {
    let (mut tx, rx) = duplex(4);
    let writer = tokio::spawn(async move {
        for i in 0u8..20 {
            tx.write_all(&[0, 3, i, i, i]).await.unwrap();
        }
    });

    let mut stream = StreamingTokenizer::with_config(
        rx,
        Recorder::new(vec![UINT16_BE, Token::Bytes(3)]),
        config(3),
    );
    assert_eq!(stream.pump().await.unwrap(), Pump::Eof);
    writer.await.unwrap();

    let values = stream.tokenizer().driver().values();
    assert_eq!(values.len(), 40);
    assert_eq!(values[39], Value::Bytes(vec![19, 19, 19]));
}

#[tokio::test]
async fn defer_pauses_reading() {
    let data: &[u8] = b"\x02hi\x03bye";
    let mut stream = StreamingTokenizer::with_config(
        data,
        ScriptedDriver::new([
            step(None, UINT8),
            step(Value::Int(2), Signal::Defer),
            step(Value::Bytes(b"hi".to_vec()), UINT8),
            step(Value::Int(3), Token::Bytes(3)),
            step(Value::Bytes(b"bye".to_vec()), Signal::Done),
        ]),
        config(2),
    );

    assert_eq!(stream.pump().await.unwrap(), Pump::Deferred);
    // One read of two bytes was enough to defer.
    assert_eq!(stream.tokenizer().buffered_len(), 1);

    let tokenizer = stream.tokenizer_mut();
    let resolver = tokenizer.driver_mut().take_resolver().unwrap();
    tokenizer.resolve(resolver, Signal::Token(Token::Bytes(2))).unwrap();

    assert_eq!(stream.pump().await.unwrap(), Pump::Done);
    assert!(stream.tokenizer().driver().is_finished());
}

#[tokio::test]
async fn rest_continues_where_decoding_stopped() {
    let data: &[u8] = b"\x00\x05hello world";
    let stream = async {
        let mut stream = StreamingTokenizer::with_config(
            data,
            ScriptedDriver::new([
                step(None, UINT16_BE),
                step(Value::Int(5), Token::Bytes(5)),
                step(Value::Bytes(b"hello".to_vec()), Signal::Done),
            ]),
            config(4),
        );
        assert_eq!(stream.pump().await.unwrap(), Pump::Done);
        stream
    }
    .await;

    let mut rest = String::new();
    stream.into_rest().read_to_string(&mut rest).await.unwrap();
    assert_eq!(rest, " world");
}
