use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tokstream_encoder::{TokenWriter, WriterConfig, put};
use tokstream_wire::{Encoding, Token, UINT32_LE, Value};

fn bench_put_into_buffer(c: &mut Criterion) {
    let mut buf = vec![0u8; 4096];
    let value = Value::Int(0xDEAD_BEEF);

    c.bench_function("put_u32le_1024", |b| {
        b.iter(|| {
            let mut offset = 0usize;
            for _ in 0..1024 {
                let mut flush = |_: &mut [u8], _: usize| -> std::io::Result<()> { Ok(()) };
                let adv = put(&UINT32_LE, &mut buf, offset, &value, Some(&mut flush)).unwrap();
                offset = offset.saturating_add_signed(adv);
            }
            offset
        });
    });
}

fn bench_writer_capacity(c: &mut Criterion) {
    let token = Token::text(16, Encoding::Latin1);
    let value = Value::Text("0123456789abcdef".into());
    let mut group = c.benchmark_group("token_writer_text16");
    group.throughput(Throughput::Bytes(16 * 4096));

    for capacity in [64usize, 1024, 16 * 1024] {
        group.bench_with_input(BenchmarkId::new("capacity", capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let mut writer = TokenWriter::with_config(
                    Vec::with_capacity(16 * 4096),
                    WriterConfig {
                        buffer_capacity: capacity,
                    },
                );
                for _ in 0..4096 {
                    writer.put(&token, &value).unwrap();
                }
                writer.into_inner().unwrap().len()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_put_into_buffer, bench_writer_capacity);
criterion_main!(benches);
