use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ignix_proto::codec::{decode_reply, encode_request, read_reply};
use ignix_proto::commands::strings;
use ignix_proto::connection::MockStream;

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.bench_function("encode_set_1k", |b| {
        b.iter(|| {
            for i in 0..1000u32 {
                let k = format!("k{i}");
                let v = format!("v{i}");
                let req = strings::set(k.as_str(), v.as_str(), Default::default());
                black_box(encode_request(&req).unwrap());
            }
        });
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let mut inbound = Vec::new();
    for i in 0..1000 {
        let v = format!("v{i}");
        inbound.extend_from_slice(format!("${}\r\n{v}\r\n", v.len()).as_bytes());
    }
    group.bench_function("decode_bulk_1k", |b| {
        b.iter(|| {
            let mut conn = MockStream::with_inbound(inbound.clone());
            for _ in 0..1000 {
                let reply = read_reply(&mut conn).unwrap();
                black_box(decode_reply(&reply));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
