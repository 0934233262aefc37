use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kafka_client::{decode_assignment, decode_metadata};

fn metadata_payload(topics: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0i16.to_be_bytes());
    out.extend_from_slice(&(topics as i32).to_be_bytes());
    for i in 0..topics {
        let name = format!("topic-{i}");
        out.extend_from_slice(&(name.len() as i16).to_be_bytes());
        out.extend_from_slice(name.as_bytes());
    }
    out
}

fn assignment_payload(topics: usize, partitions: i32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0i16.to_be_bytes());
    out.extend_from_slice(&(topics as i32).to_be_bytes());
    for i in 0..topics {
        let name = format!("topic-{i}");
        out.extend_from_slice(&(name.len() as i16).to_be_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&partitions.to_be_bytes());
        for p in 0..partitions {
            out.extend_from_slice(&p.to_be_bytes());
        }
    }
    out
}

fn bench_group_codec(c: &mut Criterion) {
    let metadata = metadata_payload(64);
    c.bench_function("decode_metadata_64_topics", |b| {
        b.iter(|| decode_metadata(black_box(&metadata)).unwrap())
    });

    let assignment = assignment_payload(16, 32);
    c.bench_function("decode_assignment_16x32", |b| {
        b.iter(|| decode_assignment(black_box(&assignment)).unwrap())
    });
}

criterion_group!(benches, bench_group_codec);
criterion_main!(benches);
