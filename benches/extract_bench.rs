use std::sync::Arc;

use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prk_object_stream::*;
use serde::Deserialize;

#[derive(Deserialize, PartialEq, Eq, Hash)]
struct SampleData {
    id: u64,
    value: String,
}

fn create_stream(count: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..count {
        data.extend(format!(r#"{{"id":{},"value":"Value {}"}}"#, i, i).as_bytes());
    }
    data
}

fn extract_all(data: &[u8], chunk_size: usize, strategy: Arc<dyn BoundaryStrategy>) -> usize {
    let mut extractor = ObjectExtractor::with_strategy(strategy);
    let mut decoded = 0;
    for chunk in data.chunks(chunk_size) {
        let spans = extractor.push(Bytes::copy_from_slice(chunk));
        decoded += decode_batch::<SampleData, _>(&JsonDecoder, &spans, 64).len();
    }
    decoded
}

fn extraction_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    group.sample_size(10);

    let data = create_stream(10_000);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk_size in [512, 4096, 65536].iter() {
        group.bench_with_input(
            BenchmarkId::new("brace", chunk_size),
            chunk_size,
            |b, &chunk_size| b.iter(|| extract_all(&data, chunk_size, Arc::new(BraceBoundary))),
        );
        group.bench_with_input(
            BenchmarkId::new("strict", chunk_size),
            chunk_size,
            |b, &chunk_size| b.iter(|| extract_all(&data, chunk_size, Arc::new(StrictBoundary))),
        );
    }

    group.finish();
}

criterion_group!(benches, extraction_benchmark);
criterion_main!(benches);
