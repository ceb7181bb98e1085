//! Record decode and encode benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use structwire_bench::fixtures;
use structwire_codec::Record;
use structwire_core::{ByteCursor, Endianness};

fn benchmark_quote(c: &mut Criterion) {
    let ty = fixtures::quote().unwrap();
    let bytes = fixtures::quote_bytes(&ty, Endianness::Little).unwrap();
    let record = Record::decode(&ty, &bytes, Endianness::Little).unwrap();

    let mut group = c.benchmark_group("quote");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("decode", |b| {
        b.iter(|| Record::decode(&ty, black_box(&bytes), Endianness::Little).unwrap())
    });

    group.bench_function("consume_reused", |b| {
        let mut target = Record::new(&ty, Endianness::Little).unwrap();
        b.iter(|| {
            let mut cursor = ByteCursor::new(black_box(&bytes));
            target.consume(&mut cursor).unwrap();
        })
    });

    group.bench_function("emit", |b| b.iter(|| black_box(&record).emit().unwrap()));

    group.bench_function("emit_into", |b| {
        let mut buffer = [0u8; 64];
        b.iter(|| black_box(&record).emit_into(&mut buffer).unwrap())
    });

    group.finish();
}

fn benchmark_message(c: &mut Criterion) {
    let ty = fixtures::message().unwrap();
    let mut group = c.benchmark_group("message");

    for levels in [1u8, 16, 128] {
        let bytes = fixtures::message_bytes(&ty, Endianness::Network, levels).unwrap();
        let record = Record::decode(&ty, &bytes, Endianness::Network).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("decode", levels), &bytes, |b, bytes| {
            b.iter(|| Record::decode(&ty, black_box(bytes), Endianness::Network).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("emit", levels), &record, |b, record| {
            b.iter(|| black_box(record).emit().unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_quote, benchmark_message);
criterion_main!(benches);
