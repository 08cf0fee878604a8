//! Criterion benchmarks for the Riemann message codec.
//!
//! Measures encoding and decoding latency for single events, batches, and
//! queries, plus the cost of stream framing.
//!
//! Run with:
//! ```bash
//! cargo bench --package riemann-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use riemann_core::protocol::codec::{decode_message, encode_frame, encode_message};
use riemann_core::protocol::messages::{Message, Response};
use riemann_core::{Event, Metric};

// ── Message fixtures ──────────────────────────────────────────────────────────

fn make_event(i: i64) -> Event {
    Event::new()
        .time(1_700_000_000 + i)
        .host("web-1")
        .service("cpu")
        .state("ok")
        .description("user+system load")
        .tags(["production", "web"])
        .ttl(60.0)
        .attribute("dc", "eu-west-1")
        .metric(Metric::Double(0.42))
}

fn make_single() -> Message {
    Message::Events(vec![make_event(0)])
}

fn make_batch(n: i64) -> Message {
    Message::Events((0..n).map(make_event).collect())
}

fn make_query() -> Message {
    Message::Query("service = \"cpu\" and metric > 0.9".to_string())
}

fn make_query_response() -> Message {
    Message::Response(Response::with_events((0..20).map(make_event).collect()))
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

/// Benchmarks `encode_message` for every fixture.
fn bench_encode(c: &mut Criterion) {
    let messages: &[(&str, Message)] = &[
        ("Single", make_single()),
        ("Batch(10)", make_batch(10)),
        ("Batch(100)", make_batch(100)),
        ("Query", make_query()),
        ("QueryResponse(20)", make_query_response()),
    ];

    let mut group = c.benchmark_group("encode_message");
    for (name, msg) in messages {
        group.bench_with_input(BenchmarkId::new("msg", name), msg, |b, msg| {
            b.iter(|| encode_message(black_box(msg)))
        });
    }
    group.finish();
}

/// Benchmarks `decode_message` from pre-encoded bytes.
fn bench_decode(c: &mut Criterion) {
    let messages: &[(&str, Message)] = &[
        ("Single", make_single()),
        ("Batch(100)", make_batch(100)),
        ("QueryResponse(20)", make_query_response()),
    ];

    let mut group = c.benchmark_group("decode_message");
    for (name, msg) in messages {
        let bytes = encode_message(msg);
        group.bench_with_input(BenchmarkId::new("msg", name), &bytes, |b, bytes| {
            b.iter(|| decode_message(black_box(bytes)).expect("decode must succeed"))
        });
    }
    group.finish();
}

/// Benchmarks the full stream write path: encode then frame.
fn bench_framed_hot_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_and_frame");

    let single = make_single();
    group.bench_function("Single", |b| {
        b.iter(|| encode_frame(&encode_message(black_box(&single))).unwrap())
    });

    let batch = make_batch(10);
    group.bench_function("Batch_10", |b| {
        b.iter(|| encode_frame(&encode_message(black_box(&batch))).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_framed_hot_path);
criterion_main!(benches);
