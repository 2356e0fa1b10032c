//! Performance benchmarks for listener fan-out
//!
//! Measures dispatch cost for different listener counts, plus the cost of
//! decoding a frame before dispatch.
//! Run with: cargo bench

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use storefront_realtime::websocket::{ChatEvent, ListenerRegistry};

fn sample_message() -> Value {
    json!({
        "type": "chat_message",
        "id": "msg-1042",
        "conversation_id": "conv-77",
        "sender_id": "seller-3",
        "sender_name": "Oak & Linen",
        "content": "Your order is packed and will ship tomorrow morning.",
        "sent_at": "2024-05-01T10:00:00Z"
    })
}

/// Benchmark dispatch to N counting listeners
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("listener_dispatch");
    let message = sample_message();

    for count in [1, 4, 16, 64].iter() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..*count {
            let hits = hits.clone();
            registry.subscribe(move |_| {
                hits.fetch_add(1, Ordering::Relaxed);
            });
        }

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_listeners", count)),
            &message,
            |b, message| {
                b.iter(|| black_box(registry.dispatch(black_box(message))));
            },
        );
    }

    group.finish();
}

/// Benchmark frame decode plus typed conversion
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_decode");
    let text = sample_message().to_string();
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("value", |b| {
        b.iter(|| {
            let value: Value = serde_json::from_str(black_box(&text)).unwrap();
            black_box(value)
        });
    });

    group.bench_function("chat_event", |b| {
        let value: Value = serde_json::from_str(&text).unwrap();
        b.iter(|| {
            let event: ChatEvent = serde_json::from_value(black_box(value.clone())).unwrap();
            black_box(event)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_decode);

criterion_main!(benches);
