#![allow(unused)]
//! Router publish and subscription benchmarks.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `publish` | Cost of one publish: explicit tag vs caller capture strategies |
//! | `filter` | Draining a mixed backlog through tag and level filters |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench router_bench
//! open target/criterion/report/index.html
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use futures::executor::block_on;
use logflow::{BacktraceCaller, LogLevel, NoCaller, Router};

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

fn publish_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");
    group.throughput(Throughput::Elements(1));

    // A fresh router per iteration keeps the backlog from growing across
    // samples.
    for (name, capture) in [("explicit_tag", false), ("fallback_tag", false), ("backtrace_tag", true)] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || {
                    if capture {
                        Router::new().with_caller(BacktraceCaller::new())
                    } else {
                        Router::new().with_caller(NoCaller)
                    }
                },
                |router| {
                    let tag = (name == "explicit_tag").then_some("Api");
                    router.info(black_box("request served"), tag, false);
                    router
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

fn filter_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    const TAGS: [&str; 4] = ["Api", "Db", "Worker", "Cache"];

    for count in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        for (name, tag, level) in [
            ("all", None, LogLevel::Debug),
            ("tag_only", Some("Db"), LogLevel::Debug),
            ("tag_and_error", Some("Db"), LogLevel::Error),
        ] {
            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, &n| {
                b.iter(|| {
                    let router = Router::new().with_caller(NoCaller);
                    for i in 0..n {
                        let level = LogLevel::ALL[i % LogLevel::ALL.len()];
                        router.log("entry", TAGS[i % TAGS.len()], level, false);
                    }
                    router.close();
                    let mut sub = router.subscribe(tag, level);
                    block_on(async {
                        let mut matched = 0usize;
                        while sub.next().await.is_some() {
                            matched += 1;
                        }
                        black_box(matched)
                    })
                })
            });
        }
    }

    group.finish();
}

criterion_group!(router_benches, publish_bench, filter_bench);
criterion_main!(router_benches);
