//! Session operation benchmarks.
//!
//! Measures the owner-side cost of the hot paths:
//! - Address bar classification
//! - History visits with branch truncation
//! - Navigate-and-apply round trips at different tab counts
//!
//! Run with: cargo bench --bench session_ops
//! Results saved to: target/criterion/

use std::hint::black_box;
use std::sync::Arc;

use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use tab_session::browser::query;
use tab_session::protocol::FetchResponse;
use tab_session::{NavigationHistory, Result, Session, Settings, Transport};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const TAB_COUNTS: &[usize] = &[1, 10, 100];
const TEMPLATE: &str = "https://search.test/?q={query}";

// ============================================================================
// Transport
// ============================================================================

/// Answers immediately so only session overhead is measured.
struct InstantTransport;

#[async_trait]
impl Transport for InstantTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        Ok(FetchResponse::ok(format!("<title>{url}</title>")))
    }
}

// ============================================================================
// Benchmark: Classification
// ============================================================================

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for input in ["https://example.com/a?b=c", "example.com/page", "rust tab sessions"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| query::resolve(black_box(input), TEMPLATE));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: History
// ============================================================================

fn bench_history(c: &mut Criterion) {
    c.bench_function("history_visit_back_truncate", |b| {
        b.iter(|| {
            let mut history = NavigationHistory::new();
            for i in 0..64 {
                history.visit(format!("http://site.test/{i}"));
                if i % 4 == 3 {
                    let _ = history.back();
                    let _ = history.back();
                }
            }
            black_box(history.len())
        });
    });
}

// ============================================================================
// Benchmark: Navigate Round Trip
// ============================================================================

fn bench_navigate(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");

    let mut group = c.benchmark_group("navigate_round_trip");

    for &count in TAB_COUNTS {
        let mut session = rt.block_on(async {
            let mut session = Session::builder()
                .transport(Arc::new(InstantTransport))
                .settings(Settings::new().without_homepage())
                .build()
                .expect("build session");
            for _ in 1..count {
                session.new_tab(None);
            }
            session
        });

        group.bench_with_input(BenchmarkId::new("tabs", count), &count, |b, _| {
            b.iter(|| {
                rt.block_on(async {
                    session.navigate("example.com").expect("navigate");
                    while session.next_update().await.is_some() {}
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_history, bench_navigate);
criterion_main!(benches);
