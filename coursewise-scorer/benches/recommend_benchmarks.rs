//! Criterion benchmarks for the recommendation engine.
//!
//! Measures `recommend` across catalog sizes (100, 500, 2000 courses) with a
//! warm embedding cache, and the fallback path with an unavailable model.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package coursewise-scorer
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use coursewise_core::{Course, CourseId, RecommendRequest, Recommender};
use coursewise_scorer::{HashingEmbedder, RecommendationEngine, UnavailableModel};

/// Catalog sizes to benchmark.
const CATALOG_SIZES: &[usize] = &[100, 500, 2000];

/// Number of enrolled courses taken from the front of the catalog.
const ENROLLED: usize = 5;

const CATEGORIES: [&str; 6] = [
    "Python",
    "Web Development",
    "Data Science",
    "DevOps",
    "Cooking",
    "Frontend",
];

const TOPICS: [&str; 7] = [
    "fundamentals of",
    "advanced",
    "hands-on projects in",
    "a crash course in",
    "testing with",
    "deploying",
    "patterns for",
];

/// Build a deterministic synthetic catalog of `size` courses.
fn synthetic_catalog(size: usize) -> Vec<Course> {
    CATEGORIES
        .iter()
        .cycle()
        .zip(TOPICS.iter().cycle())
        .take(size)
        .enumerate()
        .filter_map(|(idx, (category, topic))| {
            let id = CourseId::new(format!("course-{idx}")).ok()?;
            let count = u64::try_from(idx).ok()?.wrapping_mul(7_919) & 0x3ff;
            Some(Course::new(id, *category, format!("{topic} {category}"), count))
        })
        .collect()
}

fn build_request(size: usize) -> RecommendRequest {
    let catalog = synthetic_catalog(size);
    let enrolled = catalog.iter().take(ENROLLED).cloned().collect();
    RecommendRequest::new(enrolled, catalog)
}

fn bench_scored(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend_scored");
    for &size in CATALOG_SIZES {
        let engine = RecommendationEngine::new(HashingEmbedder::default());
        let request = build_request(size);
        // Warm the cache so iterations measure scoring rather than hashing.
        if engine.recommend(&request).is_err() {
            continue;
        }
        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &request, |b, req| {
            b.iter(|| engine.recommend(req));
        });
    }
    group.finish();
}

fn bench_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend_fallback");
    for &size in CATALOG_SIZES {
        let engine = RecommendationEngine::new(UnavailableModel::default());
        let request = build_request(size);
        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &request, |b, req| {
            b.iter(|| engine.recommend(req));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scored, bench_fallback);
criterion_main!(benches);
