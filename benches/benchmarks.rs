//! Performance benchmarks for ferro-liftover
//!
//! Run with: cargo bench
//! Run specific benchmark: cargo bench -- mapping

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferro_liftover::liftover::{
    translate, AmbiguityPolicy, ChainFile, ChromStyle, Liftover, OverlapPolicy,
};
use ferro_liftover::marker::MarkerReader;
use ferro_liftover::Dataset;

const BLOCKS_PER_CHROM: u64 = 5_000;
const BLOCK_LEN: u64 = 40_000;
const GAP_LEN: u64 = 500;

/// A gapped UCSC chain per autosome, shaped like a real build-to-build chain
fn synthetic_chain() -> String {
    let mut out = String::new();
    for chrom in 1..=22u64 {
        let span = BLOCKS_PER_CHROM * (BLOCK_LEN + GAP_LEN) - GAP_LEN;
        out.push_str(&format!(
            "chain 1000 chr{c} {size} + 0 {span} chr{c} {size} + 0 {span} {c}\n",
            c = chrom,
            size = span + 1_000,
            span = span
        ));
        for _ in 1..BLOCKS_PER_CHROM {
            out.push_str(&format!("{}\t{}\t{}\n", BLOCK_LEN, GAP_LEN, GAP_LEN));
        }
        out.push_str(&format!("{}\n\n", BLOCK_LEN));
    }
    out
}

fn synthetic_table(n: usize) -> String {
    (0..n)
        .map(|i| {
            let chrom = i % 22 + 1;
            let pos = (i as u64 * 7_919) % (BLOCKS_PER_CHROM * BLOCK_LEN) + 1;
            format!("{}\t{}\trs{}\n", chrom, pos, i)
        })
        .collect()
}

fn load_liftover() -> Liftover {
    let chain = synthetic_chain();
    let chain = ChainFile::parse(chain.as_bytes(), "bench.chain", OverlapPolicy::Ambiguous)
        .expect("synthetic chain parses");
    Liftover::new(chain, AmbiguityPolicy::Conservative)
}

fn load_dataset(n: usize) -> Dataset {
    MarkerReader::default()
        .parse(synthetic_table(n).as_bytes(), "bench.tsv")
        .expect("synthetic table parses")
}

// =============================================================================
// Loading benchmarks
// =============================================================================

fn bench_chain_parsing(c: &mut Criterion) {
    let chain = synthetic_chain();
    let mut group = c.benchmark_group("chain_parsing");
    group.throughput(Throughput::Bytes(chain.len() as u64));
    group.sample_size(20);
    group.bench_function("ucsc_110k_blocks", |b| {
        b.iter(|| {
            ChainFile::parse(black_box(chain.as_bytes()), "bench.chain", OverlapPolicy::Ambiguous)
                .unwrap()
        })
    });
    group.finish();
}

fn bench_table_reading(c: &mut Criterion) {
    let table = synthetic_table(100_000);
    let mut group = c.benchmark_group("table_reading");
    group.throughput(Throughput::Elements(100_000));
    group.bench_function("100k_markers", |b| {
        b.iter(|| MarkerReader::default().parse(black_box(table.as_bytes()), "bench.tsv").unwrap())
    });
    group.finish();
}

// =============================================================================
// Mapping benchmarks
// =============================================================================

fn bench_mapping(c: &mut Criterion) {
    let liftover = load_liftover();
    let mut group = c.benchmark_group("mapping");

    for size in [1_000usize, 10_000, 100_000] {
        let dataset = load_dataset(size);
        let translation = translate(&dataset, ChromStyle::Ucsc);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &translation, |b, t| {
            b.iter(|| liftover.map_intervals(black_box(&t.intervals)))
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("by_chromosome", size), &translation, |b, t| {
            b.iter(|| {
                ferro_liftover::parallel::map_by_chromosome(&liftover, black_box(&t.intervals), 0)
                    .unwrap()
            })
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("per_interval", size), &translation, |b, t| {
            b.iter(|| {
                ferro_liftover::parallel::map_intervals_parallel(&liftover, black_box(&t.intervals))
            })
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let liftover = load_liftover();
    let dataset = load_dataset(50_000);
    let pipeline = ferro_liftover::LiftPipeline::default();

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(dataset.len() as u64));
    group.bench_function("run_50k", |b| {
        b.iter(|| pipeline.run(black_box(&dataset), &liftover).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_chain_parsing,
    bench_table_reading,
    bench_mapping,
    bench_pipeline
);
criterion_main!(benches);
