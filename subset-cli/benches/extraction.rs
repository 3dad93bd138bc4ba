use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use subset_cli::synthetic_points;
use subset_core::{all_dimensions, extract, extract_with_layout, remap_partition, Cluster, IndexSet, Layout, Partition};

const ROWS: usize = 100_000;
const DIMS: usize = 16;

fn selection(count: usize) -> Vec<usize> {
    // every k-th row, so reads are strided across the table
    let step = ROWS / count;
    (0..count).map(|i| i * step).collect()
}

fn bench_extract(c: &mut Criterion) {
    let data = synthetic_points(ROWS, DIMS).unwrap();
    let dims = all_dimensions(&data);
    let mut group = c.benchmark_group("extract");

    for count in [1_000, 10_000, 50_000] {
        let set = IndexSet::build("bench", selection(count)).unwrap();
        group.throughput(Throughput::Elements((count * DIMS) as u64));

        group.bench_with_input(BenchmarkId::new("row_major", count), &set, |b, set| {
            b.iter(|| extract(black_box(&data), set.ordered(), &dims).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("column_major", count), &set, |b, set| {
            b.iter(|| extract_with_layout(black_box(&data), set.ordered(), &dims, Layout::ColumnMajor).unwrap());
        });
    }

    group.finish();
}

fn bench_remap(c: &mut Criterion) {
    let clusters = (0..32u32).map(|k| Cluster::new(format!("c{k}"), (k..ROWS as u32).step_by(32).collect()));
    let partition = Partition::from_clusters(clusters);
    let mut group = c.benchmark_group("remap");

    for count in [1_000, 50_000] {
        let set = IndexSet::build("bench", selection(count)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &set, |b, set| {
            b.iter(|| remap_partition(black_box(&partition), set));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_remap);
criterion_main!(benches);
