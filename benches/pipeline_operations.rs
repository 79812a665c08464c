use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rs2_seq::collectors;
use rs2_seq::{IntStream, Stream};

fn bench_basic_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("basic_operations");

    // Test different data sizes
    for size in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("map_filter", size), size, |b, &size| {
            b.iter(|| {
                let result = IntStream::range(0, size)
                    .map(|x| black_box(x * 2))
                    .unwrap()
                    .filter(|x| black_box(x % 4 == 0))
                    .unwrap()
                    .to_vec()
                    .unwrap();
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("iterator_baseline", size), size, |b, &size| {
            b.iter(|| {
                let result: Vec<i32> = (0..size)
                    .map(|x| black_box(x * 2))
                    .filter(|x| black_box(x % 4 == 0))
                    .collect();
                black_box(result)
            });
        });

        group.bench_with_input(BenchmarkId::new("summary_statistics", size), size, |b, &size| {
            b.iter(|| black_box(IntStream::range(0, size).summary_statistics().unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("sorted", size), size, |b, &size| {
            b.iter(|| {
                let result = Stream::from_iter((0..size).rev())
                    .sorted()
                    .unwrap()
                    .limit(10)
                    .unwrap()
                    .to_vec()
                    .unwrap();
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_collectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("collectors");

    for size in [1_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("grouping_by_counting", size), size, |b, &size| {
            b.iter(|| {
                let groups = IntStream::range(0, size)
                    .boxed()
                    .unwrap()
                    .collect(collectors::grouping_by_with(|x: &i32| x % 16, collectors::counting()))
                    .unwrap();
                black_box(groups)
            });
        });

        group.bench_with_input(BenchmarkId::new("joining", size), size, |b, &size| {
            b.iter(|| {
                let text = IntStream::range(0, size)
                    .map_to_obj(|x| x.to_string())
                    .unwrap()
                    .collect(collectors::joining_with(","))
                    .unwrap();
                black_box(text)
            });
        });

        group.bench_with_input(BenchmarkId::new("flat_map", size), size, |b, &size| {
            b.iter(|| {
                let count = IntStream::range(0, size / 10)
                    .boxed()
                    .unwrap()
                    .flat_map(|x| Stream::of(vec![x; 10]))
                    .unwrap()
                    .count()
                    .unwrap();
                black_box(count)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_basic_operations, bench_collectors);
criterion_main!(benches);
