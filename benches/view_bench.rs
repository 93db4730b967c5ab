use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strided_nd::StridedView;

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");
    for size in [64u32, 256, 1024] {
        let n = size as usize;
        group.throughput(Throughput::Elements((n * n) as u64));
        let data: Vec<f64> = (0..n * n).map(|i| i as f64).collect();
        let view = StridedView::<_, 2>::from_packed(&data, [size, size]).unwrap();
        let mut transposed = view;
        transposed.transpose(0, 1);

        group.bench_with_input(BenchmarkId::new("slice_iter", size), &size, |b, _| {
            b.iter(|| black_box(data.iter().sum::<f64>()))
        });
        group.bench_with_input(BenchmarkId::new("packed", size), &size, |b, _| {
            b.iter(|| black_box(view.iter().sum::<f64>()))
        });
        group.bench_with_input(BenchmarkId::new("transposed", size), &size, |b, _| {
            b.iter(|| black_box(transposed.iter().sum::<f64>()))
        });
    }
    group.finish();
}

fn bench_copy_to_owned(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_vec");
    let n = 512usize;
    let data: Vec<f64> = (0..n * n).map(|i| i as f64).collect();
    let view = StridedView::<_, 2>::from_packed(&data, [n as u32, n as u32]).unwrap();
    let stepped = view.slice_step([0, 0], [n as u32, n as u32], [2, 2]);
    group.throughput(Throughput::Elements(stepped.size() as u64));
    group.bench_function("stepped", |b| b.iter(|| black_box(stepped.to_vec())));
    group.finish();
}

fn bench_reverse_mapping(c: &mut Criterion) {
    let data: Vec<u32> = (0..4096).collect();
    let mut view = StridedView::<_, 3>::from_packed(&data, [16, 16, 16]).unwrap();
    view.transpose(0, 2);
    view.flip(1);
    c.bench_function("coord_of_address", |b| {
        b.iter(|| {
            for address in (0..4096).step_by(7) {
                if let Err(err) = view.coord_of_address(black_box(address)) {
                    panic!("coord_of_address failed: {err}");
                }
            }
        })
    });
}

criterion_group!(
    benches,
    bench_iterate,
    bench_copy_to_owned,
    bench_reverse_mapping
);
criterion_main!(benches);
