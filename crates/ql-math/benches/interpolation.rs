use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ql_math::{CubicNaturalSpline, Interpolation1D};

fn log_grid(n: usize) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = (0..n)
        .map(|i| (50.0_f64).ln() + i as f64 * (4.0_f64.ln() / (n - 1) as f64))
        .collect();
    let ys: Vec<f64> = xs.iter().map(|x| (x.exp() - 100.0).max(0.0)).collect();
    (xs, ys)
}

fn bench_cubic_spline(c: &mut Criterion) {
    let (xs, ys) = log_grid(201);

    c.bench_function("cubic_natural_spline_fit_201", |b| {
        b.iter(|| CubicNaturalSpline::new(black_box(&xs), black_box(&ys)).unwrap())
    });

    let spline = CubicNaturalSpline::new(&xs, &ys).unwrap();
    c.bench_function("cubic_natural_spline_eval_201", |b| {
        b.iter(|| {
            xs.iter()
                .map(|&x| spline.operator(black_box(x + 1e-3)))
                .sum::<f64>()
        })
    });
}

criterion_group!(benches, bench_cubic_spline);
criterion_main!(benches);
