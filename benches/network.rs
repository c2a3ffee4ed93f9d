use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use sgdnet::{DenseMatrix, Network};

fn feed_forward_bench(c: &mut Criterion) {
    let net = Network::new_with_seed(&[784, 30, 10], 0).unwrap();
    let input = DenseMatrix::column(&vec![0.1_f64; 784]);

    c.bench_function("feed_forward_784_30_10", |b| {
        b.iter(|| {
            let out = net.feed_forward(black_box(&input)).unwrap();
            black_box(out);
        })
    });
}

fn backprop_bench(c: &mut Criterion) {
    let net = Network::new_with_seed(&[784, 30, 10], 0).unwrap();
    let input = DenseMatrix::column(&vec![0.1_f64; 784]);
    let mut target = DenseMatrix::zeros(10, 1);
    target.set(3, 0, 1.0);

    c.bench_function("backprop_784_30_10", |b| {
        b.iter(|| {
            let grads = net.backprop(black_box(&input), black_box(&target)).unwrap();
            black_box(grads);
        })
    });
}

fn matmul_bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut a = DenseMatrix::zeros(128, 128);
    let mut b = DenseMatrix::zeros(128, 128);
    a.randomize(&mut rng);
    b.randomize(&mut rng);

    c.bench_function("matmul_128_128", |bch| {
        bch.iter(|| {
            let out = black_box(&a).matmul(black_box(&b)).unwrap();
            black_box(out);
        })
    });
}

criterion_group!(benches, feed_forward_bench, backprop_bench, matmul_bench);
criterion_main!(benches);
