//! Prime and order field arithmetic benchmarks.

use criterion::measurement::Measurement;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, Criterion};
use hex_literal::hex;
use sm2p256::{FieldElement, Scalar};

fn test_field_element_x() -> FieldElement {
    FieldElement::from_bytes(&hex!(
        "128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263"
    ))
    .unwrap()
}

fn test_field_element_y() -> FieldElement {
    FieldElement::from_bytes(&hex!(
        "d4f94f92fa8a7d56bfbdd7c4c3c3c93f8ed0724cf0f8d2f2096e1eed74c9b9d1"
    ))
    .unwrap()
}

fn bench_field_mul<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x();
    let y = test_field_element_y();
    group.bench_function("mul", |b| b.iter(|| &x * &y));
}

fn bench_field_square<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x();
    group.bench_function("square", |b| b.iter(|| x.square()));
}

fn bench_field_invert<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x();
    group.bench_function("invert", |b| b.iter(|| x.invert()));
}

fn bench_field_sqrt<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_field_element_x().square();
    group.bench_function("sqrt", |b| b.iter(|| x.sqrt()));
}

fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("field element operations");
    bench_field_mul(&mut group);
    bench_field_square(&mut group);
    bench_field_invert(&mut group);
    bench_field_sqrt(&mut group);
    group.finish();
}

fn test_scalar_x() -> Scalar {
    Scalar::from_bytes(&hex!(
        "128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263"
    ))
    .unwrap()
}

fn test_scalar_y() -> Scalar {
    Scalar::from_bytes(&hex!(
        "d4f94f92fa8a7d56bfbdd7c4c3c3c93f8ed0724cf0f8d2f2096e1eed74c9b9d1"
    ))
    .unwrap()
}

fn bench_scalar_add<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_scalar_x();
    let y = test_scalar_y();
    group.bench_function("add", |b| b.iter(|| &x + &y));
}

fn bench_scalar_mul<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_scalar_x();
    let y = test_scalar_y();
    group.bench_function("mul", |b| b.iter(|| &x * &y));
}

fn bench_scalar_negate<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_scalar_x();
    group.bench_function("negate", |b| b.iter(|| -x));
}

fn bench_scalar_invert<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let x = test_scalar_x();
    group.bench_function("invert", |b| b.iter(|| x.invert()));
}

fn bench_scalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar operations");
    bench_scalar_add(&mut group);
    bench_scalar_mul(&mut group);
    bench_scalar_negate(&mut group);
    bench_scalar_invert(&mut group);
    group.finish();
}

criterion_group!(benches, bench_field, bench_scalar);
criterion_main!(benches);
