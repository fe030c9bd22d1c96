use criterion::{black_box, criterion_group, criterion_main, Criterion};
use traitqa_parse::{normalize, resolve};
use traitqa_units::TraitKind;

const ANSWERS: [&str; 5] = [
    "20-37 cm",
    "1.8 m",
    "20-40x10-30 mm",
    "3-6 (-8) x 1-2 cm",
    "leaves up to 12 inches long",
];

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_and_resolve", |b| {
        b.iter(|| {
            for answer in ANSWERS {
                for kind in TraitKind::ALL {
                    black_box(resolve(&normalize(black_box(answer), kind)));
                }
            }
        });
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
