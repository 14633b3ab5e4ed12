use criterion::{Criterion, criterion_group, criterion_main};
use duosweeper_core::*;
use std::hint::black_box;

fn generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, preset) in Preset::ALL {
        let mut generator = RandomLayoutGenerator::new(0);
        group.bench_function(name, |b| b.iter(|| generator.generate(black_box(&preset))));
    }
    group.finish();
}

fn flood_fill(c: &mut Criterion) {
    let layout = BoardLayout::from_coords((255, 255), &[(0, 0)], &[], &[]).unwrap();
    c.bench_function("flood_fill/255x255", |b| {
        b.iter_batched(
            || Board::new(layout.clone()),
            |mut board| board.reveal(black_box((254, 254))),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, generate, flood_fill);
criterion_main!(benches);
