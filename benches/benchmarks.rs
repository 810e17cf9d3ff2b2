// benches/benchmarks.rs -- Per-stage and full-chain benchmarks.
//
//   cargo bench
//
// All inputs are synthetic 752×480 scenes (EuRoC frame size), so the
// numbers are comparable across kernels and pixel types.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use edgeconv::border::pad_replicate;
use edgeconv::chain::{FilterChain, FilterStage};
use edgeconv::convolution::{convolve, convolve_raw};
use edgeconv::image::{Image, Rgb};
use edgeconv::kernel::Kernel;
use edgeconv::rescale::{rescale, RescaleMode};

// ============================================================
// Helpers
// ============================================================

/// Synthetic scene: smooth gradient plus a few bright rectangles.
fn make_scene(w: usize, h: usize) -> Image<u8> {
    let mut img = Image::new(w, h);
    for y in 0..h {
        for x in 0..w {
            img.set(x, y, ((x * 200 / w) + (y * 55 / h)) as u8);
        }
    }
    for rect in 0..6 {
        let rx = (50 + rect * 100) % w;
        let ry = (40 + (rect % 3) * 120) % h;
        for y in ry..(ry + 60).min(h) {
            for x in rx..(rx + 80).min(w) {
                img.set(x, y, 180 + rect as u8 * 10);
            }
        }
    }
    img
}

fn sharpening() -> Kernel {
    Kernel::from_array([
        [-2.0, -2.0, -2.0],
        [-2.0, 29.0, -2.0],
        [-2.0, -2.0, -2.0],
    ])
    .unwrap()
}

fn laplacian() -> Kernel {
    Kernel::from_array([
        [0.0, 1.0, 0.0],
        [1.0, -4.0, 1.0],
        [0.0, 1.0, 0.0],
    ])
    .unwrap()
}

// ============================================================
// Per-stage benchmarks
// ============================================================

fn bench_pad(c: &mut Criterion) {
    let img = make_scene(752, 480);

    let mut group = c.benchmark_group("pad");
    for pad in [1usize, 3] {
        group.bench_with_input(BenchmarkId::new("replicate", pad), &pad, |b, &pad| {
            b.iter(|| pad_replicate(&img, pad).unwrap())
        });
    }
    group.finish();
}

fn bench_convolve(c: &mut Criterion) {
    let img = make_scene(752, 480);
    let rgb: Image<Rgb> = img.map(|v| [v, v / 2, 255 - v]);

    let mut group = c.benchmark_group("convolve");
    for side in [3usize, 5, 7] {
        let k = Kernel::new(side, vec![1.0 / (side * side) as f32; side * side]).unwrap();
        group.bench_with_input(BenchmarkId::new("u8_752x480", side), &k, |b, k| {
            b.iter(|| convolve_raw(&img, k, 128.0).unwrap())
        });
    }
    group.bench_function("rgb_752x480_sharpen", |b| {
        let k = sharpening();
        b.iter(|| convolve(&rgb, &k, 255.0).unwrap())
    });
    group.finish();
}

fn bench_rescale(c: &mut Criterion) {
    let raw = convolve_raw(&make_scene(752, 480), &laplacian(), f32::MAX)
        .unwrap()
        .output;

    let mut group = c.benchmark_group("rescale");
    for (name, mode) in [("fixed", RescaleMode::default()), ("adaptive", RescaleMode::Adaptive)] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || raw.clone(),
                |mut g| rescale(&mut g, mode).unwrap(),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

// ============================================================
// Full chain
// ============================================================

fn bench_chain(c: &mut Criterion) {
    let img = make_scene(752, 480);
    let chain = FilterChain::new(vec![
        FilterStage::new(sharpening(), 255.0),
        FilterStage::new(laplacian(), 200.0),
    ])
    .unwrap();

    c.bench_function("chain_sharpen_laplacian_752x480", |b| {
        b.iter(|| chain.run(&img).unwrap())
    });
}

// ============================================================
// Register
// ============================================================

criterion_group!(benches, bench_pad, bench_convolve, bench_rescale, bench_chain);
criterion_main!(benches);
