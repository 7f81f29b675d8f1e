use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gravmon_core::MovingAverage;

// Generate a synthetic trace: sine with additive white noise
fn synth_trace(n: usize, noise_amp: f64, seed: u32) -> Vec<f64> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_unit = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    let mut v = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / 200.0;
        let noise = (next_unit() * 2.0 - 1.0) * noise_amp;
        v.push(t.sin() + noise);
    }
    v
}

pub fn bench_moving_average(c: &mut Criterion) {
    let mut g = c.benchmark_group("moving_average");
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(10));
        }
    } else {
        g.sample_size(50);
    }

    let trace = synth_trace(50_000, 0.02, 0xC0FFEE);

    for &window in &[0usize, 3, 8, 32] {
        g.bench_function(format!("window_{window}"), |b| {
            b.iter(|| {
                let mut filter = MovingAverage::new(window);
                let mut acc = 0.0;
                for &v in &trace {
                    acc += filter.filter(black_box(v));
                }
                black_box(acc)
            })
        });
    }
    g.finish();
}

criterion_group!(benches, bench_moving_average);
criterion_main!(benches);
