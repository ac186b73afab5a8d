use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mic_visualizer::analysis::MetricsSnapshot;
use mic_visualizer::spectrum::ByteAnalyser;
use mic_visualizer::AnalyzerConfig;
use std::f64::consts::PI;

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyse_frame");

    for &window_size in &[1024usize, 2048, 8192] {
        let config = AnalyzerConfig {
            window_size,
            ..Default::default()
        };
        let mut analyser = ByteAnalyser::new(config).expect("valid config");
        let tone: Vec<f32> = (0..window_size)
            .map(|n| (0.5 * (2.0 * PI * 440.0 * n as f64 / 48000.0).sin()) as f32)
            .collect();
        let mut time_domain = vec![0u8; window_size];
        let mut bins = vec![0u8; window_size / 2];

        group.bench_with_input(BenchmarkId::from_parameter(window_size), &window_size, |b, &n| {
            b.iter(|| {
                analyser.push_samples(black_box(&tone[..n / 4]));
                analyser.byte_time_domain_data(&mut time_domain);
                analyser.byte_frequency_data(&mut bins);
                black_box(MetricsSnapshot::from_frame(&time_domain, &bins, 48000.0, n))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
