use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opusgate::{Encoder, EncoderSettings};
use opusgate_bridge::encoder::{bridge_encoder_get_bitrate, bridge_encoder_set_bitrate};

fn bench_bridge_bitrate(c: &mut Criterion) {
    let enc = Encoder::new_voip(48000, 1).unwrap();
    let h = enc.handle();

    c.bench_function("bridge_set_get_bitrate", |b| {
        b.iter(|| {
            let mut out = 0;
            unsafe {
                bridge_encoder_set_bitrate(h, black_box(64000));
                bridge_encoder_get_bitrate(h, &mut out);
            }
            black_box(out)
        });
    });
}

fn bench_settings_capture(c: &mut Criterion) {
    let enc = Encoder::new_voip(48000, 1).unwrap();

    c.bench_function("settings_capture", |b| {
        b.iter(|| black_box(EncoderSettings::capture(&enc).unwrap()));
    });
}

fn bench_encode_20ms(c: &mut Criterion) {
    let mut enc = Encoder::new_voip(16000, 1).unwrap();
    let pcm: Vec<i16> = (0..320).map(|i| ((i as f32 * 0.1).sin() * 8000.0) as i16).collect();
    let mut buf = vec![0u8; 4000];

    c.bench_function("encode_20ms_16k", |b| {
        b.iter(|| enc.encode(black_box(&pcm), &mut buf).unwrap());
    });
}

criterion_group!(benches, bench_bridge_bitrate, bench_settings_capture, bench_encode_20ms);
criterion_main!(benches);
