use super::*;
use crate::audio::analyser::BIN_COUNT;
use crate::clock::time_source::ManualTime;

fn tone(sample_rate: u32, seconds: f32, hz: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * seconds) as usize;
    (0..n)
        .map(|i| (2.0 * std::f32::consts::PI * hz * i as f32 / sample_rate as f32).sin() * 0.8)
        .collect()
}

#[test]
fn play_pause_tracks_position() {
    let time = ManualTime::new(0.0);
    let mut src =
        PcmSpectrumSource::with_time_source(vec![0.0; 4800], 48_000, Box::new(time.clone())).unwrap();
    assert!(!src.is_playing());
    src.play();
    time.advance(40.0);
    assert_eq!(src.position_ms(), 40.0);
    src.pause();
    time.advance(100.0);
    assert_eq!(src.position_ms(), 40.0);
    assert!(src.toggle());
    src.seek_ms(10.0);
    time.advance(5.0);
    assert_eq!(src.position_ms(), 15.0);
    assert_eq!(src.duration_ms(), 100.0);
}

#[test]
fn tone_produces_energy_when_playing() {
    let sample_rate = 8_000;
    let mut src = PcmSpectrumSource::with_time_source(
        tone(sample_rate, 1.0, 250.0),
        sample_rate,
        Box::new(ManualTime::new(0.0)),
    )
    .unwrap();
    src.play();
    src.seek_ms(500.0);
    let mut out = [0u8; BIN_COUNT];
    for _ in 0..10 {
        src.frequency_bytes(&mut out);
    }
    // 250 Hz at 8 kHz with a 256-point FFT lands in bin 8.
    assert!(out[8] > 150, "bin 8 = {}", out[8]);
}

#[test]
fn fork_is_independent_and_seek_driven() {
    let time = ManualTime::new(0.0);
    let mut live = PcmSpectrumSource::with_time_source(
        tone(8_000, 1.0, 250.0),
        8_000,
        Box::new(time.clone()),
    )
    .unwrap();
    live.seek_ms(300.0);
    let mut warm = [0u8; BIN_COUNT];
    live.frequency_bytes(&mut warm);

    let mut a = live.fork().unwrap();
    let mut b = live.fork().unwrap();
    assert!(a.is_playing());

    time.advance(250.0);
    a.seek_ms(120.0);
    b.seek_ms(120.0);
    let mut out_a = [0u8; BIN_COUNT];
    let mut out_b = [0u8; BIN_COUNT];
    a.frequency_bytes(&mut out_a);
    b.frequency_bytes(&mut out_b);
    assert_eq!(out_a, out_b);

    assert_eq!(live.position_ms(), 300.0);
    assert!(!live.is_playing());
}

#[test]
fn rejects_empty_or_zero_rate() {
    assert!(PcmSpectrumSource::new(Vec::new(), 48_000).is_err());
    assert!(PcmSpectrumSource::new(vec![0.0], 0).is_err());
}

#[test]
fn read_f32le_downmixes_stereo() {
    let dir = std::env::temp_dir().join(format!("loopbrush-pcm-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("stereo.f32le");
    let mut bytes = Vec::new();
    for v in [1.0f32, 0.0, 0.5, 0.5] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    std::fs::write(&path, &bytes).unwrap();

    assert_eq!(read_f32le_pcm(&path, 2).unwrap(), vec![0.5, 0.5]);
    assert_eq!(read_f32le_pcm(&path, 1).unwrap().len(), 4);
    assert!(read_f32le_pcm(&path, 0).is_err());

    std::fs::write(&path, [0u8; 3]).unwrap();
    assert!(read_f32le_pcm(&path, 1).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}
