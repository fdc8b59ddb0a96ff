use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn premultiply_scales_colour_by_alpha() {
    assert_eq!(premultiply(&[255, 128, 0, 128]), vec![128, 64, 0, 128]);
}

#[test]
fn container_follows_extension() {
    assert_eq!(Container::from_path(Path::new("out/loop.MP4")).unwrap(), Container::Mp4);
    assert_eq!(Container::from_path(Path::new("loop.webm")).unwrap(), Container::WebM);
    assert!(matches!(
        Container::from_path(Path::new("loop.gif")),
        Err(LoopError::Unsupported(_))
    ));
}

#[test]
fn begin_validates_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("loop.mp4"));
    let cfg = SinkConfig {
        width: 641,
        height: 640,
        fps: Fps { num: 30, den: 1 },
        audio: None,
    };
    assert!(matches!(sink.begin(cfg), Err(LoopError::Validation(_))));
    assert!(sink.end().is_err());
}
