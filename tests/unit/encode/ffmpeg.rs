use super::*;

const LISTING: &str = "\
Encoders:
 V..... = Video
 A..... = Audio
 ------
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC (codec h264)
 V.S... mpeg4                MPEG-4 part 2
 A....D aac                  AAC (Advanced Audio Coding)
";

#[test]
fn encoder_listing_is_parsed_by_name() {
    assert!(encoder_listed(LISTING, "mpeg4"));
    assert!(encoder_listed(LISTING, "libx264"));
    assert!(!encoder_listed(LISTING, "aac"));
    assert!(!encoder_listed(LISTING, "libx265"));
    assert!(!encoder_listed(LISTING, "="));
}

#[test]
fn codec_maps_to_ffmpeg_encoder() {
    assert_eq!(VideoCodec::default(), VideoCodec::Mpeg4);
    assert_eq!(VideoCodec::Mpeg4.encoder_name(), "mpeg4");
    assert_eq!(VideoCodec::H264.encoder_name(), "libx264");
}

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::default(),
        total_frames: 1,
    }
}

#[test]
fn begin_rejects_odd_or_empty_dimensions() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/odd.mp4"));
    assert!(sink.begin(cfg(11, 10)).is_err());
    assert!(sink.begin(cfg(0, 10)).is_err());
}

#[test]
fn push_before_begin_is_an_encoder_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/unstarted.mp4"));
    let err = sink
        .push_frame(FrameIndex(0), &RgbFrame::solid(2, 2, [0, 0, 0]))
        .unwrap_err();
    assert!(matches!(err, MorphError::Encoder(_)));
}

#[test]
fn begin_refuses_existing_output_without_overwrite() {
    let path = PathBuf::from("target/unit_ffmpeg/existing.mp4");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"keep me").unwrap();

    let mut opts = FfmpegSinkOpts::new(&path);
    opts.overwrite = false;
    let mut sink = FfmpegSink::new(opts);
    assert!(sink.begin(cfg(2, 2)).is_err());
    drop(sink);
    assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
}
