//! Frame sink contract tests that do not require `ffmpeg`.

use image::RgbImage;

use trailreel::{
    encode_frames, FfmpegSink, FfmpegSinkOpts, FrameIndex, FrameSink, InMemorySink, SinkConfig,
};

#[test]
fn in_memory_sink_captures_config_and_order() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 8,
        height: 6,
        fps: 15,
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &RgbImage::new(8, 6)).unwrap();
    sink.push_frame(FrameIndex(1), &RgbImage::new(8, 6)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config().unwrap().fps, 15);
}

#[test]
fn begin_clears_previous_frames() {
    let mut sink = InMemorySink::new();
    let cfg = SinkConfig {
        width: 4,
        height: 4,
        fps: 10,
    };
    sink.begin(cfg).unwrap();
    sink.push_frame(FrameIndex(0), &RgbImage::new(4, 4)).unwrap();
    sink.begin(cfg).unwrap();
    assert!(sink.frames().is_empty());
}

#[test]
fn encode_frames_indexes_from_zero() {
    let frames = vec![RgbImage::new(4, 4); 3];
    let mut sink = InMemorySink::new();
    encode_frames(&frames, 30, &mut sink).unwrap();
    let idxs: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idxs, vec![0, 1, 2]);
}

#[test]
fn ffmpeg_sink_validates_before_spawning() {
    // All of these fail in `begin` before any process is spawned, so
    // they hold with or without ffmpeg installed.
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("/tmp/trailreel_sink_test.mp4"));
    assert!(sink
        .begin(SinkConfig {
            width: 51,
            height: 50,
            fps: 30,
        })
        .is_err());
    assert!(sink
        .begin(SinkConfig {
            width: 50,
            height: 50,
            fps: 0,
        })
        .is_err());
    assert!(sink
        .begin(SinkConfig {
            width: 0,
            height: 50,
            fps: 30,
        })
        .is_err());

    // Pushing without a successful begin is an error, not a hang.
    assert!(sink
        .push_frame(FrameIndex(0), &RgbImage::new(50, 50))
        .is_err());
}

#[test]
fn ffmpeg_sink_respects_overwrite_flag() {
    let dir = std::env::temp_dir().join("trailreel_sink_overwrite_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("existing.mp4");
    std::fs::write(&path, b"placeholder").unwrap();

    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: path.clone(),
        overwrite: false,
    });
    let err = sink.begin(SinkConfig {
        width: 50,
        height: 50,
        fps: 30,
    });
    assert!(err.is_err());

    std::fs::remove_file(&path).ok();
}
