use std::io::BufReader;

use image::{AnimationDecoder as _, codecs::gif::GifDecoder};

use super::*;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: rgba.repeat((width * height) as usize),
        premultiplied: true,
    }
}

fn cfg(frames: u64, loop_mode: LoopMode) -> SinkConfig {
    SinkConfig {
        width: 8,
        height: 6,
        frame_delay_ms: 100,
        loop_mode,
        total_frames: frames,
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_encode_gif");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

/// Loop count stored in the NETSCAPE2.0 application extension, if present.
fn netscape_loops(bytes: &[u8]) -> Option<u16> {
    let tag = b"NETSCAPE2.0";
    let at = bytes.windows(tag.len()).position(|w| w == tag)?;
    let sub = &bytes[at + tag.len()..];
    // sub-block: size 3, id 1, loop count (u16 le)
    (sub.len() >= 4 && sub[0] == 3 && sub[1] == 1).then(|| u16::from_le_bytes([sub[2], sub[3]]))
}

#[test]
fn writes_every_frame_with_delay_and_infinite_loop() {
    let path = scratch("three.gif");
    let mut sink = GifSink::new(GifSinkOpts::new(&path));
    sink.begin(cfg(3, LoopMode::Infinite)).unwrap();
    for (i, color) in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]
        .into_iter()
        .enumerate()
    {
        sink.push_frame(FrameIndex(i as u64), &solid(8, 6, color))
            .unwrap();
    }
    sink.end().unwrap();
    assert_eq!(sink.frames_written(), 3);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(netscape_loops(&bytes), Some(0));

    let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 3);
    for f in &frames {
        assert_eq!(f.delay().numer_denom_ms(), (100, 1));
        assert_eq!(f.buffer().dimensions(), (8, 6));
    }
    let first = frames[0].buffer().get_pixel(4, 3).0;
    assert!(first[0] > 200 && first[1] < 50 && first[2] < 50, "{first:?}");
}

#[test]
fn finite_loop_count_is_recorded() {
    let path = scratch("finite.gif");
    let mut sink = GifSink::new(GifSinkOpts::new(&path));
    sink.begin(cfg(1, LoopMode::Finite(3))).unwrap();
    sink.push_frame(FrameIndex(0), &solid(8, 6, [0, 0, 0, 255]))
        .unwrap();
    sink.end().unwrap();

    assert_eq!(netscape_loops(&std::fs::read(&path).unwrap()), Some(3));
}

#[test]
fn rejects_misuse() {
    let path = scratch("misuse.gif");
    let mut sink = GifSink::new(GifSinkOpts::new(&path));

    assert!(
        sink.push_frame(FrameIndex(0), &solid(8, 6, [0, 0, 0, 255]))
            .is_err()
    );
    assert!(sink.end().is_err());

    sink.begin(cfg(2, LoopMode::Infinite)).unwrap();
    assert!(sink.begin(cfg(2, LoopMode::Infinite)).is_err());
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &solid(4, 4, [0, 0, 0, 255])),
        Err(BarRaceError::Validation(_))
    ));
    assert!(
        sink.push_frame(FrameIndex(1), &solid(8, 6, [0, 0, 0, 255]))
            .is_err()
    );
    sink.push_frame(FrameIndex(0), &solid(8, 6, [0, 0, 0, 255]))
        .unwrap();
    sink.end().unwrap();
    assert!(
        sink.push_frame(FrameIndex(1), &solid(8, 6, [0, 0, 0, 255]))
            .is_err()
    );
}

#[test]
fn refuses_to_overwrite_when_asked() {
    let path = scratch("keep.gif");
    std::fs::write(&path, b"existing").unwrap();

    let mut opts = GifSinkOpts::new(&path);
    opts.overwrite = false;
    let mut sink = GifSink::new(opts);
    assert!(sink.begin(cfg(1, LoopMode::Infinite)).is_err());
    assert_eq!(std::fs::read(&path).unwrap(), b"existing");
}

#[test]
fn creates_missing_parent_directories() {
    let dir = PathBuf::from("target").join("unit_encode_gif").join("nested_out");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("a").join("b.gif");

    let mut sink = GifSink::new(GifSinkOpts::new(&path));
    sink.begin(cfg(1, LoopMode::Infinite)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(8, 6, [9, 9, 9, 255]))
        .unwrap();
    sink.end().unwrap();
    assert!(path.is_file());
}

#[test]
fn flatten_premul_over_white() {
    // Premultiplied red @ 50% alpha over white.
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, vec![255u8, 127, 127, 255]);
}

#[test]
fn flatten_straight_over_black() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128u8, 0, 0, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], true, [0, 0, 0, 255]).is_err());
}

#[cfg(target_os = "linux")]
#[test]
fn failed_writes_surface_as_errors() {
    let path = PathBuf::from("/dev/full");
    if !path.exists() {
        return;
    }
    let mut sink = GifSink::new(GifSinkOpts::new(&path));
    sink.begin(cfg(1, LoopMode::Infinite)).unwrap();
    let pushed = sink.push_frame(FrameIndex(0), &solid(8, 6, [10, 20, 30, 255]));
    let ended = sink.end();
    assert!(
        pushed.is_err() || ended.is_err(),
        "writing to a full device must fail: push={pushed:?} end={ended:?}"
    );
    if let Err(err) = ended {
        assert!(matches!(err, BarRaceError::Encode(_)), "{err}");
    }
}
