mod common;

use std::path::PathBuf;

use tempfile::TempDir;

use vidtensor::{
    Error, FilterConfig, Frame, OpenStage, PixelFormat, Rational, Session, pack_bytes, pack_floats,
};

use common::{Chroma, Clip, FPS, cb, cr, luma, write_mpeg4, write_y4m};

const FRAME_SECONDS: f64 = 1.0 / FPS as f64;

fn open_clip(dir: &TempDir, name: &str, clip: Clip) -> Session {
    let path = write_y4m(dir.path(), name, clip);
    Session::open(path).unwrap()
}

// Keyframe interval of encoded clips, 0.48s at 25 fps
const GOP: u32 = 12;

fn encoded_clip(dir: &TempDir, name: &str) -> PathBuf {
    write_mpeg4(dir.path(), name, Clip::new(64, 48, 60, Chroma::C420), GOP)
}

fn decode_all(session: &mut Session) -> Vec<Frame> {
    std::iter::from_fn(|| session.next_frame().unwrap()).collect()
}

fn seconds(session: &mut Session) -> Option<f64> {
    session
        .next_frame()
        .unwrap()
        .map(|frame| frame.seconds().unwrap())
}

#[test]
fn yuv420_stream_ends_after_last_frame() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "a.y4m", Clip::new(64, 48, 250, Chroma::C420));

    assert_eq!((session.width().unwrap(), session.height().unwrap()), (64, 48));
    assert!((session.frame_rate().unwrap() - 25.0).abs() < 1e-9);
    let duration = session.duration().unwrap();
    assert!(duration == 0.0 || (duration - 10.0).abs() < 0.5, "{duration}");
    let count = session.frame_count().unwrap();
    assert!(count == 0 || count == 250, "{count}");

    for index in 0..250 {
        let frame = session.next_frame().unwrap().unwrap();
        assert_eq!(frame.format, PixelFormat::Yuv420p);
        assert_eq!(frame.timestamp().map(|ts| ts.0), Some(index));
    }
    assert!(session.next_frame().unwrap().is_none());
    assert!(session.next_frame().unwrap().is_none());
}

#[test]
fn decoded_samples_are_bit_exact() {
    let dir = TempDir::new().unwrap();
    for chroma in [Chroma::C420, Chroma::C422, Chroma::C444] {
        let (width, height) = (16, 8);
        let mut session = open_clip(&dir, "exact.y4m", Clip::new(width, height, 3, chroma));
        session.next_frame().unwrap().unwrap();
        let frame = session.next_frame().unwrap().unwrap();
        let packed = pack_bytes(&frame).unwrap();
        assert_eq!(packed.shape(), [3, height, width]);

        let (sx, sy) = chroma.shifts();
        for y in 0..height {
            for x in 0..width {
                let at = y * width + x;
                assert_eq!(packed.channel(0)[at], luma(1, x, y), "{chroma:?}");
                assert_eq!(packed.channel(1)[at], cb(1, x >> sx, y >> sy), "{chroma:?}");
                assert_eq!(packed.channel(2)[at], cr(1, x >> sx, y >> sy), "{chroma:?}");
            }
        }
    }
}

#[test]
fn mono_packs_one_channel() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "mono.y4m", Clip::new(10, 6, 2, Chroma::Mono));
    let frame = session.next_frame().unwrap().unwrap();
    assert_eq!(frame.format, PixelFormat::Gray8);

    let packed = pack_bytes(&frame).unwrap();
    assert_eq!(packed.shape(), [1, 6, 10]);
    assert_eq!(packed.data[10 + 3], luma(0, 3, 1));

    let floats = pack_floats(&frame).unwrap();
    assert!(floats.data.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn rgb_filter_packs_three_planes() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "b.y4m", Clip::new(64, 48, 5, Chroma::C444));
    let mut session = session
        .attach_filter(FilterConfig::new("rgb24"))
        .unwrap();

    let frame = session.next_frame().unwrap().unwrap();
    assert_eq!(frame.format, PixelFormat::Rgb24);
    assert_eq!(frame.time_base, Rational::new(1, 25));

    let bytes = pack_bytes(&frame).unwrap();
    assert_eq!(bytes.shape(), [3, 48, 64]);
    assert_eq!(bytes.data.len(), 3 * 48 * 64);

    let floats = pack_floats(&frame).unwrap();
    assert_eq!(floats.data.len(), 3 * 48 * 64);
    assert!(floats.data.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn yuv_floats_centre_chroma() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "f.y4m", Clip::new(32, 16, 1, Chroma::C420));
    let frame = session.next_frame().unwrap().unwrap();
    let floats = pack_floats(&frame).unwrap();
    assert!(floats.channel(0).iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(floats.channel(1).iter().all(|v| (-1.0..=1.0).contains(v)));
    assert_eq!(floats.channel(1)[0], f32::from(cb(0, 0, 0)) / 128.0 - 1.0);
}

#[test]
fn second_attach_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut original = open_clip(&dir, "c.y4m", Clip::new(32, 16, 10, Chroma::C420));
    let mut filtered = original
        .attach_filter(FilterConfig::new("gray"))
        .unwrap();

    assert!(!original.is_open());
    assert!(matches!(original.next_frame(), Err(Error::SessionMoved)));
    assert!(matches!(original.duration(), Err(Error::SessionMoved)));
    assert!(matches!(
        original.attach_filter(FilterConfig::new("gray")),
        Err(Error::SessionMoved)
    ));

    assert!(matches!(
        filtered.attach_filter(FilterConfig::new("rgb24")),
        Err(Error::AlreadyAttached)
    ));
    let frame = filtered.next_frame().unwrap().unwrap();
    assert_eq!(frame.format, PixelFormat::Gray8);
    original.close();
    assert!(filtered.next_frame().unwrap().is_some());
}

#[test]
fn failed_attach_leaves_session_usable() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "bad.y4m", Clip::new(32, 16, 4, Chroma::C420));

    let err = session
        .attach_filter(FilterConfig::new("not_a_pixel_format"))
        .unwrap_err();
    assert!(matches!(err, Error::FilterConfig { .. }));

    let err = session
        .attach_filter(FilterConfig::new("rgb24").with_chain("no_such_filter"))
        .unwrap_err();
    match err {
        Error::FilterConfig { chain, .. } => assert_eq!(chain, "no_such_filter"),
        other => panic!("unexpected error: {other}"),
    }

    assert!(session.is_open());
    assert!(!session.has_filter().unwrap());
    let frame = session.next_frame().unwrap().unwrap();
    assert_eq!(frame.format, PixelFormat::Yuv420p);
}

#[test]
fn seek_lands_on_first_frame_at_target() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "d.y4m", Clip::new(32, 16, 250, Chroma::C422));
    session.seek(5.0).unwrap();

    let frame = session.next_frame().unwrap().unwrap();
    assert_eq!(frame.format, PixelFormat::Yuv422p);
    let t = frame.seconds().unwrap();
    assert!((5.0..5.0 + FRAME_SECONDS).contains(&t), "{t}");
    assert_eq!(frame.timestamp().map(|ts| ts.0), Some(125));

    // Decoding carries on from there
    assert_eq!(
        session.next_frame().unwrap().unwrap().timestamp().map(|ts| ts.0),
        Some(126)
    );
}

#[test]
fn seek_between_frames_rounds_up() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "between.y4m", Clip::new(32, 16, 100, Chroma::C420));
    session.seek(2.01).unwrap();
    let t = seconds(&mut session).unwrap();
    assert!((t - 2.04).abs() < 1e-9, "{t}");
}

#[test]
fn repeated_seek_matches_single_seek() {
    let dir = TempDir::new().unwrap();
    let path = write_y4m(dir.path(), "twice.y4m", Clip::new(32, 16, 100, Chroma::C420));

    let mut once = Session::open(&path).unwrap();
    once.seek(1.5).unwrap();
    let mut twice = Session::open(&path).unwrap();
    twice.seek(1.5).unwrap();
    twice.seek(1.5).unwrap();

    let a = once.next_frame().unwrap().unwrap();
    let b = twice.next_frame().unwrap().unwrap();
    assert_eq!(a.timestamp(), b.timestamp());
    assert_eq!(a.planes, b.planes);
}

#[test]
fn seek_backwards_after_end_of_stream() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "back.y4m", Clip::new(32, 16, 30, Chroma::C420));
    while session.next_frame().unwrap().is_some() {}

    session.seek(0.4).unwrap();
    assert_eq!(seconds(&mut session), Some(0.4));
    session.seek(0.0).unwrap();
    assert_eq!(seconds(&mut session), Some(0.0));
}

#[test]
fn seek_past_end_is_end_of_stream() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "past.y4m", Clip::new(32, 16, 25, Chroma::C420));
    session.seek(30.0).unwrap();
    assert!(session.next_frame().unwrap().is_none());
    assert!(session.next_frame().unwrap().is_none());
}

#[test]
fn negative_seek_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "neg.y4m", Clip::new(32, 16, 5, Chroma::C420));
    let err = session.seek(-1.0).unwrap_err();
    assert!(matches!(err, Error::Seek { seconds, .. } if seconds == -1.0));
    assert_eq!(seconds(&mut session), Some(0.0));
}

#[test]
fn filtered_seek_pushes_matching_frame() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "fseek.y4m", Clip::new(32, 16, 100, Chroma::C420));
    let mut session = session
        .attach_filter(FilterConfig::new("rgb24"))
        .unwrap();
    session.next_frame().unwrap().unwrap();

    session.seek(2.0).unwrap();
    let frame = session.next_frame().unwrap().unwrap();
    assert_eq!(frame.format, PixelFormat::Rgb24);
    assert_eq!(frame.seconds(), Some(2.0));
}

#[test]
fn seek_between_keyframes_matches_sequential_decode() {
    let dir = TempDir::new().unwrap();
    let path = encoded_clip(&dir, "gop.mkv");
    let frames = decode_all(&mut Session::open(&path).unwrap());
    assert_eq!(frames.len(), 60);

    let mut session = Session::open(&path).unwrap();
    session.next_frame().unwrap().unwrap();
    // Forward, backward, exact and near-start targets, none on a keyframe
    for (target, index) in [(1.3, 33), (0.85, 22), (2.0, 50), (0.1, 3)] {
        session.seek(target).unwrap();
        let frame = session.next_frame().unwrap().unwrap();
        let t = frame.seconds().unwrap();
        assert!((t - index as f64 * FRAME_SECONDS).abs() < 1e-9, "{target}: {t}");
        assert_eq!(frame.planes, frames[index].planes, "{target}");

        let next = session.next_frame().unwrap().unwrap();
        assert_eq!(next.planes, frames[index + 1].planes, "{target}");
    }
}

#[test]
fn filtered_seek_between_keyframes() {
    let dir = TempDir::new().unwrap();
    let path = encoded_clip(&dir, "fgop.mkv");
    let rgb = || {
        Session::open(&path)
            .unwrap()
            .attach_filter(FilterConfig::new("rgb24"))
            .unwrap()
    };
    let frames = decode_all(&mut rgb());
    assert_eq!(frames.len(), 60);

    let mut session = rgb();
    for (target, index) in [(1.3, 33), (0.5, 13), (2.3, 58)] {
        session.seek(target).unwrap();
        let frame = session.next_frame().unwrap().unwrap();
        assert_eq!(frame.format, PixelFormat::Rgb24);
        let t = frame.seconds().unwrap();
        assert!((t - index as f64 * FRAME_SECONDS).abs() < 1e-9, "{target}: {t}");
        assert_eq!(frame.planes, frames[index].planes, "{target}");
    }
}

#[test]
fn vertically_flipped_frames_are_copied_top_row_first() {
    let dir = TempDir::new().unwrap();
    let (width, height) = (16, 8);
    let mut session = open_clip(&dir, "flip.y4m", Clip::new(width, height, 2, Chroma::C420));
    let mut session = session
        .attach_filter(FilterConfig::new("yuv420p").with_chain("vflip"))
        .unwrap();

    for index in 0..2 {
        let frame = session.next_frame().unwrap().unwrap();
        assert_eq!(frame.format, PixelFormat::Yuv420p);
        let packed = pack_bytes(&frame).unwrap();
        let last_chroma_row = height / 2 - 1;
        for y in 0..height {
            for x in 0..width {
                let at = y * width + x;
                assert_eq!(packed.channel(0)[at], luma(index, x, height - 1 - y));
                assert_eq!(
                    packed.channel(1)[at],
                    cb(index, x >> 1, last_chroma_row - (y >> 1))
                );
                assert_eq!(
                    packed.channel(2)[at],
                    cr(index, x >> 1, last_chroma_row - (y >> 1))
                );
            }
        }
    }
}

#[test]
fn rate_reducing_filter() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "fps.y4m", Clip::new(32, 16, 250, Chroma::C420));
    let mut session = session
        .attach_filter(FilterConfig::new("yuv420p").with_chain("fps=5"))
        .unwrap();

    let mut count = 0;
    while let Some(frame) = session.next_frame().unwrap() {
        assert_eq!(frame.time_base, Rational::new(1, 5));
        count += 1;
    }
    // Frames still held by the filter at end of stream are not emitted
    assert!((40..=50).contains(&count), "{count}");
}

#[test]
fn scale_filter_changes_shape() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "scale.y4m", Clip::new(64, 48, 3, Chroma::C420));
    let mut session = session
        .attach_filter(FilterConfig::new("gray").with_chain("scale=32:24"))
        .unwrap();
    let frame = session.next_frame().unwrap().unwrap();
    assert_eq!(pack_bytes(&frame).unwrap().shape(), [1, 24, 32]);
}

#[test]
fn closed_session_rejects_calls() {
    let dir = TempDir::new().unwrap();
    let mut session = open_clip(&dir, "close.y4m", Clip::new(32, 16, 3, Chroma::C420));
    session.close();
    session.close();
    assert!(!session.is_open());
    assert!(matches!(session.next_frame(), Err(Error::SessionClosed)));
    assert!(matches!(session.seek(0.0), Err(Error::SessionClosed)));
    assert!(session.frame_rate().unwrap_err().is_session_state());
}

#[test]
fn missing_file_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let err = Session::open(dir.path().join("missing.mp4")).unwrap_err();
    match err {
        Error::Open { stage, path, .. } => {
            assert_eq!(stage, OpenStage::OpenContainer);
            assert!(path.ends_with("missing.mp4"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
