#![allow(dead_code)]

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Packet, Rational, codec, encoder,
    format::{self, Pixel},
    util::frame::video::Video as VideoFrame,
};

/// Chroma layouts the YUV4MPEG2 writer can produce.
#[derive(Clone, Copy, Debug)]
pub enum Chroma {
    C420,
    C422,
    C444,
    Mono,
}

impl Chroma {
    fn tag(self) -> &'static str {
        match self {
            Self::C420 => "420jpeg",
            Self::C422 => "422",
            Self::C444 => "444",
            Self::Mono => "mono",
        }
    }

    /// Chroma plane size for a `width` x `height` picture, if any.
    pub fn plane_size(self, width: usize, height: usize) -> Option<(usize, usize)> {
        match self {
            Self::C420 => Some((width.div_ceil(2), height.div_ceil(2))),
            Self::C422 => Some((width.div_ceil(2), height)),
            Self::C444 => Some((width, height)),
            Self::Mono => None,
        }
    }

    /// Horizontal and vertical chroma subsampling as shifts.
    pub fn shifts(self) -> (usize, usize) {
        match self {
            Self::C420 => (1, 1),
            Self::C422 => (1, 0),
            Self::C444 | Self::Mono => (0, 0),
        }
    }
}

/// A synthetic clip at 25 fps.
#[derive(Clone, Copy, Debug)]
pub struct Clip {
    pub width: usize,
    pub height: usize,
    pub frames: usize,
    pub chroma: Chroma,
}

impl Clip {
    pub fn new(width: usize, height: usize, frames: usize, chroma: Chroma) -> Self {
        Self {
            width,
            height,
            frames,
            chroma,
        }
    }
}

pub const FPS: usize = 25;

/// Luma sample of frame `index` at (`x`, `y`).
pub fn luma(index: usize, x: usize, y: usize) -> u8 {
    (x + 2 * y + 3 * index) as u8
}

/// Cb sample of frame `index` at chroma position (`x`, `y`).
pub fn cb(index: usize, x: usize, y: usize) -> u8 {
    (64 + 5 * x + 7 * y + index) as u8
}

/// Cr sample of frame `index` at chroma position (`x`, `y`).
pub fn cr(index: usize, x: usize, y: usize) -> u8 {
    (200 + 3 * x + y + 2 * index) as u8
}

/// Write `clip` as an uncompressed YUV4MPEG2 file in `dir`.
pub fn write_y4m(dir: &Path, name: &str, clip: Clip) -> PathBuf {
    let path = dir.join(name);
    let mut out = BufWriter::new(File::create(&path).unwrap());
    writeln!(
        out,
        "YUV4MPEG2 W{} H{} F{FPS}:1 Ip A1:1 C{}",
        clip.width,
        clip.height,
        clip.chroma.tag()
    )
    .unwrap();

    for index in 0..clip.frames {
        out.write_all(b"FRAME\n").unwrap();
        let plane = |w: usize, h: usize, sample: fn(usize, usize, usize) -> u8| {
            let mut bytes = Vec::with_capacity(w * h);
            for y in 0..h {
                for x in 0..w {
                    bytes.push(sample(index, x, y));
                }
            }
            bytes
        };
        out.write_all(&plane(clip.width, clip.height, luma)).unwrap();
        if let Some((cw, ch)) = clip.chroma.plane_size(clip.width, clip.height) {
            out.write_all(&plane(cw, ch, cb)).unwrap();
            out.write_all(&plane(cw, ch, cr)).unwrap();
        }
    }
    out.flush().unwrap();
    path
}

fn fill_plane(
    frame: &mut VideoFrame,
    plane: usize,
    (width, height): (usize, usize),
    index: usize,
    sample: fn(usize, usize, usize) -> u8,
) {
    let stride = frame.stride(plane);
    let data = frame.data_mut(plane);
    for y in 0..height {
        for x in 0..width {
            data[y * stride + x] = sample(index, x, y);
        }
    }
}

fn write_packets(
    encoder: &mut encoder::Video,
    output: &mut format::context::Output,
    stream_index: usize,
    from: Rational,
    to: Rational,
) {
    let mut packet = Packet::empty();
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(stream_index);
        packet.rescale_ts(from, to);
        packet.write_interleaved(output).unwrap();
    }
}

/// Encode a 4:2:0 `clip` as MPEG-4 Part 2 in Matroska, with a keyframe
/// every `gop` frames and no B-frames.
pub fn write_mpeg4(dir: &Path, name: &str, clip: Clip, gop: u32) -> PathBuf {
    assert!(matches!(clip.chroma, Chroma::C420));
    vidtensor::init().unwrap();

    let path = dir.join(name);
    let time_base = Rational::new(1, FPS as i32);
    let mut output = format::output(&path).unwrap();
    let codec = encoder::find(codec::Id::MPEG4).unwrap();
    let global_header = output
        .format()
        .flags()
        .contains(format::Flags::GLOBAL_HEADER);

    let mut config = codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()
        .unwrap();
    config.set_width(clip.width as u32);
    config.set_height(clip.height as u32);
    config.set_format(Pixel::YUV420P);
    config.set_time_base(time_base);
    config.set_frame_rate(Some(Rational::new(FPS as i32, 1)));
    config.set_gop(gop);
    config.set_max_b_frames(0);
    if global_header {
        config.set_flags(codec::Flags::GLOBAL_HEADER);
    }
    let mut encoder = config.open_as(codec).unwrap();

    let stream_index = {
        let mut stream = output.add_stream(codec).unwrap();
        stream.set_time_base(time_base);
        stream.set_parameters(&encoder);
        stream.index()
    };
    output.write_header().unwrap();
    let stream_time_base = output.stream(stream_index).unwrap().time_base();

    let luma_size = (clip.width, clip.height);
    let chroma_size = (clip.width.div_ceil(2), clip.height.div_ceil(2));
    for index in 0..clip.frames {
        let mut frame = VideoFrame::new(Pixel::YUV420P, clip.width as u32, clip.height as u32);
        fill_plane(&mut frame, 0, luma_size, index, luma);
        fill_plane(&mut frame, 1, chroma_size, index, cb);
        fill_plane(&mut frame, 2, chroma_size, index, cr);
        frame.set_pts(Some(index as i64));
        encoder.send_frame(&frame).unwrap();
        write_packets(&mut encoder, &mut output, stream_index, time_base, stream_time_base);
    }
    encoder.send_eof().unwrap();
    write_packets(&mut encoder, &mut output, stream_index, time_base, stream_time_base);
    output.write_trailer().unwrap();
    path
}
