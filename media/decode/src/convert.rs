/*!
    Conversions between FFmpeg values and the vidtensor types.
*/

use ffmpeg_next::{Rational as FfRational, format::Pixel, util::frame::video::Video as VideoFrameFFmpeg};

use vidtensor_types::{Frame, PixelFormat, Plane, Pts, Rational};

/**
    Map an FFmpeg pixel format onto ours.

    Formats without a counterpart become [`PixelFormat::Unknown`].
*/
pub fn pixel_format_from_ffmpeg(format: Pixel) -> PixelFormat {
    match format {
        Pixel::RGB24 => PixelFormat::Rgb24,
        Pixel::BGR24 => PixelFormat::Bgr24,
        Pixel::RGBA => PixelFormat::Rgba,
        Pixel::BGRA => PixelFormat::Bgra,
        Pixel::GRAY8 => PixelFormat::Gray8,
        Pixel::YUV420P => PixelFormat::Yuv420p,
        Pixel::YUV422P => PixelFormat::Yuv422p,
        Pixel::YUV444P => PixelFormat::Yuv444p,
        Pixel::YUVJ420P => PixelFormat::Yuvj420p,
        Pixel::NV12 => PixelFormat::Nv12,
        Pixel::YUV420P10LE => PixelFormat::Yuv420p10,
        _ => PixelFormat::Unknown,
    }
}

/**
    Convert an FFmpeg rational.

    An unset value (zero denominator) becomes `0/1`.
*/
pub fn rational_from_ffmpeg(value: FfRational) -> Rational {
    if value.denominator() == 0 {
        return Rational::UNSET;
    }
    Rational {
        num: value.numerator(),
        den: value.denominator(),
    }
}

/**
    Convert our rational into FFmpeg's.
*/
pub fn rational_to_ffmpeg(value: Rational) -> FfRational {
    FfRational::new(value.num, value.den)
}

/**
    Returns the best-effort timestamp of a decoded frame, falling back to
    its PTS.
*/
pub fn frame_timestamp(frame: &VideoFrameFFmpeg) -> Option<Pts> {
    frame.timestamp().or_else(|| frame.pts()).map(Pts)
}

/**
    Copy one plane top row first into a plane with a positive stride.

    Filters such as `vflip` hand out planes stored bottom-up: the data
    pointer addresses the top row and the linesize is negative.
*/
fn copy_plane(frame: &VideoFrameFFmpeg, index: usize) -> Plane {
    let (data, linesize) = unsafe {
        let raw = frame.as_ptr();
        ((*raw).data[index] as *const u8, (*raw).linesize[index] as isize)
    };
    let stride = linesize.unsigned_abs();
    if data.is_null() || stride == 0 {
        return Plane::new(stride, Vec::new());
    }

    let rows = frame.plane_height(index) as usize;
    let mut bytes = Vec::with_capacity(stride * rows);
    for y in 0..rows {
        // Every row owns `stride` bytes starting at its first pixel
        let row = unsafe {
            let start = data.offset(y as isize * linesize);
            std::slice::from_raw_parts(start, stride)
        };
        bytes.extend_from_slice(row);
    }
    Plane::new(stride, bytes)
}

/**
    Copy an FFmpeg video frame into an owned [`Frame`].

    Every populated plane is copied row by row, so the result stays valid
    after the decoder reuses `frame`.
*/
pub fn frame_from_ffmpeg(frame: &VideoFrameFFmpeg, time_base: Rational) -> Frame {
    let planes = (0..frame.planes())
        .map(|index| copy_plane(frame, index))
        .collect();

    Frame::new(
        pixel_format_from_ffmpeg(frame.format()),
        frame.width(),
        frame.height(),
        planes,
        time_base,
    )
    .with_pts(frame.pts().map(Pts))
    .with_best_effort_timestamp(frame.timestamp().map(Pts))
}
