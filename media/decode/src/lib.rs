/*!
    Demuxing and video decoding on top of FFmpeg.

    This crate opens a media file, picks its best video stream and turns the
    stream's packets into decoded frames, one at a time and in stream order.
    Packets of other streams are skipped. Once the container runs out the
    decoder is drained so that no buffered frame is lost.

    # Example

    ```ignore
    use vidtensor_decode::{SourceConfig, VideoSource};

    let mut source = VideoSource::open("video.mp4", SourceConfig::new())?;
    while source.advance()? {
        let frame = source.current();
        // The frame slot is overwritten by the next advance
    }

    // Jump back and decode forward to the exact position
    let target = source.seek(5.0)?;
    ```

    # Seeking

    [`VideoSource::seek`] only reaches the keyframe at or before the target.
    It returns the exact target in stream ticks; landing on it precisely is
    the caller's job.
*/

pub use vidtensor_types::{Error, Frame, PixelFormat, Pts, Rational, Result};

mod config;
mod convert;
mod source;

pub use config::{DEFAULT_READ_RETRY_LIMIT, SourceConfig};
pub use convert::{
    frame_from_ffmpeg, frame_timestamp, pixel_format_from_ffmpeg, rational_from_ffmpeg,
    rational_to_ffmpeg,
};
pub use source::VideoSource;
