/*!
    Frame-accurate video decoding into channel-major numeric buffers.

    `vidtensor` decodes a video file frame by frame, optionally runs the
    frames through an FFmpeg filter chain, and packs them into dense
    `channels × height × width` buffers of bytes or normalized floats.

    # Example

    ```ignore
    use vidtensor::{FilterConfig, Session, pack_bytes};

    vidtensor::init()?;

    let mut session = Session::open("video.mp4")?;
    println!("{}s at {} fps", session.duration()?, session.frame_rate()?);

    // Convert to RGB at a fixed size
    let mut session = session.attach_filter(
        FilterConfig::new("rgb24").with_chain("scale=224:224"),
    )?;

    // The next frame is the first one at or after 5 seconds
    session.seek(5.0)?;
    while let Some(frame) = session.next_frame()? {
        let packed = pack_bytes(&frame)?;
        assert_eq!(packed.shape(), [3, 224, 224]);
    }
    ```

    # Seeking

    Containers can only seek to keyframes. A seek therefore lands on the
    keyframe at or before the target, and the next frame request decodes
    and drops frames until it reaches the first frame whose timestamp is at
    or after the target. Only that frame enters the filter chain, so
    temporal filters see a gap in their input right after a seek.

    # Crates

    - [`vidtensor_types`]: frames, pixel formats, timestamps, errors
    - [`vidtensor_pack`]: channel-major packing
    - [`vidtensor_decode`]: demuxing and decoding
    - [`vidtensor_filter`]: filter graphs
*/

use std::sync::OnceLock;

use ffmpeg_next::util::log;

mod backend;
mod pipeline;
mod session;

pub use vidtensor_decode::{DEFAULT_READ_RETRY_LIMIT, SourceConfig, VideoSource};
pub use vidtensor_filter::{BufferSource, DEFAULT_CHAIN, FilterConfig, FilterGraph};
pub use vidtensor_pack::{
    Packed, channel_count, pack_byte_into, pack_bytes, pack_float_into, pack_floats, packed_len,
};
pub use vidtensor_types::{
    Error, ErrorKind, Frame, OpenStage, PixelFormat, PixelFormatDescriptor, Plane, Pts, Rational,
    Result,
};

pub use backend::MediaPipeline;
pub use pipeline::{Current, FrameFilter, FrameSource, Pipeline, SeekState, Timestamped};
pub use session::Session;

static INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/**
    Initialize the media libraries for this process.

    Safe to call any number of times from any thread; only the first call
    does work and later calls return its outcome. [`Session::open`] calls
    this as well.
*/
pub fn init() -> Result<()> {
    INIT.get_or_init(|| {
        ffmpeg_next::init().map_err(|e| e.to_string())?;
        log::set_level(log::Level::Error);
        tracing::debug!("initialized media libraries");
        Ok(())
    })
    .clone()
    .map_err(|message| Error::Init { message })
}
