/*!
    Video source: demuxing and decoding of a single video stream.
*/

use std::{
    fmt,
    path::{Path, PathBuf},
    thread,
};

use ffmpeg_next::{
    Packet, codec, ffi,
    format::{self, Pixel},
    media,
    util::frame::video::Video as VideoFrameFFmpeg,
};

use vidtensor_types::{Error, OpenStage, PixelFormat, Pts, Rational, Result};

use crate::config::SourceConfig;
use crate::convert::{frame_timestamp, pixel_format_from_ffmpeg, rational_from_ffmpeg};

/**
    An open media file producing decoded video frames in stream order.

    The source owns the container and decoder handles along with a single
    reusable frame slot. [`advance`](Self::advance) overwrites that slot, so
    a borrow from [`current`](Self::current) is valid until the next call.
    Everything is released when the source is dropped.
*/
pub struct VideoSource {
    path: PathBuf,
    config: SourceConfig,
    input: format::context::Input,
    decoder: codec::decoder::Video,
    stream_index: usize,
    time_base: Rational,
    frame: VideoFrameFFmpeg,
    // The decoder has been told there are no more packets.
    draining: bool,
    // The decoder confirmed it holds no further frames.
    finished: bool,
}

impl VideoSource {
    /**
        Open `path` and prepare a decoder for its best video stream.
    */
    pub fn open(path: impl AsRef<Path>, config: SourceConfig) -> Result<Self> {
        let path = path.as_ref();
        ffmpeg_next::init().map_err(|e| Error::Init {
            message: e.to_string(),
        })?;

        let input = format::input(&path)
            .map_err(|e| Error::open(path, OpenStage::OpenContainer, e.to_string()))?;

        let (stream_index, time_base, parameters) = {
            let stream = input.streams().best(media::Type::Video).ok_or_else(|| {
                Error::open(path, OpenStage::FindVideoStream, "no video stream in container")
            })?;
            (
                stream.index(),
                rational_from_ffmpeg(stream.time_base()),
                stream.parameters(),
            )
        };

        let decoder = codec::context::Context::from_parameters(parameters)
            .and_then(|context| context.decoder().video())
            .map_err(|e| Error::open(path, OpenStage::OpenDecoder, e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            stream = stream_index,
            width = decoder.width(),
            height = decoder.height(),
            format = ?decoder.format(),
            time_base = %time_base,
            "opened video source"
        );

        Ok(Self {
            path: path.to_path_buf(),
            config,
            input,
            decoder,
            stream_index,
            time_base,
            frame: VideoFrameFFmpeg::empty(),
            draining: false,
            finished: false,
        })
    }

    /**
        Decode the next frame into the frame slot.

        Returns `Ok(false)` once the container is exhausted and the decoder
        has given up its last buffered frame. That state persists until the
        next seek.
    */
    pub fn advance(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        loop {
            match self.decoder.receive_frame(&mut self.frame) {
                Ok(()) => return Ok(true),
                Err(ffmpeg_next::Error::Eof) => {
                    self.finished = true;
                    return Ok(false);
                }
                Err(e) if is_again(&e) => {
                    if self.draining {
                        // Nothing left to feed a draining decoder
                        self.finished = true;
                        return Ok(false);
                    }
                    self.feed()?;
                }
                Err(e) => return Err(Error::decode(e.to_string())),
            }
        }
    }

    /**
        Send the next video packet to the decoder, or signal end of input
        once the container runs out.
    */
    fn feed(&mut self) -> Result<()> {
        let mut retries = 0;
        loop {
            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() != self.stream_index {
                        continue;
                    }
                    return self
                        .decoder
                        .send_packet(&packet)
                        .map_err(|e| Error::decode(e.to_string()));
                }
                Err(ffmpeg_next::Error::Eof) => {
                    tracing::debug!(path = %self.path.display(), "container exhausted, draining decoder");
                    self.draining = true;
                    return self
                        .decoder
                        .send_eof()
                        .map_err(|e| Error::decode(e.to_string()));
                }
                Err(e) if is_again(&e) => {
                    if retries >= self.config.read_retry_limit {
                        return Err(Error::read(format!(
                            "{e} (gave up after {retries} retries)"
                        )));
                    }
                    retries += 1;
                    tracing::warn!(retries, "transient read failure, retrying");
                    thread::yield_now();
                }
                Err(e) => return Err(Error::read(e.to_string())),
            }
        }
    }

    /**
        Returns the most recently decoded frame.

        Before the first successful [`advance`](Self::advance) this is an
        empty frame.
    */
    pub fn current(&self) -> &VideoFrameFFmpeg {
        &self.frame
    }

    /**
        Returns the timestamp of the most recently decoded frame.
    */
    pub fn current_timestamp(&self) -> Option<Pts> {
        frame_timestamp(&self.frame)
    }

    /**
        Seek to the keyframe at or before `seconds` and reset the decoder.

        Returns the first stream tick at or after `seconds`; frames before
        it still have to be decoded and discarded by the caller to land
        exactly on the target.
    */
    pub fn seek(&mut self, seconds: f64) -> Result<Pts> {
        let target = Pts::from_seconds_ceil(seconds, self.time_base).ok_or_else(|| {
            Error::seek(
                seconds,
                format!("cannot convert to ticks of time base {}", self.time_base),
            )
        })?;

        let position = (seconds * f64::from(ffi::AV_TIME_BASE)) as i64;
        self.input
            .seek(position, ..position)
            .map_err(|e| Error::seek(seconds, e.to_string()))?;
        self.decoder.flush();
        self.draining = false;
        self.finished = false;

        tracing::debug!(seconds, target = target.0, "seeked video source");
        Ok(target)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        Returns the time base of the video stream.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn width(&self) -> u32 {
        self.decoder.width()
    }

    pub fn height(&self) -> u32 {
        self.decoder.height()
    }

    /**
        Returns the decoder's output pixel format in FFmpeg terms.
    */
    pub fn ffmpeg_format(&self) -> Pixel {
        self.decoder.format()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        pixel_format_from_ffmpeg(self.decoder.format())
    }

    /**
        Returns the sample aspect ratio, or `0/1` when unknown.
    */
    pub fn aspect_ratio(&self) -> Rational {
        rational_from_ffmpeg(self.decoder.aspect_ratio())
    }

    /**
        Returns the duration in seconds, or 0.0 if unknown.

        Prefers the container duration and falls back to the stream's.
    */
    pub fn duration(&self) -> f64 {
        let container = self.input.duration();
        if container > 0 {
            return container as f64 / f64::from(ffi::AV_TIME_BASE);
        }
        self.input
            .stream(self.stream_index)
            .map(|stream| stream.duration())
            .filter(|&ticks| ticks > 0)
            .map_or(0.0, |ticks| Pts(ticks).to_seconds(self.time_base))
    }

    /**
        Returns the average frame rate, falling back to the base rate, or
        0.0 if neither is known.
    */
    pub fn frame_rate(&self) -> f64 {
        let Some(stream) = self.input.stream(self.stream_index) else {
            return 0.0;
        };
        [stream.avg_frame_rate(), stream.rate()]
            .into_iter()
            .map(rational_from_ffmpeg)
            .find_map(|rate| Rational::positive(rate.num, rate.den))
            .map_or(0.0, Rational::to_f64)
    }

    /**
        Returns the number of frames the container declares, or 0 if unknown.
    */
    pub fn frame_count(&self) -> u64 {
        self.input
            .stream(self.stream_index)
            .map_or(0, |stream| stream.frames().max(0) as u64)
    }
}

impl fmt::Debug for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("stream_index", &self.stream_index)
            .field("time_base", &self.time_base)
            .field("draining", &self.draining)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

fn is_again(error: &ffmpeg_next::Error) -> bool {
    matches!(error, ffmpeg_next::Error::Other { errno } if *errno == ffi::EAGAIN)
}
