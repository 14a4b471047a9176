/*!
    Filter graph: buffer source, user chain, format conversion, buffer sink.
*/

use std::{fmt, os::raw::c_int};

use ffmpeg_next::{
    ffi,
    filter::{self, Graph},
    format::Pixel,
    util::frame::video::Video as VideoFrameFFmpeg,
};

use vidtensor_decode::{VideoSource, rational_from_ffmpeg};
use vidtensor_types::{Error, Rational, Result};

use crate::config::FilterConfig;

// Names of the fixed nodes around the user chain
const SOURCE: &str = "in";
const FORMAT: &str = "format";
const SINK: &str = "out";

// The graph takes a new reference and leaves the pushed frame untouched
const BUFFERSRC_FLAG_KEEP_REF: c_int = ffi::AV_BUFFERSRC_FLAG_KEEP_REF as c_int;

/**
    Description of the frames that will be pushed into a graph.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferSource {
    pub width: u32,
    pub height: u32,
    pub format: Pixel,
    pub time_base: Rational,
    pub aspect_ratio: Rational,
}

impl BufferSource {
    /**
        Describe the frames decoded by `source`.
    */
    pub fn of(source: &VideoSource) -> Self {
        Self {
            width: source.width(),
            height: source.height(),
            format: source.ffmpeg_format(),
            time_base: source.time_base(),
            aspect_ratio: source.aspect_ratio(),
        }
    }

    fn args(&self) -> String {
        format!(
            "video_size={}x{}:pix_fmt={}:time_base={}/{}:pixel_aspect={}/{}",
            self.width,
            self.height,
            ffi::AVPixelFormat::from(self.format) as i32,
            self.time_base.num,
            self.time_base.den.max(1),
            self.aspect_ratio.num,
            self.aspect_ratio.den.max(1),
        )
    }
}

/**
    A configured filter graph with one reusable output frame slot.

    Frames go in through [`push`](Self::push) and come out through
    [`pull`](Self::pull), which never blocks: a filter may hold frames back
    (rate reduction) or emit several per input (rate increase), so a pull
    reporting no frame just means more input is needed.
*/
pub struct FilterGraph {
    graph: Graph,
    config: FilterConfig,
    time_base: Rational,
    frame: VideoFrameFFmpeg,
}

impl FilterGraph {
    /**
        Build and validate a graph converting frames shaped like `input`
        according to `config`.

        Any failure is reported as [`Error::FilterConfig`]; nothing is left
        allocated in that case.
    */
    pub fn new(input: &BufferSource, config: &FilterConfig) -> Result<Self> {
        let invalid = |message: String| {
            Error::filter_config(&config.pixel_format, &config.chain, message)
        };

        let pixel_format: Pixel = config
            .pixel_format
            .parse()
            .map_err(|_| invalid("unknown pixel format name".to_string()))?;

        let buffer = filter::find("buffer")
            .ok_or_else(|| invalid("buffer filter is unavailable".to_string()))?;
        let format = filter::find("format")
            .ok_or_else(|| invalid("format filter is unavailable".to_string()))?;
        let buffersink = filter::find("buffersink")
            .ok_or_else(|| invalid("buffersink filter is unavailable".to_string()))?;

        let mut graph = Graph::new();
        graph
            .add(&buffer, SOURCE, &input.args())
            .map_err(|e| invalid(format!("cannot create buffer source: {e}")))?;
        graph
            .add(&format, FORMAT, &format!("pix_fmts={}", config.pixel_format))
            .map_err(|e| invalid(format!("cannot set output pixel format: {e}")))?;
        graph
            .add(&buffersink, SINK, "")
            .map_err(|e| invalid(format!("cannot create buffer sink: {e}")))?;

        let format_ctx = graph
            .get(FORMAT)
            .map(|mut ctx| unsafe { ctx.as_mut_ptr() })
            .ok_or_else(|| invalid("format node is missing".to_string()))?;
        let sink_ctx = graph
            .get(SINK)
            .map(|mut ctx| unsafe { ctx.as_mut_ptr() })
            .ok_or_else(|| invalid("buffer sink is missing".to_string()))?;

        let linked = unsafe { ffi::avfilter_link(format_ctx, 0, sink_ctx, 0) };
        if linked < 0 {
            return Err(invalid(format!(
                "cannot link output format: {}",
                ffmpeg_next::Error::from(linked)
            )));
        }

        graph
            .output(SOURCE, 0)
            .and_then(|parser| parser.input(FORMAT, 0))
            .and_then(|parser| parser.parse(&config.chain))
            .map_err(|e| invalid(format!("cannot parse filter chain: {e}")))?;
        graph
            .validate()
            .map_err(|e| invalid(format!("cannot configure filter graph: {e}")))?;

        let time_base = unsafe { ffi::av_buffersink_get_time_base(sink_ctx) };
        let time_base = rational_from_ffmpeg(time_base.into());

        tracing::info!(
            chain = %config.chain,
            pixel_format = ?pixel_format,
            input = %input.args(),
            time_base = %time_base,
            "configured filter graph"
        );

        Ok(Self {
            graph,
            config: config.clone(),
            time_base,
            frame: VideoFrameFFmpeg::empty(),
        })
    }

    /**
        Push a frame into the graph. The frame itself is left untouched.
    */
    pub fn push(&mut self, frame: &VideoFrameFFmpeg) -> Result<()> {
        let mut source = self
            .graph
            .get(SOURCE)
            .ok_or_else(|| Error::filter_runtime("buffer source is missing"))?;
        let ret = unsafe {
            ffi::av_buffersrc_add_frame_flags(
                source.as_mut_ptr(),
                frame.as_ptr() as *mut ffi::AVFrame,
                BUFFERSRC_FLAG_KEEP_REF,
            )
        };
        if ret < 0 {
            return Err(Error::filter_runtime(format!(
                "cannot feed filter graph: {}",
                ffmpeg_next::Error::from(ret)
            )));
        }
        Ok(())
    }

    /**
        Try to pull the next filtered frame into the output slot.

        Returns `Ok(false)` when the graph needs more input first.
    */
    pub fn pull(&mut self) -> Result<bool> {
        let mut sink = self
            .graph
            .get(SINK)
            .ok_or_else(|| Error::filter_runtime("buffer sink is missing"))?;
        unsafe { ffi::av_frame_unref(self.frame.as_mut_ptr()) };
        match sink.sink().frame(&mut self.frame) {
            Ok(()) => Ok(true),
            Err(ffmpeg_next::Error::Eof) => Ok(false),
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => Ok(false),
            Err(e) => Err(Error::filter_runtime(format!(
                "cannot pull from filter graph: {e}"
            ))),
        }
    }

    /**
        Returns the most recently pulled frame, valid until the next pull.
    */
    pub fn current(&self) -> &VideoFrameFFmpeg {
        &self.frame
    }

    /**
        Returns the time base of frames leaving the graph.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl fmt::Debug for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterGraph")
            .field("config", &self.config)
            .field("time_base", &self.time_base)
            .finish_non_exhaustive()
    }
}
