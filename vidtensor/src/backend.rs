use ffmpeg_next::util::frame::video::Video as VideoFrameFFmpeg;

use vidtensor_decode::{VideoSource, frame_timestamp};
use vidtensor_filter::FilterGraph;
use vidtensor_types::{Pts, Rational, Result};

use crate::pipeline::{FrameFilter, FrameSource, Pipeline, Timestamped};

/**
    The pipeline as driven by FFmpeg.
*/
pub type MediaPipeline = Pipeline<VideoSource, FilterGraph>;

impl Timestamped for VideoFrameFFmpeg {
    fn timestamp(&self) -> Option<Pts> {
        frame_timestamp(self)
    }
}

impl FrameSource for VideoSource {
    type Frame = VideoFrameFFmpeg;

    fn advance(&mut self) -> Result<bool> {
        VideoSource::advance(self)
    }

    fn current(&self) -> &VideoFrameFFmpeg {
        VideoSource::current(self)
    }

    fn time_base(&self) -> Rational {
        VideoSource::time_base(self)
    }

    fn seek(&mut self, seconds: f64) -> Result<Pts> {
        VideoSource::seek(self, seconds)
    }
}

impl FrameFilter<VideoFrameFFmpeg> for FilterGraph {
    fn push(&mut self, frame: &VideoFrameFFmpeg) -> Result<()> {
        FilterGraph::push(self, frame)
    }

    fn pull(&mut self) -> Result<bool> {
        FilterGraph::pull(self)
    }

    fn current(&self) -> &VideoFrameFFmpeg {
        FilterGraph::current(self)
    }

    fn time_base(&self) -> Rational {
        FilterGraph::time_base(self)
    }
}
