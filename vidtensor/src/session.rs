/*!
    Host-facing video session.
*/

use std::{
    fmt, mem,
    path::{Path, PathBuf},
};

use vidtensor_decode::{SourceConfig, VideoSource, frame_from_ffmpeg};
use vidtensor_filter::{BufferSource, FilterConfig, FilterGraph};
use vidtensor_types::{Error, Frame, PixelFormat, Rational, Result};

use crate::backend::MediaPipeline;
use crate::pipeline::{Pipeline, SeekState};

enum State {
    Open(Box<MediaPipeline>),
    // Handles were handed to a filtered session
    Moved,
    Closed,
}

/**
    An open video file producing frames one at a time.

    A session owns every native handle behind it. Attaching a filter moves
    those handles into a new session; the old one is left in a moved state
    where every call fails with [`Error::SessionMoved`]. Handles are
    released exactly once, on [`close`](Self::close) or drop, by whichever
    session owns them at that point.

    # Example

    ```ignore
    use vidtensor::{FilterConfig, Session, pack_floats};

    let mut session = Session::open("video.mp4")?;
    let mut session = session.attach_filter(FilterConfig::new("rgb24"))?;

    session.seek(5.0)?;
    while let Some(frame) = session.next_frame()? {
        let tensor = pack_floats(&frame)?;
    }
    ```
*/
pub struct Session {
    path: PathBuf,
    state: State,
}

impl Session {
    /**
        Open `path` with default settings.
    */
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, SourceConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: SourceConfig) -> Result<Self> {
        crate::init()?;
        let source = VideoSource::open(path, config)?;
        Ok(Self {
            path: source.path().to_path_buf(),
            state: State::Open(Box::new(Pipeline::new(source))),
        })
    }

    fn pipeline(&self) -> Result<&MediaPipeline> {
        match &self.state {
            State::Open(pipeline) => Ok(pipeline),
            State::Moved => Err(Error::SessionMoved),
            State::Closed => Err(Error::SessionClosed),
        }
    }

    fn pipeline_mut(&mut self) -> Result<&mut MediaPipeline> {
        match &mut self.state {
            State::Open(pipeline) => Ok(pipeline),
            State::Moved => Err(Error::SessionMoved),
            State::Closed => Err(Error::SessionClosed),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        Returns true while this session owns its media handles.
    */
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /**
        Returns the duration in seconds, or 0.0 if unknown.
    */
    pub fn duration(&self) -> Result<f64> {
        Ok(self.pipeline()?.source().duration())
    }

    /**
        Returns the frame rate, or 0.0 if unknown.
    */
    pub fn frame_rate(&self) -> Result<f64> {
        Ok(self.pipeline()?.source().frame_rate())
    }

    /**
        Returns the number of frames, or 0 if unknown.
    */
    pub fn frame_count(&self) -> Result<u64> {
        Ok(self.pipeline()?.source().frame_count())
    }

    pub fn width(&self) -> Result<u32> {
        Ok(self.pipeline()?.source().width())
    }

    pub fn height(&self) -> Result<u32> {
        Ok(self.pipeline()?.source().height())
    }

    /**
        Returns the pixel format frames have before any filter.
    */
    pub fn pixel_format(&self) -> Result<PixelFormat> {
        Ok(self.pipeline()?.source().pixel_format())
    }

    /**
        Returns the time base of the decoded stream.
    */
    pub fn time_base(&self) -> Result<Rational> {
        Ok(self.pipeline()?.source().time_base())
    }

    pub fn has_filter(&self) -> Result<bool> {
        Ok(self.pipeline()?.has_filter())
    }

    pub fn seek_state(&self) -> Result<SeekState> {
        Ok(self.pipeline()?.seek_state())
    }

    /**
        Route all further frames through a filter graph, returning the
        session that now owns the media handles.

        On success this session becomes moved. On failure it is left exactly
        as it was and stays usable.
    */
    pub fn attach_filter(&mut self, config: FilterConfig) -> Result<Session> {
        let pipeline = self.pipeline_mut()?;
        if pipeline.has_filter() {
            return Err(Error::AlreadyAttached);
        }
        let graph = FilterGraph::new(&BufferSource::of(pipeline.source()), &config)?;
        pipeline.attach(graph)?;

        tracing::info!(
            path = %self.path.display(),
            pixel_format = %config.pixel_format,
            chain = %config.chain,
            "attached filter"
        );

        let state = mem::replace(&mut self.state, State::Moved);
        Ok(Session {
            path: self.path.clone(),
            state,
        })
    }

    /**
        Returns the next frame, or `Ok(None)` at end of stream.

        End of stream is sticky until the next seek.
    */
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        let current = self.pipeline_mut()?.next_frame()?;
        Ok(current.map(|current| frame_from_ffmpeg(current.frame, current.time_base)))
    }

    /**
        Position the session so that the next frame is the first one whose
        timestamp is at or after `seconds`.
    */
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        self.pipeline_mut()?.seek(seconds)
    }

    /**
        Release the media handles. Calling this again, or on a moved
        session, does nothing.
    */
    pub fn close(&mut self) {
        if let State::Open(_) = self.state {
            self.state = State::Closed;
            tracing::debug!(path = %self.path.display(), "closed session");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            State::Open(_) => "open",
            State::Moved => "moved",
            State::Closed => "closed",
        };
        f.debug_struct("Session")
            .field("path", &self.path)
            .field("state", &state)
            .finish()
    }
}
