/*!
    Frame acquisition and timestamp-accurate seeking.

    The [`Pipeline`] drives a [`FrameSource`] and an optional [`FrameFilter`].
    Both are traits so that the state machine can run against FFmpeg in
    production and against in-memory stand-ins in tests.
*/

use vidtensor_types::{Error, Pts, Rational, Result};

/**
    Anything that may carry a presentation timestamp.
*/
pub trait Timestamped {
    fn timestamp(&self) -> Option<Pts>;
}

/**
    Producer of decoded frames in stream order with coarse seeking.
*/
pub trait FrameSource {
    type Frame: Timestamped;

    /// Decode the next frame into the current slot. `Ok(false)` at end of stream.
    fn advance(&mut self) -> Result<bool>;

    /// The frame produced by the last successful [`advance`](Self::advance).
    fn current(&self) -> &Self::Frame;

    fn time_base(&self) -> Rational;

    /// Seek to a keyframe at or before `seconds`, returning the exact
    /// target in ticks of [`time_base`](Self::time_base).
    fn seek(&mut self, seconds: f64) -> Result<Pts>;
}

/**
    Push/pull adapter around a frame transformation that may emit zero, one
    or many outputs per input.
*/
pub trait FrameFilter<F> {
    fn push(&mut self, frame: &F) -> Result<()>;

    /// Non-blocking. `Ok(false)` means more input is needed.
    fn pull(&mut self) -> Result<bool>;

    fn current(&self) -> &F;

    fn time_base(&self) -> Rational;
}

/**
    Seek progress of a [`Pipeline`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekState {
    /// Frames flow normally.
    Idle,
    /// A seek was issued; the next pull will resynchronize to this tick.
    Pending(Pts),
    /// Discarding frames before this tick. Stays here if resync fails
    /// midway, so the next pull picks up where it stopped.
    Resyncing(Pts),
}

/**
    A borrowed output frame, valid until the pipeline is used again.
*/
#[derive(Debug)]
pub struct Current<'a, F> {
    pub frame: &'a F,
    /// Time base of the frame's timestamps.
    pub time_base: Rational,
}

enum Resync {
    EndOfStream,
    Source,
    Filtered,
    // The filter swallowed the matched frame; continue with normal acquisition
    FilterNeedsInput,
}

/**
    Read, decode, filter state machine with exact seeking.
*/
#[derive(Debug)]
pub struct Pipeline<S, G> {
    source: S,
    filter: Option<G>,
    seek: SeekState,
}

impl<S, G> Pipeline<S, G>
where
    S: FrameSource,
    G: FrameFilter<S::Frame>,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            filter: None,
            seek: SeekState::Idle,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn filter(&self) -> Option<&G> {
        self.filter.as_ref()
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn seek_state(&self) -> SeekState {
        self.seek
    }

    /**
        Route all further frames through `filter`. Only one filter may ever
        be attached.
    */
    pub fn attach(&mut self, filter: G) -> Result<()> {
        if self.filter.is_some() {
            return Err(Error::AlreadyAttached);
        }
        self.filter = Some(filter);
        Ok(())
    }

    /**
        Request that the next frame be the first one at or after `seconds`.

        A seek that has not been consumed yet is replaced. Filter outputs
        that were ready but not yet pulled are discarded.
    */
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        let target = self.source.seek(seconds)?;
        // The source has moved; an older target must not outlive a failed drain
        self.seek = SeekState::Pending(target);
        if let Some(filter) = self.filter.as_mut() {
            let mut dropped = 0usize;
            while filter.pull()? {
                dropped += 1;
            }
            if dropped > 0 {
                tracing::debug!(dropped, "discarded filtered frames queued before seek");
            }
        }
        Ok(())
    }

    /**
        Produce the next frame, or `Ok(None)` at end of stream.
    */
    pub fn next_frame(&mut self) -> Result<Option<Current<'_, S::Frame>>> {
        if let SeekState::Pending(target) | SeekState::Resyncing(target) = self.seek {
            self.seek = SeekState::Resyncing(target);
            let outcome = self.resync(target)?;
            self.seek = SeekState::Idle;
            match outcome {
                Resync::EndOfStream => return Ok(None),
                Resync::Source => return Ok(Some(self.source_frame())),
                Resync::Filtered => return Ok(self.filtered_frame()),
                Resync::FilterNeedsInput => {}
            }
        }
        self.acquire()
    }

    /**
        Decode and drop frames before `target`, then hand the first frame
        at or after it to the filter, if any. Only that frame is pushed;
        the discarded ones never reach the filter.
    */
    fn resync(&mut self, target: Pts) -> Result<Resync> {
        let mut discarded = 0u64;
        loop {
            if !self.source.advance()? {
                tracing::debug!(target = target.0, discarded, "end of stream while seeking");
                return Ok(Resync::EndOfStream);
            }
            match self.source.current().timestamp() {
                Some(ts) if ts < target => {
                    discarded += 1;
                    tracing::trace!(ts = ts.0, target = target.0, "discarding frame before seek target");
                }
                Some(_) => break,
                None => {
                    tracing::warn!(target = target.0, "frame without timestamp while seeking, using it");
                    break;
                }
            }
        }
        tracing::debug!(target = target.0, discarded, "seek resynchronized");

        let Some(filter) = self.filter.as_mut() else {
            return Ok(Resync::Source);
        };
        filter.push(self.source.current())?;
        if filter.pull()? {
            Ok(Resync::Filtered)
        } else {
            Ok(Resync::FilterNeedsInput)
        }
    }

    fn acquire(&mut self) -> Result<Option<Current<'_, S::Frame>>> {
        let Some(filter) = self.filter.as_mut() else {
            return Ok(if self.source.advance()? {
                Some(self.source_frame())
            } else {
                None
            });
        };
        while !filter.pull()? {
            if !self.source.advance()? {
                return Ok(None);
            }
            filter.push(self.source.current())?;
        }
        Ok(self.filtered_frame())
    }

    fn source_frame(&self) -> Current<'_, S::Frame> {
        Current {
            frame: self.source.current(),
            time_base: self.source.time_base(),
        }
    }

    fn filtered_frame(&self) -> Option<Current<'_, S::Frame>> {
        self.filter.as_ref().map(|filter| Current {
            frame: filter.current(),
            time_base: filter.time_base(),
        })
    }
}
