/*!
    Decoded frame types.
*/

use crate::{PixelFormat, PixelFormatDescriptor, Pts, Rational};

/**
    One plane of a decoded picture.

    Rows start every `stride` bytes. The stride may exceed the number of
    meaningful bytes per row, and the final row may be shorter than a full
    stride.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    /// Distance between row starts in bytes.
    pub stride: usize,
    /// Raw sample bytes.
    pub data: Vec<u8>,
}

impl Plane {
    pub fn new(stride: usize, data: Vec<u8>) -> Self {
        Self { stride, data }
    }

    /**
        Returns the bytes from the start of row `y` to the end of the plane.

        # Panics

        Panics if row `y` starts past the end of the plane.
    */
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..]
    }

    /**
        Returns true if `rows` rows of `row_len` bytes fit in this plane.
    */
    pub fn holds(&self, rows: usize, row_len: usize) -> bool {
        if rows == 0 || row_len == 0 {
            return true;
        }
        self.stride >= row_len
            && (rows - 1)
                .checked_mul(self.stride)
                .and_then(|offset| offset.checked_add(row_len))
                .is_some_and(|needed| needed <= self.data.len())
    }
}

/**
    A decoded video frame.

    This is an owned copy: it stays valid after the session that produced it
    moves on to the next frame.
*/
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel format of the planes.
    pub format: PixelFormat,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Planes in format order (packed formats use a single plane).
    pub planes: Vec<Plane>,
    /// Presentation timestamp as stored in the stream.
    pub pts: Option<Pts>,
    /// Decoder's best guess at the presentation timestamp.
    pub best_effort_timestamp: Option<Pts>,
    /// Time base for interpreting the timestamps.
    pub time_base: Rational,
}

impl Frame {
    /**
        Create a new frame without timestamps.
    */
    pub fn new(
        format: PixelFormat,
        width: u32,
        height: u32,
        planes: Vec<Plane>,
        time_base: Rational,
    ) -> Self {
        Self {
            format,
            width,
            height,
            planes,
            pts: None,
            best_effort_timestamp: None,
            time_base,
        }
    }

    pub fn with_pts(mut self, pts: Option<Pts>) -> Self {
        self.pts = pts;
        self
    }

    pub fn with_best_effort_timestamp(mut self, timestamp: Option<Pts>) -> Self {
        self.best_effort_timestamp = timestamp;
        self
    }

    /**
        Returns the best-effort timestamp, falling back to the PTS.
    */
    pub fn timestamp(&self) -> Option<Pts> {
        self.best_effort_timestamp.or(self.pts)
    }

    /**
        Returns the timestamp in seconds, if the frame has one.
    */
    pub fn seconds(&self) -> Option<f64> {
        self.timestamp().map(|ts| ts.to_seconds(self.time_base))
    }

    /**
        Returns the presentation time as a Duration, if the frame has one.
    */
    pub fn presentation_time(&self) -> Option<std::time::Duration> {
        self.timestamp().map(|ts| ts.to_duration(self.time_base))
    }

    pub fn descriptor(&self) -> PixelFormatDescriptor {
        self.format.descriptor()
    }

    /**
        Returns the number of channels a packed copy of this frame has.

        Packed RGB layouts always give 3. Everything else gives the number of
        leading planes (up to four) whose stride is non-zero.
    */
    pub fn channel_count(&self) -> usize {
        if self.descriptor().is_packed_rgb() {
            return 3;
        }
        self.planes
            .iter()
            .take(4)
            .rposition(|plane| plane.stride != 0)
            .map_or(0, |last| last + 1)
    }

    /**
        Returns the number of elements a packed copy of this frame has.
    */
    pub fn packed_len(&self) -> usize {
        self.channel_count() * self.width as usize * self.height as usize
    }
}

static_assertions::assert_impl_all!(Frame: Send, Sync);
