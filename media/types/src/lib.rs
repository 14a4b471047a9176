/*!
    Shared types for the vidtensor crates.

    This crate defines the vocabulary that crosses crate boundaries: decoded
    frames, pixel formats, timing, and the error enum. It has no dependency
    on FFmpeg, so the packing code and its tests can be built without the
    native libraries.

    # Core Types

    - [`Frame`] and [`Plane`] - Owned copy of a decoded picture
    - [`PixelFormat`] and [`PixelFormatDescriptor`] - Pixel layouts
    - [`Rational`] and [`Pts`] - Time bases and timestamps

    # Error Handling

    - [`Error`], [`ErrorKind`] and [`Result`] - Closed error enumeration
    - [`OpenStage`] - Which step of opening a media file failed
*/

mod error;
mod format;
mod frame;
mod rational;
mod timestamp;

pub use error::{Error, ErrorKind, OpenStage, Result};
pub use format::{PixelFormat, PixelFormatDescriptor};
pub use frame::{Frame, Plane};
pub use rational::Rational;
pub use timestamp::Pts;
