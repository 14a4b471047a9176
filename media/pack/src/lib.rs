/*!
    Channel-major packing of decoded video frames.

    This crate turns the planes of a decoded [`Frame`] into a dense buffer
    laid out as `channels × height × width`: all of channel 0, then all of
    channel 1, and so on. It never interleaves.

    Subsampled chroma is expanded to luma resolution by replication, so every
    channel in the output has the same width and height.

    # Example

    ```ignore
    use vidtensor_pack::{pack_bytes, pack_floats};

    let bytes = pack_bytes(&frame)?;
    assert_eq!(bytes.shape(), [3, frame.height as usize, frame.width as usize]);

    // Luma/RGB in [0, 1], YUV chroma in [-1, 1]
    let floats = pack_floats(&frame)?;
    ```

    # Supported Formats

    `rgb24`, `gray`, `yuv444p`, `yuv420p` and `yuv422p`. Anything else fails
    with [`Error::UnsupportedFormat`] before a single element is written.
*/

pub use vidtensor_types::{Error, Frame, PixelFormat, Result};

mod layout;
mod normalize;
mod walk;

use layout::Layout;

/**
    A packed frame: `channels × height × width` elements, channel-major.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct Packed<T> {
    pub data: Vec<T>,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl<T> Packed<T> {
    /**
        Returns `[channels, height, width]`.
    */
    pub fn shape(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }

    /**
        Returns the elements of channel `index`.

        # Panics

        Panics if `index >= channels`.
    */
    pub fn channel(&self, index: usize) -> &[T] {
        assert!(index < self.channels, "channel index out of range");
        let len = self.height * self.width;
        &self.data[index * len..(index + 1) * len]
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/**
    Returns the number of channels `frame` packs into.
*/
pub fn channel_count(frame: &Frame) -> Result<usize> {
    Layout::of(frame).map(|layout| layout.channels)
}

/**
    Returns the number of elements `frame` packs into.
*/
pub fn packed_len(frame: &Frame) -> Result<usize> {
    Layout::of(frame).map(|layout| layout.len())
}

/**
    Pack `frame` into a caller-allocated byte buffer.

    `dest` must hold exactly [`packed_len`] elements. Returns the channel
    count. On error nothing has been written.
*/
pub fn pack_byte_into(dest: &mut [u8], frame: &Frame) -> Result<usize> {
    let layout = Layout::of(frame)?;
    layout.check_dest(dest.len())?;
    walk::pack(dest, frame, &layout);
    Ok(layout.channels)
}

/**
    Pack `frame` into a caller-allocated float buffer.

    Luma, greyscale and RGB channels are scaled to `[0, 1]`. For YUV frames
    the chroma channels are instead mapped to `[-1, 1]` by `v / 128 - 1`.
    `dest` must hold exactly [`packed_len`] elements. Returns the channel
    count. On error nothing has been written.
*/
pub fn pack_float_into(dest: &mut [f32], frame: &Frame) -> Result<usize> {
    let layout = Layout::of(frame)?;
    layout.check_dest(dest.len())?;
    walk::pack(dest, frame, &layout);
    normalize::normalize(dest, &layout);
    Ok(layout.channels)
}

/**
    Pack `frame` into a newly allocated byte buffer.
*/
pub fn pack_bytes(frame: &Frame) -> Result<Packed<u8>> {
    let layout = Layout::of(frame)?;
    let mut data = vec![0u8; layout.len()];
    walk::pack(&mut data, frame, &layout);
    Ok(layout.wrap(data))
}

/**
    Pack `frame` into a newly allocated, normalized float buffer.
*/
pub fn pack_floats(frame: &Frame) -> Result<Packed<f32>> {
    let layout = Layout::of(frame)?;
    let mut data = vec![0f32; layout.len()];
    walk::pack(&mut data, frame, &layout);
    normalize::normalize(&mut data, &layout);
    Ok(layout.wrap(data))
}
