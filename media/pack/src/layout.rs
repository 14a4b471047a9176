use vidtensor_types::{Error, Frame, Result};

use crate::Packed;

/**
    How the planes of a frame map onto output channels.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    /// One interleaved plane with three bytes per pixel.
    PackedRgb,
    /// A single luma plane.
    Gray,
    /// Luma plus two subsampled chroma planes.
    Yuv { log2_w: u8, log2_h: u8 },
}

/**
    Validated packing layout of a frame.

    Building one checks everything that could go wrong while packing, so
    that the walk itself never fails halfway through a buffer.
*/
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub kind: Kind,
    pub channels: usize,
    pub width: usize,
    pub height: usize,
}

impl Layout {
    pub fn of(frame: &Frame) -> Result<Self> {
        if !frame.format.is_packable() {
            return Err(Error::UnsupportedFormat {
                format: frame.format,
            });
        }

        let descriptor = frame.descriptor();
        let kind = if descriptor.is_packed_rgb() {
            Kind::PackedRgb
        } else if descriptor.is_yuv() {
            Kind::Yuv {
                log2_w: descriptor.log2_chroma_w,
                log2_h: descriptor.log2_chroma_h,
            }
        } else {
            Kind::Gray
        };

        let width = frame.width as usize;
        let height = frame.height as usize;
        let channels = match kind {
            Kind::PackedRgb | Kind::Yuv { .. } => 3,
            Kind::Gray => 1,
        };

        let found = frame.channel_count();
        if found != channels {
            return Err(Error::invalid_frame(format!(
                "{} frame has {found} populated planes, expected {channels}",
                frame.format
            )));
        }

        let layout = Self {
            kind,
            channels,
            width,
            height,
        };
        layout.check_planes(frame)?;
        Ok(layout)
    }

    fn check_planes(&self, frame: &Frame) -> Result<()> {
        let needed = match self.kind {
            Kind::PackedRgb => vec![(self.height, self.width * 3)],
            Kind::Gray => vec![(self.height, self.width)],
            Kind::Yuv { log2_w, log2_h } => {
                let cw = self.width.div_ceil(1 << log2_w);
                let ch = self.height.div_ceil(1 << log2_h);
                vec![(self.height, self.width), (ch, cw), (ch, cw)]
            }
        };
        for (index, &(rows, row_len)) in needed.iter().enumerate() {
            let plane = &frame.planes[index];
            if !plane.holds(rows, row_len) {
                return Err(Error::invalid_frame(format!(
                    "plane {index} cannot hold {rows} rows of {row_len} bytes \
                     (stride {}, {} bytes)",
                    plane.stride,
                    plane.data.len()
                )));
            }
        }
        Ok(())
    }

    /**
        Returns the number of elements in the packed output.
    */
    pub fn len(&self) -> usize {
        self.channels * self.width * self.height
    }

    pub fn check_dest(&self, actual: usize) -> Result<()> {
        let expected = self.len();
        if actual != expected {
            return Err(Error::BufferSize { expected, actual });
        }
        Ok(())
    }

    pub fn wrap<T>(&self, data: Vec<T>) -> Packed<T> {
        Packed {
            data,
            channels: self.channels,
            height: self.height,
            width: self.width,
        }
    }
}
