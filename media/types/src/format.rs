/*!
    Pixel format types.
*/

use std::fmt;

/**
    Video pixel formats.

    The packing routines support [`Rgb24`](Self::Rgb24), [`Gray8`](Self::Gray8),
    [`Yuv444p`](Self::Yuv444p), [`Yuv420p`](Self::Yuv420p) and
    [`Yuv422p`](Self::Yuv422p). The remaining variants exist so that decoded
    frames in other layouts can still be described and rejected precisely.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed BGR, 24bpp
    Bgr24,
    /// Packed RGBA, 32bpp
    Rgba,
    /// Packed BGRA, 32bpp
    Bgra,
    /// Greyscale, 8bpp
    Gray8,
    /// Planar YUV 4:2:0, 12bpp
    Yuv420p,
    /// Planar YUV 4:2:2, 16bpp
    Yuv422p,
    /// Planar YUV 4:4:4, 24bpp
    Yuv444p,
    /// Planar YUV 4:2:0, full range
    Yuvj420p,
    /// Semi-planar YUV 4:2:0
    Nv12,
    /// Planar YUV 4:2:0, 10-bit little endian
    Yuv420p10,
    /// Any format not listed above
    Unknown,
}

/**
    Static layout description of a pixel format.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormatDescriptor {
    /// Components are R, G, B (and maybe A) rather than Y, U, V.
    pub rgb: bool,
    /// Components live in separate planes.
    pub planar: bool,
    /// Number of colour components.
    pub components: u8,
    /// Horizontal chroma subsampling as a power of two.
    pub log2_chroma_w: u8,
    /// Vertical chroma subsampling as a power of two.
    pub log2_chroma_h: u8,
}

impl PixelFormatDescriptor {
    const fn new(rgb: bool, planar: bool, components: u8, log2_w: u8, log2_h: u8) -> Self {
        Self {
            rgb,
            planar,
            components,
            log2_chroma_w: log2_w,
            log2_chroma_h: log2_h,
        }
    }

    /**
        Returns true for interleaved RGB layouts.
    */
    pub const fn is_packed_rgb(&self) -> bool {
        self.rgb && !self.planar
    }

    /**
        Returns true for layouts with a luma channel and at least one
        colour-difference channel.
    */
    pub const fn is_yuv(&self) -> bool {
        !self.rgb && self.components >= 2
    }
}

impl PixelFormat {
    /**
        Returns the layout descriptor for this format.
    */
    pub const fn descriptor(self) -> PixelFormatDescriptor {
        match self {
            Self::Rgb24 | Self::Bgr24 => PixelFormatDescriptor::new(true, false, 3, 0, 0),
            Self::Rgba | Self::Bgra => PixelFormatDescriptor::new(true, false, 4, 0, 0),
            Self::Gray8 => PixelFormatDescriptor::new(false, false, 1, 0, 0),
            Self::Yuv420p | Self::Yuvj420p | Self::Nv12 | Self::Yuv420p10 => {
                PixelFormatDescriptor::new(false, true, 3, 1, 1)
            }
            Self::Yuv422p => PixelFormatDescriptor::new(false, true, 3, 1, 0),
            Self::Yuv444p => PixelFormatDescriptor::new(false, true, 3, 0, 0),
            Self::Unknown => PixelFormatDescriptor::new(false, false, 0, 0, 0),
        }
    }

    /**
        Returns true if frames in this format can be packed into buffers.
    */
    pub const fn is_packable(self) -> bool {
        matches!(
            self,
            Self::Rgb24 | Self::Gray8 | Self::Yuv444p | Self::Yuv420p | Self::Yuv422p
        )
    }

    /**
        Returns the FFmpeg name of this format.
    */
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rgb24 => "rgb24",
            Self::Bgr24 => "bgr24",
            Self::Rgba => "rgba",
            Self::Bgra => "bgra",
            Self::Gray8 => "gray",
            Self::Yuv420p => "yuv420p",
            Self::Yuv422p => "yuv422p",
            Self::Yuv444p => "yuv444p",
            Self::Yuvj420p => "yuvj420p",
            Self::Nv12 => "nv12",
            Self::Yuv420p10 => "yuv420p10le",
            Self::Unknown => "unknown",
        }
    }

    /**
        Looks up a format by its FFmpeg name. `gray8` is accepted as an
        alias for `gray`.
    */
    pub fn from_name(name: &str) -> Option<Self> {
        let format = match name {
            "rgb24" => Self::Rgb24,
            "bgr24" => Self::Bgr24,
            "rgba" => Self::Rgba,
            "bgra" => Self::Bgra,
            "gray" | "gray8" => Self::Gray8,
            "yuv420p" => Self::Yuv420p,
            "yuv422p" => Self::Yuv422p,
            "yuv444p" => Self::Yuv444p,
            "yuvj420p" => Self::Yuvj420p,
            "nv12" => Self::Nv12,
            "yuv420p10le" => Self::Yuv420p10,
            _ => return None,
        };
        Some(format)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
