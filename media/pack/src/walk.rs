use vidtensor_types::Frame;

use crate::layout::{Kind, Layout};

/**
    Copy every channel of `frame` into `dest`, channel-major.

    Shared by the byte and float paths; the float path normalizes afterwards.
    The layout must have been built from `frame` and `dest` must hold exactly
    `layout.len()` elements.
*/
pub(crate) fn pack<T>(dest: &mut [T], frame: &Frame, layout: &Layout)
where
    T: Copy + From<u8>,
{
    let (width, height) = (layout.width, layout.height);
    let area = width * height;
    if area == 0 {
        return;
    }
    debug_assert_eq!(dest.len(), layout.len());

    let channels = dest.chunks_exact_mut(area);
    match layout.kind {
        Kind::PackedRgb => {
            let plane = &frame.planes[0];
            for (c, out) in channels.enumerate() {
                for (y, row) in out.chunks_exact_mut(width).enumerate() {
                    let src = plane.row(y);
                    for (x, value) in row.iter_mut().enumerate() {
                        *value = T::from(src[x * 3 + c]);
                    }
                }
            }
        }
        Kind::Gray => {
            let plane = &frame.planes[0];
            for out in channels {
                for (y, row) in out.chunks_exact_mut(width).enumerate() {
                    copy_row(row, &plane.row(y)[..width]);
                }
            }
        }
        Kind::Yuv { log2_w, log2_h } => {
            for (c, out) in channels.enumerate() {
                let plane = &frame.planes[c];
                let (sx, sy) = if c == 0 { (0, 0) } else { (log2_w, log2_h) };
                for (y, row) in out.chunks_exact_mut(width).enumerate() {
                    let src = plane.row(y >> sy);
                    if sx == 0 {
                        copy_row(row, &src[..width]);
                    } else {
                        for (x, value) in row.iter_mut().enumerate() {
                            *value = T::from(src[x >> sx]);
                        }
                    }
                }
            }
        }
    }
}

#[inline]
fn copy_row<T: From<u8>>(dest: &mut [T], src: &[u8]) {
    for (value, &byte) in dest.iter_mut().zip(src) {
        *value = T::from(byte);
    }
}
