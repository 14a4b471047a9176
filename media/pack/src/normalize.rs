use crate::layout::{Kind, Layout};

const UNIT_SCALE: f32 = 255.0;
const CHROMA_CENTRE: f32 = 128.0;

/**
    Rescale raw sample values in a packed float buffer.

    Luma, greyscale and RGB channels map to `[0, 1]`. YUV chroma channels map
    to `[-1, 1]` around the neutral value 128.
*/
pub(crate) fn normalize(data: &mut [f32], layout: &Layout) {
    let area = layout.width * layout.height;
    if area == 0 {
        return;
    }
    let centred_chroma = matches!(layout.kind, Kind::Yuv { .. });
    for (c, channel) in data.chunks_exact_mut(area).enumerate() {
        if centred_chroma && c > 0 {
            channel
                .iter_mut()
                .for_each(|v| *v = *v / CHROMA_CENTRE - 1.0);
        } else {
            channel.iter_mut().for_each(|v| *v /= UNIT_SCALE);
        }
    }
}
