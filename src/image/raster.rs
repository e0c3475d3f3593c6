use super::color::ColorKernel;
use crate::edit::{AffineTransform, ColorFilter};
use crate::util::u32_to_f32;
use image::RgbaImage;
use rayon::prelude::*;

/// Minimum pixel count before parallelizing the resampling pass.
const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

/// Draw `source` onto a transparent canvas of the same size, centred, through
/// `transform` (around the canvas centre) and `filter`.
///
/// Every destination pixel centre is mapped back into source space and
/// sampled with nearest-neighbour lookup. Destination pixels that land
/// outside the drawn rectangle stay fully transparent, so quarter turns of
/// non-square images are clipped to the original canvas.
pub fn draw_transformed(
    source: &RgbaImage,
    filter: ColorFilter,
    transform: AffineTransform,
) -> RgbaImage {
    if filter.is_identity() && transform.is_identity() {
        return source.clone();
    }
    let (width, height) = source.dimensions();
    let mut canvas = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return canvas;
    }

    let kernel = ColorKernel::new(filter);
    let half_w = u32_to_f32(width) / 2.0;
    let half_h = u32_to_f32(height) / 2.0;
    let w_f = u32_to_f32(width);
    let h_f = u32_to_f32(height);

    let sample = |dx: u32, dy: u32| -> [u8; 4] {
        let px = u32_to_f32(dx) + 0.5 - half_w;
        let py = u32_to_f32(dy) + 0.5 - half_h;
        let (sx, sy) = transform.invert_point(px, py);
        let u = sx + half_w;
        let v = sy + half_h;
        if !(0.0..w_f).contains(&u) || !(0.0..h_f).contains(&v) {
            return [0, 0, 0, 0];
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (ux, vy) = ((u.floor() as u32).min(width - 1), (v.floor() as u32).min(height - 1));
        kernel.apply(source.get_pixel(ux, vy).0)
    };

    let row_len = width as usize * 4;
    let fill_row = |(y, row): (usize, &mut [u8])| {
        let dy = u32::try_from(y).unwrap_or(u32::MAX);
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let dx = u32::try_from(x).unwrap_or(u32::MAX);
            px.copy_from_slice(&sample(dx, dy));
        }
    };

    let total_pixels = width as usize * height as usize;
    if total_pixels >= PARALLEL_PIXEL_THRESHOLD {
        canvas
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(fill_row);
    } else {
        canvas.chunks_exact_mut(row_len).enumerate().for_each(fill_row);
    }
    canvas
}
