use crate::edit::ColorFilter;
use rayon::prelude::*;

/// Minimum pixel count before parallelizing per-pixel colour work.
const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

type Matrix3 = [[f32; 3]; 3];

/// Coefficients for one `ColorFilter`, prepared once per buffer.
///
/// Each stage works on unpremultiplied sRGB in `[0, 1]` and clamps its
/// output before the next stage runs. Alpha is never touched.
#[derive(Debug, Clone, Copy)]
pub struct ColorKernel {
    brightness: Option<f32>,
    saturate: Option<Matrix3>,
    invert: Option<f32>,
    grayscale: Option<Matrix3>,
}

impl ColorKernel {
    pub fn new(filter: ColorFilter) -> Self {
        let brightness = percent(filter.brightness);
        let saturate = percent(filter.saturate);
        let invert = percent(filter.invert);
        let grayscale = percent(filter.grayscale);
        Self {
            brightness: (filter.brightness != 100).then_some(brightness),
            saturate: (filter.saturate != 100).then(|| saturate_matrix(saturate)),
            invert: (filter.invert != 0).then_some(invert),
            grayscale: (filter.grayscale != 0).then(|| grayscale_matrix(grayscale)),
        }
    }

    pub const fn is_identity(&self) -> bool {
        self.brightness.is_none()
            && self.saturate.is_none()
            && self.invert.is_none()
            && self.grayscale.is_none()
    }

    /// Filter one RGBA8 pixel.
    pub fn apply(&self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        if self.is_identity() {
            return [r, g, b, a];
        }
        let mut rgb = [unit(r), unit(g), unit(b)];
        if let Some(factor) = self.brightness {
            rgb = rgb.map(|c| (c * factor).clamp(0.0, 1.0));
        }
        if let Some(matrix) = &self.saturate {
            rgb = mul_clamped(matrix, rgb);
        }
        if let Some(amount) = self.invert {
            let slope = 2.0f32.mul_add(-amount, 1.0);
            rgb = rgb.map(|c| c.mul_add(slope, amount).clamp(0.0, 1.0));
        }
        if let Some(matrix) = &self.grayscale {
            rgb = mul_clamped(matrix, rgb);
        }
        let [r, g, b] = rgb.map(float_to_u8);
        [r, g, b, a]
    }
}

/// Apply a colour filter in place to a tightly packed RGBA8 buffer.
pub fn apply_color_filter(filter: ColorFilter, rgba: &mut [u8]) {
    let kernel = ColorKernel::new(filter);
    if kernel.is_identity() {
        return;
    }
    let filter_chunk = |px: &mut [u8]| {
        let out = kernel.apply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&out);
    };
    if rgba.len() / 4 >= PARALLEL_PIXEL_THRESHOLD {
        rgba.par_chunks_exact_mut(4).for_each(filter_chunk);
    } else {
        rgba.chunks_exact_mut(4).for_each(filter_chunk);
    }
}

fn percent(value: u16) -> f32 {
    f32::from(value) / 100.0
}

fn unit(value: u8) -> f32 {
    f32::from(value) / 255.0
}

fn float_to_u8(value: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

fn mul_clamped(m: &Matrix3, [r, g, b]: [f32; 3]) -> [f32; 3] {
    m.map(|row| {
        row[0]
            .mul_add(r, row[1].mul_add(g, row[2] * b))
            .clamp(0.0, 1.0)
    })
}

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [
            0.787f32.mul_add(s, 0.213),
            0.715f32.mul_add(-s, 0.715),
            0.072f32.mul_add(-s, 0.072),
        ],
        [
            0.213f32.mul_add(-s, 0.213),
            0.285f32.mul_add(s, 0.715),
            0.072f32.mul_add(-s, 0.072),
        ],
        [
            0.213f32.mul_add(-s, 0.213),
            0.715f32.mul_add(-s, 0.715),
            0.928f32.mul_add(s, 0.072),
        ],
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix3 {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    [
        [
            0.7874f32.mul_add(k, 0.2126),
            0.7152f32.mul_add(-k, 0.7152),
            0.0722f32.mul_add(-k, 0.0722),
        ],
        [
            0.2126f32.mul_add(-k, 0.2126),
            0.2848f32.mul_add(k, 0.7152),
            0.0722f32.mul_add(-k, 0.0722),
        ],
        [
            0.2126f32.mul_add(-k, 0.2126),
            0.7152f32.mul_add(-k, 0.7152),
            0.9278f32.mul_add(k, 0.0722),
        ],
    ]
}
