use super::state::{EditState, Sign};
use std::fmt;

/// Ordered colour adjustment: brightness, saturate, invert, grayscale.
///
/// Values are percentages; the order of the stages is fixed because invert
/// and grayscale do not commute with the multiplicative stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorFilter {
    pub brightness: u16,
    pub saturate: u16,
    pub invert: u16,
    pub grayscale: u16,
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self {
            brightness: 100,
            saturate: 100,
            invert: 0,
            grayscale: 0,
        }
    }
}

impl ColorFilter {
    pub const fn is_identity(self) -> bool {
        self.brightness == 100 && self.saturate == 100 && self.invert == 0 && self.grayscale == 0
    }
}

impl fmt::Display for ColorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "brightness({}%) saturate({}%) invert({}%) grayscale({}%)",
            self.brightness, self.saturate, self.invert, self.grayscale
        )
    }
}

/// Rotation followed by an axis-aligned mirror, applied around the image centre.
///
/// Maps a centred point `p` to `R(rotate) * S(scale_x, scale_y) * p` in y-down
/// coordinates, so positive angles turn clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AffineTransform {
    pub rotate: i32,
    pub scale_x: Sign,
    pub scale_y: Sign,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self {
            rotate: 0,
            scale_x: Sign::Positive,
            scale_y: Sign::Positive,
        }
    }
}

impl AffineTransform {
    /// Quarter turns clockwise in `0..4`.
    pub const fn quarter_turns(self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (self.rotate / 90).rem_euclid(4) as u8
        }
    }

    /// Exact `(cos, sin)` of the rotation; the angle is always a quarter turn.
    pub const fn cos_sin(self) -> (f32, f32) {
        match self.quarter_turns() {
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            3 => (0.0, -1.0),
            _ => (1.0, 0.0),
        }
    }

    /// Row-major 2x2 linear part `[[a, b], [c, d]]` of `R * S`.
    pub fn linear(self) -> [[f32; 2]; 2] {
        let (cos, sin) = self.cos_sin();
        let sx = f32::from(self.scale_x.value());
        let sy = f32::from(self.scale_y.value());
        [[cos * sx, -sin * sy], [sin * sx, cos * sy]]
    }

    /// Map a point given relative to the image centre.
    pub fn apply(self, x: f32, y: f32) -> (f32, f32) {
        let [[a, b], [c, d]] = self.linear();
        (a.mul_add(x, b * y), c.mul_add(x, d * y))
    }

    /// Map a destination point (relative to the centre) back into source space.
    ///
    /// The linear part is orthogonal, so its inverse is the transpose.
    pub fn invert_point(self, x: f32, y: f32) -> (f32, f32) {
        let [[a, b], [c, d]] = self.linear();
        (a.mul_add(x, c * y), b.mul_add(x, d * y))
    }

    /// Whether width and height trade places on screen.
    pub const fn swaps_axes(self) -> bool {
        self.quarter_turns() % 2 == 1
    }

    pub const fn is_identity(self) -> bool {
        self.quarter_turns() == 0
            && !self.scale_x.is_mirrored()
            && !self.scale_y.is_mirrored()
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rotate({}deg) scale({}, {})",
            self.rotate,
            self.scale_x.value(),
            self.scale_y.value()
        )
    }
}

/// Derive both render descriptors from the edit state.
pub fn compile(state: &EditState) -> (ColorFilter, AffineTransform) {
    (color_filter(state), affine_transform(state))
}

pub const fn color_filter(state: &EditState) -> ColorFilter {
    ColorFilter {
        brightness: state.brightness(),
        saturate: state.saturation(),
        invert: state.inversion(),
        grayscale: state.gray_scale(),
    }
}

pub const fn affine_transform(state: &EditState) -> AffineTransform {
    AffineTransform {
        rotate: state.rotate(),
        scale_x: state.flip_horizontal(),
        scale_y: state.flip_vertical(),
    }
}
