/// Accumulated rotation is folded back into this range to keep it bounded.
/// Multiple of 360, so the rendered geometry never changes when folding.
const ROTATION_FOLD_DEGREES: i32 = 360 * 100;

/// One of the four scalar colour adjustments driven by the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Brightness,
    Saturation,
    Inversion,
    GrayScale,
}

impl Channel {
    pub const ALL: [Self; 4] = [
        Self::Brightness,
        Self::Saturation,
        Self::Inversion,
        Self::GrayScale,
    ];

    /// Upper bound of the slider for this channel (percent).
    pub const fn max(self) -> u16 {
        match self {
            Self::Brightness | Self::Saturation => 200,
            Self::Inversion | Self::GrayScale => 100,
        }
    }

    /// Value the channel takes after a reset.
    pub const fn default_value(self) -> u16 {
        match self {
            Self::Brightness | Self::Saturation => 100,
            Self::Inversion | Self::GrayScale => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::Saturation => "Saturation",
            Self::Inversion => "Inversion",
            Self::GrayScale => "Grayscale",
        }
    }

    /// Clamp an arbitrary slider reading into this channel's range.
    pub fn clamp(self, value: i32) -> u16 {
        let clamped = value.clamp(0, i32::from(self.max()));
        u16::try_from(clamped).unwrap_or(self.max())
    }
}

/// Mirror factor along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub const fn value(self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }

    pub const fn is_mirrored(self) -> bool {
        matches!(self, Self::Negative)
    }
}

/// Adjustment values, geometry and the selected slider channel.
///
/// All setters keep the percent fields inside their channel range and the
/// rotation on a multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditState {
    brightness: u16,
    saturation: u16,
    inversion: u16,
    gray_scale: u16,
    rotate: i32,
    flip_horizontal: Sign,
    flip_vertical: Sign,
    selected: Channel,
}

impl Default for EditState {
    fn default() -> Self {
        Self {
            brightness: Channel::Brightness.default_value(),
            saturation: Channel::Saturation.default_value(),
            inversion: Channel::Inversion.default_value(),
            gray_scale: Channel::GrayScale.default_value(),
            rotate: 0,
            flip_horizontal: Sign::Positive,
            flip_vertical: Sign::Positive,
            selected: Channel::Brightness,
        }
    }
}

impl EditState {
    pub const fn brightness(&self) -> u16 {
        self.brightness
    }

    pub const fn saturation(&self) -> u16 {
        self.saturation
    }

    pub const fn inversion(&self) -> u16 {
        self.inversion
    }

    pub const fn gray_scale(&self) -> u16 {
        self.gray_scale
    }

    /// Accumulated rotation in degrees, always a multiple of 90.
    pub const fn rotate(&self) -> i32 {
        self.rotate
    }

    pub const fn flip_horizontal(&self) -> Sign {
        self.flip_horizontal
    }

    pub const fn flip_vertical(&self) -> Sign {
        self.flip_vertical
    }

    pub const fn selected(&self) -> Channel {
        self.selected
    }

    pub const fn value(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Brightness => self.brightness,
            Channel::Saturation => self.saturation,
            Channel::Inversion => self.inversion,
            Channel::GrayScale => self.gray_scale,
        }
    }

    pub const fn select(&mut self, channel: Channel) {
        self.selected = channel;
    }

    /// Write a value into one channel after clamping; returns the stored value.
    pub fn set_value(&mut self, channel: Channel, value: i32) -> u16 {
        let clamped = channel.clamp(value);
        match channel {
            Channel::Brightness => self.brightness = clamped,
            Channel::Saturation => self.saturation = clamped,
            Channel::Inversion => self.inversion = clamped,
            Channel::GrayScale => self.gray_scale = clamped,
        }
        clamped
    }

    /// Write a value into the currently selected channel.
    pub fn set_selected_value(&mut self, value: i32) -> u16 {
        self.set_value(self.selected, value)
    }

    pub fn rotate_left(&mut self) {
        self.rotate_by(-90);
    }

    pub fn rotate_right(&mut self) {
        self.rotate_by(90);
    }

    fn rotate_by(&mut self, degrees: i32) {
        let mut next = self.rotate + degrees;
        if next.abs() >= ROTATION_FOLD_DEGREES {
            next %= ROTATION_FOLD_DEGREES;
        }
        self.rotate = next;
    }

    pub const fn flip_h(&mut self) {
        self.flip_horizontal = self.flip_horizontal.toggled();
    }

    pub const fn flip_v(&mut self) {
        self.flip_vertical = self.flip_vertical.toggled();
    }

    /// Restore defaults for every adjustment and geometry field; selects brightness.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Quarter turns clockwise in `0..4`.
    pub const fn quarter_turns(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (self.rotate / 90).rem_euclid(4) as u8
        }
    }

    /// Whether `reset` would change anything, selection included.
    pub fn can_reset(&self) -> bool {
        *self != Self::default()
    }
}
