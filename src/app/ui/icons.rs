//! Unicode UI icon constants.
//!
//! Uses a BMP-only "safe" subset for broad font coverage (no emoji fonts needed).

pub const ICON_OPEN: &str = "▤";
pub const ICON_PASTE: &str = "⎘";
pub const ICON_ROTATE_CCW: &str = "↺";
pub const ICON_ROTATE_CW: &str = "↻";
pub const ICON_FLIP_H: &str = "⇆";
pub const ICON_FLIP_V: &str = "⇅";
pub const ICON_RESET: &str = "⟳";
pub const ICON_SAVE: &str = "⇩";
