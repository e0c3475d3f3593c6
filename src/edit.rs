mod compile;
mod state;

pub use compile::{AffineTransform, ColorFilter, compile};
pub use state::{Channel, EditState, Sign};
