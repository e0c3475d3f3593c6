mod export;
mod preview;

pub use export::ExportRenderer;
pub use preview::{PreviewRenderer, PreviewSurface};
