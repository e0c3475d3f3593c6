use thiserror::Error;

/// Failures the editor reports to the user.
///
/// Intents issued without an image are not errors; they come back as
/// `Dispatch::Ignored`.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to load {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    #[error("Loading {source_name} failed: decoder worker disconnected")]
    LoaderDisconnected { source_name: String },

    #[error("PNG encode error: {0}")]
    Encode(String),
}
