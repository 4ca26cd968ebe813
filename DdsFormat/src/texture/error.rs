//! Texture codec errors
//!
//! The `Display` text of every variant is the message shown to the user
//! when a read or write fails.

use thiserror::Error;

/// Error raised by [`super::MipmappedTexture`].
#[derive(Error, Debug)]
pub enum TextureError {
    /// The stream is not a readable DDS file.
    #[error("{0}")]
    Decode(String),

    /// The texture could not be compressed or serialised.
    #[error("{0}")]
    Encode(String),

    /// The file uses a pixel format the codec cannot decode.
    #[error("unsupported DDS pixel format: {0}")]
    Unsupported(String),

    /// A surface was requested that the texture does not have.
    #[error("texture has no face {face} level {level}")]
    MissingSurface { face: usize, level: usize },

    #[error("invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying stream failed.
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
}

impl TextureError {
    pub(crate) fn from_dds(context: &str, err: &ddsfile::Error) -> Self {
        Self::Decode(format!("{context}: {err}"))
    }
}
