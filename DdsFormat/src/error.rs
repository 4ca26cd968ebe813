//! Error types for `DdsFormat`

use thiserror::Error;

use crate::host::ResultCode;
use crate::script::DescriptorError;
use crate::texture::TextureError;

/// The error type for `DdsFormat` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Host Protocol Errors ====================
    /// The stream does not start with the `"DDS "` magic.
    #[error("invalid DDS magic: expected \"DDS \", found {0:?}")]
    InvalidMagic([u8; 4]),

    /// The selector value is outside the format protocol's range.
    #[error("unknown format selector: {0}")]
    UnknownSelector(i16),

    /// The host handed over a document the module cannot write.
    #[error("unsupported document: {reason}")]
    UnsupportedDocument {
        /// Why the document was rejected.
        reason: String,
    },

    /// The host could not reserve per-document storage.
    #[error("out of memory reserving session storage")]
    StorageUnavailable,

    /// The user dismissed an options dialog.
    #[error("user canceled")]
    UserCanceled,

    /// A host callback returned a non-zero result.
    #[error("host returned {0:?}")]
    Host(ResultCode),

    // ==================== Scripting Errors ====================
    /// A scripting descriptor could not be read.
    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    // ==================== Texture Errors ====================
    /// The texture codec failed to decode or encode.
    #[error(transparent)]
    Texture(#[from] TextureError),

    // ==================== Preferences Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// The host result code this error maps to.
    #[must_use]
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::InvalidMagic(_) => ResultCode::FormatCannotRead,
            Self::UnknownSelector(_) | Self::UnsupportedDocument { .. } => {
                ResultCode::FormatBadParameters
            }
            Self::StorageUnavailable => ResultCode::MemFull,
            Self::UserCanceled => ResultCode::UserCanceled,
            Self::Host(code) => *code,
            Self::Descriptor(err) => err.result_code(),
            Self::Texture(_) => ResultCode::ErrReportString,
            Self::Io(_) | Self::JsonError(_) => ResultCode::ParamErr,
        }
    }
}

/// A specialized Result type for `DdsFormat` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_codes() {
        assert_eq!(
            Error::InvalidMagic(*b"PNG ").result_code(),
            ResultCode::FormatCannotRead
        );
        assert_eq!(
            Error::UnknownSelector(42).result_code(),
            ResultCode::FormatBadParameters
        );
        assert_eq!(Error::StorageUnavailable.result_code(), ResultCode::MemFull);
        assert_eq!(Error::UserCanceled.result_code(), ResultCode::UserCanceled);
        assert_eq!(
            Error::Host(ResultCode::MemFull).result_code(),
            ResultCode::MemFull
        );
        assert_eq!(
            Error::Texture(TextureError::Decode("bad".to_string())).result_code(),
            ResultCode::ErrReportString
        );
    }

    #[test]
    fn test_texture_error_is_transparent() {
        let err = Error::from(TextureError::Decode("unsupported pixel format".to_string()));
        assert_eq!(err.to_string(), "unsupported pixel format");
    }
}
