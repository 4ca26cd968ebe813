//! Host result codes
//!
//! The values are the host's own and are returned verbatim through the
//! dispatch entry point.

/// Result of a single selector call as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultCode {
    /// Phase completed.
    #[default]
    NoErr,
    /// The user dismissed a dialog.
    UserCanceled,
    /// Storage could not be allocated.
    MemFull,
    /// Generic parameter error.
    ParamErr,
    /// The selector or the document handed over is unusable.
    FormatBadParameters,
    /// The file is not one this module reads.
    FormatCannotRead,
    /// An error message was reported through the host.
    ErrReportString,
    /// A scripting descriptor lacks a required key.
    MissingParameter,
    /// A scripting descriptor value has an unexpected type.
    WrongType,
    /// Any other code a host callback produced.
    Other(i16),
}

impl ResultCode {
    /// Raw host value.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::NoErr => 0,
            Self::UserCanceled => -128,
            Self::MemFull => -108,
            Self::ParamErr => -50,
            Self::FormatBadParameters => -30500,
            Self::FormatCannotRead => -30501,
            Self::ErrReportString => -30904,
            Self::MissingParameter => -1715,
            Self::WrongType => -1703,
            Self::Other(code) => code,
        }
    }

    /// Whether the phase succeeded.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::NoErr)
    }
}

impl From<i16> for ResultCode {
    fn from(code: i16) -> Self {
        match code {
            0 => Self::NoErr,
            -128 => Self::UserCanceled,
            -108 => Self::MemFull,
            -50 => Self::ParamErr,
            -30500 => Self::FormatBadParameters,
            -30501 => Self::FormatCannotRead,
            -30904 => Self::ErrReportString,
            -1715 => Self::MissingParameter,
            -1703 => Self::WrongType,
            other => Self::Other(other),
        }
    }
}

impl From<ResultCode> for i16 {
    fn from(code: ResultCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_survive_conversion() {
        for code in [
            ResultCode::NoErr,
            ResultCode::UserCanceled,
            ResultCode::MemFull,
            ResultCode::ParamErr,
            ResultCode::FormatBadParameters,
            ResultCode::FormatCannotRead,
            ResultCode::ErrReportString,
            ResultCode::MissingParameter,
            ResultCode::WrongType,
        ] {
            assert_eq!(ResultCode::from(code.code()), code);
        }
    }

    #[test]
    fn test_unknown_code_is_kept() {
        assert_eq!(ResultCode::from(-9999), ResultCode::Other(-9999));
        assert_eq!(ResultCode::Other(-9999).code(), -9999);
    }
}
