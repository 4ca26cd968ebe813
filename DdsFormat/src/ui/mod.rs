//! Options dialogs
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! The module never draws UI itself; it asks an [`OptionsDialog`]. A dialog
//! edits a copy of the options and returns `true` when the user accepts, so
//! a cancelled dialog leaves the live options untouched.

mod prefs;
#[cfg(feature = "cli")]
mod terminal;

pub use prefs::ReadPreferences;
#[cfg(feature = "cli")]
pub use terminal::TerminalDialog;

use crate::options::{AlphaMode, MipFilter, PixelFormat, ReadOptions, WriteOptions};

/// Values shown by the open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadDialogParams {
    pub alpha: AlphaMode,
}

impl From<ReadOptions> for ReadDialogParams {
    fn from(options: ReadOptions) -> Self {
        Self {
            alpha: options.alpha,
        }
    }
}

impl From<ReadDialogParams> for ReadOptions {
    fn from(params: ReadDialogParams) -> Self {
        Self {
            alpha: params.alpha,
        }
    }
}

/// Values shown by the save dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteDialogParams {
    pub format: PixelFormat,
    pub alpha: AlphaMode,
    pub premultiply: bool,
    pub mipmap: bool,
    pub filter: MipFilter,
    pub cubemap: bool,
}

impl From<WriteOptions> for WriteDialogParams {
    fn from(options: WriteOptions) -> Self {
        Self {
            format: options.format,
            alpha: options.alpha,
            premultiply: options.premultiply,
            mipmap: options.mipmap,
            filter: options.filter,
            cubemap: options.cubemap,
        }
    }
}

impl From<WriteDialogParams> for WriteOptions {
    fn from(params: WriteDialogParams) -> Self {
        Self {
            format: params.format,
            alpha: params.alpha,
            premultiply: params.premultiply,
            mipmap: params.mipmap,
            filter: params.filter,
            cubemap: params.cubemap,
        }
    }
}

/// Formats offered by the save dialog, in display order.
pub const DIALOG_FORMATS: [PixelFormat; 10] = [
    PixelFormat::Dxt1,
    PixelFormat::Dxt1a,
    PixelFormat::Dxt2,
    PixelFormat::Dxt3,
    PixelFormat::Dxt4,
    PixelFormat::Dxt5,
    PixelFormat::Dxt5a,
    PixelFormat::ThreeDc,
    PixelFormat::Dxn,
    PixelFormat::Uncompressed,
];

/// Host-side UI for the options phases.
pub trait OptionsDialog {
    /// Ask how to open a texture. May answer from stored preferences
    /// without prompting.
    fn read_options(&mut self, params: &mut ReadDialogParams) -> bool;

    /// Ask how to save. `params.alpha` has already been passed through
    /// [`sanitize_alpha`].
    fn write_options(
        &mut self,
        params: &mut WriteDialogParams,
        have_transparency: bool,
        alpha_name: Option<&str>,
    ) -> bool;

    fn about(&mut self, version: &str);
}

/// Replace an alpha mode the document cannot provide.
///
/// Without transparency, `Transparency` falls back to the alpha channel if
/// there is one, else `None`. Without an alpha channel, `Channel` falls back
/// to transparency if there is some, else `None`.
#[must_use]
pub fn sanitize_alpha(alpha: AlphaMode, have_transparency: bool, alpha_name: Option<&str>) -> AlphaMode {
    match alpha {
        AlphaMode::Transparency if !have_transparency => {
            if alpha_name.is_some() {
                AlphaMode::Channel
            } else {
                AlphaMode::None
            }
        }
        AlphaMode::Channel if alpha_name.is_none() => {
            if have_transparency {
                AlphaMode::Transparency
            } else {
                AlphaMode::None
            }
        }
        other => other,
    }
}

/// Accepts every dialog without prompting; the open dialog answers from
/// the stored preferences.
#[derive(Debug, Clone, Default)]
pub struct AutoDialog {
    prefs: ReadPreferences,
}

impl AutoDialog {
    #[must_use]
    pub fn new(prefs: ReadPreferences) -> Self {
        Self { prefs }
    }
}

impl OptionsDialog for AutoDialog {
    fn read_options(&mut self, params: &mut ReadDialogParams) -> bool {
        params.alpha = self.prefs.alpha;
        true
    }

    fn write_options(
        &mut self,
        _params: &mut WriteDialogParams,
        _have_transparency: bool,
        _alpha_name: Option<&str>,
    ) -> bool {
        true
    }

    fn about(&mut self, version: &str) {
        tracing::info!("{version}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_without_transparency() {
        assert_eq!(
            sanitize_alpha(AlphaMode::Transparency, false, Some("Alpha 1")),
            AlphaMode::Channel
        );
        assert_eq!(sanitize_alpha(AlphaMode::Transparency, false, None), AlphaMode::None);
        assert_eq!(
            sanitize_alpha(AlphaMode::Transparency, true, None),
            AlphaMode::Transparency
        );
    }

    #[test]
    fn test_sanitize_without_channel() {
        assert_eq!(sanitize_alpha(AlphaMode::Channel, true, None), AlphaMode::Transparency);
        assert_eq!(sanitize_alpha(AlphaMode::Channel, false, None), AlphaMode::None);
        assert_eq!(
            sanitize_alpha(AlphaMode::Channel, false, Some("mask")),
            AlphaMode::Channel
        );
    }

    #[test]
    fn test_sanitize_keeps_none() {
        assert_eq!(sanitize_alpha(AlphaMode::None, false, None), AlphaMode::None);
        assert_eq!(sanitize_alpha(AlphaMode::None, true, Some("mask")), AlphaMode::None);
    }

    #[test]
    fn test_auto_dialog_uses_preferences() {
        let mut dialog = AutoDialog::new(ReadPreferences {
            alpha: AlphaMode::None,
            auto: true,
        });
        let mut params = ReadDialogParams::default();
        assert!(dialog.read_options(&mut params));
        assert_eq!(params.alpha, AlphaMode::None);
    }

    #[test]
    fn test_params_round_trip_options() {
        let options = WriteOptions {
            format: PixelFormat::Dxn,
            cubemap: true,
            ..WriteOptions::default()
        };
        assert_eq!(WriteOptions::from(WriteDialogParams::from(options)), options);
    }
}
