//! Interactive dialogs on the terminal

use std::path::PathBuf;

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

use super::{DIALOG_FORMATS, OptionsDialog, ReadDialogParams, ReadPreferences, WriteDialogParams};
use crate::options::{AlphaMode, MipFilter};

/// Prompts with `dialoguer`. The open dialog is skipped when the stored
/// preferences say so.
pub struct TerminalDialog {
    prefs: ReadPreferences,
    prefs_path: Option<PathBuf>,
    theme: ColorfulTheme,
}

impl TerminalDialog {
    /// Dialog backed by the preferences file in the user's config directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_preferences_path(ReadPreferences::default_path())
    }

    #[must_use]
    pub fn with_preferences_path(prefs_path: Option<PathBuf>) -> Self {
        let prefs = prefs_path
            .as_deref()
            .map(ReadPreferences::load_from)
            .unwrap_or_default();
        Self {
            prefs,
            prefs_path,
            theme: ColorfulTheme::default(),
        }
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Option<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact_opt()
            .unwrap_or_else(|err| {
                tracing::warn!("prompt failed: {err}");
                None
            })
    }

    fn confirm(&self, prompt: &str, default: bool) -> Option<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_opt()
            .unwrap_or_else(|err| {
                tracing::warn!("prompt failed: {err}");
                None
            })
    }

    fn save_prefs(&self) {
        let Some(path) = self.prefs_path.as_deref() else {
            return;
        };
        if let Err(err) = self.prefs.save_to(path) {
            tracing::warn!("could not save preferences: {err}");
        }
    }
}

impl Default for TerminalDialog {
    fn default() -> Self {
        Self::new()
    }
}

const ALPHA_MODES: [AlphaMode; 3] = [AlphaMode::None, AlphaMode::Transparency, AlphaMode::Channel];

fn alpha_label(alpha: AlphaMode, channel_name: Option<&str>) -> String {
    match (alpha, channel_name) {
        (AlphaMode::None, _) => "None".to_string(),
        (AlphaMode::Transparency, _) => "Transparency".to_string(),
        (AlphaMode::Channel, Some(name)) => format!("Channel ({name})"),
        (AlphaMode::Channel, None) => "Alpha channel".to_string(),
    }
}

impl OptionsDialog for TerminalDialog {
    fn read_options(&mut self, params: &mut ReadDialogParams) -> bool {
        if self.prefs.auto {
            params.alpha = self.prefs.alpha;
            return true;
        }

        let labels: Vec<String> = ALPHA_MODES.iter().map(|a| alpha_label(*a, None)).collect();
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        let current = ALPHA_MODES.iter().position(|a| *a == params.alpha).unwrap_or(2);

        let Some(choice) = self.select("Load alpha as", &labels, current) else {
            return false;
        };
        let Some(remember) = self.confirm("Always use this setting", false) else {
            return false;
        };

        params.alpha = ALPHA_MODES[choice];
        self.prefs.alpha = params.alpha;
        self.prefs.auto = remember;
        self.save_prefs();
        true
    }

    fn write_options(
        &mut self,
        params: &mut WriteDialogParams,
        have_transparency: bool,
        alpha_name: Option<&str>,
    ) -> bool {
        let mut edited = *params;

        let formats: Vec<&str> = DIALOG_FORMATS.iter().map(|f| f.name()).collect();
        let current = DIALOG_FORMATS.iter().position(|f| *f == edited.format).unwrap_or(5);
        let Some(choice) = self.select("Format", &formats, current) else {
            return false;
        };
        edited.format = DIALOG_FORMATS[choice];

        let available: Vec<AlphaMode> = ALPHA_MODES
            .into_iter()
            .filter(|alpha| match alpha {
                AlphaMode::None => true,
                AlphaMode::Transparency => have_transparency,
                AlphaMode::Channel => alpha_name.is_some(),
            })
            .collect();
        if available.len() > 1 {
            let labels: Vec<String> = available.iter().map(|a| alpha_label(*a, alpha_name)).collect();
            let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
            let current = available.iter().position(|a| *a == edited.alpha).unwrap_or(0);
            let Some(choice) = self.select("Alpha", &labels, current) else {
                return false;
            };
            edited.alpha = available[choice];
        } else {
            edited.alpha = AlphaMode::None;
        }

        if edited.alpha != AlphaMode::None && !edited.format.is_premultiplied() {
            let Some(premultiply) = self.confirm("Premultiply", edited.premultiply) else {
                return false;
            };
            edited.premultiply = premultiply;
        }

        let Some(mipmap) = self.confirm("Generate mipmaps", edited.mipmap) else {
            return false;
        };
        edited.mipmap = mipmap;

        if edited.mipmap {
            let filters: Vec<&str> = MipFilter::ALL.iter().map(|f| f.name()).collect();
            let current = MipFilter::ALL.iter().position(|f| *f == edited.filter).unwrap_or(3);
            let Some(choice) = self.select("Mipmap filter", &filters, current) else {
                return false;
            };
            edited.filter = MipFilter::ALL[choice];
        }

        let Some(cubemap) = self.confirm("Cube map (vertical strip)", edited.cubemap) else {
            return false;
        };
        edited.cubemap = cubemap;

        *params = edited;
        true
    }

    fn about(&mut self, version: &str) {
        println!("{}", style("DDS format module").cyan().bold());
        println!("  {version}");
    }
}
