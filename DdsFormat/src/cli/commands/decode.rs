//! CLI command: DDS to PNG through the read phases

use std::fs::File;
use std::path::Path;

use super::check_result;
use crate::host::{DocumentHost, HOST_EDITOR};
use crate::options::AlphaMode;
use crate::plugin::FormatModule;
use crate::ui::{AutoDialog, OptionsDialog, ReadPreferences, TerminalDialog};

/// Open `source` as a document and write its pixels to `destination`
pub fn execute(
    source: &Path,
    destination: &Path,
    alpha: Option<AlphaMode>,
    interactive: bool,
) -> anyhow::Result<()> {
    if interactive {
        return decode_with(source, destination, TerminalDialog::new());
    }

    let mut prefs = ReadPreferences::load();
    if let Some(alpha) = alpha {
        prefs.alpha = alpha;
    }
    decode_with(source, destination, AutoDialog::new(prefs))
}

fn decode_with<D: OptionsDialog>(source: &Path, destination: &Path, dialog: D) -> anyhow::Result<()> {
    let file = File::open(source)?;
    let mut host = DocumentHost::new(file, HOST_EDITOR);
    let mut module = FormatModule::new(dialog);

    let result = host.open(&mut module);
    check_result("open", result, host.errors())?;

    let document = host
        .take_document()
        .ok_or_else(|| anyhow::anyhow!("host received no pixels"))?;
    document.to_rgba().save(destination)?;

    tracing::info!(
        "{} -> {} ({}x{})",
        source.display(),
        destination.display(),
        document.pixels.width(),
        document.pixels.height()
    );
    Ok(())
}
