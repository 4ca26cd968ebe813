//! CLI command running the module's file filter

use std::fs::File;
use std::path::Path;

use crate::host::{DocumentHost, FormatRecord, HOST_EDITOR, Selector};
use crate::plugin::FormatModule;
use crate::ui::AutoDialog;

/// Report whether the module would accept `path`
pub fn execute(path: &Path) -> anyhow::Result<()> {
    let file = File::open(path)?;
    let mut host = DocumentHost::new(file, HOST_EDITOR);
    let mut module = FormatModule::new(AutoDialog::default());
    let mut record = FormatRecord::new(HOST_EDITOR);
    let mut slot = None;

    let result = module.dispatch(Selector::FilterFile.value(), &mut record, &mut slot, &mut host);
    if result.is_ok() {
        println!("{}: DDS", path.display());
    } else {
        println!("{}: not a DDS file ({result:?})", path.display());
    }

    Ok(())
}
