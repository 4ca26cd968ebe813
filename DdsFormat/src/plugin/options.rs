//! Save options phase

use super::Phase;
use crate::error::{Error, Result};
use crate::host::{FormatRecord, HOST_EDITOR};
use crate::options;
use crate::script::{ScriptSchema, read_script_params, write_script_params};
use crate::ui::{WriteDialogParams, sanitize_alpha};

/// Load the stored save options, apply scripting parameters and, unless
/// the script asked for silence, run the save dialog.
pub(super) fn options_start(phase: &mut Phase<'_>) -> Result<()> {
    options::load(phase.record, &mut phase.session.write_options);

    let show_dialog = read_script_params(phase.record, &mut phase.session.write_options)?;
    if !show_dialog {
        return Ok(());
    }

    let have_transparency = document_has_transparency(phase.record);
    let alpha_name = phase
        .record
        .document_info
        .as_ref()
        .and_then(|info| info.first_alpha_channel())
        .map(|channel| channel.name.clone());

    let mut params = WriteDialogParams::from(phase.session.write_options);
    params.alpha = sanitize_alpha(params.alpha, have_transparency, alpha_name.as_deref());

    if !phase
        .dialog
        .write_options(&mut params, have_transparency, alpha_name.as_deref())
    {
        return Err(Error::UserCanceled);
    }

    phase.session.write_options = params.into();
    options::save(phase.record, &phase.session.write_options);
    write_script_params(phase.record, &phase.session.write_options, ScriptSchema::Extended);
    Ok(())
}

/// The editor reports merged transparency directly; other hosts only tell
/// us through the plane count.
fn document_has_transparency(record: &FormatRecord) -> bool {
    if record.host_sig == HOST_EDITOR {
        record
            .document_info
            .as_ref()
            .is_some_and(|info| info.merged_transparency)
    } else {
        matches!(record.planes, 2 | 4)
    }
}
