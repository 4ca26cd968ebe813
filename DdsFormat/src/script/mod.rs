//! Scripting parameter marshalling
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Write options travel to and from the host's action recorder as a
//! [`Descriptor`]. Reading fills [`WriteOptions`] from whatever keys are
//! present and decides whether the options dialog should still be shown;
//! writing hands a fresh descriptor back with the dialog marked optional.

mod descriptor;
pub mod keys;
mod schema;

pub use descriptor::{
    Descriptor, DescriptorError, DescriptorReader, DescriptorValue, TYPE_BOOLEAN, TYPE_INTEGER,
};
pub use schema::ScriptSchema;

use crate::host::FormatRecord;
use crate::options::WriteOptions;

/// How the host wants a recorded action played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayInfo {
    /// Play silently with the recorded values.
    DontDisplay,
    /// Show the dialog, seeded with the recorded values.
    #[default]
    Display,
    /// Play silently, errors included.
    Silent,
}

/// Dialog state the module records for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordInfo {
    #[default]
    DontDisplay,
    Display,
    /// The dialog may be skipped on playback.
    Optional,
}

/// Scripting state the host attaches to a [`FormatRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorParameters {
    pub descriptor: Option<Descriptor>,
    pub play_info: PlayInfo,
    pub record_info: RecordInfo,
}

impl DescriptorParameters {
    #[must_use]
    pub fn new(play_info: PlayInfo) -> Self {
        Self {
            play_info,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_descriptor(descriptor: Descriptor, play_info: PlayInfo) -> Self {
        Self {
            descriptor: Some(descriptor),
            play_info,
            record_info: RecordInfo::default(),
        }
    }
}

/// Apply the record's scripted parameters to `options`.
///
/// Returns whether the options dialog should be shown: always when the
/// host offers no scripting, otherwise only when playback asks for the
/// dialog. A missing-parameter error is tolerated; any other reader error
/// is returned.
pub fn read_script_params(
    record: &FormatRecord,
    options: &mut WriteOptions,
) -> Result<bool, DescriptorError> {
    let Some(params) = record.descriptor_parameters.as_ref() else {
        return Ok(true);
    };

    if let Some(descriptor) = params.descriptor.as_ref() {
        let schema = ScriptSchema::detect(descriptor);
        tracing::debug!("reading {} scripted parameters ({schema:?})", descriptor.len());
        match schema.decode(descriptor, options) {
            Ok(()) | Err(DescriptorError::MissingParameter(_)) => {}
            Err(err) => return Err(err),
        }
    }

    Ok(params.play_info == PlayInfo::Display)
}

/// Record `options` for playback in the given layout.
///
/// Does nothing when the host offers no scripting.
pub fn write_script_params(record: &mut FormatRecord, options: &WriteOptions, schema: ScriptSchema) {
    if let Some(params) = record.descriptor_parameters.as_mut() {
        params.descriptor = Some(schema.encode(options));
        params.record_info = RecordInfo::Optional;
    }
}
