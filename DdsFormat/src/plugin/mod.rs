//! Format module entry point
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! The host calls [`FormatModule::dispatch`] once per selector. Per-document
//! state lives in a [`Session`] kept in a slot the host owns; it is created
//! on the first selector for a document and dropped with the slot.

mod estimate;
mod options;
mod read;
mod write;

pub use write::premultiply;

use crate::error::{Error, Result};
use crate::host::{FormatHost, FormatRecord, ResultCode, Selector};
use crate::options::{ReadOptions, WriteOptions};
use crate::ui::OptionsDialog;

/// Longest message the host can display.
pub const MAX_ERROR_MESSAGE_LEN: usize = 255;

/// Options of the document being read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub read_options: ReadOptions,
    pub write_options: WriteOptions,
}

/// Everything a phase handler may touch.
pub(crate) struct Phase<'a> {
    pub record: &'a mut FormatRecord,
    pub session: &'a mut Session,
    pub host: &'a mut dyn FormatHost,
    pub dialog: &'a mut dyn OptionsDialog,
}

/// The DDS format module.
pub struct FormatModule<D: OptionsDialog> {
    dialog: D,
}

impl<D: OptionsDialog> FormatModule<D> {
    #[must_use]
    pub fn new(dialog: D) -> Self {
        Self { dialog }
    }

    pub fn dialog_mut(&mut self) -> &mut D {
        &mut self.dialog
    }

    /// Run one selector and return the host result code.
    ///
    /// `slot` holds the document's session between calls; an empty slot is
    /// filled after reserving storage from the host.
    pub fn dispatch(
        &mut self,
        selector: i16,
        record: &mut FormatRecord,
        slot: &mut Option<Session>,
        host: &mut dyn FormatHost,
    ) -> ResultCode {
        let selector = match Selector::try_from(selector) {
            Ok(selector) => selector,
            Err(err) => {
                tracing::warn!("{err}");
                return err.result_code();
            }
        };

        if selector == Selector::About {
            self.dialog.about(&about_text());
            return ResultCode::NoErr;
        }

        if slot.is_none() {
            if !host.reserve_storage(std::mem::size_of::<Session>()) {
                return Error::StorageUnavailable.result_code();
            }
            tracing::debug!("new session");
        }
        let session = slot.get_or_insert_with(Session::default);

        tracing::debug!("dispatching {selector:?}");
        let mut phase = Phase {
            record,
            session,
            host,
            dialog: &mut self.dialog,
        };

        match run_phase(selector, &mut phase) {
            Ok(()) => ResultCode::NoErr,
            Err(err) => {
                if let Error::Texture(texture) = &err {
                    report_codec_error(phase.host, &texture.to_string());
                }
                tracing::debug!("{selector:?} failed: {err}");
                err.result_code()
            }
        }
    }
}

fn run_phase(selector: Selector, phase: &mut Phase<'_>) -> Result<()> {
    match selector {
        Selector::ReadPrepare
        | Selector::OptionsPrepare
        | Selector::EstimatePrepare
        | Selector::WritePrepare => {
            phase.record.max_data = 0;
            Ok(())
        }
        Selector::FilterFile => read::filter_file(phase),
        Selector::ReadStart => read::read_start(phase),
        Selector::ReadContinue => read::read_continue(phase),
        Selector::OptionsStart => options::options_start(phase),
        Selector::EstimateStart => {
            estimate::estimate_start(phase.record);
            Ok(())
        }
        Selector::WriteStart => write::write_start(phase),
        Selector::WriteFinish => {
            write::write_finish(phase);
            Ok(())
        }
        Selector::About
        | Selector::ReadFinish
        | Selector::OptionsContinue
        | Selector::OptionsFinish
        | Selector::EstimateContinue
        | Selector::EstimateFinish
        | Selector::WriteContinue => Ok(()),
    }
}

fn about_text() -> String {
    format!("DDS format module {}", crate::VERSION)
}

/// Cut `message` to at most [`MAX_ERROR_MESSAGE_LEN`] bytes on a character
/// boundary.
#[must_use]
pub fn truncate_message(message: &str) -> &str {
    if message.len() <= MAX_ERROR_MESSAGE_LEN {
        return message;
    }
    let mut end = MAX_ERROR_MESSAGE_LEN;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

fn report_codec_error(host: &mut dyn FormatHost, message: &str) {
    host.report_error(truncate_message(message));
}
