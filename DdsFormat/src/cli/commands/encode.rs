//! CLI command: PNG to DDS through the options, estimate and write phases

use std::fs::File;
use std::path::Path;

use super::check_result;
use crate::host::{AlphaSource, DEFAULT_CHANNEL_NAME, Document, DocumentHost, HOST_EDITOR};
use crate::options::{AlphaMode, MipFilter, PixelFormat, WriteOptions};
use crate::plugin::FormatModule;
use crate::script::{DescriptorParameters, PlayInfo, ScriptSchema};
use crate::ui::{AutoDialog, OptionsDialog, TerminalDialog};

/// Save options collected from the command line.
#[derive(Debug, Clone, Copy)]
pub struct EncodeArgs {
    pub format: PixelFormat,
    pub alpha: AlphaMode,
    pub premultiply: bool,
    pub mipmap: bool,
    pub filter: MipFilter,
    pub cubemap: bool,
    pub alpha_channel: bool,
    pub interactive: bool,
}

impl EncodeArgs {
    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            format: self.format,
            alpha: self.alpha,
            premultiply: self.premultiply,
            mipmap: self.mipmap,
            filter: self.filter,
            cubemap: self.cubemap,
        }
    }
}

/// Save the image at `source` as a DDS file at `destination`
pub fn execute(source: &Path, destination: &Path, args: &EncodeArgs) -> anyhow::Result<()> {
    let pixels = image::open(source)?.to_rgba8();
    let has_alpha = pixels.pixels().any(|p| p.0[3] != 255);
    let alpha = match (has_alpha, args.alpha_channel) {
        (false, _) => AlphaSource::Opaque,
        (true, false) => AlphaSource::Transparency,
        (true, true) => AlphaSource::Channel(DEFAULT_CHANNEL_NAME.to_string()),
    };
    let document = Document::new(pixels, alpha);

    let fork = File::options()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(destination)?;
    let host = DocumentHost::new(fork, HOST_EDITOR).with_document(document);

    if args.interactive {
        return encode_with(host, TerminalDialog::new());
    }

    // Non-interactive saves replay the options as a silent script.
    let descriptor = ScriptSchema::Extended.encode(&args.write_options());
    let host = host.with_descriptor_parameters(DescriptorParameters::with_descriptor(
        descriptor,
        PlayInfo::DontDisplay,
    ));
    encode_with(host, AutoDialog::default())
}

fn encode_with<D: OptionsDialog>(mut host: DocumentHost<File>, dialog: D) -> anyhow::Result<()> {
    let mut module = FormatModule::new(dialog);
    let result = host.save(&mut module);
    check_result("save", result, host.errors())?;
    Ok(())
}
