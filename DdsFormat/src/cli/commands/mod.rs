pub mod decode;
pub mod encode;
pub mod info;
pub mod sniff;

use clap::Subcommand;
use std::path::PathBuf;

use crate::options::{AlphaMode, MipFilter, PixelFormat};

#[derive(Subcommand)]
pub enum Commands {
    /// Show header information of a DDS file
    Info {
        /// DDS file
        path: PathBuf,
    },

    /// Check whether a file would be accepted as DDS
    Sniff {
        /// File to check
        path: PathBuf,
    },

    /// Open a DDS file through the read phases and save it as PNG
    Decode {
        /// Source DDS file
        #[arg(short, long)]
        source: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        destination: PathBuf,

        /// How to load alpha (none, transparency, channel); defaults to the
        /// stored preferences
        #[arg(short, long)]
        alpha: Option<AlphaMode>,

        /// Prompt for the open options
        #[arg(short, long, conflicts_with = "alpha")]
        interactive: bool,
    },

    /// Save a PNG file as DDS through the options, estimate and write phases
    Encode {
        /// Source PNG file
        #[arg(short, long)]
        source: PathBuf,

        /// Output DDS file
        #[arg(short, long)]
        destination: PathBuf,

        /// Pixel format (dxt1, dxt1a, dxt2..dxt5, dxt5a, 3dc, dxn, uncompressed)
        #[arg(short, long, default_value = "dxt5")]
        format: PixelFormat,

        /// Alpha source (none, transparency, channel)
        #[arg(short, long, default_value = "transparency")]
        alpha: AlphaMode,

        /// Premultiply colour by alpha
        #[arg(long)]
        premultiply: bool,

        /// Generate a full mipmap chain
        #[arg(short, long)]
        mipmap: bool,

        /// Mipmap filter (box, tent, lanczos4, mitchell, kaiser)
        #[arg(long, default_value = "mitchell")]
        filter: MipFilter,

        /// Treat the image as a vertical strip of six cube faces
        #[arg(short, long)]
        cubemap: bool,

        /// Hand the PNG's alpha to the module as an extra channel instead of
        /// layer transparency
        #[arg(long)]
        alpha_channel: bool,

        /// Prompt for the save options instead of passing them as a script
        #[arg(short, long)]
        interactive: bool,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Info { path } => info::execute(path),
            Commands::Sniff { path } => sniff::execute(path),
            Commands::Decode {
                source,
                destination,
                alpha,
                interactive,
            } => decode::execute(source, destination, *alpha, *interactive),
            Commands::Encode {
                source,
                destination,
                format,
                alpha,
                premultiply,
                mipmap,
                filter,
                cubemap,
                alpha_channel,
                interactive,
            } => encode::execute(
                source,
                destination,
                &encode::EncodeArgs {
                    format: *format,
                    alpha: *alpha,
                    premultiply: *premultiply,
                    mipmap: *mipmap,
                    filter: *filter,
                    cubemap: *cubemap,
                    alpha_channel: *alpha_channel,
                    interactive: *interactive,
                },
            ),
        }
    }
}

/// Turn a non-zero host result into an error carrying any reported messages.
pub(crate) fn check_result(
    action: &str,
    result: crate::host::ResultCode,
    errors: &[String],
) -> anyhow::Result<()> {
    if result.is_ok() {
        return Ok(());
    }
    match errors.last() {
        Some(message) => anyhow::bail!("{action} failed: {message}"),
        None => anyhow::bail!("{action} failed with {result:?} ({})", result.code()),
    }
}
