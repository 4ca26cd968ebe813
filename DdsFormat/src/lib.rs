#![allow(non_snake_case)]
//! # DdsFormat
//!
//! A DirectDraw Surface (DDS) file format module for image editors that
//! drive format plugins through a selector protocol.
//!
//! ## Overview
//!
//! - **Selector state machine** - one [`FormatModule::dispatch`] call per
//!   host selector (read, options, estimate, write, filter, about)
//! - **Option state** - read/write options persisted in the host's revert
//!   block between sessions
//! - **Scripting** - write options to and from typed key/value descriptors
//! - **Stream adapter** - byte-level access to the host's data fork
//! - **Texture codec** - DXT1-5, 3Dc/DXN, ATI1, swizzled DXT5 and
//!   uncompressed textures with mipmaps and cube maps
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::fs::File;
//! use ddsformat::prelude::*;
//!
//! let fork = File::options().read(true).write(true).open("rock.dds")?;
//! let mut host = DocumentHost::new(fork, HOST_EDITOR);
//! let mut module = FormatModule::new(AutoDialog::default());
//!
//! if host.open(&mut module).is_ok() {
//!     if let Some(document) = host.document() {
//!         println!("{}x{}", document.pixels.width(), document.pixels.height());
//!     }
//! }
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `ddsformat` command-line binary and terminal dialogs

pub mod error;
pub mod host;
pub mod options;
pub mod plugin;
pub mod script;
pub mod texture;
pub mod ui;

// Re-exports for convenience
pub use error::{Error, Result};
pub use plugin::{FormatModule, Session};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::host::{
        AlphaSource, DataFork, Document, DocumentHost, FormatHost, FormatRecord, HOST_EDITOR,
        HOST_SCRIPTING, ResultCode, Selector,
    };
    pub use crate::options::{AlphaMode, MipFilter, PixelFormat, ReadOptions, WriteOptions};
    pub use crate::plugin::{FormatModule, Session};
    pub use crate::script::{Descriptor, DescriptorParameters, PlayInfo, ScriptSchema};
    pub use crate::texture::{MipmappedTexture, TextureError};
    pub use crate::ui::{AutoDialog, OptionsDialog, ReadPreferences};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
