//! The two descriptor layouts understood by the module

use super::descriptor::{Descriptor, DescriptorError};
use super::keys::{
    KEY_ALPHA, KEY_CUBEMAP, KEY_FILTER, KEY_FORMAT, KEY_MIPMAP, KEY_PREMULTIPLY, TYPE_ALPHA,
    TYPE_FILTER, TYPE_FORMAT, alpha_from_key, alpha_to_key, filter_from_key, filter_to_key,
    format_from_key, format_to_key,
};
use crate::host::OsType;
use crate::options::{AlphaMode, WriteOptions};

/// Descriptor layout version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptSchema {
    /// Format, mipmap and alpha only.
    Legacy,
    /// All six write options.
    #[default]
    Extended,
}

impl ScriptSchema {
    /// Keys belonging to this layout.
    #[must_use]
    pub const fn keys(self) -> &'static [OsType] {
        match self {
            Self::Legacy => &[KEY_FORMAT, KEY_MIPMAP, KEY_ALPHA],
            Self::Extended => &[
                KEY_FORMAT,
                KEY_ALPHA,
                KEY_PREMULTIPLY,
                KEY_MIPMAP,
                KEY_FILTER,
                KEY_CUBEMAP,
            ],
        }
    }

    /// Any extended-only key marks the descriptor as extended.
    #[must_use]
    pub fn detect(descriptor: &Descriptor) -> Self {
        if [KEY_PREMULTIPLY, KEY_FILTER, KEY_CUBEMAP]
            .into_iter()
            .any(|key| descriptor.contains(key))
        {
            Self::Extended
        } else {
            Self::Legacy
        }
    }

    /// Build the descriptor for `options`.
    #[must_use]
    pub fn encode(self, options: &WriteOptions) -> Descriptor {
        let mut descriptor = Descriptor::new();
        descriptor.put_enum(KEY_FORMAT, TYPE_FORMAT, format_to_key(options.format));
        descriptor.put_enum(KEY_ALPHA, TYPE_ALPHA, alpha_to_key(options.alpha));

        if self == Self::Extended && options.alpha != AlphaMode::None {
            descriptor.put_bool(KEY_PREMULTIPLY, options.premultiply);
        }

        descriptor.put_bool(KEY_MIPMAP, options.mipmap);

        if self == Self::Extended {
            if options.mipmap {
                descriptor.put_enum(KEY_FILTER, TYPE_FILTER, filter_to_key(options.filter));
            }
            descriptor.put_bool(KEY_CUBEMAP, options.cubemap);
        }
        descriptor
    }

    /// Apply every recognised key of `descriptor` to `options`, returning
    /// the reader's sticky error.
    pub fn decode(self, descriptor: &Descriptor, options: &mut WriteOptions) -> Result<(), DescriptorError> {
        let known = self.keys();
        let mut reader = descriptor.reader(&[]);

        while let Some((key, _type_id)) = reader.next_key() {
            if !known.contains(&key) {
                continue;
            }
            match key {
                KEY_FORMAT => {
                    if let Some(value) = reader.get_enum() {
                        options.format = format_from_key(value);
                    }
                }
                KEY_ALPHA => {
                    if let Some(value) = reader.get_enum() {
                        options.alpha = alpha_from_key(value);
                    }
                }
                KEY_PREMULTIPLY => {
                    if let Some(value) = reader.get_bool() {
                        options.premultiply = value;
                    }
                }
                KEY_MIPMAP => {
                    if let Some(value) = reader.get_bool() {
                        options.mipmap = value;
                    }
                }
                KEY_FILTER => {
                    if let Some(value) = reader.get_enum() {
                        options.filter = filter_from_key(value);
                    }
                }
                KEY_CUBEMAP => {
                    if let Some(value) = reader.get_bool() {
                        options.cubemap = value;
                    }
                }
                _ => {}
            }
        }
        reader.close()
    }
}
