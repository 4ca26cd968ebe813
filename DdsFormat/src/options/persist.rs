//! Fixed-size option records kept in the host's revert block
//!
//! A block whose length differs from the record is treated as absent:
//! that is how older or foreign layouts are kept from leaking into the
//! live options.

use super::{AlphaMode, MipFilter, PixelFormat, ReadOptions, WriteOptions};
use crate::host::FormatRecord;

/// Byte length of a persisted [`ReadOptions`] record.
pub const READ_RECORD_LEN: usize = 32;
/// Byte length of a persisted [`WriteOptions`] record.
pub const WRITE_RECORD_LEN: usize = 256;

/// Options with a fixed binary layout.
pub trait OptionRecord: Sized {
    /// Exact record length in bytes.
    const LEN: usize;

    /// Store the defined fields into a block of exactly [`Self::LEN`]
    /// bytes. Reserved bytes are left as they are.
    fn write_into(&self, bytes: &mut [u8]);

    /// Encode into a fresh record with the reserved bytes zeroed.
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; Self::LEN];
        self.write_into(&mut bytes);
        bytes
    }

    /// Decode a record of exactly [`Self::LEN`] bytes. Out-of-range enum
    /// bytes fall back to that field's default.
    fn from_bytes(bytes: &[u8]) -> Self;
}

impl OptionRecord for ReadOptions {
    const LEN: usize = READ_RECORD_LEN;

    fn write_into(&self, bytes: &mut [u8]) {
        bytes[0] = self.alpha.to_u8();
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            alpha: AlphaMode::from_u8(bytes[0]).unwrap_or_default(),
        }
    }
}

impl OptionRecord for WriteOptions {
    const LEN: usize = WRITE_RECORD_LEN;

    fn write_into(&self, bytes: &mut [u8]) {
        bytes[0] = self.format.to_u8();
        bytes[1] = self.alpha.to_u8();
        put_flag(&mut bytes[2], self.premultiply);
        put_flag(&mut bytes[3], self.mipmap);
        bytes[4] = self.filter.to_u8();
        put_flag(&mut bytes[5], self.cubemap);
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            format: PixelFormat::from_u8(bytes[0]).unwrap_or_default(),
            alpha: AlphaMode::from_u8(bytes[1]).unwrap_or_default(),
            premultiply: bytes[2] != 0,
            mipmap: bytes[3] != 0,
            filter: MipFilter::from_u8(bytes[4]).unwrap_or_default(),
            cubemap: bytes[5] != 0,
        }
    }
}

/// Any non-zero byte reads as `true`; an existing byte is only rewritten
/// when its truth value changes.
fn put_flag(byte: &mut u8, value: bool) {
    if (*byte != 0) != value {
        *byte = u8::from(value);
    }
}

/// Restore `options` from the record's revert block.
///
/// Returns `true` when a block of the exact record size was found and
/// copied; otherwise `options` keeps its current values.
pub fn load<T: OptionRecord>(record: &FormatRecord, options: &mut T) -> bool {
    match record.revert_info.as_deref() {
        Some(block) if block.len() == T::LEN => {
            *options = T::from_bytes(block);
            true
        }
        Some(block) => {
            tracing::debug!(
                "ignoring persisted options of {} bytes (expected {})",
                block.len(),
                T::LEN
            );
            false
        }
        None => false,
    }
}

/// Persist `options` into the record's revert block.
///
/// The block is allocated on first use and resized when its length does
/// not match. Only the defined field bytes are written, so reserved bytes
/// already in the block survive. Hosts without handle support get nothing
/// stored.
pub fn save<T: OptionRecord>(record: &mut FormatRecord, options: &T) {
    if !record.host_supports_handles {
        return;
    }
    let block = record.revert_info.get_or_insert_with(|| vec![0u8; T::LEN]);
    if block.len() != T::LEN {
        block.resize(T::LEN, 0);
    }
    options.write_into(block);
}
