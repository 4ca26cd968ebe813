//! Host side of the format protocol
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! The host application is abstracted behind [`FormatHost`]: it owns the
//! open file ([`DataFork`]), pulls or pushes pixels during
//! `advance_state`, reads extra channels and displays error messages. The
//! module never reaches the host through globals; everything arrives as an
//! argument of the dispatched phase.

mod document;
mod lease;
mod record;
mod result;
mod selector;
mod stream;

pub use document::{AlphaSource, DEFAULT_CHANNEL_NAME, Document, DocumentHost};
pub use lease::DataLease;
pub use record::{
    ChannelDesc, DocumentInfo, FormatRecord, HOST_EDITOR, HOST_SCRIPTING, ImageMode, ImageSize,
    OsType, Rect,
};
pub use result::ResultCode;
pub use selector::Selector;
pub use stream::{DataFork, ForkStream, StreamAccess};

/// Result of a host callback.
pub type HostResult<T> = std::result::Result<T, ResultCode>;

/// Pixel memory lent to the host for one `advance_state` round trip.
pub enum PixelData<'a> {
    /// Decoded pixels the host copies into the document (read path).
    Source(&'a [u8]),
    /// A buffer the host fills from the document (write path).
    Sink(&'a mut [u8]),
}

impl PixelData<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Source(data) => data.len(),
            Self::Sink(data) => data.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Destination layout for a channel read, expressed in bits as the host
/// expects.
pub struct PixelMemory<'a> {
    pub data: &'a mut [u8],
    pub row_bits: i32,
    pub col_bits: i32,
    pub bit_offset: i32,
    pub depth: i32,
}

impl PixelMemory<'_> {
    /// Byte index of pixel `(x, y)` within `data`.
    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        let row = (self.row_bits / 8) as usize;
        let col = (self.col_bits / 8) as usize;
        let offset = (self.bit_offset / 8) as usize;
        y * row + x * col + offset
    }
}

/// Callbacks the host offers to a format module.
pub trait FormatHost {
    /// Reserve per-document storage before the first phase of a document.
    fn reserve_storage(&mut self, _bytes: usize) -> bool {
        true
    }

    /// The file being read or written.
    fn data_fork(&mut self) -> &mut dyn DataFork;

    /// Exchange the pixels described by `record` (plane range, strides,
    /// rectangle) with the document.
    fn advance_state(&mut self, record: &FormatRecord, data: PixelData<'_>) -> HostResult<()>;

    /// Read the pixels of an extra channel into `memory`, returning the
    /// rectangle actually written.
    fn read_channel_pixels(
        &mut self,
        _channel: &ChannelDesc,
        _rect: Rect,
        _memory: PixelMemory<'_>,
    ) -> HostResult<Rect> {
        Err(ResultCode::ParamErr)
    }

    /// Show an error message (at most 255 bytes) to the user.
    fn report_error(&mut self, message: &str);
}
