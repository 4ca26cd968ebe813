//! An in-process host: an RGBA document plus a data fork
//!
//! [`DocumentHost`] plays the application's side of the protocol. It copies
//! lent pixels into its [`Document`] on open, fills the module's buffer from
//! the document on save, and drives the exact selector sequence the editor
//! issues for each.

use image::RgbaImage;

use super::record::{ChannelDesc, DocumentInfo, FormatRecord, ImageMode, ImageSize, OsType, Rect};
use super::result::ResultCode;
use super::selector::Selector;
use super::stream::DataFork;
use super::{FormatHost, HostResult, PixelData, PixelMemory};
use crate::plugin::{FormatModule, Session};
use crate::script::DescriptorParameters;
use crate::ui::OptionsDialog;

/// What the alpha component of a [`Document`]'s pixels means.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlphaSource {
    /// No alpha; the component is ignored.
    #[default]
    Opaque,
    /// Merged layer transparency.
    Transparency,
    /// An extra channel with the given name.
    Channel(String),
}

/// Name given to the alpha channel of an opened texture.
pub const DEFAULT_CHANNEL_NAME: &str = "Alpha 1";

/// Pixels of an open document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub pixels: RgbaImage,
    pub alpha: AlphaSource,
}

impl Document {
    #[must_use]
    pub fn new(pixels: RgbaImage, alpha: AlphaSource) -> Self {
        Self { pixels, alpha }
    }

    #[must_use]
    pub fn has_transparency(&self) -> bool {
        self.alpha == AlphaSource::Transparency
    }

    #[must_use]
    pub fn alpha_channel_name(&self) -> Option<&str> {
        match &self.alpha {
            AlphaSource::Channel(name) => Some(name),
            _ => None,
        }
    }

    /// Pixels with the alpha component forced opaque when it carries nothing.
    #[must_use]
    pub fn to_rgba(&self) -> RgbaImage {
        let mut pixels = self.pixels.clone();
        if self.alpha == AlphaSource::Opaque {
            for pixel in pixels.pixels_mut() {
                pixel.0[3] = 255;
            }
        }
        pixels
    }

    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            merged_transparency: self.has_transparency(),
            alpha_channels: self
                .alpha_channel_name()
                .map(|name| ChannelDesc {
                    name: name.to_string(),
                    port: 0,
                })
                .into_iter()
                .collect(),
        }
    }
}

/// A host backed by a [`Document`] and a [`DataFork`].
pub struct DocumentHost<F: DataFork> {
    fork: F,
    host_sig: OsType,
    document: Option<Document>,
    descriptor_parameters: Option<DescriptorParameters>,
    revert_info: Option<Vec<u8>>,
    storage_available: bool,
    errors: Vec<String>,
}

impl<F: DataFork> DocumentHost<F> {
    #[must_use]
    pub fn new(fork: F, host_sig: OsType) -> Self {
        Self {
            fork,
            host_sig,
            document: None,
            descriptor_parameters: None,
            revert_info: None,
            storage_available: true,
            errors: Vec::new(),
        }
    }

    /// Document to be saved.
    #[must_use]
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    /// Offer scripting to the module.
    #[must_use]
    pub fn with_descriptor_parameters(mut self, params: DescriptorParameters) -> Self {
        self.descriptor_parameters = Some(params);
        self
    }

    /// Make session storage reservation fail.
    pub fn set_storage_available(&mut self, available: bool) {
        self.storage_available = available;
    }

    #[must_use]
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn take_document(&mut self) -> Option<Document> {
        self.document.take()
    }

    /// Scripting state after the last open or save.
    #[must_use]
    pub fn descriptor_parameters(&self) -> Option<&DescriptorParameters> {
        self.descriptor_parameters.as_ref()
    }

    /// Options block the module persisted during the last open or save.
    #[must_use]
    pub fn revert_info(&self) -> Option<&[u8]> {
        self.revert_info.as_deref()
    }

    /// Messages the module reported.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn fork(&self) -> &F {
        &self.fork
    }

    #[must_use]
    pub fn into_fork(self) -> F {
        self.fork
    }

    /// Read the fork into a new document.
    pub fn open<D: OptionsDialog>(&mut self, module: &mut FormatModule<D>) -> ResultCode {
        let mut record = self.new_record();
        self.document = None;
        self.run(module, &mut record, &Selector::READ_SEQUENCE)
    }

    /// Write the current document to the fork.
    pub fn save<D: OptionsDialog>(&mut self, module: &mut FormatModule<D>) -> ResultCode {
        let Some(document) = self.document.as_ref() else {
            return ResultCode::ParamErr;
        };

        let mut record = self.new_record();
        record.image_mode = ImageMode::RgbColor;
        record.depth = 8;
        record.image_size = ImageSize::new(document.pixels.width(), document.pixels.height());
        record.planes = if document.has_transparency() { 4 } else { 3 };
        record.document_info = Some(document.info());
        record.channel_ports = true;

        self.run(module, &mut record, &Selector::WRITE_SEQUENCE)
    }

    fn new_record(&self) -> FormatRecord {
        let mut record = FormatRecord::new(self.host_sig);
        record.descriptor_parameters = self.descriptor_parameters.clone();
        record.revert_info = self.revert_info.clone();
        record
    }

    fn run<D: OptionsDialog>(
        &mut self,
        module: &mut FormatModule<D>,
        record: &mut FormatRecord,
        sequence: &[Selector],
    ) -> ResultCode {
        let mut slot: Option<Session> = None;
        let mut result = ResultCode::NoErr;

        for &selector in sequence {
            result = module.dispatch(selector.value(), record, &mut slot, self);
            if !result.is_ok() {
                tracing::debug!("{selector:?} stopped the sequence with {result:?}");
                break;
            }
        }

        self.revert_info = record.revert_info.take();
        self.descriptor_parameters = record.descriptor_parameters.take();
        result
    }

    fn receive(&mut self, record: &FormatRecord, data: &[u8]) -> HostResult<()> {
        let (width, height) = (record.width(), record.height());
        let mut pixels = RgbaImage::from_pixel(
            u32::try_from(width).map_err(|_| ResultCode::ParamErr)?,
            u32::try_from(height).map_err(|_| ResultCode::ParamErr)?,
            image::Rgba([0, 0, 0, 255]),
        );

        for_each_sample(record, |x, y, plane, offset| {
            let value = *data.get(offset).ok_or(ResultCode::ParamErr)?;
            pixels.get_pixel_mut(x, y).0[plane] = value;
            Ok(())
        })?;

        let alpha = match (record.planes, record.transparency_plane) {
            (4.., Some(_)) => AlphaSource::Transparency,
            (4.., None) => AlphaSource::Channel(DEFAULT_CHANNEL_NAME.to_string()),
            _ => AlphaSource::Opaque,
        };
        self.document = Some(Document::new(pixels, alpha));
        Ok(())
    }

    fn fill(&self, record: &FormatRecord, data: &mut [u8]) -> HostResult<()> {
        let document = self.document.as_ref().ok_or(ResultCode::ParamErr)?;
        let transparency = document.has_transparency();

        for_each_sample(record, |x, y, plane, offset| {
            let pixel = document
                .pixels
                .get_pixel_checked(x, y)
                .ok_or(ResultCode::ParamErr)?;
            let value = match plane {
                3 if !transparency => 255,
                _ => pixel.0[plane],
            };
            *data.get_mut(offset).ok_or(ResultCode::ParamErr)? = value;
            Ok(())
        })
    }
}

/// Visit every sample of the record's rectangle and plane range with its
/// byte offset in the lent buffer.
fn for_each_sample(
    record: &FormatRecord,
    mut visit: impl FnMut(u32, u32, usize, usize) -> HostResult<()>,
) -> HostResult<()> {
    let rect = record.the_rect;
    let (lo, hi) = (record.lo_plane.max(0), record.hi_plane.min(3));

    for y in rect.top.max(0)..rect.bottom {
        for x in rect.left.max(0)..rect.right {
            for plane in lo..=hi {
                let offset = i64::from(y - rect.top) * i64::from(record.row_bytes)
                    + i64::from(x - rect.left) * i64::from(record.col_bytes)
                    + i64::from(plane - lo) * i64::from(record.plane_bytes);
                let offset = usize::try_from(offset).map_err(|_| ResultCode::ParamErr)?;
                visit(x as u32, y as u32, plane as usize, offset)?;
            }
        }
    }
    Ok(())
}

impl<F: DataFork> FormatHost for DocumentHost<F> {
    fn reserve_storage(&mut self, _bytes: usize) -> bool {
        self.storage_available
    }

    fn data_fork(&mut self) -> &mut dyn DataFork {
        &mut self.fork
    }

    fn advance_state(&mut self, record: &FormatRecord, data: PixelData<'_>) -> HostResult<()> {
        if !record.has_data() {
            return Err(ResultCode::ParamErr);
        }
        match data {
            PixelData::Source(bytes) => self.receive(record, bytes),
            PixelData::Sink(buffer) => self.fill(record, buffer),
        }
    }

    fn read_channel_pixels(
        &mut self,
        channel: &ChannelDesc,
        rect: Rect,
        memory: PixelMemory<'_>,
    ) -> HostResult<Rect> {
        let document = self.document.as_ref().ok_or(ResultCode::ParamErr)?;
        if document.alpha_channel_name() != Some(channel.name.as_str()) || memory.depth != 8 {
            return Err(ResultCode::ParamErr);
        }

        let width = rect.width().min(document.pixels.width() as i32).max(0);
        let height = rect.height().min(document.pixels.height() as i32).max(0);
        for y in 0..height as u32 {
            for x in 0..width as u32 {
                let index = memory.index(x as usize, y as usize);
                let value = document.pixels.get_pixel(x + rect.left as u32, y + rect.top as u32).0[3];
                *memory.data.get_mut(index).ok_or(ResultCode::ParamErr)? = value;
            }
        }
        Ok(Rect {
            top: rect.top,
            left: rect.left,
            bottom: rect.top + height,
            right: rect.left + width,
        })
    }

    fn report_error(&mut self, message: &str) {
        tracing::error!("{message}");
        self.errors.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HOST_EDITOR;
    use image::Rgba;
    use std::io::Cursor;

    fn record_for(width: i32, height: i32, hi_plane: i16) -> FormatRecord {
        let mut record = FormatRecord::new(HOST_EDITOR);
        record.image_size = ImageSize::new(width as u32, height as u32);
        record.plugin_using_32bit_coordinates = true;
        record.planes = hi_plane + 1;
        record.lo_plane = 0;
        record.hi_plane = hi_plane;
        record.col_bytes = 4;
        record.row_bytes = 4 * width;
        record.plane_bytes = 1;
        record.the_rect = Rect::of_size(width, height);
        record.data_lent = true;
        record
    }

    #[test]
    fn test_receive_rgb_only() {
        let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR);
        let record = record_for(2, 1, 2);
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        host.advance_state(&record, PixelData::Source(&data)).unwrap();

        let document = host.document().unwrap();
        assert_eq!(document.alpha, AlphaSource::Opaque);
        assert_eq!(*document.pixels.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
        assert_eq!(*document.pixels.get_pixel(1, 0), Rgba([5, 6, 7, 255]));
    }

    #[test]
    fn test_receive_transparency() {
        let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR);
        let mut record = record_for(1, 1, 3);
        record.transparency_plane = Some(3);
        host.advance_state(&record, PixelData::Source(&[9, 8, 7, 6]))
            .unwrap();
        let document = host.document().unwrap();
        assert!(document.has_transparency());
        assert_eq!(*document.pixels.get_pixel(0, 0), Rgba([9, 8, 7, 6]));
    }

    #[test]
    fn test_fill_skips_alpha_without_transparency() {
        let pixels = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 40]));
        let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR)
            .with_document(Document::new(pixels, AlphaSource::Channel("mask".into())));

        let record = record_for(1, 1, 2);
        let mut buffer = [0, 0, 0, 255];
        host.advance_state(&record, PixelData::Sink(&mut buffer)).unwrap();
        assert_eq!(buffer, [10, 20, 30, 255]);
    }

    #[test]
    fn test_channel_read_uses_memory_layout() {
        let pixels = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 99]));
        let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR)
            .with_document(Document::new(pixels, AlphaSource::Channel("mask".into())));

        let mut buffer = vec![0u8; 16];
        let channel = ChannelDesc {
            name: "mask".into(),
            port: 0,
        };
        let wrote = host
            .read_channel_pixels(
                &channel,
                Rect::of_size(2, 2),
                PixelMemory {
                    data: &mut buffer,
                    row_bits: 64,
                    col_bits: 32,
                    bit_offset: 24,
                    depth: 8,
                },
            )
            .unwrap();
        assert_eq!(wrote, Rect::of_size(2, 2));
        assert_eq!(buffer[3], 99);
        assert_eq!(buffer[15], 99);
        assert_eq!(buffer[0], 0);
    }

    #[test]
    fn test_advance_state_requires_lease() {
        let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR);
        let mut record = record_for(1, 1, 2);
        record.data_lent = false;
        assert_eq!(
            host.advance_state(&record, PixelData::Source(&[0; 4])),
            Err(ResultCode::ParamErr)
        );
    }
}
