//! Full open/save cycles through the document host

use std::io::Cursor;

use ddsformat::host::{DEFAULT_CHANNEL_NAME, DocumentInfo, ImageMode, ImageSize, OsType};
use ddsformat::prelude::*;
use ddsformat::script::RecordInfo;
use ddsformat::ui::{ReadDialogParams, WriteDialogParams};
use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;

type MemoryHost = DocumentHost<Cursor<Vec<u8>>>;

/// Dialog that dismisses every prompt.
struct CancelDialog;

impl OptionsDialog for CancelDialog {
    fn read_options(&mut self, _params: &mut ReadDialogParams) -> bool {
        false
    }

    fn write_options(
        &mut self,
        _params: &mut WriteDialogParams,
        _have_transparency: bool,
        _alpha_name: Option<&str>,
    ) -> bool {
        false
    }

    fn about(&mut self, _version: &str) {}
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 16) as u8, (y * 16) as u8, 128, (x * 8 + y * 8) as u8])
    })
}

fn reader(alpha: AlphaMode) -> FormatModule<AutoDialog> {
    FormatModule::new(AutoDialog::new(ReadPreferences { alpha, auto: true }))
}

fn scripted_save(
    document: Document,
    options: WriteOptions,
    host_sig: OsType,
) -> (ResultCode, MemoryHost) {
    let descriptor = ScriptSchema::Extended.encode(&options);
    let mut host = DocumentHost::new(Cursor::new(Vec::new()), host_sig)
        .with_document(document)
        .with_descriptor_parameters(DescriptorParameters::with_descriptor(
            descriptor,
            PlayInfo::DontDisplay,
        ));
    let mut module = FormatModule::new(CancelDialog);
    let result = host.save(&mut module);
    (result, host)
}

fn saved_bytes(host: MemoryHost) -> Vec<u8> {
    host.into_fork().into_inner()
}

fn open_bytes(bytes: Vec<u8>, alpha: AlphaMode) -> (ResultCode, MemoryHost) {
    let mut host = DocumentHost::new(Cursor::new(bytes), HOST_EDITOR);
    let result = host.open(&mut reader(alpha));
    (result, host)
}

fn uncompressed(alpha: AlphaMode) -> WriteOptions {
    WriteOptions {
        format: PixelFormat::Uncompressed,
        alpha,
        ..WriteOptions::default()
    }
}

// ==================== Round trips ====================

#[test]
fn test_uncompressed_round_trip_with_transparency() {
    let pixels = gradient(8, 8);
    let document = Document::new(pixels.clone(), AlphaSource::Transparency);
    let (result, host) = scripted_save(document, uncompressed(AlphaMode::Transparency), HOST_EDITOR);
    assert_eq!(result, ResultCode::NoErr);

    let (result, host) = open_bytes(saved_bytes(host), AlphaMode::Transparency);
    assert_eq!(result, ResultCode::NoErr);
    let opened = host.document().expect("document opened");
    assert_eq!(opened.alpha, AlphaSource::Transparency);
    assert_eq!(opened.pixels, pixels);
}

#[test]
fn test_open_with_alpha_none_drops_alpha() {
    let document = Document::new(gradient(8, 8), AlphaSource::Transparency);
    let (_, host) = scripted_save(document, uncompressed(AlphaMode::Transparency), HOST_EDITOR);

    let (result, host) = open_bytes(saved_bytes(host), AlphaMode::None);
    assert_eq!(result, ResultCode::NoErr);
    let opened = host.document().expect("document opened");
    assert_eq!(opened.alpha, AlphaSource::Opaque);
    assert!(opened.pixels.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn test_open_alpha_as_channel() {
    let document = Document::new(gradient(8, 8), AlphaSource::Transparency);
    let (_, host) = scripted_save(document, uncompressed(AlphaMode::Transparency), HOST_EDITOR);

    let (_, host) = open_bytes(saved_bytes(host), AlphaMode::Channel);
    let opened = host.document().expect("document opened");
    assert_eq!(
        opened.alpha,
        AlphaSource::Channel(DEFAULT_CHANNEL_NAME.to_string())
    );
}

#[test]
fn test_opaque_texture_opens_with_three_planes() {
    let document = Document::new(gradient(8, 8), AlphaSource::Opaque);
    let (_, host) = scripted_save(document, uncompressed(AlphaMode::Transparency), HOST_EDITOR);

    let (_, host) = open_bytes(saved_bytes(host), AlphaMode::Transparency);
    assert_eq!(host.document().map(|d| d.alpha.clone()), Some(AlphaSource::Opaque));
}

#[test]
fn test_dxt5_round_trip_is_close() {
    // Colour varies along one axis so every block's colours sit on a line.
    let pixels = RgbaImage::from_fn(16, 16, |x, y| {
        Rgba([(x * 16) as u8, (x * 8) as u8, 64, 255 - (y * 8) as u8])
    });
    let document = Document::new(pixels.clone(), AlphaSource::Transparency);
    let options = WriteOptions {
        format: PixelFormat::Dxt5,
        alpha: AlphaMode::Transparency,
        ..WriteOptions::default()
    };
    let (result, host) = scripted_save(document, options, HOST_EDITOR);
    assert_eq!(result, ResultCode::NoErr);

    let (_, host) = open_bytes(saved_bytes(host), AlphaMode::Transparency);
    let opened = host.document().expect("document opened");
    for (a, b) in opened.pixels.pixels().zip(pixels.pixels()) {
        for channel in 0..4 {
            let diff = (i16::from(a.0[channel]) - i16::from(b.0[channel])).abs();
            assert!(diff <= 24, "channel {channel}: {a:?} vs {b:?}");
        }
    }
}

#[test]
fn test_alpha_channel_is_written() {
    let pixels = gradient(8, 8);
    let document = Document::new(pixels.clone(), AlphaSource::Channel("mask".to_string()));
    let (result, host) = scripted_save(document, uncompressed(AlphaMode::Channel), HOST_EDITOR);
    assert_eq!(result, ResultCode::NoErr);

    let texture = MipmappedTexture::read_dds(&mut Cursor::new(saved_bytes(host))).unwrap();
    assert!(texture.has_alpha());
    assert_eq!(texture.level_image(0, 0).unwrap(), pixels);
}

// ==================== Write options ====================

#[test]
fn test_premultiply_on_editor_host() {
    let document = Document::new(
        RgbaImage::from_pixel(4, 4, Rgba([200, 100, 0, 100])),
        AlphaSource::Transparency,
    );
    let options = WriteOptions {
        premultiply: true,
        ..uncompressed(AlphaMode::Transparency)
    };
    let (_, host) = scripted_save(document, options, HOST_EDITOR);

    let texture = MipmappedTexture::read_dds(&mut Cursor::new(saved_bytes(host))).unwrap();
    let image = texture.level_image(0, 0).unwrap();
    assert_eq!(image.get_pixel(0, 0), &Rgba([78, 39, 0, 100]));
}

#[test]
fn test_premultiplied_formats_force_premultiply() {
    for format in [PixelFormat::Dxt2, PixelFormat::Dxt4] {
        let document = Document::new(
            RgbaImage::from_pixel(8, 8, Rgba([200, 100, 0, 100])),
            AlphaSource::Transparency,
        );
        let options = WriteOptions {
            format,
            alpha: AlphaMode::Transparency,
            premultiply: false,
            ..WriteOptions::default()
        };
        let (result, host) = scripted_save(document, options, HOST_EDITOR);
        assert_eq!(result, ResultCode::NoErr);

        let texture = MipmappedTexture::read_dds(&mut Cursor::new(saved_bytes(host))).unwrap();
        assert_eq!(texture.format(), format);
        let image = texture.level_image(0, 0).unwrap();
        let Rgba(pixel) = *image.get_pixel(3, 3);
        for (channel, (got, want)) in pixel.iter().zip([78u8, 39, 0, 100]).enumerate() {
            assert!(
                got.abs_diff(want) <= 8,
                "{format:?} channel {channel}: {got} vs {want}"
            );
        }
    }
}

#[test]
fn test_scripting_host_never_premultiplies() {
    let document = Document::new(
        RgbaImage::from_pixel(4, 4, Rgba([200, 100, 0, 100])),
        AlphaSource::Transparency,
    );
    let options = WriteOptions {
        premultiply: true,
        ..uncompressed(AlphaMode::Transparency)
    };
    let (result, host) = scripted_save(document, options, HOST_SCRIPTING);
    assert_eq!(result, ResultCode::NoErr);

    let texture = MipmappedTexture::read_dds(&mut Cursor::new(saved_bytes(host))).unwrap();
    let image = texture.level_image(0, 0).unwrap();
    assert_eq!(image.get_pixel(0, 0), &Rgba([200, 100, 0, 100]));
}

#[test]
fn test_mipmaps_are_written() {
    let document = Document::new(gradient(16, 16), AlphaSource::Opaque);
    let options = WriteOptions {
        mipmap: true,
        filter: MipFilter::Box,
        ..uncompressed(AlphaMode::None)
    };
    let (result, host) = scripted_save(document, options, HOST_EDITOR);
    assert_eq!(result, ResultCode::NoErr);

    let texture = MipmappedTexture::read_dds(&mut Cursor::new(saved_bytes(host))).unwrap();
    assert_eq!(texture.level_count(), 5);
    assert_eq!(texture.format(), PixelFormat::Uncompressed);
}

#[test]
fn test_cubemap_strip_is_written() {
    let document = Document::new(gradient(8, 48), AlphaSource::Opaque);
    let options = WriteOptions {
        format: PixelFormat::Dxt1,
        cubemap: true,
        ..WriteOptions::default()
    };
    let (result, host) = scripted_save(document, options, HOST_EDITOR);
    assert_eq!(result, ResultCode::NoErr);

    let texture = MipmappedTexture::read_dds(&mut Cursor::new(saved_bytes(host))).unwrap();
    assert!(texture.is_cubemap());
    assert_eq!(texture.face_count(), 6);
    assert_eq!((texture.width(), texture.height()), (8, 8));
}

#[test]
fn test_save_records_script_params() {
    let options = WriteOptions {
        format: PixelFormat::Dxt3,
        alpha: AlphaMode::Transparency,
        mipmap: true,
        filter: MipFilter::Kaiser,
        ..WriteOptions::default()
    };
    let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR)
        .with_document(Document::new(gradient(8, 8), AlphaSource::Transparency))
        .with_descriptor_parameters(DescriptorParameters::with_descriptor(
            ScriptSchema::Extended.encode(&options),
            PlayInfo::Display,
        ));
    let result = host.save(&mut FormatModule::new(AutoDialog::default()));
    assert_eq!(result, ResultCode::NoErr);

    let params = host.descriptor_parameters().expect("descriptor parameters");
    assert_eq!(params.record_info, RecordInfo::Optional);
    let mut recorded = WriteOptions::default();
    ScriptSchema::Extended
        .decode(params.descriptor.as_ref().expect("descriptor"), &mut recorded)
        .unwrap();
    assert_eq!(recorded, options);
    assert_eq!(host.revert_info().map(<[u8]>::len), Some(256));
}

// ==================== Dialogs and hosts ====================

#[test]
fn test_cancelled_read_dialog() {
    let document = Document::new(gradient(8, 8), AlphaSource::Opaque);
    let (_, host) = scripted_save(document, uncompressed(AlphaMode::None), HOST_EDITOR);

    let mut host = DocumentHost::new(Cursor::new(saved_bytes(host)), HOST_EDITOR);
    let result = host.open(&mut FormatModule::new(CancelDialog));
    assert_eq!(result, ResultCode::UserCanceled);
    assert!(host.document().is_none());
}

#[test]
fn test_cancelled_write_dialog() {
    let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR)
        .with_document(Document::new(gradient(8, 8), AlphaSource::Opaque));
    let result = host.save(&mut FormatModule::new(CancelDialog));
    assert_eq!(result, ResultCode::UserCanceled);
    assert!(host.fork().get_ref().is_empty());
}

#[test]
fn test_scripting_host_skips_read_dialog() {
    let document = Document::new(gradient(8, 8), AlphaSource::Opaque);
    let (_, host) = scripted_save(document, uncompressed(AlphaMode::None), HOST_EDITOR);

    let mut host = DocumentHost::new(Cursor::new(saved_bytes(host)), HOST_SCRIPTING);
    let result = host.open(&mut FormatModule::new(CancelDialog));
    assert_eq!(result, ResultCode::NoErr);
    assert!(host.document().is_some());
}

#[test]
fn test_stored_read_options_skip_dialog() {
    let document = Document::new(gradient(8, 8), AlphaSource::Opaque);
    let (_, host) = scripted_save(document, uncompressed(AlphaMode::None), HOST_EDITOR);

    let mut host = DocumentHost::new(Cursor::new(saved_bytes(host)), HOST_EDITOR);
    assert_eq!(host.open(&mut reader(AlphaMode::None)), ResultCode::NoErr);
    assert_eq!(host.revert_info().map(<[u8]>::len), Some(32));

    // Second open answers from the revert block, so cancelling is never asked.
    assert_eq!(host.open(&mut FormatModule::new(CancelDialog)), ResultCode::NoErr);
}

// ==================== Protocol ====================

#[test]
fn test_filter_rejects_other_files() {
    let mut host = DocumentHost::new(Cursor::new(b"\x89PNG\r\n\x1a\n".to_vec()), HOST_EDITOR);
    let result = host.open(&mut reader(AlphaMode::Channel));
    assert_eq!(result, ResultCode::FormatCannotRead);
    assert!(host.document().is_none());
}

#[test]
fn test_filter_rejects_short_files() {
    let mut host = DocumentHost::new(Cursor::new(b"DD".to_vec()), HOST_EDITOR);
    assert_eq!(
        host.open(&mut reader(AlphaMode::Channel)),
        ResultCode::FormatCannotRead
    );
}

#[test]
fn test_corrupt_texture_reports_error() {
    let mut bytes = b"DDS ".to_vec();
    bytes.extend_from_slice(&[0xAB; 40]);
    let mut host = DocumentHost::new(Cursor::new(bytes), HOST_EDITOR);

    let result = host.open(&mut reader(AlphaMode::Channel));
    assert_eq!(result, ResultCode::ErrReportString);
    assert_eq!(host.errors().len(), 1);
    assert!(host.errors()[0].len() <= 255);
}

#[test]
fn test_oversized_header_reports_error() {
    let document = Document::new(gradient(8, 8), AlphaSource::Transparency);
    let options = WriteOptions {
        format: PixelFormat::Dxt5,
        alpha: AlphaMode::Transparency,
        ..WriteOptions::default()
    };
    let (_, host) = scripted_save(document, options, HOST_EDITOR);
    let mut bytes = saved_bytes(host);
    // height and width
    bytes[12..20].fill(0xFF);

    let (result, host) = open_bytes(bytes, AlphaMode::Transparency);
    assert_eq!(result, ResultCode::ErrReportString);
    assert_eq!(host.errors().len(), 1);
    assert!(host.document().is_none());
}

#[test]
fn test_unknown_selectors() {
    let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR);
    let mut module = reader(AlphaMode::Channel);
    let mut record = FormatRecord::new(HOST_EDITOR);
    let mut slot = None;

    for selector in [-1, 18, 100] {
        let result = module.dispatch(selector, &mut record, &mut slot, &mut host);
        assert_eq!(result, ResultCode::FormatBadParameters);
    }
    assert!(slot.is_none());
}

#[test]
fn test_about_needs_no_session() {
    let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR);
    host.set_storage_available(false);
    let mut record = FormatRecord::new(HOST_EDITOR);
    let mut slot = None;

    let result = reader(AlphaMode::Channel).dispatch(
        Selector::About.value(),
        &mut record,
        &mut slot,
        &mut host,
    );
    assert_eq!(result, ResultCode::NoErr);
    assert!(slot.is_none());
}

#[test]
fn test_storage_unavailable() {
    let document = Document::new(gradient(8, 8), AlphaSource::Opaque);
    let (_, host) = scripted_save(document, uncompressed(AlphaMode::None), HOST_EDITOR);

    let mut host = DocumentHost::new(Cursor::new(saved_bytes(host)), HOST_EDITOR);
    host.set_storage_available(false);
    assert_eq!(host.open(&mut reader(AlphaMode::None)), ResultCode::MemFull);
}

#[test]
fn test_no_data_lent_between_phases() {
    let document = Document::new(gradient(8, 8), AlphaSource::Transparency);
    let (_, host) = scripted_save(document, uncompressed(AlphaMode::Transparency), HOST_EDITOR);

    let mut host = DocumentHost::new(Cursor::new(saved_bytes(host)), HOST_EDITOR);
    let mut module = reader(AlphaMode::Transparency);
    let mut record = FormatRecord::new(HOST_EDITOR);
    let mut slot = None;

    for selector in Selector::READ_SEQUENCE {
        let result = module.dispatch(selector.value(), &mut record, &mut slot, &mut host);
        assert_eq!(result, ResultCode::NoErr, "{selector:?}");
        assert!(!record.has_data(), "{selector:?} left data lent");
    }
    assert_eq!(record.planes, 4);
    assert_eq!(record.transparency_plane, Some(3));
    assert_eq!(slot.map(|s| s.read_options.alpha), Some(AlphaMode::Transparency));
}

#[test]
fn test_prepare_phases_clear_max_data() {
    let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR);
    let mut module = reader(AlphaMode::Channel);
    let mut record = FormatRecord::new(HOST_EDITOR);
    let mut slot = None;

    for selector in [
        Selector::ReadPrepare,
        Selector::OptionsPrepare,
        Selector::EstimatePrepare,
        Selector::WritePrepare,
    ] {
        record.max_data = 1 << 20;
        assert_eq!(
            module.dispatch(selector.value(), &mut record, &mut slot, &mut host),
            ResultCode::NoErr
        );
        assert_eq!(record.max_data, 0);
    }
}

#[test]
fn test_estimate_through_dispatch() {
    let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR);
    let mut record = FormatRecord::new(HOST_EDITOR);
    record.image_size = ImageSize::new(64, 64);
    record.planes = 4;
    record.depth = 8;
    let mut slot = None;

    let result = reader(AlphaMode::Channel).dispatch(
        Selector::EstimateStart.value(),
        &mut record,
        &mut slot,
        &mut host,
    );
    assert_eq!(result, ResultCode::NoErr);
    assert_eq!((record.min_data_bytes, record.max_data_bytes), (8192, 16384));
}

#[test]
fn test_write_rejects_unsupported_documents() {
    let mut host = DocumentHost::new(Cursor::new(Vec::new()), HOST_EDITOR);
    let mut module = reader(AlphaMode::Channel);
    let mut slot = None;

    let mut record = FormatRecord::new(HOST_EDITOR);
    record.image_mode = ImageMode::Grayscale;
    record.depth = 8;
    record.planes = 3;
    record.image_size = ImageSize::new(4, 4);
    record.document_info = Some(DocumentInfo::default());

    let result = module.dispatch(Selector::WriteStart.value(), &mut record, &mut slot, &mut host);
    assert_eq!(result, ResultCode::FormatBadParameters);

    record.image_mode = ImageMode::RgbColor;
    record.depth = 16;
    let result = module.dispatch(Selector::WriteStart.value(), &mut record, &mut slot, &mut host);
    assert_eq!(result, ResultCode::FormatBadParameters);
    assert!(!record.has_data());
}
