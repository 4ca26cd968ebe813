//! Read-side phases: file sniffing, open dialog and pixel hand-off

use super::Phase;
use crate::error::{Error, Result};
use crate::host::{
    DataLease, FormatHost, ForkStream, ImageMode, ImageSize, PixelData, Rect, StreamAccess,
};
use crate::options::{self, AlphaMode};
use crate::texture::MipmappedTexture;
use crate::ui::ReadDialogParams;

/// Magic at the start of every DDS file.
pub(crate) const DDS_MAGIC: [u8; 4] = *b"DDS ";

/// Accept the file only if it starts with the DDS magic.
pub(super) fn filter_file(phase: &mut Phase<'_>) -> Result<()> {
    let mut stream = ForkStream::new(phase.host.data_fork(), StreamAccess::Read);
    let mut magic = [0u8; 4];
    let read = stream.read_bytes(&mut magic);

    if read == magic.len() && magic == DDS_MAGIC {
        Ok(())
    } else {
        Err(Error::InvalidMagic(magic))
    }
}

pub(super) fn read_start(phase: &mut Phase<'_>) -> Result<()> {
    let have_options = options::load(phase.record, &mut phase.session.read_options);
    if !have_options && !phase.record.is_scripting_host() {
        let mut params = ReadDialogParams::from(phase.session.read_options);
        if !phase.dialog.read_options(&mut params) {
            return Err(Error::UserCanceled);
        }
        phase.session.read_options = params.into();
        options::save(phase.record, &phase.session.read_options);
    }

    let alpha = phase.session.read_options.alpha;
    let texture = read_texture(phase.host)?;
    let use_alpha = texture.has_alpha() && alpha != AlphaMode::None;

    let record = &mut *phase.record;

    record.image_mode = ImageMode::RgbColor;
    record.depth = 8;
    record.image_size = ImageSize::new(texture.width(), texture.height());
    record.planes = if use_alpha { 4 } else { 3 };
    record.transparency_plane = None;

    if record.planes == 4 && alpha == AlphaMode::Transparency {
        record.transparency_plane = Some(3);
        record.transparency_matting = 0;
    }

    tracing::debug!(
        "opened {}x{} {} texture, {} planes",
        texture.width(),
        texture.height(),
        texture.format().name(),
        record.planes
    );
    Ok(())
}

/// Decode the base image again and lend it to the host as interleaved RGBA.
pub(super) fn read_continue(phase: &mut Phase<'_>) -> Result<()> {
    let texture = read_texture(phase.host)?;
    let image = texture.level_image(0, 0)?;
    let (Ok(width), Ok(height)) = (i32::try_from(image.width()), i32::try_from(image.height()))
    else {
        return Err(Error::UnsupportedDocument {
            reason: format!("{}x{} is too large", image.width(), image.height()),
        });
    };
    let pixels = image.into_raw();

    let mut lease = DataLease::acquire(phase.record);
    lease.plane_bytes = 1;
    lease.col_bytes = 4;
    lease.row_bytes = width * 4;
    lease.lo_plane = 0;
    lease.hi_plane = lease.planes - 1;
    lease.the_rect = Rect::of_size(width, height);

    phase
        .host
        .advance_state(&lease, PixelData::Source(&pixels))
        .map_err(Error::Host)?;

    tracing::info!(
        "read {width}x{height} {} texture",
        texture.format().name()
    );
    Ok(())
}

fn read_texture(host: &mut dyn FormatHost) -> Result<MipmappedTexture> {
    let mut stream = ForkStream::new(host.data_fork(), StreamAccess::Read);
    Ok(MipmappedTexture::read_dds(&mut stream)?)
}
