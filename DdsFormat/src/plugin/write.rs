//! Write-side phases: pixel collection and DDS encoding

use image::RgbaImage;

use super::Phase;
use crate::error::{Error, Result};
use crate::host::{
    DataLease, ForkStream, ImageMode, PixelData, PixelMemory, Rect, StreamAccess,
};
use crate::options::{self, AlphaMode};
use crate::script::{ScriptSchema, read_script_params, write_script_params};
use crate::texture::MipmappedTexture;

/// Scale colour by alpha in place for every RGBA pixel that is not opaque.
pub fn premultiply(rgba: &mut [u8]) {
    for pixel in rgba.chunks_exact_mut(4) {
        let alpha = pixel[3];
        if alpha == 255 {
            continue;
        }
        let scale = f32::from(alpha) / 255.0;
        for channel in &mut pixel[..3] {
            *channel = (f32::from(*channel) * scale + 0.5) as u8;
        }
    }
}

pub(super) fn write_start(phase: &mut Phase<'_>) -> Result<()> {
    options::load(phase.record, &mut phase.session.write_options);
    read_script_params(phase.record, &mut phase.session.write_options)?;
    let opts = phase.session.write_options;

    let record = &*phase.record;
    if record.image_mode != ImageMode::RgbColor || record.depth != 8 || record.planes < 3 {
        return Err(Error::UnsupportedDocument {
            reason: format!(
                "{:?} at {} bits with {} planes",
                record.image_mode, record.depth, record.planes
            ),
        });
    }

    let (width, height) = (record.width(), record.height());
    let (Ok(image_width), Ok(image_height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(Error::UnsupportedDocument {
            reason: format!("invalid size {width}x{height}"),
        });
    };

    let use_transparency = record.planes >= 4 && opts.alpha == AlphaMode::Transparency;
    let alpha_channel = if record.channel_ports && opts.alpha == AlphaMode::Channel {
        record
            .document_info
            .as_ref()
            .and_then(|info| info.first_alpha_channel())
            .cloned()
    } else {
        None
    };
    let use_alpha = use_transparency || alpha_channel.is_some();

    let mut pixels = RgbaImage::from_pixel(image_width, image_height, image::Rgba([0, 0, 0, 255]));
    {
        let mut lease = DataLease::acquire(phase.record);
        lease.lo_plane = 0;
        lease.hi_plane = if use_transparency { 3 } else { 2 };
        lease.col_bytes = 4;
        lease.row_bytes = width * 4;
        lease.plane_bytes = 1;
        lease.the_rect = Rect::of_size(width, height);

        phase
            .host
            .advance_state(&lease, PixelData::Sink(&mut pixels))
            .map_err(Error::Host)?;

        if let Some(channel) = &alpha_channel {
            let memory = PixelMemory {
                data: &mut pixels,
                row_bits: lease.row_bytes * 8,
                col_bits: i32::from(lease.col_bytes) * 8,
                bit_offset: 24,
                depth: 8,
            };
            phase
                .host
                .read_channel_pixels(channel, lease.the_rect, memory)
                .map_err(Error::Host)?;
        }
    }

    if use_alpha
        && !phase.record.is_scripting_host()
        && (opts.format.is_premultiplied() || opts.premultiply)
    {
        premultiply(&mut pixels);
    }

    let mut texture = MipmappedTexture::from_image(pixels, use_alpha);
    if opts.mipmap {
        texture.generate_mipmaps(opts.filter)?;
    }
    if opts.cubemap {
        texture.into_cubemap()?;
    }
    texture.convert(opts.format);

    let mut stream = ForkStream::new(phase.host.data_fork(), StreamAccess::ReadWrite);
    texture.write_dds(&mut stream)?;

    tracing::info!(
        "wrote {}x{} {} texture ({} levels, {} faces)",
        texture.width(),
        texture.height(),
        opts.format.name(),
        texture.level_count(),
        texture.face_count()
    );
    Ok(())
}

/// Record the final options for the script unless the host is the
/// scripting host itself.
pub(super) fn write_finish(phase: &mut Phase<'_>) {
    if !phase.record.is_scripting_host() {
        write_script_params(phase.record, &phase.session.write_options, ScriptSchema::Extended);
    }
}
