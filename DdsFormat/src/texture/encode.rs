//! DDS encoding - Block Compression (BC) compression using `texpresso`

use ddsfile::{Caps2, D3DFormat, Dds, FourCC, NewD3dParams};
use image::RgbaImage;
use texpresso::{Algorithm, COLOUR_WEIGHTS_PERCEPTUAL, Format, Params};

use super::TextureError;
use super::decode::force_opaque;
use super::swizzle::Swizzle;
use crate::options::PixelFormat;

/// Container-level description of an output format.
struct Container {
    /// Format handed to `ddsfile`; fixes block size and header flags.
    d3d: D3DFormat,
    /// FourCC written over the one `ddsfile` picked.
    fourcc: Option<[u8; 4]>,
}

fn container(format: PixelFormat, has_alpha: bool) -> Container {
    let (d3d, fourcc) = match format {
        PixelFormat::Dxt1 | PixelFormat::Dxt1a => (D3DFormat::DXT1, None),
        PixelFormat::Dxt2 => (D3DFormat::DXT2, None),
        PixelFormat::Dxt3 => (D3DFormat::DXT3, None),
        PixelFormat::Dxt4 => (D3DFormat::DXT4, None),
        PixelFormat::Dxt5
        | PixelFormat::Dxt5CCxY
        | PixelFormat::Dxt5xGxR
        | PixelFormat::Dxt5xGBR
        | PixelFormat::Dxt5AGBR => (D3DFormat::DXT5, None),
        PixelFormat::Dxt5a => (D3DFormat::DXT1, Some(*b"ATI1")),
        PixelFormat::ThreeDc => (D3DFormat::DXT5, Some(*b"ATI2")),
        PixelFormat::Dxn => (D3DFormat::DXT5, Some(*b"A2XY")),
        PixelFormat::Uncompressed if has_alpha => (D3DFormat::A8R8G8B8, None),
        PixelFormat::Uncompressed => (D3DFormat::X8R8G8B8, None),
    };
    Container { d3d, fourcc }
}

/// Build the DDS header for `faces × levels` surfaces of `format` and
/// attach the encoded payload.
pub(crate) fn build_dds(
    width: u32,
    height: u32,
    levels: usize,
    cubemap: bool,
    format: PixelFormat,
    has_alpha: bool,
    payload: Vec<u8>,
) -> Result<Dds, TextureError> {
    let container = container(format, has_alpha);
    let mut dds = Dds::new_d3d(NewD3dParams {
        height,
        width,
        depth: None,
        format: container.d3d,
        mipmap_levels: (levels > 1).then_some(levels as u32),
        caps2: cubemap.then_some(
            Caps2::CUBEMAP
                | Caps2::CUBEMAP_POSITIVEX
                | Caps2::CUBEMAP_NEGATIVEX
                | Caps2::CUBEMAP_POSITIVEY
                | Caps2::CUBEMAP_NEGATIVEY
                | Caps2::CUBEMAP_POSITIVEZ
                | Caps2::CUBEMAP_NEGATIVEZ,
        ),
    })
    .map_err(|e| TextureError::Encode(format!("Failed to create DDS: {e}")))?;

    if let Some(code) = container.fourcc {
        dds.header.spf.fourcc = Some(FourCC(u32::from_le_bytes(code)));
    }
    if let Some(swizzle) = Swizzle::for_format(format) {
        dds.header.spf.rgb_bit_count = Some(swizzle.marker());
    }

    dds.data = payload;
    Ok(dds)
}

/// Encode one surface in `format`.
pub(crate) fn encode_surface(image: &RgbaImage, format: PixelFormat, has_alpha: bool) -> Vec<u8> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut rgba = image.as_raw().clone();
    if !has_alpha || format == PixelFormat::Dxt1 {
        force_opaque(&mut rgba);
    }

    let block_format = match format {
        PixelFormat::Uncompressed => return to_bgra(&rgba),
        PixelFormat::Dxt1 | PixelFormat::Dxt1a => Format::Bc1,
        PixelFormat::Dxt2 | PixelFormat::Dxt3 => Format::Bc2,
        PixelFormat::Dxt4 | PixelFormat::Dxt5 => Format::Bc3,
        PixelFormat::Dxt5CCxY
        | PixelFormat::Dxt5xGxR
        | PixelFormat::Dxt5xGBR
        | PixelFormat::Dxt5AGBR => {
            if let Some(swizzle) = Swizzle::for_format(format) {
                swizzle.apply(&mut rgba);
            }
            Format::Bc3
        }
        PixelFormat::Dxt5a => {
            single_channel(&mut rgba, has_alpha);
            Format::Bc4
        }
        PixelFormat::Dxn => Format::Bc5,
        PixelFormat::ThreeDc => {
            // Y goes in the first block
            for pixel in rgba.chunks_exact_mut(4) {
                pixel.swap(0, 1);
            }
            Format::Bc5
        }
    };

    let params = Params {
        algorithm: Algorithm::ClusterFit,
        weights: COLOUR_WEIGHTS_PERCEPTUAL,
        weigh_colour_by_alpha: has_alpha,
    };
    let mut output = vec![0u8; block_format.compressed_size(width, height)];
    block_format.compress(&rgba, width, height, params, &mut output);
    output
}

/// Move the channel stored by single-channel blocks into red: alpha when
/// the texture has it, luma otherwise.
fn single_channel(rgba: &mut [u8], has_alpha: bool) {
    for pixel in rgba.chunks_exact_mut(4) {
        pixel[0] = if has_alpha {
            pixel[3]
        } else {
            let luma = 77 * u32::from(pixel[0]) + 150 * u32::from(pixel[1]) + 29 * u32::from(pixel[2]);
            (luma >> 8) as u8
        };
    }
}

fn to_bgra(rgba: &[u8]) -> Vec<u8> {
    let mut bgra = rgba.to_vec();
    for pixel in bgra.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    bgra
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_block_sizes() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 128]));
        assert_eq!(encode_surface(&image, PixelFormat::Dxt1, false).len(), 32);
        assert_eq!(encode_surface(&image, PixelFormat::Dxt5a, true).len(), 32);
        assert_eq!(encode_surface(&image, PixelFormat::Dxt3, true).len(), 64);
        assert_eq!(encode_surface(&image, PixelFormat::ThreeDc, false).len(), 64);
        assert_eq!(encode_surface(&image, PixelFormat::Uncompressed, true).len(), 256);
    }

    #[test]
    fn test_uncompressed_is_bgra() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4]));
        assert_eq!(encode_surface(&image, PixelFormat::Uncompressed, true), vec![3, 2, 1, 4]);
        assert_eq!(encode_surface(&image, PixelFormat::Uncompressed, false), vec![3, 2, 1, 255]);
    }

    #[test]
    fn test_single_channel_source() {
        let mut pixels = vec![255, 255, 255, 40];
        single_channel(&mut pixels, true);
        assert_eq!(pixels[0], 40);

        let mut pixels = vec![255, 255, 255, 40];
        single_channel(&mut pixels, false);
        assert_eq!(pixels[0], 255);
    }

    #[test]
    fn test_header_fourcc_override() {
        let dds = build_dds(4, 4, 1, false, PixelFormat::ThreeDc, false, vec![0; 16]).unwrap();
        assert_eq!(
            dds.header.spf.fourcc.as_ref().map(|f| f.0),
            Some(u32::from_le_bytes(*b"ATI2"))
        );

        let dds = build_dds(4, 4, 1, false, PixelFormat::Dxt5xGBR, true, vec![0; 16]).unwrap();
        assert_eq!(
            dds.header.spf.rgb_bit_count,
            Some(u32::from_le_bytes(*b"xGBR"))
        );
    }
}
