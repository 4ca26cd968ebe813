//! DDS texture codec
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! A [`MipmappedTexture`] holds faces × mip levels of RGBA8 surfaces. Files
//! are parsed with `ddsfile` and surfaces stay compressed until a level is
//! requested; block decoding goes through `bcdec_rs`, block encoding through
//! `texpresso`, and mip resampling through `image`.

mod decode;
mod encode;
mod error;
pub mod mipmap;
mod swizzle;

pub use error::TextureError;

use std::io::{Read, Write};

use ddsfile::{Caps2, Dds};
use image::RgbaImage;
use image::imageops;

use crate::options::{MipFilter, PixelFormat};
use decode::SourceLayout;

/// Result type for texture operations.
pub type TextureResult<T> = std::result::Result<T, TextureError>;

#[derive(Debug, Clone)]
enum Surface {
    Decoded(RgbaImage),
    Encoded {
        layout: SourceLayout,
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
}

/// A texture with optional mip chain and cube faces.
#[derive(Debug, Clone)]
pub struct MipmappedTexture {
    width: u32,
    height: u32,
    format: PixelFormat,
    has_alpha: bool,
    faces: Vec<Vec<Surface>>,
    mip_filter: Option<MipFilter>,
}

impl MipmappedTexture {
    /// Texture holding a single uncompressed surface.
    #[must_use]
    pub fn from_image(image: RgbaImage, has_alpha: bool) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: PixelFormat::Uncompressed,
            has_alpha,
            faces: vec![vec![Surface::Decoded(image)]],
            mip_filter: None,
        }
    }

    /// Parse a DDS stream. Surfaces are decoded on demand.
    ///
    /// # Errors
    /// Returns an error if the stream is not a DDS file, uses an unsupported
    /// pixel format, or is too short for its base level.
    pub fn read_dds<R: Read>(reader: &mut R) -> TextureResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let dds = Dds::read(bytes.as_slice())
            .map_err(|e| TextureError::from_dds("Failed to parse DDS", &e))?;

        let (width, height) = (dds.get_width(), dds.get_height());
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }

        // ddsfile drops the bit count of FourCC formats, so take it raw
        let bit_count = bytes
            .get(decode::BIT_COUNT_OFFSET..decode::BIT_COUNT_OFFSET + 4)
            .map_or(0, |b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
        let layout = decode::detect_layout(&dds, bit_count)?;
        let face_count = if dds.header.caps2.contains(Caps2::CUBEMAP) { 6 } else { 1 };
        let level_count = dds.get_num_mipmap_levels().clamp(1, 32) as usize;

        let faces = split_surfaces(layout, &dds.data, width, height, face_count, level_count)?;

        let mut format = layout.format;
        let has_alpha = match (layout.kind, layout.swizzle) {
            (decode::SourceKind::Bc1, _) => {
                let punched = faces[0]
                    .first()
                    .is_some_and(|surface| match surface {
                        Surface::Encoded { data, .. } => decode::bc1_has_alpha(data),
                        Surface::Decoded(_) => false,
                    });
                if punched {
                    format = PixelFormat::Dxt1a;
                }
                punched
            }
            (_, Some(swizzle)) => swizzle == swizzle::Swizzle::AGBR,
            (kind, None) => kind.carries_alpha(),
        };

        tracing::debug!(
            "read {width}x{height} {} texture: {} face(s), {} level(s), alpha {has_alpha}",
            format.name(),
            faces.len(),
            faces[0].len()
        );

        Ok(Self {
            width,
            height,
            format,
            has_alpha,
            faces,
            mip_filter: None,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current pixel format; the output format after [`convert`](Self::convert).
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[must_use]
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.faces.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_cubemap(&self) -> bool {
        self.faces.len() == 6
    }

    /// Decode one surface to RGBA8.
    ///
    /// # Errors
    /// Returns an error if the surface does not exist or fails to decode.
    pub fn level_image(&self, face: usize, level: usize) -> TextureResult<RgbaImage> {
        let surface = self
            .faces
            .get(face)
            .and_then(|levels| levels.get(level))
            .ok_or(TextureError::MissingSurface { face, level })?;

        match surface {
            Surface::Decoded(image) => Ok(image.clone()),
            Surface::Encoded {
                layout,
                width,
                height,
                data,
            } => {
                let mut rgba = decode::decode_surface(layout.kind, data, *width, *height)?;
                if let Some(swizzle) = layout.swizzle {
                    swizzle.undo(&mut rgba);
                }
                RgbaImage::from_raw(*width, *height, rgba)
                    .ok_or_else(|| TextureError::Decode("Failed to create image buffer".to_string()))
            }
        }
    }

    /// Rebuild every face's mip chain from its base level, down to 1×1.
    ///
    /// # Errors
    /// Returns an error if a base level fails to decode.
    pub fn generate_mipmaps(&mut self, filter: MipFilter) -> TextureResult<()> {
        let mut faces = Vec::with_capacity(self.faces.len());
        for face in 0..self.faces.len() {
            let base = self.level_image(face, 0)?;
            let chain = mipmap::generate_chain(base, filter);
            faces.push(chain.into_iter().map(Surface::Decoded).collect());
        }
        self.faces = faces;
        self.mip_filter = Some(filter);
        Ok(())
    }

    /// Split a vertical strip of six square faces into a cube map.
    ///
    /// Returns `false` and leaves the texture untouched when the base level
    /// is not a `w × 6w` strip. Mip chains are rebuilt per face.
    ///
    /// # Errors
    /// Returns an error if the base level fails to decode.
    pub fn into_cubemap(&mut self) -> TextureResult<bool> {
        if self.faces.len() != 1 || self.height != self.width.saturating_mul(6) {
            tracing::warn!(
                "cube map needs a vertical strip of six square faces, got {}x{}",
                self.width,
                self.height
            );
            return Ok(false);
        }

        let strip = self.level_image(0, 0)?;
        let size = self.width;
        let faces: Vec<RgbaImage> = (0..6)
            .map(|i| imageops::crop_imm(&strip, 0, i * size, size, size).to_image())
            .collect();

        self.faces = faces
            .into_iter()
            .map(|face| match self.mip_filter {
                Some(filter) => mipmap::generate_chain(face, filter)
                    .into_iter()
                    .map(Surface::Decoded)
                    .collect(),
                None => vec![Surface::Decoded(face)],
            })
            .collect();
        self.height = size;
        Ok(true)
    }

    /// Select the pixel format used by [`write_dds`](Self::write_dds).
    pub fn convert(&mut self, format: PixelFormat) {
        self.format = format;
    }

    /// Encode every surface and serialise the file.
    ///
    /// # Errors
    /// Returns an error if a surface fails to decode or the stream rejects
    /// the write.
    pub fn write_dds<W: Write>(&self, writer: &mut W) -> TextureResult<()> {
        let levels = self.level_count();
        let mut payload = Vec::new();
        for face in 0..self.faces.len() {
            for level in 0..levels {
                let image = self.level_image(face, level)?;
                payload.extend(encode::encode_surface(&image, self.format, self.has_alpha));
            }
        }

        encode::build_dds(
            self.width,
            self.height,
            levels,
            self.is_cubemap(),
            self.format,
            self.has_alpha,
            payload,
        )?
        .write(writer)
        .map_err(|e| TextureError::Encode(format!("Failed to write DDS: {e}")))?;

        tracing::debug!(
            "wrote {}x{} {} texture: {} face(s), {levels} level(s)",
            self.width,
            self.height,
            self.format.name(),
            self.faces.len()
        );
        Ok(())
    }
}

/// Cut the payload into face-major surfaces. A payload too short for the
/// full set keeps only the base level of the first face.
fn split_surfaces(
    layout: SourceLayout,
    data: &[u8],
    width: u32,
    height: u32,
    face_count: usize,
    level_count: usize,
) -> TextureResult<Vec<Vec<Surface>>> {
    let too_large = || TextureError::InvalidDimensions { width, height };
    let dims = |level: usize| {
        let level = level.min(31) as u32;
        ((width >> level).max(1), (height >> level).max(1))
    };
    let sizes = (0..level_count)
        .map(|level| {
            let (w, h) = dims(level);
            layout.kind.surface_size(w, h).ok_or_else(too_large)
        })
        .collect::<TextureResult<Vec<usize>>>()?;
    let surface = |offset: usize, level: usize| {
        let (w, h) = dims(level);
        let end = offset.checked_add(sizes[level])?;
        data.get(offset..end).map(|bytes| Surface::Encoded {
            layout,
            width: w,
            height: h,
            data: bytes.to_vec(),
        })
    };

    let per_face = sizes
        .iter()
        .try_fold(0usize, |total, &size| total.checked_add(size))
        .ok_or_else(too_large)?;
    let total = per_face.checked_mul(face_count).ok_or_else(too_large)?;

    if total > data.len() {
        let base = surface(0, 0).ok_or_else(|| {
            TextureError::Decode(format!(
                "DDS payload too short: {} bytes for a {width}x{height} base level",
                data.len()
            ))
        })?;
        tracing::warn!("DDS payload shorter than its header declares, keeping the base level");
        return Ok(vec![vec![base]]);
    }

    let mut faces = Vec::with_capacity(face_count);
    let mut offset = 0;
    for _ in 0..face_count {
        let mut levels = Vec::with_capacity(level_count);
        for (level, size) in sizes.iter().enumerate() {
            if let Some(next) = surface(offset, level) {
                levels.push(next);
            }
            offset += size;
        }
        faces.push(levels);
    }
    Ok(faces)
}
