//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! DDS decoding - surface layout detection and block decompression using `bcdec_rs`

use ddsfile::{D3DFormat, Dds, DxgiFormat};

use super::TextureError;
use super::swizzle::Swizzle;
use crate::options::PixelFormat;

/// How the bytes of one surface are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    Bc1,
    Bc2,
    Bc3,
    Bc4,
    /// Two-channel blocks; `y_first` when the first channel holds Y (`ATI2`).
    Bc5 { y_first: bool },
    Bc7,
    /// 32-bit B, G, R, A byte order.
    Bgra8 { alpha: bool },
    /// 32-bit R, G, B, A byte order.
    Rgba8 { alpha: bool },
}

impl SourceKind {
    /// Block size in bytes, `None` for uncompressed layouts.
    const fn block_size(self) -> Option<usize> {
        match self {
            Self::Bc1 | Self::Bc4 => Some(8),
            Self::Bc2 | Self::Bc3 | Self::Bc5 { .. } | Self::Bc7 => Some(16),
            Self::Bgra8 { .. } | Self::Rgba8 { .. } => None,
        }
    }

    /// Bytes per pixel written by the block decoder.
    const fn decoded_channels(self) -> usize {
        match self {
            Self::Bc4 => 1,
            Self::Bc5 { .. } => 2,
            _ => 4,
        }
    }

    /// Byte size of a `width × height` surface, `None` if it overflows.
    pub(crate) fn surface_size(self, width: u32, height: u32) -> Option<usize> {
        let (width, height) = (width.max(1) as usize, height.max(1) as usize);
        match self.block_size() {
            Some(block) => width
                .div_ceil(4)
                .checked_mul(height.div_ceil(4))?
                .checked_mul(block),
            None => width.checked_mul(height)?.checked_mul(4),
        }
    }

    /// Whether the layout stores an alpha channel.
    pub(crate) const fn carries_alpha(self) -> bool {
        match self {
            Self::Bc2 | Self::Bc3 | Self::Bc7 => true,
            Self::Bgra8 { alpha } | Self::Rgba8 { alpha } => alpha,
            Self::Bc1 | Self::Bc4 | Self::Bc5 { .. } => false,
        }
    }
}

/// A recognised DDS pixel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLayout {
    pub kind: SourceKind,
    pub format: PixelFormat,
    pub swizzle: Option<Swizzle>,
}

impl SourceLayout {
    const fn plain(kind: SourceKind, format: PixelFormat) -> Self {
        Self {
            kind,
            format,
            swizzle: None,
        }
    }
}

/// File offset of the pixel-format bit count field (magic included).
pub(crate) const BIT_COUNT_OFFSET: usize = 88;

/// Identify the surface layout of a parsed DDS file.
///
/// `bit_count` is the raw pixel-format bit count field, which carries the
/// swizzle marker of a swizzled DXT5 file. Only files with a DX10 header
/// are routed by their DXGI format so that `ATI2`, `DXT2` and `DXT4` keep
/// their identity.
pub(crate) fn detect_layout(dds: &Dds, bit_count: u32) -> Result<SourceLayout, TextureError> {
    if let Some(header10) = dds.header10.as_ref() {
        return dxgi_layout(header10.dxgi_format);
    }

    if let Some(fourcc) = dds.header.spf.fourcc.as_ref() {
        let code = fourcc.0.to_le_bytes();
        let layout = match &code {
            b"DXT1" => SourceLayout::plain(SourceKind::Bc1, PixelFormat::Dxt1),
            b"DXT2" => SourceLayout::plain(SourceKind::Bc2, PixelFormat::Dxt2),
            b"DXT3" => SourceLayout::plain(SourceKind::Bc2, PixelFormat::Dxt3),
            b"DXT4" => SourceLayout::plain(SourceKind::Bc3, PixelFormat::Dxt4),
            b"DXT5" => {
                let swizzle = Swizzle::from_marker(bit_count);
                SourceLayout {
                    kind: SourceKind::Bc3,
                    format: swizzle.map_or(PixelFormat::Dxt5, Swizzle::format),
                    swizzle,
                }
            }
            b"ATI1" | b"BC4U" => SourceLayout::plain(SourceKind::Bc4, PixelFormat::Dxt5a),
            b"ATI2" => SourceLayout::plain(SourceKind::Bc5 { y_first: true }, PixelFormat::ThreeDc),
            b"A2XY" | b"BC5U" => {
                SourceLayout::plain(SourceKind::Bc5 { y_first: false }, PixelFormat::Dxn)
            }
            _ => {
                return Err(TextureError::Unsupported(format!(
                    "FourCC '{}'",
                    String::from_utf8_lossy(&code)
                )));
            }
        };
        return Ok(layout);
    }

    match dds.get_d3d_format() {
        Some(D3DFormat::A8R8G8B8) => Ok(SourceLayout::plain(
            SourceKind::Bgra8 { alpha: true },
            PixelFormat::Uncompressed,
        )),
        Some(D3DFormat::X8R8G8B8) => Ok(SourceLayout::plain(
            SourceKind::Bgra8 { alpha: false },
            PixelFormat::Uncompressed,
        )),
        Some(D3DFormat::A8B8G8R8) => Ok(SourceLayout::plain(
            SourceKind::Rgba8 { alpha: true },
            PixelFormat::Uncompressed,
        )),
        Some(D3DFormat::X8B8G8R8) => Ok(SourceLayout::plain(
            SourceKind::Rgba8 { alpha: false },
            PixelFormat::Uncompressed,
        )),
        Some(other) => Err(TextureError::Unsupported(format!("{other:?}"))),
        None => Err(TextureError::Unsupported("unknown".to_string())),
    }
}

fn dxgi_layout(format: DxgiFormat) -> Result<SourceLayout, TextureError> {
    let layout = match format {
        DxgiFormat::R8G8B8A8_UNorm | DxgiFormat::R8G8B8A8_UNorm_sRGB => {
            SourceLayout::plain(SourceKind::Rgba8 { alpha: true }, PixelFormat::Uncompressed)
        }
        DxgiFormat::B8G8R8A8_UNorm | DxgiFormat::B8G8R8A8_UNorm_sRGB => {
            SourceLayout::plain(SourceKind::Bgra8 { alpha: true }, PixelFormat::Uncompressed)
        }
        DxgiFormat::BC1_UNorm | DxgiFormat::BC1_UNorm_sRGB => {
            SourceLayout::plain(SourceKind::Bc1, PixelFormat::Dxt1)
        }
        DxgiFormat::BC2_UNorm | DxgiFormat::BC2_UNorm_sRGB => {
            SourceLayout::plain(SourceKind::Bc2, PixelFormat::Dxt3)
        }
        DxgiFormat::BC3_UNorm | DxgiFormat::BC3_UNorm_sRGB => {
            SourceLayout::plain(SourceKind::Bc3, PixelFormat::Dxt5)
        }
        DxgiFormat::BC4_UNorm => SourceLayout::plain(SourceKind::Bc4, PixelFormat::Dxt5a),
        DxgiFormat::BC5_UNorm => {
            SourceLayout::plain(SourceKind::Bc5 { y_first: false }, PixelFormat::Dxn)
        }
        // No BC7 output format exists; DXT5 is the nearest match with alpha.
        DxgiFormat::BC7_UNorm | DxgiFormat::BC7_UNorm_sRGB => {
            SourceLayout::plain(SourceKind::Bc7, PixelFormat::Dxt5)
        }
        other => return Err(TextureError::Unsupported(format!("{other:?}"))),
    };
    Ok(layout)
}

/// Whether any BC1 block uses its transparent palette entry.
///
/// A block is in three-colour mode when its first endpoint is not greater
/// than the second; index 3 then decodes to transparent black.
pub(crate) fn bc1_has_alpha(data: &[u8]) -> bool {
    data.chunks_exact(8).any(|block| {
        let c0 = u16::from_le_bytes([block[0], block[1]]);
        let c1 = u16::from_le_bytes([block[2], block[3]]);
        if c0 > c1 {
            return false;
        }
        let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
        (0..16).any(|i| (indices >> (i * 2)) & 0b11 == 3)
    })
}

/// Decode one surface to tightly packed RGBA8.
pub(crate) fn decode_surface(
    kind: SourceKind,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, TextureError> {
    let expected = kind
        .surface_size(width, height)
        .ok_or(TextureError::InvalidDimensions { width, height })?;
    if data.len() < expected {
        return Err(TextureError::Decode(format!(
            "truncated surface: {} of {expected} bytes",
            data.len()
        )));
    }
    let data = &data[..expected];
    let (width, height) = (width as usize, height as usize);

    match kind {
        SourceKind::Rgba8 { alpha } => {
            let mut rgba = data.to_vec();
            if !alpha {
                force_opaque(&mut rgba);
            }
            Ok(rgba)
        }
        SourceKind::Bgra8 { alpha } => {
            // BGRA to RGBA
            let mut rgba = data.to_vec();
            for chunk in rgba.chunks_exact_mut(4) {
                chunk.swap(0, 2);
                if !alpha {
                    chunk[3] = 255;
                }
            }
            Ok(rgba)
        }
        _ => Ok(decode_blocks(kind, data, width, height)),
    }
}

pub(crate) fn force_opaque(rgba: &mut [u8]) {
    for pixel in rgba.chunks_exact_mut(4) {
        pixel[3] = 255;
    }
}

// ============================================================================
// Block Compression (BC) formats - unified decoder using bcdec_rs
// ============================================================================

fn decode_blocks(kind: SourceKind, data: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; width * height * 4];
    let blocks_x = width.div_ceil(4);
    let block_size = kind.block_size().unwrap_or(16);
    let channels = kind.decoded_channels();

    // One 4x4 block at up to 4 bytes per pixel
    let mut block_out = [0u8; 64];
    let pitch = 4 * channels;

    for (index, block) in data.chunks_exact(block_size).enumerate() {
        let (bx, by) = (index % blocks_x, index / blocks_x);

        match kind {
            SourceKind::Bc1 => bcdec_rs::bc1(block, &mut block_out, pitch),
            SourceKind::Bc2 => bcdec_rs::bc2(block, &mut block_out, pitch),
            SourceKind::Bc3 => bcdec_rs::bc3(block, &mut block_out, pitch),
            SourceKind::Bc4 => bcdec_rs::bc4(block, &mut block_out, pitch, false),
            SourceKind::Bc5 { .. } => bcdec_rs::bc5(block, &mut block_out, pitch, false),
            SourceKind::Bc7 => bcdec_rs::bc7(block, &mut block_out, pitch),
            SourceKind::Bgra8 { .. } | SourceKind::Rgba8 { .. } => return rgba,
        }

        for py in 0..4 {
            for px in 0..4 {
                let (fx, fy) = (bx * 4 + px, by * 4 + py);
                if fx >= width || fy >= height {
                    continue;
                }
                let src = &block_out[(py * 4 + px) * channels..][..channels];
                let dst = (fy * width + fx) * 4;
                rgba[dst..dst + 4].copy_from_slice(&expand_pixel(kind, src));
            }
        }
    }

    rgba
}

fn expand_pixel(kind: SourceKind, src: &[u8]) -> [u8; 4] {
    match kind {
        SourceKind::Bc4 => [src[0], src[0], src[0], 255],
        SourceKind::Bc5 { y_first: true } => [src[1], src[0], 0, 255],
        SourceKind::Bc5 { y_first: false } => [src[0], src[1], 0, 255],
        _ => [src[0], src[1], src[2], src[3]],
    }
}
