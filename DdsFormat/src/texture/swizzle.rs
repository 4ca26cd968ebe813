//! Channel swizzles for the DXT5 variants
//!
//! The variant is marked by a four-character code in the header's
//! RGB bit-count field while the FourCC stays `DXT5`.

use crate::options::PixelFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Swizzle {
    /// YCoCg with luma in alpha.
    CCxY,
    /// Green in green, red in alpha.
    XGxR,
    /// Red moved to alpha.
    XGBR,
    /// Red and alpha exchanged.
    AGBR,
}

impl Swizzle {
    pub(crate) const fn for_format(format: PixelFormat) -> Option<Self> {
        match format {
            PixelFormat::Dxt5CCxY => Some(Self::CCxY),
            PixelFormat::Dxt5xGxR => Some(Self::XGxR),
            PixelFormat::Dxt5xGBR => Some(Self::XGBR),
            PixelFormat::Dxt5AGBR => Some(Self::AGBR),
            _ => None,
        }
    }

    pub(crate) const fn format(self) -> PixelFormat {
        match self {
            Self::CCxY => PixelFormat::Dxt5CCxY,
            Self::XGxR => PixelFormat::Dxt5xGxR,
            Self::XGBR => PixelFormat::Dxt5xGBR,
            Self::AGBR => PixelFormat::Dxt5AGBR,
        }
    }

    /// Value stored in the RGB bit-count field.
    pub(crate) const fn marker(self) -> u32 {
        u32::from_le_bytes(match self {
            Self::CCxY => *b"CCxY",
            Self::XGxR => *b"xGxR",
            Self::XGBR => *b"xGBR",
            Self::AGBR => *b"AGBR",
        })
    }

    pub(crate) fn from_marker(marker: u32) -> Option<Self> {
        [Self::CCxY, Self::XGxR, Self::XGBR, Self::AGBR]
            .into_iter()
            .find(|swizzle| swizzle.marker() == marker)
    }

    /// Rearrange plain RGBA pixels into the stored layout.
    pub(crate) fn apply(self, rgba: &mut [u8]) {
        for pixel in rgba.chunks_exact_mut(4) {
            let [r, g, b, a] = [pixel[0], pixel[1], pixel[2], pixel[3]];
            let stored = match self {
                Self::CCxY => {
                    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
                    let y = (r + 2 * g + b + 2) >> 2;
                    let co = ((r - b + 1) >> 1) + 128;
                    let cg = ((-r + 2 * g - b + 2) >> 2) + 128;
                    [clamp(co), clamp(cg), 0, clamp(y)]
                }
                Self::XGxR => [0, g, 0, r],
                Self::XGBR => [0, g, b, r],
                Self::AGBR => [a, g, b, r],
            };
            pixel.copy_from_slice(&stored);
        }
    }

    /// Restore plain RGBA from the stored layout. Alpha is lost for every
    /// variant except `AGBR`.
    pub(crate) fn undo(self, rgba: &mut [u8]) {
        for pixel in rgba.chunks_exact_mut(4) {
            let [r, g, b, a] = [pixel[0], pixel[1], pixel[2], pixel[3]];
            let plain = match self {
                Self::CCxY => {
                    let y = i32::from(a);
                    let co = i32::from(r) - 128;
                    let cg = i32::from(g) - 128;
                    [clamp(y + co - cg), clamp(y + cg), clamp(y - co - cg), 255]
                }
                Self::XGxR => [a, g, 0, 255],
                Self::XGBR => [a, g, b, 255],
                Self::AGBR => [a, g, b, r],
            };
            pixel.copy_from_slice(&plain);
        }
    }
}

fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}
