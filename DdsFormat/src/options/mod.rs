//! Read and write options
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

mod persist;

pub use persist::{OptionRecord, READ_RECORD_LEN, WRITE_RECORD_LEN, load, save};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the alpha of a texture comes from or goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphaMode {
    /// Ignore alpha.
    None,
    /// The document's merged transparency.
    Transparency,
    /// The document's first alpha channel.
    #[default]
    Channel,
}

impl AlphaMode {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Transparency => 1,
            Self::Channel => 2,
        }
    }

    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Transparency),
            2 => Some(Self::Channel),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Transparency => "transparency",
            Self::Channel => "channel",
        }
    }
}

/// Pixel format written to the DDS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// BC1, opaque.
    Dxt1,
    /// BC1 with 1-bit alpha.
    Dxt1a,
    /// BC2 with premultiplied alpha.
    Dxt2,
    /// BC2, explicit 4-bit alpha.
    Dxt3,
    /// BC3 with premultiplied alpha.
    Dxt4,
    /// BC3, interpolated alpha.
    #[default]
    Dxt5,
    /// Single channel (BC4 / `ATI1`).
    Dxt5a,
    /// Two channels, X then Y (`A2XY`).
    Dxn,
    /// DXT5 carrying YCoCg, luma in alpha.
    Dxt5CCxY,
    /// DXT5 normal map, red in alpha.
    Dxt5xGxR,
    /// DXT5 with red swapped into alpha.
    Dxt5xGBR,
    /// DXT5 with red and alpha swapped.
    Dxt5AGBR,
    /// Two channels, Y then X (`ATI2`).
    ThreeDc,
    /// 32-bit ARGB.
    Uncompressed,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 14] = [
        Self::Dxt1,
        Self::Dxt1a,
        Self::Dxt2,
        Self::Dxt3,
        Self::Dxt4,
        Self::Dxt5,
        Self::Dxt5a,
        Self::Dxn,
        Self::Dxt5CCxY,
        Self::Dxt5xGxR,
        Self::Dxt5xGBR,
        Self::Dxt5AGBR,
        Self::ThreeDc,
        Self::Uncompressed,
    ];

    /// Value stored in the persisted option record.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Dxt1 => 0,
            Self::Dxt1a => 1,
            Self::Dxt2 => 2,
            Self::Dxt3 => 3,
            Self::Dxt4 => 4,
            Self::Dxt5 => 5,
            Self::Dxt5a => 6,
            Self::Dxn => 7,
            Self::Dxt5CCxY => 8,
            Self::Dxt5xGxR => 9,
            Self::Dxt5xGBR => 10,
            Self::Dxt5AGBR => 11,
            Self::ThreeDc => 12,
            Self::Uncompressed => 13,
        }
    }

    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Formats defined to carry premultiplied colour.
    #[must_use]
    pub const fn is_premultiplied(self) -> bool {
        matches!(self, Self::Dxt2 | Self::Dxt4)
    }

    /// Whether the format can store an alpha channel at all.
    #[must_use]
    pub const fn stores_alpha(self) -> bool {
        !matches!(self, Self::Dxt1 | Self::Dxn | Self::ThreeDc | Self::Dxt5xGxR | Self::Dxt5xGBR)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dxt1 => "DXT1",
            Self::Dxt1a => "DXT1A",
            Self::Dxt2 => "DXT2",
            Self::Dxt3 => "DXT3",
            Self::Dxt4 => "DXT4",
            Self::Dxt5 => "DXT5",
            Self::Dxt5a => "DXT5A",
            Self::Dxn => "DXN",
            Self::Dxt5CCxY => "DXT5_CCxY",
            Self::Dxt5xGxR => "DXT5_xGxR",
            Self::Dxt5xGBR => "DXT5_xGBR",
            Self::Dxt5AGBR => "DXT5_AGBR",
            Self::ThreeDc => "3Dc",
            Self::Uncompressed => "Uncompressed",
        }
    }
}

/// Resampling filter used when building the mip chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MipFilter {
    Box,
    Tent,
    Lanczos4,
    #[default]
    Mitchell,
    Kaiser,
}

impl MipFilter {
    pub const ALL: [MipFilter; 5] = [
        Self::Box,
        Self::Tent,
        Self::Lanczos4,
        Self::Mitchell,
        Self::Kaiser,
    ];

    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Box => 0,
            Self::Tent => 1,
            Self::Lanczos4 => 2,
            Self::Mitchell => 3,
            Self::Kaiser => 4,
        }
    }

    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Tent => "tent",
            Self::Lanczos4 => "lanczos4",
            Self::Mitchell => "mitchell",
            Self::Kaiser => "kaiser",
        }
    }
}

/// Options applied when opening a DDS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    pub alpha: AlphaMode,
}

/// Options applied when saving a DDS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub format: PixelFormat,
    pub alpha: AlphaMode,
    pub premultiply: bool,
    pub mipmap: bool,
    pub filter: MipFilter,
    pub cubemap: bool,
}

// ============================================================================
// Parsing (CLI and preferences)
// ============================================================================

/// An option name that matched no known value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
}

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownOption {}

impl FromStr for AlphaMode {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "n" => Ok(Self::None),
            "transparency" | "t" => Ok(Self::Transparency),
            "channel" | "c" => Ok(Self::Channel),
            _ => Err(UnknownOption {
                kind: "alpha mode",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for PixelFormat {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|format| format.name().to_lowercase() == lower)
            .or(match lower.as_str() {
                "bc1" => Some(Self::Dxt1),
                "bc2" => Some(Self::Dxt3),
                "bc3" => Some(Self::Dxt5),
                "bc4" | "ati1" => Some(Self::Dxt5a),
                "bc5" | "ati2" => Some(Self::ThreeDc),
                "rgba" | "argb" => Some(Self::Uncompressed),
                _ => None,
            })
            .ok_or_else(|| UnknownOption {
                kind: "pixel format",
                value: s.to_string(),
            })
    }
}

impl FromStr for MipFilter {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|filter| filter.name() == lower)
            .ok_or_else(|| UnknownOption {
                kind: "mip filter",
                value: s.to_string(),
            })
    }
}
