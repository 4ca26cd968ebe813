//! Scripting terminology: keys, enum types and their values

use crate::host::OsType;
use crate::options::{AlphaMode, MipFilter, PixelFormat};

pub const KEY_FORMAT: OsType = OsType::new(*b"DDSf");
pub const KEY_ALPHA: OsType = OsType::new(*b"DDSa");
pub const KEY_PREMULTIPLY: OsType = OsType::new(*b"DDSp");
pub const KEY_MIPMAP: OsType = OsType::new(*b"DDSm");
pub const KEY_FILTER: OsType = OsType::new(*b"DDSq");
pub const KEY_CUBEMAP: OsType = OsType::new(*b"DDSc");

pub const TYPE_FORMAT: OsType = OsType::new(*b"DXTn");
pub const TYPE_ALPHA: OsType = OsType::new(*b"alfT");
pub const TYPE_FILTER: OsType = OsType::new(*b"filT");

const FORMAT_CODES: [(PixelFormat, [u8; 4]); 10] = [
    (PixelFormat::Dxt1, *b"DXT1"),
    (PixelFormat::Dxt1a, *b"DX1a"),
    (PixelFormat::Dxt2, *b"DXT2"),
    (PixelFormat::Dxt3, *b"DXT3"),
    (PixelFormat::Dxt4, *b"DXT4"),
    (PixelFormat::Dxt5, *b"DXT5"),
    (PixelFormat::Dxt5a, *b"DX5a"),
    (PixelFormat::ThreeDc, *b"D3Dc"),
    (PixelFormat::Dxn, *b"DXNc"),
    (PixelFormat::Uncompressed, *b"DXun"),
];

const ALPHA_CODES: [(AlphaMode, [u8; 4]); 3] = [
    (AlphaMode::None, *b"Nalf"),
    (AlphaMode::Transparency, *b"Talf"),
    (AlphaMode::Channel, *b"Calf"),
];

const FILTER_CODES: [(MipFilter, [u8; 4]); 5] = [
    (MipFilter::Box, *b"Bfil"),
    (MipFilter::Tent, *b"Tfil"),
    (MipFilter::Lanczos4, *b"Lfil"),
    (MipFilter::Mitchell, *b"Mfil"),
    (MipFilter::Kaiser, *b"Kfil"),
];

/// Unknown codes read as DXT5.
pub fn format_from_key(key: OsType) -> PixelFormat {
    FORMAT_CODES
        .iter()
        .find(|(_, code)| OsType::new(*code) == key)
        .map_or(PixelFormat::Dxt5, |(format, _)| *format)
}

/// Formats without a scripting code (the swizzled DXT5 family) are
/// written as DXT5.
pub fn format_to_key(format: PixelFormat) -> OsType {
    FORMAT_CODES
        .iter()
        .find(|(f, _)| *f == format)
        .map_or(OsType::new(*b"DXT5"), |(_, code)| OsType::new(*code))
}

/// Unknown codes read as transparency.
pub fn alpha_from_key(key: OsType) -> AlphaMode {
    ALPHA_CODES
        .iter()
        .find(|(_, code)| OsType::new(*code) == key)
        .map_or(AlphaMode::Transparency, |(alpha, _)| *alpha)
}

pub fn alpha_to_key(alpha: AlphaMode) -> OsType {
    ALPHA_CODES
        .iter()
        .find(|(a, _)| *a == alpha)
        .map_or(OsType::new(*b"Talf"), |(_, code)| OsType::new(*code))
}

/// Unknown codes read as Mitchell.
pub fn filter_from_key(key: OsType) -> MipFilter {
    FILTER_CODES
        .iter()
        .find(|(_, code)| OsType::new(*code) == key)
        .map_or(MipFilter::Mitchell, |(filter, _)| *filter)
}

pub fn filter_to_key(filter: MipFilter) -> OsType {
    FILTER_CODES
        .iter()
        .find(|(f, _)| *f == filter)
        .map_or(OsType::new(*b"Mfil"), |(_, code)| OsType::new(*code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scriptable_formats_round_trip() {
        for (format, code) in FORMAT_CODES {
            assert_eq!(format_to_key(format), OsType::new(code));
            assert_eq!(format_from_key(OsType::new(code)), format);
        }
    }

    #[test]
    fn test_swizzled_formats_write_as_dxt5() {
        for format in [
            PixelFormat::Dxt5CCxY,
            PixelFormat::Dxt5xGxR,
            PixelFormat::Dxt5xGBR,
            PixelFormat::Dxt5AGBR,
        ] {
            assert_eq!(format_to_key(format), OsType::new(*b"DXT5"));
        }
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        let junk = OsType::new(*b"????");
        assert_eq!(format_from_key(junk), PixelFormat::Dxt5);
        assert_eq!(alpha_from_key(junk), AlphaMode::Transparency);
        assert_eq!(filter_from_key(junk), MipFilter::Mitchell);
    }

    #[test]
    fn test_alpha_and_filter_codes() {
        assert_eq!(alpha_to_key(AlphaMode::Channel), OsType::new(*b"Calf"));
        assert_eq!(alpha_from_key(OsType::new(*b"Nalf")), AlphaMode::None);
        assert_eq!(filter_to_key(MipFilter::Lanczos4), OsType::new(*b"Lfil"));
        assert_eq!(filter_from_key(OsType::new(*b"Kfil")), MipFilter::Kaiser);
    }
}
