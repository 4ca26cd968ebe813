//! The shared parameter block exchanged on every selector call

use crate::script::DescriptorParameters;

/// Four-character code, stored big-endian the way multi-character literals
/// are on the host.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OsType(pub u32);

impl OsType {
    #[must_use]
    pub const fn new(code: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(code))
    }

    #[must_use]
    pub const fn bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl std::fmt::Debug for OsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", String::from_utf8_lossy(&self.bytes()))
    }
}

impl std::fmt::Display for OsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes()))
    }
}

/// Signature of the image editor host.
pub const HOST_EDITOR: OsType = OsType::new(*b"8BIM");
/// Signature of the pure-scripting host, which never shows dialogs.
pub const HOST_SCRIPTING: OsType = OsType::new(*b"FXTC");

/// Colour mode of the document handed over by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMode {
    Bitmap,
    Grayscale,
    Indexed,
    #[default]
    RgbColor,
    CmykColor,
    Lab,
}

/// Rectangle in document coordinates, edges exclusive on the right/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Rect {
    /// Rectangle covering a whole `width × height` image.
    #[must_use]
    pub const fn of_size(width: i32, height: i32) -> Self {
        Self {
            top: 0,
            left: 0,
            bottom: height,
            right: width,
        }
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Image size in both the legacy 16-bit and 32-bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageSize {
    pub width16: i16,
    pub height16: i16,
    pub width: i32,
    pub height: i32,
}

impl ImageSize {
    /// Fill both field sets from a 32-bit size, clamping the 16-bit pair.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        Self {
            width16: i16::try_from(width).unwrap_or(i16::MAX),
            height16: i16::try_from(height).unwrap_or(i16::MAX),
            width,
            height,
        }
    }
}

/// A named extra channel of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDesc {
    /// Display name of the channel.
    pub name: String,
    /// Host port used to read the channel's pixels.
    pub port: u32,
}

/// Document metadata the host offers while saving.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentInfo {
    /// The merged image has a transparency mask.
    pub merged_transparency: bool,
    /// Alpha channels, first one is used for "channel" alpha.
    pub alpha_channels: Vec<ChannelDesc>,
}

impl DocumentInfo {
    /// The channel used as the alpha source, if any.
    #[must_use]
    pub fn first_alpha_channel(&self) -> Option<&ChannelDesc> {
        self.alpha_channels.first()
    }
}

/// Parameter block shared between the host and the module.
///
/// Geometry and plane layout fields are written by the module on read and
/// by the host on write. `data_lent` mirrors whether pixel memory is
/// currently on loan to the host; see [`crate::host::DataLease`].
#[derive(Debug, Clone, Default)]
pub struct FormatRecord {
    pub host_sig: OsType,
    pub image_mode: ImageMode,
    pub depth: i16,
    pub image_size: ImageSize,
    pub planes: i16,
    pub transparency_plane: Option<i16>,
    pub transparency_matting: i16,

    pub lo_plane: i16,
    pub hi_plane: i16,
    pub col_bytes: i16,
    pub row_bytes: i32,
    pub plane_bytes: i32,
    pub the_rect: Rect,

    pub max_data: i32,
    pub min_data_bytes: i32,
    pub max_data_bytes: i32,

    pub host_supports_32bit_coordinates: bool,
    pub plugin_using_32bit_coordinates: bool,

    /// Persisted options block (`revertInfo` on the host side).
    pub revert_info: Option<Vec<u8>>,
    /// Whether the host lets the module allocate handles for `revert_info`.
    pub host_supports_handles: bool,

    pub document_info: Option<DocumentInfo>,
    /// Whether the host exposes channel ports for reading extra channels.
    pub channel_ports: bool,
    pub descriptor_parameters: Option<DescriptorParameters>,

    pub(crate) data_lent: bool,
}

impl FormatRecord {
    /// Record for `host_sig` with handle allocation and 32-bit coordinates.
    #[must_use]
    pub fn new(host_sig: OsType) -> Self {
        Self {
            host_sig,
            host_supports_handles: true,
            host_supports_32bit_coordinates: true,
            ..Self::default()
        }
    }

    /// Whether pixel memory is currently lent to the host.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data_lent
    }

    /// Image width, honouring the coordinate mode in use.
    #[must_use]
    pub fn width(&self) -> i32 {
        if self.plugin_using_32bit_coordinates {
            self.image_size.width
        } else {
            i32::from(self.image_size.width16)
        }
    }

    /// Image height, honouring the coordinate mode in use.
    #[must_use]
    pub fn height(&self) -> i32 {
        if self.plugin_using_32bit_coordinates {
            self.image_size.height
        } else {
            i32::from(self.image_size.height16)
        }
    }

    /// Whether the host is the pure-scripting host.
    #[must_use]
    pub fn is_scripting_host(&self) -> bool {
        self.host_sig == HOST_SCRIPTING
    }
}
