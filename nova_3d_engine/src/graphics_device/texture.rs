/// Texture trait, texture descriptor, and texture info

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,
    D24_UNORM_S8_UINT,
    D32_FLOAT,
}

impl TextureFormat {
    /// Bytes per pixel
    pub fn size_bytes(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM | TextureFormat::R8G8B8A8_SRGB => 4,
            TextureFormat::R16G16B16A16_SFLOAT => 8,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
            TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_FLOAT => 4,
        }
    }

    /// Whether this is a depth (or depth/stencil) format
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_FLOAT)
    }
}

/// Texture usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureUsage {
    /// Texture can be sampled in shaders
    Sampled,
    /// Texture can be rendered to and sampled afterwards
    SampledAndRenderTarget,
    /// Texture can be used as depth/stencil attachment
    DepthStencil,
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    /// Plain 2D texture
    Tex2D,
    /// Six-face cube map
    Cube,
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage
    pub usage: TextureUsage,
    /// 2D or cube
    pub texture_type: TextureType,
    /// Optional initial pixel data
    pub data: Option<Vec<u8>>,
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
    pub texture_type: TextureType,
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types.
/// The texture is destroyed when the last reference is dropped.
pub trait Texture: Send + Sync {
    /// Stable backend handle id
    fn id(&self) -> u64;

    /// Read-only properties of this texture
    fn info(&self) -> &TextureInfo;
}
