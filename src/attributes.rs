// glsurface/src/attributes.rs
//
//! Requirements handed to the platform when it picks a pixel format.

bitflags! {
    /// Buffers and capabilities the pixel format must provide.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PixelFormatFlags: u8 {
        const ALPHA         = 0x01;
        const DEPTH         = 0x02;
        const STENCIL       = 0x04;
        const DOUBLE_BUFFER = 0x08;
        const ACCELERATED   = 0x10;
    }
}

/// The OpenGL profile a context is created against.
///
/// No version negotiation is performed: the legacy profile is requested unless a core profile is
/// asked for explicitly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GLProfile {
    /// Compatibility with GL 1.x/2.x entry points.
    Legacy,
    /// A GL 3.2 core context. Only honored by CGL; other backends fall back to `Legacy`.
    Core,
}

/// Describes the pixel format requested when a context is created.
///
/// Color channels are always 8 bits wide; depth is 24 bits and stencil 8 bits when requested.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelFormatAttributes {
    pub profile: GLProfile,
    pub flags: PixelFormatFlags,
}

impl PixelFormatAttributes {
    #[inline]
    pub fn new(profile: GLProfile, flags: PixelFormatFlags) -> PixelFormatAttributes {
        PixelFormatAttributes { profile, flags }
    }
}

impl Default for PixelFormatAttributes {
    /// RGBA8, 24-bit depth, 8-bit stencil, double-buffered, hardware-accelerated, legacy profile.
    fn default() -> PixelFormatAttributes {
        PixelFormatAttributes { profile: GLProfile::Legacy, flags: PixelFormatFlags::all() }
    }
}
