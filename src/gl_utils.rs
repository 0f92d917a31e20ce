// glsurface/src/gl_utils.rs
//
//! Various OpenGL utilities used by the different backends.

use glow::HasContext;

use euclid::default::Size2D;
use std::os::raw::c_void;

pub(crate) type Gl = glow::Context;

/// Loads GL entry points through a platform lookup function.
///
/// The context the functions belong to must be current: `glow` queries the version and extension
/// strings while loading.
#[allow(dead_code)]
pub(crate) unsafe fn load_with<F>(get_proc_address: F) -> Gl
where
    F: FnMut(&str) -> *const c_void,
{
    Gl::from_loader_function(get_proc_address)
}

/// Reads back `size` pixels from `framebuffer_object` (or the drawable's own buffer if `None`) as
/// RGBA8 words in native byte order.
#[allow(dead_code)]
pub(crate) fn read_pixels(
    gl: &Gl,
    framebuffer_object: Option<glow::Framebuffer>,
    size: &Size2D<i32>,
) -> Vec<u32> {
    let mut bytes = vec![0; size.width as usize * size.height as usize * 4];
    unsafe {
        if framebuffer_object.is_some() {
            gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer_object);
        }
        gl.pixel_store_i32(glow::PACK_ALIGNMENT, 4);
        gl.read_pixels(
            0,
            0,
            size.width,
            size.height,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelPackData::Slice(Some(&mut bytes[..])),
        );
    }

    bytes
        .chunks_exact(4)
        .map(|pixel| u32::from_ne_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]))
        .collect()
}
