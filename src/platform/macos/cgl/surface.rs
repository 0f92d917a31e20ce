// glsurface/src/platform/macos/cgl/surface.rs
//
//! Framebuffer-object render targets for CGL contexts.

use super::context::Context;
use super::device::Device;
use crate::framebuffer::Framebuffer;
use crate::{gl_utils, Error};

use euclid::default::Size2D;

/// A framebuffer object with an `RGBA8` color and a `DEPTH24_STENCIL8` renderbuffer.
pub struct Drawable {
    pub(crate) framebuffer: Framebuffer,
}

impl Device {
    pub(crate) fn create_drawable(
        &self,
        context: &Context,
        size: &Size2D<i32>,
    ) -> Result<Drawable, Error> {
        let framebuffer = self.with_context_current(context, |gl| Framebuffer::new(gl, size))?;
        Ok(Drawable { framebuffer })
    }

    pub(crate) fn destroy_drawable(
        &self,
        context: &Context,
        drawable: &mut Drawable,
    ) -> Result<(), Error> {
        let framebuffer = &mut drawable.framebuffer;
        let result = self.with_context_current(context, |gl| {
            framebuffer.destroy(gl);
            Ok(())
        });
        if result.is_err() {
            drawable.framebuffer.leak();
        }
        result
    }

    pub(crate) fn bind_drawable(&self, context: &Context, drawable: &Drawable) {
        drawable.framebuffer.bind(context.gl());
    }

    pub(crate) fn read_drawable_pixels(
        &self,
        context: &Context,
        drawable: &Drawable,
        size: &Size2D<i32>,
    ) -> Vec<u32> {
        gl_utils::read_pixels(context.gl(), drawable.framebuffer.framebuffer_object, size)
    }
}
