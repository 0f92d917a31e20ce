// glsurface/src/platform/unix/x11/device.rs
//
//! The GLX implementation of `Backend`.

use super::connection::Libraries;
use super::context::{Context, PixelFormat};
use super::surface::Drawable;
use crate::{Backend, Error, PixelFormatAttributes};

use euclid::default::Size2D;
use std::sync::Arc;

/// GLX on Xlib.
///
/// Display connections are opened per pixel format, not per device.
#[derive(Clone)]
pub struct Device {
    pub(crate) libraries: Arc<Libraries>,
}

impl Device {
    /// Loads Xlib and GLX. Fails with `NoGLLibraryFound` if either is missing.
    pub fn new() -> Result<Device, Error> {
        Ok(Device { libraries: Libraries::get()? })
    }
}

impl Backend for Device {
    type PixelFormat = PixelFormat;
    type Context = Context;
    type Drawable = Drawable;

    #[inline]
    fn choose_pixel_format(
        &self,
        attributes: &PixelFormatAttributes,
    ) -> Result<PixelFormat, Error> {
        Device::choose_pixel_format(self, attributes)
    }

    #[inline]
    fn create_context(&self, pixel_format: &PixelFormat) -> Result<Context, Error> {
        Device::create_context(self, pixel_format)
    }

    #[inline]
    fn destroy_context(&self, context: &mut Context) -> Result<(), Error> {
        Device::destroy_context(self, context)
    }

    #[inline]
    fn create_drawable(
        &self,
        _: &Context,
        pixel_format: &PixelFormat,
        size: &Size2D<i32>,
    ) -> Result<Drawable, Error> {
        Device::create_drawable(self, pixel_format, size)
    }

    #[inline]
    fn destroy_drawable(&self, _: &Context, drawable: &mut Drawable) -> Result<(), Error> {
        Device::destroy_drawable(self, drawable)
    }

    #[inline]
    fn make_current(&self, context: &Context, drawable: Option<&Drawable>) -> Result<(), Error> {
        self.make_context_current(context, drawable)
    }

    #[inline]
    fn make_no_context_current(&self, context: &Context) -> Result<(), Error> {
        Device::make_no_context_current(self, context)
    }

    #[inline]
    fn is_current(&self, context: &Context) -> bool {
        Device::is_current(self, context)
    }

    #[inline]
    fn read_pixels(
        &self,
        context: &Context,
        _: &Drawable,
        size: &Size2D<i32>,
    ) -> Result<Vec<u32>, Error> {
        Ok(self.read_drawable_pixels(context, size))
    }
}
