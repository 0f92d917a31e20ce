// glsurface/src/platform/macos/cgl/device.rs
//
//! The CGL implementation of `Backend`.

use super::context::{Context, PixelFormat};
use super::surface::Drawable;
use crate::{Backend, Error, PixelFormatAttributes};

use euclid::default::Size2D;

/// Core OpenGL. CGL needs no connection object, so the device carries no state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Device;

impl Device {
    #[inline]
    pub fn new() -> Result<Device, Error> {
        Ok(Device)
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
    fn enable_multithreaded_engine(&self, context: &Context) -> Result<(), Error> {
        Device::enable_multithreaded_engine(self, context)
    }

    #[inline]
    fn destroy_context(&self, context: &mut Context) -> Result<(), Error> {
        Device::destroy_context(self, context)
    }

    #[inline]
    fn create_drawable(
        &self,
        context: &Context,
        _: &PixelFormat,
        size: &Size2D<i32>,
    ) -> Result<Drawable, Error> {
        Device::create_drawable(self, context, size)
    }

    #[inline]
    fn destroy_drawable(&self, context: &Context, drawable: &mut Drawable) -> Result<(), Error> {
        Device::destroy_drawable(self, context, drawable)
    }

    fn make_current(&self, context: &Context, drawable: Option<&Drawable>) -> Result<(), Error> {
        self.make_context_current(context)?;
        if let Some(drawable) = drawable {
            self.bind_drawable(context, drawable);
        }
        Ok(())
    }

    #[inline]
    fn make_no_context_current(&self, _: &Context) -> Result<(), Error> {
        Device::make_no_context_current(self)
    }

    #[inline]
    fn is_current(&self, context: &Context) -> bool {
        Device::is_current(self, context)
    }

    #[inline]
    fn read_pixels(
        &self,
        context: &Context,
        drawable: &Drawable,
        size: &Size2D<i32>,
    ) -> Result<Vec<u32>, Error> {
        Ok(self.read_drawable_pixels(context, drawable, size))
    }
}
