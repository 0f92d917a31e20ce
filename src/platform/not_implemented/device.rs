// glsurface/src/platform/not_implemented/device.rs
//
//! A stub implementation of `Backend` that reports errors when used.

use crate::{Backend, Error, PixelFormatAttributes};

use euclid::default::Size2D;

#[derive(Clone, Debug)]
pub struct Device {
    _private: (),
}

pub enum PixelFormat {}

pub enum Context {}

pub enum Drawable {}

impl Device {
    #[inline]
    pub fn new() -> Result<Device, Error> {
        Err(Error::UnsupportedOnThisPlatform)
    }
}

impl Backend for Device {
    type PixelFormat = PixelFormat;
    type Context = Context;
    type Drawable = Drawable;

    fn choose_pixel_format(&self, _: &PixelFormatAttributes) -> Result<PixelFormat, Error> {
        Err(Error::UnsupportedOnThisPlatform)
    }

    fn create_context(&self, pixel_format: &PixelFormat) -> Result<Context, Error> {
        match *pixel_format {}
    }

    fn destroy_context(&self, context: &mut Context) -> Result<(), Error> {
        match *context {}
    }

    fn create_drawable(
        &self,
        context: &Context,
        _: &PixelFormat,
        _: &Size2D<i32>,
    ) -> Result<Drawable, Error> {
        match *context {}
    }

    fn destroy_drawable(&self, context: &Context, _: &mut Drawable) -> Result<(), Error> {
        match *context {}
    }

    fn make_current(&self, context: &Context, _: Option<&Drawable>) -> Result<(), Error> {
        match *context {}
    }

    fn make_no_context_current(&self, context: &Context) -> Result<(), Error> {
        match *context {}
    }

    fn is_current(&self, context: &Context) -> bool {
        match *context {}
    }

    fn read_pixels(&self, context: &Context, _: &Drawable, _: &Size2D<i32>) -> Result<Vec<u32>, Error> {
        match *context {}
    }
}
