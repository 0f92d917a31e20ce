// glsurface/src/platform/unix/x11/surface.rs
//
//! Wrapper for GL-renderable pixmaps on X11.

use super::connection::OwnedDisplay;
use super::context::{Context, PixelFormat};
use super::device::Device;
use super::error::XErrorTrap;
use crate::{gl_utils, Error, WindowingApiError};

use euclid::default::Size2D;
use std::os::raw::c_uint;
use std::ptr;
use std::sync::Arc;
use x11_dl::glx::GLXPixmap;
use x11_dl::xlib::{self, Pixmap};

/// An X pixmap and the GLX pixmap wrapping it.
pub struct Drawable {
    pub(crate) glx_pixmap: GLXPixmap,
    pub(crate) pixmap: Pixmap,
    display: Arc<OwnedDisplay>,
}

unsafe impl Send for Drawable {}

impl Device {
    pub(crate) fn create_drawable(
        &self,
        pixel_format: &PixelFormat,
        size: &Size2D<i32>,
    ) -> Result<Drawable, Error> {
        let display = pixel_format.display.clone();
        let (xlib, glx) = (&self.libraries.xlib, &self.libraries.glx);

        // Pixmap creation fails asynchronously; a nonzero XID means nothing until the server
        // has seen the request.
        let trap = XErrorTrap::new(&display);
        let (pixmap, glx_pixmap) = unsafe {
            // The pixmap has to match the visual's depth for GLX to accept it.
            let depth = (*pixel_format.visual_info).depth as c_uint;
            let pixmap = (xlib.XCreatePixmap)(
                display.display(),
                (xlib.XDefaultRootWindow)(display.display()),
                size.width as c_uint,
                size.height as c_uint,
                depth,
            );
            let glx_pixmap = if pixmap == 0 {
                0
            } else {
                (glx.glXCreateGLXPixmap)(display.display(), pixel_format.visual_info, pixmap)
            };
            (pixmap, glx_pixmap)
        };
        let result = trap.finish();

        let mut drawable = Drawable { glx_pixmap, pixmap, display };
        let err = match result {
            Ok(()) if pixmap == 0 => WindowingApiError::Failed,
            Ok(()) if glx_pixmap == 0 => WindowingApiError::BadDrawable,
            Ok(()) => return Ok(drawable),
            Err(err) => err,
        };

        // Whatever the server did create goes; errors about what it didn't are expected.
        let _ = self.destroy_drawable(&mut drawable);
        Err(Error::DrawableCreationFailed(err))
    }

    pub(crate) fn destroy_drawable(&self, drawable: &mut Drawable) -> Result<(), Error> {
        let (xlib, glx) = (&self.libraries.xlib, &self.libraries.glx);
        let display = drawable.display.clone();

        let trap = XErrorTrap::new(&display);
        unsafe {
            if drawable.glx_pixmap != 0 {
                if (glx.glXGetCurrentDrawable)() == drawable.glx_pixmap {
                    (glx.glXMakeCurrent)(display.display(), 0, ptr::null_mut());
                }
                (glx.glXDestroyGLXPixmap)(display.display(), drawable.glx_pixmap);
                drawable.glx_pixmap = 0;
            }
            if drawable.pixmap != 0 {
                (xlib.XFreePixmap)(display.display(), drawable.pixmap);
                drawable.pixmap = 0;
            }
        }
        trap.finish().map_err(Error::DrawableDestructionFailed)
    }

    pub(crate) fn make_context_current(
        &self,
        context: &Context,
        drawable: Option<&Drawable>,
    ) -> Result<(), Error> {
        // GLX 1.x can't bind a context without a drawable.
        let glx_pixmap = match drawable {
            Some(drawable) => drawable.glx_pixmap,
            None => return Err(Error::ContextActivationFailed(WindowingApiError::BadDrawable)),
        };

        let trap = XErrorTrap::new(&context.display);
        let ok = unsafe {
            (self.libraries.glx.glXMakeCurrent)(
                context.display.display(),
                glx_pixmap,
                context.glx_context,
            )
        };
        trap.finish().map_err(Error::ContextActivationFailed)?;
        if ok == xlib::False {
            return Err(Error::ContextActivationFailed(WindowingApiError::Failed));
        }
        Ok(())
    }

    pub(crate) fn read_drawable_pixels(&self, context: &Context, size: &Size2D<i32>) -> Vec<u32> {
        gl_utils::read_pixels(context.gl(), None, size)
    }
}
