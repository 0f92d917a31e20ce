// glsurface/src/platform/unix/x11/context.rs
//
//! Wrapper for GLX contexts and visuals.

use super::connection::OwnedDisplay;
use super::device::Device;
use super::error::XErrorTrap;
use crate::gl_utils::{self, Gl};
use crate::{Error, PixelFormatAttributes, PixelFormatFlags, WindowingApiError};

use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;
use std::sync::{Arc, OnceLock};
use x11_dl::glx::{Glx, GLXContext, GLX_ALPHA_SIZE, GLX_BLUE_SIZE, GLX_DEPTH_SIZE};
use x11_dl::glx::{GLX_DOUBLEBUFFER, GLX_GREEN_SIZE, GLX_RED_SIZE, GLX_RGBA, GLX_STENCIL_SIZE};
use x11_dl::xlib::{self, XVisualInfo};

/// A GLX visual, together with the display connection it was chosen on.
///
/// Every context and pixmap created from the visual uses that connection; it is closed when the
/// last of them, and the visual, are gone.
pub struct PixelFormat {
    pub(crate) display: Arc<OwnedDisplay>,
    pub(crate) visual_info: *mut XVisualInfo,
}

unsafe impl Send for PixelFormat {}
unsafe impl Sync for PixelFormat {}

impl Drop for PixelFormat {
    fn drop(&mut self) {
        unsafe {
            (self.display.libraries.xlib.XFree)(self.visual_info as *mut c_void);
        }
    }
}

/// A GLX rendering context.
///
/// GL entry points are loaded the first time the context is current.
pub struct Context {
    pub(crate) glx_context: GLXContext,
    pub(crate) display: Arc<OwnedDisplay>,
    gl: OnceLock<Gl>,
}

unsafe impl Send for Context {}

impl Context {
    /// Returns the context's GL functions, loading them if needed. The context must be current.
    pub(crate) fn gl(&self) -> &Gl {
        let glx = &self.display.libraries.glx;
        self.gl
            .get_or_init(|| unsafe { gl_utils::load_with(|name| get_proc_address(glx, name)) })
    }
}

impl Device {
    pub(crate) fn choose_pixel_format(
        &self,
        attributes: &PixelFormatAttributes,
    ) -> Result<PixelFormat, Error> {
        let display = Arc::new(OwnedDisplay::open(&self.libraries)?);

        let flags = attributes.flags;
        let mut visual_attributes = vec![GLX_RGBA];
        if flags.contains(PixelFormatFlags::DOUBLE_BUFFER) {
            visual_attributes.push(GLX_DOUBLEBUFFER);
        }
        let color_sizes = [GLX_RED_SIZE, 8, GLX_GREEN_SIZE, 8, GLX_BLUE_SIZE, 8];
        visual_attributes.extend_from_slice(&color_sizes);
        if flags.contains(PixelFormatFlags::ALPHA) {
            visual_attributes.extend_from_slice(&[GLX_ALPHA_SIZE, 8]);
        }
        if flags.contains(PixelFormatFlags::DEPTH) {
            visual_attributes.extend_from_slice(&[GLX_DEPTH_SIZE, 24]);
        }
        if flags.contains(PixelFormatFlags::STENCIL) {
            visual_attributes.extend_from_slice(&[GLX_STENCIL_SIZE, 8]);
        }
        visual_attributes.push(0);

        unsafe {
            let xlib = &self.libraries.xlib;
            let visual_info = (self.libraries.glx.glXChooseVisual)(
                display.display(),
                (xlib.XDefaultScreen)(display.display()),
                visual_attributes.as_mut_ptr(),
            );
            if visual_info.is_null() {
                return Err(Error::VisualSelectionFailed);
            }
            Ok(PixelFormat { display, visual_info })
        }
    }

    pub(crate) fn create_context(&self, pixel_format: &PixelFormat) -> Result<Context, Error> {
        let display = pixel_format.display.clone();
        let trap = XErrorTrap::new(&display);
        let glx_context = unsafe {
            (self.libraries.glx.glXCreateContext)(
                display.display(),
                pixel_format.visual_info,
                ptr::null_mut(),
                xlib::True,
            )
        };
        let result = trap.finish();

        let mut context = Context { glx_context, display, gl: OnceLock::new() };
        match (result, glx_context.is_null()) {
            (Ok(()), false) => Ok(context),
            (Ok(()), true) => Err(Error::ContextCreationFailed(WindowingApiError::BadContext)),
            (Err(err), _) => {
                // Best effort; the creation error is the one worth reporting.
                let _ = self.destroy_context(&mut context);
                Err(Error::ContextCreationFailed(err))
            }
        }
    }

    pub(crate) fn destroy_context(&self, context: &mut Context) -> Result<(), Error> {
        if context.glx_context.is_null() {
            return Ok(());
        }

        let glx = &self.libraries.glx;
        let trap = XErrorTrap::new(&context.display);
        unsafe {
            if (glx.glXGetCurrentContext)() == context.glx_context {
                (glx.glXMakeCurrent)(context.display.display(), 0, ptr::null_mut());
            }
            (glx.glXDestroyContext)(context.display.display(), context.glx_context);
        }
        context.glx_context = ptr::null_mut();
        trap.finish().map_err(Error::ContextDestructionFailed)
    }

    pub(crate) fn make_no_context_current(&self, context: &Context) -> Result<(), Error> {
        let trap = XErrorTrap::new(&context.display);
        let ok = unsafe {
            (self.libraries.glx.glXMakeCurrent)(context.display.display(), 0, ptr::null_mut())
        };
        trap.finish().map_err(Error::ContextDeactivationFailed)?;
        if ok == xlib::False {
            return Err(Error::ContextDeactivationFailed(WindowingApiError::Failed));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn is_current(&self, context: &Context) -> bool {
        unsafe {
            !context.glx_context.is_null()
                && (self.libraries.glx.glXGetCurrentContext)() == context.glx_context
        }
    }
}

fn get_proc_address(glx: &Glx, symbol_name: &str) -> *const c_void {
    let symbol_name = match CString::new(symbol_name) {
        Ok(symbol_name) => symbol_name,
        Err(_) => return ptr::null(),
    };
    unsafe {
        match (glx.glXGetProcAddress)(symbol_name.as_ptr() as *const u8) {
            Some(function) => function as *const c_void,
            None => ptr::null(),
        }
    }
}
