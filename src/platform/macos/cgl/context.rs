// glsurface/src/platform/macos/cgl/context.rs
//
//! Wrapper for Core OpenGL contexts and pixel formats.

use super::device::Device;
use super::error::ToWindowingApiError;
use super::ffi::{kCGLCEMPEngine, kCGLPFAAccelerated, CGLEnable};
use crate::gl_utils::{self, Gl};
use crate::{Error, GLProfile, PixelFormatAttributes, PixelFormatFlags};

use cgl::{kCGLPFAAlphaSize, kCGLPFADepthSize, kCGLPFAOpenGLProfile, kCGLPFAStencilSize};
use cgl::{CGLChoosePixelFormat, CGLContextObj, CGLCreateContext, CGLDestroyContext};
use cgl::{CGLDestroyPixelFormat, CGLError, CGLGetCurrentContext, CGLPixelFormatAttribute};
use cgl::{CGLPixelFormatObj, CGLSetCurrentContext};
use libc::{dlopen, dlsym, RTLD_LAZY};
use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;
use std::sync::{LazyLock, OnceLock};

// No CGL error occurred.
#[allow(non_upper_case_globals)]
pub(crate) const kCGLNoError: CGLError = 0;

// Choose a renderer compatible with GL 1.0.
#[allow(non_upper_case_globals)]
const kCGLOGLPVersion_Legacy: CGLPixelFormatAttribute = 0x1000;
// Choose a renderer capable of GL3.2 or later.
#[allow(non_upper_case_globals)]
const kCGLOGLPVersion_3_2_Core: CGLPixelFormatAttribute = 0x3200;

static OPENGL_FRAMEWORK: LazyLock<OpenGLFramework> = LazyLock::new(|| unsafe {
    OpenGLFramework(dlopen(
        c"/System/Library/Frameworks/OpenGL.framework/OpenGL".as_ptr(),
        RTLD_LAZY,
    ))
});

struct OpenGLFramework(*mut c_void);

unsafe impl Send for OpenGLFramework {}
unsafe impl Sync for OpenGLFramework {}

/// A CGL pixel format object.
///
/// Pixel format objects are immutable and thread-safe once chosen.
pub struct PixelFormat {
    cgl_pixel_format: CGLPixelFormatObj,
}

unsafe impl Send for PixelFormat {}
unsafe impl Sync for PixelFormat {}

impl Drop for PixelFormat {
    fn drop(&mut self) {
        unsafe {
            if CGLDestroyPixelFormat(self.cgl_pixel_format) != kCGLNoError {
                debug!("CGLDestroyPixelFormat returned an error");
            }
        }
    }
}

/// A CGL rendering context.
///
/// GL entry points are loaded the first time the context is current.
pub struct Context {
    pub(crate) cgl_context: CGLContextObj,
    gl: OnceLock<Gl>,
}

unsafe impl Send for Context {}

impl Context {
    /// Returns the context's GL functions, loading them if needed. The context must be current.
    pub(crate) fn gl(&self) -> &Gl {
        self.gl
            .get_or_init(|| unsafe { gl_utils::load_with(get_proc_address) })
    }
}

impl Device {
    pub(crate) fn choose_pixel_format(
        &self,
        attributes: &PixelFormatAttributes,
    ) -> Result<PixelFormat, Error> {
        // TODO: probe for GL 4.1 with `GL_ARB_ES2_compatibility` and prefer a core profile there.
        let profile = match attributes.profile {
            GLProfile::Legacy => kCGLOGLPVersion_Legacy,
            GLProfile::Core => kCGLOGLPVersion_3_2_Core,
        };

        let flags = attributes.flags;
        let alpha_size = if flags.contains(PixelFormatFlags::ALPHA) { 8 } else { 0 };
        let depth_size = if flags.contains(PixelFormatFlags::DEPTH) { 24 } else { 0 };
        let stencil_size = if flags.contains(PixelFormatFlags::STENCIL) { 8 } else { 0 };

        let mut cgl_pixel_format_attributes = vec![
            kCGLPFAOpenGLProfile,
            profile,
            kCGLPFAAlphaSize,
            alpha_size,
            kCGLPFADepthSize,
            depth_size,
            kCGLPFAStencilSize,
            stencil_size,
        ];
        if flags.contains(PixelFormatFlags::ACCELERATED) {
            cgl_pixel_format_attributes.push(kCGLPFAAccelerated);
        }
        cgl_pixel_format_attributes.push(0);

        unsafe {
            let (mut cgl_pixel_format, mut cgl_pixel_format_count) = (ptr::null_mut(), 0);
            let err = CGLChoosePixelFormat(
                cgl_pixel_format_attributes.as_ptr(),
                &mut cgl_pixel_format,
                &mut cgl_pixel_format_count,
            );
            if err != kCGLNoError {
                return Err(Error::PixelFormatSelectionFailed(err.to_windowing_api_error()));
            }
            if cgl_pixel_format.is_null() || cgl_pixel_format_count == 0 {
                return Err(Error::NoPixelFormatFound);
            }

            Ok(PixelFormat { cgl_pixel_format })
        }
    }

    pub(crate) fn create_context(&self, pixel_format: &PixelFormat) -> Result<Context, Error> {
        unsafe {
            let mut cgl_context = ptr::null_mut();
            let err = CGLCreateContext(
                pixel_format.cgl_pixel_format,
                ptr::null_mut(),
                &mut cgl_context,
            );
            if err != kCGLNoError {
                return Err(Error::ContextCreationFailed(err.to_windowing_api_error()));
            }
            debug_assert_ne!(cgl_context, ptr::null_mut());

            Ok(Context { cgl_context, gl: OnceLock::new() })
        }
    }

    pub(crate) fn enable_multithreaded_engine(&self, context: &Context) -> Result<(), Error> {
        unsafe {
            let err = CGLEnable(context.cgl_context, kCGLCEMPEngine);
            if err != kCGLNoError {
                debug!("CGLEnable(kCGLCEMPEngine) failed: {:?}", err.to_windowing_api_error());
                return Err(Error::MultithreadingExtensionUnavailable);
            }
            Ok(())
        }
    }

    pub(crate) fn destroy_context(&self, context: &mut Context) -> Result<(), Error> {
        if context.cgl_context.is_null() {
            return Ok(());
        }

        unsafe {
            if CGLGetCurrentContext() == context.cgl_context {
                CGLSetCurrentContext(ptr::null_mut());
            }
            let err = CGLDestroyContext(context.cgl_context);
            context.cgl_context = ptr::null_mut();
            if err != kCGLNoError {
                return Err(Error::ContextDestructionFailed(err.to_windowing_api_error()));
            }
        }

        Ok(())
    }

    pub(crate) fn make_context_current(&self, context: &Context) -> Result<(), Error> {
        unsafe {
            let err = CGLSetCurrentContext(context.cgl_context);
            if err != kCGLNoError {
                return Err(Error::ContextActivationFailed(err.to_windowing_api_error()));
            }
            Ok(())
        }
    }

    pub(crate) fn make_no_context_current(&self) -> Result<(), Error> {
        unsafe {
            let err = CGLSetCurrentContext(ptr::null_mut());
            if err != kCGLNoError {
                return Err(Error::ContextDeactivationFailed(err.to_windowing_api_error()));
            }
            Ok(())
        }
    }

    #[inline]
    pub(crate) fn is_current(&self, context: &Context) -> bool {
        unsafe { !context.cgl_context.is_null() && CGLGetCurrentContext() == context.cgl_context }
    }

    /// Runs `f` with `context` current, then restores whatever context the thread had before.
    pub(crate) fn with_context_current<F, T>(&self, context: &Context, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Gl) -> Result<T, Error>,
    {
        let _guard = CurrentContextGuard::new();
        self.make_context_current(context)?;
        f(context.gl())
    }
}

struct CurrentContextGuard {
    old_cgl_context: CGLContextObj,
}

impl Drop for CurrentContextGuard {
    fn drop(&mut self) {
        unsafe {
            CGLSetCurrentContext(self.old_cgl_context);
        }
    }
}

impl CurrentContextGuard {
    fn new() -> CurrentContextGuard {
        unsafe {
            CurrentContextGuard {
                old_cgl_context: CGLGetCurrentContext(),
            }
        }
    }
}

fn get_proc_address(symbol_name: &str) -> *const c_void {
    let symbol_name = match CString::new(symbol_name) {
        Ok(symbol_name) => symbol_name,
        Err(_) => return ptr::null(),
    };
    if OPENGL_FRAMEWORK.0.is_null() {
        return ptr::null();
    }
    unsafe { dlsym(OPENGL_FRAMEWORK.0, symbol_name.as_ptr()).cast_const() }
}
