// glsurface/src/platform/macos/cgl/ffi.rs
//
//! FFI declarations not provided by the upstream `cgl` crate.

use cgl::{CGLContextObj, CGLError, CGLPixelFormatAttribute};
use std::os::raw::c_int;

#[allow(non_camel_case_types)]
pub(crate) type CGLContextEnable = c_int;

// Lets the driver run GL work on a worker thread of its own.
#[allow(non_upper_case_globals)]
pub(crate) const kCGLCEMPEngine: CGLContextEnable = 313;

#[allow(non_upper_case_globals)]
pub(crate) const kCGLPFAAccelerated: CGLPixelFormatAttribute = 73;

#[link(name = "OpenGL", kind = "framework")]
extern "C" {
    pub(crate) fn CGLEnable(ctx: CGLContextObj, pname: CGLContextEnable) -> CGLError;
}
