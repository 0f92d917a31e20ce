// glsurface/src/lib.rs
//
//! Off-screen OpenGL surfaces for multithreaded read-back.
//!
//! A `GLSurface` owns a rendering context bound to an off-screen render target: a framebuffer
//! object on macOS (CGL), a GLX pixmap on X11. Surfaces can be resized, which reallocates their
//! buffers, and activated on whichever thread wants to issue GL commands against them. The
//! platform layer sits behind the `Backend` trait; `platform::default` is the one native to the
//! build target and `platform::mock` is a GPU-free stand-in.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

pub mod platform;

pub mod error;
pub use crate::error::{Error, FramebufferIncompleteReason, WindowingApiError};

mod attributes;
pub use crate::attributes::{GLProfile, PixelFormatAttributes, PixelFormatFlags};

mod backend;
pub use crate::backend::Backend;

mod pixel_format;
pub use crate::pixel_format::SharedPixelFormat;

mod surface;
pub use crate::surface::{effective_size, GLSurface, SurfaceID, MAX_SURFACE_DIMENSION};

mod framebuffer;
mod gl_utils;
#[cfg(macos)]
mod renderbuffers;

#[cfg(test)]
mod tests;
