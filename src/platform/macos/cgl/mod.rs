// glsurface/src/platform/macos/cgl/mod.rs
//
//! Bindings to Apple's OpenGL implementation on macOS.
//!
//! Surfaces render into a framebuffer object; CGL contexts have no off-screen default
//! framebuffer of their own.

pub mod context;
pub mod device;
pub mod surface;

mod error;
mod ffi;
