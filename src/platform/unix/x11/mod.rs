// glsurface/src/platform/unix/x11/mod.rs
//
//! Bindings to GLX via Xlib.
//!
//! Surfaces render into GLX pixmaps. Xlib and libGL are loaded at runtime through `x11-dl`, so a
//! missing X11 installation shows up as `Error::NoGLLibraryFound` rather than a link failure.

pub mod connection;
pub mod context;
pub mod device;
mod error;
pub mod surface;
