// glsurface/src/platform/macos/mod.rs
//
//! macOS backends.

pub mod cgl;
