// glsurface/src/platform/not_implemented/mod.rs
//
//! A stub backend to allow this crate to compile on platforms without CGL or GLX.
//!
//! `Device::new()` fails with `Error::UnsupportedOnThisPlatform`, so none of its handle types can
//! ever be constructed.

pub mod device;
