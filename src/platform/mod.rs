// glsurface/src/platform/mod.rs
//
//! Platform-specific backends.

#[cfg(macos)]
pub mod macos;
#[cfg(macos)]
pub use macos::cgl as default;

#[cfg(linux)]
pub mod unix;
#[cfg(linux)]
pub use unix::x11 as default;

#[cfg(not(any(macos, linux)))]
pub mod not_implemented;
#[cfg(not(any(macos, linux)))]
pub use not_implemented as default;

pub mod mock;
