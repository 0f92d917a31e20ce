// glsurface/src/pixel_format.rs
//
//! Pixel formats that can be shared by many surfaces.

use crate::backend::CREATE_CONTEXT_MUTEX;
use crate::{Backend, Error, PixelFormatAttributes};

use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, PoisonError};

/// A reference-counted, read-only pixel format.
///
/// Choose it once, then hand clones to as many `GLSurface`s (on as many threads) as needed; format
/// negotiation is not repeated. It is never mutated after creation. The native format, and on X11
/// the display connection that goes with it, is released when the last clone and the last surface
/// created from it are gone.
pub struct SharedPixelFormat<B: Backend> {
    native: Arc<B::PixelFormat>,
}

impl<B: Backend> Clone for SharedPixelFormat<B> {
    #[inline]
    fn clone(&self) -> SharedPixelFormat<B> {
        SharedPixelFormat { native: self.native.clone() }
    }
}

impl<B: Backend> Debug for SharedPixelFormat<B> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "SharedPixelFormat({} holders)", self.holders())
    }
}

impl<B: Backend> SharedPixelFormat<B> {
    /// Asks `backend` for a pixel format matching `attributes`.
    pub fn new(
        backend: &B,
        attributes: &PixelFormatAttributes,
    ) -> Result<SharedPixelFormat<B>, Error> {
        let native = {
            let _guard = CREATE_CONTEXT_MUTEX
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            backend.choose_pixel_format(attributes)?
        };
        debug!("Chose pixel format for {:?}", attributes);
        Ok(SharedPixelFormat { native: Arc::new(native) })
    }

    /// Returns the backend's native pixel format.
    #[inline]
    pub fn native(&self) -> &B::PixelFormat {
        &self.native
    }

    /// How many handles (including surfaces) currently keep this format alive.
    #[inline]
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.native)
    }
}
