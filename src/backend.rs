// glsurface/src/backend.rs
//
//! The capability set a platform GL binding layer has to provide.

use crate::{Error, PixelFormatAttributes};

use euclid::default::Size2D;
use std::sync::Mutex;

// Pixel format selection and context creation are serialized process-wide. CGL returns
// `kCGLBadConnection` if several threads open a display connection simultaneously.
pub(crate) static CREATE_CONTEXT_MUTEX: Mutex<()> = Mutex::new(());

/// A platform OpenGL binding layer (CGL, GLX, a test double, ...).
///
/// Exactly one implementation is the `platform::default` backend for a given build target. The
/// handles a backend hands out are owned by the caller and must be returned to the same backend
/// for destruction.
pub trait Backend: Clone + Send + Sync + 'static {
    /// A chosen pixel format (CGL pixel format object, GLX visual).
    ///
    /// Immutable once created; it may be shared between threads.
    type PixelFormat: Send + Sync + 'static;
    /// A native rendering context.
    type Context: Send + 'static;
    /// The off-screen render target backing a surface: a framebuffer object with its attachments,
    /// or a pixmap.
    type Drawable: Send + 'static;

    /// Picks a pixel format matching `attributes`.
    fn choose_pixel_format(
        &self,
        attributes: &PixelFormatAttributes,
    ) -> Result<Self::PixelFormat, Error>;

    /// Creates a rendering context against `pixel_format`.
    fn create_context(&self, pixel_format: &Self::PixelFormat) -> Result<Self::Context, Error>;

    /// Lets the driver parallelize its internal GL work for this context.
    ///
    /// Backends lacking such an extension keep the default, which reports it as unavailable.
    fn enable_multithreaded_engine(&self, _context: &Self::Context) -> Result<(), Error> {
        Err(Error::MultithreadingExtensionUnavailable)
    }

    /// Destroys a context, clearing it first if it is current on this thread.
    ///
    /// Calling this on an already-destroyed context does nothing.
    fn destroy_context(&self, context: &mut Self::Context) -> Result<(), Error>;

    /// Allocates an off-screen render target of `size` device pixels for `context`.
    ///
    /// Any context binding needed for the allocation is made internally and the thread's previous
    /// binding is restored afterwards.
    fn create_drawable(
        &self,
        context: &Self::Context,
        pixel_format: &Self::PixelFormat,
        size: &Size2D<i32>,
    ) -> Result<Self::Drawable, Error>;

    /// Releases a render target. Every part of it is released at most once.
    fn destroy_drawable(
        &self,
        context: &Self::Context,
        drawable: &mut Self::Drawable,
    ) -> Result<(), Error>;

    /// Makes `context` current on the calling thread, rendering into `drawable` if given.
    fn make_current(
        &self,
        context: &Self::Context,
        drawable: Option<&Self::Drawable>,
    ) -> Result<(), Error>;

    /// Leaves the calling thread with no current context.
    fn make_no_context_current(&self, context: &Self::Context) -> Result<(), Error>;

    /// Returns true if `context` is current on the calling thread.
    fn is_current(&self, context: &Self::Context) -> bool;

    /// Reads `size` pixels back from `drawable` as RGBA8 words, row by row.
    ///
    /// `context` must be current. Blocks until the GPU has finished outstanding work.
    fn read_pixels(
        &self,
        context: &Self::Context,
        drawable: &Self::Drawable,
        size: &Size2D<i32>,
    ) -> Result<Vec<u32>, Error>;
}
