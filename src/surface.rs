// glsurface/src/surface.rs
//
//! Off-screen GL surfaces: a context plus the buffers it renders into.

use crate::backend::CREATE_CONTEXT_MUTEX;
use crate::platform::default::device::Device as DefaultDevice;
use crate::{Backend, Error, PixelFormatAttributes, SharedPixelFormat};

use euclid::default::Size2D;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::PoisonError;

static NEXT_SURFACE_ID: AtomicUsize = AtomicUsize::new(0);

/// Process-unique identifier of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceID(pub usize);

impl Display for SurfaceID {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", *self)
    }
}

/// An OpenGL rendering context bound to an off-screen render target.
///
/// The surface exclusively owns its context and its buffers. A freshly created surface has no
/// buffers; `resize()` allocates them, replacing any previous set. Rendering commands and pixel
/// read-backs must be bracketed by `activate()` and `deactivate()` on the thread issuing them.
///
/// Surfaces are `Send` but not `Sync`: move one to the thread that uses it, or put it behind a
/// lock if several threads must take turns on the same context.
///
/// Dropping a surface releases its buffers, then its context, then its reference to the pixel
/// format. Use `destroy()` to observe teardown failures; `Drop` only logs them.
pub struct GLSurface<B: Backend = DefaultDevice> {
    backend: B,
    context: B::Context,
    drawable: Option<B::Drawable>,
    size: Option<Size2D<i32>>,
    multithreaded: bool,
    id: SurfaceID,
    pixel_format: SharedPixelFormat<B>,
}

impl<B: Backend> Debug for GLSurface<B> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "GLSurface({}, {:?})", self.id.0, self.size)
    }
}

impl GLSurface<DefaultDevice> {
    /// Creates a surface on this platform's native backend with the default pixel format.
    pub fn new() -> Result<GLSurface<DefaultDevice>, Error> {
        GLSurface::with_backend(DefaultDevice::new()?)
    }
}

impl<B: Backend> GLSurface<B> {
    /// Creates a surface with a pixel format of its own.
    pub fn with_backend(backend: B) -> Result<GLSurface<B>, Error> {
        let pixel_format = SharedPixelFormat::new(&backend, &PixelFormatAttributes::default())?;
        GLSurface::with_pixel_format(backend, &pixel_format)
    }

    /// Creates a surface whose context uses an already-chosen pixel format.
    ///
    /// If context creation fails nothing is left allocated.
    pub fn with_pixel_format(
        backend: B,
        pixel_format: &SharedPixelFormat<B>,
    ) -> Result<GLSurface<B>, Error> {
        let context = {
            let _guard = CREATE_CONTEXT_MUTEX
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            backend.create_context(pixel_format.native())?
        };
        let id = SurfaceID(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed));

        let multithreaded = match backend.enable_multithreaded_engine(&context) {
            Ok(()) => true,
            Err(Error::MultithreadingExtensionUnavailable) => {
                debug!("{}: no multithreaded GL engine", id);
                false
            }
            Err(err) => {
                warn!("{}: {}", id, err);
                false
            }
        };

        debug!("Created {} (multithreaded engine: {})", id, multithreaded);
        Ok(GLSurface {
            backend,
            context,
            drawable: None,
            size: None,
            multithreaded,
            id,
            pixel_format: pixel_format.clone(),
        })
    }

    /// Reallocates the surface's buffers for `width` × `height` logical pixels at `pixel_ratio`
    /// device pixels per logical pixel, returning the size in device pixels.
    ///
    /// The old buffers are released before the new ones are allocated, so if allocation fails the
    /// surface is left without buffers. Invalid arguments are rejected before anything is released.
    /// The context does not have to be active; it is bound internally as needed.
    pub fn resize(
        &mut self,
        width: u16,
        height: u16,
        pixel_ratio: f32,
    ) -> Result<Size2D<i32>, Error> {
        let result = effective_size(width, height, pixel_ratio).and_then(|size| {
            self.release_buffers()?;
            let drawable =
                self.backend
                    .create_drawable(&self.context, self.pixel_format.native(), &size)?;
            self.drawable = Some(drawable);
            self.size = Some(size);
            Ok(size)
        });

        match result {
            Ok(size) => debug!("{}: resized to {}x{}", self.id, size.width, size.height),
            Err(err) => error!(
                "{}: resize to {}x{}@{} failed: {}",
                self.id, width, height, pixel_ratio, err
            ),
        }
        result
    }

    /// Releases the surface's buffers, if it has any.
    ///
    /// Calling this again, or on a surface that was never resized, does nothing.
    pub fn release_buffers(&mut self) -> Result<(), Error> {
        self.size = None;
        match self.drawable.take() {
            None => Ok(()),
            Some(mut drawable) => self.backend.destroy_drawable(&self.context, &mut drawable),
        }
    }

    /// Makes this surface's context current on the calling thread.
    ///
    /// After this returns `Ok`, GL commands issued on this thread target the surface's buffers.
    pub fn activate(&self) -> Result<(), Error> {
        self.backend
            .make_current(&self.context, self.drawable.as_ref())
            .map_err(|err| {
                warn!("{}: {}", self.id, err);
                err
            })
    }

    /// Leaves the calling thread with no current context.
    pub fn deactivate(&self) -> Result<(), Error> {
        self.backend
            .make_no_context_current(&self.context)
            .map_err(|err| {
                warn!("{}: {}", self.id, err);
                err
            })
    }

    /// Returns true if this surface's context is current on the calling thread.
    #[inline]
    pub fn is_current(&self) -> bool {
        self.backend.is_current(&self.context)
    }

    /// Reads the whole surface back as RGBA8 words, `width * height` of them, bottom row first.
    ///
    /// The surface must be active on the calling thread.
    pub fn read_pixels(&self) -> Result<Vec<u32>, Error> {
        let (drawable, size) = match (self.drawable.as_ref(), self.size.as_ref()) {
            (Some(drawable), Some(size)) => (drawable, size),
            _ => return Err(Error::NoBuffers),
        };
        if !self.is_current() {
            return Err(Error::NoCurrentContext);
        }
        self.backend.read_pixels(&self.context, drawable, size)
    }

    /// The size of the current buffers in device pixels, or `None` before a successful `resize()`.
    #[inline]
    pub fn size(&self) -> Option<Size2D<i32>> {
        self.size
    }

    #[inline]
    pub fn has_buffers(&self) -> bool {
        self.drawable.is_some()
    }

    /// Whether the driver's multithreaded GL engine was enabled for this context.
    #[inline]
    pub fn is_multithreaded(&self) -> bool {
        self.multithreaded
    }

    #[inline]
    pub fn id(&self) -> SurfaceID {
        self.id
    }

    #[inline]
    pub fn pixel_format(&self) -> &SharedPixelFormat<B> {
        &self.pixel_format
    }

    /// Returns the backend's context object.
    #[inline]
    pub fn native_context(&self) -> &B::Context {
        &self.context
    }

    /// Tears the surface down, reporting the first failure.
    ///
    /// Teardown continues past failures; the context is destroyed even if the buffers couldn't be.
    pub fn destroy(mut self) -> Result<(), Error> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<(), Error> {
        let buffers = self.release_buffers();
        let context = self.backend.destroy_context(&mut self.context);
        buffers.and(context)
    }
}

impl<B: Backend> Drop for GLSurface<B> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            warn!("{}: teardown failed: {}", self.id, err);
        }
    }
}

/// The largest effective width or height a surface may have, in device pixels.
///
/// At this size a full RGBA8 read-back is 1 GiB, which fits in memory addressable on every target.
pub const MAX_SURFACE_DIMENSION: i32 = 16384;

/// Scales a logical size by `pixel_ratio`, truncating toward zero.
///
/// `effective_size(400, 300, 2.0)` is 800×600. Non-positive or non-finite ratios are rejected, as
/// are results with a zero dimension or one larger than `MAX_SURFACE_DIMENSION`.
pub fn effective_size(width: u16, height: u16, pixel_ratio: f32) -> Result<Size2D<i32>, Error> {
    if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
        return Err(Error::InvalidPixelRatio);
    }

    // Saturates, so oversized products still compare greater than the limit.
    let width = (width as f32 * pixel_ratio) as i32;
    let height = (height as f32 * pixel_ratio) as i32;
    if width == 0 || height == 0 {
        return Err(Error::InvalidSize);
    }
    if width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
        return Err(Error::InvalidSize);
    }
    Ok(Size2D::new(width, height))
}
