// glsurface/src/error.rs
//
//! Various errors that methods can produce.

use std::error;
use std::fmt::{self, Display, Formatter};

/// Various errors that methods can produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// The platform doesn't support this method.
    UnsupportedOnThisPlatform,
    /// Choosing an OpenGL pixel format failed.
    PixelFormatSelectionFailed(WindowingApiError),
    /// The system couldn't choose an OpenGL pixel format.
    NoPixelFormatFound,
    /// The system couldn't create an OpenGL context.
    ContextCreationFailed(WindowingApiError),
    /// The system couldn't destroy the OpenGL context.
    ContextDestructionFailed(WindowingApiError),
    /// The driver doesn't offer a multithreaded GL engine for this context.
    ///
    /// This is never fatal; surfaces are still usable without it.
    MultithreadingExtensionUnavailable,
    /// A connection to the display server could not be opened.
    DisplayConnectionFailed,
    /// The display server has no visual matching the requested pixel format.
    VisualSelectionFailed,
    /// The system OpenGL or windowing library couldn't be located.
    NoGLLibraryFound,
    /// The framebuffer object assembled for the surface is not complete.
    FramebufferIncomplete(FramebufferIncompleteReason),
    /// The system couldn't create the off-screen drawable.
    DrawableCreationFailed(WindowingApiError),
    /// The system couldn't destroy the off-screen drawable.
    DrawableDestructionFailed(WindowingApiError),
    /// The system couldn't make the OpenGL context current.
    ContextActivationFailed(WindowingApiError),
    /// The system couldn't clear the current OpenGL context.
    ContextDeactivationFailed(WindowingApiError),
    /// The surface has no backing buffers; call `resize()` first.
    NoBuffers,
    /// The surface's context is not current on this thread.
    NoCurrentContext,
    /// The pixel ratio is not a positive, finite number.
    InvalidPixelRatio,
    /// The effective surface size has a zero dimension, or one above `MAX_SURFACE_DIMENSION`.
    InvalidSize,
}

/// Why a framebuffer object failed its completeness check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FramebufferIncompleteReason {
    /// `GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT`
    IncompleteAttachment,
    /// `GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT`
    MissingAttachment,
    /// `GL_FRAMEBUFFER_INCOMPLETE_DIMENSIONS_EXT`: the attachments differ in size.
    IncompleteDimensions,
    /// `GL_FRAMEBUFFER_INCOMPLETE_FORMATS_EXT`
    IncompleteFormats,
    /// `GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER`
    IncompleteDrawBuffer,
    /// `GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER`
    IncompleteReadBuffer,
    /// `GL_FRAMEBUFFER_UNSUPPORTED`
    Unsupported,
    /// Any other status; the raw GL enum is kept.
    Other(u32),
}

/// Abstraction of the errors that CGL, GLX, Xlib, etc. return.
///
/// They all tend to follow similar patterns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowingApiError {
    /// Miscellaneous error.
    Failed,
    /// CGL: Invalid pixel format attribute.
    BadAttribute,
    /// CGL: Invalid renderer property.
    BadProperty,
    /// CGL: Invalid pixel format object.
    BadPixelFormat,
    /// CGL: Invalid renderer information object.
    BadRendererInfo,
    /// CGL: Invalid context object.
    /// X11: The context is invalid.
    BadContext,
    /// Invalid drawable.
    BadDrawable,
    /// CGL: Invalid display.
    BadDisplay,
    /// CGL: Invalid context state.
    BadState,
    /// CGL: Invalid numerical value.
    BadValue,
    /// CGL: Invalid share context.
    BadMatch,
    /// CGL: Invalid enumerant (constant).
    BadEnumeration,
    /// CGL: Invalid off-screen drawable.
    BadOffScreen,
    /// CGL: Invalid full-screen drawable.
    BadFullScreen,
    /// CGL: Invalid window.
    BadWindow,
    /// CGL: Invalid address; e.g. null pointer passed to function requiring
    /// a non-null pointer argument.
    BadAddress,
    /// CGL: Invalid code module.
    BadCodeModule,
    /// CGL: Invalid memory allocation; i.e. CGL couldn't allocate memory.
    BadAlloc,
    /// CGL: Invalid Core Graphics connection.
    BadConnection,
    /// X11: Visual number not known by GLX.
    BadVisual,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Error::UnsupportedOnThisPlatform => write!(f, "unsupported on this platform"),
            Error::PixelFormatSelectionFailed(err) => write!(f, "error pixel format: {:?}", err),
            Error::NoPixelFormatFound => write!(f, "no matching pixel format"),
            Error::ContextCreationFailed(err) => {
                write!(f, "error creating GL context object: {:?}", err)
            }
            Error::ContextDestructionFailed(err) => {
                write!(f, "error destroying GL context object: {:?}", err)
            }
            Error::MultithreadingExtensionUnavailable => {
                write!(f, "error enabling OpenGL multithreading")
            }
            Error::DisplayConnectionFailed => write!(f, "failed to open X display"),
            Error::VisualSelectionFailed => write!(f, "no visual matches the pixel format"),
            Error::NoGLLibraryFound => write!(f, "the system GL library couldn't be loaded"),
            Error::FramebufferIncomplete(reason) => {
                write!(f, "couldn't create framebuffer: {}", reason)
            }
            Error::DrawableCreationFailed(err) => {
                write!(f, "couldn't create off-screen drawable: {:?}", err)
            }
            Error::DrawableDestructionFailed(err) => {
                write!(f, "couldn't destroy off-screen drawable: {:?}", err)
            }
            Error::ContextActivationFailed(err) => {
                write!(f, "switching OpenGL context failed: {:?}", err)
            }
            Error::ContextDeactivationFailed(err) => {
                write!(f, "removing OpenGL context failed: {:?}", err)
            }
            Error::NoBuffers => write!(f, "surface has no buffers"),
            Error::NoCurrentContext => write!(f, "surface context is not current"),
            Error::InvalidPixelRatio => write!(f, "pixel ratio must be positive and finite"),
            Error::InvalidSize => write!(f, "effective surface size is empty or too large"),
        }
    }
}

impl error::Error for Error {}

impl Display for FramebufferIncompleteReason {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            FramebufferIncompleteReason::IncompleteAttachment => {
                write!(f, "incomplete attachment")
            }
            FramebufferIncompleteReason::MissingAttachment => {
                write!(f, "incomplete missing attachment")
            }
            FramebufferIncompleteReason::IncompleteDimensions => {
                write!(f, "incomplete dimensions")
            }
            FramebufferIncompleteReason::IncompleteFormats => write!(f, "incomplete formats"),
            FramebufferIncompleteReason::IncompleteDrawBuffer => {
                write!(f, "incomplete draw buffer")
            }
            FramebufferIncompleteReason::IncompleteReadBuffer => {
                write!(f, "incomplete read buffer")
            }
            FramebufferIncompleteReason::Unsupported => write!(f, "unsupported"),
            FramebufferIncompleteReason::Other(status) => write!(f, "other ({:#x})", status),
        }
    }
}
