// glsurface/src/framebuffer.rs
//
//! Framebuffer objects for backends that have no off-screen default framebuffer.

use crate::{Error, FramebufferIncompleteReason};

#[cfg(macos)]
use crate::gl_utils::Gl;
#[cfg(macos)]
use crate::renderbuffers::Renderbuffers;
#[cfg(macos)]
use crate::WindowingApiError;
#[cfg(macos)]
use euclid::default::Size2D;
#[cfg(macos)]
use glow::HasContext;

// Only defined by EXT_framebuffer_object / GLES2; the values are shared.
pub(crate) const FRAMEBUFFER_INCOMPLETE_DIMENSIONS_EXT: u32 = 0x8cd9;
pub(crate) const FRAMEBUFFER_INCOMPLETE_FORMATS_EXT: u32 = 0x8cda;

/// Translates a `glCheckFramebufferStatus` result.
pub(crate) fn check_framebuffer_status(status: u32) -> Result<(), Error> {
    let reason = match status {
        glow::FRAMEBUFFER_COMPLETE => return Ok(()),
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferIncompleteReason::IncompleteAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
            FramebufferIncompleteReason::MissingAttachment
        }
        FRAMEBUFFER_INCOMPLETE_DIMENSIONS_EXT => FramebufferIncompleteReason::IncompleteDimensions,
        FRAMEBUFFER_INCOMPLETE_FORMATS_EXT => FramebufferIncompleteReason::IncompleteFormats,
        glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferIncompleteReason::IncompleteDrawBuffer,
        glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferIncompleteReason::IncompleteReadBuffer,
        glow::FRAMEBUFFER_UNSUPPORTED => FramebufferIncompleteReason::Unsupported,
        other => FramebufferIncompleteReason::Other(other),
    };
    Err(Error::FramebufferIncomplete(reason))
}

/// A framebuffer object with a color and a depth/stencil renderbuffer attached.
#[cfg(macos)]
pub(crate) struct Framebuffer {
    pub(crate) framebuffer_object: Option<glow::Framebuffer>,
    renderbuffers: Renderbuffers,
}

#[cfg(macos)]
impl Framebuffer {
    /// Builds and checks a framebuffer. The owning context must be current.
    ///
    /// Nothing stays allocated if the framebuffer turns out incomplete.
    pub(crate) fn new(gl: &Gl, size: &Size2D<i32>) -> Result<Framebuffer, Error> {
        unsafe {
            let renderbuffers = Renderbuffers::new(gl, size)?;
            let mut framebuffer = Framebuffer {
                framebuffer_object: None,
                renderbuffers,
            };

            let framebuffer_object = match gl.create_framebuffer() {
                Ok(framebuffer_object) => framebuffer_object,
                Err(err) => {
                    error!("glGenFramebuffers failed: {}", err);
                    framebuffer.destroy(gl);
                    return Err(Error::DrawableCreationFailed(WindowingApiError::BadAlloc));
                }
            };
            framebuffer.framebuffer_object = Some(framebuffer_object);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer_object));
            framebuffer.renderbuffers.bind_to_current_framebuffer(gl);

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            if let Err(err) = check_framebuffer_status(status) {
                framebuffer.destroy(gl);
                return Err(err);
            }

            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            Ok(framebuffer)
        }
    }

    /// Binds the framebuffer for drawing and reading.
    pub(crate) fn bind(&self, gl: &Gl) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, self.framebuffer_object);
        }
    }

    /// Deletes the framebuffer and its renderbuffers. The owning context must be current.
    pub(crate) fn destroy(&mut self, gl: &Gl) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            if let Some(framebuffer_object) = self.framebuffer_object.take() {
                gl.delete_framebuffer(framebuffer_object);
            }
        }
        self.renderbuffers.destroy(gl);
    }

    /// Forgets the GL objects without deleting them.
    pub(crate) fn leak(&mut self) {
        if self.framebuffer_object.take().is_some() {
            warn!("Leaking a framebuffer object whose context couldn't be made current");
        }
        self.renderbuffers.leak();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_status_is_ok() {
        assert_eq!(check_framebuffer_status(glow::FRAMEBUFFER_COMPLETE), Ok(()));
    }

    #[test]
    fn test_incomplete_statuses_map_to_reasons() {
        let cases = [
            (
                glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
                FramebufferIncompleteReason::IncompleteAttachment,
            ),
            (
                glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT,
                FramebufferIncompleteReason::MissingAttachment,
            ),
            (
                FRAMEBUFFER_INCOMPLETE_DIMENSIONS_EXT,
                FramebufferIncompleteReason::IncompleteDimensions,
            ),
            (
                FRAMEBUFFER_INCOMPLETE_FORMATS_EXT,
                FramebufferIncompleteReason::IncompleteFormats,
            ),
            (
                glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER,
                FramebufferIncompleteReason::IncompleteDrawBuffer,
            ),
            (
                glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER,
                FramebufferIncompleteReason::IncompleteReadBuffer,
            ),
            (glow::FRAMEBUFFER_UNSUPPORTED, FramebufferIncompleteReason::Unsupported),
        ];
        for &(status, reason) in &cases {
            assert_eq!(
                check_framebuffer_status(status),
                Err(Error::FramebufferIncomplete(reason))
            );
        }
    }

    #[test]
    fn test_unknown_status_keeps_raw_value() {
        assert_eq!(
            check_framebuffer_status(0x1234),
            Err(Error::FramebufferIncomplete(FramebufferIncompleteReason::Other(0x1234)))
        );
    }
}
