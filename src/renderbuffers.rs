// glsurface/src/renderbuffers.rs
//
//! The renderbuffers behind a surface's framebuffer object.

use crate::gl_utils::Gl;
use crate::{Error, WindowingApiError};

use euclid::default::Size2D;
use glow::{HasContext, Renderbuffer};
use std::thread;

/// An `RGBA8` color renderbuffer and a packed `DEPTH24_STENCIL8` renderbuffer.
///
/// Either may be missing if allocation stopped half way.
pub(crate) struct Renderbuffers {
    color: Option<Renderbuffer>,
    depth_stencil: Option<Renderbuffer>,
}

impl Drop for Renderbuffers {
    fn drop(&mut self) {
        match *self {
            Renderbuffers {
                color: None,
                depth_stencil: None,
            } => {}
            _ => {
                if !thread::panicking() {
                    panic!("Should have destroyed the FBO renderbuffers with `destroy()`!")
                }
            }
        }
    }
}

impl Renderbuffers {
    pub(crate) fn new(gl: &Gl, size: &Size2D<i32>) -> Result<Renderbuffers, Error> {
        let mut renderbuffers = Renderbuffers {
            color: None,
            depth_stencil: None,
        };

        match create_renderbuffer(gl, glow::DEPTH24_STENCIL8, size) {
            Ok(renderbuffer) => renderbuffers.depth_stencil = Some(renderbuffer),
            Err(err) => {
                renderbuffers.destroy(gl);
                return Err(err);
            }
        }
        match create_renderbuffer(gl, glow::RGBA8, size) {
            Ok(renderbuffer) => renderbuffers.color = Some(renderbuffer),
            Err(err) => {
                renderbuffers.destroy(gl);
                return Err(err);
            }
        }

        Ok(renderbuffers)
    }

    pub(crate) fn bind_to_current_framebuffer(&self, gl: &Gl) {
        unsafe {
            if let Some(color) = self.color {
                gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    glow::COLOR_ATTACHMENT0,
                    glow::RENDERBUFFER,
                    Some(color),
                );
            }
            if let Some(depth_stencil) = self.depth_stencil {
                gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    glow::DEPTH_STENCIL_ATTACHMENT,
                    glow::RENDERBUFFER,
                    Some(depth_stencil),
                );
            }
        }
    }

    pub(crate) fn destroy(&mut self, gl: &Gl) {
        unsafe {
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);

            if let Some(color) = self.color.take() {
                gl.delete_renderbuffer(color);
            }
            if let Some(depth_stencil) = self.depth_stencil.take() {
                gl.delete_renderbuffer(depth_stencil);
            }
        }
    }

    /// Forgets the renderbuffers without deleting them, for when their context is unusable.
    pub(crate) fn leak(&mut self) {
        self.color = None;
        self.depth_stencil = None;
    }
}

fn create_renderbuffer(
    gl: &Gl,
    format: u32,
    size: &Size2D<i32>,
) -> Result<Renderbuffer, Error> {
    unsafe {
        let renderbuffer = gl.create_renderbuffer().map_err(|err| {
            error!("glGenRenderbuffers failed: {}", err);
            Error::DrawableCreationFailed(WindowingApiError::BadAlloc)
        })?;
        gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
        gl.renderbuffer_storage(glow::RENDERBUFFER, format, size.width, size.height);
        gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        Ok(renderbuffer)
    }
}
