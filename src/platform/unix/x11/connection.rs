// glsurface/src/platform/unix/x11/connection.rs
//
//! The Xlib and GLX libraries, and connections to the X server.

use crate::Error;

use std::ptr;
use std::sync::{Arc, OnceLock};
use x11_dl::glx::Glx;
use x11_dl::xlib::{Display, Xlib};

static LIBRARIES: OnceLock<Option<Arc<Libraries>>> = OnceLock::new();

/// Function tables for `libX11` and `libGL`.
pub(crate) struct Libraries {
    pub(crate) xlib: Xlib,
    pub(crate) glx: Glx,
}

// The tables are immutable after loading, and Xlib is initialized for threaded use.
unsafe impl Send for Libraries {}
unsafe impl Sync for Libraries {}

impl Libraries {
    /// Loads both libraries once per process.
    pub(crate) fn get() -> Result<Arc<Libraries>, Error> {
        LIBRARIES
            .get_or_init(|| {
                let xlib = match Xlib::open() {
                    Ok(xlib) => xlib,
                    Err(err) => {
                        warn!("Couldn't load Xlib: {}", err);
                        return None;
                    }
                };
                let glx = match Glx::open() {
                    Ok(glx) => glx,
                    Err(err) => {
                        warn!("Couldn't load GLX: {}", err);
                        return None;
                    }
                };
                // Must precede every other Xlib call; surfaces are used from many threads.
                unsafe {
                    (xlib.XInitThreads)();
                }
                Some(Arc::new(Libraries { xlib, glx }))
            })
            .clone()
            .ok_or(Error::NoGLLibraryFound)
    }
}

/// An owned connection to the X server, closed when dropped.
pub(crate) struct OwnedDisplay {
    pub(crate) libraries: Arc<Libraries>,
    display: *mut Display,
}

unsafe impl Send for OwnedDisplay {}
unsafe impl Sync for OwnedDisplay {}

impl OwnedDisplay {
    /// Connects to the display named by `DISPLAY`.
    pub(crate) fn open(libraries: &Arc<Libraries>) -> Result<OwnedDisplay, Error> {
        unsafe {
            let display = (libraries.xlib.XOpenDisplay)(ptr::null());
            if display.is_null() {
                return Err(Error::DisplayConnectionFailed);
            }
            Ok(OwnedDisplay {
                libraries: libraries.clone(),
                display,
            })
        }
    }

    #[inline]
    pub(crate) fn display(&self) -> *mut Display {
        self.display
    }
}

impl Drop for OwnedDisplay {
    fn drop(&mut self) {
        unsafe {
            (self.libraries.xlib.XCloseDisplay)(self.display);
        }
    }
}
