// glsurface/src/platform/unix/x11/error.rs
//
//! Capture of X protocol errors and their translation to `glsurface` errors.
//!
//! Xlib reports errors asynchronously through a process-wide handler whose default exits the
//! process. Calls that can fail server-side run inside an `XErrorTrap`, which installs a handler
//! that records the error code and syncs with the server before reporting.

use super::connection::OwnedDisplay;
use crate::WindowingApiError;

use std::cell::Cell;
use std::os::raw::{c_char, c_int};
use std::sync::{Mutex, MutexGuard, PoisonError};
use x11_dl::xlib::{self, Display, XErrorEvent};

type XErrorHandler = Option<unsafe extern "C" fn(*mut Display, *mut XErrorEvent) -> c_int>;

// The error handler is global to the process, so only one trap may be armed at a time.
static X_ERROR_TRAP_MUTEX: Mutex<()> = Mutex::new(());

thread_local! {
    static LAST_X_ERROR_CODE: Cell<u8> = const { Cell::new(0) };
}

pub(crate) unsafe extern "C" fn xlib_error_handler(
    _: *mut Display,
    event: *mut XErrorEvent,
) -> c_int {
    let error_code = (*event).error_code;
    LAST_X_ERROR_CODE.with(|last_x_error_code| last_x_error_code.set(error_code));
    0
}

/// Collects X errors raised between its creation and `finish()`.
///
/// Traps don't nest: arm at most one per thread at a time.
pub(crate) struct XErrorTrap<'a> {
    display: &'a OwnedDisplay,
    previous_handler: XErrorHandler,
    _guard: MutexGuard<'static, ()>,
}

impl<'a> XErrorTrap<'a> {
    pub(crate) fn new(display: &'a OwnedDisplay) -> XErrorTrap<'a> {
        let guard = X_ERROR_TRAP_MUTEX
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let xlib = &display.libraries.xlib;
        unsafe {
            let previous_handler = (xlib.XSetErrorHandler)(Some(xlib_error_handler));
            // Errors still in flight from earlier requests belong to nobody.
            (xlib.XSync)(display.display(), xlib::False);
            LAST_X_ERROR_CODE.with(|last_x_error_code| last_x_error_code.set(0));
            XErrorTrap { display, previous_handler, _guard: guard }
        }
    }

    /// Waits for the server to process every request made so far and reports the last error.
    pub(crate) fn finish(self) -> Result<(), WindowingApiError> {
        unsafe {
            (self.display.libraries.xlib.XSync)(self.display.display(), xlib::False);
        }
        match LAST_X_ERROR_CODE.with(|last_x_error_code| last_x_error_code.replace(0)) {
            0 => Ok(()),
            error_code => {
                let err = xlib_error_to_windowing_api_error(self.display, error_code);
                warn!("X error {} ({:?})", error_code, err);
                Err(err)
            }
        }
    }
}

impl<'a> Drop for XErrorTrap<'a> {
    fn drop(&mut self) {
        unsafe {
            (self.display.libraries.xlib.XSetErrorHandler)(self.previous_handler);
        }
    }
}

fn xlib_error_to_windowing_api_error(display: &OwnedDisplay, error_code: u8) -> WindowingApiError {
    if let Some(err) = core_error_to_windowing_api_error(error_code) {
        return err;
    }

    // GLX error codes are assigned at runtime; go by name.
    let mut error_text: Vec<u8> = vec![0; 256];
    unsafe {
        (display.libraries.xlib.XGetErrorText)(
            display.display(),
            error_code as c_int,
            error_text.as_mut_ptr() as *mut c_char,
            error_text.len() as c_int - 1,
        );
    }
    glx_error_name_to_windowing_api_error(&error_text)
}

// Codes from the core X protocol.
pub(crate) fn core_error_to_windowing_api_error(error_code: u8) -> Option<WindowingApiError> {
    match error_code {
        2 => Some(WindowingApiError::BadValue),
        3 => Some(WindowingApiError::BadWindow),
        4 | 9 => Some(WindowingApiError::BadDrawable),
        8 => Some(WindowingApiError::BadMatch),
        11 => Some(WindowingApiError::BadAlloc),
        _ => None,
    }
}

pub(crate) fn glx_error_name_to_windowing_api_error(error_text: &[u8]) -> WindowingApiError {
    if error_text.starts_with(b"GLXBadContext") {
        WindowingApiError::BadContext
    } else if error_text.starts_with(b"GLXBadDrawable") ||
        error_text.starts_with(b"GLXBadPixmap") ||
        error_text.starts_with(b"GLXBadCurrentDrawable")
    {
        WindowingApiError::BadDrawable
    } else if error_text.starts_with(b"GLXBadFBConfig") {
        WindowingApiError::BadPixelFormat
    } else {
        WindowingApiError::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::mem;
    use std::ptr;

    #[test]
    fn test_handler_records_error_instead_of_exiting() {
        unsafe {
            let mut event: XErrorEvent = mem::zeroed();
            event.error_code = 11;
            assert_eq!(xlib_error_handler(ptr::null_mut(), &mut event), 0);
        }
        let error_code = LAST_X_ERROR_CODE.with(|last_x_error_code| last_x_error_code.replace(0));
        assert_eq!(error_code, 11);
        assert_eq!(
            core_error_to_windowing_api_error(error_code),
            Some(WindowingApiError::BadAlloc)
        );
    }

    #[test]
    fn test_core_error_codes() {
        assert_eq!(core_error_to_windowing_api_error(2), Some(WindowingApiError::BadValue));
        assert_eq!(core_error_to_windowing_api_error(4), Some(WindowingApiError::BadDrawable));
        assert_eq!(core_error_to_windowing_api_error(8), Some(WindowingApiError::BadMatch));
        assert_eq!(core_error_to_windowing_api_error(0), None);
        assert_eq!(core_error_to_windowing_api_error(170), None);
    }

    #[test]
    fn test_glx_error_names() {
        assert_eq!(
            glx_error_name_to_windowing_api_error(b"GLXBadContext\0"),
            WindowingApiError::BadContext
        );
        assert_eq!(
            glx_error_name_to_windowing_api_error(b"GLXBadPixmap\0"),
            WindowingApiError::BadDrawable
        );
        assert_eq!(
            glx_error_name_to_windowing_api_error(b"BadImplementation\0"),
            WindowingApiError::Failed
        );
    }
}
