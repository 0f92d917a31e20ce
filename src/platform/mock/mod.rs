// glsurface/src/platform/mock/mod.rs
//
//! A backend that touches no GPU and keeps a ledger of every handle it hands out.
//!
//! Contexts and drawables are plain records. "Reading pixels" returns a buffer filled with the
//! reading context's ID, which makes cross-surface mixups visible. Faults can be injected to
//! drive the failure paths of `GLSurface`.

use crate::framebuffer::{self, FRAMEBUFFER_INCOMPLETE_DIMENSIONS_EXT};
use crate::{Backend, Error, PixelFormatAttributes, WindowingApiError};

use euclid::default::Size2D;
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT_CONTEXT: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Returns the ID of the mock context current on the calling thread, if any.
pub fn current_context_id() -> Option<u64> {
    CURRENT_CONTEXT.with(|current| current.get())
}

fn next_handle() -> u64 {
    NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)
}

/// Failures the mock should produce.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockFaults {
    /// `choose_pixel_format` fails with `PixelFormatSelectionFailed`.
    pub pixel_format_selection: bool,
    /// `create_context` fails with `ContextCreationFailed`.
    pub context_creation: bool,
    /// `enable_multithreaded_engine` reports the extension as unavailable.
    pub multithreaded_engine_unavailable: bool,
    /// `make_current` fails with `ContextActivationFailed`.
    pub make_current: bool,
    /// `create_drawable` fails with `DrawableCreationFailed`.
    pub drawable_creation: bool,
    /// Allocates the depth/stencil attachment at this size regardless of the requested one. A
    /// mismatch makes the framebuffer incomplete.
    pub depth_stencil_size: Option<Size2D<i32>>,
}

/// Something that happened to a mock handle, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockEvent {
    PixelFormatChosen(u64),
    PixelFormatReleased(u64),
    ContextCreated(u64),
    ContextDestroyed(u64),
    DrawableCreated { context: u64, drawable: u64 },
    DrawableDestroyed { context: u64, drawable: u64 },
}

#[derive(Default)]
struct Ledger {
    events: Vec<MockEvent>,
    live_pixel_formats: usize,
    live_contexts: usize,
    // Outstanding drawables, per context.
    drawables: HashMap<u64, usize>,
    peak_drawables_per_context: usize,
}

#[derive(Default)]
struct MockState {
    ledger: Mutex<Ledger>,
    faults: Mutex<MockFaults>,
}

impl MockState {
    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn faults(&self) -> MockFaults {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// The mock backend. Clones share one ledger.
#[derive(Clone, Default)]
pub struct Device {
    state: Arc<MockState>,
}

/// A mock pixel format. Dropping it is recorded as its release.
pub struct PixelFormat {
    id: u64,
    state: Arc<MockState>,
}

impl Drop for PixelFormat {
    fn drop(&mut self) {
        let mut ledger = self.state.ledger();
        ledger.live_pixel_formats -= 1;
        ledger.events.push(MockEvent::PixelFormatReleased(self.id));
    }
}

pub struct Context {
    id: u64,
    destroyed: bool,
}

impl Context {
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }
}

pub struct Drawable {
    id: u64,
    context_id: u64,
    size: Size2D<i32>,
    destroyed: bool,
}

impl Drawable {
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn size(&self) -> Size2D<i32> {
        self.size
    }
}

impl Device {
    #[inline]
    pub fn new() -> Device {
        Device::default()
    }

    /// Replaces the set of injected faults. Applies to every clone of this device.
    pub fn set_faults(&self, faults: MockFaults) {
        *self
            .state
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = faults;
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.state.ledger().events.clone()
    }

    pub fn live_pixel_formats(&self) -> usize {
        self.state.ledger().live_pixel_formats
    }

    pub fn live_contexts(&self) -> usize {
        self.state.ledger().live_contexts
    }

    pub fn live_drawables(&self) -> usize {
        self.state.ledger().drawables.values().sum()
    }

    /// The largest number of drawables any single context has had outstanding at once.
    pub fn peak_drawables_per_context(&self) -> usize {
        self.state.ledger().peak_drawables_per_context
    }
}

impl Backend for Device {
    type PixelFormat = PixelFormat;
    type Context = Context;
    type Drawable = Drawable;

    fn choose_pixel_format(&self, _: &PixelFormatAttributes) -> Result<PixelFormat, Error> {
        if self.state.faults().pixel_format_selection {
            return Err(Error::PixelFormatSelectionFailed(WindowingApiError::BadPixelFormat));
        }

        let id = next_handle();
        let mut ledger = self.state.ledger();
        ledger.live_pixel_formats += 1;
        ledger.events.push(MockEvent::PixelFormatChosen(id));
        Ok(PixelFormat { id, state: self.state.clone() })
    }

    fn create_context(&self, _: &PixelFormat) -> Result<Context, Error> {
        if self.state.faults().context_creation {
            return Err(Error::ContextCreationFailed(WindowingApiError::BadContext));
        }

        let id = next_handle();
        let mut ledger = self.state.ledger();
        ledger.live_contexts += 1;
        ledger.drawables.insert(id, 0);
        ledger.events.push(MockEvent::ContextCreated(id));
        Ok(Context { id, destroyed: false })
    }

    fn enable_multithreaded_engine(&self, _: &Context) -> Result<(), Error> {
        if self.state.faults().multithreaded_engine_unavailable {
            return Err(Error::MultithreadingExtensionUnavailable);
        }
        Ok(())
    }

    fn destroy_context(&self, context: &mut Context) -> Result<(), Error> {
        if context.destroyed {
            return Ok(());
        }
        if current_context_id() == Some(context.id) {
            CURRENT_CONTEXT.with(|current| current.set(None));
        }
        context.destroyed = true;

        let mut ledger = self.state.ledger();
        ledger.live_contexts -= 1;
        ledger.drawables.remove(&context.id);
        ledger.events.push(MockEvent::ContextDestroyed(context.id));
        Ok(())
    }

    fn create_drawable(
        &self,
        context: &Context,
        _: &PixelFormat,
        size: &Size2D<i32>,
    ) -> Result<Drawable, Error> {
        if context.destroyed {
            return Err(Error::DrawableCreationFailed(WindowingApiError::BadContext));
        }

        let faults = self.state.faults();
        if faults.drawable_creation {
            return Err(Error::DrawableCreationFailed(WindowingApiError::BadAlloc));
        }
        if let Some(depth_stencil_size) = faults.depth_stencil_size {
            if depth_stencil_size != *size {
                framebuffer::check_framebuffer_status(FRAMEBUFFER_INCOMPLETE_DIMENSIONS_EXT)?;
            }
        }

        let id = next_handle();
        let mut ledger = self.state.ledger();
        let outstanding = {
            let count = ledger.drawables.entry(context.id).or_insert(0);
            *count += 1;
            *count
        };
        ledger.peak_drawables_per_context = ledger.peak_drawables_per_context.max(outstanding);
        ledger.events.push(MockEvent::DrawableCreated { context: context.id, drawable: id });
        Ok(Drawable { id, context_id: context.id, size: *size, destroyed: false })
    }

    fn destroy_drawable(&self, context: &Context, drawable: &mut Drawable) -> Result<(), Error> {
        if drawable.destroyed {
            return Ok(());
        }
        if drawable.context_id != context.id {
            return Err(Error::DrawableDestructionFailed(WindowingApiError::BadMatch));
        }
        drawable.destroyed = true;

        let mut ledger = self.state.ledger();
        if let Some(count) = ledger.drawables.get_mut(&context.id) {
            *count -= 1;
        }
        ledger.events.push(MockEvent::DrawableDestroyed {
            context: context.id,
            drawable: drawable.id,
        });
        Ok(())
    }

    fn make_current(&self, context: &Context, drawable: Option<&Drawable>) -> Result<(), Error> {
        if self.state.faults().make_current || context.destroyed {
            return Err(Error::ContextActivationFailed(WindowingApiError::BadContext));
        }
        if let Some(drawable) = drawable {
            if drawable.destroyed || drawable.context_id != context.id {
                return Err(Error::ContextActivationFailed(WindowingApiError::BadDrawable));
            }
        }
        CURRENT_CONTEXT.with(|current| current.set(Some(context.id)));
        Ok(())
    }

    fn make_no_context_current(&self, _: &Context) -> Result<(), Error> {
        CURRENT_CONTEXT.with(|current| current.set(None));
        Ok(())
    }

    fn is_current(&self, context: &Context) -> bool {
        !context.destroyed && current_context_id() == Some(context.id)
    }

    fn read_pixels(
        &self,
        context: &Context,
        drawable: &Drawable,
        size: &Size2D<i32>,
    ) -> Result<Vec<u32>, Error> {
        if !self.is_current(context) {
            return Err(Error::NoCurrentContext);
        }
        if drawable.destroyed || drawable.size != *size {
            return Err(Error::NoBuffers);
        }
        Ok(vec![context.id as u32; size.width as usize * size.height as usize])
    }
}
