// glsurface/src/tests.rs
//
//! Unit tests, run against the mock backend unless noted otherwise.

use crate::platform::mock::{self, Device as MockDevice, MockEvent, MockFaults};
use crate::{effective_size, Error, FramebufferIncompleteReason, GLSurface};
use crate::{PixelFormatAttributes, SharedPixelFormat, WindowingApiError, MAX_SURFACE_DIMENSION};

use euclid::default::Size2D;
use rand::Rng;
use serial_test::serial;
use std::thread;

fn mock_surface() -> (MockDevice, GLSurface<MockDevice>) {
    let device = MockDevice::new();
    let surface = GLSurface::with_backend(device.clone()).unwrap();
    (device, surface)
}

#[test]
fn test_release_buffers_is_idempotent() {
    let (device, mut surface) = mock_surface();

    // Never resized.
    surface.release_buffers().unwrap();
    assert!(!surface.has_buffers());

    surface.resize(400, 300, 1.0).unwrap();
    assert_eq!(device.live_drawables(), 1);

    surface.release_buffers().unwrap();
    surface.release_buffers().unwrap();
    assert!(!surface.has_buffers());
    assert_eq!(surface.size(), None);
    assert_eq!(device.live_drawables(), 0);

    let destroyed = device
        .events()
        .iter()
        .filter(|event| matches!(event, MockEvent::DrawableDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
}

#[test]
fn test_resize_replaces_buffers_without_leaking() {
    let (device, mut surface) = mock_surface();
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let (width, height) = (rng.gen_range(1..2048), rng.gen_range(1..2048));
        let size = surface.resize(width, height, 1.0).unwrap();
        assert_eq!(size, Size2D::new(width as i32, height as i32));
        assert_eq!(surface.size(), Some(size));
        assert_eq!(device.live_drawables(), 1);
    }

    assert_eq!(device.peak_drawables_per_context(), 1);

    // Each set of buffers goes away before its replacement is allocated.
    let events = device.events();
    let drawable_events: Vec<_> = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                MockEvent::DrawableCreated { .. } | MockEvent::DrawableDestroyed { .. }
            )
        })
        .collect();
    for pair in drawable_events.windows(2) {
        if let (
            MockEvent::DrawableCreated { drawable: created, .. },
            MockEvent::DrawableDestroyed { drawable: destroyed, .. },
        ) = (pair[0], pair[1])
        {
            assert_eq!(created, destroyed);
        }
    }

    drop(surface);
    assert_eq!(device.live_drawables(), 0);
}

#[test]
fn test_resize_scales_by_pixel_ratio() {
    let (_, mut surface) = mock_surface();

    assert_eq!(surface.resize(400, 300, 1.0).unwrap(), Size2D::new(400, 300));
    assert_eq!(surface.resize(400, 300, 2.0).unwrap(), Size2D::new(800, 600));
    assert_eq!(surface.size(), Some(Size2D::new(800, 600)));

    surface.activate().unwrap();
    assert_eq!(surface.read_pixels().unwrap().len(), 800 * 600);
    surface.deactivate().unwrap();
}

#[test]
fn test_effective_size_truncates() {
    assert_eq!(effective_size(333, 101, 1.5).unwrap(), Size2D::new(499, 151));
    assert_eq!(effective_size(3, 3, 0.5).unwrap(), Size2D::new(1, 1));
    assert_eq!(effective_size(1, 1, 0.99), Err(Error::InvalidSize));
}

#[test]
fn test_resize_rejects_bad_arguments() {
    let (device, mut surface) = mock_surface();
    surface.resize(400, 300, 1.0).unwrap();

    assert_eq!(surface.resize(400, 300, 0.0), Err(Error::InvalidPixelRatio));
    assert_eq!(surface.resize(400, 300, -1.0), Err(Error::InvalidPixelRatio));
    assert_eq!(surface.resize(400, 300, f32::NAN), Err(Error::InvalidPixelRatio));
    assert_eq!(surface.resize(400, 300, f32::INFINITY), Err(Error::InvalidPixelRatio));
    assert_eq!(surface.resize(0, 300, 1.0), Err(Error::InvalidSize));

    // Rejected before anything was released.
    assert_eq!(surface.size(), Some(Size2D::new(400, 300)));
    assert_eq!(device.live_drawables(), 1);
}

#[test]
fn test_resize_rejects_oversized_results() {
    let (device, mut surface) = mock_surface();
    surface.resize(400, 300, 1.0).unwrap();

    assert_eq!(surface.resize(u16::MAX, u16::MAX, 1.0e6), Err(Error::InvalidSize));
    assert_eq!(surface.resize(u16::MAX, 1, 1.0), Err(Error::InvalidSize));
    assert_eq!(surface.resize(1, 9000, 2.0), Err(Error::InvalidSize));

    // The old buffers survive and still read back whole.
    assert_eq!(surface.size(), Some(Size2D::new(400, 300)));
    assert_eq!(device.live_drawables(), 1);
    surface.activate().unwrap();
    assert_eq!(surface.read_pixels().unwrap().len(), 400 * 300);
    surface.deactivate().unwrap();

    let limit = MAX_SURFACE_DIMENSION as u16;
    assert_eq!(
        effective_size(limit, limit, 1.0).unwrap(),
        Size2D::new(MAX_SURFACE_DIMENSION, MAX_SURFACE_DIMENSION)
    );
    assert_eq!(effective_size(limit + 1, 1, 1.0), Err(Error::InvalidSize));
}

#[test]
fn test_activate_deactivate_pairing() {
    let (_, mut surface) = mock_surface();
    surface.resize(400, 300, 1.0).unwrap();
    let context_id = surface.native_context().id();

    assert!(!surface.is_current());
    surface.activate().unwrap();
    assert!(surface.is_current());
    assert_eq!(mock::current_context_id(), Some(context_id));

    // Activation is a per-thread toggle.
    thread::scope(|scope| {
        scope.spawn(|| assert_eq!(mock::current_context_id(), None));
    });

    surface.deactivate().unwrap();
    assert!(!surface.is_current());
    assert_eq!(mock::current_context_id(), None);
}

#[test]
fn test_read_pixels_requires_buffers_and_activation() {
    let (_, mut surface) = mock_surface();
    assert_eq!(surface.read_pixels(), Err(Error::NoBuffers));

    surface.resize(40, 30, 1.0).unwrap();
    assert_eq!(surface.read_pixels(), Err(Error::NoCurrentContext));

    surface.activate().unwrap();
    assert_eq!(surface.read_pixels().unwrap().len(), 40 * 30);
    surface.deactivate().unwrap();
}

#[test]
fn test_activation_failure_is_reported() {
    let (device, mut surface) = mock_surface();
    surface.resize(40, 30, 1.0).unwrap();
    device.set_faults(MockFaults { make_current: true, ..MockFaults::default() });

    assert_eq!(
        surface.activate(),
        Err(Error::ContextActivationFailed(WindowingApiError::BadContext))
    );
    assert!(!surface.is_current());
}

#[test]
fn test_incomplete_framebuffer_leaves_no_buffers() {
    let (device, mut surface) = mock_surface();
    surface.resize(400, 300, 1.0).unwrap();

    device.set_faults(MockFaults {
        depth_stencil_size: Some(Size2D::new(256, 256)),
        ..MockFaults::default()
    });
    assert_eq!(
        surface.resize(640, 480, 1.0),
        Err(Error::FramebufferIncomplete(FramebufferIncompleteReason::IncompleteDimensions))
    );
    assert!(!surface.has_buffers());
    assert_eq!(surface.size(), None);
    assert_eq!(device.live_drawables(), 0);

    // Matching attachments are complete.
    assert_eq!(surface.resize(256, 256, 1.0).unwrap(), Size2D::new(256, 256));
}

#[test]
fn test_drawable_creation_failure_leaves_no_buffers() {
    let (device, mut surface) = mock_surface();
    surface.resize(400, 300, 1.0).unwrap();

    device.set_faults(MockFaults { drawable_creation: true, ..MockFaults::default() });
    assert_eq!(
        surface.resize(800, 600, 1.0),
        Err(Error::DrawableCreationFailed(WindowingApiError::BadAlloc))
    );
    assert!(!surface.has_buffers());
    assert_eq!(device.live_drawables(), 0);
}

#[test]
fn test_construction_failure_leaves_nothing_alive() {
    let device = MockDevice::new();
    device.set_faults(MockFaults { context_creation: true, ..MockFaults::default() });
    assert_eq!(
        GLSurface::with_backend(device.clone()).unwrap_err(),
        Error::ContextCreationFailed(WindowingApiError::BadContext)
    );
    assert_eq!(device.live_contexts(), 0);
    assert_eq!(device.live_pixel_formats(), 0);

    device.set_faults(MockFaults { pixel_format_selection: true, ..MockFaults::default() });
    assert_eq!(
        GLSurface::with_backend(device.clone()).unwrap_err(),
        Error::PixelFormatSelectionFailed(WindowingApiError::BadPixelFormat)
    );
    assert_eq!(device.live_contexts(), 0);
    assert_eq!(device.live_pixel_formats(), 0);
}

#[test]
fn test_missing_multithreaded_engine_is_not_fatal() {
    let device = MockDevice::new();
    let surface = GLSurface::with_backend(device.clone()).unwrap();
    assert!(surface.is_multithreaded());

    device.set_faults(MockFaults {
        multithreaded_engine_unavailable: true,
        ..MockFaults::default()
    });
    let surface = GLSurface::with_backend(device.clone()).unwrap();
    assert!(!surface.is_multithreaded());
}

#[test]
fn test_concurrent_read_backs() {
    const THREAD_COUNT: usize = 8;
    const READS_PER_THREAD: usize = 100;

    let device = MockDevice::new();
    let pixel_format =
        SharedPixelFormat::new(&device, &PixelFormatAttributes::default()).unwrap();

    let threads: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let device = device.clone();
            let pixel_format = pixel_format.clone();
            thread::spawn(move || {
                let mut surface = GLSurface::with_pixel_format(device, &pixel_format).unwrap();
                surface.resize(400, 300, 1.0).unwrap();
                let expected = surface.native_context().id() as u32;

                for _ in 0..READS_PER_THREAD {
                    surface.activate().unwrap();
                    let pixels = surface.read_pixels().unwrap();
                    assert_eq!(pixels.len(), 400 * 300);
                    assert!(pixels.iter().all(|&pixel| pixel == expected));
                    surface.deactivate().unwrap();
                }
                surface.destroy().unwrap();
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(device.live_contexts(), 0);
    assert_eq!(device.live_drawables(), 0);
    assert_eq!(pixel_format.holders(), 1);
}

#[test]
fn test_teardown_order() {
    let (device, mut surface) = mock_surface();
    surface.resize(64, 64, 1.0).unwrap();
    drop(surface);

    let events = device.events();
    let tail = &events[events.len() - 3..];
    match *tail {
        [
            MockEvent::DrawableDestroyed { context, .. },
            MockEvent::ContextDestroyed(destroyed_context),
            MockEvent::PixelFormatReleased(_),
        ] => assert_eq!(context, destroyed_context),
        _ => panic!("unexpected teardown sequence: {:?}", tail),
    }
    assert_eq!(device.live_pixel_formats(), 0);
}

#[test]
fn test_shared_pixel_format_outlives_surfaces() {
    let device = MockDevice::new();
    let pixel_format =
        SharedPixelFormat::new(&device, &PixelFormatAttributes::default()).unwrap();

    let first = GLSurface::with_pixel_format(device.clone(), &pixel_format).unwrap();
    let second = GLSurface::with_pixel_format(device.clone(), &pixel_format).unwrap();
    assert_eq!(pixel_format.holders(), 3);
    assert_ne!(first.id(), second.id());

    drop(pixel_format);
    drop(first);
    assert_eq!(device.live_pixel_formats(), 1);

    second.destroy().unwrap();
    assert_eq!(device.live_pixel_formats(), 0);
    assert!(matches!(device.events().last(), Some(MockEvent::PixelFormatReleased(_))));
}

#[test]
fn test_destroy_clears_current_context() {
    let (_, mut surface) = mock_surface();
    surface.resize(16, 16, 1.0).unwrap();
    surface.activate().unwrap();
    surface.destroy().unwrap();
    assert_eq!(mock::current_context_id(), None);
}

// Needs a GPU and, on X11, a display.
#[test]
#[ignore]
#[serial]
fn test_default_backend_read_back() {
    let mut surface = match GLSurface::new() {
        Ok(surface) => surface,
        Err(Error::UnsupportedOnThisPlatform)
        | Err(Error::NoGLLibraryFound)
        | Err(Error::DisplayConnectionFailed) => return,
        Err(err) => panic!("Failed to create a surface: {:?}", err),
    };

    assert_eq!(surface.resize(400, 300, 1.0).unwrap(), Size2D::new(400, 300));
    surface.activate().unwrap();
    assert!(surface.is_current());
    assert_eq!(surface.read_pixels().unwrap().len(), 400 * 300);
    surface.deactivate().unwrap();
    assert!(!surface.is_current());
    surface.destroy().unwrap();
}
