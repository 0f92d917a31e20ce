// glsurface/src/main.rs
//
//! `glsurface-probe`: repeatedly reads back off-screen surfaces from several threads at once.
//!
//! Every thread owns a surface of its own unless `--shared-surface` is given, in which case all
//! threads take turns on a single surface behind a lock. Failures inside the probe loop are logged
//! and counted, never fatal.

use clap::{value_t, App, Arg, ArgMatches};
use glsurface::platform::default::device::Device as DefaultDevice;
use glsurface::platform::mock::Device as MockDevice;
use glsurface::{Backend, Error, GLSurface, PixelFormatAttributes, SharedPixelFormat};
use log::{debug, error, info, warn};
use std::ops::AddAssign;
use std::process;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

static APP_NAME: &'static str = "glsurface-probe";

struct Settings {
    width: u16,
    height: u16,
    pixel_ratio: f32,
    threads: usize,
    // Zero runs forever.
    iterations: u64,
    shared_surface: bool,
    mock: bool,
}

impl Settings {
    fn from_matches(matches: &ArgMatches) -> Settings {
        Settings {
            width: value_t!(matches, "width", u16).unwrap_or_else(|err| err.exit()),
            height: value_t!(matches, "height", u16).unwrap_or_else(|err| err.exit()),
            pixel_ratio: value_t!(matches, "pixel-ratio", f32).unwrap_or_else(|err| err.exit()),
            threads: value_t!(matches, "threads", usize).unwrap_or_else(|err| err.exit()),
            iterations: value_t!(matches, "iterations", u64).unwrap_or_else(|err| err.exit()),
            shared_surface: matches.is_present("shared-surface"),
            mock: matches.is_present("mock"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ProbeStats {
    reads: u64,
    failures: u64,
}

impl AddAssign for ProbeStats {
    fn add_assign(&mut self, other: ProbeStats) {
        self.reads += other.reads;
        self.failures += other.failures;
    }
}

fn main() {
    init_logging();

    let matches = App::new(APP_NAME)
        .about("Stress-tests off-screen GL surfaces with concurrent pixel read-backs")
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .default_value("400")
                .help("Surface width in logical pixels"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .default_value("300")
                .help("Surface height in logical pixels"),
        )
        .arg(
            Arg::with_name("pixel-ratio")
                .long("pixel-ratio")
                .takes_value(true)
                .default_value("1.0")
                .help("Device pixels per logical pixel"),
        )
        .arg(
            Arg::with_name("threads")
                .short("t")
                .long("threads")
                .takes_value(true)
                .default_value("1")
                .help("Number of probing threads"),
        )
        .arg(
            Arg::with_name("iterations")
                .short("n")
                .long("iterations")
                .takes_value(true)
                .default_value("0")
                .help("Read-backs per thread; 0 runs until killed"),
        )
        .arg(
            Arg::with_name("shared-surface")
                .long("shared-surface")
                .help("Make all threads take turns on one surface"),
        )
        .arg(
            Arg::with_name("mock")
                .long("mock")
                .help("Use the GPU-free mock backend"),
        )
        .get_matches();
    let settings = Settings::from_matches(&matches);

    let result = if settings.mock {
        run(MockDevice::new(), &settings)
    } else {
        DefaultDevice::new().and_then(|device| run(device, &settings))
    };

    match result {
        Ok(stats) => info!("Done: {} reads, {} failures", stats.reads, stats.failures),
        Err(err) => {
            error!("Couldn't set up surfaces: {}", err);
            process::exit(1);
        }
    }
}

fn init_logging() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => {
            builder.parse_filters(&filter);
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    builder.init();
}

/// Creates the surfaces up front, then probes them until every thread has finished.
fn run<B: Backend>(backend: B, settings: &Settings) -> Result<ProbeStats, Error> {
    let pixel_format = SharedPixelFormat::new(&backend, &PixelFormatAttributes::default())?;
    let expected = {
        let size = glsurface::effective_size(settings.width, settings.height, settings.pixel_ratio)?;
        size.width as usize * size.height as usize
    };

    let mut handles = vec![];
    if settings.shared_surface {
        let surface = Arc::new(Mutex::new(create_surface(&backend, &pixel_format, settings)?));
        for index in 0..settings.threads {
            let surface = surface.clone();
            let iterations = settings.iterations;
            handles.extend(spawn_worker(index, move || {
                let mut stats = ProbeStats::default();
                let mut iteration = 0;
                while iterations == 0 || iteration < iterations {
                    let guard = surface.lock().unwrap_or_else(PoisonError::into_inner);
                    probe(&*guard, expected, &mut stats);
                    iteration += 1;
                }
                stats
            }));
        }
    } else {
        let mut surfaces = Vec::with_capacity(settings.threads);
        for _ in 0..settings.threads {
            surfaces.push(create_surface(&backend, &pixel_format, settings)?);
        }
        for (index, surface) in surfaces.into_iter().enumerate() {
            let iterations = settings.iterations;
            handles.extend(spawn_worker(index, move || {
                let mut stats = ProbeStats::default();
                let mut iteration = 0;
                while iterations == 0 || iteration < iterations {
                    probe(&surface, expected, &mut stats);
                    iteration += 1;
                }
                stats
            }));
        }
    }

    let mut total = ProbeStats::default();
    for handle in handles {
        match handle.join() {
            Ok(stats) => total += stats,
            Err(_) => error!("A probe thread panicked"),
        }
    }
    Ok(total)
}

fn create_surface<B: Backend>(
    backend: &B,
    pixel_format: &SharedPixelFormat<B>,
    settings: &Settings,
) -> Result<GLSurface<B>, Error> {
    let mut surface = GLSurface::with_pixel_format(backend.clone(), pixel_format)?;
    surface.resize(settings.width, settings.height, settings.pixel_ratio)?;
    if !surface.is_multithreaded() {
        debug!("{} runs without the multithreaded engine", surface.id());
    }
    Ok(surface)
}

fn spawn_worker<F>(index: usize, work: F) -> Option<JoinHandle<ProbeStats>>
where
    F: FnOnce() -> ProbeStats + Send + 'static,
{
    let name = format!("probe-{}", index);
    match thread::Builder::new().name(name.clone()).spawn(move || {
        let stats = work();
        info!("{}: {} reads, {} failures", name, stats.reads, stats.failures);
        stats
    }) {
        Ok(handle) => Some(handle),
        Err(err) => {
            error!("Couldn't spawn probe thread {}: {}", index, err);
            None
        }
    }
}

/// One activate, read back, deactivate cycle.
fn probe<B: Backend>(surface: &GLSurface<B>, expected: usize, stats: &mut ProbeStats) {
    if surface.activate().is_err() {
        stats.failures += 1;
        return;
    }

    match surface.read_pixels() {
        Ok(ref pixels) if pixels.len() == expected => stats.reads += 1,
        Ok(pixels) => {
            warn!("{}: read {} words, expected {}", surface.id(), pixels.len(), expected);
            stats.failures += 1;
        }
        Err(err) => {
            warn!("{}: read-back failed: {}", surface.id(), err);
            stats.failures += 1;
        }
    }

    if surface.deactivate().is_err() {
        stats.failures += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Settings};
    use glsurface::platform::mock::{Device as MockDevice, MockFaults};
    use glsurface::{Error, WindowingApiError};

    fn settings(shared_surface: bool) -> Settings {
        Settings {
            width: 40,
            height: 30,
            pixel_ratio: 1.0,
            threads: 3,
            iterations: 10,
            shared_surface,
            mock: true,
        }
    }

    #[test]
    fn test_run_with_a_surface_per_thread() {
        let device = MockDevice::new();
        let stats = run(device.clone(), &settings(false)).unwrap();
        assert_eq!(stats.reads, 30);
        assert_eq!(stats.failures, 0);

        assert_eq!(device.peak_drawables_per_context(), 1);
        assert_eq!(device.live_contexts(), 0);
        assert_eq!(device.live_drawables(), 0);
        assert_eq!(device.live_pixel_formats(), 0);
    }

    #[test]
    fn test_run_with_shared_surface() {
        let device = MockDevice::new();
        let stats = run(device.clone(), &settings(true)).unwrap();
        assert_eq!(stats.reads, 30);
        assert_eq!(stats.failures, 0);

        assert_eq!(device.live_contexts(), 0);
        assert_eq!(device.live_drawables(), 0);
    }

    #[test]
    fn test_run_reports_setup_failure() {
        let device = MockDevice::new();
        device.set_faults(MockFaults { context_creation: true, ..MockFaults::default() });
        match run(device.clone(), &settings(false)) {
            Err(err) => {
                assert_eq!(err, Error::ContextCreationFailed(WindowingApiError::BadContext))
            }
            Ok(_) => panic!("setup should have failed"),
        }
        assert_eq!(device.live_contexts(), 0);
        assert_eq!(device.live_pixel_formats(), 0);
    }
}
