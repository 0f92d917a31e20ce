// glsurface/build.rs
//
//! The `glsurface` build script.

use cfg_aliases::cfg_aliases;

fn main() {
    // Setup aliases for #[cfg] checks
    cfg_aliases! {
        // Platforms
        macos: { target_os = "macos" },
        linux: { all(unix, not(any(macos, target_os = "android", target_env = "ohos"))) },
    }
}
