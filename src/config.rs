//! Runtime-configurable tuning parameters for collsync.
//!
//! All values have sensible defaults. Override via environment variables
//! (prefixed `COLLSYNC_`) or by constructing a custom `CollsyncConfig`.

/// Tuning parameters for dispatch behavior.
#[derive(Debug, Clone)]
pub struct CollsyncConfig {
    /// Route every operation through a host staging buffer, even when both
    /// endpoints are host-placed. Useful when the collective transport
    /// cannot be trusted with caller memory in place.
    pub force_host_staging: bool,

    /// Hand the engine the input/output buffer addresses as scheduling
    /// dependencies. Disable only when callers serialize operations on the
    /// same buffers themselves.
    pub track_buffer_deps: bool,
}

impl Default for CollsyncConfig {
    fn default() -> Self {
        Self {
            force_host_staging: false,
            track_buffer_deps: true,
        }
    }
}

impl CollsyncConfig {
    /// Load config from environment variables, falling back to defaults.
    ///
    /// Recognized variables:
    /// - `COLLSYNC_FORCE_HOST_STAGING`
    /// - `COLLSYNC_TRACK_BUFFER_DEPS`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("COLLSYNC_FORCE_HOST_STAGING") {
            if let Some(b) = parse_bool(&v) {
                cfg.force_host_staging = b;
            }
        }
        if let Ok(v) = std::env::var("COLLSYNC_TRACK_BUFFER_DEPS") {
            if let Some(b) = parse_bool(&v) {
                cfg.track_buffer_deps = b;
            }
        }

        cfg
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim() {
        "1" | "true" | "TRUE" | "yes" => Some(true),
        "0" | "false" | "FALSE" | "no" => Some(false),
        _ => None,
    }
}
