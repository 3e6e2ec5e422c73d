use std::env;

/// Environment variable overriding [`ContainerConfig::max_depth`]
pub const MAX_DEPTH_ENV: &str = "MESHJECT_MAX_DEPTH";

/// Environment variable overriding [`ContainerConfig::log_resolution_failures`]
pub const LOG_FAILURES_ENV: &str = "MESHJECT_LOG_FAILURES";

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Container configuration
///
/// The defaults fit almost every graph; `from_env` lets a deployment tune
/// them without a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Longest chain of nested resolutions before the chain degrades to empty
    pub max_depth: usize,
    /// Emit a `debug` event every time a resolve degrades to empty
    pub log_resolution_failures: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            log_resolution_failures: true,
        }
    }
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_log_resolution_failures(mut self, enabled: bool) -> Self {
        self.log_resolution_failures = enabled;
        self
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => tracing::warn!("Ignoring invalid {}: {:?}", MAX_DEPTH_ENV, raw),
            }
        }

        if let Some(raw) = lookup(LOG_FAILURES_ENV) {
            match parse_flag(&raw) {
                Some(flag) => config.log_resolution_failures = flag,
                None => tracing::warn!("Ignoring invalid {}: {:?}", LOG_FAILURES_ENV, raw),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
