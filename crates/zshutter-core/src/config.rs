//! Shared configuration defaults.
//!
//! Every tunable has a constant default and an accessor that lets an
//! environment variable override it. Unparseable values fall back to the
//! default.

/// Default values.
pub mod defaults {
    /// Device id used when none is configured.
    pub const DEVICE_ID: &str = "zmnhod1";
    /// Event bus buffer size.
    pub const EVENT_CAPACITY: usize = crate::eventbus::DEFAULT_CHANNEL_CAPACITY;
    /// Default log filter directive.
    pub const LOG_FILTER: &str = "zshutter=warn";
}

/// Environment variable names.
pub mod env_vars {
    use super::defaults;

    pub const DEVICE_ID: &str = "ZSHUTTER_DEVICE_ID";
    pub const EVENT_CAPACITY: &str = "ZSHUTTER_EVENT_CAPACITY";
    pub const LOG_JSON: &str = "ZSHUTTER_LOG_JSON";
    pub const PARAMETERS_FILE: &str = "ZSHUTTER_PARAMETERS";

    /// Device id from the environment, or the default.
    pub fn device_id() -> String {
        std::env::var(DEVICE_ID)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| defaults::DEVICE_ID.to_string())
    }

    /// Event bus capacity from the environment, or the default.
    pub fn event_capacity() -> usize {
        std::env::var(EVENT_CAPACITY)
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|c: &usize| *c > 0)
            .unwrap_or(defaults::EVENT_CAPACITY)
    }

    /// Whether logs should be emitted as JSON.
    pub fn log_json() -> bool {
        std::env::var(LOG_JSON)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false)
    }

    /// Path of a parameter profile override, if any.
    pub fn parameters_file() -> Option<std::path::PathBuf> {
        std::env::var_os(PARAMETERS_FILE).map(std::path::PathBuf::from)
    }
}
