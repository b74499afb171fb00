use serde::Deserialize;

/// Environment variable enabling the per-access I/O trace.
pub const ENV_TRACE_IO: &str = "VMEXIT_IO_TRACE";
/// Environment variable toggling the floppy controller access marker.
pub const ENV_TRACE_FLOPPY: &str = "VMEXIT_IO_TRACE_FLOPPY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Log every access before and after dispatch.
    pub trace_io: bool,
    /// Log accesses to the floppy controller digital output register.
    pub trace_floppy: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            trace_io: false,
            trace_floppy: true,
        }
    }
}

impl DispatcherConfig {
    /// Defaults overlaid with `VMEXIT_IO_TRACE` / `VMEXIT_IO_TRACE_FLOPPY`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Unrecognised values keep the current setting.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_TRACE_IO).as_deref().and_then(parse_flag) {
            self.trace_io = v;
        }
        if let Some(v) = lookup(ENV_TRACE_FLOPPY).as_deref().and_then(parse_flag) {
            self.trace_floppy = v;
        }
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
