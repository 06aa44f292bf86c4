//! Runtime configuration, environment-driven with sane local defaults.

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the carbon intelligence API.
    pub api_base: String,
    /// Base URL of the legacy dashboard API (`/api/summary`).
    pub legacy_api_base: String,
    /// Refresh interval for the polling pages (Overview, Hotspots).
    pub poll_ms: u64,
    /// Refresh interval for the legacy dashboard.
    pub legacy_poll_ms: u64,
    /// Trailing window, in calendar days, used by every page.
    pub window_days: u32,
    /// Per-request timeout. A hung request becomes a transport error instead
    /// of stalling the poll loop forever.
    pub request_timeout_ms: u64,
    /// Row cap for the hotspot ranking query.
    pub hotspot_limit: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("API_BASE").unwrap_or_else(|_| "http://localhost:8000".to_string()),
            legacy_api_base: std::env::var("LEGACY_API_BASE").unwrap_or_else(|_| "http://localhost:8001".to_string()),
            poll_ms: std::env::var("POLL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(4000),
            legacy_poll_ms: std::env::var("LEGACY_POLL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(2000),
            window_days: std::env::var("WINDOW_DAYS").ok().and_then(|v| v.parse().ok()).unwrap_or(30),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(10_000),
            hotspot_limit: std::env::var("HOTSPOT_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local() {
        let cfg = Config::from_env();
        assert!(cfg.api_base.starts_with("http"));
        assert!(cfg.poll_ms > 0);
        assert!(cfg.window_days > 0);
        assert!(cfg.request_timeout_ms > 0);
    }
}
