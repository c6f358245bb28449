use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment switch for automatic analysis (`0/false/off` or `1/true/on`)
pub const AUTO_RUN_ENV: &str = "VOYAGE_CHAIN_AUTO_RUN";

/// Host setting deciding whether depth analysis runs without being forced
pub trait SettingsStore: Send + Sync {
    fn auto_run_enabled(&self) -> Result<bool>;
}

/// Which turnarounds count as a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnaroundPolicy {
    /// Next sailing departs the day the previous one arrives
    #[default]
    SameDay,

    /// Also accept a departure on the following day
    AllowNextDay,
}

impl TurnaroundPolicy {
    /// Largest accepted gap in days between arrival and departure
    #[must_use]
    pub const fn max_layover_days(self) -> u32 {
        match self {
            Self::SameDay => 0,
            Self::AllowNextDay => 1,
        }
    }
}

/// Rapid-invocation guard for the chain extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Calls admitted per window
    pub max_calls: usize,

    /// Window length in milliseconds
    pub window_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_calls: 8,
            window_ms: 200,
        }
    }
}

impl ThrottleConfig {
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Analyzer configuration, loadable from TOML
///
/// ```toml
/// auto_run = true
/// allow_side_by_side = false
/// turnaround = "same-day"
///
/// [throttle]
/// max_calls = 8
/// window_ms = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Run depth analysis without an explicit force
    pub auto_run: bool,

    /// Default for cross-ship connections when the caller does not say
    pub allow_side_by_side: bool,

    /// Turnaround policy shared by depth computation and chain extraction
    pub turnaround: TurnaroundPolicy,

    pub throttle: ThrottleConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            auto_run: true,
            allow_side_by_side: false,
            turnaround: TurnaroundPolicy::SameDay,
            throttle: ThrottleConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load and validate a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::debug!("Loaded analyzer config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VOYAGE_CHAIN_AUTO_RUN` when it is set to a recognised value
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let raw = std::env::var(AUTO_RUN_ENV).ok();
        if let Some(enabled) = parse_switch(raw.as_deref()) {
            self.auto_run = enabled;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.throttle.max_calls == 0 {
            return Err(GraphError::invalid_config("throttle.max_calls must be > 0"));
        }

        if self.throttle.window_ms == 0 {
            return Err(GraphError::invalid_config("throttle.window_ms must be > 0"));
        }

        Ok(())
    }
}

impl SettingsStore for AnalyzerConfig {
    fn auto_run_enabled(&self) -> Result<bool> {
        Ok(self.auto_run)
    }
}

fn parse_switch(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::trim)?.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
