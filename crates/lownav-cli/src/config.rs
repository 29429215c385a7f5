//! Processor configuration stored as TOML in the user's config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use lownav_core::{LabelOptions, PerformanceProfile, PlanError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default configuration filename
const CONFIG: &str = "config.toml";

/// Directory name under the platform config directory
const TAG: &str = "FlightPlan";

/// Performance and label settings applied to every conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub climb_rate_ft_per_min: f64,
    pub descent_rate_ft_per_min: f64,
    /// Average transit groundspeed, about M0.75
    pub transit_airspeed_kts: f64,
    pub route_airspeed_kts: f64,
    pub route_altitude_ft: f64,
    pub max_remarks_chars: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        let profile = PerformanceProfile::default();
        Self {
            climb_rate_ft_per_min: profile.climb_rate_ft_per_min,
            descent_rate_ft_per_min: profile.descent_rate_ft_per_min,
            transit_airspeed_kts: profile.transit_airspeed_kts,
            route_airspeed_kts: profile.route_airspeed_kts,
            route_altitude_ft: profile.route_altitude_ft,
            max_remarks_chars: LabelOptions::default().max_remarks_chars,
        }
    }
}

impl ProcessorConfig {
    /// Returns the path of the default config file
    pub fn default_file() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", TAG)
            .ok_or_else(|| anyhow!("no home directory, cannot locate the configuration"))?;
        let path = dirs.config_dir().join(CONFIG);
        debug!(path = %path.display(), "default config file");
        Ok(path)
    }

    /// Load the specified config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let config: ProcessorConfig = toml::from_str(&content)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write configuration {}", path.display()))?;
        Ok(())
    }

    /// Load `path`, or write and return the defaults when it does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!(path = %path.display(), "loading configuration");
            return Self::load(path);
        }
        info!(path = %path.display(), "configuration not found, creating defaults");
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Apply command line airspeed overrides.
    pub fn with_overrides(mut self, transit_kts: Option<f64>, route_kts: Option<f64>) -> Self {
        if let Some(kts) = transit_kts {
            self.transit_airspeed_kts = kts;
        }
        if let Some(kts) = route_kts {
            self.route_airspeed_kts = kts;
        }
        self
    }

    pub fn profile(&self) -> Result<PerformanceProfile, PlanError> {
        PerformanceProfile::new(
            self.climb_rate_ft_per_min,
            self.descent_rate_ft_per_min,
            self.transit_airspeed_kts,
            self.route_airspeed_kts,
            self.route_altitude_ft,
        )
    }

    pub fn label_options(&self) -> LabelOptions {
        LabelOptions {
            max_remarks_chars: self.max_remarks_chars,
        }
    }
}
