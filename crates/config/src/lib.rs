//! Configuration for Horizon.
//!
//! Configuration is written in TOML. Every section and key is optional;
//! missing values fall back to the defaults below.
//!
//! # Configuration File
//!
//! Horizon looks for `$XDG_CONFIG_HOME/horizon/config.toml` (or the platform
//! equivalent reported by [`dirs::config_dir`]). A missing file is not an
//! error.
//!
//! ```toml
//! [store]
//! path = "/home/me/.local/share/horizon/storage.json"
//!
//! # Appearance applied to new highlights.
//! [appearance]
//! theme = "dark"        # light | dark
//! style = "background"  # underline | background
//!
//! [restore]
//! debounce_ms = 500        # quiet window after page mutations
//! scroll_settle_ms = 300   # wait for smooth scrolling to finish
//! attention_ms = 1000      # attention flash duration
//!
//! [pending]
//! max_age_secs = 900         # pending scroll intents older than this are dropped
//! sweep_interval_secs = 600  # how often stale intents are swept
//! ```

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, Result};
use horizon_primitives::{Appearance, HighlightStyle, Theme};
use serde::Deserialize;

/// Directory name under the platform configuration directory.
pub const APP_DIR: &str = "horizon";

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub store: StoreConfig,
	pub appearance: AppearanceConfig,
	pub restore: RestoreConfig,
	pub pending: PendingConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
	/// JSON storage file. Defaults to `storage.json` in the data directory.
	pub path: Option<PathBuf>,
}

/// `[appearance]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppearanceConfig {
	pub theme: Theme,
	pub style: HighlightStyle,
}

/// `[restore]` section, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RestoreConfig {
	pub debounce_ms: u64,
	pub scroll_settle_ms: u64,
	pub attention_ms: u64,
}

impl Default for RestoreConfig {
	fn default() -> Self {
		Self {
			debounce_ms: 500,
			scroll_settle_ms: 300,
			attention_ms: 1000,
		}
	}
}

/// `[pending]` section, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PendingConfig {
	pub max_age_secs: u64,
	pub sweep_interval_secs: u64,
}

impl Default for PendingConfig {
	fn default() -> Self {
		Self {
			max_age_secs: 15 * 60,
			sweep_interval_secs: 10 * 60,
		}
	}
}

impl AppearanceConfig {
	pub fn appearance(&self) -> Appearance {
		Appearance::new(self.theme, self.style)
	}
}

impl RestoreConfig {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	pub fn scroll_settle(&self) -> Duration {
		Duration::from_millis(self.scroll_settle_ms)
	}

	pub fn attention(&self) -> Duration {
		Duration::from_millis(self.attention_ms)
	}
}

impl PendingConfig {
	pub fn max_age(&self) -> Duration {
		Duration::from_secs(self.max_age_secs)
	}

	pub fn sweep_interval(&self) -> Duration {
		Duration::from_secs(self.sweep_interval_secs)
	}
}

impl Config {
	/// Parse a TOML string into a [`Config`] and check value ranges.
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Load `path` if it exists, otherwise return the defaults.
	pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		if path.exists() { Self::load(path) } else { Ok(Self::default()) }
	}

	/// Path of the user configuration file.
	pub fn default_path() -> Result<PathBuf> {
		dirs::config_dir()
			.map(|dir| dir.join(APP_DIR).join("config.toml"))
			.ok_or(ConfigError::NoConfigDir)
	}

	/// Storage file to use: `[store] path`, or `storage.json` under the
	/// platform data directory.
	pub fn storage_path(&self) -> Result<PathBuf> {
		if let Some(path) = &self.store.path {
			return Ok(path.clone());
		}
		dirs::data_dir()
			.map(|dir| dir.join(APP_DIR).join("storage.json"))
			.ok_or(ConfigError::NoConfigDir)
	}

	fn validate(&self) -> Result<()> {
		let checks = [
			(self.restore.debounce_ms, "restore.debounce_ms"),
			(self.pending.max_age_secs, "pending.max_age_secs"),
			(self.pending.sweep_interval_secs, "pending.sweep_interval_secs"),
		];
		for (value, field) in checks {
			if value == 0 {
				return Err(ConfigError::InvalidValue {
					field,
					reason: "must be greater than zero",
				});
			}
		}
		Ok(())
	}
}
