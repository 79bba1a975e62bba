//! Configuration management.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only the changed section is rewritten)
//! - Defaults for every missing key
//!
//! # Example
//!
//! ```no_run
//! use draftforge_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/draftforge.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Output folder: {}", config.settings().paths.output_folder);
//!
//! config.settings_mut().captions.font_size = 10.0;
//! config.update_section(ConfigSection::Captions).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult, DEFAULT_CONFIG_PATH};
pub use settings::{
    CanvasSettings, CaptionSettings, ConfigSection, InstallSettings, LoggingSettings,
    PathSettings, ProbeSettings, Settings,
};
