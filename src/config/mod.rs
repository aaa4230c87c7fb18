//! Configuration loading and management.

mod file;
mod params;
mod paths;
mod types;
mod validate;

pub use file::{load_config_file, load_default_config, save_config, save_default_config};
pub use params::{MatchSettings, build_match_settings, threshold_for};
pub use paths::{config_dir, config_file_path};
pub use types::{Config, DefaultsConfig, OutputConfig, OutputFormat};
pub use validate::validate_config;
