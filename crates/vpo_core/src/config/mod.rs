//! Configuration management for Video Policy Orchestrator.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! Settings supply the base [`EvaluationPolicy`] (languages, commentary
//! patterns) and the encoder set handed to the synthesis planner.
//!
//! # Example
//!
//! ```no_run
//! use vpo_core::config::{ConfigManager, ConfigSection};
//! use vpo_core::logging::LogLevel;
//!
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! let policy = config.settings().base_policy();
//! println!("Audio preference: {:?}", policy.audio_languages);
//!
//! config.settings_mut().logging.level = LogLevel::Debug;
//! config.update_section(ConfigSection::Logging).unwrap();
//! ```
//!
//! [`EvaluationPolicy`]: crate::policy::EvaluationPolicy

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, LanguageSettings, LoggingSettings, Settings, SynthesisSettings};
