//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::matching::DEFAULT_COMMENTARY_PATTERNS;
use crate::models::AudioCodec;
use crate::policy::EvaluationPolicy;
use crate::synthesis::{encoder_for, EncoderSet};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Language preferences applied when a policy does not set its own.
    #[serde(default)]
    pub languages: LanguageSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Audio synthesis host capabilities.
    #[serde(default)]
    pub synthesis: SynthesisSettings,
}

impl Settings {
    /// Policy carrying the configured languages and commentary patterns.
    pub fn base_policy(&self) -> EvaluationPolicy {
        let mut policy = EvaluationPolicy::default()
            .with_audio_languages(self.languages.audio.iter().cloned())
            .with_subtitle_languages(self.languages.subtitle.iter().cloned());
        policy.commentary_patterns = self.languages.commentary_patterns.clone();
        policy
    }

    /// Encoders the synthesis planner may use.
    pub fn encoders(&self) -> EncoderSet {
        EncoderSet::new(self.synthesis.available_encoders.iter().cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSettings {
    /// Audio language preference, most preferred first.
    #[serde(default = "default_languages")]
    pub audio: Vec<String>,

    /// Subtitle language preference, most preferred first.
    #[serde(default = "default_languages")]
    pub subtitle: Vec<String>,

    /// Title patterns (regex) that mark commentary tracks.
    #[serde(default = "default_commentary_patterns")]
    pub commentary_patterns: Vec<String>,
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn default_commentary_patterns() -> Vec<String> {
    DEFAULT_COMMENTARY_PATTERNS.iter().map(|p| p.to_string()).collect()
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            audio: default_languages(),
            subtitle: default_languages(),
            commentary_patterns: default_commentary_patterns(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Also write daily log files.
    #[serde(default)]
    pub file_logging: bool,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            file_logging: false,
            logs_folder: default_logs_folder(),
        }
    }
}

/// Synthesis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisSettings {
    /// FFmpeg encoder names available on this host.
    #[serde(default = "default_encoders")]
    pub available_encoders: Vec<String>,
}

fn default_encoders() -> Vec<String> {
    AudioCodec::all()
        .iter()
        .map(|c| encoder_for(*c).to_string())
        .collect()
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            available_encoders: default_encoders(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Languages,
    Logging,
    Synthesis,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Languages => "languages",
            ConfigSection::Logging => "logging",
            ConfigSection::Synthesis => "synthesis",
        }
    }

    pub fn all() -> &'static [ConfigSection] {
        &[Self::Languages, Self::Logging, Self::Synthesis]
    }
}
