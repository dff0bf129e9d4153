//! `settings.toml` on disk.
//!
//! Loading fills in defaults for missing keys and drops sections vpo does not
//! know. Writes go through a sibling `.toml.tmp` file and a rename, so a
//! crash never leaves a half-written config. `update_section` rewrites one
//! table through `toml_edit` and leaves the rest of the file as the user
//! left it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};

/// Failures reading or writing `settings.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("cannot edit settings document: {0}")]
    Edit(#[from] toml_edit::TomlError),

    #[error("settings file not found: {0}")]
    NotFound(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// In-memory [`Settings`] bound to one config file.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Starts from defaults; nothing is read until `load` or `load_or_create`.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// Platform config location, e.g. `~/.config/vpo/settings.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "vpo").map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edits stay in memory until `save` or `update_section`.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }
        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        tracing::debug!("Loaded settings from {}", self.config_path.display());
        Ok(())
    }

    /// Load the file, or write a default one when it is missing.
    ///
    /// A file with unknown sections or missing keys is rewritten in
    /// canonical form.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            tracing::info!("Creating default settings at {}", self.config_path.display());
            self.settings = Settings::default();
            return self.save();
        }

        let content = fs::read_to_string(&self.config_path)?;
        let (settings, needs_rewrite) = Self::parse_and_check(&content)?;
        self.settings = settings;
        if needs_rewrite {
            tracing::info!("Normalizing settings file {}", self.config_path.display());
            self.save()?;
        }
        Ok(())
    }

    /// Create the logs folder, only when file logging is on.
    pub fn ensure_dirs_exist(&self) -> ConfigResult<()> {
        if self.settings.logging.file_logging {
            fs::create_dir_all(self.logs_folder())?;
        }
        Ok(())
    }

    pub fn logs_folder(&self) -> PathBuf {
        PathBuf::from(&self.settings.logging.logs_folder)
    }

    /// Settings plus whether the text differs from what `save` would write.
    fn parse_and_check(content: &str) -> ConfigResult<(Settings, bool)> {
        let doc: DocumentMut = content.parse()?;
        let settings: Settings = toml::from_str(content)?;

        let unknown = doc
            .iter()
            .filter(|(key, _)| !ConfigSection::all().iter().any(|s| s.table_name() == *key))
            .map(|(key, _)| key.to_string())
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            tracing::warn!("Dropping unknown config sections: {}", unknown.join(", "));
        }

        let canonical = toml::to_string_pretty(&settings)?;
        Ok((settings, !unknown.is_empty() || content.trim() != canonical.trim()))
    }

    /// Write every section, with a header comment per table.
    pub fn save(&self) -> ConfigResult<()> {
        let mut output = String::from("# Video Policy Orchestrator settings\n\n");
        for section in ConfigSection::all() {
            output.push_str(match section {
                ConfigSection::Languages => "# Default languages and commentary patterns",
                ConfigSection::Logging => "# Logging configuration",
                ConfigSection::Synthesis => "# FFmpeg encoders available for audio synthesis",
            });
            output.push_str(&format!("\n[{}]\n", section.table_name()));
            output.push_str(&self.section_toml(*section)?);
            output.push('\n');
        }
        self.atomic_write(&output)?;
        Ok(())
    }

    /// Rewrite one table of the file on disk from the in-memory settings.
    ///
    /// Other tables, comments included, come from the file as it is now,
    /// not from memory.
    pub fn update_section(&self, section: ConfigSection) -> ConfigResult<()> {
        let mut doc = match fs::read_to_string(&self.config_path) {
            Ok(content) => content.parse::<DocumentMut>()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DocumentMut::new(),
            Err(e) => return Err(e.into()),
        };
        let table: DocumentMut = self.section_toml(section)?.parse()?;
        doc[section.table_name()] = Item::Table(table.as_table().clone());
        self.atomic_write(&doc.to_string())?;
        tracing::debug!("Updated [{}] in {}", section.table_name(), self.config_path.display());
        Ok(())
    }

    fn section_toml(&self, section: ConfigSection) -> ConfigResult<String> {
        let content = match section {
            ConfigSection::Languages => toml::to_string_pretty(&self.settings.languages)?,
            ConfigSection::Logging => toml::to_string_pretty(&self.settings.logging)?,
            ConfigSection::Synthesis => toml::to_string_pretty(&self.settings.synthesis)?,
        };
        Ok(content)
    }

    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.config_path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, &self.config_path)
    }
}
