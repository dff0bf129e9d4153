//! Core enums used throughout the engine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type of media track as reported by introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Subtitle,
    Attachment,
    Other,
}

impl TrackType {
    /// Get the lowercase name used in policies and reason strings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
            Self::Attachment => "attachment",
            Self::Other => "other",
        }
    }

    /// Get all track types.
    pub fn all() -> &'static [TrackType] {
        &[
            Self::Video,
            Self::Audio,
            Self::Subtitle,
            Self::Attachment,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TrackType {
    type Err = String;

    /// Parse a track type name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.name() == lowered)
            .ok_or_else(|| format!("unknown track type '{s}'"))
    }
}

/// Classification of a track used for ordering.
///
/// This is finer-grained than [`TrackType`]: audio and subtitle tracks are
/// split by role so a policy can place main audio before commentary, forced
/// subtitles after full subtitles, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackCategory {
    Video,
    AudioMain,
    AudioAlternate,
    AudioCommentary,
    AudioMusic,
    AudioSfx,
    AudioNonSpeech,
    SubtitleMain,
    SubtitleForced,
    SubtitleCommentary,
    Attachment,
}

impl TrackCategory {
    /// Get the snake_case name used in policy files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::AudioMain => "audio_main",
            Self::AudioAlternate => "audio_alternate",
            Self::AudioCommentary => "audio_commentary",
            Self::AudioMusic => "audio_music",
            Self::AudioSfx => "audio_sfx",
            Self::AudioNonSpeech => "audio_non_speech",
            Self::SubtitleMain => "subtitle_main",
            Self::SubtitleForced => "subtitle_forced",
            Self::SubtitleCommentary => "subtitle_commentary",
            Self::Attachment => "attachment",
        }
    }

    /// Track order used when a policy does not declare one.
    pub fn default_order() -> Vec<TrackCategory> {
        vec![
            Self::Video,
            Self::AudioMain,
            Self::AudioAlternate,
            Self::AudioMusic,
            Self::AudioSfx,
            Self::AudioNonSpeech,
            Self::SubtitleMain,
            Self::SubtitleForced,
            Self::AudioCommentary,
            Self::SubtitleCommentary,
            Self::Attachment,
        ]
    }
}

impl std::fmt::Display for TrackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Track role reported by the transcription service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionClass {
    Main,
    Commentary,
    Alternate,
    Music,
    Sfx,
    NonSpeech,
}

impl TranscriptionClass {
    /// Get the snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Commentary => "commentary",
            Self::Alternate => "alternate",
            Self::Music => "music",
            Self::Sfx => "sfx",
            Self::NonSpeech => "non_speech",
        }
    }

    /// Display title written to a track when titles are derived from classification.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Main => "Main",
            Self::Commentary => "Commentary",
            Self::Alternate => "Alternate",
            Self::Music => "Music",
            Self::Sfx => "Sound Effects",
            Self::NonSpeech => "Non-Speech",
        }
    }
}

impl std::fmt::Display for TranscriptionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Keep/remove verdict for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DispositionAction {
    Keep,
    Remove,
}

impl std::fmt::Display for DispositionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispositionAction::Keep => write!(f, "KEEP"),
            DispositionAction::Remove => write!(f, "REMOVE"),
        }
    }
}
