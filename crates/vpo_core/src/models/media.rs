//! Track metadata snapshot consumed by the engine.

use serde::{Deserialize, Serialize};

use super::enums::TrackType;

/// One track of a media file, as reported by introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Stream index within the container (ffprobe numbering).
    pub index: u32,
    /// Database id; key into the language/classification/transcription maps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Type of track.
    #[serde(rename = "type")]
    pub track_type: TrackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Language code as stored in the container (any ISO 639 form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_forced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_transfer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_primaries: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl TrackInfo {
    /// Create a new track with only index and type set.
    pub fn new(index: u32, track_type: TrackType) -> Self {
        Self {
            index,
            id: None,
            track_type,
            codec: None,
            language: None,
            title: None,
            is_default: false,
            is_forced: false,
            channels: None,
            channel_layout: None,
            width: None,
            height: None,
            frame_rate: None,
            color_transfer: None,
            color_primaries: None,
            color_space: None,
            color_range: None,
            duration_seconds: None,
        }
    }

    /// Shorthand for an audio track.
    pub fn audio(index: u32, codec: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(index, TrackType::Audio)
            .with_codec(codec)
            .with_language(language)
    }

    /// Shorthand for a subtitle track.
    pub fn subtitle(index: u32, codec: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(index, TrackType::Subtitle)
            .with_codec(codec)
            .with_language(language)
    }

    /// Shorthand for a video track.
    pub fn video(index: u32, codec: impl Into<String>) -> Self {
        Self::new(index, TrackType::Video).with_codec(codec)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn with_forced(mut self, is_forced: bool) -> Self {
        self.is_forced = is_forced;
        self
    }

    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_channel_layout(mut self, layout: impl Into<String>) -> Self {
        self.channel_layout = Some(layout.into());
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Language code, or `"und"` when the container has none.
    pub fn language_or_und(&self) -> &str {
        self.language.as_deref().unwrap_or("und")
    }

    /// Get a display string for this track.
    pub fn display_name(&self) -> String {
        let title_part = match self.title.as_deref() {
            Some(t) if !t.is_empty() => format!(" - {t}"),
            _ => String::new(),
        };
        format!(
            "{} Track {} ({}, {}){}",
            self.track_type,
            self.index,
            self.codec.as_deref().unwrap_or("unknown"),
            self.language_or_und(),
            title_part
        )
    }
}
