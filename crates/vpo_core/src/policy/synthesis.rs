//! Audio synthesis definitions.

use serde::{Deserialize, Serialize};

use super::conditions::{one_or_many, Condition, NumericFilter};
use crate::models::AudioCodec;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioSynthesisConfig {
    #[serde(default)]
    pub tracks: Vec<SynthesisTrackDefinition>,
}

/// Named channel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelPreset {
    #[serde(rename = "mono")]
    Mono,
    #[serde(rename = "stereo")]
    Stereo,
    #[serde(rename = "5.1")]
    Surround51,
    #[serde(rename = "7.1")]
    Surround71,
}

/// Target channels: a preset name or an explicit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelConfig {
    Preset(ChannelPreset),
    Count(u32),
}

impl ChannelConfig {
    pub fn channel_count(&self) -> u32 {
        match self {
            Self::Preset(ChannelPreset::Mono) => 1,
            Self::Preset(ChannelPreset::Stereo) => 2,
            Self::Preset(ChannelPreset::Surround51) => 6,
            Self::Preset(ChannelPreset::Surround71) => 8,
            Self::Count(n) => *n,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::Preset(ChannelPreset::Stereo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKeyword {
    AfterSource,
    End,
}

/// Where the new track goes among the audio tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackPosition {
    Keyword(PositionKeyword),
    /// 1-based audio track position.
    Index(u32),
}

impl Default for TrackPosition {
    fn default() -> Self {
        Self::Keyword(PositionKeyword::End)
    }
}

/// A value that is either copied from the source track or given explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Inheritable {
    #[default]
    Inherit,
    Value(String),
}

impl From<String> for Inheritable {
    fn from(s: String) -> Self {
        if s == "inherit" {
            Self::Inherit
        } else {
            Self::Value(s)
        }
    }
}

impl From<Inheritable> for String {
    fn from(v: Inheritable) -> Self {
        match v {
            Inheritable::Inherit => "inherit".to_string(),
            Inheritable::Value(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelExtreme {
    Max,
    Min,
}

/// Channel preference when scoring source tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelPreference {
    Extreme(ChannelExtreme),
    Exact(u32),
}

/// One scoring criterion; at least one field must be set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferenceCriterion {
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub language: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_commentary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<ChannelPreference>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub codec: Option<Vec<String>>,
}

impl PreferenceCriterion {
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.not_commentary.is_none()
            && self.channels.is_none()
            && self.codec.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourcePreferences {
    pub prefer: Vec<PreferenceCriterion>,
}

/// Skip synthesis when a track matching every set criterion already exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkipIfExists {
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub codec: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<NumericFilter>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub language: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_commentary: Option<bool>,
}

/// A track the policy wants synthesized from an existing audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisTrackDefinition {
    pub name: String,
    pub codec: AudioCodec,
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub source: SourcePreferences,
    /// `"640k"`, `"1.5M"` or plain bits per second; codec default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_if: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if_exists: Option<SkipIfExists>,
    #[serde(default)]
    pub title: Inheritable,
    #[serde(default)]
    pub language: Inheritable,
    #[serde(default)]
    pub position: TrackPosition,
}

impl SynthesisTrackDefinition {
    pub fn new(name: impl Into<String>, codec: AudioCodec, channels: ChannelConfig) -> Self {
        Self {
            name: name.into(),
            codec,
            channels,
            source: SourcePreferences::default(),
            bitrate: None,
            create_if: None,
            skip_if_exists: None,
            title: Inheritable::Inherit,
            language: Inheritable::Inherit,
            position: TrackPosition::default(),
        }
    }

    pub fn target_channels(&self) -> u32 {
        self.channels.channel_count()
    }

    pub fn with_preference(mut self, criterion: PreferenceCriterion) -> Self {
        self.source.prefer.push(criterion);
        self
    }

    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = Some(bitrate.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Inheritable::Value(title.into());
        self
    }

    pub fn with_position(mut self, position: TrackPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_create_if(mut self, condition: Condition) -> Self {
        self.create_if = Some(condition);
        self
    }

    pub fn with_skip_if_exists(mut self, criteria: SkipIfExists) -> Self {
        self.skip_if_exists = Some(criteria);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_from_toml() {
        let config: AudioSynthesisConfig = toml::from_str(
            r#"
            [[tracks]]
            name = "Stereo AAC"
            codec = "aac"
            channels = "stereo"
            position = "after_source"
            title = "Stereo"

            [[tracks.source.prefer]]
            language = "eng"
            not_commentary = true

            [[tracks.source.prefer]]
            channels = "max"

            [tracks.skip_if_exists]
            codec = ["aac", "eac3"]
            channels = 2
            "#,
        )
        .unwrap();

        let def = &config.tracks[0];
        assert_eq!(def.codec, AudioCodec::Aac);
        assert_eq!(def.target_channels(), 2);
        assert_eq!(def.position, TrackPosition::Keyword(PositionKeyword::AfterSource));
        assert_eq!(def.title, Inheritable::Value("Stereo".into()));
        assert_eq!(def.language, Inheritable::Inherit);
        assert_eq!(def.source.prefer.len(), 2);
        assert_eq!(
            def.source.prefer[1].channels,
            Some(ChannelPreference::Extreme(ChannelExtreme::Max))
        );
        let skip = def.skip_if_exists.as_ref().unwrap();
        assert_eq!(skip.channels, Some(NumericFilter::Exact(2)));
    }

    #[test]
    fn channel_config_accepts_counts_and_presets() {
        let c: ChannelConfig = serde_json::from_str("\"5.1\"").unwrap();
        assert_eq!(c.channel_count(), 6);
        let c: ChannelConfig = serde_json::from_str("4").unwrap();
        assert_eq!(c.channel_count(), 4);
    }

    #[test]
    fn explicit_position_is_one_based() {
        let p: TrackPosition = serde_json::from_str("1").unwrap();
        assert_eq!(p, TrackPosition::Index(1));
    }
}
