//! Audio synthesis plan structures.

use serde::{Deserialize, Serialize};

use super::media::TrackInfo;

/// Target codec for a synthesized audio track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Eac3,
    Aac,
    Ac3,
    Opus,
    Flac,
}

impl AudioCodec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eac3 => "eac3",
            Self::Aac => "aac",
            Self::Ac3 => "ac3",
            Self::Opus => "opus",
            Self::Flac => "flac",
        }
    }

    pub fn all() -> &'static [AudioCodec] {
        &[Self::Eac3, Self::Aac, Self::Ac3, Self::Opus, Self::Flac]
    }

    /// True for codecs without a bitrate setting.
    pub fn is_lossless(&self) -> bool {
        matches!(self, Self::Flac)
    }
}

impl std::fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Why a synthesis definition produced no track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ConditionNotMet,
    NoSourceAvailable,
    WouldUpmix,
    EncoderUnavailable,
    AlreadyExists,
}

impl SkipReason {
    /// Short label for dry-run output.
    pub fn display(&self) -> &'static str {
        match self {
            Self::ConditionNotMet => "Condition not met",
            Self::NoSourceAvailable => "No source track",
            Self::WouldUpmix => "Would require upmix",
            Self::EncoderUnavailable => "Encoder not available",
            Self::AlreadyExists => "Already exists",
        }
    }
}

/// The source track picked for a synthesis and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTrackSelection {
    pub track_index: u32,
    pub track_info: TrackInfo,
    pub score: i64,
    /// No preference criterion matched; first audio track used.
    pub is_fallback: bool,
    pub match_reasons: Vec<String>,
}

/// A fully resolved track to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOperation {
    pub definition_name: String,
    pub source_track: SourceTrackSelection,
    pub target_codec: AudioCodec,
    pub target_channels: u32,
    /// Bits per second, `None` for lossless output.
    pub target_bitrate: Option<u32>,
    pub target_title: String,
    pub target_language: String,
    /// 0-based position among audio tracks.
    pub target_position: usize,
    /// FFmpeg filter for channel conversion, `None` when channels match.
    pub downmix_filter: Option<String>,
}

impl SynthesisOperation {
    /// Channel count of the source, with stereo assumed when unknown.
    pub fn source_channels(&self) -> u32 {
        self.source_track.track_info.channels.unwrap_or(2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSynthesis {
    pub definition_name: String,
    pub reason: SkipReason,
    pub details: String,
}

/// Whether a projected track already exists or is about to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackOrigin {
    Original,
    Synthesized,
}

/// One entry of the projected audio track order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOrderEntry {
    /// Position in the final audio order (0-based).
    pub index: usize,
    pub origin: TrackOrigin,
    pub codec: String,
    pub channels: u32,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis_name: Option<String>,
}

/// Synthesis plan for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisPlan {
    pub file_id: String,
    pub file_path: String,
    #[serde(default)]
    pub operations: Vec<SynthesisOperation>,
    #[serde(default)]
    pub skipped: Vec<SkippedSynthesis>,
    #[serde(default)]
    pub final_track_order: Vec<TrackOrderEntry>,
    /// Audio tracks of the file, needed for stream mapping at execution.
    #[serde(default)]
    pub audio_tracks: Vec<TrackInfo>,
}

impl SynthesisPlan {
    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    /// No operations and nothing skipped.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reason_labels() {
        assert_eq!(SkipReason::WouldUpmix.display(), "Would require upmix");
        assert_eq!(
            serde_json::to_string(&SkipReason::EncoderUnavailable).unwrap(),
            "\"encoder_unavailable\""
        );
    }

    #[test]
    fn audio_codec_parses_lowercase() {
        let codec: AudioCodec = serde_json::from_str("\"eac3\"").unwrap();
        assert_eq!(codec, AudioCodec::Eac3);
        assert!(AudioCodec::Flac.is_lossless());
        assert!(!AudioCodec::Opus.is_lossless());
    }

    #[test]
    fn empty_plan() {
        let plan = SynthesisPlan {
            file_id: "f".into(),
            file_path: "/a.mkv".into(),
            operations: Vec::new(),
            skipped: vec![SkippedSynthesis {
                definition_name: "Stereo".into(),
                reason: SkipReason::AlreadyExists,
                details: "exists".into(),
            }],
            final_track_order: Vec::new(),
            audio_tracks: Vec::new(),
        };
        assert!(!plan.has_operations());
        assert!(!plan.is_empty());
    }
}
