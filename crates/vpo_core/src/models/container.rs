//! Container conversion results.

use serde::{Deserialize, Serialize};

use super::enums::TrackType;
use crate::evaluator::{PolicyError, PolicyResult};

/// What happens to a track the target container cannot hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscodeAction {
    /// Re-encode audio to a compatible codec.
    Transcode,
    /// Convert a text subtitle format.
    Convert,
    /// Drop the track.
    Remove,
}

impl TranscodeAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transcode => "transcode",
            Self::Convert => "convert",
            Self::Remove => "remove",
        }
    }
}

impl std::fmt::Display for TranscodeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Plan for one incompatible track.
///
/// `target_codec` is present exactly when the action is transcode or
/// convert, and `target_bitrate` only accompanies transcode. Both
/// [`IncompatibleTrackPlan::new`] and deserialization enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTrackPlan")]
pub struct IncompatibleTrackPlan {
    pub track_index: u32,
    pub track_type: TrackType,
    pub source_codec: String,
    pub action: TranscodeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_bitrate: Option<String>,
    pub reason: String,
}

#[derive(Deserialize)]
struct RawTrackPlan {
    track_index: u32,
    track_type: TrackType,
    source_codec: String,
    action: TranscodeAction,
    #[serde(default)]
    target_codec: Option<String>,
    #[serde(default)]
    target_bitrate: Option<String>,
    reason: String,
}

impl TryFrom<RawTrackPlan> for IncompatibleTrackPlan {
    type Error = PolicyError;

    fn try_from(raw: RawTrackPlan) -> Result<Self, Self::Error> {
        IncompatibleTrackPlan::new(
            raw.track_index,
            raw.track_type,
            raw.source_codec,
            raw.action,
            raw.target_codec,
            raw.target_bitrate,
            raw.reason,
        )
    }
}

impl IncompatibleTrackPlan {
    /// Validate and build a track plan.
    pub fn new(
        track_index: u32,
        track_type: TrackType,
        source_codec: impl Into<String>,
        action: TranscodeAction,
        target_codec: Option<String>,
        target_bitrate: Option<String>,
        reason: impl Into<String>,
    ) -> PolicyResult<Self> {
        match (action, target_codec.is_some()) {
            (TranscodeAction::Transcode | TranscodeAction::Convert, false) => {
                return Err(PolicyError::invalid_track_plan(format!(
                    "track {track_index}: target_codec is required for action '{action}'"
                )));
            }
            (TranscodeAction::Remove, true) => {
                return Err(PolicyError::invalid_track_plan(format!(
                    "track {track_index}: target_codec must not be set for action 'remove'"
                )));
            }
            _ => {}
        }
        if target_bitrate.is_some() && action != TranscodeAction::Transcode {
            return Err(PolicyError::invalid_track_plan(format!(
                "track {track_index}: target_bitrate is only valid for action 'transcode'"
            )));
        }

        Ok(Self {
            track_index,
            track_type,
            source_codec: source_codec.into(),
            action,
            target_codec,
            target_bitrate,
            reason: reason.into(),
        })
    }
}

/// All track plans needed to make a file fit its target container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerTranscodePlan {
    pub track_plans: Vec<IncompatibleTrackPlan>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ContainerTranscodePlan {
    pub fn tracks_to_remove(&self) -> Vec<u32> {
        self.indices_with(TranscodeAction::Remove)
    }

    pub fn tracks_to_transcode(&self) -> Vec<u32> {
        self.indices_with(TranscodeAction::Transcode)
    }

    pub fn tracks_to_convert(&self) -> Vec<u32> {
        self.indices_with(TranscodeAction::Convert)
    }

    fn indices_with(&self, action: TranscodeAction) -> Vec<u32> {
        self.track_plans
            .iter()
            .filter(|p| p.action == action)
            .map(|p| p.track_index)
            .collect()
    }
}

/// Planned container format change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerChange {
    pub source_format: String,
    pub target_format: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Indices of tracks the target cannot carry as-is.
    #[serde(default)]
    pub incompatible_tracks: Vec<u32>,
    pub preserve_metadata: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcode_plan: Option<ContainerTranscodePlan>,
}

impl ContainerChange {
    /// True when the file is actually moving to another format.
    pub fn changes_format(&self) -> bool {
        self.source_format != self.target_format
    }
}
