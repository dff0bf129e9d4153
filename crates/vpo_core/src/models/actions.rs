//! Primitive plan actions and per-track dispositions.

use serde::{Deserialize, Serialize};

use super::enums::{DispositionAction, TrackType};

/// Kind of a [`PlannedAction`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Reorder,
    SetDefault,
    ClearDefault,
    SetForced,
    ClearForced,
    SetTitle,
    SetLanguage,
    SetContainerMetadata,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reorder => "reorder",
            Self::SetDefault => "set_default",
            Self::ClearDefault => "clear_default",
            Self::SetForced => "set_forced",
            Self::ClearForced => "clear_forced",
            Self::SetTitle => "set_title",
            Self::SetLanguage => "set_language",
            Self::SetContainerMetadata => "set_container_metadata",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One primitive change the executor must apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action_type", rename_all = "snake_case")]
pub enum PlannedAction {
    /// Rewrite the stream order (container-level).
    Reorder {
        current_order: Vec<u32>,
        desired_order: Vec<u32>,
    },
    SetDefault {
        track_index: u32,
    },
    ClearDefault {
        track_index: u32,
    },
    SetForced {
        track_index: u32,
    },
    ClearForced {
        track_index: u32,
    },
    SetTitle {
        track_index: u32,
        current: Option<String>,
        desired: String,
    },
    SetLanguage {
        track_index: u32,
        current: Option<String>,
        desired: String,
    },
    /// Set a container tag; an empty `desired` deletes it.
    SetContainerMetadata {
        field: String,
        current: Option<String>,
        desired: String,
    },
}

impl PlannedAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Reorder { .. } => ActionKind::Reorder,
            Self::SetDefault { .. } => ActionKind::SetDefault,
            Self::ClearDefault { .. } => ActionKind::ClearDefault,
            Self::SetForced { .. } => ActionKind::SetForced,
            Self::ClearForced { .. } => ActionKind::ClearForced,
            Self::SetTitle { .. } => ActionKind::SetTitle,
            Self::SetLanguage { .. } => ActionKind::SetLanguage,
            Self::SetContainerMetadata { .. } => ActionKind::SetContainerMetadata,
        }
    }

    /// Target track, or `None` for container-level actions.
    pub fn track_index(&self) -> Option<u32> {
        match self {
            Self::SetDefault { track_index }
            | Self::ClearDefault { track_index }
            | Self::SetForced { track_index }
            | Self::ClearForced { track_index }
            | Self::SetTitle { track_index, .. }
            | Self::SetLanguage { track_index, .. } => Some(*track_index),
            Self::Reorder { .. } | Self::SetContainerMetadata { .. } => None,
        }
    }

    /// Human-readable description for dry-run output.
    pub fn description(&self) -> String {
        match self {
            Self::Reorder {
                current_order,
                desired_order,
            } => format!("Reorder: {current_order:?} → {desired_order:?}"),
            Self::SetDefault { track_index } => format!("Track {track_index}: Set as default"),
            Self::ClearDefault { track_index } => {
                format!("Track {track_index}: Clear default flag")
            }
            Self::SetForced { track_index } => format!("Track {track_index}: Set as forced"),
            Self::ClearForced { track_index } => format!("Track {track_index}: Clear forced flag"),
            Self::SetTitle {
                track_index,
                desired,
                ..
            } => format!("Track {track_index}: Set title '{desired}'"),
            Self::SetLanguage {
                track_index,
                desired,
                ..
            } => format!("Track {track_index}: Set language '{desired}'"),
            Self::SetContainerMetadata { field, desired, .. } if desired.is_empty() => {
                format!("Container: Clear metadata '{field}'")
            }
            Self::SetContainerMetadata { field, desired, .. } => {
                format!("Container: Set metadata '{field}' = '{desired}'")
            }
        }
    }
}

/// Keep/remove verdict for one track, with the context a report needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDisposition {
    pub track_index: u32,
    pub track_type: TrackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    /// `"WxH"` for tracks with known dimensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub action: DispositionAction,
    pub reason: String,
    /// `"<class> <pct>%"` or `"TBD"`; audio only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription_status: Option<String>,
}

impl TrackDisposition {
    pub fn is_removed(&self) -> bool {
        self.action == DispositionAction::Remove
    }
}
