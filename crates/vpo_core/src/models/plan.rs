//! The immutable evaluation result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actions::{PlannedAction, TrackDisposition};
use super::conditional::{ConditionalResult, SkipFlags};
use super::container::ContainerChange;

/// Everything that must happen to make one file conform to a policy.
///
/// The action sequence is frozen into an `Arc<[PlannedAction]>`; cloning a
/// plan shares it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub file_id: String,
    pub file_path: String,
    pub policy_version: u32,
    pub actions: Arc<[PlannedAction]>,
    pub requires_remux: bool,
    #[serde(default)]
    pub track_dispositions: Vec<TrackDisposition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_change: Option<ContainerChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_result: Option<ConditionalResult>,
    #[serde(default)]
    pub skip_flags: SkipFlags,
    pub tracks_kept: usize,
    pub tracks_removed: usize,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// No actions, no removed tracks, no container change.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.tracks_removed == 0 && self.container_change.is_none()
    }

    /// One-line summary for logs and dry-run output.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.actions.is_empty() {
            parts.push(format!("{} change(s)", self.actions.len()));
        }
        if self.tracks_removed > 0 {
            parts.push(format!("{} track(s) removed", self.tracks_removed));
        }
        if let Some(change) = &self.container_change {
            parts.push(format!(
                "convert {} → {}",
                change.source_format, change.target_format
            ));
        }

        if parts.is_empty() {
            return "No changes required".to_string();
        }
        let mut summary = parts.join(", ");
        if self.requires_remux {
            summary.push_str(" (requires remux)");
        }
        summary
    }

    /// Indices of tracks whose disposition is REMOVE.
    pub fn removed_track_indices(&self) -> Vec<u32> {
        self.track_dispositions
            .iter()
            .filter(|d| d.is_removed())
            .map(|d| d.track_index)
            .collect()
    }
}
