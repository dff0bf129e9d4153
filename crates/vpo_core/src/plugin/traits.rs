//! Plugin capability trait and the events plugins subscribe to.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{ContainerTags, Plan, Scalar, TrackInfo};

/// Lifecycle points a plugin can hook into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginEvent {
    /// A file was introspected; plugins may contribute metadata.
    #[serde(rename = "file.scanned")]
    FileScanned,
    /// A plan was produced for a file.
    #[serde(rename = "plan.evaluated")]
    PlanEvaluated,
}

impl PluginEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileScanned => "file.scanned",
            Self::PlanEvaluated => "plan.evaluated",
        }
    }

    pub fn all() -> &'static [PluginEvent] {
        &[Self::FileScanned, Self::PlanEvaluated]
    }
}

impl std::fmt::Display for PluginEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Payload of [`PluginEvent::FileScanned`].
#[derive(Debug, Clone, Copy)]
pub struct FileScannedEvent<'a> {
    pub file_path: &'a Path,
    pub tracks: &'a [TrackInfo],
    pub container_tags: Option<&'a ContainerTags>,
}

impl<'a> FileScannedEvent<'a> {
    pub fn new(file_path: &'a Path, tracks: &'a [TrackInfo]) -> Self {
        Self {
            file_path,
            tracks,
            container_tags: None,
        }
    }

    pub fn with_container_tags(mut self, tags: &'a ContainerTags) -> Self {
        self.container_tags = Some(tags);
        self
    }
}

/// Fields a plugin reports for one file.
pub type PluginFields = BTreeMap<String, Scalar>;

/// A plugin that enriches files with metadata or observes finished plans.
///
/// Handlers default to doing nothing, so a plugin only implements the
/// events it lists in [`events`](Self::events).
///
/// # Example
///
/// ```ignore
/// struct Radarr;
///
/// impl PolicyPlugin for Radarr {
///     fn name(&self) -> &str { "radarr" }
///     fn version(&self) -> &str { "1.0.0" }
///     fn events(&self) -> &[PluginEvent] { &[PluginEvent::FileScanned] }
///
///     fn on_file_scanned(&self, _event: &FileScannedEvent<'_>) -> Option<PluginFields> {
///         Some(PluginFields::from([("original_language".into(), "jpn".into())]))
///     }
/// }
/// ```
pub trait PolicyPlugin: Send + Sync {
    /// Unique name; also the key under which its metadata is stored.
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Events this plugin wants to receive.
    fn events(&self) -> &[PluginEvent];

    /// Contribute metadata for a scanned file. `None` contributes nothing.
    fn on_file_scanned(&self, _event: &FileScannedEvent<'_>) -> Option<PluginFields> {
        None
    }

    fn on_plan_evaluated(&self, _plan: &Plan) {}

    fn handles(&self, event: PluginEvent) -> bool {
        self.events().contains(&event)
    }
}
