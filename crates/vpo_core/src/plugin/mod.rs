//! Plugin interface.
//!
//! Plugins feed the engine's `PluginMetadata` input on `file.scanned` and
//! observe finished plans on `plan.evaluated`. The registry lives outside
//! `evaluate_policy`; the engine only ever sees the collected metadata.

mod registry;
mod traits;

pub use registry::PluginRegistry;
pub use traits::{FileScannedEvent, PluginEvent, PluginFields, PolicyPlugin};
