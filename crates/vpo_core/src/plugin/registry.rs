//! Thread-safe plugin registry.

use std::sync::Arc;

use parking_lot::RwLock;

use super::traits::{FileScannedEvent, PluginEvent, PolicyPlugin};
use crate::models::{Plan, PluginMetadata};

struct Registered {
    plugin: Arc<dyn PolicyPlugin>,
    enabled: bool,
}

/// Holds plugins in registration order.
///
/// Dispatch clones the handler list and releases the lock before calling
/// into plugins, so a plugin may use the registry from its handler.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: RwLock<Vec<Registered>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enabled plugin. A second plugin with the same name is
    /// ignored and `false` returned.
    pub fn register(&self, plugin: Arc<dyn PolicyPlugin>) -> bool {
        let mut plugins = self.plugins.write();
        if let Some(existing) = plugins.iter().find(|r| r.plugin.name() == plugin.name()) {
            tracing::warn!(
                "Plugin '{}' already registered (version {}). Skipping duplicate (version {}).",
                plugin.name(),
                existing.plugin.version(),
                plugin.version()
            );
            return false;
        }
        tracing::info!("Registered plugin: {} v{}", plugin.name(), plugin.version());
        plugins.push(Registered { plugin, enabled: true });
        true
    }

    pub fn unregister(&self, name: &str) -> bool {
        let mut plugins = self.plugins.write();
        let before = plugins.len();
        plugins.retain(|r| r.plugin.name() != name);
        let removed = plugins.len() != before;
        if removed {
            tracing::info!("Unregistered plugin: {}", name);
        }
        removed
    }

    pub fn enable(&self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    pub fn disable(&self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> bool {
        let mut plugins = self.plugins.write();
        match plugins.iter_mut().find(|r| r.plugin.name() == name) {
            Some(entry) => {
                entry.enabled = enabled;
                tracing::info!(
                    "{} plugin: {}",
                    if enabled { "Enabled" } else { "Disabled" },
                    name
                );
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PolicyPlugin>> {
        self.plugins
            .read()
            .iter()
            .find(|r| r.plugin.name() == name)
            .map(|r| Arc::clone(&r.plugin))
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.plugins
            .read()
            .iter()
            .any(|r| r.enabled && r.plugin.name() == name)
    }

    /// Registered plugin names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.plugins
            .read()
            .iter()
            .map(|r| r.plugin.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }

    /// Enabled plugins subscribed to `event`, in registration order.
    pub fn handlers_for(&self, event: PluginEvent) -> Vec<Arc<dyn PolicyPlugin>> {
        self.plugins
            .read()
            .iter()
            .filter(|r| r.enabled && r.plugin.handles(event))
            .map(|r| Arc::clone(&r.plugin))
            .collect()
    }

    /// Ask every `file.scanned` handler for metadata and merge the answers
    /// under each plugin's name.
    pub fn collect_metadata(&self, event: &FileScannedEvent<'_>) -> PluginMetadata {
        let mut metadata = PluginMetadata::new();
        for plugin in self.handlers_for(PluginEvent::FileScanned) {
            let Some(fields) = plugin.on_file_scanned(event) else {
                continue;
            };
            tracing::debug!(
                "Plugin {} reported {} field(s) for {}",
                plugin.name(),
                fields.len(),
                event.file_path.display()
            );
            for (field, value) in fields {
                metadata.insert(plugin.name(), &field, value);
            }
        }
        metadata
    }

    /// Hand a finished plan to every `plan.evaluated` handler.
    pub fn notify_plan_evaluated(&self, plan: &Plan) {
        for plugin in self.handlers_for(PluginEvent::PlanEvaluated) {
            plugin.on_plan_evaluated(plan);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::evaluator::{evaluate_policy, EvaluationInput};
    use crate::models::{Scalar, TrackInfo};
    use crate::plugin::PluginFields;
    use crate::policy::EvaluationPolicy;

    struct MockPlugin {
        name: &'static str,
        version: &'static str,
        events: Vec<PluginEvent>,
        plans_seen: AtomicUsize,
    }

    impl MockPlugin {
        fn new(name: &'static str, events: &[PluginEvent]) -> Self {
            Self {
                name,
                version: "1.0.0",
                events: events.to_vec(),
                plans_seen: AtomicUsize::new(0),
            }
        }
    }

    impl PolicyPlugin for MockPlugin {
        fn name(&self) -> &str {
            self.name
        }

        fn version(&self) -> &str {
            self.version
        }

        fn events(&self) -> &[PluginEvent] {
            &self.events
        }

        fn on_file_scanned(&self, event: &FileScannedEvent<'_>) -> Option<PluginFields> {
            Some(PluginFields::from([
                ("Original_Language".to_string(), Scalar::from("jpn")),
                ("track_count".to_string(), Scalar::from(event.tracks.len() as i64)),
            ]))
        }

        fn on_plan_evaluated(&self, _plan: &Plan) {
            self.plans_seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn duplicates_are_rejected() {
        let registry = PluginRegistry::new();
        let radarr = MockPlugin::new("radarr", &[PluginEvent::FileScanned]);
        assert!(registry.register(Arc::new(radarr)));
        let mut dup = MockPlugin::new("radarr", &[]);
        dup.version = "2.0.0";
        assert!(!registry.register(Arc::new(dup)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("radarr").unwrap().version(), "1.0.0");
    }

    #[test]
    fn handlers_respect_events_and_enabled() {
        let registry = PluginRegistry::new();
        registry.register(Arc::new(MockPlugin::new("radarr", &[PluginEvent::FileScanned])));
        registry.register(Arc::new(MockPlugin::new("audit", &[PluginEvent::PlanEvaluated])));
        registry.register(Arc::new(MockPlugin::new("sonarr", PluginEvent::all())));

        let names = |event| -> Vec<String> {
            registry
                .handlers_for(event)
                .iter()
                .map(|p| p.name().to_string())
                .collect()
        };
        assert_eq!(names(PluginEvent::FileScanned), vec!["radarr", "sonarr"]);

        assert!(registry.disable("sonarr"));
        assert!(!registry.is_enabled("sonarr"));
        assert_eq!(names(PluginEvent::PlanEvaluated), vec!["audit"]);
        assert!(registry.enable("sonarr"));
        assert_eq!(names(PluginEvent::PlanEvaluated), vec!["audit", "sonarr"]);
        assert!(!registry.enable("missing"));

        assert!(registry.unregister("audit"));
        assert_eq!(registry.names(), vec!["radarr", "sonarr"]);
    }

    #[test]
    fn collects_metadata_case_insensitively() {
        let registry = PluginRegistry::new();
        registry.register(Arc::new(MockPlugin::new("Radarr", &[PluginEvent::FileScanned])));
        registry.register(Arc::new(MockPlugin::new("audit", &[PluginEvent::PlanEvaluated])));

        let tracks = vec![TrackInfo::video(0, "h264"), TrackInfo::audio(1, "aac", "jpn")];
        let event = FileScannedEvent::new(Path::new("/m.mkv"), &tracks);
        let metadata = registry.collect_metadata(&event);

        assert_eq!(metadata.get("radarr", "original_language"), Some(&Scalar::from("jpn")));
        assert_eq!(metadata.get("RADARR", "TRACK_COUNT"), Some(&Scalar::Int(2)));
        assert!(metadata.plugin("audit").is_none());
    }

    #[test]
    fn notifies_plan_observers() {
        let registry = PluginRegistry::new();
        let audit = Arc::new(MockPlugin::new("audit", &[PluginEvent::PlanEvaluated]));
        registry.register(audit.clone());

        let tracks = vec![TrackInfo::video(0, "h264"), TrackInfo::audio(1, "aac", "eng")];
        let policy = EvaluationPolicy::default();
        let plan = evaluate_policy(EvaluationInput::new(
            "f1",
            Path::new("/m.mkv"),
            "mkv",
            &tracks,
            &policy,
        ))
        .unwrap();

        registry.notify_plan_evaluated(&plan);
        registry.notify_plan_evaluated(&plan);
        assert_eq!(audit.plans_seen.load(Ordering::SeqCst), 2);
    }
}
