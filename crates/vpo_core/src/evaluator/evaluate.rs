//! Policy evaluation entry point.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::conditions::EvaluationContext;
use super::container::{evaluate_container_change_with_policy, is_mkv_container};
use super::errors::{PolicyError, PolicyResult};
use super::filtering::compute_track_dispositions;
use super::ordering::{
    audio_matches_language_preference, compute_default_flags, compute_desired_order,
    find_preferred_track,
};
use super::rules::evaluate_conditional_rules;
use super::transcription::{compute_language_updates, compute_title_updates};
use crate::models::{
    ClassificationResults, ConditionalResult, ContainerTags, LanguageResults, Plan,
    PlannedAction, PluginMetadata, TrackFlag, TrackInfo, TrackType, TranscriptionMap,
};
use crate::policy::{EvaluationPolicy, TrackActionsConfig};

/// Everything `evaluate_policy` reads for one file.
///
/// Signal maps are optional; conditions that need a missing map evaluate
/// to false.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationInput<'a> {
    pub file_id: &'a str,
    pub file_path: &'a Path,
    /// Container format as reported by the probe (`matroska,webm`, `mp4`, ...).
    pub container: &'a str,
    pub tracks: &'a [TrackInfo],
    pub policy: &'a EvaluationPolicy,
    pub transcription_results: Option<&'a TranscriptionMap>,
    pub language_results: Option<&'a LanguageResults>,
    pub plugin_metadata: Option<&'a PluginMetadata>,
    pub classification_results: Option<&'a ClassificationResults>,
    pub container_tags: Option<&'a ContainerTags>,
    /// Timestamp stamped on the plan; `None` uses the current time.
    pub created_at: Option<DateTime<Utc>>,
}

impl<'a> EvaluationInput<'a> {
    pub fn new(
        file_id: &'a str,
        file_path: &'a Path,
        container: &'a str,
        tracks: &'a [TrackInfo],
        policy: &'a EvaluationPolicy,
    ) -> Self {
        Self {
            file_id,
            file_path,
            container,
            tracks,
            policy,
            transcription_results: None,
            language_results: None,
            plugin_metadata: None,
            classification_results: None,
            container_tags: None,
            created_at: None,
        }
    }

    pub fn with_transcription_results(mut self, results: &'a TranscriptionMap) -> Self {
        self.transcription_results = Some(results);
        self
    }

    pub fn with_language_results(mut self, results: &'a LanguageResults) -> Self {
        self.language_results = Some(results);
        self
    }

    pub fn with_plugin_metadata(mut self, metadata: &'a PluginMetadata) -> Self {
        self.plugin_metadata = Some(metadata);
        self
    }

    pub fn with_classification_results(mut self, results: &'a ClassificationResults) -> Self {
        self.classification_results = Some(results);
        self
    }

    pub fn with_container_tags(mut self, tags: &'a ContainerTags) -> Self {
        self.container_tags = Some(tags);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Default and forced flags as they will be after the actions planned so far.
struct FlagState {
    flags: BTreeMap<u32, (bool, bool)>,
}

impl FlagState {
    fn new(tracks: &[TrackInfo]) -> Self {
        Self {
            flags: tracks
                .iter()
                .map(|t| (t.index, (t.is_default, t.is_forced)))
                .collect(),
        }
    }

    /// Plan a flag change unless the flag already has `value`.
    fn change(
        &mut self,
        index: u32,
        flag: TrackFlag,
        value: bool,
        actions: &mut Vec<PlannedAction>,
    ) {
        let Some((default, forced)) = self.flags.get_mut(&index) else {
            return;
        };
        let slot = match flag {
            TrackFlag::Default => default,
            TrackFlag::Forced => forced,
        };
        if *slot == value {
            return;
        }
        *slot = value;
        actions.push(match (flag, value) {
            (TrackFlag::Default, true) => PlannedAction::SetDefault { track_index: index },
            (TrackFlag::Default, false) => PlannedAction::ClearDefault { track_index: index },
            (TrackFlag::Forced, true) => PlannedAction::SetForced { track_index: index },
            (TrackFlag::Forced, false) => PlannedAction::ClearForced { track_index: index },
        });
    }
}

fn apply_track_actions(
    tracks: &[TrackInfo],
    track_type: TrackType,
    config: Option<&TrackActionsConfig>,
    state: &mut FlagState,
    actions: &mut Vec<PlannedAction>,
) {
    let Some(config) = config else {
        return;
    };
    for track in tracks.iter().filter(|t| t.track_type == track_type) {
        if config.clear_all_forced {
            state.change(track.index, TrackFlag::Forced, false, actions);
        }
        if config.clear_all_default {
            state.change(track.index, TrackFlag::Default, false, actions);
        }
        if config.clear_all_titles && track.title.is_some() {
            actions.push(PlannedAction::SetTitle {
                track_index: track.index,
                current: track.title.clone(),
                desired: String::new(),
            });
        }
    }
}

/// Turn rule outputs into actions, dropping changes that are already true.
fn apply_conditional_changes(
    conditional: &ConditionalResult,
    tracks: &[TrackInfo],
    container_tags: Option<&ContainerTags>,
    state: &mut FlagState,
    actions: &mut Vec<PlannedAction>,
) {
    for change in &conditional.track_flag_changes {
        state.change(change.track_index, change.flag, change.value, actions);
    }

    for change in &conditional.track_language_changes {
        let Some(track) = tracks.iter().find(|t| t.index == change.track_index) else {
            continue;
        };
        if track.language.as_deref() == Some(change.new_language.as_str()) {
            continue;
        }
        actions.push(PlannedAction::SetLanguage {
            track_index: track.index,
            current: track.language.clone(),
            desired: change.new_language.clone(),
        });
    }

    for change in &conditional.container_metadata_changes {
        let current = container_tags.and_then(|tags| tags.get(&change.field.to_lowercase()));
        match current {
            Some(value) if *value == change.new_value => continue,
            None if change.new_value.is_empty() => continue,
            _ => {}
        }
        actions.push(PlannedAction::SetContainerMetadata {
            field: change.field.clone(),
            current: current.cloned(),
            desired: change.new_value.clone(),
        });
    }
}

/// Evaluate a policy against one file and produce its plan.
///
/// Pure: no I/O, no shared state. The same input always yields the same
/// plan, apart from `created_at` when the input leaves it unset.
pub fn evaluate_policy(input: EvaluationInput<'_>) -> PolicyResult<Plan> {
    let tracks = input.tracks;
    let policy = input.policy;
    if tracks.is_empty() {
        return Err(PolicyError::no_tracks("File has no tracks to evaluate"));
    }

    let context = EvaluationContext::for_policy(tracks, policy)
        .with_language_results(input.language_results)
        .with_plugin_metadata(input.plugin_metadata)
        .with_classification_results(input.classification_results)
        .with_container_tags(input.container_tags);
    let matcher = context.commentary_matcher();
    let mut actions: Vec<PlannedAction> = Vec::new();
    let mut requires_remux = false;
    let mut state = FlagState::new(tracks);

    // 1. Conditional rules
    let conditional = match &policy.rules {
        Some(rules) if policy.has_rules() => {
            let result = evaluate_conditional_rules(rules, &context, input.file_path)?;
            tracing::debug!(
                "Rules matched: {}",
                result.matched_rule.as_deref().unwrap_or("none")
            );
            Some(result)
        }
        _ => None,
    };
    let skip_flags = conditional.as_ref().map(|c| c.skip_flags).unwrap_or_default();

    // 2. Pre-actions
    for (track_type, config) in [
        (TrackType::Audio, &policy.audio_actions),
        (TrackType::Video, &policy.video_actions),
        (TrackType::Subtitle, &policy.subtitle_actions),
    ] {
        apply_track_actions(tracks, track_type, config.as_ref(), &mut state, &mut actions);
    }

    // 3. Conditional outputs
    if let Some(conditional) = &conditional {
        let tags = input.container_tags;
        apply_conditional_changes(conditional, tracks, tags, &mut state, &mut actions);
    }

    // 4. Track order
    let mut current_order: Vec<u32> = tracks.iter().map(|t| t.index).collect();
    current_order.sort_unstable();
    let desired_order = compute_desired_order(tracks, policy, matcher, input.transcription_results);
    if desired_order != current_order && is_mkv_container(input.container) {
        tracing::debug!("Reorder {:?} -> {:?}", current_order, desired_order);
        actions.push(PlannedAction::Reorder {
            current_order,
            desired_order,
        });
        requires_remux = true;
    }

    // 5. Default flags
    let desired_defaults = compute_default_flags(tracks, policy, matcher);
    for track in tracks {
        if let Some(&desired) = desired_defaults.get(&track.index) {
            state.change(track.index, TrackFlag::Default, desired, &mut actions);
        }
    }

    // 6. Forced subtitles when audio is in another language
    if policy.default_flags.set_subtitle_forced_when_audio_differs {
        let audio: Vec<&TrackInfo> = tracks
            .iter()
            .filter(|t| t.track_type == TrackType::Audio)
            .collect();
        let subtitles: Vec<&TrackInfo> = tracks
            .iter()
            .filter(|t| t.track_type == TrackType::Subtitle)
            .collect();
        if !subtitles.is_empty()
            && !audio_matches_language_preference(&audio, &policy.audio_languages, matcher)
        {
            let preferred =
                find_preferred_track(&subtitles, &policy.subtitle_languages, matcher, None);
            if let Some(track) = preferred {
                state.change(track.index, TrackFlag::Forced, true, &mut actions);
            }
        }
    }

    // 7. Transcription-driven updates
    if let (Some(options), Some(transcription)) =
        (&policy.transcription, input.transcription_results)
    {
        actions.extend(compute_language_updates(tracks, transcription, options));
        let titled: BTreeSet<u32> = actions
            .iter()
            .filter(|a| matches!(a, PlannedAction::SetTitle { .. }))
            .filter_map(PlannedAction::track_index)
            .collect();
        actions.extend(compute_title_updates(tracks, transcription, options, &titled));
    }

    // 8. Track filtering
    let mut track_dispositions = Vec::new();
    if policy.has_track_filtering() && !skip_flags.skip_track_filter {
        let forced_will_be_cleared = policy
            .subtitle_actions
            .as_ref()
            .is_some_and(|a| a.clear_all_forced);
        track_dispositions = compute_track_dispositions(
            tracks,
            policy,
            input.transcription_results,
            forced_will_be_cleared,
        )?;
        if track_dispositions.iter().any(|d| d.is_removed()) {
            requires_remux = true;
        }
    } else if skip_flags.skip_track_filter {
        tracing::debug!("Track filtering skipped by conditional rule");
    }

    // 9. Container conversion
    let container_change = evaluate_container_change_with_policy(tracks, input.container, policy)?;
    if container_change.as_ref().is_some_and(|c| c.changes_format()) {
        requires_remux = true;
    }

    // 10. Assemble
    let tracks_removed = track_dispositions.iter().filter(|d| d.is_removed()).count();
    let tracks_kept = tracks.len() - tracks_removed;

    let plan = Plan {
        file_id: input.file_id.to_string(),
        file_path: input.file_path.display().to_string(),
        policy_version: policy.schema_version,
        actions: Arc::from(actions),
        requires_remux,
        track_dispositions,
        container_change,
        conditional_result: conditional,
        skip_flags,
        tracks_kept,
        tracks_removed,
        created_at: input.created_at.unwrap_or_else(Utc::now),
    };
    tracing::info!("Plan for {}: {}", plan.file_path, plan.summary());
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::{ActionKind, DispositionAction, TranscriptionClass, TranscriptionInfo};
    use crate::policy::{
        AudioFilterConfig, Condition, ConditionalAction, ConditionalRule, DefaultFlagsConfig,
        MatchMode, MetadataOperator, RulesConfig, SetContainerMetadataAction, SetForcedAction,
        SkipType, TrackFilters, TranscriptionPolicyOptions,
    };

    fn evaluate(tracks: &[TrackInfo], policy: &EvaluationPolicy, container: &str) -> Plan {
        let path = Path::new("/media/movie.mkv");
        evaluate_policy(EvaluationInput::new("file-1", path, container, tracks, policy)).unwrap()
    }

    fn mkv_input<'a>(tracks: &'a [TrackInfo], policy: &'a EvaluationPolicy) -> EvaluationInput<'a> {
        EvaluationInput::new("f", Path::new("/a.mkv"), "mkv", tracks, policy)
    }

    fn kinds(plan: &Plan) -> Vec<ActionKind> {
        plan.actions.iter().map(PlannedAction::kind).collect()
    }

    /// Apply flag/title/language actions the way an executor would.
    fn apply(tracks: &[TrackInfo], plan: &Plan) -> Vec<TrackInfo> {
        let mut tracks = tracks.to_vec();
        for action in plan.actions.iter() {
            let Some(index) = action.track_index() else {
                continue;
            };
            let Some(track) = tracks.iter_mut().find(|t| t.index == index) else {
                continue;
            };
            match action {
                PlannedAction::SetDefault { .. } => track.is_default = true,
                PlannedAction::ClearDefault { .. } => track.is_default = false,
                PlannedAction::SetForced { .. } => track.is_forced = true,
                PlannedAction::ClearForced { .. } => track.is_forced = false,
                PlannedAction::SetTitle { desired, .. } => {
                    track.title = Some(desired.clone()).filter(|t| !t.is_empty())
                }
                PlannedAction::SetLanguage { desired, .. } => {
                    track.language = Some(desired.clone())
                }
                _ => {}
            }
        }
        tracks
    }

    #[test]
    fn no_tracks_is_an_error() {
        let policy = EvaluationPolicy::default();
        let err = evaluate_policy(mkv_input(&[], &policy)).unwrap_err();
        assert_eq!(err, PolicyError::no_tracks("File has no tracks to evaluate"));
    }

    #[test]
    fn conforming_mkv_gives_empty_plan() {
        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::audio(1, "aac", "eng").with_default(true),
            TrackInfo::subtitle(2, "subrip", "eng"),
        ];
        let plan = evaluate(&tracks, &EvaluationPolicy::default(), "matroska,webm");
        assert!(plan.is_empty());
        assert!(!plan.requires_remux);
        assert_eq!(plan.tracks_kept, 3);
        assert_eq!(plan.summary(), "No changes required");
    }

    #[test]
    fn preferred_language_reorders_and_moves_default() {
        let tracks = vec![
            TrackInfo::video(0, "hevc").with_default(true),
            TrackInfo::audio(1, "eac3", "eng").with_default(true),
            TrackInfo::audio(2, "aac", "jpn"),
        ];
        let policy = EvaluationPolicy::default().with_audio_languages(["jpn", "eng"]);
        let plan = evaluate(&tracks, &policy, "matroska,webm");

        assert_eq!(
            plan.actions[0],
            PlannedAction::Reorder {
                current_order: vec![0, 1, 2],
                desired_order: vec![0, 2, 1],
            }
        );
        assert_eq!(plan.actions[1], PlannedAction::ClearDefault { track_index: 1 });
        assert_eq!(plan.actions[2], PlannedAction::SetDefault { track_index: 2 });
        assert!(plan.requires_remux);
    }

    #[test]
    fn default_moves_to_preferred_language() {
        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::audio(1, "aac", "eng"),
            TrackInfo::audio(2, "aac", "jpn").with_default(true),
        ];
        let policy = EvaluationPolicy::default().with_audio_languages(["eng"]);
        let plan = evaluate(&tracks, &policy, "matroska,webm");

        assert_eq!(
            plan.actions.to_vec(),
            vec![
                PlannedAction::SetDefault { track_index: 1 },
                PlannedAction::ClearDefault { track_index: 2 },
            ]
        );
        assert!(!plan.requires_remux);
    }

    #[test]
    fn non_mkv_never_reorders() {
        let tracks = vec![
            TrackInfo::audio(0, "aac", "eng").with_default(true),
            TrackInfo::video(1, "h264").with_default(true),
        ];
        let plan = evaluate(&tracks, &EvaluationPolicy::default(), "mov,mp4,m4a,3gp,3g2,mj2");
        assert!(!kinds(&plan).contains(&ActionKind::Reorder));
        assert!(!plan.requires_remux);
    }

    #[test]
    fn plugin_rule_skips_track_filter() {
        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::audio(1, "aac", "jpn").with_default(true),
            TrackInfo::audio(2, "aac", "eng"),
        ];
        let rules = RulesConfig::new(
            MatchMode::First,
            vec![ConditionalRule::new(
                "Anime",
                Condition::plugin_metadata(
                    "radarr",
                    "original_language",
                    MetadataOperator::Eq,
                    Some("jpn".into()),
                ),
                vec![ConditionalAction::Skip(SkipType::TrackFilter)],
            )],
        );
        let policy = EvaluationPolicy::default()
            .with_keep_audio(AudioFilterConfig::new(vec!["eng".into()]))
            .with_rules(rules);
        let metadata = PluginMetadata::new().with_field("radarr", "original_language", "jpn");

        let plan =
            evaluate_policy(mkv_input(&tracks, &policy).with_plugin_metadata(&metadata)).unwrap();
        assert!(plan.skip_flags.skip_track_filter);
        assert!(plan.track_dispositions.iter().all(|d| d.action == DispositionAction::Keep));
        assert_eq!(plan.tracks_removed, 0);
        assert_eq!(
            plan.conditional_result.as_ref().and_then(|c| c.matched_rule.as_deref()),
            Some("Anime")
        );

        let plan = evaluate(&tracks, &policy, "mkv");
        assert_eq!(plan.removed_track_indices(), vec![1]);
        assert!(plan.requires_remux);
        assert_eq!(plan.tracks_kept, 2);
    }

    #[test]
    fn rule_conditions_use_policy_commentary_patterns() {
        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::audio(1, "aac", "eng").with_default(true).with_title("Bonus Feature"),
        ];
        let rules = RulesConfig::new(
            MatchMode::First,
            vec![ConditionalRule::new(
                "Main audio",
                Condition::exists(TrackType::Audio, TrackFilters::default().with_not_commentary()),
                vec![ConditionalAction::Skip(SkipType::AudioTranscode)],
            )],
        );
        let mut policy = EvaluationPolicy::default().with_rules(rules);
        assert!(evaluate(&tracks, &policy, "matroska,webm").skip_flags.skip_audio_transcode);

        policy.commentary_patterns = vec!["bonus".into()];
        let plan = evaluate(&tracks, &policy, "matroska,webm");
        assert!(!plan.skip_flags.skip_audio_transcode);
        assert_eq!(
            plan.conditional_result.as_ref().and_then(|c| c.matched_rule.as_deref()),
            None
        );
    }

    #[test]
    fn conditional_noops_are_dropped() {
        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::audio(1, "aac", "eng").with_default(true),
            TrackInfo::subtitle(2, "subrip", "eng").with_forced(true),
        ];
        let rules = RulesConfig::new(
            MatchMode::First,
            vec![ConditionalRule::new(
                "Tags",
                Condition::exists(TrackType::Video, Default::default()),
                vec![
                    ConditionalAction::SetForced(SetForcedAction {
                        track_type: TrackType::Subtitle,
                        language: None,
                        value: true,
                    }),
                    ConditionalAction::SetContainerMetadata(SetContainerMetadataAction {
                        field: "Title".into(),
                        value: Some("Movie".into()),
                        from_plugin_metadata: None,
                    }),
                    ConditionalAction::SetContainerMetadata(SetContainerMetadataAction {
                        field: "comment".into(),
                        value: Some(String::new()),
                        from_plugin_metadata: None,
                    }),
                    ConditionalAction::SetContainerMetadata(SetContainerMetadataAction {
                        field: "encoder".into(),
                        value: Some(String::new()),
                        from_plugin_metadata: None,
                    }),
                ],
            )],
        );
        let policy = EvaluationPolicy::default().with_rules(rules);
        let tags = ContainerTags::from([
            ("title".to_string(), "Movie".to_string()),
            ("encoder".to_string(), "libebml".to_string()),
        ]);
        let plan = evaluate_policy(mkv_input(&tracks, &policy).with_container_tags(&tags)).unwrap();
        assert_eq!(
            plan.actions.to_vec(),
            vec![PlannedAction::SetContainerMetadata {
                field: "encoder".into(),
                current: Some("libebml".into()),
                desired: String::new(),
            }]
        );
    }

    #[test]
    fn pre_actions_run_before_defaults() {
        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::audio(1, "aac", "eng").with_default(true).with_title("Stereo"),
            TrackInfo::subtitle(2, "subrip", "eng").with_forced(true),
        ];
        let mut policy = EvaluationPolicy::default();
        policy.audio_actions = Some(TrackActionsConfig {
            clear_all_default: true,
            clear_all_titles: true,
            ..Default::default()
        });
        policy.subtitle_actions = Some(TrackActionsConfig {
            clear_all_forced: true,
            ..Default::default()
        });
        let plan = evaluate(&tracks, &policy, "mkv");
        assert_eq!(
            plan.actions.to_vec(),
            vec![
                PlannedAction::ClearDefault { track_index: 1 },
                PlannedAction::SetTitle {
                    track_index: 1,
                    current: Some("Stereo".into()),
                    desired: String::new(),
                },
                PlannedAction::ClearForced { track_index: 2 },
                PlannedAction::SetDefault { track_index: 1 },
            ]
        );
    }

    #[test]
    fn forced_subtitle_when_audio_differs() {
        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::audio(1, "aac", "jpn").with_default(true),
            TrackInfo::subtitle(2, "subrip", "eng"),
        ];
        let policy = EvaluationPolicy::default()
            .with_audio_languages(["eng"])
            .with_default_flags(DefaultFlagsConfig {
                set_subtitle_forced_when_audio_differs: true,
                ..Default::default()
            });
        let plan = evaluate(&tracks, &policy, "mkv");
        assert!(plan.actions.contains(&PlannedAction::SetForced { track_index: 2 }));
    }

    #[test]
    fn transcription_updates_language_and_title() {
        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::new(1, TrackType::Audio)
                .with_codec("aac")
                .with_title("Stereo")
                .with_default(true),
        ];
        let transcription = TranscriptionMap::from([(
            1,
            TranscriptionInfo::new(TranscriptionClass::Main, 0.92).with_language("en"),
        )]);
        let policy = EvaluationPolicy::default().with_transcription(TranscriptionPolicyOptions {
            enabled: true,
            update_language_from_transcription: true,
            update_title_from_classification: true,
            ..Default::default()
        });
        let plan = evaluate_policy(
            mkv_input(&tracks, &policy).with_transcription_results(&transcription),
        )
        .unwrap();
        assert!(plan.actions.contains(&PlannedAction::SetLanguage {
            track_index: 1,
            current: Some("und".into()),
            desired: "eng".into(),
        }));
        assert!(plan.actions.contains(&PlannedAction::SetTitle {
            track_index: 1,
            current: Some("Stereo".into()),
            desired: "Main".into(),
        }));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let tracks = vec![
            TrackInfo::video(0, "h264"),
            TrackInfo::audio(1, "aac", "eng"),
            TrackInfo::audio(2, "aac", "fre").with_default(true),
            TrackInfo::subtitle(3, "subrip", "eng").with_default(true),
        ];
        let policy = EvaluationPolicy::default();
        let first = evaluate(&tracks, &policy, "mkv");
        assert!(!first.is_empty());

        let applied = apply(&tracks, &first);
        let second = evaluate(&applied, &policy, "mkv");
        assert!(second.is_empty(), "unexpected actions: {:?}", second.actions);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let tracks = vec![
            TrackInfo::video(0, "h264"),
            TrackInfo::audio(1, "truehd", "eng").with_channels(8),
            TrackInfo::audio(2, "aac", "jpn"),
            TrackInfo::subtitle(3, "ass", "eng"),
        ];
        let policy = EvaluationPolicy::default()
            .with_keep_audio(AudioFilterConfig::new(vec!["eng".into()]));
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let run = || {
            let plan =
                evaluate_policy(mkv_input(&tracks, &policy).with_created_at(created_at)).unwrap();
            serde_json::to_string(&plan).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn container_conversion_requires_remux() {
        use crate::policy::{ContainerConfig, ContainerTarget};

        let tracks = vec![
            TrackInfo::video(0, "h264").with_default(true),
            TrackInfo::audio(1, "aac", "eng").with_default(true),
        ];
        let policy =
            EvaluationPolicy::default().with_container(ContainerConfig::new(ContainerTarget::Mkv));
        let plan = evaluate(&tracks, &policy, "mov,mp4,m4a,3gp,3g2,mj2");
        assert!(plan.requires_remux);
        assert_eq!(plan.container_change.as_ref().map(|c| c.target_format.as_str()), Some("mkv"));
        assert_eq!(plan.policy_version, policy.schema_version);
    }
}
