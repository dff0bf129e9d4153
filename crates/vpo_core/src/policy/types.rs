//! The flat policy structure consumed by the evaluator.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::conditions::{Condition, TitleFilter};
use super::rules::{ConditionalAction, RulesConfig};
use super::synthesis::AudioSynthesisConfig;
use crate::evaluator::{PolicyError, PolicyResult};
use crate::models::{TrackCategory, TranscodeAction};

/// Current policy schema version.
pub const POLICY_SCHEMA_VERSION: u32 = 13;

fn default_schema_version() -> u32 {
    POLICY_SCHEMA_VERSION
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string(), "und".to_string()]
}

fn default_commentary_patterns() -> Vec<String> {
    vec!["commentary".to_string(), "director".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_minimum() -> usize {
    1
}

fn default_confidence_threshold() -> f64 {
    0.8
}

/// Default flag behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultFlagsConfig {
    pub set_first_video_default: bool,
    pub set_preferred_audio_default: bool,
    pub set_preferred_subtitle_default: bool,
    pub clear_other_defaults: bool,
    pub set_subtitle_default_when_audio_differs: bool,
    pub set_subtitle_forced_when_audio_differs: bool,
    /// Codec ranking among preferred-language audio candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_audio_codec: Option<Vec<String>>,
}

impl Default for DefaultFlagsConfig {
    fn default() -> Self {
        Self {
            set_first_video_default: true,
            set_preferred_audio_default: true,
            set_preferred_subtitle_default: false,
            clear_other_defaults: true,
            set_subtitle_default_when_audio_differs: false,
            set_subtitle_forced_when_audio_differs: false,
            preferred_audio_codec: None,
        }
    }
}

/// What to do when audio filtering keeps fewer tracks than `minimum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageFallbackMode {
    /// Keep tracks in the content's original language (first audio track).
    ContentLanguage,
    KeepAll,
    KeepFirst,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFilterConfig {
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<LanguageFallbackMode>,
    #[serde(default = "default_minimum")]
    pub minimum: usize,
    #[serde(default = "default_true")]
    pub keep_music_tracks: bool,
    #[serde(default = "default_true")]
    pub exclude_music_from_language_filter: bool,
    #[serde(default = "default_true")]
    pub keep_sfx_tracks: bool,
    #[serde(default = "default_true")]
    pub exclude_sfx_from_language_filter: bool,
    #[serde(default = "default_true")]
    pub keep_non_speech_tracks: bool,
    #[serde(default = "default_true")]
    pub exclude_non_speech_from_language_filter: bool,
}

impl AudioFilterConfig {
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            languages,
            fallback: None,
            minimum: 1,
            keep_music_tracks: true,
            exclude_music_from_language_filter: true,
            keep_sfx_tracks: true,
            exclude_sfx_from_language_filter: true,
            keep_non_speech_tracks: true,
            exclude_non_speech_from_language_filter: true,
        }
    }

    pub fn with_fallback(mut self, mode: LanguageFallbackMode) -> Self {
        self.fallback = Some(mode);
        self
    }

    pub fn with_minimum(mut self, minimum: usize) -> Self {
        self.minimum = minimum;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleFilterConfig {
    /// `None` keeps every language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    pub preserve_forced: bool,
    pub remove_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentFilterConfig {
    pub remove_all: bool,
}

/// Pre-processing flag/title clearing for one track type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackActionsConfig {
    pub clear_all_forced: bool,
    pub clear_all_default: bool,
    pub clear_all_titles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerTarget {
    Mkv,
    Mp4,
}

impl ContainerTarget {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mkv => "mkv",
            Self::Mp4 => "mp4",
        }
    }
}

impl std::fmt::Display for ContainerTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncompatibleCodecMode {
    /// Fail with `IncompatibleCodec`.
    #[default]
    Error,
    /// Leave the file in its current container.
    Skip,
    /// Plan per-track transcodes, conversions and removals.
    Transcode,
}

/// Override for how one source codec is handled on container conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecTranscodeMapping {
    /// Target codec (ignored for `remove`).
    pub codec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<TranscodeAction>,
}

impl CodecTranscodeMapping {
    pub fn new(codec: impl Into<String>) -> Self {
        Self {
            codec: codec.into(),
            bitrate: None,
            action: None,
        }
    }

    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = Some(bitrate.into());
        self
    }

    pub fn with_action(mut self, action: TranscodeAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn validate(&self) -> PolicyResult<()> {
        if self.codec.trim().is_empty() {
            return Err(PolicyError::invalid_policy("codec mapping: codec cannot be empty"));
        }
        if let Some(bitrate) = &self.bitrate {
            if let Some(action @ (TranscodeAction::Convert | TranscodeAction::Remove)) = self.action
            {
                return Err(PolicyError::invalid_policy(format!(
                    "codec mapping: bitrate is not applicable for action='{action}' \
                     (only valid for 'transcode')"
                )));
            }
            validate_bitrate(bitrate)?;
        }
        Ok(())
    }
}

/// Check a bitrate string such as `192k`, `1.5M` or `320000`.
pub fn validate_bitrate(bitrate: &str) -> PolicyResult<()> {
    let number = bitrate.strip_suffix(['k', 'K', 'm', 'M']).unwrap_or(bitrate);
    let (whole, fraction) = match number.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (number, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if digits(whole) && fraction.map_or(true, digits) {
        Ok(())
    } else {
        Err(PolicyError::invalid_policy(format!(
            "Invalid bitrate format '{bitrate}'. Expected format: '192k', '256k', '1.5M', etc."
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    pub target: ContainerTarget,
    #[serde(default)]
    pub on_incompatible_codec: IncompatibleCodecMode,
    /// Keyed by source codec name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub codec_mappings: BTreeMap<String, CodecTranscodeMapping>,
    #[serde(default = "default_true")]
    pub preserve_metadata: bool,
}

impl ContainerConfig {
    pub fn new(target: ContainerTarget) -> Self {
        Self {
            target,
            on_incompatible_codec: IncompatibleCodecMode::Error,
            codec_mappings: BTreeMap::new(),
            preserve_metadata: true,
        }
    }

    pub fn with_mode(mut self, mode: IncompatibleCodecMode) -> Self {
        self.on_incompatible_codec = mode;
        self
    }

    pub fn with_mapping(
        mut self,
        source_codec: impl Into<String>,
        mapping: CodecTranscodeMapping,
    ) -> Self {
        self.codec_mappings.insert(source_codec.into(), mapping);
        self
    }

    /// Mapping for a source codec, matched case-insensitively.
    pub fn mapping_for(&self, codec: &str) -> Option<&CodecTranscodeMapping> {
        let lowered = codec.to_lowercase();
        self.codec_mappings
            .iter()
            .find(|(k, _)| k.to_lowercase() == lowered)
            .map(|(_, v)| v)
    }
}

/// How transcription results feed back into the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionPolicyOptions {
    pub enabled: bool,
    pub update_language_from_transcription: bool,
    pub update_title_from_classification: bool,
    pub confidence_threshold: f64,
    pub detect_commentary: bool,
    pub reorder_commentary: bool,
}

impl Default for TranscriptionPolicyOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            update_language_from_transcription: false,
            update_title_from_classification: false,
            confidence_threshold: default_confidence_threshold(),
            detect_commentary: false,
            reorder_commentary: false,
        }
    }
}

/// Everything the evaluator needs from a policy, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPolicy {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Ordered audio language preference.
    #[serde(default = "default_languages")]
    pub audio_languages: Vec<String>,
    #[serde(default = "default_languages")]
    pub subtitle_languages: Vec<String>,
    #[serde(default = "default_commentary_patterns")]
    pub commentary_patterns: Vec<String>,
    #[serde(default = "TrackCategory::default_order")]
    pub track_order: Vec<TrackCategory>,
    #[serde(default)]
    pub default_flags: DefaultFlagsConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_audio: Option<AudioFilterConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_subtitles: Option<SubtitleFilterConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_attachments: Option<AttachmentFilterConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RulesConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<TranscriptionPolicyOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_actions: Option<TrackActionsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle_actions: Option<TrackActionsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_actions: Option<TrackActionsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_synthesis: Option<AudioSynthesisConfig>,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            schema_version: POLICY_SCHEMA_VERSION,
            audio_languages: default_languages(),
            subtitle_languages: default_languages(),
            commentary_patterns: default_commentary_patterns(),
            track_order: TrackCategory::default_order(),
            default_flags: DefaultFlagsConfig::default(),
            keep_audio: None,
            keep_subtitles: None,
            filter_attachments: None,
            container: None,
            rules: None,
            transcription: None,
            audio_actions: None,
            subtitle_actions: None,
            video_actions: None,
            audio_synthesis: None,
        }
    }
}

impl EvaluationPolicy {
    pub fn with_audio_languages<S: Into<String>>(
        mut self,
        languages: impl IntoIterator<Item = S>,
    ) -> Self {
        self.audio_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subtitle_languages<S: Into<String>>(
        mut self,
        languages: impl IntoIterator<Item = S>,
    ) -> Self {
        self.subtitle_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_flags(mut self, flags: DefaultFlagsConfig) -> Self {
        self.default_flags = flags;
        self
    }

    pub fn with_keep_audio(mut self, config: AudioFilterConfig) -> Self {
        self.keep_audio = Some(config);
        self
    }

    pub fn with_keep_subtitles(mut self, config: SubtitleFilterConfig) -> Self {
        self.keep_subtitles = Some(config);
        self
    }

    pub fn with_filter_attachments(mut self, config: AttachmentFilterConfig) -> Self {
        self.filter_attachments = Some(config);
        self
    }

    pub fn with_container(mut self, config: ContainerConfig) -> Self {
        self.container = Some(config);
        self
    }

    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_transcription(mut self, options: TranscriptionPolicyOptions) -> Self {
        self.transcription = Some(options);
        self
    }

    pub fn with_audio_synthesis(mut self, config: AudioSynthesisConfig) -> Self {
        self.audio_synthesis = Some(config);
        self
    }

    pub fn has_track_filtering(&self) -> bool {
        self.keep_audio.is_some()
            || self.keep_subtitles.is_some()
            || self.filter_attachments.is_some()
    }

    pub fn has_container_config(&self) -> bool {
        self.container.is_some()
    }

    pub fn has_rules(&self) -> bool {
        self.rules.as_ref().is_some_and(|r| !r.items.is_empty())
    }

    pub fn has_transcription_settings(&self) -> bool {
        self.transcription.is_some()
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> PolicyResult<()> {
        if self.audio_languages.is_empty() {
            return Err(PolicyError::invalid_policy("audio_languages cannot be empty"));
        }

        if let Some(audio) = &self.keep_audio {
            if audio.languages.is_empty() {
                return Err(PolicyError::invalid_policy("keep_audio.languages cannot be empty"));
            }
            if audio.minimum < 1 {
                return Err(PolicyError::invalid_policy("keep_audio.minimum must be at least 1"));
            }
        }

        if let Some(container) = &self.container {
            for (source, mapping) in &container.codec_mappings {
                mapping.validate().map_err(|e| {
                    PolicyError::invalid_policy(format!("container.codec_mappings.{source}: {e}"))
                })?;
            }
        }

        if let Some(t) = &self.transcription {
            if !(0.0..=1.0).contains(&t.confidence_threshold) {
                return Err(PolicyError::invalid_policy(
                    "transcription.confidence_threshold must be between 0.0 and 1.0",
                ));
            }
            if t.reorder_commentary && !t.detect_commentary {
                return Err(PolicyError::invalid_policy(
                    "transcription.reorder_commentary requires detect_commentary",
                ));
            }
        }

        if let Some(rules) = &self.rules {
            for rule in &rules.items {
                if rule.name.trim().is_empty() {
                    return Err(PolicyError::invalid_policy("rule name cannot be empty"));
                }
                let ctx = |msg: String| {
                    PolicyError::invalid_policy(format!("rule '{}': {msg}", rule.name))
                };
                validate_condition(&rule.when).map_err(ctx)?;
                let actions = rule
                    .then_actions
                    .iter()
                    .chain(rule.else_actions.iter().flatten());
                for action in actions {
                    validate_action(action).map_err(ctx)?;
                }
            }
        }

        if let Some(synthesis) = &self.audio_synthesis {
            for def in &synthesis.tracks {
                let ctx = |msg: String| {
                    PolicyError::invalid_policy(format!("audio_synthesis '{}': {msg}", def.name))
                };
                if def.name.trim().is_empty() {
                    return Err(PolicyError::invalid_policy(
                        "audio_synthesis track name cannot be empty",
                    ));
                }
                if def.target_channels() == 0 {
                    return Err(ctx("channels must be at least 1".into()));
                }
                if def.source.prefer.is_empty() {
                    return Err(ctx("source.prefer must have at least one criterion".into()));
                }
                if def.source.prefer.iter().any(|c| c.is_empty()) {
                    return Err(ctx("preference criterion must specify at least one of: \
                                    language, not_commentary, channels, codec"
                        .into()));
                }
                if let Some(bitrate) = &def.bitrate {
                    validate_bitrate(bitrate).map_err(|e| ctx(e.to_string()))?;
                }
                if let Some(condition) = &def.create_if {
                    validate_condition(condition).map_err(ctx)?;
                }
            }
        }

        Ok(())
    }
}

fn validate_condition(condition: &Condition) -> Result<(), String> {
    let mut error = None;
    condition.visit(&mut |c| {
        if error.is_some() {
            return;
        }
        error = match c {
            Condition::Exists(e) => validate_title(e.filters.title.as_ref()),
            Condition::Count(e) => validate_title(e.filters.title.as_ref()),
            Condition::And(items) | Condition::Or(items) if items.is_empty() => {
                Some("and/or needs at least one condition".to_string())
            }
            Condition::AudioIsMultiLanguage(m) if !(0.0..=1.0).contains(&m.threshold) => {
                Some("threshold must be between 0.0 and 1.0".to_string())
            }
            Condition::PluginMetadata(p) => {
                validate_metadata(&p.field, p.operator, p.value.as_ref()).or_else(|| {
                    p.plugin
                        .trim()
                        .is_empty()
                        .then(|| "plugin name cannot be empty".to_string())
                })
            }
            Condition::ContainerMetadata(m) => {
                validate_metadata(&m.field, m.operator, m.value.as_ref())
            }
            Condition::IsOriginal(c) | Condition::IsDubbed(c) | Condition::IsCommentary(c)
                if !(0.0..=1.0).contains(&c.min_confidence) =>
            {
                Some("min_confidence must be between 0.0 and 1.0".to_string())
            }
            _ => None,
        };
    });
    error.map_or(Ok(()), Err)
}

fn validate_title(title: Option<&TitleFilter>) -> Option<String> {
    let Some(TitleFilter::Match(m)) = title else {
        return None;
    };
    match (&m.contains, &m.regex) {
        (None, None) => Some("title match must specify either 'contains' or 'regex'".to_string()),
        (Some(_), Some(_)) => {
            Some("title match must specify only one of 'contains' or 'regex'".to_string())
        }
        (None, Some(re)) => Regex::new(re)
            .err()
            .map(|e| format!("invalid title regex: {e}")),
        (Some(_), None) => None,
    }
}

fn validate_metadata(
    field: &str,
    operator: super::conditions::MetadataOperator,
    value: Option<&crate::models::Scalar>,
) -> Option<String> {
    use super::conditions::MetadataOperator;

    if field.trim().is_empty() {
        return Some("field name cannot be empty".to_string());
    }
    if operator == MetadataOperator::Exists {
        return None;
    }
    match value {
        None | Some(crate::models::Scalar::Null) => Some(format!(
            "operator '{operator}' requires a value; use operator 'exists' to check presence"
        )),
        Some(v) if operator.is_numeric() && v.as_f64().is_none() => {
            Some(format!("operator '{operator}' requires a numeric value"))
        }
        _ => None,
    }
}

fn validate_action(action: &ConditionalAction) -> Result<(), String> {
    match action {
        ConditionalAction::SetLanguage(a) => match (&a.new_language, &a.from_plugin_metadata) {
            (None, None) => Err(
                "set_language must specify either 'new_language' or 'from_plugin_metadata'".into(),
            ),
            (Some(_), Some(_)) => Err(
                "set_language cannot specify both 'new_language' and 'from_plugin_metadata'".into(),
            ),
            _ => Ok(()),
        },
        ConditionalAction::SetContainerMetadata(a) => {
            if a.field.trim().is_empty() {
                return Err("set_container_metadata field cannot be empty".into());
            }
            match (&a.value, &a.from_plugin_metadata) {
                (None, None) => Err("set_container_metadata must specify either 'value' \
                                     or 'from_plugin_metadata'"
                    .into()),
                (Some(_), Some(_)) => Err("set_container_metadata cannot specify both 'value' \
                                          and 'from_plugin_metadata'"
                    .into()),
                _ => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::conditions::{MetadataOperator, TitleMatch, TrackFilters};
    use crate::policy::rules::{ConditionalRule, MatchMode, SetLanguageAction};
    use crate::models::TrackType;

    fn with_rule(rule: ConditionalRule) -> EvaluationPolicy {
        EvaluationPolicy::default().with_rules(RulesConfig::new(MatchMode::First, vec![rule]))
    }

    #[test]
    fn default_policy_is_valid() {
        let policy = EvaluationPolicy::default();
        assert_eq!(policy.schema_version, 13);
        assert!(!policy.has_track_filtering());
        assert!(!policy.has_rules());
        policy.validate().unwrap();
    }

    #[test]
    fn empty_audio_languages_rejected() {
        let policy = EvaluationPolicy::default().with_audio_languages(Vec::<String>::new());
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("audio_languages"));
    }

    #[test]
    fn reorder_commentary_requires_detection() {
        let policy = EvaluationPolicy::default().with_transcription(TranscriptionPolicyOptions {
            reorder_commentary: true,
            ..Default::default()
        });
        assert!(policy.validate().unwrap_err().to_string().contains("detect_commentary"));
    }

    #[test]
    fn confidence_threshold_range() {
        let policy = EvaluationPolicy::default().with_transcription(TranscriptionPolicyOptions {
            confidence_threshold: 1.5,
            ..Default::default()
        });
        assert!(policy.validate().is_err());
    }

    #[test]
    fn codec_mapping_bitrate_rules() {
        assert!(CodecTranscodeMapping::new("aac").with_bitrate("256k").validate().is_ok());
        assert!(CodecTranscodeMapping::new("aac").with_bitrate("1.5M").validate().is_ok());
        assert!(CodecTranscodeMapping::new("aac").with_bitrate("fast").validate().is_err());
        assert!(CodecTranscodeMapping::new("mov_text")
            .with_action(TranscodeAction::Convert)
            .with_bitrate("128k")
            .validate()
            .is_err());
        assert!(CodecTranscodeMapping::new(" ").validate().is_err());
    }

    #[test]
    fn mapping_lookup_is_case_insensitive() {
        let container = ContainerConfig::new(ContainerTarget::Mp4)
            .with_mapping("TrueHD", CodecTranscodeMapping::new("eac3"));
        assert!(container.mapping_for("truehd").is_some());
        assert!(container.mapping_for("dts").is_none());
    }

    #[test]
    fn rule_action_sources_are_exclusive() {
        let rule = ConditionalRule::new(
            "Retag",
            Condition::exists(TrackType::Audio, TrackFilters::default()),
            vec![ConditionalAction::SetLanguage(SetLanguageAction {
                track_type: TrackType::Audio,
                new_language: None,
                from_plugin_metadata: None,
                match_language: None,
            })],
        );
        let policy = with_rule(rule);
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("rule 'Retag'"));
    }

    #[test]
    fn metadata_numeric_operator_needs_number() {
        let rule = ConditionalRule::new(
            "Old",
            Condition::plugin_metadata("radarr", "year", MetadataOperator::Lt, Some("1990".into())),
            vec![ConditionalAction::Warn("old".into())],
        );
        let policy = with_rule(rule);
        assert!(policy.validate().unwrap_err().to_string().contains("numeric"));
    }

    #[test]
    fn invalid_title_regex_rejected() {
        let filters = TrackFilters {
            title: Some(TitleFilter::Match(TitleMatch {
                contains: None,
                regex: Some("(".into()),
            })),
            ..Default::default()
        };
        let rule = ConditionalRule::new(
            "Bad",
            Condition::exists(TrackType::Audio, filters),
            vec![ConditionalAction::Warn("x".into())],
        );
        let policy = with_rule(rule);
        assert!(policy.validate().unwrap_err().to_string().contains("regex"));
    }
}
