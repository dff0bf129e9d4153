//! Condition evaluation for conditional rules and synthesis `create_if`.
//!
//! Every evaluation returns `(matched, reason)`; the reason strings end up
//! in the rule evaluation trace.

use regex::RegexBuilder;

use crate::matching::{languages_match, CommentaryMatcher};
use crate::models::{
    ClassificationResults, CommentaryStatus, ContainerTags, LanguageClassification,
    LanguageResults, OriginalDubbedStatus, PluginMetadata, Scalar, TrackClassificationResult,
    TrackInfo, TrackType,
};
use crate::policy::{
    AudioIsMultiLanguageCondition, ClassificationCondition, Condition, ContainerMetadataCondition,
    CountCondition, EvaluationPolicy, ExistsCondition, MetadataOperator, PluginMetadataCondition,
    TitleFilter, TrackFilters,
};

/// Everything a condition can look at for one file.
#[derive(Clone)]
pub struct EvaluationContext<'a> {
    pub tracks: &'a [TrackInfo],
    pub language_results: Option<&'a LanguageResults>,
    pub plugin_metadata: Option<&'a PluginMetadata>,
    pub classification_results: Option<&'a ClassificationResults>,
    pub container_tags: Option<&'a ContainerTags>,
    matcher: CommentaryMatcher,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(tracks: &'a [TrackInfo]) -> Self {
        Self {
            tracks,
            language_results: None,
            plugin_metadata: None,
            classification_results: None,
            container_tags: None,
            matcher: CommentaryMatcher::with_defaults(),
        }
    }

    /// Context whose `not_commentary` filters use the policy's patterns.
    pub fn for_policy(tracks: &'a [TrackInfo], policy: &EvaluationPolicy) -> Self {
        let matcher = CommentaryMatcher::new(&policy.commentary_patterns);
        Self::new(tracks).with_commentary_matcher(matcher)
    }

    pub fn with_language_results(mut self, results: Option<&'a LanguageResults>) -> Self {
        self.language_results = results;
        self
    }

    pub fn with_plugin_metadata(mut self, metadata: Option<&'a PluginMetadata>) -> Self {
        self.plugin_metadata = metadata;
        self
    }

    pub fn with_classification_results(
        mut self,
        results: Option<&'a ClassificationResults>,
    ) -> Self {
        self.classification_results = results;
        self
    }

    pub fn with_container_tags(mut self, tags: Option<&'a ContainerTags>) -> Self {
        self.container_tags = tags;
        self
    }

    pub fn with_commentary_matcher(mut self, matcher: CommentaryMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Commentary matcher used by `not_commentary` filters.
    pub fn commentary_matcher(&self) -> &CommentaryMatcher {
        &self.matcher
    }
}

fn title_matches(actual: Option<&str>, filter: &TitleFilter) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let lowered = actual.to_lowercase();
    match filter {
        TitleFilter::Contains(needle) => lowered.contains(&needle.to_lowercase()),
        TitleFilter::Match(m) => {
            if let Some(needle) = &m.contains {
                return lowered.contains(&needle.to_lowercase());
            }
            match &m.regex {
                Some(pattern) => RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| re.is_match(actual))
                    .unwrap_or(false),
                None => false,
            }
        }
    }
}

/// Does `track` satisfy every filter that is set?
///
/// Numeric filters never match a track that lacks the field, and a
/// language filter never matches a track without a language tag.
pub fn matches_track(
    track: &TrackInfo,
    filters: &TrackFilters,
    matcher: &CommentaryMatcher,
) -> bool {
    if let Some(languages) = &filters.language {
        let Some(language) = track.language.as_deref() else {
            return false;
        };
        if !languages.iter().any(|l| languages_match(language, l)) {
            return false;
        }
    }

    if let Some(codecs) = &filters.codec {
        let Some(codec) = track.codec.as_deref() else {
            return false;
        };
        if !codecs.iter().any(|c| c.eq_ignore_ascii_case(codec)) {
            return false;
        }
    }

    if filters.is_default.is_some_and(|v| v != track.is_default) {
        return false;
    }
    if filters.is_forced.is_some_and(|v| v != track.is_forced) {
        return false;
    }

    let numeric = [
        (&filters.channels, track.channels),
        (&filters.width, track.width),
        (&filters.height, track.height),
    ];
    for (filter, actual) in numeric {
        if let Some(filter) = filter {
            if !filter.matches(actual) {
                return false;
            }
        }
    }

    if let Some(title) = &filters.title {
        if !title_matches(track.title.as_deref(), title) {
            return false;
        }
    }

    if filters.not_commentary == Some(true) && matcher.is_commentary(track.title.as_deref()) {
        return false;
    }

    true
}

fn evaluate_exists(condition: &ExistsCondition, ctx: &EvaluationContext<'_>) -> (bool, String) {
    let track_type = condition.track_type;
    let first = ctx
        .tracks
        .iter()
        .find(|t| t.track_type == track_type && matches_track(t, &condition.filters, &ctx.matcher));

    match first {
        Some(track) => {
            let mut reason = format!("exists({track_type}) → True (track[{}]", track.index);
            if let Some(codec) = &track.codec {
                reason.push(' ');
                reason.push_str(codec);
            }
            if let Some(language) = &track.language {
                reason.push(' ');
                reason.push_str(language);
            }
            reason.push(')');
            (true, reason)
        }
        None => (false, format!("exists({track_type}) → False (no matching tracks)")),
    }
}

fn evaluate_count(condition: &CountCondition, ctx: &EvaluationContext<'_>) -> (bool, String) {
    let count = ctx
        .tracks
        .iter()
        .filter(|t| {
            t.track_type == condition.track_type
                && matches_track(t, &condition.filters, &ctx.matcher)
        })
        .count();
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let result = condition.comparison.matches(count);
    let reason = format!(
        "count({}) {} {} → {} (count={count})",
        condition.track_type,
        condition.comparison.operator,
        condition.comparison.value,
        py_bool(result)
    );
    (result, reason)
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn evaluate_multi_language(
    condition: &AudioIsMultiLanguageCondition,
    ctx: &EvaluationContext<'_>,
) -> (bool, String) {
    const NAME: &str = "audio_is_multi_language";
    let Some(results) = ctx.language_results.filter(|r| !r.is_empty()) else {
        return (false, format!("{NAME} → False (no language analysis available)"));
    };

    let audio: Vec<&TrackInfo> = ctx
        .tracks
        .iter()
        .filter(|t| t.track_type == TrackType::Audio)
        .collect();
    let candidates: Vec<&TrackInfo> = match condition.track_index {
        Some(index) => match audio.iter().find(|t| t.index == index) {
            Some(track) => vec![*track],
            None => return (false, format!("{NAME} → False (track {index} not found)")),
        },
        None => audio,
    };

    for track in &candidates {
        let Some(result) = track.id.and_then(|id| results.get(&id)) else {
            continue;
        };
        if result.classification != LanguageClassification::MultiLanguage {
            continue;
        }
        if let Some(primary) = &condition.primary_language {
            if !languages_match(&result.primary_language, primary) {
                continue;
            }
        }
        if result
            .secondary_languages
            .iter()
            .any(|s| s.percentage >= condition.threshold)
        {
            let reason = format!(
                "{NAME} → True (track[{}] {} {:.0}%, secondary above {:.0}%)",
                track.index,
                result.primary_language,
                result.primary_percentage * 100.0,
                condition.threshold * 100.0
            );
            return (true, reason);
        }
    }

    match condition.track_index {
        Some(index) => (false, format!("{NAME} → False (track {index} not multi-language)")),
        None => (false, format!("{NAME} → False (no multi-language audio tracks)")),
    }
}

/// Which classification field a condition inspects.
#[derive(Clone, Copy)]
enum ClassificationTarget {
    Original,
    Dubbed,
    Commentary,
}

impl ClassificationTarget {
    fn condition_name(self) -> &'static str {
        match self {
            Self::Original => "is_original",
            Self::Dubbed => "is_dubbed",
            Self::Commentary => "is_commentary",
        }
    }

    fn status_name(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Dubbed => "dubbed",
            Self::Commentary => "commentary",
        }
    }

    /// The track's status name and whether it equals the target.
    fn status(self, result: &TrackClassificationResult) -> (&'static str, bool) {
        match self {
            Self::Original => (
                result.original_dubbed_status.name(),
                result.original_dubbed_status == OriginalDubbedStatus::Original,
            ),
            Self::Dubbed => (
                result.original_dubbed_status.name(),
                result.original_dubbed_status == OriginalDubbedStatus::Dubbed,
            ),
            Self::Commentary => (
                result.commentary_status.name(),
                result.commentary_status == CommentaryStatus::Commentary,
            ),
        }
    }
}

fn evaluate_classification(
    condition: &ClassificationCondition,
    target: ClassificationTarget,
    ctx: &EvaluationContext<'_>,
) -> (bool, String) {
    let name = target.condition_name();
    let Some(results) = ctx.classification_results.filter(|r| !r.is_empty()) else {
        return (false, format!("{name} → False (no classification results available)"));
    };

    for track in ctx.tracks.iter().filter(|t| t.track_type == TrackType::Audio) {
        let Some(result) = track.id.and_then(|id| results.get(&id)) else {
            continue;
        };
        if result.confidence < condition.min_confidence {
            continue;
        }
        if let Some(language) = &condition.language {
            match &result.language {
                Some(actual) if languages_match(actual, language) => {}
                _ => continue,
            }
        }
        let (status, is_target) = target.status(result);
        if condition.value == is_target {
            let reason = format!(
                "{name} → True (track[{}] is {status}, confidence={:.0}%)",
                track.index,
                result.confidence * 100.0
            );
            return (true, reason);
        }
    }

    let negation = if condition.value { "" } else { "not " };
    (
        false,
        format!("{name} → False (no {negation}{} tracks found)", target.status_name()),
    )
}

/// Shared operator semantics for plugin and container metadata.
fn compare_scalar(
    label: &str,
    operator: MetadataOperator,
    actual: &Scalar,
    expected: Option<&Scalar>,
) -> (bool, String) {
    if operator == MetadataOperator::Exists {
        return (true, format!("{label} exists → True"));
    }
    if actual.is_null() {
        return (false, format!("{label} → False (field value is null)"));
    }
    let expected = expected.cloned().unwrap_or(Scalar::Null);

    let result = match operator {
        MetadataOperator::Eq | MetadataOperator::Neq => {
            let equal = match (actual.as_str(), expected.as_str()) {
                (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
                _ => actual.loose_eq(&expected),
            };
            if operator == MetadataOperator::Eq {
                equal
            } else {
                !equal
            }
        }
        MetadataOperator::Contains => actual
            .to_string()
            .to_lowercase()
            .contains(&expected.to_string().to_lowercase()),
        MetadataOperator::Lt
        | MetadataOperator::Lte
        | MetadataOperator::Gt
        | MetadataOperator::Gte => match (actual.as_f64(), expected.as_f64()) {
            (Some(a), Some(b)) => compare_numbers(operator, a, b),
            _ => false,
        },
        MetadataOperator::Exists => true,
    };

    let reason = format!(
        "{label} {operator} {} → {} (actual={})",
        expected.repr(),
        py_bool(result),
        actual.repr()
    );
    (result, reason)
}

fn compare_numbers(operator: MetadataOperator, actual: f64, expected: f64) -> bool {
    match operator {
        MetadataOperator::Lt => actual < expected,
        MetadataOperator::Lte => actual <= expected,
        MetadataOperator::Gt => actual > expected,
        MetadataOperator::Gte => actual >= expected,
        _ => false,
    }
}

fn evaluate_plugin_metadata(
    condition: &PluginMetadataCondition,
    ctx: &EvaluationContext<'_>,
) -> (bool, String) {
    let label = format!("plugin_metadata({}.{})", condition.plugin, condition.field);
    let Some(metadata) = ctx.plugin_metadata.filter(|m| !m.is_empty()) else {
        return (false, format!("{label} → False (no plugin metadata available)"));
    };
    if metadata.plugin(&condition.plugin).is_none() {
        return (
            false,
            format!("{label} → False (plugin '{}' not in metadata)", condition.plugin),
        );
    }
    let Some(actual) = metadata.get(&condition.plugin, &condition.field) else {
        return (
            false,
            format!("{label} → False (field '{}' not found)", condition.field),
        );
    };
    compare_scalar(&label, condition.operator, actual, condition.value.as_ref())
}

fn evaluate_container_metadata(
    condition: &ContainerMetadataCondition,
    ctx: &EvaluationContext<'_>,
) -> (bool, String) {
    let field = condition.field.to_lowercase();
    let label = format!("container_metadata({field})");
    let Some(tags) = ctx.container_tags.filter(|t| !t.is_empty()) else {
        return (false, format!("{label} → False (no container tags available)"));
    };
    let Some(raw) = tags.get(&field) else {
        return (false, format!("{label} → False (tag '{field}' not found)"));
    };

    if condition.operator.is_numeric() {
        let expected = condition.value.clone().unwrap_or(Scalar::Null);
        let Ok(actual) = raw.trim().parse::<f64>() else {
            return (
                false,
                format!(
                    "{label} {} {} → False (actual={raw:?} is not numeric)",
                    condition.operator,
                    expected.repr()
                ),
            );
        };
        return compare_scalar(&label, condition.operator, &Scalar::Float(actual), Some(&expected));
    }

    let actual = Scalar::String(raw.clone());
    compare_scalar(&label, condition.operator, &actual, condition.value.as_ref())
}

/// Evaluate a condition tree against one file.
pub fn evaluate_condition(condition: &Condition, ctx: &EvaluationContext<'_>) -> (bool, String) {
    match condition {
        Condition::Exists(c) => evaluate_exists(c, ctx),
        Condition::Count(c) => evaluate_count(c, ctx),
        Condition::AudioIsMultiLanguage(c) => evaluate_multi_language(c, ctx),
        Condition::PluginMetadata(c) => evaluate_plugin_metadata(c, ctx),
        Condition::ContainerMetadata(c) => evaluate_container_metadata(c, ctx),
        Condition::IsOriginal(c) => evaluate_classification(c, ClassificationTarget::Original, ctx),
        Condition::IsDubbed(c) => evaluate_classification(c, ClassificationTarget::Dubbed, ctx),
        Condition::IsCommentary(c) => {
            evaluate_classification(c, ClassificationTarget::Commentary, ctx)
        }
        Condition::And(conditions) => {
            for sub in conditions {
                let (result, reason) = evaluate_condition(sub, ctx);
                if !result {
                    return (false, format!("and → False ({reason})"));
                }
            }
            (true, format!("and → True ({} conditions)", conditions.len()))
        }
        Condition::Or(conditions) => {
            for sub in conditions {
                let (result, reason) = evaluate_condition(sub, ctx);
                if result {
                    return (true, format!("or → True ({reason})"));
                }
            }
            (
                false,
                format!("or → False ({} conditions failed)", conditions.len()),
            )
        }
        Condition::Not(inner) => {
            let (result, reason) = evaluate_condition(inner, ctx);
            (!result, format!("not({reason}) → {}", py_bool(!result)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LanguageAnalysisResult, TrackClassificationResult};
    use crate::policy::{
        ClassificationCondition, Comparison, ComparisonOperator, NumericFilter, TitleMatch,
    };

    fn tracks() -> Vec<TrackInfo> {
        vec![
            TrackInfo::video(0, "hevc").with_resolution(3840, 2160),
            TrackInfo::audio(1, "truehd", "eng").with_channels(8).with_id(11),
            TrackInfo::audio(2, "aac", "jpn").with_channels(2).with_id(12),
            TrackInfo::audio(3, "aac", "eng").with_title("Director's Commentary").with_id(13),
            TrackInfo::subtitle(4, "subrip", "eng").with_forced(true),
        ]
    }

    fn audio_in(language: &str) -> Condition {
        Condition::exists(TrackType::Audio, TrackFilters::default().with_language(language))
    }

    #[test]
    fn exists_reports_first_match() {
        let tracks = tracks();
        let ctx = EvaluationContext::new(&tracks);
        let condition = audio_in("jpn");
        assert_eq!(
            evaluate_condition(&condition, &ctx),
            (true, "exists(audio) → True (track[2] aac jpn)".to_string())
        );

        let condition = audio_in("fre");
        assert_eq!(
            evaluate_condition(&condition, &ctx),
            (false, "exists(audio) → False (no matching tracks)".to_string())
        );
    }

    #[test]
    fn numeric_and_title_filters() {
        let tracks = tracks();
        let m = CommentaryMatcher::with_defaults();
        let surround = TrackFilters::default().with_channels(NumericFilter::Compare(Comparison::new(
            ComparisonOperator::Gte,
            6,
        )));
        assert!(matches_track(&tracks[1], &surround, &m));
        assert!(!matches_track(&tracks[2], &surround, &m));
        assert!(!matches_track(&tracks[0], &surround, &m));

        let uhd = TrackFilters {
            width: Some(NumericFilter::Exact(3840)),
            ..Default::default()
        };
        assert!(matches_track(&tracks[0], &uhd, &m));

        let regex = TrackFilters {
            title: Some(TitleFilter::Match(TitleMatch {
                contains: None,
                regex: Some("^director".into()),
            })),
            ..Default::default()
        };
        assert!(matches_track(&tracks[3], &regex, &m));
        assert!(!matches_track(&tracks[1], &regex, &m));

        let main = TrackFilters::default().with_not_commentary();
        assert!(!matches_track(&tracks[3], &main, &m));
        assert!(matches_track(&tracks[2], &main, &m));
    }

    #[test]
    fn codec_filter_is_case_insensitive() {
        let track = TrackInfo::audio(1, "TrueHD", "eng");
        let filters = TrackFilters::default().with_codec("truehd");
        assert!(matches_track(&track, &filters, &CommentaryMatcher::with_defaults()));
    }

    #[test]
    fn count_reason() {
        let tracks = tracks();
        let ctx = EvaluationContext::new(&tracks);
        let condition = Condition::count(
            TrackType::Audio,
            TrackFilters::default(),
            Comparison::new(ComparisonOperator::Gte, 2),
        );
        assert_eq!(
            evaluate_condition(&condition, &ctx),
            (true, "count(audio) gte 2 → True (count=3)".to_string())
        );
    }

    #[test]
    fn boolean_combinators() {
        let tracks = tracks();
        let ctx = EvaluationContext::new(&tracks);
        let has_jpn = audio_in("jpn");
        let has_fre = audio_in("fre");

        let both = Condition::And(vec![has_jpn.clone(), has_fre.clone()]);
        let (result, reason) = evaluate_condition(&both, &ctx);
        assert!(!result);
        assert!(reason.starts_with("and → False (exists(audio) → False"));

        let either = Condition::Or(vec![has_fre.clone(), has_jpn]);
        let (result, reason) = evaluate_condition(&either, &ctx);
        assert!(result);
        assert!(reason.starts_with("or → True (exists(audio) → True"));

        let (result, reason) = evaluate_condition(&Condition::Not(Box::new(has_fre)), &ctx);
        assert!(result);
        assert!(reason.ends_with(") → True"));
    }

    #[test]
    fn plugin_metadata_operators() {
        let tracks = tracks();
        let metadata = PluginMetadata::new()
            .with_field("Radarr", "original_language", "JPN")
            .with_field("radarr", "year", 1999_i64)
            .with_field("radarr", "studio", Scalar::Null);
        let ctx = EvaluationContext::new(&tracks).with_plugin_metadata(Some(&metadata));

        let radarr = |field: &str, operator, value: Option<Scalar>| {
            Condition::plugin_metadata("radarr", field, operator, value)
        };

        let eq = radarr("Original_Language", MetadataOperator::Eq, Some("jpn".into()));
        let (matched, reason) = evaluate_condition(&eq, &ctx);
        assert!(matched);
        assert_eq!(
            reason,
            "plugin_metadata(radarr.Original_Language) eq \"jpn\" → True (actual=\"JPN\")"
        );

        let lt = radarr("year", MetadataOperator::Lt, Some(2000_i64.into()));
        assert!(evaluate_condition(&lt, &ctx).0);

        let lt_text = radarr("original_language", MetadataOperator::Lt, Some(5_i64.into()));
        assert!(!evaluate_condition(&lt_text, &ctx).0);

        let null = radarr("studio", MetadataOperator::Eq, Some("x".into()));
        assert_eq!(
            evaluate_condition(&null, &ctx).1,
            "plugin_metadata(radarr.studio) → False (field value is null)"
        );

        let missing =
            Condition::plugin_metadata("sonarr", "tvdb_id", MetadataOperator::Exists, None);
        assert_eq!(
            evaluate_condition(&missing, &ctx).1,
            "plugin_metadata(sonarr.tvdb_id) → False (plugin 'sonarr' not in metadata)"
        );

        let ctx = EvaluationContext::new(&tracks);
        assert_eq!(
            evaluate_condition(&eq, &ctx).1,
            "plugin_metadata(radarr.Original_Language) → False (no plugin metadata available)"
        );
    }

    #[test]
    fn container_metadata_numeric_fails_closed() {
        let tracks = tracks();
        let tags = ContainerTags::from([
            ("title".to_string(), "Movie".to_string()),
            ("year".to_string(), "2001".to_string()),
        ]);
        let ctx = EvaluationContext::new(&tracks).with_container_tags(Some(&tags));

        let year =
            Condition::container_metadata("YEAR", MetadataOperator::Gt, Some(2000_i64.into()));
        assert!(evaluate_condition(&year, &ctx).0);

        let title =
            Condition::container_metadata("title", MetadataOperator::Gt, Some(1_i64.into()));
        let (result, reason) = evaluate_condition(&title, &ctx);
        assert!(!result);
        assert!(reason.ends_with("is not numeric)"));

        let contains =
            Condition::container_metadata("title", MetadataOperator::Contains, Some("mov".into()));
        assert!(evaluate_condition(&contains, &ctx).0);

        let absent = Condition::container_metadata("encoder", MetadataOperator::Exists, None);
        assert_eq!(
            evaluate_condition(&absent, &ctx).1,
            "container_metadata(encoder) → False (tag 'encoder' not found)"
        );
    }

    #[test]
    fn multi_language_detection() {
        let tracks = tracks();
        let results = LanguageResults::from([
            (11, LanguageAnalysisResult::multi("eng", vec![("fre".into(), 0.1)])),
            (12, LanguageAnalysisResult::single("jpn")),
        ]);
        let ctx = EvaluationContext::new(&tracks).with_language_results(Some(&results));

        let any = Condition::AudioIsMultiLanguage(AudioIsMultiLanguageCondition::default());
        let (matched, reason) = evaluate_condition(&any, &ctx);
        assert!(matched);
        assert_eq!(
            reason,
            "audio_is_multi_language → True (track[1] eng 90%, secondary above 5%)"
        );

        let jpn_only = Condition::AudioIsMultiLanguage(AudioIsMultiLanguageCondition {
            track_index: Some(2),
            ..Default::default()
        });
        assert_eq!(
            evaluate_condition(&jpn_only, &ctx).1,
            "audio_is_multi_language → False (track 2 not multi-language)"
        );

        let missing = Condition::AudioIsMultiLanguage(AudioIsMultiLanguageCondition {
            track_index: Some(9),
            ..Default::default()
        });
        assert_eq!(
            evaluate_condition(&missing, &ctx).1,
            "audio_is_multi_language → False (track 9 not found)"
        );
    }

    #[test]
    fn classification_conditions() {
        let tracks = tracks();
        let results = ClassificationResults::from([
            (
                11,
                TrackClassificationResult::new(OriginalDubbedStatus::Dubbed, 0.9)
                    .with_language("eng"),
            ),
            (
                12,
                TrackClassificationResult::new(OriginalDubbedStatus::Original, 0.95)
                    .with_language("jpn"),
            ),
            (
                13,
                TrackClassificationResult::new(OriginalDubbedStatus::Unknown, 0.8)
                    .with_commentary_status(CommentaryStatus::Commentary),
            ),
        ]);
        let ctx = EvaluationContext::new(&tracks).with_classification_results(Some(&results));

        let original = Condition::IsOriginal(ClassificationCondition::default());
        assert_eq!(
            evaluate_condition(&original, &ctx),
            (true, "is_original → True (track[2] is original, confidence=95%)".to_string())
        );

        let dubbed_jpn = Condition::IsDubbed(ClassificationCondition {
            language: Some("jpn".into()),
            ..Default::default()
        });
        assert_eq!(
            evaluate_condition(&dubbed_jpn, &ctx).1,
            "is_dubbed → False (no dubbed tracks found)"
        );

        let commentary = Condition::IsCommentary(ClassificationCondition::default());
        assert!(evaluate_condition(&commentary, &ctx).0);

        let strict = Condition::IsOriginal(ClassificationCondition {
            min_confidence: 0.99,
            ..Default::default()
        });
        assert!(!evaluate_condition(&strict, &ctx).0);

        let empty = EvaluationContext::new(&tracks);
        assert_eq!(
            evaluate_condition(&original, &empty).1,
            "is_original → False (no classification results available)"
        );
    }
}
