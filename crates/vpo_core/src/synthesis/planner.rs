//! Synthesis plan generation.
//!
//! Each definition resolves to either a [`SynthesisOperation`] or a
//! [`SkippedSynthesis`]. Checks run in a fixed order and the first one that
//! fails decides the skip reason.

use std::path::Path;

use super::downmix::{downmix_filter, validate_downmix};
use super::encoders::{encoder_for, resolve_bitrate, EncoderAvailability};
use super::selector::select_source_track;
use crate::evaluator::{evaluate_condition, EvaluationContext, PolicyResult};
use crate::matching::{languages_match, CommentaryMatcher};
use crate::models::{
    SkipReason, SkippedSynthesis, SynthesisOperation, SynthesisPlan, TrackInfo, TrackOrderEntry,
    TrackOrigin, TrackType,
};
use crate::policy::{
    EvaluationPolicy, Inheritable, PositionKeyword, SkipIfExists, SynthesisTrackDefinition,
    TrackPosition,
};

enum Resolution {
    Planned(SynthesisOperation),
    Skipped(SkippedSynthesis),
}

fn skipped(
    definition: &SynthesisTrackDefinition,
    reason: SkipReason,
    details: String,
) -> Resolution {
    Resolution::Skipped(SkippedSynthesis {
        definition_name: definition.name.clone(),
        reason,
        details,
    })
}

/// First audio track satisfying every set criterion, with a description.
fn find_existing(
    criteria: &SkipIfExists,
    audio_tracks: &[&TrackInfo],
    matcher: &CommentaryMatcher,
) -> Option<String> {
    let track = audio_tracks.iter().find(|track| {
        let codec_ok = criteria.codec.as_ref().map_or(true, |codecs| {
            track
                .codec
                .as_deref()
                .is_some_and(|c| codecs.iter().any(|want| want.eq_ignore_ascii_case(c)))
        });
        let channels_ok = criteria
            .channels
            .as_ref()
            .map_or(true, |filter| filter.matches(track.channels));
        let language_ok = criteria.language.as_ref().map_or(true, |languages| {
            track
                .language
                .as_deref()
                .is_some_and(|l| languages.iter().any(|want| languages_match(l, want)))
        });
        let commentary_ok =
            criteria.not_commentary != Some(true) || !matcher.is_commentary(track.title.as_deref());
        codec_ok && channels_ok && language_ok && commentary_ok
    })?;

    let mut parts = Vec::new();
    if criteria.codec.is_some() {
        parts.push(format!("codec={}", track.codec.as_deref().unwrap_or_default()));
    }
    if criteria.channels.is_some() {
        parts.push(format!("channels={}", track.channels.unwrap_or_default()));
    }
    if criteria.language.is_some() {
        parts.push(format!("language={}", track.language.as_deref().unwrap_or_default()));
    }
    if criteria.not_commentary == Some(true) {
        parts.push("not_commentary".to_string());
    }
    tracing::debug!("skip_if_exists matched: track {} ({})", track.index, parts.join(", "));
    Some(format!(
        "Track {} matches skip_if_exists criteria ({})",
        track.index,
        parts.join(", ")
    ))
}

/// 0-based insertion point among audio tracks.
fn resolve_position(
    position: TrackPosition,
    source_index: u32,
    audio_tracks: &[&TrackInfo],
    planned: usize,
) -> usize {
    match position {
        TrackPosition::Index(n) => (n as usize).saturating_sub(1),
        TrackPosition::Keyword(PositionKeyword::AfterSource) => audio_tracks
            .iter()
            .position(|t| t.index == source_index)
            .map_or(audio_tracks.len() + planned, |i| i + 1 + planned),
        TrackPosition::Keyword(PositionKeyword::End) => audio_tracks.len() + planned,
    }
}

fn resolve_definition(
    definition: &SynthesisTrackDefinition,
    context: &EvaluationContext<'_>,
    audio_tracks: &[&TrackInfo],
    encoders: &dyn EncoderAvailability,
    planned: usize,
) -> PolicyResult<Resolution> {
    let matcher = context.commentary_matcher();

    if let Some(criteria) = &definition.skip_if_exists {
        if let Some(details) = find_existing(criteria, audio_tracks, matcher) {
            return Ok(skipped(definition, SkipReason::AlreadyExists, details));
        }
    }

    if let Some(condition) = &definition.create_if {
        let (matched, reason) = evaluate_condition(condition, context);
        tracing::debug!(
            "create_if condition for '{}': {} ({})",
            definition.name,
            matched,
            reason
        );
        if !matched {
            return Ok(skipped(
                definition,
                SkipReason::ConditionNotMet,
                format!("Condition not satisfied: {reason}"),
            ));
        }
    }

    let encoder = encoder_for(definition.codec);
    if !encoders.is_available(encoder) {
        return Ok(skipped(
            definition,
            SkipReason::EncoderUnavailable,
            format!("FFmpeg encoder for {} not available", definition.codec),
        ));
    }

    let Some(source) = select_source_track(audio_tracks, &definition.source, matcher) else {
        return Ok(skipped(
            definition,
            SkipReason::NoSourceAvailable,
            "No audio tracks available".to_string(),
        ));
    };

    let source_channels = source.track_info.channels.unwrap_or(2);
    let target_channels = definition.target_channels();
    if let Err(rejected) = validate_downmix(source_channels, target_channels) {
        return Ok(skipped(definition, SkipReason::WouldUpmix, rejected.to_string()));
    }

    let target_bitrate =
        resolve_bitrate(definition.codec, target_channels, definition.bitrate.as_deref())?;

    let target_title = match &definition.title {
        Inheritable::Inherit => source.track_info.title.clone().unwrap_or_default(),
        Inheritable::Value(title) => title.clone(),
    };
    let target_language = match &definition.language {
        Inheritable::Inherit => source.track_info.language_or_und().to_string(),
        Inheritable::Value(language) => language.clone(),
    };
    let target_position =
        resolve_position(definition.position, source.track_index, audio_tracks, planned);

    Ok(Resolution::Planned(SynthesisOperation {
        definition_name: definition.name.clone(),
        downmix_filter: downmix_filter(source_channels, target_channels),
        source_track: source,
        target_codec: definition.codec,
        target_channels,
        target_bitrate,
        target_title,
        target_language,
        target_position,
    }))
}

/// Projected audio order once every operation has been inserted.
fn build_final_track_order(
    audio_tracks: &[&TrackInfo],
    operations: &[SynthesisOperation],
) -> Vec<TrackOrderEntry> {
    let mut entries: Vec<TrackOrderEntry> = audio_tracks
        .iter()
        .enumerate()
        .map(|(i, track)| TrackOrderEntry {
            index: i,
            origin: TrackOrigin::Original,
            codec: track.codec.clone().unwrap_or_else(|| "unknown".to_string()),
            channels: track.channels.unwrap_or(2),
            language: track.language_or_und().to_string(),
            title: track.title.clone(),
            original_index: Some(track.index),
            synthesis_name: None,
        })
        .collect();

    for op in operations {
        let position = op.target_position.min(entries.len());
        entries.insert(
            position,
            TrackOrderEntry {
                index: position,
                origin: TrackOrigin::Synthesized,
                codec: op.target_codec.name().to_string(),
                channels: op.target_channels,
                language: op.target_language.clone(),
                title: Some(op.target_title.clone()).filter(|t| !t.is_empty()),
                original_index: None,
                synthesis_name: Some(op.definition_name.clone()),
            },
        );
    }

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.index = i;
    }
    entries
}

/// Plan every synthesis definition of the policy's `audio_synthesis` section.
///
/// `create_if` conditions see the same signals as conditional rules through
/// `context`. Commentary detection always follows `policy.commentary_patterns`,
/// whatever matcher `context` carries. Only an unparseable explicit bitrate
/// is an error; every other obstacle becomes a [`SkippedSynthesis`].
pub fn plan_synthesis(
    file_id: &str,
    file_path: &Path,
    policy: &EvaluationPolicy,
    context: &EvaluationContext<'_>,
    encoders: &dyn EncoderAvailability,
) -> PolicyResult<SynthesisPlan> {
    let context = context
        .clone()
        .with_commentary_matcher(CommentaryMatcher::new(&policy.commentary_patterns));
    let audio_tracks: Vec<&TrackInfo> = context
        .tracks
        .iter()
        .filter(|t| t.track_type == TrackType::Audio)
        .collect();
    let definitions = policy
        .audio_synthesis
        .as_ref()
        .map(|config| config.tracks.as_slice())
        .unwrap_or_default();

    let mut operations = Vec::new();
    let mut skipped_defs = Vec::new();

    for definition in definitions {
        let planned = operations.len();
        match resolve_definition(definition, &context, &audio_tracks, encoders, planned)? {
            Resolution::Planned(op) => {
                tracing::info!(
                    "Planned synthesis '{}': {} {}ch from track {}",
                    op.definition_name,
                    op.target_codec,
                    op.target_channels,
                    op.source_track.track_index
                );
                operations.push(op);
            }
            Resolution::Skipped(skip) => {
                tracing::info!(
                    "Skipped synthesis '{}': {} - {}",
                    skip.definition_name,
                    skip.reason.display(),
                    skip.details
                );
                skipped_defs.push(skip);
            }
        }
    }

    let final_track_order = build_final_track_order(&audio_tracks, &operations);

    Ok(SynthesisPlan {
        file_id: file_id.to_string(),
        file_path: file_path.display().to_string(),
        operations,
        skipped: skipped_defs,
        final_track_order,
        audio_tracks: audio_tracks.into_iter().cloned().collect(),
    })
}
