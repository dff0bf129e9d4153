//! Desired track order and default flags.

use std::collections::BTreeMap;

use super::classification::{classify_track, language_preference_index};
use crate::matching::{audio_codec_matches, languages_match, CommentaryMatcher};
use crate::models::{TrackCategory, TrackInfo, TrackType, TranscriptionMap};
use crate::policy::EvaluationPolicy;

/// Secondary sort key for tracks that are not language-ranked.
const UNRANKED: usize = 999;

/// Track indices in the order the policy wants them.
///
/// Sorted by category position in `track_order`, then language preference
/// (main audio and main subtitles only), then original index.
pub fn compute_desired_order(
    tracks: &[TrackInfo],
    policy: &EvaluationPolicy,
    matcher: &CommentaryMatcher,
    transcription: Option<&TranscriptionMap>,
) -> Vec<u32> {
    let mut keyed: Vec<((usize, usize, u32), u32)> = tracks
        .iter()
        .map(|track| {
            let category = classify_track(track, policy, matcher, transcription);
            let primary = policy
                .track_order
                .iter()
                .position(|c| *c == category)
                .unwrap_or(policy.track_order.len());
            let language = track.language_or_und();
            let secondary = match category {
                TrackCategory::AudioMain => {
                    language_preference_index(language, &policy.audio_languages)
                }
                TrackCategory::SubtitleMain => {
                    language_preference_index(language, &policy.subtitle_languages)
                }
                _ => UNRANKED,
            };
            ((primary, secondary, track.index), track.index)
        })
        .collect();

    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, index)| index).collect()
}

/// The track that should carry the default flag among `tracks`.
///
/// Commentary is skipped unless every track is commentary, in which case the
/// first track wins. Within the first preferred language that has a match,
/// `preferred_codecs` (audio only) ranks candidates before falling back to
/// the earliest one.
pub fn find_preferred_track<'a>(
    tracks: &[&'a TrackInfo],
    language_preference: &[String],
    matcher: &CommentaryMatcher,
    preferred_codecs: Option<&[String]>,
) -> Option<&'a TrackInfo> {
    let non_commentary: Vec<&TrackInfo> = tracks
        .iter()
        .copied()
        .filter(|t| !matcher.is_commentary(t.title.as_deref()))
        .collect();

    if non_commentary.is_empty() {
        return tracks.first().copied();
    }

    for language in language_preference {
        let candidates: Vec<&TrackInfo> = non_commentary
            .iter()
            .copied()
            .filter(|t| languages_match(t.language_or_und(), language))
            .collect();
        let Some(first) = candidates.first().copied() else {
            continue;
        };
        if let Some(codecs) = preferred_codecs {
            for codec in codecs {
                if let Some(track) = candidates
                    .iter()
                    .copied()
                    .find(|t| audio_codec_matches(t.codec.as_deref(), codec))
                {
                    return Some(track);
                }
            }
        }
        return Some(first);
    }

    non_commentary.first().copied()
}

/// Is there a non-commentary audio track in a preferred language?
pub fn audio_matches_language_preference(
    audio_tracks: &[&TrackInfo],
    language_preference: &[String],
    matcher: &CommentaryMatcher,
) -> bool {
    audio_tracks
        .iter()
        .filter(|t| !matcher.is_commentary(t.title.as_deref()))
        .any(|t| {
            language_preference
                .iter()
                .any(|p| languages_match(t.language_or_und(), p))
        })
}

fn tracks_of(tracks: &[TrackInfo], track_type: TrackType) -> Vec<&TrackInfo> {
    tracks.iter().filter(|t| t.track_type == track_type).collect()
}

/// Desired `is_default` per track index. Tracks absent from the map keep
/// whatever flag they have.
pub fn compute_default_flags(
    tracks: &[TrackInfo],
    policy: &EvaluationPolicy,
    matcher: &CommentaryMatcher,
) -> BTreeMap<u32, bool> {
    let flags = &policy.default_flags;
    let mut result = BTreeMap::new();

    let video = tracks_of(tracks, TrackType::Video);
    let audio = tracks_of(tracks, TrackType::Audio);
    let subtitles = tracks_of(tracks, TrackType::Subtitle);

    if flags.set_first_video_default {
        if let Some((first, rest)) = video.split_first() {
            result.insert(first.index, true);
            if flags.clear_other_defaults {
                for track in rest {
                    result.insert(track.index, false);
                }
            }
        }
    }

    if flags.set_preferred_audio_default && !audio.is_empty() {
        if let Some(track) = find_preferred_track(
            &audio,
            &policy.audio_languages,
            matcher,
            flags.preferred_audio_codec.as_deref(),
        ) {
            result.insert(track.index, true);
        }
        if flags.clear_other_defaults {
            for track in &audio {
                result.entry(track.index).or_insert(false);
            }
        }
    }

    if flags.set_preferred_subtitle_default && !subtitles.is_empty() {
        set_preferred_subtitle(&subtitles, policy, matcher, &mut result);
    } else if flags.clear_other_defaults {
        for track in &subtitles {
            result.insert(track.index, false);
        }
    }

    if flags.set_subtitle_default_when_audio_differs
        && !subtitles.is_empty()
        && !audio_matches_language_preference(&audio, &policy.audio_languages, matcher)
        && !subtitles.iter().any(|t| result.get(&t.index) == Some(&true))
    {
        set_preferred_subtitle(&subtitles, policy, matcher, &mut result);
    }

    result
}

fn set_preferred_subtitle(
    subtitles: &[&TrackInfo],
    policy: &EvaluationPolicy,
    matcher: &CommentaryMatcher,
    result: &mut BTreeMap<u32, bool>,
) {
    let preferred = find_preferred_track(subtitles, &policy.subtitle_languages, matcher, None);
    if let Some(track) = preferred {
        result.insert(track.index, true);
    }
    if policy.default_flags.clear_other_defaults {
        for track in subtitles {
            result.entry(track.index).or_insert(false);
        }
    }
}
