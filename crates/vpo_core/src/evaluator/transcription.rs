//! Language and title updates derived from transcription results.

use std::collections::BTreeSet;

use crate::matching::{languages_match, normalize_language};
use crate::models::{
    track_key, PlannedAction, TrackInfo, TrackType, TranscriptionInfo, TranscriptionMap,
};
use crate::policy::TranscriptionPolicyOptions;

/// Tokens that only describe codec, layout or bit depth.
const GENERIC_TITLE_TOKENS: &[&str] = &[
    "mono", "stereo", "surround", "2.0", "2.1", "5.1", "7.1", "aac", "ac3", "ac-3", "eac3",
    "e-ac-3", "dts", "dts-hd", "flac", "mp3", "opus", "pcm", "truehd", "vorbis", "pcm_s16le",
    "pcm_s24le", "pcm_s32le", "16-bit", "24-bit", "32-bit", "16bit", "24bit", "32bit",
];

/// Is the title missing or made only of technical tokens like "5.1 AAC"?
pub fn is_generic_title(title: Option<&str>) -> bool {
    let Some(title) = title else {
        return true;
    };
    let normalized = title.replace('/', " ").to_lowercase();
    normalized
        .split_whitespace()
        .all(|token| GENERIC_TITLE_TOKENS.contains(&token))
}

fn confident_audio<'a>(
    tracks: &'a [TrackInfo],
    transcription: &'a TranscriptionMap,
    threshold: f64,
) -> impl Iterator<Item = (&'a TrackInfo, &'a TranscriptionInfo)> + 'a {
    tracks
        .iter()
        .filter(|t| t.track_type == TrackType::Audio)
        .filter_map(move |t| transcription.get(&track_key(t)).map(|info| (t, info)))
        .filter(move |(_, info)| info.confidence_score >= threshold)
}

/// `SetLanguage` for audio tracks whose detected language differs from the tag.
pub fn compute_language_updates(
    tracks: &[TrackInfo],
    transcription: &TranscriptionMap,
    options: &TranscriptionPolicyOptions,
) -> Vec<PlannedAction> {
    if !options.update_language_from_transcription {
        return Vec::new();
    }

    confident_audio(tracks, transcription, options.confidence_threshold)
        .filter_map(|(track, info)| {
            let detected = info.detected_language.as_deref()?;
            let current = track.language_or_und();
            if languages_match(current, detected) {
                return None;
            }
            Some(PlannedAction::SetLanguage {
                track_index: track.index,
                current: Some(current.to_string()),
                desired: normalize_language(Some(detected)),
            })
        })
        .collect()
}

/// `SetTitle` from the transcription class for audio tracks with a generic title.
///
/// Tracks in `already_titled` are left alone.
pub fn compute_title_updates(
    tracks: &[TrackInfo],
    transcription: &TranscriptionMap,
    options: &TranscriptionPolicyOptions,
    already_titled: &BTreeSet<u32>,
) -> Vec<PlannedAction> {
    if !options.update_title_from_classification {
        return Vec::new();
    }

    confident_audio(tracks, transcription, options.confidence_threshold)
        .filter(|(track, _)| !already_titled.contains(&track.index))
        .filter(|(track, _)| is_generic_title(track.title.as_deref()))
        .filter_map(|(track, info)| {
            let desired = info.track_type.title();
            if track.title.as_deref() == Some(desired) {
                return None;
            }
            Some(PlannedAction::SetTitle {
                track_index: track.index,
                current: track.title.clone(),
                desired: desired.to_string(),
            })
        })
        .collect()
}
