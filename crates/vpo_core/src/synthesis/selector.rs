//! Source track selection by preference scoring.

use crate::matching::{languages_match, CommentaryMatcher};
use crate::models::{SourceTrackSelection, TrackInfo};
use crate::policy::{ChannelExtreme, ChannelPreference, PreferenceCriterion, SourcePreferences};

const LANGUAGE_MATCH_SCORE: i64 = 100;
const NOT_COMMENTARY_SCORE: i64 = 80;
const EXACT_CHANNELS_SCORE: i64 = 80;
const CODEC_MATCH_SCORE: i64 = 20;
const SCORE_PER_CHANNEL: i64 = 10;

/// Score one track against one criterion, with the reasons that contributed.
pub fn score_track(
    track: &TrackInfo,
    criterion: &PreferenceCriterion,
    matcher: &CommentaryMatcher,
) -> (i64, Vec<String>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    if let (Some(languages), Some(language)) = (&criterion.language, track.language.as_deref()) {
        if languages.iter().any(|l| languages_match(language, l)) {
            score += LANGUAGE_MATCH_SCORE;
            reasons.push(format!("language={language}"));
        }
    }

    if criterion.not_commentary == Some(true) && !matcher.is_commentary(track.title.as_deref()) {
        score += NOT_COMMENTARY_SCORE;
        reasons.push("not_commentary".to_string());
    }

    if let (Some(preference), Some(channels)) = (criterion.channels, track.channels) {
        let weighted = i64::from(channels) * SCORE_PER_CHANNEL;
        match preference {
            ChannelPreference::Extreme(ChannelExtreme::Max) => {
                score += weighted;
                reasons.push(format!("channels={channels}"));
            }
            ChannelPreference::Extreme(ChannelExtreme::Min) => {
                score -= weighted;
                reasons.push(format!("channels={channels} (min preferred)"));
            }
            ChannelPreference::Exact(wanted) if wanted == channels => {
                score += EXACT_CHANNELS_SCORE;
                reasons.push(format!("channels={channels} (exact match)"));
            }
            ChannelPreference::Exact(_) => {}
        }
    }

    if let (Some(codecs), Some(codec)) = (&criterion.codec, track.codec.as_deref()) {
        if codecs.iter().any(|c| c.eq_ignore_ascii_case(codec)) {
            score += CODEC_MATCH_SCORE;
            reasons.push(format!("codec={codec}"));
        }
    }

    (score, reasons)
}

/// Pick the best-scoring audio track.
///
/// Scores are summed over every criterion; ties keep input order. When
/// nothing scored, the first audio track is returned as a fallback.
/// Returns `None` only when `audio_tracks` is empty.
pub fn select_source_track(
    audio_tracks: &[&TrackInfo],
    preferences: &SourcePreferences,
    matcher: &CommentaryMatcher,
) -> Option<SourceTrackSelection> {
    let Some(first) = audio_tracks.first() else {
        tracing::warn!("No audio tracks available for source selection");
        return None;
    };

    let mut scored: Vec<(&TrackInfo, i64, Vec<String>)> = audio_tracks
        .iter()
        .map(|track| {
            let (score, reasons) = preferences.prefer.iter().fold(
                (0, Vec::new()),
                |(total, mut reasons), criterion| {
                    let (score, more) = score_track(track, criterion, matcher);
                    reasons.extend(more);
                    (total + score, reasons)
                },
            );
            (*track, score, reasons)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let (mut best, score, mut reasons) = scored.swap_remove(0);
    let is_fallback = score <= 0 && reasons.is_empty();
    if is_fallback {
        best = first;
        reasons = vec!["fallback: first audio track".to_string()];
        tracing::info!(
            "No preference criteria matched, using first audio track (index {})",
            best.index
        );
    }

    Some(SourceTrackSelection {
        track_index: best.index,
        track_info: best.clone(),
        score,
        is_fallback,
        match_reasons: reasons,
    })
}
