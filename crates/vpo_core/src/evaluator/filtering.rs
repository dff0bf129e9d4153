//! Keep/remove decisions for every track.

use std::collections::BTreeMap;

use super::classification::{classify_track, is_music_by_title, is_sfx_by_title};
use super::errors::{PolicyError, PolicyResult};
use crate::matching::{languages_match, CommentaryMatcher};
use crate::models::{
    track_key, DispositionAction, TrackCategory, TrackDisposition, TrackInfo, TrackType,
    TranscriptionMap,
};
use crate::policy::{
    AttachmentFilterConfig, AudioFilterConfig, EvaluationPolicy, LanguageFallbackMode,
    SubtitleFilterConfig,
};

const STYLED_SUBTITLE_CODECS: &[&str] = &["ass", "ssa", "ass_subtitle", "ssa_subtitle"];
const FONT_CODECS: &[&str] = &["ttf", "otf", "ttc", "woff", "woff2"];
const FONT_MIME_TYPES: &[&str] = &[
    "application/x-truetype-font",
    "application/x-font-ttf",
    "application/font-sfnt",
];

type Decision = (DispositionAction, String);

fn keep(reason: &str) -> Decision {
    (DispositionAction::Keep, reason.to_string())
}

fn remove(reason: &str) -> Decision {
    (DispositionAction::Remove, reason.to_string())
}

fn in_keep_list(track: &TrackInfo, languages: &[String]) -> Decision {
    let language = track.language_or_und();
    if languages.iter().any(|l| languages_match(language, l)) {
        keep("language in keep list")
    } else {
        remove("language not in keep list")
    }
}

fn evaluate_audio(
    track: &TrackInfo,
    config: &AudioFilterConfig,
    category: TrackCategory,
) -> Decision {
    let title = track.title.as_deref();

    if category == TrackCategory::AudioMusic || is_music_by_title(title) {
        if !config.keep_music_tracks {
            return remove("music track excluded by policy");
        }
        if config.exclude_music_from_language_filter {
            return keep("music track (exempt from language filter)");
        }
    }

    if category == TrackCategory::AudioSfx || is_sfx_by_title(title) {
        if !config.keep_sfx_tracks {
            return remove("sfx track excluded by policy");
        }
        if config.exclude_sfx_from_language_filter {
            return keep("sfx track (exempt from language filter)");
        }
    }

    if category == TrackCategory::AudioNonSpeech {
        if !config.keep_non_speech_tracks {
            return remove("non-speech track excluded by policy");
        }
        if config.exclude_non_speech_from_language_filter {
            return keep("non-speech track (exempt from language filter)");
        }
    }

    in_keep_list(track, &config.languages)
}

fn evaluate_subtitle(
    track: &TrackInfo,
    config: &SubtitleFilterConfig,
    forced_will_be_cleared: bool,
) -> Decision {
    if config.remove_all {
        return remove("remove_all enabled");
    }
    if config.preserve_forced && !forced_will_be_cleared && track.is_forced {
        return keep("forced subtitle preserved");
    }
    match &config.languages {
        None => keep("no language filter applied"),
        Some(languages) => in_keep_list(track, languages),
    }
}

fn is_font_attachment(track: &TrackInfo) -> bool {
    let codec = track.codec.as_deref().unwrap_or_default().to_lowercase();
    FONT_CODECS.contains(&codec.as_str())
        || codec.starts_with("font/")
        || FONT_MIME_TYPES.contains(&codec.as_str())
}

fn evaluate_attachment(
    track: &TrackInfo,
    config: &AttachmentFilterConfig,
    has_styled_subtitles: bool,
) -> Decision {
    if !config.remove_all {
        return keep("attachment kept");
    }
    if has_styled_subtitles && is_font_attachment(track) {
        return remove("remove_all enabled (font removed, styled subtitles may be affected)");
    }
    remove("remove_all enabled")
}

fn has_styled_subtitles(tracks: &[TrackInfo]) -> bool {
    tracks.iter().any(|t| {
        t.track_type == TrackType::Subtitle
            && STYLED_SUBTITLE_CODECS
                .contains(&t.codec.as_deref().unwrap_or_default().to_lowercase().as_str())
    })
}

fn transcription_status(
    track: &TrackInfo,
    transcription: Option<&TranscriptionMap>,
) -> Option<String> {
    if track.track_type != TrackType::Audio {
        return None;
    }
    let status = transcription
        .and_then(|m| m.get(&track_key(track)))
        .map(|info| {
            let pct = (info.confidence_score * 100.0) as i64;
            format!("{} {}%", info.track_type.name(), pct)
        })
        .unwrap_or_else(|| "TBD".to_string());
    Some(status)
}

/// Apply the audio fallback when fewer than `minimum` audio tracks survive.
fn apply_fallback(
    audio_tracks: &[&TrackInfo],
    decisions: &mut BTreeMap<u32, Decision>,
    config: &AudioFilterConfig,
) -> PolicyResult<()> {
    let kept = decisions
        .values()
        .filter(|(action, _)| *action == DispositionAction::Keep)
        .count();

    match config.fallback {
        None | Some(LanguageFallbackMode::Error) => Err(PolicyError::insufficient_tracks(
            "audio",
            config.minimum,
            kept,
            config.languages.clone(),
            audio_tracks
                .iter()
                .map(|t| t.language_or_und().to_string())
                .collect(),
        )),
        Some(LanguageFallbackMode::KeepAll) => {
            for track in audio_tracks {
                decisions.insert(track.index, keep("fallback: keep_all applied"));
            }
            Ok(())
        }
        Some(LanguageFallbackMode::KeepFirst) => {
            let mut needed = config.minimum.saturating_sub(kept);
            for track in audio_tracks {
                if needed == 0 {
                    break;
                }
                let removed = matches!(
                    decisions.get(&track.index),
                    None | Some((DispositionAction::Remove, _))
                );
                if removed {
                    decisions.insert(track.index, keep("fallback: keep_first applied"));
                    needed -= 1;
                }
            }
            Ok(())
        }
        Some(LanguageFallbackMode::ContentLanguage) => {
            if let Some(content_language) = audio_tracks.first().map(|t| t.language_or_und()) {
                for track in audio_tracks {
                    if languages_match(track.language_or_und(), content_language) {
                        decisions.insert(track.index, keep("fallback: content language match"));
                    }
                }
            }
            Ok(())
        }
    }
}

/// One disposition per track, in input order.
///
/// `subtitle_forced_will_be_cleared` tells the subtitle filter that
/// `subtitle_actions.clear_all_forced` runs first, so current forced flags
/// must not preserve a track.
pub fn compute_track_dispositions(
    tracks: &[TrackInfo],
    policy: &EvaluationPolicy,
    transcription: Option<&TranscriptionMap>,
    subtitle_forced_will_be_cleared: bool,
) -> PolicyResult<Vec<TrackDisposition>> {
    let matcher = CommentaryMatcher::new(&policy.commentary_patterns);
    let styled = has_styled_subtitles(tracks);
    let audio_tracks: Vec<&TrackInfo> = tracks
        .iter()
        .filter(|t| t.track_type == TrackType::Audio)
        .collect();

    let mut decisions: BTreeMap<u32, Decision> = BTreeMap::new();
    let mut audio_decisions: BTreeMap<u32, Decision> = BTreeMap::new();

    for track in tracks {
        let filters = (
            &policy.keep_audio,
            &policy.keep_subtitles,
            &policy.filter_attachments,
        );
        let decision = match (track.track_type, filters) {
            (TrackType::Audio, (Some(config), _, _)) => {
                let category = classify_track(track, policy, &matcher, transcription);
                let decision = evaluate_audio(track, config, category);
                audio_decisions.insert(track.index, decision.clone());
                decision
            }
            (TrackType::Subtitle, (_, Some(config), _)) => {
                evaluate_subtitle(track, config, subtitle_forced_will_be_cleared)
            }
            (TrackType::Attachment, (_, _, Some(config))) => {
                evaluate_attachment(track, config, styled)
            }
            _ => keep("no filter applied"),
        };
        decisions.insert(track.index, decision);
    }

    if let Some(config) = &policy.keep_audio {
        let kept = audio_decisions
            .values()
            .filter(|(action, _)| *action == DispositionAction::Keep)
            .count();
        if !audio_tracks.is_empty() && kept < config.minimum {
            tracing::debug!(
                "Audio filter kept {} of {} required tracks, applying fallback",
                kept,
                config.minimum
            );
            apply_fallback(&audio_tracks, &mut audio_decisions, config)?;
            decisions.extend(audio_decisions);
        }
    }

    Ok(tracks
        .iter()
        .map(|track| {
            let (action, reason) = decisions
                .remove(&track.index)
                .unwrap_or_else(|| keep("no filter applied"));
            TrackDisposition {
                track_index: track.index,
                track_type: track.track_type,
                codec: track.codec.clone(),
                language: track.language.clone(),
                title: track.title.clone(),
                channels: track.channels,
                resolution: match (track.width, track.height) {
                    (Some(w), Some(h)) if w > 0 && h > 0 => Some(format!("{w}x{h}")),
                    _ => None,
                },
                action,
                reason,
                transcription_status: transcription_status(track, transcription),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TranscriptionClass, TranscriptionInfo};

    fn english_only() -> EvaluationPolicy {
        EvaluationPolicy::default().with_keep_audio(AudioFilterConfig::new(vec!["eng".into()]))
    }

    fn dispositions(tracks: &[TrackInfo], policy: &EvaluationPolicy) -> Vec<TrackDisposition> {
        compute_track_dispositions(tracks, policy, None, false).unwrap()
    }

    fn reasons(dispositions: &[TrackDisposition]) -> Vec<(u32, DispositionAction, &str)> {
        dispositions
            .iter()
            .map(|d| (d.track_index, d.action, d.reason.as_str()))
            .collect()
    }

    #[test]
    fn no_filters_keep_everything() {
        let tracks = vec![TrackInfo::video(0, "h264"), TrackInfo::audio(1, "aac", "eng")];
        let result = dispositions(&tracks, &EvaluationPolicy::default());
        assert!(result.iter().all(|d| !d.is_removed()));
        assert_eq!(result[1].transcription_status.as_deref(), Some("TBD"));
        assert_eq!(result[0].transcription_status, None);
    }

    #[test]
    fn audio_language_filter_with_music_exemption() {
        let tracks = vec![
            TrackInfo::audio(1, "aac", "eng"),
            TrackInfo::audio(2, "aac", "fre"),
            TrackInfo::audio(3, "aac", "fre").with_title("Isolated Score"),
        ];
        assert_eq!(
            reasons(&dispositions(&tracks, &english_only())),
            vec![
                (1, DispositionAction::Keep, "language in keep list"),
                (2, DispositionAction::Remove, "language not in keep list"),
                (3, DispositionAction::Keep, "music track (exempt from language filter)"),
            ]
        );
    }

    #[test]
    fn insufficient_audio_without_fallback_errors() {
        let tracks = vec![TrackInfo::audio(1, "aac", "jpn"), TrackInfo::audio(2, "aac", "ger")];
        let err = compute_track_dispositions(&tracks, &english_only(), None, false).unwrap_err();
        let PolicyError::InsufficientTracks { required, available, file_languages, .. } = err else {
            panic!("expected InsufficientTracks");
        };
        assert_eq!((required, available), (1, 0));
        assert_eq!(file_languages, vec!["jpn", "ger"]);
    }

    #[test]
    fn fallback_modes() {
        let tracks = vec![
            TrackInfo::audio(1, "aac", "jpn"),
            TrackInfo::audio(2, "aac", "ger"),
            TrackInfo::audio(3, "aac", "jpn"),
        ];
        let with_fallback = |mode| {
            let config = AudioFilterConfig::new(vec!["eng".into()]).with_fallback(mode);
            EvaluationPolicy::default().with_keep_audio(config)
        };

        let d = dispositions(&tracks, &with_fallback(LanguageFallbackMode::ContentLanguage));
        assert_eq!(
            d.iter().map(|d| d.is_removed()).collect::<Vec<_>>(),
            vec![false, true, false]
        );
        assert_eq!(d[0].reason, "fallback: content language match");

        let d = dispositions(&tracks, &with_fallback(LanguageFallbackMode::KeepFirst));
        assert_eq!(
            d.iter().map(|d| d.is_removed()).collect::<Vec<_>>(),
            vec![false, true, true]
        );

        let d = dispositions(&tracks, &with_fallback(LanguageFallbackMode::KeepAll));
        assert!(d.iter().all(|d| d.reason == "fallback: keep_all applied"));
    }

    #[test]
    fn forced_subtitles_preserved_unless_cleared() {
        let policy = EvaluationPolicy::default().with_keep_subtitles(SubtitleFilterConfig {
            languages: Some(vec!["eng".into()]),
            preserve_forced: true,
            remove_all: false,
        });
        let tracks = vec![TrackInfo::subtitle(2, "subrip", "jpn").with_forced(true)];

        let d = compute_track_dispositions(&tracks, &policy, None, false).unwrap();
        assert_eq!(d[0].reason, "forced subtitle preserved");

        let d = compute_track_dispositions(&tracks, &policy, None, true).unwrap();
        assert!(d[0].is_removed());
    }

    #[test]
    fn font_removal_mentions_styled_subtitles() {
        let policy = EvaluationPolicy::default()
            .with_filter_attachments(AttachmentFilterConfig { remove_all: true });
        let tracks = vec![
            TrackInfo::subtitle(1, "ass", "eng"),
            TrackInfo::new(2, TrackType::Attachment).with_codec("ttf"),
            TrackInfo::new(3, TrackType::Attachment).with_codec("image/jpeg"),
        ];
        let d = dispositions(&tracks, &policy);
        assert_eq!(
            d[1].reason,
            "remove_all enabled (font removed, styled subtitles may be affected)"
        );
        assert_eq!(d[2].reason, "remove_all enabled");
    }

    #[test]
    fn transcription_status_and_resolution() {
        let tracks = vec![
            TrackInfo::video(0, "hevc").with_resolution(3840, 2160),
            TrackInfo::audio(1, "aac", "eng").with_id(7),
        ];
        let transcription =
            TranscriptionMap::from([(7, TranscriptionInfo::new(TranscriptionClass::Main, 0.934))]);
        let policy = EvaluationPolicy::default();
        let d = compute_track_dispositions(&tracks, &policy, Some(&transcription), false).unwrap();
        assert_eq!(d[0].resolution.as_deref(), Some("3840x2160"));
        assert_eq!(d[1].transcription_status.as_deref(), Some("main 93%"));
    }
}
