//! Track classification into ordering categories.

use crate::matching::{languages_match, CommentaryMatcher};
use crate::models::{
    track_key, TrackCategory, TrackInfo, TrackType, TranscriptionClass, TranscriptionMap,
};
use crate::policy::EvaluationPolicy;

const MUSIC_KEYWORDS: &[&str] = &[
    "music",
    "score",
    "soundtrack",
    "isolated score",
    "m&e",
    "music and effects",
    "ost",
    "theme",
    "instrumental",
    "orchestra",
    "songs only",
];

const SFX_KEYWORDS: &[&str] = &[
    "sfx",
    "sound effects",
    "effects only",
    "ambient",
    "foley",
    "environmental",
    "sounds only",
    "effects",
    "atmosphere",
];

/// Does the title name a music-only track?
pub fn is_music_by_title(title: Option<&str>) -> bool {
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return false;
    };
    let lowered = title.to_lowercase();
    MUSIC_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Does the title name a sound-effects track?
///
/// A bare "effects" only counts alongside "sound", so "Visual Effects" is
/// not an effects track.
pub fn is_sfx_by_title(title: Option<&str>) -> bool {
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return false;
    };
    let lowered = title.to_lowercase();
    SFX_KEYWORDS.iter().any(|k| {
        lowered.contains(k) && (*k != "effects" || lowered.contains("sound"))
    })
}

/// Position of `language` in a preference list, or the list length.
pub fn language_preference_index(language: &str, preferences: &[String]) -> usize {
    preferences
        .iter()
        .position(|p| languages_match(language, p))
        .unwrap_or(preferences.len())
}

/// Place a track in one of the ordering categories.
///
/// Audio is checked title-first (effects, music, commentary), then against
/// transcription results, then by language preference.
pub fn classify_track(
    track: &TrackInfo,
    policy: &EvaluationPolicy,
    matcher: &CommentaryMatcher,
    transcription: Option<&TranscriptionMap>,
) -> TrackCategory {
    match track.track_type {
        TrackType::Video => TrackCategory::Video,
        TrackType::Audio => classify_audio(track, policy, matcher, transcription),
        TrackType::Subtitle => {
            if matcher.is_commentary(track.title.as_deref()) {
                TrackCategory::SubtitleCommentary
            } else if track.is_forced {
                TrackCategory::SubtitleForced
            } else {
                TrackCategory::SubtitleMain
            }
        }
        TrackType::Attachment | TrackType::Other => TrackCategory::Attachment,
    }
}

fn classify_audio(
    track: &TrackInfo,
    policy: &EvaluationPolicy,
    matcher: &CommentaryMatcher,
    transcription: Option<&TranscriptionMap>,
) -> TrackCategory {
    let title = track.title.as_deref();
    if is_sfx_by_title(title) {
        return TrackCategory::AudioSfx;
    }
    if is_music_by_title(title) {
        return TrackCategory::AudioMusic;
    }
    if matcher.is_commentary(title) {
        return TrackCategory::AudioCommentary;
    }

    if let Some(info) = transcription.and_then(|m| m.get(&track_key(track))) {
        let detect_commentary = policy
            .transcription
            .as_ref()
            .is_some_and(|t| t.detect_commentary);
        match info.track_type {
            TranscriptionClass::Sfx => return TrackCategory::AudioSfx,
            TranscriptionClass::Music => return TrackCategory::AudioMusic,
            TranscriptionClass::NonSpeech => return TrackCategory::AudioNonSpeech,
            TranscriptionClass::Commentary if detect_commentary => {
                return TrackCategory::AudioCommentary
            }
            _ => {}
        }
    }

    let language = track.language_or_und();
    if policy.audio_languages.iter().any(|p| languages_match(language, p)) {
        TrackCategory::AudioMain
    } else {
        TrackCategory::AudioAlternate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TranscriptionInfo;
    use crate::policy::TranscriptionPolicyOptions;

    fn matcher(policy: &EvaluationPolicy) -> CommentaryMatcher {
        CommentaryMatcher::new(&policy.commentary_patterns)
    }

    #[test]
    fn title_keywords_take_priority() {
        let policy = EvaluationPolicy::default();
        let m = matcher(&policy);
        let sfx = TrackInfo::audio(1, "aac", "eng").with_title("Sound Effects");
        let music = TrackInfo::audio(2, "aac", "eng").with_title("Isolated Score");
        let commentary = TrackInfo::audio(3, "aac", "eng").with_title("Director's Commentary");
        let visual = TrackInfo::audio(4, "aac", "eng").with_title("Visual Effects");

        assert_eq!(classify_track(&sfx, &policy, &m, None), TrackCategory::AudioSfx);
        assert_eq!(classify_track(&music, &policy, &m, None), TrackCategory::AudioMusic);
        assert_eq!(classify_track(&commentary, &policy, &m, None), TrackCategory::AudioCommentary);
        assert_eq!(classify_track(&visual, &policy, &m, None), TrackCategory::AudioMain);
    }

    #[test]
    fn language_decides_main_or_alternate() {
        let policy = EvaluationPolicy::default().with_audio_languages(["eng"]);
        let m = matcher(&policy);
        let eng = TrackInfo::audio(1, "aac", "en");
        let jpn = TrackInfo::audio(2, "aac", "jpn");
        assert_eq!(classify_track(&eng, &policy, &m, None), TrackCategory::AudioMain);
        assert_eq!(classify_track(&jpn, &policy, &m, None), TrackCategory::AudioAlternate);
    }

    #[test]
    fn transcription_commentary_needs_detection_enabled() {
        let track = TrackInfo::audio(1, "aac", "eng").with_id(42);
        let transcription = TranscriptionMap::from([(
            42,
            TranscriptionInfo::new(TranscriptionClass::Commentary, 0.9),
        )]);

        let policy = EvaluationPolicy::default();
        let m = matcher(&policy);
        assert_eq!(
            classify_track(&track, &policy, &m, Some(&transcription)),
            TrackCategory::AudioMain
        );

        let policy = policy.with_transcription(TranscriptionPolicyOptions {
            detect_commentary: true,
            ..Default::default()
        });
        assert_eq!(
            classify_track(&track, &policy, &m, Some(&transcription)),
            TrackCategory::AudioCommentary
        );
    }

    #[test]
    fn subtitles_and_others() {
        let policy = EvaluationPolicy::default();
        let m = matcher(&policy);
        let forced = TrackInfo::subtitle(3, "subrip", "eng").with_forced(true);
        let commentary = TrackInfo::subtitle(4, "subrip", "eng").with_title("Commentary");
        let attachment = TrackInfo::new(5, TrackType::Attachment);
        assert_eq!(classify_track(&forced, &policy, &m, None), TrackCategory::SubtitleForced);
        assert_eq!(
            classify_track(&commentary, &policy, &m, None),
            TrackCategory::SubtitleCommentary
        );
        assert_eq!(classify_track(&attachment, &policy, &m, None), TrackCategory::Attachment);
    }
}
