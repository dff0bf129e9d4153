//! Container conversion planning.

use super::errors::{PolicyError, PolicyResult};
use crate::matching::codecs::{
    is_bitmap_subtitle, is_text_subtitle, transcode_default, DEFAULT_AUDIO_TRANSCODE_TARGET,
};
use crate::matching::is_codec_compatible;
use crate::models::{
    ContainerChange, ContainerTranscodePlan, IncompatibleTrackPlan, TrackInfo, TrackType,
    TranscodeAction,
};
use crate::policy::{ContainerConfig, EvaluationPolicy, IncompatibleCodecMode};

/// Map ffprobe format names and extensions to a short container name.
pub fn normalize_container_format(container: &str) -> String {
    let container = container.trim().to_lowercase();

    match container.as_str() {
        "matroska" | "matroska,webm" => return "mkv".to_string(),
        "mov,mp4,m4a,3gp,3g2,mj2" => return "mp4".to_string(),
        "quicktime" => return "mov".to_string(),
        _ => {}
    }

    if container.contains("matroska") || container == "webm" {
        "mkv".to_string()
    } else if ["mp4", "m4a", "m4v"].iter().any(|x| container.contains(x)) {
        "mp4".to_string()
    } else if container.contains("mov") || container.contains("quicktime") {
        "mov".to_string()
    } else if container.contains("avi") {
        "avi".to_string()
    } else {
        container
    }
}

/// Only Matroska supports rewriting the stream order in place.
pub fn is_mkv_container(container: &str) -> bool {
    normalize_container_format(container) == "mkv"
}

fn track_codec(track: &TrackInfo) -> String {
    track.codec.as_deref().unwrap_or_default().trim().to_lowercase()
}

/// Decide how one incompatible track reaches the target container.
fn plan_incompatible_track(
    track: &TrackInfo,
    config: &ContainerConfig,
) -> PolicyResult<IncompatibleTrackPlan> {
    let codec = track_codec(track);
    let track_type = track.track_type;

    if let Some(mapping) = config.mapping_for(&codec) {
        let action = mapping.action.unwrap_or(match track_type {
            TrackType::Audio => TranscodeAction::Transcode,
            TrackType::Subtitle if is_bitmap_subtitle(&codec) => TranscodeAction::Remove,
            TrackType::Subtitle => TranscodeAction::Convert,
            _ => TranscodeAction::Transcode,
        });
        let (target_codec, reason) = match action {
            TranscodeAction::Remove => (None, format!("{codec} removed (custom mapping)")),
            _ => (
                Some(mapping.codec.clone()),
                format!("{codec} -> {} (custom mapping)", mapping.codec),
            ),
        };
        let target_bitrate = match action {
            TranscodeAction::Transcode => mapping.bitrate.clone(),
            _ => None,
        };
        return IncompatibleTrackPlan::new(
            track.index,
            track_type,
            codec,
            action,
            target_codec,
            target_bitrate,
            reason,
        );
    }

    match track_type {
        TrackType::Audio => {
            let target = transcode_default(&codec, "mp4").unwrap_or(DEFAULT_AUDIO_TRANSCODE_TARGET);
            let reason = format!("{codec} is not MP4-compatible, transcoding to {}", target.codec);
            IncompatibleTrackPlan::new(
                track.index,
                track_type,
                codec,
                TranscodeAction::Transcode,
                Some(target.codec.to_string()),
                target.bitrate.map(str::to_string),
                reason,
            )
        }
        TrackType::Subtitle if is_text_subtitle(&codec) => {
            let reason = format!("Converting {codec} to mov_text (styling may be lost)");
            IncompatibleTrackPlan::new(
                track.index,
                track_type,
                codec,
                TranscodeAction::Convert,
                Some("mov_text".to_string()),
                None,
                reason,
            )
        }
        TrackType::Subtitle => {
            let reason = if is_bitmap_subtitle(&codec) {
                format!("Removing {codec} (bitmap subtitles cannot be converted)")
            } else {
                format!("Removing {codec} (unknown subtitle format)")
            };
            let action = TranscodeAction::Remove;
            IncompatibleTrackPlan::new(track.index, track_type, codec, action, None, None, reason)
        }
        _ => {
            let reason = format!("{codec} is not MP4-compatible; track will be removed");
            let action = TranscodeAction::Remove;
            IncompatibleTrackPlan::new(track.index, track_type, codec, action, None, None, reason)
        }
    }
}

/// Container change the policy asks for, if any.
///
/// Returns `Ok(None)` when there is no container section, the file is
/// already in the target format, or incompatible tracks exist and the
/// policy says `skip`.
pub fn evaluate_container_change_with_policy(
    tracks: &[TrackInfo],
    container: &str,
    policy: &EvaluationPolicy,
) -> PolicyResult<Option<ContainerChange>> {
    let Some(config) = &policy.container else {
        return Ok(None);
    };

    let target = config.target.name().to_string();
    let source = normalize_container_format(container);
    if source == target {
        return Ok(None);
    }

    let incompatible: Vec<&TrackInfo> = tracks
        .iter()
        .filter(|t| !is_codec_compatible(&track_codec(t), &target, t.track_type))
        .collect();
    let mut warnings: Vec<String> = incompatible
        .iter()
        .map(|t| {
            format!(
                "Track {} ({}, {}) is not compatible with MP4",
                t.index,
                t.track_type,
                track_codec(t)
            )
        })
        .collect();

    let mut change = ContainerChange {
        source_format: source,
        target_format: target,
        warnings: Vec::new(),
        incompatible_tracks: incompatible.iter().map(|t| t.index).collect(),
        preserve_metadata: config.preserve_metadata,
        transcode_plan: None,
    };

    if incompatible.is_empty() {
        change.warnings = warnings;
        return Ok(Some(change));
    }

    match config.on_incompatible_codec {
        IncompatibleCodecMode::Error => Err(PolicyError::incompatible_codec(
            change.target_format,
            incompatible
                .iter()
                .map(|t| {
                    (
                        t.index,
                        t.track_type.to_string(),
                        t.codec.clone().unwrap_or_else(|| "unknown".to_string()),
                    )
                })
                .collect(),
        )),
        IncompatibleCodecMode::Skip => {
            tracing::debug!(
                "Skipping conversion to {}: {} incompatible track(s)",
                change.target_format,
                incompatible.len()
            );
            Ok(None)
        }
        IncompatibleCodecMode::Transcode => {
            let mut plan = ContainerTranscodePlan::default();
            for track in &incompatible {
                let track_plan = plan_incompatible_track(track, config)?;
                match track_plan.action {
                    TranscodeAction::Remove => plan.warnings.push(format!(
                        "Track {} ({}) will be removed",
                        track.index, track_plan.source_codec
                    )),
                    TranscodeAction::Convert
                        if matches!(track_plan.source_codec.as_str(), "ass" | "ssa") =>
                    {
                        plan.warnings.push(format!(
                            "Track {} ({}) will lose styling when converted to mov_text",
                            track.index, track_plan.source_codec
                        ))
                    }
                    _ => {}
                }
                plan.track_plans.push(track_plan);
            }
            warnings.extend(plan.warnings.iter().cloned());
            change.warnings = warnings;
            change.transcode_plan = Some(plan);
            Ok(Some(change))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{CodecTranscodeMapping, ContainerTarget};

    fn mp4_policy(mode: IncompatibleCodecMode) -> EvaluationPolicy {
        EvaluationPolicy::default()
            .with_container(ContainerConfig::new(ContainerTarget::Mp4).with_mode(mode))
    }

    fn mkv_policy() -> EvaluationPolicy {
        EvaluationPolicy::default().with_container(ContainerConfig::new(ContainerTarget::Mkv))
    }

    fn from_mkv(
        tracks: &[TrackInfo],
        policy: &EvaluationPolicy,
    ) -> PolicyResult<Option<ContainerChange>> {
        evaluate_container_change_with_policy(tracks, "mkv", policy)
    }

    #[test]
    fn normalizes_ffprobe_names() {
        assert_eq!(normalize_container_format("matroska,webm"), "mkv");
        assert_eq!(normalize_container_format("MOV,MP4,M4A,3GP,3G2,MJ2"), "mp4");
        assert_eq!(normalize_container_format("webm"), "mkv");
        assert_eq!(normalize_container_format("avi"), "avi");
        assert_eq!(normalize_container_format("ogg"), "ogg");
        assert!(is_mkv_container("Matroska"));
        assert!(!is_mkv_container("mp4"));
    }

    #[test]
    fn same_format_or_no_config_is_none() {
        let tracks = vec![TrackInfo::video(0, "h264")];
        assert_eq!(from_mkv(&tracks, &EvaluationPolicy::default()).unwrap(), None);
        let change = evaluate_container_change_with_policy(&tracks, "matroska,webm", &mkv_policy());
        assert_eq!(change.unwrap(), None);
    }

    #[test]
    fn mkv_target_accepts_everything() {
        let tracks = vec![TrackInfo::audio(1, "truehd", "eng")];
        let change = evaluate_container_change_with_policy(&tracks, "mp4", &mkv_policy())
            .unwrap()
            .unwrap();
        assert!(change.changes_format());
        assert!(change.incompatible_tracks.is_empty());
    }

    #[test]
    fn incompatible_codec_errors_by_default() {
        let tracks = vec![TrackInfo::video(0, "h264"), TrackInfo::audio(1, "truehd", "eng")];
        let err = from_mkv(&tracks, &mp4_policy(IncompatibleCodecMode::Error)).unwrap_err();
        assert_eq!(
            err,
            PolicyError::incompatible_codec("mp4", vec![(1, "audio".into(), "truehd".into())])
        );
    }

    #[test]
    fn skip_mode_drops_conversion() {
        let tracks = vec![TrackInfo::audio(1, "truehd", "eng")];
        let change = from_mkv(&tracks, &mp4_policy(IncompatibleCodecMode::Skip)).unwrap();
        assert!(change.is_none());
    }

    #[test]
    fn transcode_mode_plans_each_track() {
        let tracks = vec![
            TrackInfo::video(0, "h264"),
            TrackInfo::audio(1, "truehd", "eng"),
            TrackInfo::audio(2, "vorbis", "eng"),
            TrackInfo::subtitle(3, "ass", "eng"),
            TrackInfo::subtitle(4, "hdmv_pgs_subtitle", "eng"),
        ];
        let change = from_mkv(&tracks, &mp4_policy(IncompatibleCodecMode::Transcode))
            .unwrap()
            .unwrap();
        let plan = change.transcode_plan.as_ref().unwrap();

        assert_eq!(change.incompatible_tracks, vec![1, 2, 3, 4]);
        assert_eq!(plan.tracks_to_transcode(), vec![1, 2]);
        assert_eq!(plan.tracks_to_convert(), vec![3]);
        assert_eq!(plan.tracks_to_remove(), vec![4]);
        assert_eq!(plan.track_plans[0].target_bitrate.as_deref(), Some("256k"));
        assert_eq!(plan.track_plans[1].target_bitrate.as_deref(), Some("192k"));
        assert!(plan.warnings.iter().any(|w| w.contains("lose styling")));
        assert!(change.warnings.iter().any(|w| w == "Track 4 (hdmv_pgs_subtitle) will be removed"));
    }

    #[test]
    fn custom_mapping_overrides_defaults() {
        let config = ContainerConfig::new(ContainerTarget::Mp4)
            .with_mode(IncompatibleCodecMode::Transcode)
            .with_mapping("truehd", CodecTranscodeMapping::new("eac3").with_bitrate("640k"));
        let policy = EvaluationPolicy::default().with_container(config);
        let tracks = vec![TrackInfo::audio(1, "TrueHD", "eng")];
        let change = from_mkv(&tracks, &policy).unwrap().unwrap();
        let plan = &change.transcode_plan.unwrap().track_plans[0];
        assert_eq!(plan.target_codec.as_deref(), Some("eac3"));
        assert_eq!(plan.target_bitrate.as_deref(), Some("640k"));
        assert_eq!(plan.reason, "truehd -> eac3 (custom mapping)");
    }
}
