//! Dry-run text for synthesis plans.

use std::path::Path;

use crate::models::{
    SkippedSynthesis, SynthesisOperation, SynthesisPlan, TrackOrderEntry, TrackOrigin,
};

pub fn format_synthesis_operation(op: &SynthesisOperation) -> String {
    let source = &op.source_track.track_info;
    let mut lines = vec![
        format!("  {}:", op.definition_name),
        format!(
            "    Source: Track {} ({} {}ch)",
            op.source_track.track_index,
            source.codec.as_deref().unwrap_or("unknown"),
            source.channels.map_or_else(|| "?".to_string(), |c| c.to_string())
        ),
        format!(
            "    Target: {} {}ch",
            op.target_codec.name().to_uppercase(),
            op.target_channels
        ),
    ];
    if let Some(bitrate) = op.target_bitrate {
        lines.push(format!("    Bitrate: {}k", bitrate / 1000));
    }
    if op.downmix_filter.is_some() {
        lines.push(format!(
            "    Downmix: {}ch -> {}ch",
            op.source_channels(),
            op.target_channels
        ));
    }
    if !op.target_title.is_empty() {
        lines.push(format!("    Title: {}", op.target_title));
    }
    lines.push(format!("    Language: {}", op.target_language));
    lines.push(format!("    Position: audio track {}", op.target_position));
    lines.join("\n")
}

pub fn format_skipped_synthesis(skipped: &SkippedSynthesis) -> String {
    format!(
        "  {}: SKIPPED ({})\n    {}",
        skipped.definition_name,
        skipped.reason.display(),
        skipped.details
    )
}

/// Projected audio order, synthesized entries marked with `*`.
pub fn format_final_track_order(order: &[TrackOrderEntry]) -> String {
    let mut lines: Vec<String> = order
        .iter()
        .map(|entry| {
            let marker = if entry.origin == TrackOrigin::Synthesized { "*" } else { " " };
            format!(
                "  {} [{}] {} {}ch {} - {}",
                marker,
                entry.index,
                entry.codec.to_uppercase(),
                entry.channels,
                entry.language,
                entry.title.as_deref().unwrap_or("(no title)")
            )
        })
        .collect();
    if order.iter().any(|e| e.origin == TrackOrigin::Synthesized) {
        lines.push("  (* = synthesized)".to_string());
    }
    lines.join("\n")
}

pub fn format_synthesis_plan(plan: &SynthesisPlan) -> String {
    let name = Path::new(&plan.file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| plan.file_path.clone());
    let mut lines = vec![format!("Audio Synthesis Plan for {name}:")];

    if plan.is_empty() {
        lines.push("  No synthesis operations defined".to_string());
        return lines.join("\n");
    }

    if !plan.operations.is_empty() {
        lines.push(format!("\nTracks to create ({}):", plan.operations.len()));
        lines.extend(plan.operations.iter().map(format_synthesis_operation));
    }

    if !plan.skipped.is_empty() {
        lines.push(format!("\nSkipped ({}):", plan.skipped.len()));
        lines.extend(plan.skipped.iter().map(format_skipped_synthesis));
    }

    if !plan.final_track_order.is_empty() {
        lines.push("\nProjected final audio track order:".to_string());
        lines.push(format_final_track_order(&plan.final_track_order));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AudioCodec, SkipReason, SourceTrackSelection, TrackInfo};

    fn operation() -> SynthesisOperation {
        let source = TrackInfo::audio(1, "truehd", "eng").with_channels(8);
        SynthesisOperation {
            definition_name: "Stereo AAC".into(),
            source_track: SourceTrackSelection {
                track_index: 1,
                track_info: source,
                score: 180,
                is_fallback: false,
                match_reasons: vec!["language=eng".into()],
            },
            target_codec: AudioCodec::Aac,
            target_channels: 2,
            target_bitrate: Some(192_000),
            target_title: "Stereo".into(),
            target_language: "eng".into(),
            target_position: 1,
            downmix_filter: Some("pan=stereo".into()),
        }
    }

    #[test]
    fn formats_operation() {
        assert_eq!(
            format_synthesis_operation(&operation()),
            [
                "  Stereo AAC:",
                "    Source: Track 1 (truehd 8ch)",
                "    Target: AAC 2ch",
                "    Bitrate: 192k",
                "    Downmix: 8ch -> 2ch",
                "    Title: Stereo",
                "    Language: eng",
                "    Position: audio track 1",
            ]
            .join("\n")
        );
    }

    #[test]
    fn formats_full_plan() {
        let plan = SynthesisPlan {
            file_id: "f".into(),
            file_path: "/media/movie.mkv".into(),
            operations: vec![operation()],
            skipped: vec![SkippedSynthesis {
                definition_name: "Opus".into(),
                reason: SkipReason::EncoderUnavailable,
                details: "FFmpeg encoder for opus not available".into(),
            }],
            final_track_order: vec![
                TrackOrderEntry {
                    index: 0,
                    origin: TrackOrigin::Original,
                    codec: "truehd".into(),
                    channels: 8,
                    language: "eng".into(),
                    title: None,
                    original_index: Some(1),
                    synthesis_name: None,
                },
                TrackOrderEntry {
                    index: 1,
                    origin: TrackOrigin::Synthesized,
                    codec: "aac".into(),
                    channels: 2,
                    language: "eng".into(),
                    title: Some("Stereo".into()),
                    original_index: None,
                    synthesis_name: Some("Stereo AAC".into()),
                },
            ],
            audio_tracks: Vec::new(),
        };
        let text = format_synthesis_plan(&plan);
        assert!(text.starts_with("Audio Synthesis Plan for movie.mkv:\n\nTracks to create (1):"));
        assert!(text.contains(
            "\n\nSkipped (1):\n  Opus: SKIPPED (Encoder not available)\n    FFmpeg encoder"
        ));
        assert!(text.ends_with(
            "    [0] TRUEHD 8ch eng - (no title)\n  * [1] AAC 2ch eng - Stereo\n  (* = synthesized)"
        ));
    }

    #[test]
    fn empty_plan_text() {
        let plan = SynthesisPlan {
            file_id: "f".into(),
            file_path: "/media/movie.mkv".into(),
            operations: Vec::new(),
            skipped: Vec::new(),
            final_track_order: Vec::new(),
            audio_tracks: Vec::new(),
        };
        assert_eq!(
            format_synthesis_plan(&plan),
            "Audio Synthesis Plan for movie.mkv:\n  No synthesis operations defined"
        );
    }
}
