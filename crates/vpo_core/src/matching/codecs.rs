//! Codec alias tables, matching and container compatibility.
//!
//! Probes report the same codec under several names (`hevc`, `h265`,
//! `hvc1`, ...). Policies name codecs loosely too. Matching here is
//! case-insensitive and alias-aware in both directions.

use globset::GlobBuilder;

use crate::models::TrackType;

type AliasTable = &'static [(&'static str, &'static [&'static str])];

const HEVC: &[&str] = &["hevc", "h265", "h.265", "x265", "hvc1", "hev1"];
const H264: &[&str] = &["h264", "h.264", "avc", "avc1", "x264"];

pub const VIDEO_CODEC_ALIASES: AliasTable = &[
    ("hevc", HEVC),
    ("h265", HEVC),
    ("h264", H264),
    ("avc", H264),
    ("vp9", &["vp9", "vp09"]),
    ("av1", &["av1", "av01", "libaom-av1"]),
    ("mpeg4", &["mpeg4", "mp4v"]),
];

pub const AUDIO_CODEC_ALIASES: AliasTable = &[
    ("truehd", &["truehd", "dolby truehd", "mlp"]),
    ("dts-hd", &["dts-hd ma", "dts-hd", "dtshd", "dts_hd", "dts-hd.ma"]),
    ("dts", &["dts", "dca"]),
    ("flac", &["flac"]),
    ("pcm", &["pcm_s16le", "pcm_s24le", "pcm_s32le", "pcm_f32le", "pcm"]),
    ("aac", &["aac", "aac_latm", "mp4a"]),
    ("ac3", &["ac3", "ac-3", "a52"]),
    ("eac3", &["eac3", "e-ac-3", "ec3"]),
    ("opus", &["opus"]),
    ("mp3", &["mp3", "mp3float"]),
    ("vorbis", &["vorbis"]),
    ("alac", &["alac"]),
];

pub const SUBTITLE_CODEC_ALIASES: AliasTable = &[
    ("subrip", &["subrip", "srt"]),
    ("ass", &["ass", "ssa"]),
    ("pgs", &["hdmv_pgs_subtitle", "pgssub", "pgs"]),
    ("dvdsub", &["dvd_subtitle", "dvdsub", "vobsub"]),
    ("mov_text", &["mov_text", "tx3g"]),
    ("webvtt", &["webvtt"]),
];

pub const MP4_COMPATIBLE_VIDEO_CODECS: &[&str] = &[
    "h264", "avc", "avc1", "hevc", "h265", "hvc1", "hev1", "av1", "av01", "mpeg4", "mp4v", "vp9",
];

pub const MP4_COMPATIBLE_AUDIO_CODECS: &[&str] = &[
    "aac", "mp4a", "ac3", "eac3", "mp3", "mp3float", "flac", "opus", "alac",
];

pub const MP4_COMPATIBLE_SUBTITLE_CODECS: &[&str] = &["mov_text", "tx3g", "webvtt"];

/// Text subtitles that can be converted to `mov_text` for MP4.
pub const MP4_CONVERTIBLE_SUBTITLE_CODECS: &[&str] = &["subrip", "srt", "ass", "ssa"];

/// Bitmap subtitles; converting them would need OCR.
pub const BITMAP_SUBTITLE_CODECS: &[&str] = &[
    "hdmv_pgs_subtitle",
    "dvd_subtitle",
    "dvdsub",
    "pgssub",
    "pgs",
    "vobsub",
];

/// Codec and bitrate to transcode an incompatible audio track to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeTarget {
    pub codec: &'static str,
    pub bitrate: Option<&'static str>,
}

impl TranscodeTarget {
    const fn new(codec: &'static str, bitrate: &'static str) -> Self {
        Self {
            codec,
            bitrate: Some(bitrate),
        }
    }
}

pub const MP4_AUDIO_TRANSCODE_DEFAULTS: &[(&str, TranscodeTarget)] = &[
    ("truehd", TranscodeTarget::new("aac", "256k")),
    ("dts", TranscodeTarget::new("aac", "256k")),
    ("dts-hd ma", TranscodeTarget::new("aac", "320k")),
    ("dts-hd", TranscodeTarget::new("aac", "320k")),
    ("vorbis", TranscodeTarget::new("aac", "192k")),
    ("pcm_s16le", TranscodeTarget::new("aac", "192k")),
    ("pcm_s24le", TranscodeTarget::new("aac", "192k")),
    ("pcm_s32le", TranscodeTarget::new("aac", "192k")),
];

/// Target for incompatible audio without a specific default.
pub const DEFAULT_AUDIO_TRANSCODE_TARGET: TranscodeTarget = TranscodeTarget::new("aac", "192k");

fn aliases_of(table: AliasTable, key: &str) -> &'static [&'static str] {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, variants)| *variants)
        .unwrap_or(&[])
}

/// Lower-case and trim, folding DTS-HD and TrueHD spellings together.
pub fn normalize_codec(codec: Option<&str>) -> String {
    let Some(codec) = codec else {
        return String::new();
    };
    let normalized = codec.trim().to_lowercase();
    if normalized.contains("dts-hd") || normalized.contains("dtshd") {
        return "dts-hd".to_string();
    }
    if normalized.contains("truehd") {
        return "truehd".to_string();
    }
    normalized
}

/// Alias-group key for a codec, or the normalized codec when it has none.
pub fn canonical_codec(codec: &str, track_type: TrackType) -> String {
    let normalized = normalize_codec(Some(codec));
    if normalized.is_empty() {
        return normalized;
    }
    let table = match track_type {
        TrackType::Video => VIDEO_CODEC_ALIASES,
        TrackType::Audio => AUDIO_CODEC_ALIASES,
        TrackType::Subtitle => SUBTITLE_CODEC_ALIASES,
        _ => return normalized,
    };
    table
        .iter()
        .find(|(key, variants)| *key == normalized || variants.contains(&normalized.as_str()))
        .map(|(key, _)| key.to_string())
        .unwrap_or(normalized)
}

/// Does a video codec match a target, through aliases in either direction?
pub fn video_codec_matches(current: Option<&str>, target: &str) -> bool {
    let Some(current) = current else {
        return false;
    };
    let current = current.to_lowercase();
    let target = target.to_lowercase();

    current == target
        || aliases_of(VIDEO_CODEC_ALIASES, &target).contains(&current.as_str())
        || aliases_of(VIDEO_CODEC_ALIASES, &current).contains(&target.as_str())
}

/// Does an audio codec match a policy pattern?
///
/// A pattern can be an exact codec, an alias group (`dts` matches every DTS
/// variant), or a glob (`pcm_*`). Two codecs in the same alias group match
/// each other; a bare substring never does, so `ac3` does not match `eac3`.
pub fn audio_codec_matches(codec: Option<&str>, pattern: &str) -> bool {
    let Some(codec) = codec else {
        return false;
    };
    let codec = normalize_codec(Some(codec));
    let pattern = pattern.trim().to_lowercase();

    if codec == pattern {
        return true;
    }

    if let Some((group, variants)) = AUDIO_CODEC_ALIASES.iter().find(|(k, _)| *k == pattern) {
        if variants
            .iter()
            .any(|v| codec == *v || codec.starts_with(v))
            || codec.starts_with(group)
        {
            return true;
        }
    }

    if pattern.contains(['*', '?', '[']) && glob_matches(&pattern, &codec) {
        return true;
    }

    let codec_group = canonical_codec(&codec, TrackType::Audio);
    let pattern_group = canonical_codec(&pattern, TrackType::Audio);
    codec_group == pattern_group && is_alias_key(AUDIO_CODEC_ALIASES, &codec_group)
}

fn is_alias_key(table: AliasTable, key: &str) -> bool {
    table.iter().any(|(k, _)| *k == key)
}

fn glob_matches(pattern: &str, value: &str) -> bool {
    match GlobBuilder::new(pattern).case_insensitive(true).build() {
        Ok(glob) => glob.compile_matcher().is_match(value),
        Err(_) => false,
    }
}

/// Does any pattern match? An empty list matches nothing.
pub fn audio_codec_matches_any(codec: Option<&str>, patterns: &[String]) -> bool {
    patterns.iter().any(|p| audio_codec_matches(codec, p))
}

/// Does a subtitle codec match a target, through aliases in either direction?
pub fn subtitle_codec_matches(codec: Option<&str>, target: &str) -> bool {
    let Some(codec) = codec else {
        return false;
    };
    let codec = normalize_codec(Some(codec));
    let target = target.trim().to_lowercase();

    codec == target
        || aliases_of(SUBTITLE_CODEC_ALIASES, &target).contains(&codec.as_str())
        || aliases_of(SUBTITLE_CODEC_ALIASES, &codec).contains(&target.as_str())
}

/// Dispatch to the matcher for the track's type. Other types never match.
pub fn codec_matches(codec: Option<&str>, target: &str, track_type: TrackType) -> bool {
    match track_type {
        TrackType::Video => video_codec_matches(codec, target),
        TrackType::Audio => audio_codec_matches(codec, target),
        TrackType::Subtitle => subtitle_codec_matches(codec, target),
        _ => false,
    }
}

pub fn is_codec_mp4_compatible(codec: &str, track_type: TrackType) -> bool {
    let normalized = codec.trim().to_lowercase();
    let set = match track_type {
        TrackType::Video => MP4_COMPATIBLE_VIDEO_CODECS,
        TrackType::Audio => MP4_COMPATIBLE_AUDIO_CODECS,
        TrackType::Subtitle => MP4_COMPATIBLE_SUBTITLE_CODECS,
        _ => return false,
    };
    set.contains(&normalized.as_str())
}

/// MP4 is checked against its tables; MKV and unknown containers accept everything.
pub fn is_codec_compatible(codec: &str, container: &str, track_type: TrackType) -> bool {
    match container.trim().to_lowercase().as_str() {
        "mp4" => is_codec_mp4_compatible(codec, track_type),
        _ => true,
    }
}

/// Default transcode target for an audio codec going into `container`.
pub fn transcode_default(codec: &str, container: &str) -> Option<TranscodeTarget> {
    if container.trim().to_lowercase() != "mp4" {
        return None;
    }
    let normalized = normalize_codec(Some(codec));
    if let Some((_, target)) = MP4_AUDIO_TRANSCODE_DEFAULTS
        .iter()
        .find(|(k, _)| *k == normalized)
    {
        return Some(*target);
    }

    const AUDIO_INCOMPATIBLE: &[&str] = &[
        "truehd", "dts-hd", "dts-hd ma", "dts", "dca", "vorbis", "pcm_s16le", "pcm_s24le",
        "pcm_s32le", "pcm_f32le", "pcm",
    ];
    if AUDIO_INCOMPATIBLE.contains(&normalized.as_str())
        || normalized.starts_with("pcm_")
        || normalized.starts_with("dts")
    {
        return Some(DEFAULT_AUDIO_TRANSCODE_TARGET);
    }
    None
}

/// Text subtitle that can become `mov_text`.
pub fn is_text_subtitle(codec: &str) -> bool {
    MP4_CONVERTIBLE_SUBTITLE_CODECS.contains(&normalize_codec(Some(codec)).as_str())
}

pub fn is_bitmap_subtitle(codec: &str) -> bool {
    BITMAP_SUBTITLE_CODECS.contains(&normalize_codec(Some(codec)).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_aliases_match_both_ways() {
        assert!(video_codec_matches(Some("HEVC"), "h265"));
        assert!(video_codec_matches(Some("hvc1"), "hevc"));
        assert!(video_codec_matches(Some("h264"), "avc"));
        assert!(!video_codec_matches(Some("h264"), "hevc"));
        assert!(!video_codec_matches(None, "hevc"));
    }

    #[test]
    fn audio_alias_group_matches_variants() {
        assert!(audio_codec_matches(Some("dca"), "dts"));
        assert!(audio_codec_matches(Some("DTS-HD MA"), "dts-hd"));
        assert!(audio_codec_matches(Some("Dolby TrueHD"), "truehd"));
        assert!(audio_codec_matches(Some("aac_latm"), "aac"));
    }

    #[test]
    fn audio_glob_patterns() {
        assert!(audio_codec_matches(Some("pcm_s24le"), "pcm_*"));
        assert!(audio_codec_matches(Some("PCM_S16LE"), "pcm_s?6le"));
        assert!(!audio_codec_matches(Some("flac"), "pcm_*"));
    }

    #[test]
    fn audio_does_not_match_on_bare_substring() {
        assert!(!audio_codec_matches(Some("eac3"), "ac3"));
        assert!(!audio_codec_matches(Some("ac3"), "eac3"));
        assert!(audio_codec_matches(Some("ec3"), "e-ac-3"));
    }

    #[test]
    fn subtitle_aliases() {
        assert!(subtitle_codec_matches(Some("srt"), "subrip"));
        assert!(subtitle_codec_matches(Some("hdmv_pgs_subtitle"), "pgs"));
        assert!(!subtitle_codec_matches(Some("ass"), "subrip"));
        assert!(codec_matches(Some("ssa"), "ass", TrackType::Subtitle));
        assert!(!codec_matches(Some("ttf"), "ttf", TrackType::Attachment));
    }

    #[test]
    fn mp4_compatibility() {
        assert!(is_codec_mp4_compatible("hevc", TrackType::Video));
        assert!(is_codec_mp4_compatible("AAC", TrackType::Audio));
        assert!(!is_codec_mp4_compatible("truehd", TrackType::Audio));
        assert!(!is_codec_mp4_compatible("subrip", TrackType::Subtitle));
        assert!(!is_codec_mp4_compatible("ttf", TrackType::Attachment));
        assert!(is_codec_compatible("truehd", "mkv", TrackType::Audio));
    }

    #[test]
    fn transcode_defaults() {
        assert_eq!(
            transcode_default("truehd", "mp4"),
            Some(TranscodeTarget::new("aac", "256k"))
        );
        assert_eq!(
            transcode_default("DTS-HD MA", "mp4"),
            Some(TranscodeTarget::new("aac", "320k"))
        );
        assert_eq!(transcode_default("pcm_f32le", "mp4"), Some(DEFAULT_AUDIO_TRANSCODE_TARGET));
        assert_eq!(transcode_default("hevc", "mp4"), None);
        assert_eq!(transcode_default("truehd", "mkv"), None);
    }

    #[test]
    fn subtitle_kinds() {
        assert!(is_text_subtitle("SRT"));
        assert!(is_bitmap_subtitle("dvd_subtitle"));
        assert!(!is_bitmap_subtitle("ass"));
    }

    #[test]
    fn canonical_codecs() {
        assert_eq!(canonical_codec("hvc1", TrackType::Video), "hevc");
        assert_eq!(canonical_codec("a52", TrackType::Audio), "ac3");
        assert_eq!(canonical_codec("weird", TrackType::Audio), "weird");
    }
}
