//! Value matching shared by every evaluator stage.
//!
//! - `language`: ISO 639 normalization and comparison
//! - `codecs`: alias-aware codec matching and container compatibility tables
//! - `commentary`: title-based commentary detection

pub mod codecs;
pub mod commentary;
pub mod language;

pub use codecs::{
    audio_codec_matches, audio_codec_matches_any, codec_matches, is_codec_compatible,
    is_codec_mp4_compatible, normalize_codec, subtitle_codec_matches, video_codec_matches,
};
pub use commentary::{CommentaryMatcher, DEFAULT_COMMENTARY_PATTERNS};
pub use language::{language_in, languages_match, normalize_language};
