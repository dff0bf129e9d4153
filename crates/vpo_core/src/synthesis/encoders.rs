//! Encoder lookup and bitrate resolution for synthesized tracks.

use std::collections::BTreeSet;

use crate::evaluator::{PolicyError, PolicyResult};
use crate::models::AudioCodec;

/// Answers whether an FFmpeg encoder can be used on this host.
///
/// The engine never probes FFmpeg itself; callers hand in whatever they
/// learned from `ffmpeg -encoders` (or configuration).
pub trait EncoderAvailability: Send + Sync {
    fn is_available(&self, encoder: &str) -> bool;
}

/// A fixed set of encoder names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderSet {
    encoders: BTreeSet<String>,
}

impl EncoderSet {
    pub fn new<S: Into<String>>(encoders: impl IntoIterator<Item = S>) -> Self {
        Self {
            encoders: encoders.into_iter().map(Into::into).collect(),
        }
    }

    /// Every encoder the synthesis codecs map to.
    pub fn all_supported() -> Self {
        Self::new(AudioCodec::all().iter().map(|c| encoder_for(*c)))
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.encoders.iter().map(String::as_str)
    }
}

impl EncoderAvailability for EncoderSet {
    fn is_available(&self, encoder: &str) -> bool {
        self.encoders.contains(encoder)
    }
}

/// FFmpeg encoder name for a target codec.
pub fn encoder_for(codec: AudioCodec) -> &'static str {
    match codec {
        AudioCodec::Eac3 => "eac3",
        AudioCodec::Aac => "aac",
        AudioCodec::Ac3 => "ac3",
        AudioCodec::Opus => "libopus",
        AudioCodec::Flac => "flac",
    }
}

/// FFmpeg output format for a target codec.
pub fn output_format_for(codec: AudioCodec) -> &'static str {
    match codec {
        AudioCodec::Eac3 => "eac3",
        AudioCodec::Aac => "adts",
        AudioCodec::Ac3 => "ac3",
        AudioCodec::Opus => "opus",
        AudioCodec::Flac => "flac",
    }
}

pub fn is_encoder_available(codec: AudioCodec, encoders: &dyn EncoderAvailability) -> bool {
    encoders.is_available(encoder_for(codec))
}

/// Parse `"640k"`, `"1.5M"` or a plain bits-per-second integer.
pub fn parse_bitrate(bitrate: &str) -> PolicyResult<u32> {
    let invalid = || PolicyError::invalid_policy(format!("Invalid bitrate format: {bitrate}"));
    let normalized = bitrate.trim().to_lowercase();

    let (number, multiplier) = if let Some(n) = normalized.strip_suffix('k') {
        (n, 1_000.0)
    } else if let Some(n) = normalized.strip_suffix('m') {
        (n, 1_000_000.0)
    } else {
        return normalized.parse::<u32>().map_err(|_| invalid());
    };

    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    let bits = value * multiplier;
    if !bits.is_finite() || bits < 0.0 || bits > f64::from(u32::MAX) {
        return Err(invalid());
    }
    Ok(bits as u32)
}

/// Default bitrates per channel count, ascending.
fn default_bitrate_table(codec: AudioCodec) -> &'static [(u32, u32)] {
    match codec {
        AudioCodec::Eac3 => &[(2, 384_000), (6, 640_000), (8, 768_000)],
        AudioCodec::Aac => &[(2, 192_000), (6, 384_000), (8, 512_000)],
        AudioCodec::Ac3 => &[(2, 192_000), (6, 448_000)],
        AudioCodec::Opus => &[(2, 128_000), (6, 256_000), (8, 384_000)],
        AudioCodec::Flac => &[],
    }
}

/// Default bitrate for `channels`: exact entry, else the next larger
/// channel count, else the largest. `None` for lossless codecs.
pub fn default_bitrate(codec: AudioCodec, channels: u32) -> Option<u32> {
    let table = default_bitrate_table(codec);
    table
        .iter()
        .find(|(ch, _)| *ch >= channels)
        .or_else(|| table.last())
        .map(|(_, bitrate)| *bitrate)
}

/// Explicit bitrate when given, otherwise the codec default.
pub fn resolve_bitrate(
    codec: AudioCodec,
    channels: u32,
    specified: Option<&str>,
) -> PolicyResult<Option<u32>> {
    if codec.is_lossless() {
        return Ok(None);
    }
    match specified {
        Some(bitrate) => parse_bitrate(bitrate).map(Some),
        None => Ok(default_bitrate(codec, channels)),
    }
}
