//! Precomputed per-file signals supplied alongside the track snapshot.
//!
//! These are produced by external services (transcription, language analysis,
//! original/dubbed classification, plugins) and handed to the engine as plain
//! maps. Maps keyed by track use the track's database id when it has one and
//! its stream index otherwise; see [`track_key`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::TranscriptionClass;
use super::media::TrackInfo;

/// Key used to look a track up in the signal maps.
pub fn track_key(track: &TrackInfo) -> i64 {
    track.id.unwrap_or(i64::from(track.index))
}

/// Transcription output for one audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    pub confidence_score: f64,
    /// Role of the track as detected by the transcriber.
    pub track_type: TranscriptionClass,
}

impl TranscriptionInfo {
    pub fn new(track_type: TranscriptionClass, confidence_score: f64) -> Self {
        Self {
            detected_language: None,
            confidence_score,
            track_type,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.detected_language = Some(language.into());
        self
    }
}

/// Transcription results keyed by [`track_key`].
pub type TranscriptionMap = BTreeMap<i64, TranscriptionInfo>;

/// Whether an audio track contains one or several spoken languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LanguageClassification {
    SingleLanguage,
    MultiLanguage,
}

/// Share of speech in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePercentage {
    pub language_code: String,
    /// Fraction in `0.0..=1.0`.
    pub percentage: f64,
}

/// Per-track language analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageAnalysisResult {
    pub primary_language: String,
    pub primary_percentage: f64,
    #[serde(default)]
    pub secondary_languages: Vec<LanguagePercentage>,
    pub classification: LanguageClassification,
}

impl LanguageAnalysisResult {
    /// Result for a track with a single spoken language.
    pub fn single(primary_language: impl Into<String>) -> Self {
        Self {
            primary_language: primary_language.into(),
            primary_percentage: 1.0,
            secondary_languages: Vec::new(),
            classification: LanguageClassification::SingleLanguage,
        }
    }

    /// Result for a multi-language track; the primary share is what remains.
    pub fn multi(primary_language: impl Into<String>, secondary: Vec<(String, f64)>) -> Self {
        let secondary_total: f64 = secondary.iter().map(|(_, p)| p).sum();
        Self {
            primary_language: primary_language.into(),
            primary_percentage: (1.0 - secondary_total).max(0.0),
            secondary_languages: secondary
                .into_iter()
                .map(|(language_code, percentage)| LanguagePercentage {
                    language_code,
                    percentage,
                })
                .collect(),
            classification: LanguageClassification::MultiLanguage,
        }
    }
}

/// Language analysis keyed by track id.
pub type LanguageResults = BTreeMap<i64, LanguageAnalysisResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginalDubbedStatus {
    Original,
    Dubbed,
    Unknown,
}

impl OriginalDubbedStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Dubbed => "dubbed",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentaryStatus {
    Commentary,
    Main,
    Unknown,
}

impl CommentaryStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Commentary => "commentary",
            Self::Main => "main",
            Self::Unknown => "unknown",
        }
    }
}

/// Original/dubbed and commentary classification for one audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackClassificationResult {
    pub original_dubbed_status: OriginalDubbedStatus,
    #[serde(default = "default_commentary_status")]
    pub commentary_status: CommentaryStatus,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn default_commentary_status() -> CommentaryStatus {
    CommentaryStatus::Unknown
}

impl TrackClassificationResult {
    pub fn new(original_dubbed_status: OriginalDubbedStatus, confidence: f64) -> Self {
        Self {
            original_dubbed_status,
            commentary_status: CommentaryStatus::Unknown,
            confidence,
            detection_method: None,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_commentary_status(mut self, status: CommentaryStatus) -> Self {
        self.commentary_status = status;
        self
    }
}

/// Classification results keyed by track id.
pub type ClassificationResults = BTreeMap<i64, TrackClassificationResult>;

/// Container-level tags, keys lower-cased by the caller.
pub type ContainerTags = BTreeMap<String, String>;

/// A plugin-provided field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Numeric view; only integers and floats count as numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Quoted rendering used in reason strings.
    pub fn repr(&self) -> String {
        match self {
            Self::String(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }

    /// Equality across numeric variants, exact otherwise.
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Plugin-provided metadata for one file: plugin name → field → value.
///
/// Plugin names and field names are stored lower-cased so every lookup is
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, BTreeMap<String, Scalar>>")]
#[serde(into = "BTreeMap<String, BTreeMap<String, Scalar>>")]
pub struct PluginMetadata {
    plugins: BTreeMap<String, BTreeMap<String, Scalar>>,
}

impl PluginMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one field value, replacing any previous value.
    pub fn insert(&mut self, plugin: &str, field: &str, value: impl Into<Scalar>) {
        self.plugins
            .entry(plugin.to_lowercase())
            .or_default()
            .insert(field.to_lowercase(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_field(mut self, plugin: &str, field: &str, value: impl Into<Scalar>) -> Self {
        self.insert(plugin, field, value);
        self
    }

    /// All fields reported by one plugin.
    pub fn plugin(&self, plugin: &str) -> Option<&BTreeMap<String, Scalar>> {
        self.plugins.get(&plugin.to_lowercase())
    }

    /// One field of one plugin.
    pub fn get(&self, plugin: &str, field: &str) -> Option<&Scalar> {
        self.plugin(plugin)
            .and_then(|fields| fields.get(&field.to_lowercase()))
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl From<BTreeMap<String, BTreeMap<String, Scalar>>> for PluginMetadata {
    fn from(raw: BTreeMap<String, BTreeMap<String, Scalar>>) -> Self {
        let mut metadata = Self::new();
        for (plugin, fields) in raw {
            for (field, value) in fields {
                metadata.insert(&plugin, &field, value);
            }
        }
        metadata
    }
}

impl From<PluginMetadata> for BTreeMap<String, BTreeMap<String, Scalar>> {
    fn from(metadata: PluginMetadata) -> Self {
        metadata.plugins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_key_prefers_database_id() {
        let with_id = TrackInfo::audio(3, "aac", "eng").with_id(42);
        let without_id = TrackInfo::audio(3, "aac", "eng");
        assert_eq!(track_key(&with_id), 42);
        assert_eq!(track_key(&without_id), 3);
    }

    #[test]
    fn plugin_metadata_lookup_is_case_insensitive() {
        let metadata = PluginMetadata::new().with_field("Radarr", "Original_Language", "jpn");
        assert_eq!(
            metadata.get("radarr", "original_language"),
            Some(&Scalar::from("jpn"))
        );
        assert_eq!(
            metadata.get("RADARR", "ORIGINAL_LANGUAGE"),
            Some(&Scalar::from("jpn"))
        );
        assert!(metadata.get("sonarr", "original_language").is_none());
    }

    #[test]
    fn plugin_metadata_deserializes_and_normalizes_keys() {
        let json = r#"{"Radarr":
            {"Year": 1999, "rating": 8.5, "monitored": true, "tag": null, "lang": "eng"}}"#;
        let metadata: PluginMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.get("radarr", "year"), Some(&Scalar::Int(1999)));
        assert_eq!(metadata.get("radarr", "rating"), Some(&Scalar::Float(8.5)));
        assert_eq!(metadata.get("radarr", "monitored"), Some(&Scalar::Bool(true)));
        assert_eq!(metadata.get("radarr", "tag"), Some(&Scalar::Null));
        assert_eq!(metadata.get("radarr", "lang"), Some(&Scalar::from("eng")));
    }

    #[test]
    fn scalar_loose_eq_crosses_numeric_variants() {
        assert!(Scalar::Int(2).loose_eq(&Scalar::Float(2.0)));
        assert!(!Scalar::Int(2).loose_eq(&Scalar::from("2")));
        assert_eq!(Scalar::from("jpn").repr(), "\"jpn\"");
    }

    #[test]
    fn multi_language_result_fills_primary_share() {
        let result = LanguageAnalysisResult::multi("eng", vec![("fre".into(), 0.25)]);
        assert_eq!(result.classification, LanguageClassification::MultiLanguage);
        assert!((result.primary_percentage - 0.75).abs() < 1e-9);
    }
}
