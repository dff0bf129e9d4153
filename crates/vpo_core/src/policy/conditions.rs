//! Condition and track filter types for conditional rules.
//!
//! Conditions are a closed enum, externally tagged in policy documents:
//!
//! ```toml
//! when = { exists = { track_type = "audio", language = "jpn", channels = { gte = 6 } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Scalar, TrackType};

/// Accept either a single string or a list of strings.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => Some(vec![s]),
        Some(OneOrMany::Many(v)) => Some(v),
        None => None,
    })
}

/// Numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl ComparisonOperator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
        }
    }

    pub fn apply(&self, actual: i64, expected: i64) -> bool {
        match self {
            Self::Eq => actual == expected,
            Self::Lt => actual < expected,
            Self::Lte => actual <= expected,
            Self::Gt => actual > expected,
            Self::Gte => actual >= expected,
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single-operator comparison, written `{ gte = 2160 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct Comparison {
    pub operator: ComparisonOperator,
    pub value: i64,
}

impl Comparison {
    pub fn new(operator: ComparisonOperator, value: i64) -> Self {
        Self { operator, value }
    }

    pub fn matches(&self, actual: i64) -> bool {
        self.operator.apply(actual, self.value)
    }
}

impl TryFrom<BTreeMap<String, i64>> for Comparison {
    type Error = String;

    fn try_from(map: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "comparison must specify exactly one operator (eq/lt/lte/gt/gte), got {}",
                map.len()
            ));
        }
        let (name, value) = map.into_iter().next().ok_or("empty comparison")?;
        let operator = match name.as_str() {
            "eq" => ComparisonOperator::Eq,
            "lt" => ComparisonOperator::Lt,
            "lte" => ComparisonOperator::Lte,
            "gt" => ComparisonOperator::Gt,
            "gte" => ComparisonOperator::Gte,
            other => return Err(format!("unknown comparison operator '{other}'")),
        };
        Ok(Self { operator, value })
    }
}

impl From<Comparison> for BTreeMap<String, i64> {
    fn from(c: Comparison) -> Self {
        BTreeMap::from([(c.operator.name().to_string(), c.value)])
    }
}

/// Exact value or comparison for numeric track fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericFilter {
    Exact(i64),
    Compare(Comparison),
}

impl NumericFilter {
    /// Absent values never match.
    pub fn matches(&self, actual: Option<u32>) -> bool {
        let Some(actual) = actual.map(i64::from) else {
            return false;
        };
        match self {
            Self::Exact(v) => actual == *v,
            Self::Compare(c) => c.matches(actual),
        }
    }
}

/// Explicit title matcher: exactly one of `contains` or `regex`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TitleMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// Title filter: a bare string means case-insensitive substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleFilter {
    Contains(String),
    Match(TitleMatch),
}

/// Per-track criteria; every set field must match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackFilters {
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub language: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub codec: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_forced: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<NumericFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<NumericFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<NumericFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_commentary: Option<bool>,
}

impl TrackFilters {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(vec![language.into()]);
        self
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(vec![codec.into()]);
        self
    }

    pub fn with_channels(mut self, filter: NumericFilter) -> Self {
        self.channels = Some(filter);
        self
    }

    pub fn with_not_commentary(mut self) -> Self {
        self.not_commentary = Some(true);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsCondition {
    pub track_type: TrackType,
    #[serde(flatten)]
    pub filters: TrackFilters,
}

/// Track count comparison, written with the operator inline:
/// `{ track_type = "audio", language = "eng", gte = 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCountCondition", into = "RawCountCondition")]
pub struct CountCondition {
    pub track_type: TrackType,
    pub filters: TrackFilters,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCountCondition {
    track_type: TrackType,
    #[serde(flatten)]
    filters: TrackFilters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eq: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lte: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gte: Option<i64>,
}

impl TryFrom<RawCountCondition> for CountCondition {
    type Error = String;

    fn try_from(raw: RawCountCondition) -> Result<Self, Self::Error> {
        let set: Vec<(ComparisonOperator, i64)> = [
            (ComparisonOperator::Eq, raw.eq),
            (ComparisonOperator::Lt, raw.lt),
            (ComparisonOperator::Lte, raw.lte),
            (ComparisonOperator::Gt, raw.gt),
            (ComparisonOperator::Gte, raw.gte),
        ]
        .into_iter()
        .filter_map(|(op, v)| v.map(|v| (op, v)))
        .collect();

        match set.as_slice() {
            [(operator, value)] => Ok(Self {
                track_type: raw.track_type,
                filters: raw.filters,
                comparison: Comparison::new(*operator, *value),
            }),
            [] => Err(
                "count condition must specify exactly one count operator (eq/lt/lte/gt/gte)".into(),
            ),
            _ => Err("count condition must specify only one count operator".into()),
        }
    }
}

impl From<CountCondition> for RawCountCondition {
    fn from(c: CountCondition) -> Self {
        let mut raw = RawCountCondition {
            track_type: c.track_type,
            filters: c.filters,
            eq: None,
            lt: None,
            lte: None,
            gt: None,
            gte: None,
        };
        let slot = match c.comparison.operator {
            ComparisonOperator::Eq => &mut raw.eq,
            ComparisonOperator::Lt => &mut raw.lt,
            ComparisonOperator::Lte => &mut raw.lte,
            ComparisonOperator::Gt => &mut raw.gt,
            ComparisonOperator::Gte => &mut raw.gte,
        };
        *slot = Some(c.comparison.value);
        raw
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioIsMultiLanguageCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_index: Option<u32>,
    /// Minimum share of a secondary language, `0.0..=1.0`.
    #[serde(default = "default_multi_language_threshold")]
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_language: Option<String>,
}

fn default_multi_language_threshold() -> f64 {
    0.05
}

impl Default for AudioIsMultiLanguageCondition {
    fn default() -> Self {
        Self {
            track_index: None,
            threshold: default_multi_language_threshold(),
            primary_language: None,
        }
    }
}

/// Operators for plugin metadata and container tag comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataOperator {
    #[default]
    Eq,
    Neq,
    Contains,
    Lt,
    Lte,
    Gt,
    Gte,
    Exists,
}

impl MetadataOperator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Contains => "contains",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Exists => "exists",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Lt | Self::Lte | Self::Gt | Self::Gte)
    }
}

impl std::fmt::Display for MetadataOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMetadataCondition {
    pub plugin: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default)]
    pub operator: MetadataOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetadataCondition {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default)]
    pub operator: MetadataOperator,
}

/// Shared shape of `is_original`, `is_dubbed` and `is_commentary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationCondition {
    #[serde(default = "default_true")]
    pub value: bool,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_min_confidence() -> f64 {
    0.7
}

impl Default for ClassificationCondition {
    fn default() -> Self {
        Self {
            value: true,
            min_confidence: default_min_confidence(),
            language: None,
        }
    }
}

/// A rule condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Exists(ExistsCondition),
    Count(CountCondition),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
    AudioIsMultiLanguage(AudioIsMultiLanguageCondition),
    PluginMetadata(PluginMetadataCondition),
    ContainerMetadata(ContainerMetadataCondition),
    IsOriginal(ClassificationCondition),
    IsDubbed(ClassificationCondition),
    IsCommentary(ClassificationCondition),
}

impl Condition {
    /// `exists` over a track type with the given filters.
    pub fn exists(track_type: TrackType, filters: TrackFilters) -> Self {
        Self::Exists(ExistsCondition { track_type, filters })
    }

    pub fn count(track_type: TrackType, filters: TrackFilters, comparison: Comparison) -> Self {
        Self::Count(CountCondition {
            track_type,
            filters,
            comparison,
        })
    }

    pub fn plugin_metadata(
        plugin: impl Into<String>,
        field: impl Into<String>,
        operator: MetadataOperator,
        value: Option<Scalar>,
    ) -> Self {
        Self::PluginMetadata(PluginMetadataCondition {
            plugin: plugin.into(),
            field: field.into(),
            value,
            operator,
        })
    }

    pub fn container_metadata(
        field: impl Into<String>,
        operator: MetadataOperator,
        value: Option<Scalar>,
    ) -> Self {
        Self::ContainerMetadata(ContainerMetadataCondition {
            field: field.into(),
            value,
            operator,
        })
    }

    /// Walk this condition and every nested one.
    pub fn visit(&self, f: &mut dyn FnMut(&Condition)) {
        f(self);
        match self {
            Self::And(items) | Self::Or(items) => items.iter().for_each(|c| c.visit(f)),
            Self::Not(inner) => inner.visit(f),
            _ => {}
        }
    }
}
