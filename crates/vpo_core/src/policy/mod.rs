//! Policy schema.
//!
//! - `types`: the flat [`EvaluationPolicy`] and its config sections
//! - `conditions`: rule conditions and per-track filters
//! - `rules`: conditional rules and their actions
//! - `synthesis`: audio synthesis track definitions
//! - `loader`: TOML/JSON loading with validation

pub mod conditions;
pub mod loader;
pub mod rules;
pub mod synthesis;
pub mod types;

pub use conditions::{
    AudioIsMultiLanguageCondition, ClassificationCondition, Comparison, ComparisonOperator,
    Condition, ContainerMetadataCondition, CountCondition, ExistsCondition, MetadataOperator,
    NumericFilter, PluginMetadataCondition, TitleFilter, TitleMatch, TrackFilters,
};
pub use loader::{load_policy_file, load_policy_str, LoaderError, LoaderResult, PolicyFormat};
pub use rules::{
    ConditionalAction, ConditionalRule, MatchMode, PluginMetadataReference, RulesConfig,
    SetContainerMetadataAction, SetDefaultAction, SetForcedAction, SetLanguageAction, SkipType,
};
pub use synthesis::{
    AudioSynthesisConfig, ChannelConfig, ChannelExtreme, ChannelPreference, ChannelPreset,
    Inheritable, PositionKeyword, PreferenceCriterion, SkipIfExists, SourcePreferences,
    SynthesisTrackDefinition, TrackPosition,
};
pub use types::{
    validate_bitrate, AttachmentFilterConfig, AudioFilterConfig, CodecTranscodeMapping,
    ContainerConfig, ContainerTarget, DefaultFlagsConfig, EvaluationPolicy, IncompatibleCodecMode,
    LanguageFallbackMode, SubtitleFilterConfig, TrackActionsConfig, TranscriptionPolicyOptions,
    POLICY_SCHEMA_VERSION,
};
