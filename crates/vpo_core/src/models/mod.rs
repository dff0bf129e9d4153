//! Data models for the policy engine.
//!
//! This module contains the structures exchanged with the engine:
//! - Enums for track types, ordering categories, transcription classes
//! - The track snapshot (`TrackInfo`) and precomputed signal maps
//! - Plan output (actions, dispositions, container change, rule results)
//! - Audio synthesis plans

mod actions;
mod conditional;
mod container;
mod enums;
mod media;
mod plan;
mod signals;
mod synthesis;

// Re-export all public types
pub use actions::{ActionKind, PlannedAction, TrackDisposition};
pub use conditional::{
    ConditionalResult, ContainerMetadataChange, RuleBranch, RuleEvaluation, SkipFlags, TrackFlag,
    TrackFlagChange, TrackLanguageChange,
};
pub use container::{
    ContainerChange, ContainerTranscodePlan, IncompatibleTrackPlan, TranscodeAction,
};
pub use enums::{DispositionAction, TrackCategory, TrackType, TranscriptionClass};
pub use media::TrackInfo;
pub use plan::Plan;
pub use signals::{
    track_key, ClassificationResults, CommentaryStatus, ContainerTags, LanguageAnalysisResult,
    LanguageClassification, LanguagePercentage, LanguageResults, OriginalDubbedStatus,
    PluginMetadata, Scalar, TrackClassificationResult, TranscriptionInfo, TranscriptionMap,
};
pub use synthesis::{
    AudioCodec, SkipReason, SkippedSynthesis, SourceTrackSelection, SynthesisOperation,
    SynthesisPlan, TrackOrderEntry, TrackOrigin,
};
