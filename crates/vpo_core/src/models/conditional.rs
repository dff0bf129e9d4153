//! Outputs of conditional rule evaluation.

use serde::{Deserialize, Serialize};

/// Processing steps a rule can switch off for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipFlags {
    #[serde(default)]
    pub skip_video_transcode: bool,
    #[serde(default)]
    pub skip_audio_transcode: bool,
    #[serde(default)]
    pub skip_track_filter: bool,
}

impl SkipFlags {
    pub fn any(&self) -> bool {
        self.skip_video_transcode || self.skip_audio_transcode || self.skip_track_filter
    }
}

/// Which branch of a rule ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleBranch {
    Then,
    Else,
}

/// One rule's condition outcome, kept for the evaluation trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub rule_name: String,
    pub matched: bool,
    pub reason: String,
}

/// Track flag a rule action can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackFlag {
    Default,
    Forced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackFlagChange {
    pub track_index: u32,
    pub flag: TrackFlag,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackLanguageChange {
    pub track_index: u32,
    pub new_language: String,
}

/// Container tag change; an empty `new_value` deletes the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetadataChange {
    pub field: String,
    pub new_value: String,
}

/// Everything the rule evaluator decided for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_branch: Option<RuleBranch>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub evaluation_trace: Vec<RuleEvaluation>,
    #[serde(default)]
    pub skip_flags: SkipFlags,
    #[serde(default)]
    pub track_flag_changes: Vec<TrackFlagChange>,
    #[serde(default)]
    pub track_language_changes: Vec<TrackLanguageChange>,
    #[serde(default)]
    pub container_metadata_changes: Vec<ContainerMetadataChange>,
}
