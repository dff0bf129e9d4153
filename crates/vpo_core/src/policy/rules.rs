//! Conditional rule definitions.

use serde::{Deserialize, Serialize};

use super::conditions::Condition;
use crate::models::TrackType;

/// How a rule list is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Stop at the first rule whose condition holds.
    #[default]
    First,
    /// Evaluate every rule.
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "match", default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub items: Vec<ConditionalRule>,
}

impl RulesConfig {
    pub fn new(match_mode: MatchMode, items: Vec<ConditionalRule>) -> Self {
        Self { match_mode, items }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub name: String,
    pub when: Condition,
    #[serde(rename = "then", default)]
    pub then_actions: Vec<ConditionalAction>,
    #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
    pub else_actions: Option<Vec<ConditionalAction>>,
}

impl ConditionalRule {
    pub fn new(
        name: impl Into<String>,
        when: Condition,
        then_actions: Vec<ConditionalAction>,
    ) -> Self {
        Self {
            name: name.into(),
            when,
            then_actions,
            else_actions: None,
        }
    }

    pub fn with_else(mut self, actions: Vec<ConditionalAction>) -> Self {
        self.else_actions = Some(actions);
        self
    }
}

/// Processing step a `skip` action switches off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipType {
    VideoTranscode,
    AudioTranscode,
    TrackFilter,
}

/// Pointer at a plugin-provided value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadataReference {
    pub plugin: String,
    pub field: String,
}

fn default_subtitle() -> TrackType {
    TrackType::Subtitle
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetForcedAction {
    #[serde(default = "default_subtitle")]
    pub track_type: TrackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default = "default_true")]
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDefaultAction {
    pub track_type: TrackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default = "default_true")]
    pub value: bool,
}

/// Exactly one of `new_language` and `from_plugin_metadata` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLanguageAction {
    pub track_type: TrackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_plugin_metadata: Option<PluginMetadataReference>,
    /// Only retag tracks currently in this language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_language: Option<String>,
}

/// Exactly one of `value` and `from_plugin_metadata` is set; an empty
/// value clears the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetContainerMetadataAction {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_plugin_metadata: Option<PluginMetadataReference>,
}

/// One action in a rule's `then`/`else` list.
///
/// Messages for `warn` and `fail` may use `{filename}`, `{path}` and
/// `{rule_name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalAction {
    Skip(SkipType),
    Warn(String),
    Fail(String),
    SetForced(SetForcedAction),
    SetDefault(SetDefaultAction),
    SetLanguage(SetLanguageAction),
    SetContainerMetadata(SetContainerMetadataAction),
}
