//! Conditional rule evaluation and action execution.

use std::path::Path;

use super::conditions::{evaluate_condition, EvaluationContext};
use super::errors::{PolicyError, PolicyResult};
use crate::matching::languages_match;
use crate::models::{
    ConditionalResult, ContainerMetadataChange, PluginMetadata, RuleBranch, RuleEvaluation,
    TrackFlag, TrackFlagChange, TrackInfo, TrackLanguageChange, TrackType,
};
use crate::policy::{
    ConditionalAction, ConditionalRule, MatchMode, PluginMetadataReference, RulesConfig,
    SetContainerMetadataAction, SetLanguageAction, SkipType,
};

/// Substitute `{filename}`, `{path}` and `{rule_name}` in an action message.
///
/// An unknown placeholder leaves the message untouched and appends a note
/// naming it. `{{` and `}}` produce literal braces.
pub fn substitute_placeholders(message: &str, file_path: &Path, rule_name: &str) -> String {
    let filename = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let path = file_path.display().to_string();

    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }
        let Some(end) = tail.find('}') else {
            out.push_str(tail);
            rest = "";
            break;
        };
        let name = &tail[1..end];
        match name {
            "filename" => out.push_str(&filename),
            "path" => out.push_str(&path),
            "rule_name" => out.push_str(rule_name),
            other => return format!("{message} [invalid placeholder: '{other}']"),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Shared state while a rule's actions run.
struct ActionContext<'a> {
    tracks: &'a [TrackInfo],
    file_path: &'a Path,
    rule_name: &'a str,
    plugin_metadata: Option<&'a PluginMetadata>,
}

fn tracks_for<'t>(
    tracks: &'t [TrackInfo],
    track_type: TrackType,
    language: Option<&str>,
) -> Vec<&'t TrackInfo> {
    tracks
        .iter()
        .filter(|t| t.track_type == track_type)
        .filter(|t| match language {
            Some(wanted) => t
                .language
                .as_deref()
                .is_some_and(|actual| languages_match(actual, wanted)),
            None => true,
        })
        .collect()
}

fn resolve_plugin_value(
    reference: &PluginMetadataReference,
    metadata: Option<&PluginMetadata>,
    action: &str,
) -> Option<String> {
    let Some(metadata) = metadata else {
        tracing::warn!("{}: no plugin metadata available", action);
        return None;
    };
    match metadata.get(&reference.plugin, &reference.field) {
        Some(value) if !value.is_null() => Some(value.to_string()),
        _ => {
            tracing::warn!(
                "{}: field '{}' not found in plugin '{}' metadata",
                action,
                reference.field,
                reference.plugin
            );
            None
        }
    }
}

fn execute_set_language(
    action: &SetLanguageAction,
    ctx: &ActionContext<'_>,
    result: &mut ConditionalResult,
) {
    let new_language = match (&action.new_language, &action.from_plugin_metadata) {
        (Some(language), _) => Some(language.clone()),
        (None, Some(reference)) => {
            resolve_plugin_value(reference, ctx.plugin_metadata, "set_language")
        }
        (None, None) => None,
    };
    let Some(new_language) = new_language else {
        tracing::debug!(
            "set_language skipped: could not resolve language for {}",
            ctx.file_path.display()
        );
        return;
    };

    let matching = tracks_for(ctx.tracks, action.track_type, action.match_language.as_deref());
    if matching.is_empty() {
        tracing::warn!(
            "set_language: no matching {} tracks found in {}",
            action.track_type,
            ctx.file_path.display()
        );
        return;
    }
    for track in matching {
        result.track_language_changes.push(TrackLanguageChange {
            track_index: track.index,
            new_language: new_language.clone(),
        });
    }
}

fn execute_set_container_metadata(
    action: &SetContainerMetadataAction,
    ctx: &ActionContext<'_>,
    result: &mut ConditionalResult,
) {
    let value = match (&action.value, &action.from_plugin_metadata) {
        (Some(value), _) => Some(value.clone()),
        (None, Some(reference)) => {
            resolve_plugin_value(reference, ctx.plugin_metadata, "set_container_metadata")
        }
        (None, None) => None,
    };
    let Some(new_value) = value else {
        tracing::debug!(
            "set_container_metadata skipped: no value for field '{}'",
            action.field
        );
        return;
    };
    result.container_metadata_changes.push(ContainerMetadataChange {
        field: action.field.clone(),
        new_value,
    });
}

fn execute_actions(
    actions: &[ConditionalAction],
    ctx: &ActionContext<'_>,
    result: &mut ConditionalResult,
) -> PolicyResult<()> {
    for action in actions {
        match action {
            ConditionalAction::Skip(skip) => match skip {
                SkipType::VideoTranscode => result.skip_flags.skip_video_transcode = true,
                SkipType::AudioTranscode => result.skip_flags.skip_audio_transcode = true,
                SkipType::TrackFilter => result.skip_flags.skip_track_filter = true,
            },
            ConditionalAction::Warn(message) => {
                let message = substitute_placeholders(message, ctx.file_path, ctx.rule_name);
                tracing::warn!("{}", message);
                result.warnings.push(message);
            }
            ConditionalAction::Fail(message) => {
                let message = substitute_placeholders(message, ctx.file_path, ctx.rule_name);
                return Err(PolicyError::conditional_fail(
                    ctx.rule_name,
                    message,
                    ctx.file_path.display().to_string(),
                ));
            }
            ConditionalAction::SetForced(set) => {
                let matching = tracks_for(ctx.tracks, set.track_type, set.language.as_deref());
                if matching.is_empty() {
                    tracing::warn!(
                        "set_forced: no matching {} tracks found in {}",
                        set.track_type,
                        ctx.file_path.display()
                    );
                }
                for track in matching {
                    result.track_flag_changes.push(TrackFlagChange {
                        track_index: track.index,
                        flag: TrackFlag::Forced,
                        value: set.value,
                    });
                }
            }
            ConditionalAction::SetDefault(set) => {
                match tracks_for(ctx.tracks, set.track_type, set.language.as_deref()).first() {
                    Some(track) => result.track_flag_changes.push(TrackFlagChange {
                        track_index: track.index,
                        flag: TrackFlag::Default,
                        value: set.value,
                    }),
                    None => tracing::warn!(
                        "set_default: no matching {} tracks found in {}",
                        set.track_type,
                        ctx.file_path.display()
                    ),
                }
            }
            ConditionalAction::SetLanguage(set) => execute_set_language(set, ctx, result),
            ConditionalAction::SetContainerMetadata(set) => {
                execute_set_container_metadata(set, ctx, result)
            }
        }
    }
    Ok(())
}

fn run_branch(
    rule: &ConditionalRule,
    branch: RuleBranch,
    ctx: &ActionContext<'_>,
    result: &mut ConditionalResult,
) -> PolicyResult<()> {
    let actions: &[ConditionalAction] = match branch {
        RuleBranch::Then => &rule.then_actions,
        RuleBranch::Else => rule.else_actions.as_deref().unwrap_or_default(),
    };
    result.matched_rule = Some(rule.name.clone());
    result.matched_branch = Some(branch);
    execute_actions(actions, ctx, result)
}

/// Evaluate a rule list against one file.
///
/// In `first` mode the first rule whose condition holds runs its `then`
/// actions; when none holds, the last rule's `else` actions run if it has
/// any. In `all` mode every rule runs `then` or `else`. Every evaluated
/// condition lands in the trace. A `fail` action aborts immediately.
///
/// Conditions see `context`, including its commentary matcher; build it
/// with [`EvaluationContext::for_policy`] to honour a policy's patterns.
pub fn evaluate_conditional_rules(
    rules: &RulesConfig,
    context: &EvaluationContext<'_>,
    file_path: &Path,
) -> PolicyResult<ConditionalResult> {
    let mut result = ConditionalResult::default();
    let tracks = context.tracks;
    let plugin_metadata = context.plugin_metadata;

    for rule in &rules.items {
        let (matched, reason) = evaluate_condition(&rule.when, context);
        tracing::debug!("Rule '{}': {}", rule.name, reason);
        result.evaluation_trace.push(RuleEvaluation {
            rule_name: rule.name.clone(),
            matched,
            reason,
        });

        let ctx = ActionContext {
            tracks,
            file_path,
            rule_name: &rule.name,
            plugin_metadata,
        };
        match rules.match_mode {
            MatchMode::First => {
                if matched {
                    run_branch(rule, RuleBranch::Then, &ctx, &mut result)?;
                    return Ok(result);
                }
            }
            MatchMode::All => {
                if matched {
                    run_branch(rule, RuleBranch::Then, &ctx, &mut result)?;
                } else if rule.else_actions.is_some() {
                    run_branch(rule, RuleBranch::Else, &ctx, &mut result)?;
                }
            }
        }
    }

    if rules.match_mode == MatchMode::First {
        if let Some(last) = rules.items.last().filter(|r| r.else_actions.is_some()) {
            let ctx = ActionContext {
                tracks,
                file_path,
                rule_name: &last.name,
                plugin_metadata,
            };
            run_branch(last, RuleBranch::Else, &ctx, &mut result)?;
        }
    }

    Ok(result)
}
