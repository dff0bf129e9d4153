//! VPO Core - Policy evaluation and planning for Video Policy Orchestrator
//!
//! This crate turns a media file's track snapshot and a policy into an
//! immutable plan of changes. Evaluation does no I/O; introspection,
//! execution and persistence belong to the caller.
//!
//! - `evaluator`: `evaluate_policy` and its stages
//! - `synthesis`: audio synthesis planning
//! - `policy`: the policy schema and loader
//! - `plugin`: plugin trait and registry feeding plugin metadata
//! - `config` / `logging`: ambient settings and tracing setup

pub mod config;
pub mod evaluator;
pub mod logging;
pub mod matching;
pub mod models;
pub mod plugin;
pub mod policy;
pub mod synthesis;

pub use evaluator::{evaluate_policy, EvaluationInput, PolicyError, PolicyResult};
pub use models::{Plan, PlannedAction, TrackInfo};
pub use policy::EvaluationPolicy;
pub use synthesis::plan_synthesis;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
