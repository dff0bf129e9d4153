//! Policy evaluation: one file snapshot in, one immutable [`Plan`] out.
//!
//! Every stage is a pure function over borrowed inputs. `evaluate_policy`
//! runs them in a fixed order and collects their actions.
//!
//! # Architecture
//!
//! ```text
//! evaluate_policy
//!     ├── rules:          conditional rules → skip flags, pending changes
//!     ├── (pre-actions):  clear forced / default / titles per track type
//!     ├── ordering:       desired order (Reorder, MKV only), default flags
//!     ├── transcription:  language and title updates
//!     ├── filtering:      keep/remove dispositions
//!     └── container:      container conversion and transcode plan
//! ```
//!
//! `conditions` is shared by the rules stage and synthesis `create_if`;
//! `classification` feeds both ordering and filtering.
//!
//! # Example
//!
//! ```ignore
//! use vpo_core::evaluator::{evaluate_policy, EvaluationInput};
//!
//! let path = Path::new("/media/movie.mkv");
//! let input = EvaluationInput::new("42", path, "matroska,webm", &tracks, &policy)
//!     .with_plugin_metadata(&metadata);
//! let plan = evaluate_policy(input)?;
//! println!("{}", plan.summary());
//! ```
//!
//! [`Plan`]: crate::models::Plan

pub mod classification;
pub mod conditions;
pub mod container;
mod errors;
mod evaluate;
pub mod filtering;
pub mod ordering;
pub mod rules;
pub mod transcription;

pub use classification::classify_track;
pub use conditions::{evaluate_condition, matches_track, EvaluationContext};
pub use container::{evaluate_container_change_with_policy, normalize_container_format};
pub use errors::{PolicyError, PolicyResult};
pub use evaluate::{evaluate_policy, EvaluationInput};
pub use filtering::compute_track_dispositions;
pub use ordering::{compute_default_flags, compute_desired_order, find_preferred_track};
pub use rules::{evaluate_conditional_rules, substitute_placeholders};
pub use transcription::{compute_language_updates, compute_title_updates, is_generic_title};
