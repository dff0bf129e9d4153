//! Audio synthesis planning.
//!
//! Decides which extra audio tracks to create from existing ones. Nothing
//! here runs FFmpeg; the result is a [`SynthesisPlan`] for an executor.
//!
//! - `selector`: score audio tracks against source preferences
//! - `encoders`: encoder names, availability and bitrate defaults
//! - `downmix`: upmix rejection and downmix filter strings
//! - `planner`: resolve every definition into an operation or a skip
//! - `format`: dry-run text
//!
//! [`SynthesisPlan`]: crate::models::SynthesisPlan

pub mod downmix;
pub mod encoders;
pub mod format;
pub mod planner;
pub mod selector;

pub use downmix::{downmix_filter, validate_downmix, UpmixRejected};
pub use encoders::{
    default_bitrate, encoder_for, is_encoder_available, output_format_for, parse_bitrate,
    resolve_bitrate, EncoderAvailability, EncoderSet,
};
pub use format::{format_final_track_order, format_synthesis_plan};
pub use planner::plan_synthesis;
pub use selector::{score_track, select_source_track};
