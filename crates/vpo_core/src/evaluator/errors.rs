//! Error types for policy evaluation.
//!
//! Errors carry enough context for the caller to report them without
//! re-inspecting the input: the rule that failed, the track that broke an
//! invariant, or the languages that left too few tracks behind.

use thiserror::Error;

/// Error returned by `evaluate_policy` and the subsystems it calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// The file has no tracks at all.
    #[error("{0}")]
    NoTracks(String),

    /// A conditional rule executed a `fail` action.
    #[error("Rule '{rule_name}' failed for {file_path}: {message}")]
    ConditionalFail {
        rule_name: String,
        message: String,
        file_path: String,
    },

    /// A per-track transcode plan violates its invariants.
    #[error("Invalid track plan: {0}")]
    InvalidTrackPlan(String),

    /// The policy document is internally inconsistent.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Track filtering would leave fewer tracks than the policy requires.
    #[error(
        "Insufficient {track_type} tracks: {available} kept, {required} required \
         (policy languages: {}, file languages: {})",
        policy_languages.join(", "),
        file_languages.join(", ")
    )]
    InsufficientTracks {
        track_type: String,
        required: usize,
        available: usize,
        policy_languages: Vec<String>,
        file_languages: Vec<String>,
    },

    /// Tracks cannot be carried into the target container.
    #[error(
        "Cannot convert to {target}: incompatible tracks {}",
        format_incompatible(tracks)
    )]
    IncompatibleCodec {
        target: String,
        tracks: Vec<(u32, String, String)>,
    },
}

fn format_incompatible(tracks: &[(u32, String, String)]) -> String {
    tracks
        .iter()
        .map(|(idx, track_type, codec)| format!("#{idx} {track_type} ({codec})"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl PolicyError {
    /// Create a no-tracks error.
    pub fn no_tracks(message: impl Into<String>) -> Self {
        Self::NoTracks(message.into())
    }

    /// Create a conditional fail error.
    pub fn conditional_fail(
        rule_name: impl Into<String>,
        message: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self::ConditionalFail {
            rule_name: rule_name.into(),
            message: message.into(),
            file_path: file_path.into(),
        }
    }

    /// Create an invalid track plan error.
    pub fn invalid_track_plan(message: impl Into<String>) -> Self {
        Self::InvalidTrackPlan(message.into())
    }

    /// Create an invalid policy error.
    pub fn invalid_policy(message: impl Into<String>) -> Self {
        Self::InvalidPolicy(message.into())
    }

    /// Create an insufficient tracks error.
    pub fn insufficient_tracks(
        track_type: impl Into<String>,
        required: usize,
        available: usize,
        policy_languages: Vec<String>,
        file_languages: Vec<String>,
    ) -> Self {
        Self::InsufficientTracks {
            track_type: track_type.into(),
            required,
            available,
            policy_languages,
            file_languages,
        }
    }

    /// Create an incompatible codec error.
    pub fn incompatible_codec(
        target: impl Into<String>,
        tracks: Vec<(u32, String, String)>,
    ) -> Self {
        Self::IncompatibleCodec {
            target: target.into(),
            tracks,
        }
    }
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
