//! Error types for the rewrite engine.

use thiserror::Error;

/// Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, RewriteError>;

/// Errors raised while applying rename operations to a tree.
#[derive(Error, Debug)]
pub enum RewriteError {
    /// A computed replacement declined to produce a value for a match.
    /// This is a programming error in the supplied replacement, so the
    /// whole rename call aborts instead of skipping the match.
    #[error("computed replacement for `{target}` returned no value")]
    ReplacementContract { target: String },
}
