//! Worker Lambda handler and task processing

pub mod collect;
pub mod deliver;
pub mod handler;
pub mod summarize;

// Re-export the main handler for convenience
pub use handler::handler;

/// Canonical failure message shown to users when a command fails.
pub const CANONICAL_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't generate a reply at this time. Please try again later.";
