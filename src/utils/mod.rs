//! Utility functions and helpers

pub mod filters;
