//! Configuration and the task model shared by both functions

pub mod config;
pub mod models;
