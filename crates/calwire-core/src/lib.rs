//! Shared settings, constants and errors for the calwire workspace.

pub mod config;
pub mod constants;
pub mod error;
