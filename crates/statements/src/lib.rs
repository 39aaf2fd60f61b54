//! Workflow library turning survey submissions into filled absence
//! statements. The service crate in `services/api` wires these pieces to an
//! HTTP surface and a CLI.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
