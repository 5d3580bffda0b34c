//! Port traits for the external collaborators the core depends on.

pub mod config_port;
pub mod tick_port;
pub mod decision_port;
