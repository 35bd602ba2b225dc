//! Pipeline components of the `ufpanel` binary.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
