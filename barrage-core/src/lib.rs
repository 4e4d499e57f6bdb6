//! Shared types for the barrage load-generation engine: run configuration,
//! per-request outcome records, and the final report structure. This crate is
//! I/O-free; the engine and the server front end both build on it.

mod config;
mod data;
mod report;

pub use config::*;
pub use data::*;
pub use report::*;
