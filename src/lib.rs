//! Designated Forest parcel report generator.
//!
//! Drives a select/buffer/clip/union geometry pipeline over the county
//! parcel and soil sources, then renders the final soil layer into a
//! one-page PDF report from a pre-authored cartographic project.

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod engine;
pub mod services;

pub use cli::Cli;
pub use config::Config;
