//! CLI module - argument parsing and the inspect command

mod args;
pub mod inspect;

pub use args::{BuildArgs, Cli, Commands};
pub use inspect::{load_artifacts, run_inspect, ArtifactSummary};
