//! Report module - summarizing preparation runs

pub mod summary;

pub use summary::*;
