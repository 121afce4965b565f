//! Core operations.
//!
//! Business logic for commands other than `run`, separated from CLI argument
//! parsing and output rendering. `run` itself lives in `genmeta-core`.

pub mod info;

pub use info::info;
