//! CLI subcommand implementations.

pub mod lookup;
pub mod rank;
pub mod serve;
