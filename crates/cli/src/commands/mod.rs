//! CLI subcommands

pub mod bands;
pub mod health;
pub mod predict;
