//! CLI module for studyplan - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
