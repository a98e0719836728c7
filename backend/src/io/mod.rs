//! # IO Module
//!
//! Front ends that drive the tracker. Only a command-line interface exists
//! today; it owns user interaction (argument parsing, confirmation prompts,
//! printed notices) so the domain and storage layers stay free of it.

pub mod cli;
