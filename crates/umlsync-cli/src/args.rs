//! Command-line argument definitions for the umlsync CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input and output directories, the
//! cleanup passes, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the umlsync diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory with the class description files (*.xml)
    #[arg(short, long)]
    pub input: String,

    /// Directory receiving one .drawio diagram per description
    #[arg(short, long)]
    pub output: String,

    /// Remove classes that are no longer described
    #[arg(long)]
    pub cleanup_classes: bool,

    /// Remove or redirect association and inheritance arrows that no longer match
    ///
    /// Inheritance arrows point from the derived class to its base. Run once
    /// with this flag on diagrams whose arrows point from base to derived
    /// class, or they keep both arrows.
    #[arg(long)]
    pub cleanup_arrows: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
