//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// confsync - Inspect and edit configuration documents
#[derive(Parser, Debug)]
#[command(name = "confsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the value at a dotted path
    ///
    /// Examples:
    ///   confsync get app.toml network.timeout
    ///   confsync get app.json servers[0].host
    Get {
        /// Configuration file (.toml, .json, .yaml)
        file: PathBuf,

        /// Dotted key path
        path: String,
    },

    /// Set the value at a dotted path, creating the file if needed
    ///
    /// `true`/`false`, integers and floats are stored as such; anything
    /// else is stored as a string.
    Set {
        /// Configuration file (.toml, .json, .yaml)
        file: PathBuf,

        /// Dotted key path
        path: String,

        /// New value
        value: String,
    },

    /// Convert a document to another format
    ///
    /// Formats are taken from the file extensions.
    Convert {
        /// Source file
        input: PathBuf,

        /// Destination file
        output: PathBuf,
    },

    /// Load, correct and save a bundled example configuration
    ///
    /// Fills in defaults and comments, then prints the resulting file.
    Demo {
        /// Where to keep the example configuration
        file: PathBuf,
    },
}
