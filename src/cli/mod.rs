//! CLI module for scriptsync.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// scriptsync - Script to transcript alignment
///
/// Maps each line of a written script onto the time ranges of a speech-to-text transcript,
/// with a confidence score per line.
#[derive(Parser, Debug)]
#[command(name = "scriptsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SCRIPTSYNC_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Align a script against a transcript
    Align {
        /// Script text file (one utterance per line)
        script: String,

        /// Transcript file (json, srt, or vtt)
        transcript: String,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (json, srt, vtt, text). Defaults to the output file's extension, or text
        #[arg(short, long)]
        format: Option<String>,

        /// Transcript format, when the file extension is not enough
        #[arg(long)]
        transcript_format: Option<String>,
    },

    /// Align many script/transcript pairs listed in a JSON manifest
    Batch {
        /// Manifest file: [{"script": ..., "transcript": ..., "output": ...}]
        manifest: String,

        /// Maximum concurrent alignments (overrides config)
        #[arg(short = 'j', long)]
        jobs: Option<usize>,
    },

    /// Show the similarity signals between two pieces of text
    Score {
        /// First text (e.g. a script line)
        a: String,

        /// Second text (e.g. a transcript segment)
        b: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
