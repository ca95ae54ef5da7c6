//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "profview",
    about = "Symbolicate a sampled profile and print its merged call tree",
    after_help = "\
EXAMPLES:
    profview profile.json                          Symbolicate and print thread 0
    profview profile.json --thread 2               Pick another thread
    profview profile.json --symbol-dir ./libs      Resolve against local libraries
    profview profile.json --export tree.json       Write the call tree as JSON"
)]
pub struct Args {
    /// Raw profile JSON file to symbolicate
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// Directory containing the referenced libraries (for symbol extraction)
    #[arg(long, default_value = ".")]
    pub symbol_dir: PathBuf,

    /// Directory for the durable symbol table cache
    #[arg(long, default_value = ".profview-cache")]
    pub cache_dir: PathBuf,

    /// Thread index to build the call tree for
    #[arg(long, default_value = "0")]
    pub thread: usize,

    /// Maximum call tree depth to print
    #[arg(long, default_value = "20")]
    pub depth_limit: usize,

    /// Write the call tree as JSON instead of printing text
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}
