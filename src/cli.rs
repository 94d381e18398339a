//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use imagelocalizer_core::FailurePolicy;
use imagelocalizer_core::config::SettingsOverrides;

/// Download remote images referenced by text documents and rewrite them to local paths.
///
/// Every quoted "http...jpg" URL in each FILE is downloaded once, stored as
/// img/<sha256>.jpg next to the file, and replaced in the file by that path.
#[derive(Parser, Debug)]
#[command(name = "imagelocalizer")]
#[command(author, version, about)]
pub struct Args {
    /// Documents to process, in order
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// What to write in place of a reference whose download failed (leave, blank, mark)
    #[arg(long, value_name = "POLICY")]
    pub on_failure: Option<FailurePolicy>,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Maximum redirect hops to follow, 0 disables following (0-20)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=20))]
    pub max_redirects: Option<u8>,

    /// List the images that would be downloaded without fetching or writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Args {
    /// Settings given on the command line.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            on_failure: self.on_failure,
            connect_timeout_secs: self.connect_timeout,
            read_timeout_secs: self.timeout,
            max_redirects: self.max_redirects.map(usize::from),
        }
    }
}
