//! CLI command handlers.

mod dry_run;

pub use dry_run::run_dry_run_preview;
