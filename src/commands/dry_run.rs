//! Dry-run preview: list what would be fetched without downloading anything.

use std::path::PathBuf;

use anyhow::Result;
use imagelocalizer_core::Localizer;
use tracing::info;

pub async fn run_dry_run_preview(localizer: &Localizer, files: &[PathBuf]) -> Result<()> {
    let mut total = 0usize;
    for file in files {
        let planned = localizer.plan(file).await?;
        info!(path = %file.display(), unique_urls = planned.len(), "Parsed document (dry run)");

        println!("{}: {} image(s)", file.display(), planned.len());
        for fetch in &planned {
            if fetch.original == fetch.target {
                println!("- {}", fetch.original);
            } else {
                println!("- {} -> {}", fetch.original, fetch.target);
            }
        }
        total += planned.len();
    }

    println!(
        "Dry run summary: {} document(s), {} image(s) to download.",
        files.len(),
        total
    );
    println!("Dry run - no files downloaded");
    Ok(())
}
