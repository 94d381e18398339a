//! Per-document and per-run counters.

use std::path::PathBuf;

/// Outcome of localizing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizeReport {
    /// Document path as given.
    pub path: PathBuf,
    /// Quoted image references found, duplicates included.
    pub urls_found: usize,
    /// Distinct references.
    pub unique_urls: usize,
    /// Distinct references downloaded and stored.
    pub fetched: usize,
    /// Distinct references whose download failed.
    pub failed: usize,
    /// Occurrences substituted in the text.
    pub replaced: usize,
    /// Whether the document file was rewritten.
    pub rewritten: bool,
}

/// Totals over every document of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents processed.
    pub documents: usize,
    /// Documents whose file was rewritten.
    pub rewritten: usize,
    /// Quoted image references found, duplicates included.
    pub urls_found: usize,
    /// Distinct references downloaded and stored.
    pub fetched: usize,
    /// Distinct references whose download failed.
    pub failed: usize,
}

impl RunSummary {
    /// Adds one document's counters.
    pub fn record(&mut self, report: &LocalizeReport) {
        self.documents += 1;
        self.rewritten += usize::from(report.rewritten);
        self.urls_found += report.urls_found;
        self.fetched += report.fetched;
        self.failed += report.failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_summary_accumulates_reports() {
        let mut summary = RunSummary::default();
        summary.record(&LocalizeReport {
            urls_found: 3,
            unique_urls: 2,
            fetched: 1,
            failed: 1,
            replaced: 2,
            rewritten: true,
            ..LocalizeReport::default()
        });
        summary.record(&LocalizeReport::default());

        assert_eq!(summary.documents, 2);
        assert_eq!(summary.rewritten, 1);
        assert_eq!(summary.urls_found, 3);
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.failed, 1);
    }
}
