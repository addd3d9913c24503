//! Command-line interface definition.

use chrono::{Datelike, Local};
use clap::Parser;
use std::path::PathBuf;

/// Export data from a `.mbox` file to CSV for use in the contact log.
#[derive(Debug, Parser)]
#[command(name = "contactlog", version, about)]
pub struct Cli {
    /// Path to the mbox file.
    pub mbox: PathBuf,

    /// Keep only emails from this year (default: the previous calendar
    /// year).
    #[arg(long)]
    pub year: Option<i32>,

    /// Skip block-list filtering entirely.
    #[arg(long)]
    pub no_filter: bool,

    /// Exclude the Subject field from the export file. Reduces personal
    /// information at the cost of making unknown senders harder to
    /// identify.
    #[arg(long)]
    pub no_subject: bool,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The year records must match to be exported.
    #[must_use]
    pub fn target_year(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year() - 1)
    }

    /// Output path for the valid-record export: the mbox path with a `.csv`
    /// extension.
    #[must_use]
    pub fn valid_path(&self) -> PathBuf {
        self.mbox.with_extension("csv")
    }

    /// Output path for the filtered-record export.
    #[must_use]
    pub fn filtered_path(&self) -> PathBuf {
        self.sibling("_filtered.csv")
    }

    /// Output path for the bad-format export.
    #[must_use]
    pub fn bad_format_path(&self) -> PathBuf {
        self.sibling("_bad_emails.csv")
    }

    /// Output path for the filter-statistics export.
    #[must_use]
    pub fn stats_path(&self) -> PathBuf {
        self.sibling("_filter_stats.csv")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let stem = self.mbox.file_stem().unwrap_or_default().to_os_string();
        let mut name = stem;
        name.push(suffix);
        self.mbox.with_file_name(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        let cli = Cli::parse_from(["contactlog", "inbox/archive.mbox"]);
        assert_eq!(cli.valid_path(), PathBuf::from("inbox/archive.csv"));
        assert_eq!(
            cli.filtered_path(),
            PathBuf::from("inbox/archive_filtered.csv")
        );
        assert_eq!(
            cli.bad_format_path(),
            PathBuf::from("inbox/archive_bad_emails.csv")
        );
        assert_eq!(
            cli.stats_path(),
            PathBuf::from("inbox/archive_filter_stats.csv")
        );
    }

    #[test]
    fn test_year_flag() {
        let cli = Cli::parse_from(["contactlog", "a.mbox", "--year", "2023"]);
        assert_eq!(cli.target_year(), 2023);
        assert!(!cli.no_filter);
        assert!(!cli.no_subject);
    }

    #[test]
    fn test_default_year_is_last_year() {
        let cli = Cli::parse_from(["contactlog", "a.mbox"]);
        assert_eq!(cli.target_year(), Local::now().year() - 1);
    }

    #[test]
    fn test_switches() {
        let cli = Cli::parse_from(["contactlog", "a.mbox", "--no-filter", "--no-subject", "-v"]);
        assert!(cli.no_filter);
        assert!(cli.no_subject);
        assert!(cli.verbose);
    }
}
