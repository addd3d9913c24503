//! `contactlog` - export a `.mbox` mail archive to contact-log CSV files.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod filters;
mod mbox;
mod report;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use contactlog_core::{
    EmailRecord, bad_format_table, classify, filtered_table, stats_tables, valid_table,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let args = cli::Cli::parse();

    // Initialize logging based on verbosity
    let default_filter = if args.verbose {
        "contactlog=debug,contactlog_core=debug"
    } else {
        "contactlog=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    run(&args)
}

fn run(args: &cli::Cli) -> Result<()> {
    let started = Instant::now();

    let filter_list = if args.no_filter {
        None
    } else {
        match filters::load_filters() {
            Ok(list) => Some(list),
            Err(err) => {
                warn!(
                    "could not retrieve filters from Quickbase; export will not be filtered: {err:#}"
                );
                None
            }
        }
    };

    info!("Beginning processing of {}", args.mbox.display());
    let raw_messages = mbox::read_mbox(&args.mbox)?;

    let mut records = Vec::with_capacity(raw_messages.len());
    for (processed, message) in raw_messages.iter().enumerate() {
        records.push(EmailRecord::build(
            &message.subject,
            &message.from,
            &message.to,
            &message.date,
        ));
        if (processed + 1) % 1000 == 0 {
            info!("{} emails processed", processed + 1);
        }
    }
    let found = records.len();
    info!("Processed mailbox {}", args.mbox.display());

    let year = args.target_year();
    info!("Excluding emails not from year {year}");
    if args.no_subject {
        info!("Excluding email Subject field from export");
    }
    let classification = classify(records, year, filter_list.as_ref());

    let valid = valid_table(&classification.valid, args.no_subject);
    report::write_table(&args.valid_path(), &valid)?;

    let filtered = filtered_table(&classification.exported_filtered());
    report::write_table(&args.filtered_path(), &filtered)?;

    let (by_domain, by_email) = stats_tables(&classification.filtered);
    report::write_stats(&args.stats_path(), &by_domain, &by_email)?;

    if classification.bad_format.is_empty() {
        info!("No invalid dates or headers found");
    } else {
        let bad = bad_format_table(&classification.bad_format);
        report::write_table(&args.bad_format_path(), &bad)?;
        warn!(
            "Invalid dates or headers found; see {} for manual correction",
            args.bad_format_path().display()
        );
    }

    info!(
        "{found} emails were found, {} were exported to {}, {} were filtered",
        classification.valid.len(),
        args.valid_path().display(),
        classification.filtered.len(),
    );
    info!("Completed in {:.2} seconds", started.elapsed().as_secs_f64());
    Ok(())
}
