use anyhow::Result;
use tracing::warn;

use bankrev_ingest::CollectorConfig;
use bankrev_store::PersistReport;

use crate::cli::{CollectArgs, EnrichArgs, LoadArgs, ReportArgs};
use crate::summary::{print_collect_summary, print_enrich_summary, print_report_summary};
use bankrev_cli::pipeline::{
    CollectOutcome, EnrichOutcome, ReportOutcome, run_collect_stage, run_enrich_stage,
    run_load_stage, run_report_stage,
};

pub fn run_collect(args: &CollectArgs) -> Result<CollectOutcome> {
    let config = CollectorConfig {
        target_count_per_bank: args.target_count,
        ..CollectorConfig::default()
    };
    let outcome = run_collect_stage(&args.input_dir, &args.output, &config)?;
    for fetch in outcome.collect.failed_banks() {
        warn!(bank = %fetch.bank, "no reviews collected for bank");
    }
    print_collect_summary(&outcome, &args.output);
    Ok(outcome)
}

pub fn run_enrich(args: &EnrichArgs) -> Result<EnrichOutcome> {
    let outcome = run_enrich_stage(&args.input, &args.output)?;
    print_enrich_summary(&outcome, &args.output);
    Ok(outcome)
}

pub fn run_load(args: &LoadArgs) -> Result<PersistReport> {
    let report = run_load_stage(&args.input, &args.db_path, args.reset)?;
    println!(
        "Loaded {} reviews across {} banks into {}",
        report.reviews,
        report.banks,
        args.db_path.display()
    );
    Ok(report)
}

pub fn run_report(args: &ReportArgs) -> Result<ReportOutcome> {
    let outcome = run_report_stage(&args.input, &args.output_dir)?;
    print_report_summary(&outcome, &args.output_dir);
    Ok(outcome)
}
