//! comfy-table summaries printed after each stage.

use std::collections::BTreeMap;
use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bankrev_cli::pipeline::{CollectOutcome, EnrichOutcome, ReportOutcome};
use bankrev_model::Bank;

pub fn print_collect_summary(outcome: &CollectOutcome, output: &Path) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bank"),
        header_cell("Fetched"),
        header_cell("Kept"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for fetch in &outcome.collect.fetches {
        let kept = outcome.kept_by_bank.get(&fetch.bank).copied().unwrap_or(0);
        let status = match &fetch.error {
            Some(error) => Cell::new(format!("failed: {error}")).fg(Color::Red),
            None => Cell::new("ok").fg(Color::Green),
        };
        table.add_row(vec![
            bank_cell(fetch.bank),
            Cell::new(fetch.fetched),
            Cell::new(kept),
            status,
        ]);
    }
    let clean = &outcome.clean;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(clean.fetched).add_attribute(Attribute::Bold),
        Cell::new(clean.kept).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!(
        "Dropped {} rows ({} duplicates); data-quality drop rate {:.2}%",
        clean.total_drops(),
        clean.duplicates,
        clean.drop_rate_percent()
    );
    if outcome.collect.below_minimum {
        println!("Warning: collected total is below the campaign minimum");
    }
    println!("Cleaned CSV: {}", output.display());
}

pub fn print_enrich_summary(outcome: &EnrichOutcome, output: &Path) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bank"),
        header_cell("Positive"),
        header_cell("Negative"),
        header_cell("Neutral"),
        header_cell("Mean score"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (bank, breakdown) in &outcome.sentiment {
        table.add_row(vec![
            bank_cell(*bank),
            Cell::new(breakdown.positive),
            Cell::new(breakdown.negative),
            Cell::new(breakdown.neutral),
            Cell::new(format!("{:+.3}", breakdown.mean_score)),
        ]);
    }
    println!("{table}");
    print_rating_means_table(&outcome.by_rating);
    print_theme_table(&outcome.themes);
    print_themes_by_bank_table(&outcome.themes_by_bank, &outcome.themes);
    println!(
        "Scored {} reviews ({} neutral fallbacks); sentiment coverage {:.2}%",
        outcome.report.total(),
        outcome.report.fallback,
        outcome.report.coverage_percent()
    );
    println!("Enriched CSV: {}", output.display());
}

pub fn print_report_summary(outcome: &ReportOutcome, out_dir: &Path) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bank"),
        header_cell("Reviews"),
        header_cell("Positive"),
        header_cell("Negative"),
        header_cell("Mean score"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (bank, breakdown) in &outcome.sentiment {
        table.add_row(vec![
            bank_cell(*bank),
            Cell::new(breakdown.total()),
            Cell::new(breakdown.positive),
            Cell::new(breakdown.negative),
            Cell::new(format!("{:+.3}", breakdown.mean_score)),
        ]);
    }
    println!("{table}");
    print_rating_means_table(&outcome.by_rating);
    print_theme_table(&outcome.themes);
    print_themes_by_bank_table(&outcome.themes_by_bank, &outcome.themes);
    println!("Aggregated {} reviews", outcome.record_count);
    for path in outcome.charts.written() {
        println!("Chart: {}", path.display());
    }
    println!("Output directory: {}", out_dir.display());
}

/// Mean signed score per bank and star rating, banks as rows.
fn print_rating_means_table(by_rating: &BTreeMap<(Bank, u8), f64>) {
    if by_rating.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bank"),
        header_cell("1 star"),
        header_cell("2 star"),
        header_cell("3 star"),
        header_cell("4 star"),
        header_cell("5 star"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for bank in Bank::ALL {
        if !(1..=5).any(|rating| by_rating.contains_key(&(bank, rating))) {
            continue;
        }
        let mut row = vec![bank_cell(bank)];
        for rating in 1..=5u8 {
            row.push(match by_rating.get(&(bank, rating)) {
                Some(mean) => Cell::new(format!("{mean:+.3}")),
                None => dim_cell("-"),
            });
        }
        table.add_row(row);
    }
    println!("Mean sentiment by bank and rating:");
    println!("{table}");
}

/// Theme counts broken down per bank, themes as rows.
fn print_themes_by_bank_table(
    by_bank: &BTreeMap<Bank, BTreeMap<String, usize>>,
    themes: &BTreeMap<String, usize>,
) {
    if by_bank.is_empty() {
        return;
    }
    let mut table = Table::new();
    let mut header = vec![header_cell("Theme")];
    header.extend(Bank::ALL.iter().map(|bank| header_cell(bank.code())));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=Bank::ALL.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for theme in themes.keys() {
        let mut row = vec![Cell::new(theme)];
        for bank in Bank::ALL {
            let count = by_bank.get(&bank).and_then(|counts| counts.get(theme));
            row.push(match count {
                Some(count) => Cell::new(count),
                None => dim_cell("-"),
            });
        }
        table.add_row(row);
    }
    println!("Theme distribution per bank:");
    println!("{table}");
}

fn print_theme_table(themes: &BTreeMap<String, usize>) {
    if themes.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Theme"), header_cell("Reviews")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut ordered: Vec<(&String, &usize)> = themes.iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (theme, count) in ordered {
        table.add_row(vec![Cell::new(theme), Cell::new(count)]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn bank_cell(bank: Bank) -> Cell {
    Cell::new(bank.code())
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
