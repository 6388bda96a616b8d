//! Chart rendering with the plotters bitmap backend.
//!
//! One PNG per view, written into the output directory. A view with
//! no data (e.g. a bank without negative reviews) is skipped with a
//! warning instead of failing the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::{
    BitMapBackend, BLACK, ChartBuilder, Color, IntoDrawingArea, RGBColor, Rectangle, WHITE,
};
use tracing::{info, warn};

use bankrev_enrich::Lemmatizer;
use bankrev_model::{Bank, EnrichedReview};

use crate::aggregate::{
    negative_keywords_by_bank, sentiment_by_bank, theme_frequency,
};

const CHART_SIZE: (u32, u32) = (1000, 640);
const TOP_KEYWORDS: usize = 15;

/// One fill color per bank, in `Bank::ALL` order.
const BANK_COLORS: [RGBColor; 3] = [
    RGBColor(68, 114, 196),
    RGBColor(237, 125, 49),
    RGBColor(112, 173, 71),
];

/// Paths of every chart written by one reporting run.
#[derive(Debug, Default)]
pub struct ChartSet {
    pub rating_distribution: Option<PathBuf>,
    pub sentiment_by_bank: Option<PathBuf>,
    pub theme_frequency: Option<PathBuf>,
    pub negative_keywords: Vec<PathBuf>,
}

impl ChartSet {
    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.rating_distribution
            .iter()
            .chain(self.sentiment_by_bank.iter())
            .chain(self.theme_frequency.iter())
            .chain(self.negative_keywords.iter())
    }
}

/// Render every chart for the enriched table into `out_dir`.
pub fn render_charts(
    reviews: &[EnrichedReview],
    lemmatizer: &dyn Lemmatizer,
    out_dir: &Path,
) -> Result<ChartSet> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create {}", out_dir.display()))?;
    let mut set = ChartSet::default();

    if reviews.is_empty() {
        warn!("no reviews to chart");
        return Ok(set);
    }

    let path = out_dir.join("1_rating_distribution.png");
    plot_rating_distribution(reviews, &path)?;
    set.rating_distribution = Some(path);

    let path = out_dir.join("2_sentiment_by_bank.png");
    plot_sentiment_by_bank(reviews, &path)?;
    set.sentiment_by_bank = Some(path);

    let themes = theme_frequency(reviews);
    if themes.is_empty() {
        warn!("no themes assigned; skipping theme chart");
    } else {
        let path = out_dir.join("3_theme_frequency.png");
        plot_theme_frequency(&themes, &path)?;
        set.theme_frequency = Some(path);
    }

    let keywords = negative_keywords_by_bank(reviews, lemmatizer, TOP_KEYWORDS);
    for bank in Bank::ALL {
        let Some(ranked) = keywords.get(&bank).filter(|ranked| !ranked.is_empty()) else {
            warn!(bank = %bank, "no negative reviews; skipping keyword chart");
            continue;
        };
        let file_name = format!("4_negative_keywords_{}.png", bank.name().replace(' ', "_"));
        let path = out_dir.join(file_name);
        plot_keyword_bars(bank, ranked, &path)?;
        set.negative_keywords.push(path);
    }

    info!(
        out_dir = %out_dir.display(),
        chart_count = set.written().count(),
        "charts rendered"
    );
    Ok(set)
}

/// Grouped bars: review counts per rating, one bar per bank within
/// each rating slot.
fn plot_rating_distribution(reviews: &[EnrichedReview], path: &Path) -> Result<()> {
    let mut counts: BTreeMap<(Bank, u8), usize> = BTreeMap::new();
    for enriched in reviews {
        *counts
            .entry((enriched.review.bank, enriched.review.rating))
            .or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Review Rating Distribution by Bank", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(1f64..6f64, 0f64..(max_count as f64 * 1.1))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(5)
        .x_label_formatter(&|x| format!("{} star", x.floor() as i64))
        .y_desc("Reviews")
        .draw()?;

    let bar_width = 0.9 / Bank::ALL.len() as f64;
    for (idx, bank) in Bank::ALL.into_iter().enumerate() {
        let color = BANK_COLORS[idx];
        chart
            .draw_series((1u8..=5).filter_map(|rating| {
                let count = counts.get(&(bank, rating)).copied()?;
                let x0 = f64::from(rating) + idx as f64 * bar_width;
                Some(Rectangle::new(
                    [(x0, 0.0), (x0 + bar_width, count as f64)],
                    color.filled(),
                ))
            }))?
            .label(bank.code())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
            });
    }
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Mean signed sentiment per bank as bars over [-1, 1].
fn plot_sentiment_by_bank(reviews: &[EnrichedReview], path: &Path) -> Result<()> {
    let breakdown = sentiment_by_bank(reviews);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean Sentiment Score by Bank", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..Bank::ALL.len() as f64, -1f64..1f64)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(Bank::ALL.len())
        .x_label_formatter(&|x| {
            Bank::ALL
                .get(x.floor() as usize)
                .map(|bank| bank.code().to_string())
                .unwrap_or_default()
        })
        .y_desc("Mean score (-1 to 1)")
        .draw()?;

    chart.draw_series(Bank::ALL.into_iter().enumerate().filter_map(|(idx, bank)| {
        let mean = breakdown.get(&bank)?.mean_score;
        let x0 = idx as f64 + 0.2;
        Some(Rectangle::new(
            [(x0, 0.0), (x0 + 0.6, mean)],
            BANK_COLORS[idx].filled(),
        ))
    }))?;
    root.present()?;
    Ok(())
}

/// Overall theme frequency as vertical bars.
fn plot_theme_frequency(themes: &BTreeMap<String, usize>, path: &Path) -> Result<()> {
    let names: Vec<&str> = themes.keys().map(String::as_str).collect();
    let max_count = themes.values().copied().max().unwrap_or(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Theme Frequency Across All Banks", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(90)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..names.len() as f64, 0f64..(max_count as f64 * 1.1))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&|x| {
            names
                .get(x.floor() as usize)
                .map(|name| short_label(name))
                .unwrap_or_default()
        })
        .y_desc("Reviews tagged")
        .draw()?;

    chart.draw_series(themes.values().enumerate().map(|(idx, count)| {
        let x0 = idx as f64 + 0.15;
        Rectangle::new(
            [(x0, 0.0), (x0 + 0.7, *count as f64)],
            BANK_COLORS[idx % BANK_COLORS.len()].filled(),
        )
    }))?;
    root.present()?;
    Ok(())
}

/// Top negative-review lemmas for one bank.
fn plot_keyword_bars(bank: Bank, ranked: &[(String, usize)], path: &Path) -> Result<()> {
    let max_count = ranked.iter().map(|(_, count)| *count).max().unwrap_or(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Pain-Point Keywords: {}", bank.name()),
            ("sans-serif", 28),
        )
        .margin(12)
        .x_label_area_size(70)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..ranked.len() as f64, 0f64..(max_count as f64 * 1.1))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(ranked.len())
        .x_label_formatter(&|x| {
            ranked
                .get(x.floor() as usize)
                .map(|(lemma, _)| lemma.clone())
                .unwrap_or_default()
        })
        .y_desc("Occurrences in negative reviews")
        .draw()?;

    chart.draw_series(ranked.iter().enumerate().map(|(idx, (_, count))| {
        let x0 = idx as f64 + 0.15;
        Rectangle::new(
            [(x0, 0.0), (x0 + 0.7, *count as f64)],
            RGBColor(192, 60, 60).filled(),
        )
    }))?;
    root.present()?;
    Ok(())
}

/// Squeeze long theme names onto an axis label.
fn short_label(name: &str) -> String {
    match name.split_once(" & ") {
        Some((head, _)) => head.to_string(),
        None => name.to_string(),
    }
}
