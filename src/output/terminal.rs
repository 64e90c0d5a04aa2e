// Colored terminal output for records, cohort tables and similarity.
//
// This module handles all terminal-specific formatting: colors, tables and
// bar charts. The main.rs command handlers delegate here.

use std::collections::BTreeMap;

use colored::Colorize;

use crate::cohort::{CohortAggregate, CohortFilter, CohortKey, DuplicateScan, GroupBy};
use crate::document::DocumentRecord;
use crate::error::Result;
use crate::stats::SimilarityMatrix;

const BAR_WIDTH: usize = 20;

/// Display one document's statistics with a bar chart of its top words.
pub fn display_record(record: &DocumentRecord) {
    let m = &record.metadata;
    println!(
        "\n{}",
        format!("=== {} by {} ===", m.title, m.author).bold()
    );

    let mut placement = Vec::new();
    if let Some(g) = m.group {
        placement.push(format!("group {g}"));
    }
    if let Some(c) = m.course {
        placement.push(format!("course {c}"));
    }
    if let Some(f) = &m.faculty {
        placement.push(f.clone());
    }
    if let Some(d) = &m.department {
        placement.push(d.clone());
    }
    if !placement.is_empty() {
        println!("  {}", placement.join(" / ").dimmed());
    }

    let stats = &record.stats;
    println!(
        "  Tokens: {}  Unique: {}  Unique share: {:.1}%",
        stats.total_tokens, stats.unique_count, stats.percent_unique
    );
    println!(
        "  Characters: {} raw, {} after cleaning",
        record.raw_chars, record.clean_chars
    );
    match &record.fingerprint {
        Some(fp) => println!("  Shingles: {} (width {})", fp.len(), fp.width),
        None => println!("  Shingles: {}", "not kept".dimmed()),
    }
    println!();

    let max = stats.top_k.first().map_or(1, |(_, count)| *count).max(1);
    for (i, (word, count)) in stats.top_k.iter().enumerate() {
        let weight = *count as f64 / max as f64;
        let bar = bar(weight, BAR_WIDTH);

        // Color the bar based on its share of the top count
        let colored_bar = if weight >= 0.75 {
            bar.bright_green()
        } else if weight >= 0.35 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>2}. {:<24} {} {}",
            i + 1,
            super::truncate_chars(word, 22).bold(),
            colored_bar,
            count
        );
    }
}

/// Display one row per cohort, keys ascending.
pub fn display_cohorts(
    group_by: GroupBy,
    filter: &CohortFilter,
    cohorts: &BTreeMap<CohortKey, CohortAggregate<CohortKey>>,
) {
    if cohorts.is_empty() {
        println!("No documents match {filter}.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Statistics by {} ({filter}) ===", group_by.as_str()).bold()
    );
    println!();
    print_header(group_by.as_str());
    for agg in cohorts.values() {
        print_row(&agg.key.to_string(), agg);
    }
    println!();
}

/// Display authors of one group, most varied vocabulary first.
pub fn display_group_ranking(group: u32, ranked: &[CohortAggregate<(u32, String)>]) {
    if ranked.is_empty() {
        println!("No reports found for group {group}.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Group {group} ({} authors) ===", ranked.len()).bold()
    );
    println!();
    print_header("Author");
    for (i, agg) in ranked.iter().enumerate() {
        let label = format!("{}. {}", i + 1, agg.key.1);
        print_row(&label, agg);
    }
    println!();
}

/// Display a pairwise containment matrix.
pub fn display_matrix(matrix: &SimilarityMatrix) {
    if matrix.is_empty() {
        println!("Nothing to compare.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Vocabulary overlap ({} authors) ===", matrix.len()).bold()
    );
    println!();

    let names: Vec<String> = matrix
        .subjects()
        .iter()
        .map(|s| super::truncate_chars(s, 10))
        .collect();
    let header: String = names.iter().map(|n| format!("{n:>14}")).collect();
    println!("  {:<14}{}", "", header.dimmed());

    for (row, name) in names.iter().enumerate() {
        let cells: Vec<String> = (0..matrix.len())
            .map(|col| {
                let text = format!("{:>14}", format_cell(matrix.cell(row, col)));
                colorize_similarity(matrix.cell(row, col), text).to_string()
            })
            .collect();
        println!("  {:<14}{}", name, cells.join(""));
    }
    println!();
}

/// Display near-duplicate pairs found among `records`.
pub fn display_duplicates(records: &[DocumentRecord], scan: &DuplicateScan, threshold: f64) {
    println!(
        "\n{}",
        format!("=== Near-duplicates (>= {threshold:.0}% shingle overlap) ===").bold()
    );
    println!();

    if scan.pairs.is_empty() {
        println!("  No pairs above the threshold.");
    }
    for pair in &scan.pairs {
        let left = &records[pair.left].metadata;
        let right = &records[pair.right].metadata;
        let score = format!("{:>5.1}%", pair.score);
        let colored_score = if pair.score >= 80.0 {
            score.red().bold()
        } else {
            score.yellow()
        };
        println!(
            "  {}  {} ({})  <->  {} ({})",
            colored_score,
            super::truncate_chars(&left.title, 30),
            left.author,
            super::truncate_chars(&right.title, 30),
            right.author,
        );
    }

    if !scan.skipped.is_empty() {
        println!(
            "\n  {}",
            format!(
                "{} documents skipped (no fingerprint, or shorter than one shingle)",
                scan.skipped.len()
            )
            .dimmed()
        );
    }
}

fn print_header(first: &str) {
    println!(
        "  {:<24} {:>7} {:>9} {:>9} {:>8} {:>9} {:>9}",
        first.dimmed(),
        "Reports".dimmed(),
        "Tokens".dimmed(),
        "Unique".dimmed(),
        "Unique%".dimmed(),
        "Chars".dimmed(),
        "Union".dimmed(),
    );
    println!("  {}", "-".repeat(82).dimmed());
}

fn print_row<K>(label: &str, agg: &CohortAggregate<K>) {
    println!(
        "  {:<24} {:>7} {:>9.1} {:>9.1} {:>8.1} {:>9.1} {:>9}",
        super::truncate_chars(label, 21),
        agg.report_count,
        agg.avg_total_tokens,
        agg.avg_unique_count,
        agg.avg_percent_unique,
        agg.avg_raw_chars,
        agg.union_unique_count,
    );
}

/// `[=====     ]` with `weight` of `width` filled.
fn bar(weight: f64, width: usize) -> String {
    let filled = ((weight.clamp(0.0, 1.0)) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}

fn format_cell(cell: &Result<f64>) -> String {
    match cell {
        Ok(v) if v.is_nan() => "-".to_string(),
        Ok(v) => format!("{v:.1}%"),
        Err(_) => "n/a".to_string(),
    }
}

/// Colorize a matrix cell by overlap strength.
fn colorize_similarity(cell: &Result<f64>, text: String) -> colored::ColoredString {
    match cell {
        Ok(v) if v.is_nan() => text.dimmed(),
        Ok(v) if *v >= 70.0 => text.red().bold(),
        Ok(v) if *v >= 40.0 => text.yellow(),
        Ok(_) => text.green(),
        Err(_) => text.dimmed(),
    }
}
