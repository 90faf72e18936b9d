use ansi_term::Style;
use chrono::Duration;

use crate::{
    error::ParseError,
    stats::{
        analysis::AnalysisResult,
        comparison::ComparisonResult,
    },
    utils::percentage::Percentage,
};

/// Validation problems go to stderr so piping the report stays clean.
pub fn print_errors(errors: &[ParseError]) {
    for error in errors {
        eprintln!("warning: {error}");
    }
    if !errors.is_empty() {
        eprintln!();
    }
}

pub fn print_analysis(result: &AnalysisResult, min_percentage: Percentage) {
    let bold = Style::new().bold();
    println!("{}", bold.paint(&result.label));

    if result.no_data {
        // Zero classified slots is a reportable state, not a failure.
        let flag = ParseError::NoDataInScope {
            period: result.label.clone(),
        };
        println!("  {flag}");
        println!();
        return;
    }

    println!(
        "  {} tracked across {} slots, balance score {:.1}",
        format_duration(result.total_duration),
        result.total_slots,
        result.balance_score
    );
    println!();

    let mut shares: Vec<_> = result.distribution.iter().collect();
    shares.sort_by(|a, b| b.1.slots.cmp(&a.1.slots));
    for (kind, breakdown) in shares {
        if breakdown.percentage < min_percentage {
            continue;
        }
        println!(
            "  {:18} {:>5.1}%  {:>8}  {} slots",
            kind.label(),
            *breakdown.percentage,
            format_duration(breakdown.duration),
            breakdown.slots
        );
    }

    if !result.top_activities.is_empty() {
        println!();
        println!("{}", bold.paint("Top activities"));
        for top in &result.top_activities {
            println!(
                "  {:>8}  {} ({})",
                format_duration(top.duration),
                top.description,
                top.kind.label()
            );
        }
    }

    println!();
    println!("{}", bold.paint("By day"));
    for day in &result.daily {
        let duration = day
            .by_type
            .values()
            .fold(Duration::zero(), |acc, t| acc + t.duration);
        println!("  {:10} {:>8}  {} slots", day.day, format_duration(duration), day.slots);
    }

    if !result.patterns.is_empty() {
        println!();
        println!("{}", bold.paint("Dominant type per slot (Sun..Sat)"));
        for pattern in &result.patterns {
            let cells: String = pattern
                .dominant
                .iter()
                .map(|kind| kind.map(|k| k.code()).unwrap_or('.'))
                .collect();
            println!("  {}  {}", pattern.time.format("%H:%M"), cells);
        }
    }
    println!();
}

pub fn print_comparison(comparison: &ComparisonResult, min_percentage: Percentage) {
    for entry in &comparison.entries {
        print_analysis(&entry.result, min_percentage);
    }

    if comparison.deltas.is_empty() {
        return;
    }

    let bold = Style::new().bold();
    println!("{}", bold.paint("Change between periods"));
    for delta in &comparison.deltas {
        println!("  {} -> {}", delta.from, delta.to);
        for (kind, change) in &delta.change {
            if *change == 0. {
                continue;
            }
            println!("    {:18} {:+.1} pp", kind.label(), change);
        }
    }

    println!();
    println!("{}", bold.paint("Productive work trend"));
    for point in &comparison.productivity_trend {
        println!("  {:10} {:>5.1}%", point.period, point.productive_percentage);
    }
    println!();
}

fn format_duration(v: Duration) -> String {
    if v.num_hours() > 0 {
        format!("{}h{}m", v.num_hours(), v.num_minutes() % 60)
    } else {
        format!("{}m", v.num_minutes() % 60)
    }
}
