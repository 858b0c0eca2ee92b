use std::time::Duration;

use comfy_table::{Cell, Color, ContentArrangement, Row, Table, presets::UTF8_FULL};
use console::style;
use indicatif::HumanDuration;
use phased_scroll::{Phase, sequencer::SequencerStats};

const STATUS_WIDTH: usize = 12;

pub fn status(label: &str, message: impl AsRef<str>) {
    eprintln!(
        "{:>width$} {}",
        style(label).green().bold(),
        message.as_ref(),
        width = STATUS_WIDTH
    );
}

pub fn warn(message: impl AsRef<str>) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message.as_ref());
}

pub fn note(message: impl AsRef<str>) {
    eprintln!("{}: {}", style("note").blue().bold(), message.as_ref());
}

pub fn format_duration(duration: Duration) -> String {
    HumanDuration(duration).to_string()
}

/// When a phase was entered, and the item count at that moment.
#[derive(Debug, Clone, Copy)]
pub struct PhaseEntry {
    pub phase: Phase,
    pub entered_at: Duration,
    pub items: usize,
}

/// Everything the summary table reports about one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub strategy: &'static str,
    pub phases: Vec<PhaseEntry>,
    pub items: usize,
    pub final_phase: Phase,
    pub frames: u64,
    pub elapsed: Duration,
    pub scroll_events: u64,
    pub wheel_events: u64,
    pub stats: SequencerStats,
}

fn header(labels: &[&str]) -> Row {
    Row::from(
        labels
            .iter()
            .map(|label| Cell::new(label).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    )
}

pub fn print_summary(report: &RunReport) {
    let mut phases = Table::new();
    phases
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Phase", "Entered", "Items"]));
    for entry in &report.phases {
        phases.add_row(Row::from(vec![
            Cell::new(entry.phase.as_str()),
            Cell::new(format!("{} ms", entry.entered_at.as_millis())),
            Cell::new(entry.items),
        ]));
    }
    println!("{phases}");

    let mut totals = Table::new();
    totals
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Metric", "Value"]));
    let rows: [(&str, String); 9] = [
        ("Strategy", report.strategy.to_string()),
        ("Items", report.items.to_string()),
        ("Final phase", report.final_phase.to_string()),
        ("Frames", report.frames.to_string()),
        ("Simulated time", format_duration(report.elapsed)),
        ("Scroll events", report.scroll_events.to_string()),
        ("Wheel events", report.wheel_events.to_string()),
        ("Loads accepted", report.stats.accepted.to_string()),
        (
            "Loads ignored",
            format!(
                "{} while loading, {} after the last item",
                report.stats.ignored_loading, report.stats.ignored_exhausted
            ),
        ),
    ];
    for (metric, value) in rows {
        totals.add_row(Row::from(vec![Cell::new(metric), Cell::new(value)]));
    }
    println!("{totals}");
}
