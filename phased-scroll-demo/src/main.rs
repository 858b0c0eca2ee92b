//! Drives a phased feed over a simulated page and reports how it progressed.
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use phased_scroll::{
    FeedArgs, FeedController, HorizontalStrategy, Phase,
    clock::{Clock, ManualClock},
    config::{NestedScrollArgs, PinnedTranslateArgs},
    px::Px,
};
use tracing::{debug, info};

mod output;
mod page;
mod user;

use output::{PhaseEntry, RunReport};
use page::{SectionLayout, SimulatedPage};
use user::{Action, ScriptedUser};

const FRAME: Duration = Duration::from_millis(16);
const STALL_AFTER: Duration = Duration::from_secs(10);
const MIN_VIEWPORT_HEIGHT: i32 = 200;
const MIN_VIEWPORT_WIDTH: i32 = 320;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// The strip owns its own scroll container
    Nested,
    /// The strip is pinned and translated by page scroll
    Pinned,
}

#[derive(Parser, Debug)]
#[command(name = "phased-scroll-demo")]
#[command(version, about = "Simulate a reader scrolling through a phased feed", long_about = None)]
struct Cli {
    /// Horizontal phase strategy
    #[arg(long, value_enum, default_value_t = Strategy::Pinned)]
    strategy: Strategy,
    /// Maximum number of 16 ms frames to simulate
    #[arg(long, default_value_t = 6000)]
    frames: u64,
    /// Pixels scrolled or wheeled per frame
    #[arg(long, default_value_t = 24)]
    scroll_speed: i32,
    /// Viewport height in pixels
    #[arg(long, default_value_t = 800)]
    viewport_height: i32,
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    viewport_width: i32,
    /// Delay of every load in milliseconds
    #[arg(long, default_value_t = 500)]
    load_delay_ms: u64,
    /// Auto-advance delay out of the horizontal phase (nested defaults to none)
    #[arg(long)]
    exit_delay_ms: Option<u64>,
}

impl Cli {
    fn validate(&self) -> Result<()> {
        if self.scroll_speed <= 0 {
            bail!("--scroll-speed must be positive, got {}", self.scroll_speed);
        }
        if self.viewport_height < MIN_VIEWPORT_HEIGHT {
            bail!("--viewport-height must be at least {MIN_VIEWPORT_HEIGHT}");
        }
        if self.viewport_width < MIN_VIEWPORT_WIDTH {
            bail!("--viewport-width must be at least {MIN_VIEWPORT_WIDTH}");
        }
        if self.frames == 0 {
            bail!("--frames must be at least 1");
        }
        Ok(())
    }

    fn feed_args(&self) -> FeedArgs {
        let exit_delay = self.exit_delay_ms.map(Duration::from_millis);
        let horizontal = match self.strategy {
            Strategy::Nested => {
                HorizontalStrategy::NestedScroll(NestedScrollArgs::default().exit_delay(exit_delay))
            }
            Strategy::Pinned => {
                let args = PinnedTranslateArgs::default();
                let args = match exit_delay {
                    Some(delay) => args.exit_delay(Some(delay)),
                    None => args,
                };
                HorizontalStrategy::PinnedTranslate(args)
            }
        };
        FeedArgs::default()
            .load_delay(Duration::from_millis(self.load_delay_ms))
            .horizontal(horizontal)
    }

    fn layout(&self) -> SectionLayout {
        match self.strategy {
            Strategy::Nested => SectionLayout::Nested,
            Strategy::Pinned => SectionLayout::Pinned,
        }
    }
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(
            "error,phased_scroll=info,phased_scroll_demo=info",
        ) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

/// Lays the page out for the current item count. A layout change resamples
/// the scroll position the way a resize does.
fn relayout(feed: &mut FeedController<SimulatedPage>, now: Duration) {
    let count = feed.item_count();
    if feed.geometry_mut().set_item_count(count) {
        feed.on_resize(now);
    }
}

fn run(cli: &Cli) -> Result<RunReport> {
    let mut clock = ManualClock::new();
    let page = SimulatedPage::new(
        cli.layout(),
        Px(cli.viewport_width),
        Px(cli.viewport_height),
    );
    let mut feed = FeedController::new(cli.feed_args(), page);
    feed.subscribe(|snapshot| {
        debug!(
            items = snapshot.item_ids.len(),
            phase = %snapshot.phase,
            loading = snapshot.is_loading,
            translate = snapshot.horizontal_translate.raw(),
            "feed changed"
        );
    });

    let mut user = ScriptedUser::new(Px(cli.scroll_speed));
    let mut report = RunReport {
        strategy: feed.strategy_name(),
        phases: vec![PhaseEntry {
            phase: feed.phase(),
            entered_at: Duration::ZERO,
            items: 0,
        }],
        items: 0,
        final_phase: feed.phase(),
        frames: 0,
        elapsed: Duration::ZERO,
        scroll_events: 0,
        wheel_events: 0,
        stats: feed.stats(),
    };

    output::status("Mounting", format!("{} strategy", feed.strategy_name()));
    feed.mount(clock.now());
    feed.on_resize(clock.now());

    let mut last_count = feed.item_count();
    let mut last_progress = clock.now();
    while report.frames < cli.frames {
        let now = clock.advance(FRAME);
        report.frames += 1;

        feed.advance_to(now);
        relayout(&mut feed, now);

        match user.step(&mut feed, now) {
            Action::Scrolled => report.scroll_events += 1,
            Action::Wheeled => report.wheel_events += 1,
            Action::Waiting | Action::Idle => {}
        }

        let phase = feed.phase();
        if report.phases.last().map(|entry| entry.phase) != Some(phase) {
            info!(%phase, items = feed.item_count(), "entered phase");
            output::status(
                "Phase",
                format!("{phase} at {} ms with {} items", now.as_millis(), feed.item_count()),
            );
            report.phases.push(PhaseEntry {
                phase,
                entered_at: now,
                items: feed.item_count(),
            });
        }
        if phase.is_terminal() {
            break;
        }

        if feed.item_count() != last_count {
            last_count = feed.item_count();
            last_progress = now;
        } else if now.saturating_sub(last_progress) >= STALL_AFTER {
            output::warn(format!(
                "no item loaded for {}; the feed stalled in the {phase} phase",
                output::format_duration(STALL_AFTER)
            ));
            if phase == Phase::Horizontal && cli.exit_delay_ms.is_none() {
                output::note("pass --exit-delay-ms to auto-advance out of the horizontal phase");
            }
            break;
        }
    }

    report.items = feed.item_count();
    report.final_phase = feed.phase();
    report.elapsed = clock.now();
    report.stats = feed.stats();
    Ok(report)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;
    init_tracing();

    let report = run(&cli)?;
    if report.final_phase.is_terminal() {
        output::status(
            "Finished",
            format!(
                "{} items in {}",
                report.items,
                output::format_duration(report.elapsed)
            ),
        );
    }
    output::print_summary(&report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["phased-scroll-demo"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        assert!(cli(&["--scroll-speed", "0"]).validate().is_err());
        assert!(cli(&[]).validate().is_ok());
    }

    #[test]
    fn test_pinned_run_completes() {
        let report = run(&cli(&[])).expect("run");
        assert_eq!(report.final_phase, Phase::Complete);
        assert_eq!(report.items, 50);
        let phases: Vec<_> = report.phases.iter().map(|entry| entry.phase).collect();
        assert_eq!(
            phases,
            [
                Phase::InitialVertical,
                Phase::Horizontal,
                Phase::FinalVertical,
                Phase::Complete
            ]
        );
    }

    #[test]
    fn test_nested_run_stalls_without_exit_delay() {
        let report = run(&cli(&["--strategy", "nested"])).expect("run");
        assert_eq!(report.final_phase, Phase::Horizontal);
        assert_eq!(report.items, 30);
        assert!(report.wheel_events > 0);
    }

    #[test]
    fn test_nested_run_completes_with_exit_delay() {
        let report = run(&cli(&["--strategy", "nested", "--exit-delay-ms", "500"])).expect("run");
        assert_eq!(report.final_phase, Phase::Complete);
        assert_eq!(report.items, 50);
    }
}
