//! turnaround: headless run of the apron turnaround simulator.
//!
//! Simulates one aircraft stand: a dependency-gated operation schedule and
//! the service vehicles that drive in, dwell, and leave in step with it.
//! Results go to `operations.csv`, `legs.csv` and `vehicle_tracks.csv`.
//!
//! ```text
//! turnaround --variant automated --speed 8 --output output/auto
//! turnaround --compare --delay Refueling=5
//! RUST_LOG=apron_mobility=debug turnaround
//! ```

mod apron;
mod tables;

#[cfg(test)]
mod tests;

use std::io::Cursor;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use apron_core::SimConfig;
use apron_mobility::{LegEvent, NoPathPolicy, Vehicle, load_fleet_reader};
use apron_output::{CsvWriter, OutputWriter, SimOutputObserver};
use apron_schedule::{Operation, OperationTables, Variant, load_operations_reader};
use apron_sim::{Control, SimBuilder, SimObserver, Simulation, TickReport};
use apron_spatial::{GridFrame, GridPlanner, load_grid_csv};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, ValueEnum)]
enum NoPath {
    /// Abort the run.
    Fatal,
    /// Keep the vehicle idle and plan again next tick.
    Hold,
}

impl From<NoPath> for NoPathPolicy {
    fn from(p: NoPath) -> Self {
        match p {
            NoPath::Fatal => NoPathPolicy::Fatal,
            NoPath::Hold => NoPathPolicy::HoldAndRetry,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "aircraft turnaround simulator")]
struct Args {
    /// Operation table and fleet: manual or automated.
    #[arg(short, long, default_value = "manual")]
    variant: Variant,

    /// Speed multiplier, rounded down to a power of two.
    #[arg(short, long, default_value_t = 8)]
    speed: u32,

    /// Simulated frame rate; each tick advances 1/fps wall seconds.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// JSON file overriding the default tuning.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Occupancy grid CSV replacing the built-in apron.
    #[arg(short, long)]
    grid: Option<PathBuf>,

    #[arg(short, long, default_value = "output/turnaround")]
    output: PathBuf,

    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,

    #[arg(long, value_enum, default_value_t = NoPath::Fatal)]
    no_path: NoPath,

    /// Operator delay as OPERATION=MINUTES; may be repeated.
    #[arg(short, long)]
    delay: Vec<String>,

    /// Snapshot vehicle tracks every this many ticks; 0 disables.
    #[arg(long, default_value_t = 30)]
    snapshot: u64,

    /// After the first run, switch variant and run again.
    #[arg(long)]
    compare: bool,
}

fn parse_delay(arg: &str) -> Result<(&str, i32)> {
    let Some((name, minutes)) = arg.split_once('=') else {
        bail!("delay {arg:?} is not OPERATION=MINUTES");
    };
    let minutes = minutes.trim().parse().with_context(|| format!("delay {arg:?}"))?;
    Ok((name.trim(), minutes))
}

fn load_config(args: &Args) -> Result<SimConfig> {
    match &args.config {
        None => Ok(SimConfig::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
    }
}

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner: SimOutputObserver<W>,
    operation_rows: usize,
    leg_rows: usize,
    track_rows: usize,
    fast_ticks: u64,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, operation_rows: 0, leg_rows: 0, track_rows: 0, fast_ticks: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        if report.fast_forward {
            self.fast_ticks += 1;
        }
    }

    fn on_operation_completed(&mut self, op: &Operation) {
        self.operation_rows += 1;
        info!(op = op.name(), t = op.completion_time().unwrap_or_default(), "operation completed");
        self.inner.on_operation_completed(op);
    }

    fn on_leg_completed(&mut self, event: &LegEvent, vehicle: &Vehicle) {
        self.leg_rows += 1;
        self.inner.on_leg_completed(event, vehicle);
    }

    fn on_snapshot(&mut self, tick: u64, now: f64, vehicles: &[Vehicle]) {
        self.track_rows += vehicles.len();
        self.inner.on_snapshot(tick, now, vehicles);
    }

    fn on_reset(&mut self, variant: Variant, origin: f64) {
        self.inner.on_reset(variant, origin);
    }

    fn on_sim_end(&mut self, now: f64) {
        self.inner.on_sim_end(now);
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

fn mm_ss(t: f64) -> String {
    let secs = t.round() as i64;
    let sign = if secs < 0 { "-" } else { "" };
    format!("{sign}{:02}:{:02}", secs.abs() / 60, secs.abs() % 60)
}

fn print_summary(sim: &Simulation) {
    println!("{:<22} {:>8} {:>8} {:>6}", "Operation", "Start", "Done", "Delay");
    println!("{}", "-".repeat(47));
    for op in sim.operations() {
        println!(
            "{:<22} {:>8} {:>8} {:>6}",
            op.name,
            op.start_time.map_or_else(|| "-".to_owned(), mm_ss),
            op.completion_time.map_or_else(|| "-".to_owned(), mm_ss),
            op.delay_minutes,
        );
    }
    println!();

    println!("{:<20} {:<10} {:>8} {:>8}", "Vehicle", "State", "X", "Y");
    println!("{}", "-".repeat(49));
    for v in sim.vehicles() {
        println!(
            "{:<20} {:<10} {:>8.1} {:>8.1}",
            v.name,
            format!("{:?}", v.state),
            v.position.x,
            v.position.y,
        );
    }
    println!();
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Load the embedded data, build the simulation and apply the speed and
/// delay controls from `args`.
fn build_sim(args: &Args) -> Result<Simulation> {
    if args.fps <= 0.0 {
        bail!("--fps must be positive");
    }
    let config = load_config(args)?;

    // 1. Operation tables for both variants.
    let op_tables = OperationTables {
        manual: Some(load_operations_reader(Cursor::new(tables::MANUAL_OPERATIONS))?),
        automated: Some(load_operations_reader(Cursor::new(tables::AUTOMATED_OPERATIONS))?),
    };

    // 2. Grids: the built-in apron, or the given file with the aircraft frame.
    let base = match &args.grid {
        None => None,
        Some(path) => Some(
            load_grid_csv(path, GridFrame::from(&config.frame))
                .with_context(|| format!("loading grid {}", path.display()))?,
        ),
    };
    let grids = apron::grids(&config.frame, base)?;
    info!(rows = grids[0].1.rows(), cols = grids[0].1.cols(), open = grids[0].1.open_count(), "apron grid");

    // 3. Fleets.
    let manual_fleet = load_fleet_reader(Cursor::new(tables::MANUAL_FLEET))?;
    let automated_fleet = load_fleet_reader(Cursor::new(tables::AUTOMATED_FLEET))?;

    // 4. Build sim.
    let mut builder = SimBuilder::new(config, op_tables, GridPlanner::new(apron::service_road()))
        .variant(args.variant)
        .fleet(Variant::Manual, manual_fleet)
        .fleet(Variant::Automated, automated_fleet)
        .no_path_policy(args.no_path.into())
        .snapshot_interval(args.snapshot);
    for (name, grid) in grids {
        builder = builder.grid(name, grid);
    }
    for archetype in apron::archetypes() {
        builder = builder.archetype(archetype);
    }
    let mut sim = builder.build()?;

    // 5. Operator controls.
    while sim.multiplier().get().saturating_mul(2) <= args.speed {
        let before = sim.multiplier();
        sim.apply(Control::SpeedUp)?;
        if sim.multiplier() == before {
            warn!(requested = args.speed, max = %before, "speed capped");
            break;
        }
    }
    for arg in &args.delay {
        let (name, minutes) = parse_delay(arg)?;
        let op = sim.scheduler().id_of(name)?;
        sim.apply(Control::AdjustDelay { op, minutes })?;
    }
    Ok(sim)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut sim = build_sim(&args)?;

    // Output.
    let writer = CsvWriter::new(&args.output)?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, sim.variant()));

    println!("=== turnaround: {} variant, {} ===", sim.variant(), sim.multiplier());
    println!("Operations: {}  |  Vehicles: {}", sim.scheduler().len(), sim.fleet().len());
    println!();

    // Run, and optionally again with the other variant.
    let wall_dt = 1.0 / args.fps;
    let runs = if args.compare { 2 } else { 1 };
    for run in 0..runs {
        if run > 0 {
            sim.apply_with(Control::ToggleVariant, &mut obs)?;
            println!("=== switched to {} variant ===", sim.variant());
            println!();
        }

        let t0 = Instant::now();
        let ticks = sim.run(wall_dt, args.max_ticks, &mut obs)?;
        let elapsed = t0.elapsed();

        if let Some(e) = obs.inner.take_error() {
            eprintln!("output error: {e}");
        }
        if !sim.is_finished() {
            warn!(ticks, now = sim.now(), "stopped before every operation completed");
        }

        println!(
            "Run {run}: {ticks} ticks ({} fast-forward) in {:.3} s, turnaround {}",
            obs.fast_ticks,
            elapsed.as_secs_f64(),
            mm_ss(sim.now()),
        );
        println!();
        print_summary(&sim);
        obs.fast_ticks = 0;
    }

    println!("Output written to {}", args.output.display());
    println!("  operations.csv     : {} rows", obs.operation_rows);
    println!("  legs.csv           : {} rows", obs.leg_rows);
    println!("  vehicle_tracks.csv : {} rows", obs.track_rows);
    Ok(())
}
