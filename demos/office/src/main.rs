//! office — a small open-plan office with a cafeteria, a break room and two
//! meeting rooms.
//!
//! Fourteen workers, two managers and a trickle of cafeteria visitors run for
//! thirty simulated minutes.  Pass a JSON file as the first argument to
//! override the run settings and tuning:
//!
//! ```json
//! { "sim": { "total_ticks": 3000, "seed": 7 }, "tuning": { "talk_secs": 30.0 } }
//! ```
//!
//! Set `RUST_LOG=debug` to follow every state transition.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ot_behavior::Tuning;
use ot_core::{LineId, Point, RoomId, SeatingId, SimConfig, StationId, Tick, WorkerId};
use ot_facility::{Facilities, FloorPlan, FoodStation, Line, LinePurpose, MeetingRoom, SeatingArea};
use ot_output::{CsvWriter, SimOutputObserver};
use ot_sim::{ManagerSpec, SimBuilder, WorkerSpec};
use ot_spatial::DestinationArea;

// ── Constants ─────────────────────────────────────────────────────────────────

const DESK_WORKERS:     usize = 10;
const VISITOR_COUNT:    u64   = 8;
const VISITOR_SPACING:  u64   = 600; // one visitor every 2 simulated minutes
const OUTPUT_DIR:       &str  = "output/office";

const CURRY:   LineId = LineId(0);
const GRILL:   LineId = LineId(1);
const PAYMENT: LineId = LineId(2);

// ── Run settings ──────────────────────────────────────────────────────────────

#[derive(Default, Deserialize)]
#[serde(default)]
struct Settings {
    sim:    SimConfig,
    tuning: Tuning,
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Floor ─────────────────────────────────────────────────────────────────────

/// A queue of `len` slots lined up behind `entrance`.
fn queue(id: LineId, purpose: LinePurpose, entrance: Point, len: usize, service_secs: f32) -> Result<Line> {
    let slots = (1..=len).map(|i| Point::new(entrance.x, entrance.z + i as f32)).collect();
    Ok(Line::new(id, purpose, entrance, slots, service_secs)?)
}

fn build_facilities() -> Result<Facilities> {
    let mut f = Facilities::new();

    // Cafeteria: three tables of four.
    let seats = (0..3).flat_map(|table| {
        (0..4).map(move |chair| Point::new(-6.0 + table as f32 * 6.0, 32.0 + chair as f32))
    });
    f.add_seating(SeatingArea::new(seats)?)?;

    f.add_line(queue(CURRY, LinePurpose::Food, Point::new(-8.0, 22.0), 5, 6.0)?)?;
    f.add_line(queue(GRILL, LinePurpose::Food, Point::new(-3.0, 22.0), 5, 9.0)?)?;
    f.add_line(queue(PAYMENT, LinePurpose::Payment, Point::new(6.0, 22.0), 6, 3.0)?)?;

    // Two rooms along the east wall.
    for (i, z) in [(0u16, -10.0f32), (1, 10.0)] {
        let seats = (0..6).map(|s| Point::new(40.0 + (s % 3) as f32, z + (s / 3) as f32));
        f.add_room(MeetingRoom::new(RoomId(i), seats)?)?;
    }
    Ok(f)
}

fn build_plan() -> Result<FloorPlan> {
    Ok(FloorPlan {
        cafeteria_entrance:  Point::new(0.0, 20.0),
        cafeteria_exit:      Point::new(4.0, 20.0),
        waiting_area:        DestinationArea::new(Point::new(0.0, 28.0), 4.0, 2.0)?,
        snack_area:          DestinationArea::new(Point::new(10.0, 26.0), 2.0, 2.0)?,
        drink_area:          DestinationArea::new(Point::new(12.0, 30.0), 2.0, 2.0)?,
        food_stations:       vec![
            FoodStation { id: StationId(0), name: "Curry".into(), line: CURRY },
            FoodStation { id: StationId(1), name: "Grill".into(), line: GRILL },
        ],
        payment_line:        PAYMENT,
        cafeteria_seating:   SeatingId(0),
        break_drink_points:  vec![Point::new(-22.0, -4.0), Point::new(-22.0, 4.0)],
        break_room:          DestinationArea::new(Point::new(-25.0, 0.0), 6.0, 8.0)?,
        outside_areas:       vec![
            DestinationArea::new(Point::new(-45.0, 30.0), 10.0, 10.0)?,
            DestinationArea::new(Point::new(45.0, 40.0), 8.0, 12.0)?,
        ],
        patrol_waypoints:    vec![
            Point::new(-30.0, -20.0),
            Point::new(30.0, -20.0),
            Point::new(30.0, 20.0),
            Point::new(-30.0, 20.0),
        ],
        transport_waypoints: vec![
            Point::new(-35.0, -30.0),
            Point::new(35.0, -30.0),
            Point::new(0.0, 40.0),
        ],
    })
}

// ── Staff ─────────────────────────────────────────────────────────────────────

/// Desks in two rows of five; the rest of the floor staff walks routes.
/// Returns the two managers' rosters.
fn add_staff(builder: &mut SimBuilder) -> [Vec<WorkerId>; 2] {
    let mut north = Vec::new();
    let mut south = Vec::new();
    for i in 0..DESK_WORKERS {
        let row = if i < DESK_WORKERS / 2 { -6.0 } else { 6.0 };
        let desk = Point::new(-10.0 + (i % 5) as f32 * 5.0, row);
        let id = builder.add_worker(WorkerSpec::desk(desk));
        if row < 0.0 { north.push(id) } else { south.push(id) }
    }
    north.push(builder.add_worker(WorkerSpec::patrol(Point::new(-30.0, -20.0))));
    south.push(builder.add_worker(WorkerSpec::patrol(Point::new(30.0, 20.0))));
    north.push(builder.add_worker(WorkerSpec::transport(Point::new(-35.0, -30.0))));
    south.push(builder.add_worker(WorkerSpec::transport(Point::new(35.0, -30.0))));
    [north, south]
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let Settings { sim: config, tuning } = load_settings(settings_path.as_deref())?;

    // 1. Build the floor and its people.
    let mut builder = SimBuilder::new(config.clone(), build_plan()?, build_facilities()?).tuning(tuning);
    let [north, south] = add_staff(&mut builder);
    builder.add_manager(ManagerSpec::in_office(Point::new(-15.0, -15.0), north));
    builder.add_manager(ManagerSpec::in_office(Point::new(15.0, 15.0), south));
    for i in 0..VISITOR_COUNT {
        builder.add_visitor(Tick(300 + i * VISITOR_SPACING));
    }
    let mut sim = builder.build()?;

    // 2. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = SimOutputObserver::new(writer, &config);

    // 3. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        return Err(e).context("writing output");
    }
    info!(secs = elapsed.as_secs_f64(), dir = OUTPUT_DIR, "wrote agent_snapshots.csv and tick_summaries.csv");

    // 4. Final state table.
    println!("{:<10} {:<10} {:<22} {:<8}", "Worker", "Kind", "State", "Hunger");
    println!("{}", "-".repeat(52));
    for w in &sim.workers {
        println!(
            "{:<10} {:<10} {:<22} {:<8}",
            w.id.0,
            w.kind.as_str(),
            w.state_label(),
            w.needs.hunger,
        );
    }
    for m in &sim.managers {
        println!("{:<10} {:<10} {:<22}", m.id.0, "manager", format!("{:?}", m.state()));
    }
    let stats = sim.tick_stats();
    println!();
    println!(
        "working {}  cafeteria {}  meeting {}  talking {}  visitors on floor {}",
        stats.working,
        stats.in_cafeteria,
        stats.in_meeting,
        stats.talking,
        sim.visitors.iter().filter(|v| !v.has_departed()).count(),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ot_sim::NoopObserver;

    #[test]
    fn scene_builds_and_runs() {
        let facilities = build_facilities().unwrap();
        assert_eq!(facilities.rooms().len(), 2);
        assert_eq!(facilities.rooms()[1].id, RoomId(1));

        let config = SimConfig { total_ticks: 50, ..SimConfig::default() };
        let mut builder = SimBuilder::new(config, build_plan().unwrap(), facilities);
        let [north, south] = add_staff(&mut builder);
        assert_eq!(north.len() + south.len(), DESK_WORKERS + 4);
        builder.add_manager(ManagerSpec::in_office(Point::new(-15.0, -15.0), north));
        builder.add_manager(ManagerSpec::in_office(Point::new(15.0, 15.0), south));
        let mut sim = builder.build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.now(), Tick(50));
    }
}
