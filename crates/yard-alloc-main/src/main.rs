// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use rayon::prelude::*;
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    error::Error,
    fs::File,
    io::{BufReader, BufWriter},
    time::Instant,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use yard_alloc_core::{class::ContainerClass, coord::SlotCoordinate};
use yard_alloc_engine::prelude::*;
use yard_alloc_model::prelude::*;

type RunError = Box<dyn Error + Send + Sync>;

const SESSIONS: u64 = 8;
const ARRIVALS_PER_SESSION: usize = 2_000;
const REPORT_PATH: &str = "yard_report.json";

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// First CLI argument: path of a JSON `EngineConfig`. Defaults otherwise.
fn load_config() -> Result<EngineConfig, Box<dyn Error>> {
    let Some(path) = std::env::args().nth(1) else {
        info!("no config path given, using the default yard");
        return Ok(EngineConfig::default());
    };
    let reader = BufReader::new(File::open(&path)?);
    let config: EngineConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    info!(path = %path, "loaded yard config");
    Ok(config)
}

#[derive(Debug, Clone, Default, Serialize)]
struct SessionReport {
    session: u64,
    engine_seed: u64,
    workload_seed: u64,
    arrivals: u64,
    placed_primary: u64,
    placed_overflow: u64,
    placed_expanded: u64,
    expansions: u32,
    unrecognized_iso_types: u64,
    failures: BTreeMap<&'static str, u64>,
    departures: u64,
    released: u64,
    exits_deferred: u64,
    exits_still_blocked: usize,
    standing: usize,
    final_max_row: u32,
    footprints_used: usize,
    full_bays: usize,
    footprint_capacity: usize,
    elapsed_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
struct YardReport {
    description: String,
    config: EngineConfig,
    sessions: Vec<SessionReport>,
}

/// Releases every deferred exit that has become unblocked, repeating until
/// a pass frees nothing.
fn drain_deferred<G: DensityGate>(
    engine: &mut YardEngine<G>,
    deferred: &mut Vec<OccupantId>,
    standing: &mut HashMap<OccupantId, SlotCoordinate>,
    report: &mut SessionReport,
) -> Result<(), RunError> {
    loop {
        let before = deferred.len();
        let mut still = Vec::with_capacity(before);
        for entry in deferred.drain(..) {
            let Some(&coord) = standing.get(&entry) else {
                continue;
            };
            if engine.is_exit_blocked(&coord) {
                still.push(entry);
                continue;
            }
            engine.release(coord)?;
            standing.remove(&entry);
            report.released += 1;
        }
        *deferred = still;
        if deferred.len() == before {
            return Ok(());
        }
    }
}

fn run_session(
    session: u64,
    config: &EngineConfig,
    workload: WorkloadGenConfig,
) -> Result<SessionReport, RunError> {
    let started = Instant::now();
    let mut engine = YardEngine::new(config)?;
    let generator = WorkloadGenerator::new(workload)?;

    let mut report = SessionReport {
        session,
        engine_seed: config.seed(),
        workload_seed: generator.config().seed(),
        ..SessionReport::default()
    };
    let mut standing: HashMap<OccupantId, SlotCoordinate> = HashMap::new();
    let mut deferred: Vec<OccupantId> = Vec::new();

    for event in generator {
        match event {
            YardEvent::Arrive {
                entry,
                owner,
                iso_type,
                status,
            } => {
                report.arrivals += 1;
                let class = match ContainerClass::from_iso_type(&iso_type, status) {
                    Ok(class) => class,
                    Err(e) => {
                        debug!(error = %e, "arrival rejected at the gate");
                        report.unrecognized_iso_types += 1;
                        continue;
                    }
                };
                match engine.allocate(class, owner, entry) {
                    Ok(outcome) => {
                        standing.insert(entry, outcome.coord());
                    }
                    Err(e) => {
                        debug!(error = %e, "arrival could not be placed");
                        *report.failures.entry(e.reason()).or_default() += 1;
                    }
                }
            }
            YardEvent::Depart { entry } => {
                let Some(&coord) = standing.get(&entry) else {
                    continue;
                };
                report.departures += 1;
                if engine.is_exit_blocked(&coord) {
                    report.exits_deferred += 1;
                    deferred.push(entry);
                    continue;
                }
                engine.release(coord)?;
                standing.remove(&entry);
                report.released += 1;
                drain_deferred(&mut engine, &mut deferred, &mut standing, &mut report)?;
            }
        }
    }

    let stats = engine.stats();
    report.placed_primary = stats.primary();
    report.placed_overflow = stats.overflow();
    report.placed_expanded = stats.expanded();
    report.expansions = stats.expansions();
    report.exits_still_blocked = deferred.len();
    report.standing = standing.len();
    report.final_max_row = engine.bounds().max_row().value();
    report.footprints_used = engine.occupancy().footprints_used();
    report.full_bays = engine.bay_ledger().full_bays();
    report.footprint_capacity = engine.bounds().footprint_capacity();
    report.elapsed_ms = started.elapsed().as_millis();

    info!(
        session,
        placed = stats.placed(),
        expansions = stats.expansions(),
        standing = report.standing,
        "session finished"
    );
    Ok(report)
}

fn main() -> Result<(), Box<dyn Error>> {
    enable_tracing();

    let config = load_config()?;
    info!(%config, "starting yard sessions");

    let sessions = (0..SESSIONS)
        .into_par_iter()
        .map(|session| -> Result<SessionReport, RunError> {
            let engine_config = config.clone().with_seed(config.seed().wrapping_add(session));
            let workload = WorkloadGenConfigBuilder::new()
                .owners(config.layout().owners().map(|(id, _)| id))
                .arrivals(ARRIVALS_PER_SESSION)
                .seed(config.seed() ^ (session << 32 | 0x9E37))
                .build()?;
            run_session(session, &engine_config, workload)
        })
        .collect::<Result<Vec<_>, RunError>>()
        .map_err(|e| -> Box<dyn Error> { e })?;

    let report = YardReport {
        description: format!(
            "Yard placement: {} seeded sessions of {} arrivals each.",
            SESSIONS, ARRIVALS_PER_SESSION
        ),
        config,
        sessions,
    };

    let writer = BufWriter::new(File::create(REPORT_PATH)?);
    serde_json::to_writer_pretty(writer, &report)?;

    let placed: u64 = report
        .sessions
        .iter()
        .map(|s| s.placed_primary + s.placed_overflow + s.placed_expanded)
        .sum();
    info!(sessions = report.sessions.len(), placed, path = REPORT_PATH, "report written");
    Ok(())
}
