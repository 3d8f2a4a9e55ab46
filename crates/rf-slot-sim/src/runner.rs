//! Parallel spin runner
//!
//! Spins are split across rayon workers. Every worker builds its own
//! `SlotGroupModel`, seeded from a ChaCha8 stream derived from the master
//! seed, so no RNG is shared between threads. Results are reproducible for a
//! given seed and worker count.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use thiserror::Error;

use rf_slot_math::{BetSource, FixedBet, PaylineSet, PlayResult, SlotError, SlotGroupModel, SlotMath};

use crate::config::SimConfig;
use crate::report::SimReport;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Slot math error: {0}")]
    Math(#[from] SlotError),

    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;

/// One worker's share of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WorkerJob {
    spins: u64,
    seed: u64,
}

/// Run `config.spins` spins and return the merged report
pub fn run(math: Arc<SlotMath>, paylines: Arc<PaylineSet>, config: &SimConfig) -> SimResult<SimReport> {
    config.validate()?;

    let bet = FixedBet {
        line_bet: config.line_bet,
        total_lines: config
            .total_lines
            .unwrap_or(paylines.line_count().max(1) as u64),
    };

    // Surface configuration errors once, before any thread starts
    SlotGroupModel::create_seeded(
        Arc::clone(&math),
        Arc::clone(&paylines),
        &config.strip_set,
        &config.paytable_set,
        0,
    )?;

    let mut seeder = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    let jobs = split_jobs(config.spins, config.worker_count(), &mut seeder);

    log::info!(
        "Simulating {} spins of {} on {} workers",
        config.spins,
        math.id(),
        jobs.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.len())
        .build()
        .map_err(|e| SimError::ThreadPool(e.to_string()))?;

    let reports = pool.install(|| {
        jobs.par_iter()
            .map(|job| run_worker(&math, &paylines, config, bet, *job))
            .collect::<SimResult<Vec<_>>>()
    })?;

    let report = reports.iter().fold(SimReport::default(), |mut acc, r| {
        acc.merge(r);
        acc
    });

    log::info!(
        "Simulation done: RTP {:.3}%, hit rate {:.3}%",
        report.rtp(),
        report.hit_rate()
    );

    Ok(report)
}

fn split_jobs(spins: u64, workers: usize, seeder: &mut ChaCha8Rng) -> Vec<WorkerJob> {
    let workers = workers.max(1) as u64;
    let base = spins / workers;
    let extra = spins % workers;

    (0..workers)
        .map(|i| WorkerJob {
            spins: base + u64::from(i < extra),
            seed: seeder.random(),
        })
        .collect()
}

fn run_worker(
    math: &Arc<SlotMath>,
    paylines: &Arc<PaylineSet>,
    config: &SimConfig,
    bet: FixedBet,
    job: WorkerJob,
) -> SimResult<SimReport> {
    let mut model = SlotGroupModel::create_seeded(
        Arc::clone(math),
        Arc::clone(paylines),
        &config.strip_set,
        &config.paytable_set,
        job.seed,
    )?;

    let total_bet = bet.total_bet();
    let mut result = PlayResult::new();
    let mut report = SimReport::default();

    for _ in 0..job.spins {
        result.clear();
        model.generate_stops();
        model.evaluate(&mut result, &bet)?;
        report.record(&result, total_bet);
    }

    log::debug!("Worker finished {} spins (seed {})", job.spins, job.seed);
    Ok(report)
}
