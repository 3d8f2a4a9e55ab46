//! rf-slot-sim: simulate a slot math from the command line
//!
//! Usage:
//!   rf-slot-sim --math data/classic.json --paylines data/paylines.json \
//!       --strip-set main --paytable-set base --spins 1000000 --seed 42

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use rf_slot_math::{MathParser, PaylineSet};
use rf_slot_sim::{SimConfig, SimReport, run};

#[derive(Parser)]
#[command(name = "rf-slot-sim", about = "Batch spin simulator for slot math")]
struct Cli {
    /// Math document (.json, .yaml, .yml)
    #[arg(long)]
    math: PathBuf,

    /// Payline document (.json, .yaml, .yml)
    #[arg(long)]
    paylines: PathBuf,

    /// Strip set to spin
    #[arg(long)]
    strip_set: String,

    /// Paytable set to evaluate
    #[arg(long)]
    paytable_set: String,

    /// Payline set ID (defaults to the one named by the math)
    #[arg(long)]
    payline_set: Option<String>,

    /// Group name used in error messages
    #[arg(long, default_value = "base_game")]
    group: String,

    /// Number of spins
    #[arg(long, default_value_t = 1_000_000)]
    spins: u64,

    /// Master seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (0 = one per CPU)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Line bet
    #[arg(long, default_value_t = 1)]
    line_bet: u64,

    /// Lines played (defaults to every line of the payline set)
    #[arg(long)]
    lines: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let parser = MathParser::new();
    let math = parser
        .parse_file(&cli.math, &cli.group)
        .with_context(|| format!("loading math {}", cli.math.display()))?;
    let payline_sets = parser
        .parse_payline_file(&cli.paylines)
        .with_context(|| format!("loading paylines {}", cli.paylines.display()))?;

    let payline_id = cli
        .payline_set
        .clone()
        .unwrap_or_else(|| math.payline_set_id().to_string());
    let paylines = find_payline_set(payline_sets, &payline_id)?;

    log::info!("Loaded math {} with payline set {}", math.id(), paylines.id());

    let mut config = SimConfig::new(cli.strip_set, cli.paytable_set)
        .with_spins(cli.spins)
        .with_threads(cli.threads)
        .with_bet(cli.line_bet, cli.lines);
    config.seed = cli.seed;

    let report = run(Arc::new(math), Arc::new(paylines), &config).context("simulation failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn find_payline_set(sets: Vec<PaylineSet>, id: &str) -> Result<PaylineSet> {
    sets.into_iter()
        .find(|set| set.id() == id)
        .with_context(|| format!("payline set {id} not found"))
}

fn print_report(report: &SimReport) {
    println!("Spins:         {}", report.spins);
    println!("Total bet:     {}", report.total_bet);
    println!("Total win:     {}", report.total_win);
    println!("RTP:           {:.4}%", report.rtp());
    println!("Hit rate:      {:.4}%", report.hit_rate());
    println!("Max win:       {}", report.max_win);
    println!();
    println!("Combo hits:");
    for (combo, hits) in &report.combo_hits {
        let per_spin = *hits as f64 / report.spins.max(1) as f64;
        println!("  {combo:<28} {hits:>12}  (1 in {:.1})", 1.0 / per_spin);
    }
}
