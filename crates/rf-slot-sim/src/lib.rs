//! # rf-slot-sim: Batch Spin Simulator
//!
//! Runs millions of spins of a slot math across worker threads and reports
//! RTP, hit rate, maximum win and per-combo hit counts.
//!
//! ## Architecture
//!
//! ```text
//! SimConfig (spins, seed, threads, bet)
//!     │
//!     v
//! run() ── ChaCha8 seeder ── WorkerJob × N
//!     │                          │
//!     │                    rayon ThreadPool
//!     │                          │
//!     │              SlotGroupModel per worker
//!     v                          v
//! SimReport  <──── merge ──── SimReport × N
//! ```

pub mod config;
pub mod report;
pub mod runner;

pub use config::*;
pub use report::*;
pub use runner::*;
