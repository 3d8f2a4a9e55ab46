//! # rf-slot-math: Slot Math Evaluation Core
//!
//! Loads slot math (symbols, strips, paytables, paylines), draws strip stops
//! and evaluates payline and scatter wins into play results.
//!
//! ## Features
//!
//! - **Math Documents**: JSON/YAML math and payline documents, fully
//!   cross-checked at load time
//! - **Weighted Strips**: uniform or weighted stop draws, circular windows
//!   with negative offsets
//! - **Evaluation**: payline pays in combo order, one award per payline;
//!   exact-count scatter pays restricted by a position mask
//! - **Game Round**: bet manager, per-group results and a headless win cycler
//!
//! ## Architecture
//!
//! ```text
//! SlotMathManager ── MathParser ── JSON / YAML
//!     │
//!     ├── SlotMath (Arc)     symbols, strips, strip sets, combos, paytables
//!     └── PaylineSet (Arc)   lines + scatter mask
//!           │
//!           v
//!     SlotGroupModel ── generate_stops() ── evaluate(&mut PlayResult, &BetSource)
//!           │
//!           v
//!     SlotGame (state machine) → SlotResults → CycleResults → CycleFrame
//! ```

pub mod bet;
pub mod cycle;
pub mod error;
pub mod game;
pub mod manager;
pub mod math;
pub mod model;
pub mod parser;
pub mod paytable;
pub mod result;
pub mod strip;
pub mod symbols;

pub use bet::*;
pub use cycle::*;
pub use error::*;
pub use game::*;
pub use manager::*;
pub use math::*;
pub use model::*;
pub use parser::{DocFormat, MathLimits, MathParser};
pub use paytable::*;
pub use result::*;
pub use strip::*;
pub use symbols::*;
