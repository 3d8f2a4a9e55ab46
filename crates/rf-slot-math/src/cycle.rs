//! Cycle results: steps through the pays of a play result one at a time
//!
//! Renderer-free: each step yields a [`CycleFrame`] naming the pay to show
//! and the positions to highlight. Everything not highlighted is dimmed by
//! whatever view consumes the frame.

use serde::Serialize;

use crate::result::{PlayResult, SymbPos};

/// Default time each pay stays on screen
pub const DEFAULT_CYCLE_MS: u64 = 1000;

/// One step of the win cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleFrame {
    pub pay_index: usize,
    pub payline: Option<usize>,
    pub final_award: u64,
    pub highlight: Vec<SymbPos>,
}

#[derive(Debug, Clone)]
pub struct CycleResults {
    display_ms: u64,
    remaining_ms: u64,
    pay_counter: usize,
    first_cycle_complete: bool,
    active: bool,
}

impl Default for CycleResults {
    fn default() -> Self {
        Self::new(DEFAULT_CYCLE_MS)
    }
}

impl CycleResults {
    pub fn new(display_ms: u64) -> Self {
        Self {
            display_ms,
            remaining_ms: 0,
            pay_counter: 0,
            first_cycle_complete: false,
            active: false,
        }
    }

    /// Start cycling. Does nothing when there is nothing to show.
    pub fn activate(&mut self, result: &PlayResult) -> bool {
        if result.pay_count() == 0 {
            return false;
        }
        self.active = true;
        self.first_cycle_complete = false;
        self.pay_counter = 0;
        self.remaining_ms = 0;
        true
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.remaining_ms = 0;
    }

    /// Show the next pay and restart the display timer
    pub fn start_animation(&mut self, result: &PlayResult) -> Option<CycleFrame> {
        if !self.active || result.pay_count() == 0 {
            return None;
        }

        // The result may have shrunk since activation
        let pay_index = self.pay_counter % result.pay_count();
        let pay = result.pay(pay_index)?;

        self.remaining_ms = self.display_ms;
        self.pay_counter = (pay_index + 1) % result.pay_count();
        if self.pay_counter == 0 {
            self.first_cycle_complete = true;
        }

        Some(CycleFrame {
            pay_index,
            payline: pay.payline(),
            final_award: pay.final_award(),
            highlight: pay.positions().to_vec(),
        })
    }

    /// Count the display timer down
    pub fn update(&mut self, elapsed_ms: u64) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }

    /// Expire the display timer
    pub fn stop_animation(&mut self) {
        self.remaining_ms = 0;
    }

    pub fn is_animating(&self) -> bool {
        self.remaining_ms > 0
    }

    /// Has every pay been shown at least once?
    pub fn is_first_cycle_complete(&self) -> bool {
        self.first_cycle_complete
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
