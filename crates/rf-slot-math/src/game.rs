//! Slot game: drives one play from wager to award
//!
//! The game owns the bet manager, the results and every slot group. A view
//! (or a headless driver) calls [`SlotGame::process_game_state`] once per
//! frame and reports back when the groups it animates have stopped.

use serde::{Deserialize, Serialize};

use crate::bet::{BetManager, BetSource};
use crate::cycle::{CycleFrame, CycleResults};
use crate::error::{SlotError, SlotResult};
use crate::model::SlotGroupModel;
use crate::result::{PlayResult, SlotResults};

/// Play states, in round order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    #[default]
    Idle,
    KillCycleResults,
    PlaceWager,
    GenerateStops,
    Evaluate,
    PreSpin,
    Spin,
    PostSpin,
    PreAwardWin,
    BonusDecision,
    PreBonus,
    Bonus,
    PostBonus,
    PostAwardWin,
    WaitForAward,
    End,
}

impl SlotState {
    /// State following this one when nothing blocks
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::KillCycleResults => Self::PlaceWager,
            Self::PlaceWager => Self::GenerateStops,
            Self::GenerateStops => Self::Evaluate,
            Self::Evaluate => Self::PreSpin,
            Self::PreSpin => Self::Spin,
            Self::Spin => Self::PostSpin,
            Self::PostSpin => Self::PreAwardWin,
            Self::PreAwardWin => Self::BonusDecision,
            Self::BonusDecision => Self::PreBonus,
            Self::PreBonus => Self::Bonus,
            Self::Bonus => Self::PostBonus,
            Self::PostBonus => Self::PostAwardWin,
            Self::PostAwardWin => Self::WaitForAward,
            Self::WaitForAward => Self::End,
            Self::End => Self::Idle,
        }
    }
}

/// A model plus its play result slot and win cycler
#[derive(Debug)]
pub struct SlotGroup {
    model: SlotGroupModel,
    result_index: usize,
    cycle: CycleResults,
    spinning: bool,
}

impl SlotGroup {
    pub fn model(&self) -> &SlotGroupModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut SlotGroupModel {
        &mut self.model
    }

    /// Index of this group's result in [`SlotResults`]
    pub fn result_index(&self) -> usize {
        self.result_index
    }

    pub fn cycle(&self) -> &CycleResults {
        &self.cycle
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }
}

/// One slot game: bets, per-group results and the round state machine
#[derive(Debug, Default)]
pub struct SlotGame {
    state: SlotState,
    bets: BetManager,
    results: SlotResults,
    groups: Vec<SlotGroup>,
}

impl SlotGame {
    pub fn new(bets: BetManager) -> Self {
        Self {
            bets,
            ..Default::default()
        }
    }

    /// Add a group with the default cycle timing. Returns its index.
    pub fn add_slot_group(&mut self, model: SlotGroupModel) -> usize {
        self.add_slot_group_with_cycle(model, CycleResults::default())
    }

    pub fn add_slot_group_with_cycle(&mut self, model: SlotGroupModel, cycle: CycleResults) -> usize {
        let result_index = self.results.create();
        self.groups.push(SlotGroup {
            model,
            result_index,
            cycle,
            spinning: false,
        });
        self.groups.len() - 1
    }

    /// Play button. Starts a play when idle and the bet is covered; during a
    /// spin it stops the spin instead. Returns `true` if a play started.
    pub fn play_game(&mut self) -> bool {
        match self.state {
            SlotState::Idle if self.bets.allow_play() && !self.groups.is_empty() => {
                self.state = if self.is_cycle_results_active() {
                    SlotState::KillCycleResults
                } else {
                    SlotState::PlaceWager
                };
                true
            }
            SlotState::Spin => {
                self.stop_all_spins();
                false
            }
            _ => false,
        }
    }

    /// Run the current state once and return the new state
    pub fn process_game_state(&mut self) -> SlotResult<SlotState> {
        match self.state {
            SlotState::Idle => {}
            SlotState::KillCycleResults => {
                self.kill_cycle_results();
                self.state = self.state.next();
            }
            SlotState::PlaceWager => {
                if !self.bets.deduct_bet() {
                    self.state = SlotState::Idle;
                    return Err(SlotError::InvalidState(format!(
                        "Credits {} do not cover bet {}",
                        self.bets.credits(),
                        self.bets.total_bet()
                    )));
                }
                self.results.clear();
                self.state = self.state.next();
            }
            SlotState::GenerateStops => {
                for group in &mut self.groups {
                    group.model.generate_stops();
                }
                self.state = self.state.next();
            }
            SlotState::Evaluate => {
                for group in &mut self.groups {
                    let result = self.results.get_mut(group.result_index).ok_or_else(|| {
                        SlotError::InvalidState(format!("No play result at {}", group.result_index))
                    })?;
                    group.model.evaluate(result, &self.bets)?;
                }
                self.results.sort_pays();
                let total_win = self.results.add_up_win();
                log::debug!("Play evaluated: total win {}", total_win);
                self.state = self.state.next();
            }
            SlotState::PreSpin => {
                for group in &mut self.groups {
                    group.spinning = true;
                }
                self.state = self.state.next();
            }
            SlotState::Spin => {
                if self.groups.iter().all(|g| !g.spinning) {
                    self.state = self.state.next();
                }
            }
            SlotState::PostAwardWin => {
                if self.results.is_win() {
                    self.bets.add_award(self.results.total_win());
                    for group in &mut self.groups {
                        if let Some(result) = self.results.get(group.result_index) {
                            group.cycle.activate(result);
                        }
                    }
                }
                self.state = self.state.next();
            }
            SlotState::PostSpin
            | SlotState::PreAwardWin
            | SlotState::BonusDecision
            | SlotState::PreBonus
            | SlotState::Bonus
            | SlotState::PostBonus
            | SlotState::WaitForAward
            | SlotState::End => {
                self.state = self.state.next();
            }
        }

        Ok(self.state)
    }

    /// The view finished spinning group `index`
    pub fn report_group_stopped(&mut self, index: usize) -> SlotResult<()> {
        let group = self
            .groups
            .get_mut(index)
            .ok_or_else(|| SlotError::InvalidState(format!("No slot group at {index}")))?;
        group.spinning = false;
        Ok(())
    }

    /// Stop every spinning group at once
    pub fn stop_all_spins(&mut self) {
        for group in &mut self.groups {
            group.spinning = false;
        }
    }

    /// Advance the win cycle timers. When every group's current pay has
    /// finished showing, each active group moves to its next pay.
    pub fn update(&mut self, elapsed_ms: u64) -> Vec<(usize, CycleFrame)> {
        for group in &mut self.groups {
            group.cycle.update(elapsed_ms);
        }

        if !self.is_cycle_results_active() || self.is_cycle_results_animating() {
            return Vec::new();
        }

        let mut frames = Vec::new();
        for (index, group) in self.groups.iter_mut().enumerate() {
            if let Some(result) = self.results.get(group.result_index) {
                if let Some(frame) = group.cycle.start_animation(result) {
                    frames.push((index, frame));
                }
            }
        }
        frames
    }

    /// Run one whole play without a view. Spins stop immediately.
    /// Returns the total win.
    pub fn play_round(&mut self) -> SlotResult<u64> {
        if !self.play_game() {
            return Err(SlotError::InvalidState(format!("Cannot start a play in state {:?}", self.state)));
        }

        loop {
            match self.process_game_state()? {
                SlotState::Spin => self.stop_all_spins(),
                SlotState::Idle => break,
                _ => {}
            }
        }

        Ok(self.results.total_win())
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn bets(&self) -> &BetManager {
        &self.bets
    }

    pub fn bets_mut(&mut self) -> &mut BetManager {
        &mut self.bets
    }

    pub fn results(&self) -> &SlotResults {
        &self.results
    }

    /// Play result of group `index`
    pub fn play_result(&self, index: usize) -> Option<&PlayResult> {
        self.groups
            .get(index)
            .and_then(|g| self.results.get(g.result_index))
    }

    pub fn group(&self, index: usize) -> Option<&SlotGroup> {
        self.groups.get(index)
    }

    pub fn group_mut(&mut self, index: usize) -> Option<&mut SlotGroup> {
        self.groups.get_mut(index)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_cycle_results_active(&self) -> bool {
        self.groups.iter().any(|g| g.cycle.is_active())
    }

    pub fn is_cycle_results_animating(&self) -> bool {
        self.groups.iter().any(|g| g.cycle.is_animating())
    }

    fn kill_cycle_results(&mut self) {
        for group in &mut self.groups {
            group.cycle.stop_animation();
            group.cycle.deactivate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MathParser;
    use crate::paytable::PaylineSet;
    use serde_json::json;
    use std::sync::Arc;

    /// Every stop shows A on every line, so every play wins
    fn always_win_model() -> SlotGroupModel {
        let doc = json!({
            "id": "aaa",
            "symbol_sets": [{ "id": "base", "symbols": ["A"] }],
            "strips": [{ "id": "r", "symbol_set": "base", "stops": ["A", "A"] }],
            "strip_sets": [{ "id": "main", "strips": [
                { "strip": "r", "eval": [0] },
                { "strip": "r", "eval": [0] },
                { "strip": "r", "eval": [0] }
            ]}],
            "combo_sets": [{ "id": "c", "combos": [{ "symbol": "A", "count": 3, "award": 10 }] }],
            "paytable_sets": [{ "id": "pt", "paytables": [{ "kind": "payline", "combo_set": "c" }] }]
        });
        let math = Arc::new(MathParser::new().parse_json(&doc.to_string(), "test").unwrap());
        let lines = Arc::new(PaylineSet::new("l", vec![vec![0, 0, 0]], Vec::new()));
        SlotGroupModel::create_seeded(math, lines, "main", "pt", 3).unwrap()
    }

    #[test]
    fn test_state_order() {
        let mut state = SlotState::KillCycleResults;
        let mut seen = vec![state];
        while state != SlotState::Idle {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(seen.len(), 16);
        assert_eq!(seen[seen.len() - 2], SlotState::End);
    }

    #[test]
    fn test_play_needs_credits() {
        let mut game = SlotGame::new(BetManager::new(1, 1, 0));
        game.add_slot_group(always_win_model());
        assert!(!game.play_game());
        assert_eq!(game.state(), SlotState::Idle);
        assert!(game.play_round().is_err());
    }

    #[test]
    fn test_full_round() {
        let mut game = SlotGame::new(BetManager::new(2, 1, 10));
        game.add_slot_group(always_win_model());

        let win = game.play_round().unwrap();
        assert_eq!(win, 20);
        assert_eq!(game.bets().credits(), 10 - 2 + 20);
        assert_eq!(game.state(), SlotState::Idle);
        assert!(game.is_cycle_results_active());
        assert_eq!(game.play_result(0).unwrap().pay_count(), 1);
    }

    #[test]
    fn test_spin_waits_for_view() {
        let mut game = SlotGame::new(BetManager::new(1, 1, 5));
        game.add_slot_group(always_win_model());
        assert!(game.play_game());

        while game.state() != SlotState::Spin {
            game.process_game_state().unwrap();
        }
        assert!(game.group(0).unwrap().is_spinning());
        assert_eq!(game.process_game_state().unwrap(), SlotState::Spin);

        game.report_group_stopped(0).unwrap();
        assert!(game.report_group_stopped(4).is_err());
        assert_eq!(game.process_game_state().unwrap(), SlotState::PostSpin);
    }

    #[test]
    fn test_second_play_kills_cycle() {
        let mut game = SlotGame::new(BetManager::new(1, 1, 5));
        game.add_slot_group(always_win_model());
        game.play_round().unwrap();

        let frames = game.update(0);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].1.final_award, 10);
        assert!(game.update(10).is_empty());

        assert!(game.play_game());
        assert_eq!(game.state(), SlotState::KillCycleResults);
        game.process_game_state().unwrap();
        assert!(!game.is_cycle_results_active());
    }
}
