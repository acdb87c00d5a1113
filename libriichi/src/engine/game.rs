//! The multi-kyoku match wrapper: dealer rotation, honba, riichi-stick
//! carry-over, and game-end ranking around a sequence of [`Kyoku`]s.
//!
//! Grounded on `tsubakisakura-riichi-rs`'s top-level `engine::step` loop for
//! the continuation/rotation rules; the exact all-last tail behavior
//! (`is_tonpuusen`/`half`) follows spec.md §3's `GameMode` split.

use std::collections::BTreeMap;

use anyhow::Result as AnyResult;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use crate::obs::{self, Turn};
use crate::rankings::Rankings;
use crate::tile::{GameMode, Tile};
use crate::tu8;

use super::action::Action;
use super::error::{invalid_action, EngineError, EngineResult};
use super::kyoku::{Kyoku, KyokuEnd, Observation, StepOutcome};
use super::rules::Rules;

/// Reward constants for the RL fast path (SPEC_FULL.md §4.6), 1st..4th place.
pub const RANK_REWARDS: [f32; 4] = [0.9, 0.45, 0.0, -1.35];

/// Final-scores rank (0 = 1st) with the standard oya-priority tiebreak: a
/// tie is broken in favor of whichever seat is closer to the dealer in
/// play order, which [`Rankings`] already encodes via lower absolute seat
/// order after rotation is folded into `scores`' seat indexing.
#[must_use]
pub fn rewards_from_scores(scores: [i32; 4]) -> [f32; 4] {
    let ranks = Rankings::new(scores);
    std::array::from_fn(|seat| RANK_REWARDS[ranks.rank_by_player[seat] as usize])
}

/// A single kyoku's settlement, surfaced to a caller stepping the whole
/// match rather than one hand.
#[derive(Debug, Clone)]
pub struct KyokuOutcome {
    pub end: KyokuEnd,
    pub scores: [i32; 4],
    pub next_oya: u8,
    pub next_honba: u32,
    pub next_kyoku_idx: u8,
    pub game_over: bool,
}

/// Either the match wants more seat input, or the current kyoku just ended
/// (the caller must call [`Game::advance`] to deal the next one, unless
/// `game_over`).
#[derive(Debug, Clone)]
pub enum GameStepOutcome {
    Continue(BTreeMap<u8, Observation>),
    KyokuEnded(KyokuOutcome),
}

/// Drives a full match of kyokus to completion, carrying scores, honba, and
/// riichi sticks across hand boundaries. `kyoku_idx` is a flat 0-based
/// counter (`0..4` = East 1..4, `4..8` = South 1..4); `round_wind` is
/// derived from it rather than tracked independently.
#[pyclass]
pub struct Game {
    pub mode: GameMode,
    pub rules: Rules,
    rng: ChaCha12Rng,
    pub scores: [i32; 4],
    pub oya: u8,
    pub honba: u32,
    pub riichi_sticks: u32,
    pub kyoku_idx: u8,
    pub kyoku: Kyoku,
    ended: bool,
    /// The legal-action table each seat's most recently issued `Turn` was
    /// built against, kept so `step_y47` can resolve an `action_index` back
    /// to a concrete [`Action`]. `None` until `reset_y47` has run once.
    y47_legal_actions: Option<BTreeMap<u8, Vec<Action>>>,
}

impl Game {
    /// Deals the first kyoku of a new match and returns the initial
    /// per-seat observation, matching spec.md §6's `reset(seed?)` contract.
    #[must_use]
    pub fn new(mode: GameMode, rules: Rules, seed: u64) -> Self {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let scores = [rules.starting_score; 4];
        let kyoku_seed = rng.next_u64();
        let kyoku = Kyoku::new(mode, rules, round_wind_for(0), 0, 0, 0, 0, scores, kyoku_seed, false);
        Self {
            mode,
            rules,
            rng,
            scores,
            oya: 0,
            honba: 0,
            riichi_sticks: 0,
            kyoku_idx: 0,
            kyoku,
            ended: false,
            y47_legal_actions: None,
        }
    }

    #[must_use]
    pub fn observations(&self) -> BTreeMap<u8, Observation> {
        self.kyoku.observations()
    }

    /// Total kyokus in this match before the all-last tail rule can extend
    /// it (East-only = 4, hanchan = 8).
    fn base_kyoku_count(&self) -> u8 {
        if self.mode.is_tonpuusen() { 4 } else { 8 }
    }

    pub fn step(&mut self, actions: BTreeMap<u8, Action>) -> EngineResult<GameStepOutcome> {
        if self.ended {
            return Err(EngineError::Poisoned);
        }
        match self.kyoku.step(actions)? {
            StepOutcome::Continue(obs) => Ok(GameStepOutcome::Continue(obs)),
            StepOutcome::Ended(end) => {
                let dealer_continues = match &end {
                    KyokuEnd::Hule { dealer_continues, .. } => *dealer_continues,
                    KyokuEnd::Ryuukyoku { dealer_continues, .. } => *dealer_continues,
                };
                self.scores = self.kyoku.scores;
                self.riichi_sticks = self.kyoku.riichi_sticks;
                self.honba = if dealer_continues { self.honba + 1 } else { 0 };
                if !dealer_continues {
                    self.oya = (self.oya + 1) % 4;
                    self.kyoku_idx += 1;
                }
                let game_over = self.is_last_hand_complete(dealer_continues);
                self.ended = game_over;
                Ok(GameStepOutcome::KyokuEnded(KyokuOutcome {
                    end,
                    scores: self.scores,
                    next_oya: self.oya,
                    next_honba: self.honba,
                    next_kyoku_idx: self.kyoku_idx,
                    game_over,
                }))
            }
        }
    }

    /// Whether the match is over after the hand that just settled. The
    /// standard hanchan tail rule: once South 4 (or East 4 for tonpuusen)
    /// has been played, the match ends as soon as a hand completes with the
    /// dealer *not* continuing; a dealer repeat extends it one more hand.
    fn is_last_hand_complete(&self, dealer_continues: bool) -> bool {
        let last_idx = self.base_kyoku_count() - 1;
        let just_played = if dealer_continues { self.kyoku_idx } else { self.kyoku_idx - 1 };
        just_played >= last_idx && !dealer_continues
    }

    /// Deals the next kyoku after a [`GameStepOutcome::KyokuEnded`] with
    /// `game_over == false`. Panics if called while the match has ended or
    /// mid-kyoku.
    #[must_use]
    pub fn advance(&mut self) -> BTreeMap<u8, Observation> {
        assert!(!self.ended, "match already ended");
        let kyoku_seed = self.rng.next_u64();
        self.kyoku = Kyoku::new(
            self.mode,
            self.rules,
            round_wind_for(self.kyoku_idx),
            self.oya,
            self.honba,
            self.riichi_sticks,
            self.kyoku_idx,
            self.scores,
            kyoku_seed,
            false,
        );
        self.kyoku.observations()
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Final per-seat rank reward, valid only once [`Game::is_ended`].
    #[must_use]
    pub fn rewards(&self) -> [f32; 4] {
        rewards_from_scores(self.scores)
    }

    /// Encodes the current observations into the per-seat `Turn` fast-path
    /// view, recording each seat's legal-action table so a later `step_y47`
    /// can resolve an `action_index` back to a concrete [`Action`].
    fn encode_turns(&mut self) -> BTreeMap<u8, Turn> {
        let turns: BTreeMap<u8, Turn> =
            self.observations().iter().map(|(&seat, o)| (seat, obs::encode(o))).collect();
        self.y47_legal_actions =
            Some(turns.iter().map(|(&seat, t)| (seat, t.legal_actions.clone())).collect());
        turns
    }

    /// RL fast path (spec.md §4.6): starts a fresh match with the given seed
    /// under this `Game`'s already-configured `mode`/`rules`, returning the
    /// initial per-seat [`Turn`] encoding.
    pub fn reset_y47(&mut self, seed: u64) -> BTreeMap<u8, Turn> {
        *self = Self::new(self.mode, self.rules, seed);
        self.encode_turns()
    }

    /// RL fast path counterpart to [`Game::step`]: takes an `action_index`
    /// per acting seat (resolved against the legal-action table the most
    /// recent `Turn` carried), advances the match exactly one `step` (and
    /// past a kyoku boundary, via [`Game::advance`], if the kyoku just
    /// ended), and returns the next per-seat `Turn`, the reward vector
    /// (all-zero until the match itself ends), and whether the match is over.
    ///
    /// Calling this before `reset_y47` has ever run is a programmer error:
    /// there is no legal-action table to resolve `action_index` against.
    pub fn step_y47(
        &mut self,
        action_indices: BTreeMap<u8, usize>,
    ) -> EngineResult<(BTreeMap<u8, Turn>, [f32; 4], bool)> {
        let Some(legal) = self.y47_legal_actions.take() else {
            return Err(EngineError::CorruptState(
                "step_y47 called with no turn issued by reset_y47/a prior step_y47".into(),
            ));
        };
        let mut actions = BTreeMap::new();
        for (&seat, &idx) in &action_indices {
            let candidates = legal.get(&seat).ok_or(EngineError::MissingOrExtraActor {
                expected: legal.keys().copied().collect(),
                got: action_indices.keys().copied().collect(),
            })?;
            let action = *candidates.get(idx).ok_or_else(|| {
                invalid_action(seat, "y47", format!("action_index {idx} out of range"))
            })?;
            actions.insert(seat, action);
        }
        match self.step(actions)? {
            GameStepOutcome::Continue(_) => Ok((self.encode_turns(), [0.0; 4], false)),
            GameStepOutcome::KyokuEnded(outcome) => {
                if outcome.game_over {
                    Ok((BTreeMap::new(), self.rewards(), true))
                } else {
                    let _ = self.advance();
                    Ok((self.encode_turns(), [0.0; 4], false))
                }
            }
        }
    }
}

/// Python-facing surface: mirrors the `reset_y47`/`step_y47` fast path as
/// plain dicts of seat -> [`Turn`], the same way `PlayerState`/`Gameplay`
/// structs are exposed to Python elsewhere in this crate.
#[pymethods]
impl Game {
    #[new]
    #[pyo3(signature = (mode, seed))]
    fn py_new(mode: &str, seed: u64) -> AnyResult<Self> {
        let mode = GameMode::from_str(mode)
            .ok_or_else(|| anyhow::anyhow!("unknown game mode {mode:?}"))?;
        Ok(Self::new(mode, Rules::default(), seed))
    }

    #[pyo3(name = "reset_y47")]
    fn py_reset_y47<'py>(&mut self, py: Python<'py>, seed: u64) -> AnyResult<Bound<'py, PyDict>> {
        turns_to_dict(py, self.reset_y47(seed))
    }

    #[pyo3(name = "step_y47")]
    fn py_step_y47<'py>(
        &mut self,
        py: Python<'py>,
        actions: BTreeMap<u8, usize>,
    ) -> AnyResult<(Bound<'py, PyDict>, [f32; 4], bool)> {
        let (turns, rewards, done) = self.step_y47(actions)?;
        Ok((turns_to_dict(py, turns)?, rewards, done))
    }

    #[pyo3(name = "is_ended")]
    fn py_is_ended(&self) -> bool {
        self.is_ended()
    }
}

fn turns_to_dict<'py>(py: Python<'py>, turns: BTreeMap<u8, Turn>) -> AnyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (seat, turn) in turns {
        dict.set_item(seat, Bound::new(py, turn)?)?;
    }
    Ok(dict)
}

fn round_wind_for(kyoku_idx: u8) -> Tile {
    Tile::new(if kyoku_idx < 4 { tu8!(E) } else { tu8!(S) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deals_east_one_on_reset() {
        let game = Game::new(GameMode::FourPlayerRedEast, Rules::default(), 1);
        assert_eq!(game.kyoku_idx, 0);
        assert_eq!(game.oya, 0);
        assert_eq!(game.scores, [25000; 4]);
        let obs = game.observations();
        assert_eq!(obs.len(), 1);
        assert!(obs.contains_key(&0));
    }

    #[test]
    fn east_only_match_ends_after_kyoku_idx_3_without_continuation() {
        let game = Game::new(GameMode::FourPlayerRedEast, Rules::default(), 1);
        assert_eq!(game.base_kyoku_count(), 4);
    }

    #[test]
    fn step_y47_before_reset_y47_is_corrupt_state() {
        let mut game = Game::new(GameMode::FourPlayerRedEast, Rules::default(), 1);
        let err = game.step_y47(BTreeMap::new()).unwrap_err();
        assert!(matches!(err, EngineError::CorruptState(_)));
    }

    #[test]
    fn reset_y47_yields_one_turn_with_the_dealers_legal_discards() {
        let mut game = Game::new(GameMode::FourPlayerRedEast, Rules::default(), 1);
        let turns = game.reset_y47(1);
        assert_eq!(turns.len(), 1);
        let turn = &turns[&0];
        assert!(turn.legal_mask.iter().filter(|&&m| m).count() >= 1);
        assert_eq!(turn.legal_actions.len(), turn.legal_mask.iter().filter(|&&m| m).count());
    }

    #[test]
    fn step_y47_resolves_action_index_and_advances_the_turn() {
        let mut game = Game::new(GameMode::FourPlayerRedEast, Rules::default(), 1);
        let turns = game.reset_y47(1);
        let discard_idx = turns[&0]
            .legal_actions
            .iter()
            .position(|a| matches!(a, Action::Discard { .. }))
            .expect("dealer always has a discard option");
        let mut actions = BTreeMap::new();
        actions.insert(0u8, discard_idx);
        let (next_turns, rewards, done) = game.step_y47(actions).unwrap();
        assert!(!done);
        assert_eq!(rewards, [0.0; 4]);
        assert!(!next_turns.is_empty());
    }
}
