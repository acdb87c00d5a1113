//! The RL observation encoder (spec.md §4.6): turns a [`crate::engine::kyoku::Observation`]
//! into the fixed-layout token/action tensors the `reset_y47`/`step_y47` fast
//! path hands to a learner, plus the reverse mapping from a chosen action
//! index back to a concrete [`Action`].
//!
//! Grounded on the ancestor's `dataset::gameplay::Gameplay` pyclass (plain
//! `pub` `Array2`/`Array1` fields, exposed to Python one-shot via
//! `mem::take` + `PyArray::from_owned_array` accessors) for the
//! numpy-interop shape, generalized from its offline per-transition replay
//! buffer to this crate's own single-turn token/action schema.

use std::mem;

use ndarray::{Array1, Array2};
use numpy::{PyArray1, PyArray2};
use pyo3::prelude::*;

use crate::engine::action::Action;
use crate::engine::kyoku::Observation;
use crate::engine::meld::MeldKind;
use crate::tile::Tid;

/// State-token row cap; a full 4-player board with maxed-out melds and
/// rivers never approaches this.
pub const MAX_STATE_TOKENS: usize = 256;
/// Legal-action row cap.
pub const MAX_ACTIONS: usize = 128;
/// Widest consumed-tile list any action carries (a kan call consumes 3).
pub const MAX_CONSUME_TILES: usize = 4;
pub const TID_NONE: i64 = 136;
pub const NUM_TIDS: usize = 137;
pub const MAX_DORA: usize = 5;
pub const MAX_HAND_TIDS: usize = 14;
pub const MAX_MELDS: usize = 4;
pub const MAX_MELD_TILES: usize = 4;
pub const MAX_RIVER: usize = 30;
pub const NUM_RIVER_FLAGS: u8 = 4;

pub const TSUMOGIRI: u8 = 1 << 0;
pub const RIICHI_TILE_FLAG: u8 = 1 << 1;

/// `token_main` column layout: `[kind, seat_rel, pos, pos2, tile, aux1, aux2]`.
const TOKEN_MAIN_COLS: usize = 7;
/// `token_scalar` column layout, spec.md §4.6: 3 free-form floats per row.
const TOKEN_SCALAR_COLS: usize = 3;
/// `action_main` column layout: `[kind, tile, from_rel, consume_len, has_tile, has_from]`.
const ACTION_MAIN_COLS: usize = 6;

#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Cls = 0,
    Round = 1,
    Score = 2,
    Dora = 3,
    Drawn = 4,
    Hand = 5,
    MeldTile = 6,
    River = 7,
}

#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Discard = 0,
    Chi = 1,
    Pon = 2,
    DaiMinKan = 3,
    AnKan = 4,
    KaKan = 5,
    Riichi = 6,
    Ron = 7,
    Tsumo = 8,
    Pass = 9,
    KyushuKyuhai = 10,
}

impl ActionKind {
    #[must_use]
    pub const fn of(action: &Action) -> Self {
        match action {
            Action::Discard { .. } => Self::Discard,
            Action::Chi { .. } => Self::Chi,
            Action::Pon { .. } => Self::Pon,
            Action::DaiMinKan { .. } => Self::DaiMinKan,
            Action::AnKan { .. } => Self::AnKan,
            Action::KaKan { .. } => Self::KaKan,
            Action::Riichi { .. } => Self::Riichi,
            Action::Ron => Self::Ron,
            Action::Tsumo => Self::Tsumo,
            Action::Pass => Self::Pass,
            Action::KyushuKyuhai => Self::KyushuKyuhai,
        }
    }
}

/// `(abs - me) mod 4`: the observer-relative seat index used throughout the
/// encoding so a learner never sees absolute seat numbers.
#[must_use]
const fn p_rel(abs: u8, me: u8) -> u8 {
    (abs + 4 - me) % 4
}

fn meld_kind_code(kind: MeldKind) -> i64 {
    match kind {
        MeldKind::Chi => 0,
        MeldKind::Pon => 1,
        MeldKind::DaiMinKan => 2,
        MeldKind::AnKan => 3,
        MeldKind::KaKan => 4,
    }
}

struct TokenRow {
    main: [i64; TOKEN_MAIN_COLS],
    scalar: [f32; TOKEN_SCALAR_COLS],
}

impl TokenRow {
    fn new(kind: TokenKind, seat_rel: u8, pos: i64, pos2: i64, tile: i64, aux1: i64, aux2: i64) -> Self {
        Self {
            main: [kind as i64, i64::from(seat_rel), pos, pos2, tile, aux1, aux2],
            scalar: [0.0; TOKEN_SCALAR_COLS],
        }
    }

    fn with_scalar(mut self, scalar: [f32; TOKEN_SCALAR_COLS]) -> Self {
        self.scalar = scalar;
        self
    }
}

/// The token rows for one observer's view of the board, built in a fixed,
/// deterministic order: CLS, ROUND, 4x SCORE, up to 5x DORA, DRAWN, up to 14x
/// HAND, up to 4x4 MELD_TILE, up to 4x30 RIVER.
fn build_tokens(obs: &Observation) -> Vec<TokenRow> {
    let me = obs.seat;
    let mut rows = Vec::with_capacity(MAX_STATE_TOKENS);

    rows.push(TokenRow::new(TokenKind::Cls, 0, 0, 0, TID_NONE, 0, 0));

    rows.push(
        TokenRow::new(
            TokenKind::Round,
            0,
            0,
            0,
            TID_NONE,
            i64::from(obs.round_wind.as_u8()),
            i64::from(p_rel(obs.oya, me)),
        )
        .with_scalar([
            obs.honba as f32 / 20.0,
            obs.riichi_sticks as f32 / 20.0,
            f32::from(obs.kyoku_idx) / 16.0,
        ]),
    );

    for abs in 0..4u8 {
        let rel = p_rel(abs, me);
        let aux1 = i64::from(obs.riichi_declared[abs as usize])
            | (i64::from(obs.double_riichi_declared[abs as usize]) << 1);
        rows.push(
            TokenRow::new(
                TokenKind::Score,
                rel,
                0,
                0,
                TID_NONE,
                aux1,
                obs.melds[abs as usize].len() as i64,
            )
            .with_scalar([(obs.scores[abs as usize] - 25_000) as f32 / 100_000.0, 0.0, 0.0]),
        );
    }

    for (i, &tid) in obs.dora_indicators.iter().take(MAX_DORA).enumerate() {
        rows.push(TokenRow::new(TokenKind::Dora, 0, i as i64, 0, i64::from(tid.as_u8()), 0, 0));
    }

    let drawn = if obs.drawn_tile.is_none() { TID_NONE } else { i64::from(obs.drawn_tile.as_u8()) };
    rows.push(TokenRow::new(TokenKind::Drawn, 0, 0, 0, drawn, 0, 0));

    for (i, &tid) in obs.hand.iter().take(MAX_HAND_TIDS).enumerate() {
        rows.push(TokenRow::new(TokenKind::Hand, 0, i as i64, 0, i64::from(tid.as_u8()), 0, 0));
    }

    for abs in 0..4u8 {
        let rel = p_rel(abs, me);
        for (midx, meld) in obs.melds[abs as usize].iter().take(MAX_MELDS).enumerate() {
            for (tidx, &tid) in meld.tiles.iter().take(MAX_MELD_TILES).enumerate() {
                rows.push(TokenRow::new(
                    TokenKind::MeldTile,
                    rel,
                    midx as i64,
                    tidx as i64,
                    i64::from(tid.as_u8()),
                    meld_kind_code(meld.kind),
                    i64::from(meld.opened()),
                ));
            }
        }
    }

    for abs in 0..4u8 {
        let rel = p_rel(abs, me);
        for (pos, entry) in obs.rivers[abs as usize].iter().take(MAX_RIVER).enumerate() {
            let mut flags = 0u8;
            if entry.tsumogiri {
                flags |= TSUMOGIRI;
            }
            if entry.riichi_tile {
                flags |= RIICHI_TILE_FLAG;
            }
            rows.push(TokenRow::new(
                TokenKind::River,
                rel,
                pos as i64,
                0,
                i64::from(entry.tile.as_u8()),
                i64::from(flags),
                0,
            ));
        }
    }

    if rows.len() > MAX_STATE_TOKENS {
        log::warn!("truncating {} state tokens to {MAX_STATE_TOKENS}", rows.len());
        rows.truncate(MAX_STATE_TOKENS);
    }
    rows
}

struct ActionRow {
    main: [i64; ACTION_MAIN_COLS],
    consume: [i64; MAX_CONSUME_TILES],
    consume_mask: [bool; MAX_CONSUME_TILES],
}

fn consume_row(consume: &[Tid]) -> ([i64; MAX_CONSUME_TILES], [bool; MAX_CONSUME_TILES]) {
    let mut tiles = [TID_NONE; MAX_CONSUME_TILES];
    let mut mask = [false; MAX_CONSUME_TILES];
    for (i, &tid) in consume.iter().enumerate() {
        tiles[i] = i64::from(tid.as_u8());
        mask[i] = true;
    }
    (tiles, mask)
}

/// The `(from_rel, has_from)` pair for a CHI/PON/DAIMINKAN/RON row, derived
/// from whichever of `last_discard`/`pending_kan` is live for this phase.
fn from_seat(obs: &Observation, me: u8) -> (i64, i64) {
    if let Some((discarder, _)) = obs.last_discard {
        (i64::from(p_rel(discarder, me)), 1)
    } else if let Some((actor, _, _)) = obs.pending_kan {
        (i64::from(p_rel(actor, me)), 1)
    } else {
        (0, 0)
    }
}

fn build_action_row(obs: &Observation, action: &Action) -> ActionRow {
    let me = obs.seat;
    let kind = ActionKind::of(action) as i64;
    match action {
        Action::Discard { tile } | Action::AnKan { tile } => ActionRow {
            main: [kind, i64::from(tile.as_u8()), 0, 0, 1, 0],
            consume: [TID_NONE; MAX_CONSUME_TILES],
            consume_mask: [false; MAX_CONSUME_TILES],
        },
        Action::Chi { tile, consume } | Action::Pon { tile, consume } => {
            let (from_rel, has_from) = from_seat(obs, me);
            let (c, m) = consume_row(consume);
            ActionRow {
                main: [kind, i64::from(tile.as_u8()), from_rel, consume.len() as i64, 1, has_from],
                consume: c,
                consume_mask: m,
            }
        }
        Action::DaiMinKan { tile, consume } => {
            let (from_rel, has_from) = from_seat(obs, me);
            let (c, m) = consume_row(consume);
            ActionRow {
                main: [kind, i64::from(tile.as_u8()), from_rel, consume.len() as i64, 1, has_from],
                consume: c,
                consume_mask: m,
            }
        }
        Action::KaKan { tile, consume } => {
            let (c, m) = consume_row(consume);
            ActionRow {
                main: [kind, i64::from(tile.as_u8()), 0, consume.len() as i64, 1, 0],
                consume: c,
                consume_mask: m,
            }
        }
        Action::Riichi { .. } | Action::Tsumo | Action::Pass | Action::KyushuKyuhai => ActionRow {
            main: [kind, TID_NONE, 0, 0, 0, 0],
            consume: [TID_NONE; MAX_CONSUME_TILES],
            consume_mask: [false; MAX_CONSUME_TILES],
        },
        Action::Ron => {
            let (from_rel, has_from) = from_seat(obs, me);
            ActionRow {
                main: [kind, TID_NONE, from_rel, 0, 0, has_from],
                consume: [TID_NONE; MAX_CONSUME_TILES],
                consume_mask: [false; MAX_CONSUME_TILES],
            }
        }
    }
}

/// One seat's encoded turn: the fixed-layout token/action tensors plus the
/// legal-action list needed to resolve a chosen `action_index` back into a
/// concrete [`Action`] (`step_y47`'s job, not this struct's).
#[pyclass]
#[derive(Clone)]
pub struct Turn {
    pub seat: u8,
    pub token_main: Array2<i64>,
    pub token_scalar: Array2<f32>,
    pub token_mask: Array1<bool>,
    pub action_main: Array2<i64>,
    pub action_consume: Array2<i64>,
    pub action_consume_mask: Array2<bool>,
    pub legal_mask: Array1<bool>,
    /// Row `i` of the action tables corresponds to `legal_actions[i]`.
    pub legal_actions: Vec<Action>,
}

impl Turn {
    /// Resolves a `step_y47` action index back to the [`Action`] it names.
    /// `None` if the index is out of range or past the legal-row count.
    #[must_use]
    pub fn resolve(&self, action_index: usize) -> Option<Action> {
        self.legal_actions.get(action_index).copied()
    }
}

#[pymethods]
impl Turn {
    fn __repr__(&self) -> String {
        format!(
            "Turn(seat={}, tokens={}, actions={})",
            self.seat,
            self.token_mask.iter().filter(|&&m| m).count(),
            self.legal_actions.len(),
        )
    }

    pub fn take_token_main<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray2<i64>> {
        PyArray2::from_owned_array(py, mem::take(&mut self.token_main))
    }

    pub fn take_token_scalar<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray2<f32>> {
        PyArray2::from_owned_array(py, mem::take(&mut self.token_scalar))
    }

    pub fn take_token_mask<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray1<bool>> {
        PyArray1::from_owned_array(py, mem::take(&mut self.token_mask))
    }

    pub fn take_action_main<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray2<i64>> {
        PyArray2::from_owned_array(py, mem::take(&mut self.action_main))
    }

    pub fn take_action_consume<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray2<i64>> {
        PyArray2::from_owned_array(py, mem::take(&mut self.action_consume))
    }

    pub fn take_action_consume_mask<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray2<bool>> {
        PyArray2::from_owned_array(py, mem::take(&mut self.action_consume_mask))
    }

    pub fn take_legal_mask<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray1<bool>> {
        PyArray1::from_owned_array(py, mem::take(&mut self.legal_mask))
    }
}

/// Encodes one seat's [`Observation`] into its fixed-layout [`Turn`].
#[must_use]
pub fn encode(obs: &Observation) -> Turn {
    let token_rows = build_tokens(obs);
    let n_tokens = token_rows.len();
    let mut token_main = Array2::<i64>::zeros((MAX_STATE_TOKENS, TOKEN_MAIN_COLS));
    let mut token_scalar = Array2::<f32>::zeros((MAX_STATE_TOKENS, TOKEN_SCALAR_COLS));
    let mut token_mask = Array1::<bool>::from_elem(MAX_STATE_TOKENS, false);
    for (i, row) in token_rows.into_iter().enumerate() {
        token_main.row_mut(i).assign(&Array1::from(row.main.to_vec()));
        token_scalar.row_mut(i).assign(&Array1::from(row.scalar.to_vec()));
        token_mask[i] = true;
    }
    let _ = n_tokens;

    let mut legal_actions = obs.legal_actions.clone();
    if legal_actions.len() > MAX_ACTIONS {
        log::warn!("truncating {} legal actions to {MAX_ACTIONS}", legal_actions.len());
        legal_actions.truncate(MAX_ACTIONS);
    }

    let mut action_main = Array2::<i64>::zeros((MAX_ACTIONS, ACTION_MAIN_COLS));
    let mut action_consume = Array2::<i64>::from_elem((MAX_ACTIONS, MAX_CONSUME_TILES), TID_NONE);
    let mut action_consume_mask = Array2::<bool>::from_elem((MAX_ACTIONS, MAX_CONSUME_TILES), false);
    let mut legal_mask = Array1::<bool>::from_elem(MAX_ACTIONS, false);
    for (i, action) in legal_actions.iter().enumerate() {
        let row = build_action_row(obs, action);
        action_main.row_mut(i).assign(&Array1::from(row.main.to_vec()));
        action_consume.row_mut(i).assign(&Array1::from(row.consume.to_vec()));
        action_consume_mask.row_mut(i).assign(&Array1::from(row.consume_mask.to_vec()));
        legal_mask[i] = true;
    }

    Turn {
        seat: obs.seat,
        token_main,
        token_scalar,
        token_mask,
        action_main,
        action_consume,
        action_consume_mask,
        legal_mask,
        legal_actions,
    }
}

pub fn register_module(py: Python<'_>, prefix: &str, super_mod: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(py, "obs")?;
    m.add_class::<Turn>()?;
    crate::py_helper::add_submodule(py, prefix, super_mod, &m)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::engine::game::Game;
    use crate::engine::rules::Rules;
    use crate::tile::GameMode;

    use super::*;

    fn first_observation() -> Observation {
        let game = Game::new(GameMode::FourPlayerRedEast, Rules::default(), 1);
        let obs = game.observations();
        obs.into_iter().next().unwrap().1
    }

    #[test]
    fn encodes_cls_round_and_score_tokens_first() {
        let obs = first_observation();
        let turn = encode(&obs);
        assert!(turn.token_mask[0]);
        assert_eq!(turn.token_main[[0, 0]], TokenKind::Cls as i64);
        assert_eq!(turn.token_main[[1, 0]], TokenKind::Round as i64);
        for rel in 0..4usize {
            assert_eq!(turn.token_main[[2 + rel, 0]], TokenKind::Score as i64);
            assert_eq!(turn.token_main[[2 + rel, 1]], rel as i64);
        }
    }

    #[test]
    fn dealer_hand_has_fourteen_hand_tokens_and_one_legal_discard_per_tile() {
        let obs = first_observation();
        let turn = encode(&obs);
        let hand_tokens = (0..MAX_STATE_TOKENS)
            .filter(|&i| turn.token_mask[i] && turn.token_main[[i, 0]] == TokenKind::Hand as i64)
            .count();
        assert_eq!(hand_tokens, 14);
        let discard_actions =
            obs.legal_actions.iter().filter(|a| matches!(a, Action::Discard { .. })).count();
        assert!(discard_actions >= 1);
        let legal_rows = turn.legal_mask.iter().filter(|&&m| m).count();
        assert_eq!(legal_rows, obs.legal_actions.len());
    }

    #[test]
    fn resolve_maps_action_index_back_to_the_legal_action() {
        let obs = first_observation();
        let turn = encode(&obs);
        let expected = obs.legal_actions[0];
        assert_eq!(turn.resolve(0), Some(expected));
        assert_eq!(turn.resolve(MAX_ACTIONS + 1), None);
    }

    #[test]
    fn action_rows_without_an_intrinsic_tile_carry_tid_none() {
        let mut obs = first_observation();
        obs.legal_actions = vec![Action::Pass];
        let turn = encode(&obs);
        assert_eq!(turn.action_main[[0, 0]], ActionKind::Pass as i64);
        assert_eq!(turn.action_main[[0, 1]], TID_NONE);
        assert_eq!(turn.action_main[[0, 4]], 0); // HAS_TILE
    }

    #[test]
    fn seat_numbering_is_observer_relative() {
        assert_eq!(p_rel(0, 0), 0);
        assert_eq!(p_rel(3, 1), 2);
        assert_eq!(p_rel(0, 2), 2);
    }

    #[test]
    fn many_legal_actions_are_truncated_with_the_mask_matching_the_cap() {
        let mut obs = first_observation();
        obs.legal_actions = (0..MAX_ACTIONS + 10)
            .map(|_| Action::Pass)
            .collect();
        let turn = encode(&obs);
        assert_eq!(turn.legal_actions.len(), MAX_ACTIONS);
        assert_eq!(turn.legal_mask.iter().filter(|&&m| m).count(), MAX_ACTIONS);
    }
}
