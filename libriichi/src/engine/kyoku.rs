//! The authoritative turn/claim state machine for a single hand (kyoku):
//! phase transitions, claim arbitration, riichi bond/ippatsu bookkeeping,
//! kan follow-through, and ryuukyoku/hule accounting (spec.md §4.4).
//!
//! This is the missing centerpiece the ancestor crate's `arena` module
//! hinted at (`arena::board`/`arena::game`, neither present in the
//! retrieval pack) but never shipped in a TID-level, caller-driven form —
//! the ancestor only drives [`crate::state::PlayerState`] reactively off an
//! externally-supplied mjai event stream (a replay file or another engine's
//! output). `Kyoku` is that externally-supplied driver, generalized to
//! spec.md's own `reset`/`step` contract: it owns the physical wall and
//! per-seat TID hands/melds/rivers, derives the matching mjai event for
//! every transition, and rebroadcasts it to four `PlayerState` mirrors (one
//! per absolute seat) purely to reuse their already-correct shanten/wait/
//! furiten/fu/yaku bookkeeping as the legality oracle.

use std::collections::BTreeMap;

use tinyvec::ArrayVec;

use crate::algo::agari::AgariCalculator;
use crate::algo::point::Point;
use crate::mjai::Event;
use crate::state::PlayerState;
use crate::tile::{GameMode, Tid, Tile};
use crate::tu8;

use super::action::Action;
use super::error::{EngineError, EngineResult};
use super::meld::{Meld, MeldKind};
use super::rules::Rules;
use super::wall::Wall;

/// Phase of the per-hand turn/claim state machine (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Transient: the engine is about to deal a tsumo tile to `current_player`.
    /// Never observed externally — folded into the same `step` that produced it.
    WaitDraw,
    WaitAct,
    WaitResponse,
    WaitResponseKan,
    EndKyoku,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::WaitDraw => "WaitDraw",
            Self::WaitAct => "WaitAct",
            Self::WaitResponse => "WaitResponse",
            Self::WaitResponseKan => "WaitResponseKan",
            Self::EndKyoku => "EndKyoku",
        };
        f.write_str(s)
    }
}

/// A discard on a seat's river, with the flag bits spec.md §3 requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiverEntry {
    pub tile: Tid,
    pub tsumogiri: bool,
    pub riichi_tile: bool,
}

/// A per-seat snapshot handed back by `reset`/`step`.
#[derive(Debug, Clone)]
pub struct Observation {
    pub seat: u8,
    pub phase: Phase,
    /// Sorted ascending, per spec.md §4.6's encoder convention.
    pub hand: Vec<Tid>,
    pub legal_actions: Vec<Action>,
    pub scores: [i32; 4],
    pub dora_indicators: Vec<Tid>,
    pub round_wind: Tile,
    pub oya: u8,
    pub honba: u32,
    pub riichi_sticks: u32,
    pub current_player: u8,
    pub drawn_tile: Tid,
    pub melds: [Vec<Meld>; 4],
    pub rivers: [Vec<RiverEntry>; 4],
    pub riichi_declared: [bool; 4],
    pub double_riichi_declared: [bool; 4],
    pub kyoku_idx: u8,
    /// `(discarder, tile)`, valid only while `phase == WaitResponse`.
    pub last_discard: Option<(u8, Tid)>,
    /// `(actor, tile, kind)`, valid only while `phase == WaitResponseKan`.
    pub pending_kan: Option<(u8, Tid, MeldKind)>,
}

/// One winning claim's settlement, attributed to a single seat. On a
/// multi-ron, one `HuleResult` is produced per winner.
#[derive(Debug, Clone)]
pub struct HuleResult {
    pub winner: u8,
    /// `None` on tsumo.
    pub target: Option<u8>,
    pub is_tsumo: bool,
    pub han: u8,
    pub fu: u8,
    pub is_yakuman: bool,
    pub point: Point,
}

#[derive(Debug, Clone)]
pub enum KyokuEnd {
    Hule {
        wins: Vec<HuleResult>,
        deltas: [i32; 4],
        dealer_continues: bool,
    },
    Ryuukyoku {
        abortive: bool,
        tenpai: [bool; 4],
        deltas: [i32; 4],
        dealer_continues: bool,
    },
}

/// Either the kyoku wants more seat input, or it has ended.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Continue(BTreeMap<u8, Observation>),
    Ended(KyokuEnd),
}

/// The per-hand engine. Construct via [`Kyoku::new`], drive with
/// [`Kyoku::step`]; `reset`/inter-kyoku bookkeeping (score carry-over,
/// dealer rotation, game-level termination) lives one layer up in
/// [`super::game::Game`].
pub struct Kyoku {
    pub mode: GameMode,
    pub rules: Rules,
    pub round_wind: Tile,
    pub oya: u8,
    pub honba: u32,
    pub riichi_sticks: u32,
    pub kyoku_idx: u8,
    pub scores: [i32; 4],

    wall: Wall,
    draws_taken: usize,
    kan_draws_taken: usize,
    seats: [PlayerState; 4],
    hands: [Vec<Tid>; 4],
    melds: [Vec<Meld>; 4],
    rivers: [Vec<RiverEntry>; 4],
    dora_indicators: Vec<Tid>,
    pending_dora_reveal: bool,

    pub phase: Phase,
    pub current_player: u8,
    pub drawn_tile: Tid,
    pub last_discard: Option<(u8, Tid)>,
    pub pending_kan: Option<(u8, Tid, MeldKind)>,
    active_players: Vec<u8>,
    /// Seats still owed a response in the current WaitResponse/WaitResponseKan.
    awaiting: Vec<u8>,
    responses: BTreeMap<u8, Action>,

    riichi_declared: [bool; 4],
    double_riichi_declared: [bool; 4],
    ippatsu: [bool; 4],
    any_call_made: bool,
    kan_actors: Vec<u8>,
    distinct_riichi_count: u8,

    /// Set while the current discard is the declaring discard of a pending
    /// riichi (stick posted only once it passes uncontested).
    pending_riichi_actor: Option<u8>,
    /// Set once this hand's wall is exhausted: the next confirmed discard,
    /// if unclaimed, ends the kyoku (houtei raifuu is still offered).
    wall_exhausted_after_current_discard: bool,
    houtei: bool,
    haitei_winner: Option<u8>,
    chankan_winner: Option<u8>,

    pub event_log: Option<Vec<Event>>,
}

impl Kyoku {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mode: GameMode,
        rules: Rules,
        round_wind: Tile,
        oya: u8,
        honba: u32,
        riichi_sticks: u32,
        kyoku_idx: u8,
        scores: [i32; 4],
        seed: u64,
        skip_event_log: bool,
    ) -> Self {
        let wall = Wall::from_seed(seed);
        let hands: [Vec<Tid>; 4] = [
            { let mut h = wall.deal(0).to_vec(); h.sort_unstable(); h },
            { let mut h = wall.deal(1).to_vec(); h.sort_unstable(); h },
            { let mut h = wall.deal(2).to_vec(); h.sort_unstable(); h },
            { let mut h = wall.deal(3).to_vec(); h.sort_unstable(); h },
        ];
        let mut seats = [
            PlayerState::new(0),
            PlayerState::new(1),
            PlayerState::new(2),
            PlayerState::new(3),
        ];

        let first_indicator = wall.dora_indicator(0);
        let tehais: [[Tile; 13]; 4] = std::array::from_fn(|seat| {
            let mut arr = [Tile::new(0); 13];
            for (i, &tid) in hands[seat].iter().enumerate() {
                arr[i] = tid.to_tile(mode);
            }
            arr
        });
        let start_event = Event::StartKyoku {
            bakaze: round_wind,
            dora_marker: first_indicator.to_tile(mode),
            kyoku: kyoku_idx + 1,
            honba: honba as u8,
            kyotaku: riichi_sticks as u8,
            oya,
            scores,
            tehais,
        };
        for s in &mut seats {
            let _ = s.update(&start_event);
        }

        let mut event_log = if skip_event_log { None } else { Some(Vec::new()) };
        if let Some(log) = &mut event_log {
            log.push(start_event);
        }

        let mut kyoku = Self {
            mode,
            rules,
            round_wind,
            oya,
            honba,
            riichi_sticks,
            kyoku_idx,
            scores,
            wall,
            draws_taken: 0,
            kan_draws_taken: 0,
            seats,
            hands,
            melds: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            rivers: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            dora_indicators: vec![first_indicator],
            pending_dora_reveal: false,
            phase: Phase::WaitDraw,
            current_player: oya,
            drawn_tile: Tid::NONE,
            last_discard: None,
            pending_kan: None,
            active_players: Vec::new(),
            awaiting: Vec::new(),
            responses: BTreeMap::new(),
            riichi_declared: [false; 4],
            double_riichi_declared: [false; 4],
            ippatsu: [false; 4],
            any_call_made: false,
            kan_actors: Vec::new(),
            distinct_riichi_count: 0,
            pending_riichi_actor: None,
            wall_exhausted_after_current_discard: false,
            houtei: false,
            haitei_winner: None,
            chankan_winner: None,
            event_log,
        };
        kyoku.draw_for_current_player();
        kyoku
    }

    #[must_use]
    pub fn is_first_go_around(&self) -> bool {
        !self.any_call_made && self.rivers.iter().all(Vec::is_empty)
    }

    #[must_use]
    pub fn live_tiles_remaining(&self) -> usize {
        self.wall
            .max_draws()
            .saturating_sub(self.draws_taken)
            .saturating_sub(self.kan_draws_taken)
    }

    // ---- draws -----------------------------------------------------

    fn draw_for_current_player(&mut self) {
        let seat = self.current_player;
        if self.live_tiles_remaining() == 0 {
            self.enter_exhaustive_ryuukyoku_pending();
            return;
        }
        let tid = self.wall.draw(self.draws_taken);
        self.draws_taken += 1;
        self.hands[seat as usize].push(tid);
        self.drawn_tile = tid;
        if self.live_tiles_remaining() == 0 {
            self.haitei_winner = Some(seat);
        }
        let event = Event::Tsumo { actor: seat, pai: tid.to_tile(self.mode) };
        self.broadcast(&event);
        self.phase = Phase::WaitAct;
        self.active_players = vec![seat];
    }

    fn draw_rinshan_for_current_player(&mut self) {
        let seat = self.current_player;
        if self.kan_draws_taken >= 4 {
            // Four kans by distinct seats already aborted earlier; a fifth
            // physical rinshan draw never happens in practice.
            self.enter_exhaustive_ryuukyoku_pending();
            return;
        }
        let tid = self.wall.kan_draw(self.kan_draws_taken);
        self.kan_draws_taken += 1;
        // `Event::Tsumo` below already decrements every mirror's `tiles_left`
        // once per broadcast; a rinshan draw is just another Tsumo event.
        self.hands[seat as usize].push(tid);
        self.drawn_tile = tid;
        let event = Event::Tsumo { actor: seat, pai: tid.to_tile(self.mode) };
        self.broadcast(&event);
        self.phase = Phase::WaitAct;
        self.active_players = vec![seat];
    }

    fn reveal_dora(&mut self) {
        let n = self.dora_indicators.len();
        if n >= 5 {
            return;
        }
        let tid = self.wall.dora_indicator(n);
        self.dora_indicators.push(tid);
        let event = Event::Dora { dora_marker: tid.to_tile(self.mode) };
        self.broadcast(&event);
    }

    fn broadcast(&mut self, event: &Event) {
        for s in &mut self.seats {
            let _ = s.update(event);
        }
        if let Some(log) = &mut self.event_log {
            log.push(event.clone());
        }
    }

    // ---- tid/face helpers --------------------------------------------

    /// Up to two physical tids of `face` in `seat`'s hand: the red copy (if
    /// any) and one plain representative (identical plain copies are
    /// otherwise interchangeable, so only one is offered).
    fn face_variants(&self, seat: u8, face: u8) -> Vec<Tid> {
        let hand = &self.hands[seat as usize];
        let mut red = None;
        let mut plain = None;
        for &tid in hand {
            if tid.face() == face {
                if tid.is_red(self.mode) {
                    red.get_or_insert(tid);
                } else {
                    plain.get_or_insert(tid);
                }
            }
        }
        [red, plain].into_iter().flatten().collect()
    }

    /// Up to two distinct ways to pick `n` physical tids of `face` from
    /// `seat`'s hand, varying only in whether the red copy is included.
    fn face_combos(&self, seat: u8, face: u8, n: usize) -> Vec<Vec<Tid>> {
        let hand = &self.hands[seat as usize];
        let mut red = None;
        let mut plains = Vec::new();
        for &tid in hand {
            if tid.face() == face {
                if tid.is_red(self.mode) {
                    red = Some(tid);
                } else {
                    plains.push(tid);
                }
            }
        }
        plains.sort_unstable();
        let mut out = Vec::new();
        if plains.len() >= n {
            out.push(plains[..n].to_vec());
        }
        if let Some(r) = red {
            if n >= 1 && plains.len() >= n - 1 {
                let mut combo = vec![r];
                combo.extend(plains[..n - 1].iter().copied());
                out.push(combo);
            }
        }
        out
    }

    fn remove_tid(hand: &mut Vec<Tid>, tid: Tid) -> EngineResult<()> {
        if let Some(pos) = hand.iter().position(|&t| t == tid) {
            hand.remove(pos);
            Ok(())
        } else {
            Err(EngineError::CorruptState(format!("tile {tid} not in hand")))
        }
    }

    // ---- legality ------------------------------------------------------

    #[must_use]
    pub fn legal_actions_for(&self, seat: u8) -> Vec<Action> {
        match self.phase {
            Phase::WaitAct if seat == self.current_player => self.legal_wait_act(seat),
            Phase::WaitResponse => self.legal_wait_response(seat),
            Phase::WaitResponseKan => self.legal_wait_response_kan(seat),
            _ => Vec::new(),
        }
    }

    fn legal_wait_act(&self, seat: u8) -> Vec<Action> {
        let ps = &self.seats[seat as usize];
        let mut out = Vec::new();
        let riichi_locked = self.riichi_declared[seat as usize];

        if ps.last_cans.can_discard {
            if riichi_locked {
                if self.drawn_tile != Tid::NONE {
                    out.push(Action::Discard { tile: self.drawn_tile });
                }
            } else {
                for face in 0u8..34 {
                    if ps.tehai[face as usize] > 0 && !ps.forbidden_tiles[face as usize] {
                        for tid in self.face_variants(seat, face) {
                            out.push(Action::Discard { tile: tid });
                        }
                    }
                }
            }
        }

        if ps.last_cans.can_riichi {
            for face in 0u8..34 {
                if ps.tehai[face as usize] > 0
                    && !ps.forbidden_tiles[face as usize]
                    && (ps.keep_shanten_discards[face as usize]
                        || ps.next_shanten_discards[face as usize])
                {
                    for tid in self.face_variants(seat, face) {
                        out.push(Action::Riichi { tile: tid });
                    }
                }
            }
        }

        for &tile in ps.ankan_candidates.iter() {
            if let Some(&tid) = self.face_variants(seat, tile.as_u8()).first() {
                out.push(Action::AnKan { tile: tid });
            }
        }

        for &tile in ps.kakan_candidates.iter() {
            let face = tile.as_u8();
            if let Some(meld) = self.melds[seat as usize]
                .iter()
                .find(|m| m.kind == MeldKind::Pon && m.tiles[0].face() == face)
            {
                if let Some(&tid) = self.face_variants(seat, face).first() {
                    let consume: [Tid; 3] = [meld.tiles[0], meld.tiles[1], meld.tiles[2]];
                    out.push(Action::KaKan { tile: tid, consume });
                }
            }
        }

        if ps.last_cans.can_tsumo_agari {
            out.push(Action::Tsumo);
        }
        if ps.last_cans.can_ryukyoku {
            out.push(Action::KyushuKyuhai);
        }
        out
    }

    fn legal_wait_response(&self, seat: u8) -> Vec<Action> {
        let Some((discarder, tile)) = self.last_discard else {
            return Vec::new();
        };
        let ps = &self.seats[seat as usize];
        let mut out = vec![Action::Pass];

        if ps.last_cans.can_ron_agari {
            out.push(Action::Ron);
        }

        // Riichi suppresses every call offer for the responder (not the
        // discarder) per spec.md §4.3's per-responder suppression rule.
        if self.riichi_declared[seat as usize] {
            return out;
        }

        if ps.last_cans.can_pon {
            let face = tile.face();
            for combo in self.face_combos(seat, face, 2) {
                out.push(Action::Pon { tile, consume: [combo[0], combo[1]] });
            }
        }
        if ps.last_cans.can_daiminkan {
            let face = tile.face();
            for combo in self.face_combos(seat, face, 3) {
                out.push(Action::DaiMinKan { tile, consume: [combo[0], combo[1], combo[2]] });
            }
        }
        let is_chi_seat = (discarder + 1) % 4 == seat;
        if is_chi_seat && (ps.last_cans.can_chi_low || ps.last_cans.can_chi_mid || ps.last_cans.can_chi_high) {
            let face = tile.face();
            let mut pairs: Vec<(u8, u8)> = Vec::new();
            if ps.last_cans.can_chi_low && face % 9 <= 6 {
                pairs.push((face + 1, face + 2));
            }
            if ps.last_cans.can_chi_mid && (1..=7).contains(&(face % 9)) {
                pairs.push((face - 1, face + 1));
            }
            if ps.last_cans.can_chi_high && face % 9 >= 2 {
                pairs.push((face - 2, face - 1));
            }
            for (fa, fb) in pairs {
                for va in self.face_variants(seat, fa) {
                    for vb in self.face_variants(seat, fb) {
                        out.push(Action::Chi { tile, consume: [va, vb] });
                    }
                }
            }
        }
        out
    }

    fn legal_wait_response_kan(&self, seat: u8) -> Vec<Action> {
        let ps = &self.seats[seat as usize];
        let mut out = vec![Action::Pass];
        if ps.last_cans.can_ron_agari {
            out.push(Action::Ron);
        }
        out
    }

    // ---- public step entry ---------------------------------------------

    pub fn step(&mut self, actions: BTreeMap<u8, Action>) -> EngineResult<StepOutcome> {
        let expected = self.active_players.clone();
        let mut got: Vec<u8> = actions.keys().copied().collect();
        got.sort_unstable();
        let mut expected_sorted = expected.clone();
        expected_sorted.sort_unstable();
        if got != expected_sorted {
            return Err(EngineError::MissingOrExtraActor { expected, got });
        }

        match self.phase {
            Phase::WaitAct => self.step_wait_act(actions),
            Phase::WaitResponse => self.step_wait_response(actions),
            Phase::WaitResponseKan => self.step_wait_response_kan(actions),
            Phase::WaitDraw | Phase::EndKyoku => Err(EngineError::CorruptState(
                "step called while no seat action is pending".into(),
            )),
        }
    }

    fn step_wait_act(&mut self, mut actions: BTreeMap<u8, Action>) -> EngineResult<StepOutcome> {
        let actor = self.current_player;
        let action = actions.remove(&actor).expect("validated by caller");
        let legal = self.legal_wait_act(actor);
        if !legal.contains(&action) {
            return Err(EngineError::InvalidAction {
                actor,
                phase: self.phase.to_string(),
                detail: format!("{action:?} not offered"),
            });
        }
        match action {
            Action::Discard { tile } => {
                self.do_discard(actor, tile, tile == self.drawn_tile, false)?;
                self.enter_wait_response(actor, tile);
            }
            Action::Riichi { tile } => {
                self.pending_riichi_actor = Some(actor);
                self.riichi_declared[actor as usize] = true;
                if self.distinct_riichi_count == 0 {
                    // first riichi in the hand: eligible for double riichi
                }
                self.broadcast(&Event::Reach { actor });
                let is_tsumogiri = tile == self.drawn_tile;
                self.do_discard(actor, tile, is_tsumogiri, true)?;
                self.enter_wait_response(actor, tile);
            }
            Action::AnKan { tile } => self.do_ankan(actor, tile)?,
            Action::KaKan { tile, consume } => self.do_kakan(actor, tile, consume)?,
            Action::Tsumo => return self.settle_tsumo(actor),
            Action::KyushuKyuhai => return self.settle_abortive_draw(),
            _ => {
                return Err(EngineError::InvalidAction {
                    actor,
                    phase: self.phase.to_string(),
                    detail: "action kind not valid in WaitAct".into(),
                });
            }
        }
        self.make_continue()
    }

    fn do_discard(&mut self, actor: u8, tile: Tid, tsumogiri: bool, is_riichi: bool) -> EngineResult<()> {
        if self.pending_dora_reveal && self.kan_actors.last() == Some(&actor) {
            self.pending_dora_reveal = false;
            self.reveal_dora();
        }
        Self::remove_tid(&mut self.hands[actor as usize], tile)?;
        self.rivers[actor as usize].push(RiverEntry { tile, tsumogiri, riichi_tile: is_riichi });
        let event = Event::Dahai { actor, pai: tile.to_tile(self.mode), tsumogiri };
        self.broadcast(&event);
        if self.live_tiles_remaining() == 0 {
            self.wall_exhausted_after_current_discard = true;
        }
        Ok(())
    }

    fn enter_wait_response(&mut self, discarder: u8, tile: Tid) {
        self.last_discard = Some((discarder, tile));
        self.phase = Phase::WaitResponse;
        self.awaiting = (0..4u8).filter(|&s| s != discarder).collect();
        self.active_players = self.awaiting.clone();
        self.responses.clear();
    }

    fn do_ankan(&mut self, actor: u8, tile: Tid) -> EngineResult<()> {
        let face = tile.face();
        let mut consumed = Vec::new();
        for &tid in &self.hands[actor as usize].clone() {
            if tid.face() == face {
                consumed.push(tid);
            }
        }
        if consumed.len() != 4 {
            return Err(EngineError::CorruptState(format!(
                "ankan on face {face} without four concealed copies"
            )));
        }
        for &t in &consumed {
            Self::remove_tid(&mut self.hands[actor as usize], t)?;
        }
        let consumed_tiles: [Tile; 4] = std::array::from_fn(|i| consumed[i].to_tile(self.mode));
        self.melds[actor as usize].push(Meld {
            kind: MeldKind::AnKan,
            tiles: consumed.iter().copied().collect::<ArrayVec<[Tid; 4]>>(),
            claimed_from: None,
        });
        self.broadcast(&Event::Ankan { actor, consumed: consumed_tiles });
        self.note_kan(actor);
        self.reveal_dora();
        self.current_player = actor;
        self.draw_rinshan_for_current_player();
        Ok(())
    }

    fn do_kakan(&mut self, actor: u8, tile: Tid, consume: [Tid; 3]) -> EngineResult<()> {
        Self::remove_tid(&mut self.hands[actor as usize], tile)?;
        let face = tile.face();
        let pos = self.melds[actor as usize]
            .iter()
            .position(|m| m.kind == MeldKind::Pon && m.tiles[0].face() == face)
            .ok_or_else(|| EngineError::CorruptState("kakan without matching pon".into()))?;
        let pon = self.melds[actor as usize].remove(pos);
        self.melds[actor as usize].push(Meld {
            kind: MeldKind::KaKan,
            tiles: [pon.tiles[0], pon.tiles[1], pon.tiles[2], tile].into_iter().collect(),
            claimed_from: pon.claimed_from,
        });
        let event = Event::Kakan {
            actor,
            pai: tile.to_tile(self.mode),
            consumed: consume.map(|t| t.to_tile(self.mode)),
        };
        self.broadcast(&event);
        self.note_kan(actor);
        self.pending_dora_reveal = true;
        self.phase = Phase::WaitResponseKan;
        self.pending_kan = Some((actor, tile, MeldKind::KaKan));
        self.awaiting = (0..4u8).filter(|&s| s != actor).collect();
        self.active_players = self.awaiting.clone();
        self.responses.clear();
        Ok(())
    }

    fn note_kan(&mut self, actor: u8) {
        self.kan_actors.push(actor);
        self.ippatsu = [false; 4];
    }

    fn settle_tsumo(&mut self, actor: u8) -> EngineResult<StepOutcome> {
        let additional_hans = self.additional_hans(actor, true, None);
        let doras = self.dora_count(actor);
        let ps = &self.seats[actor as usize];
        let tehai = ps.tehai;
        let calc = AgariCalculator {
            tehai: &tehai,
            is_menzen: ps.is_menzen,
            chis: &ps.chis,
            pons: &ps.pons,
            minkans: &ps.minkans,
            ankans: &ps.ankans,
            bakaze: self.round_wind.as_u8(),
            jikaze: ps.jikaze.as_u8(),
            winning_tile: self.drawn_tile.to_tile(self.mode).deaka().as_u8(),
            is_ron: false,
        };
        let agari = calc
            .agari(additional_hans, doras)
            .ok_or_else(|| EngineError::CorruptState("tsumo declared without agari".into()))?;
        let is_oya = actor == self.oya;
        let point = agari.point(is_oya);
        let (han, fu, is_yakuman) = match agari {
            crate::algo::agari::Agari::Normal { fu, han } => (han, fu, false),
            crate::algo::agari::Agari::Yakuman(n) => (n * 13, 0, true),
        };
        let tsumo_total = point.tsumo_total(self.honba);
        let mut deltas = [0i32; 4];
        for payer in 0..4u8 {
            if payer == actor {
                continue;
            }
            let pay = if is_oya { tsumo_total[2] } else if payer == self.oya { tsumo_total[2] } else { tsumo_total[0] };
            deltas[payer as usize] -= pay;
            deltas[actor as usize] += pay;
        }
        deltas[actor as usize] += self.riichi_sticks as i32 * 1000;
        let result = HuleResult { winner: actor, target: None, is_tsumo: true, han, fu, is_yakuman, point };
        self.broadcast(&Event::Hora {
            actor,
            target: actor,
            pai: self.drawn_tile.to_tile(self.mode),
            deltas: Some(deltas),
            ura_markers: Vec::new(),
        });
        let dealer_continues = is_oya;
        self.apply_scores(&deltas);
        self.riichi_sticks = 0;
        self.phase = Phase::EndKyoku;
        self.active_players.clear();
        Ok(StepOutcome::Ended(KyokuEnd::Hule {
            wins: vec![result],
            deltas,
            dealer_continues,
        }))
    }

    fn settle_abortive_draw(&mut self) -> EngineResult<StepOutcome> {
        self.phase = Phase::EndKyoku;
        self.active_players.clear();
        self.broadcast(&Event::Ryukyoku { deltas: None });
        Ok(StepOutcome::Ended(KyokuEnd::Ryuukyoku {
            abortive: true,
            tenpai: [false; 4],
            deltas: [0; 4],
            dealer_continues: true,
        }))
    }

    fn enter_exhaustive_ryuukyoku_pending(&mut self) {
        self.phase = Phase::EndKyoku;
        self.active_players.clear();
    }

    fn additional_hans(&self, seat: u8, is_tsumo: bool, ron_target: Option<u8>) -> u8 {
        let mut han = 0u8;
        let ps = &self.seats[seat as usize];
        if is_tsumo && ps.is_menzen {
            han += 1;
        }
        if self.double_riichi_declared[seat as usize] {
            han += 2;
        } else if self.riichi_declared[seat as usize] {
            han += 1;
        }
        if self.ippatsu[seat as usize] {
            han += 1;
        }
        if is_tsumo && self.haitei_winner == Some(seat) {
            han += 1;
        }
        if !is_tsumo && self.houtei {
            han += 1;
        }
        if ps.at_rinshan {
            han += 1;
        }
        if self.chankan_winner == Some(seat) && ron_target.is_some() {
            han += 1;
        }
        han
    }

    fn dora_count(&self, seat: u8) -> u8 {
        let ps = &self.seats[seat as usize];
        let mut total = ps.doras_owned[0];
        if self.riichi_declared[seat as usize] {
            total += self.ura_dora_count(seat);
        }
        total
    }

    fn ura_dora_count(&self, seat: u8) -> u8 {
        let ps = &self.seats[seat as usize];
        let mut total = 0u8;
        for i in 0..self.dora_indicators.len() {
            let indicator = self.wall_ura_indicator(i);
            let face = indicator.to_tile(self.mode).dora_next().deaka().as_u8();
            total += Self::face_count(ps, face);
        }
        total
    }

    fn wall_ura_indicator(&self, n: usize) -> Tid {
        self.wall.ura_dora_indicator(n)
    }

    fn face_count(ps: &PlayerState, face: u8) -> u8 {
        let mut n = ps.tehai[face as usize];
        for &c in ps.chis.iter() {
            if face >= c && face < c + 3 {
                n += 1;
            }
        }
        for &p in ps.pons.iter() {
            if p == face {
                n += 3;
            }
        }
        for &k in ps.minkans.iter() {
            if k == face {
                n += 4;
            }
        }
        for &k in ps.ankans.iter() {
            if k == face {
                n += 4;
            }
        }
        n
    }

    fn apply_scores(&mut self, deltas: &[i32; 4]) {
        for i in 0..4 {
            self.scores[i] += deltas[i];
        }
    }

    // ---- WaitResponse / WaitResponseKan ---------------------------------

    fn step_wait_response(&mut self, actions: BTreeMap<u8, Action>) -> EngineResult<StepOutcome> {
        for (&seat, action) in &actions {
            let legal = self.legal_wait_response(seat);
            if !legal.contains(action) {
                return Err(EngineError::InvalidAction {
                    actor: seat,
                    phase: self.phase.to_string(),
                    detail: format!("{action:?} not offered"),
                });
            }
        }

        let rons: Vec<u8> = actions
            .iter()
            .filter(|(_, a)| matches!(a, Action::Ron))
            .map(|(&s, _)| s)
            .collect();
        if !rons.is_empty() {
            return self.settle_ron(rons);
        }

        let (discarder, _) = self.last_discard.expect("set by enter_wait_response");
        if let Some((&seat, action)) = actions.iter().find(|(_, a)| matches!(a, Action::DaiMinKan { .. })) {
            if let Action::DaiMinKan { tile, consume } = *action {
                return self.accept_daiminkan(seat, discarder, tile, consume);
            }
        }
        if let Some((&seat, action)) = actions.iter().find(|(_, a)| matches!(a, Action::Pon { .. })) {
            if let Action::Pon { tile, consume } = *action {
                return self.accept_pon(seat, discarder, tile, consume);
            }
        }
        if let Some((&seat, action)) = actions.iter().find(|(_, a)| matches!(a, Action::Chi { .. })) {
            if let Action::Chi { tile, consume } = *action {
                return self.accept_chi(seat, discarder, tile, consume);
            }
        }

        // Every responder passed.
        self.ippatsu = [false; 4];
        if let Some(actor) = self.pending_riichi_actor.take() {
            self.confirm_riichi(actor);
        }
        if self.wall_exhausted_after_current_discard {
            return self.settle_exhaustive_ryuukyoku();
        }
        self.current_player = (discarder + 1) % 4;
        self.draw_for_current_player();
        self.make_continue()
    }

    fn confirm_riichi(&mut self, actor: u8) {
        self.scores[actor as usize] -= 1000;
        self.riichi_sticks += 1;
        // Double riichi is a per-seat condition (own first discard, no call
        // yet happened anywhere), not "first riichi of the hand" -- distinct
        // seats can each double riichi independently in the same go-around.
        if self.is_first_go_around_for_riichi(actor) {
            self.double_riichi_declared[actor as usize] = true;
        }
        self.distinct_riichi_count += 1;
        self.ippatsu[actor as usize] = true;
        self.broadcast(&Event::ReachAccepted { actor });
    }

    fn is_first_go_around_for_riichi(&self, actor: u8) -> bool {
        !self.any_call_made && self.rivers[actor as usize].len() == 1
    }

    fn accept_pon(&mut self, seat: u8, discarder: u8, tile: Tid, consume: [Tid; 2]) -> EngineResult<StepOutcome> {
        self.take_last_discard_tile()?;
        Self::remove_tid(&mut self.hands[seat as usize], consume[0])?;
        Self::remove_tid(&mut self.hands[seat as usize], consume[1])?;
        self.melds[seat as usize].push(Meld {
            kind: MeldKind::Pon,
            tiles: [consume[0], consume[1], tile].into_iter().collect(),
            claimed_from: Some(discarder),
        });
        self.broadcast(&Event::Pon {
            actor: seat,
            target: discarder,
            pai: tile.to_tile(self.mode),
            consumed: [consume[0].to_tile(self.mode), consume[1].to_tile(self.mode)],
        });
        self.after_call(seat)
    }

    fn accept_chi(&mut self, seat: u8, discarder: u8, tile: Tid, consume: [Tid; 2]) -> EngineResult<StepOutcome> {
        self.take_last_discard_tile()?;
        Self::remove_tid(&mut self.hands[seat as usize], consume[0])?;
        Self::remove_tid(&mut self.hands[seat as usize], consume[1])?;
        self.melds[seat as usize].push(Meld {
            kind: MeldKind::Chi,
            tiles: [consume[0], consume[1], tile].into_iter().collect(),
            claimed_from: Some(discarder),
        });
        self.broadcast(&Event::Chi {
            actor: seat,
            target: discarder,
            pai: tile.to_tile(self.mode),
            consumed: [consume[0].to_tile(self.mode), consume[1].to_tile(self.mode)],
        });
        self.after_call(seat)
    }

    fn accept_daiminkan(&mut self, seat: u8, discarder: u8, tile: Tid, consume: [Tid; 3]) -> EngineResult<StepOutcome> {
        self.take_last_discard_tile()?;
        for &t in &consume {
            Self::remove_tid(&mut self.hands[seat as usize], t)?;
        }
        self.melds[seat as usize].push(Meld {
            kind: MeldKind::DaiMinKan,
            tiles: [consume[0], consume[1], consume[2], tile].into_iter().collect(),
            claimed_from: Some(discarder),
        });
        self.broadcast(&Event::Daiminkan {
            actor: seat,
            target: discarder,
            pai: tile.to_tile(self.mode),
            consumed: consume.map(|t| t.to_tile(self.mode)),
        });
        self.note_kan(seat);
        self.pending_dora_reveal = true;
        self.current_player = seat;
        self.draw_rinshan_for_current_player();
        self.make_continue()
    }

    fn take_last_discard_tile(&mut self) -> EngineResult<()> {
        let (discarder, _) = self.last_discard.take().expect("set by enter_wait_response");
        self.ippatsu = [false; 4];
        // A riichi-declaring discard claimed by pon/chi/daiminkan is not
        // voided — only ron voids it. The stick still gets posted. Confirm
        // before flagging this call, so the claim itself doesn't disqualify
        // the declarer's own double-riichi eligibility.
        if let Some(actor) = self.pending_riichi_actor.take() {
            self.confirm_riichi(actor);
        }
        self.any_call_made = true;
        let _ = discarder;
        Ok(())
    }

    fn after_call(&mut self, seat: u8) -> EngineResult<StepOutcome> {
        // Pon/chi never defer a dora reveal; only kakan/daiminkan do, and
        // those resolve through `do_discard`'s check instead.
        self.current_player = seat;
        self.phase = Phase::WaitAct;
        self.active_players = vec![seat];
        self.make_continue()
    }

    fn step_wait_response_kan(&mut self, actions: BTreeMap<u8, Action>) -> EngineResult<StepOutcome> {
        for (&seat, action) in &actions {
            let legal = self.legal_wait_response_kan(seat);
            if !legal.contains(action) {
                return Err(EngineError::InvalidAction {
                    actor: seat,
                    phase: self.phase.to_string(),
                    detail: format!("{action:?} not offered"),
                });
            }
        }
        let rons: Vec<u8> = actions
            .iter()
            .filter(|(_, a)| matches!(a, Action::Ron))
            .map(|(&s, _)| s)
            .collect();
        let (kan_actor, kan_tile, _kind) = self.pending_kan.expect("set by do_kakan");
        if !rons.is_empty() {
            self.chankan_winner = rons.first().copied();
            let outcome = self.settle_ron_against_tile(rons, kan_tile, kan_actor)?;
            return Ok(outcome);
        }
        self.pending_kan = None;
        self.current_player = kan_actor;
        self.draw_rinshan_for_current_player();
        self.make_continue()
    }

    fn settle_ron(&mut self, claimants: Vec<u8>) -> EngineResult<StepOutcome> {
        let (discarder, tile) = self.last_discard.expect("set by enter_wait_response");
        self.settle_ron_against_tile(claimants, tile, discarder)
    }

    /// Shared ron settlement for both a discard (`against = discarder`) and
    /// a chankan (`against = kan-declaring seat`).
    fn settle_ron_against_tile(&mut self, mut claimants: Vec<u8>, tile: Tid, against: u8) -> EngineResult<StepOutcome> {
        // Seat order counterclockwise from the discarder: nearest first.
        claimants.sort_by_key(|&s| (s + 4 - against) % 4);
        if self.rules.atama_hane {
            claimants.truncate(1);
        }

        let mut wins = Vec::new();
        let mut deltas = [0i32; 4];
        for (i, &winner) in claimants.iter().enumerate() {
            let additional_hans = self.additional_hans(winner, false, Some(against));
            let doras = self.dora_count(winner);
            let ps = &self.seats[winner as usize];
            let mut tehai = ps.tehai;
            let winning_tile = tile.to_tile(self.mode).deaka().as_u8();
            tehai[winning_tile as usize] += 1;
            let calc = AgariCalculator {
                tehai: &tehai,
                is_menzen: ps.is_menzen,
                chis: &ps.chis,
                pons: &ps.pons,
                minkans: &ps.minkans,
                ankans: &ps.ankans,
                bakaze: self.round_wind.as_u8(),
                jikaze: ps.jikaze.as_u8(),
                winning_tile,
                is_ron: true,
            };
            let agari = calc
                .agari(additional_hans, doras)
                .ok_or_else(|| EngineError::CorruptState("ron declared without agari".into()))?;
            let is_oya = winner == self.oya;
            let point = agari.point(is_oya);
            let (han, fu, is_yakuman) = match agari {
                crate::algo::agari::Agari::Normal { fu, han } => (han, fu, false),
                crate::algo::agari::Agari::Yakuman(n) => (n * 13, 0, true),
            };
            let total = point.ron_total(self.honba, is_oya);
            deltas[against as usize] -= total;
            deltas[winner as usize] += total;
            if i == 0 {
                deltas[winner as usize] += self.riichi_sticks as i32 * 1000;
            }
            wins.push(HuleResult { winner, target: Some(against), is_tsumo: false, han, fu, is_yakuman, point });
            self.broadcast(&Event::Hora {
                actor: winner,
                target: against,
                pai: tile.to_tile(self.mode),
                deltas: Some(deltas),
                ura_markers: Vec::new(),
            });
        }
        self.riichi_sticks = 0;
        self.apply_scores(&deltas);
        self.phase = Phase::EndKyoku;
        self.active_players.clear();
        Ok(StepOutcome::Ended(KyokuEnd::Hule {
            wins,
            deltas,
            dealer_continues: claimants.contains(&self.oya),
        }))
    }

    fn settle_exhaustive_ryuukyoku(&mut self) -> EngineResult<StepOutcome> {
        let mut tenpai = [false; 4];
        for seat in 0..4u8 {
            tenpai[seat as usize] = self.seats[seat as usize].real_time_shanten() <= 0;
        }
        let tenpai_count = tenpai.iter().filter(|&&t| t).count();
        let mut deltas = [0i32; 4];
        if tenpai_count > 0 && tenpai_count < 4 {
            let (pay, receive) = match tenpai_count {
                1 => (1000, 3000),
                2 => (1500, 1500),
                3 => (3000, 1000),
                _ => unreachable!(),
            };
            for seat in 0..4u8 {
                if tenpai[seat as usize] {
                    deltas[seat as usize] += receive;
                } else {
                    deltas[seat as usize] -= pay;
                }
            }
        }
        self.apply_scores(&deltas);
        let dealer_continues = tenpai[self.oya as usize];
        self.broadcast(&Event::Ryukyoku { deltas: Some(deltas) });
        self.phase = Phase::EndKyoku;
        self.active_players.clear();
        Ok(StepOutcome::Ended(KyokuEnd::Ryuukyoku {
            abortive: false,
            tenpai,
            deltas,
            dealer_continues,
        }))
    }

    // ---- observation -----------------------------------------------------

    #[must_use]
    pub fn observations(&self) -> BTreeMap<u8, Observation> {
        self.active_players
            .iter()
            .map(|&seat| (seat, self.observe(seat)))
            .collect()
    }

    fn observe(&self, seat: u8) -> Observation {
        let mut hand = self.hands[seat as usize].clone();
        hand.sort_unstable();
        Observation {
            seat,
            phase: self.phase,
            hand,
            legal_actions: self.legal_actions_for(seat),
            scores: self.scores,
            dora_indicators: self.dora_indicators.clone(),
            round_wind: self.round_wind,
            oya: self.oya,
            honba: self.honba,
            riichi_sticks: self.riichi_sticks,
            current_player: self.current_player,
            drawn_tile: if seat == self.current_player { self.drawn_tile } else { Tid::NONE },
            melds: self.melds.clone(),
            rivers: self.rivers.clone(),
            riichi_declared: self.riichi_declared,
            double_riichi_declared: self.double_riichi_declared,
            kyoku_idx: self.kyoku_idx,
            last_discard: self.last_discard,
            pending_kan: self.pending_kan,
        }
    }

    fn make_continue(&mut self) -> EngineResult<StepOutcome> {
        if matches!(self.phase, Phase::EndKyoku) {
            return Err(EngineError::CorruptState(
                "make_continue called after kyoku end".into(),
            ));
        }
        if self.active_players.is_empty() {
            // Wall just exhausted between a discard-pass-cycle and the
            // next draw attempt.
            return self.settle_exhaustive_ryuukyoku();
        }
        Ok(StepOutcome::Continue(self.observations()))
    }

    #[must_use]
    pub fn hand_tiles(&self, seat: u8) -> &[Tid] {
        &self.hands[seat as usize]
    }

    #[must_use]
    pub fn melds_of(&self, seat: u8) -> &[Meld] {
        &self.melds[seat as usize]
    }

    #[must_use]
    pub fn river_of(&self, seat: u8) -> &[RiverEntry] {
        &self.rivers[seat as usize]
    }

    #[must_use]
    pub fn dora_indicators(&self) -> &[Tid] {
        &self.dora_indicators
    }

    /// Tile conservation check: wall + dead wall + all hands + all melds +
    /// all rivers must union to the full 136-tile universe exactly once
    /// each (spec.md §8).
    #[must_use]
    pub fn check_tile_conservation(&self) -> bool {
        let mut seen = [0u8; 136];

        // Undrawn live wall: indices 52+draws_taken..122. Indices 0..52
        // were the initial deal and already live in `self.hands`.
        for &tid in &self.wall.tiles[52 + self.draws_taken..122] {
            seen[tid.as_u8() as usize] += 1;
        }

        // Dead wall slots not yet revealed as an indicator or drawn as a
        // rinshan tile are still sitting in the wall, untouched.
        for i in 122..136 {
            let tid = self.wall.tiles[i];
            let revealed = self.dora_indicators.contains(&tid);
            let used_as_ura = (0..self.dora_indicators.len()).any(|n| self.wall.ura_dora_indicator(n) == tid);
            let used_as_rinshan = (0..self.kan_draws_taken).any(|n| self.wall.kan_draw(n) == tid);
            if revealed || used_as_ura || used_as_rinshan {
                continue;
            }
            seen[tid.as_u8() as usize] += 1;
        }

        // Revealed dora indicators sit face-up in the dead wall, outside
        // every hand/meld/river.
        for &tid in &self.dora_indicators {
            seen[tid.as_u8() as usize] += 1;
        }

        // Ura-dora indicators stay hidden in the dead wall until a riichi
        // win reveals them, but they are physically there the whole hand.
        for n in 0..self.dora_indicators.len() {
            let tid = self.wall.ura_dora_indicator(n);
            seen[tid.as_u8() as usize] += 1;
        }

        // Rinshan draws already moved into the drawing seat's hand (and
        // from there possibly into a meld or a river); counted below.
        for seat in 0..4 {
            for &tid in &self.hands[seat] {
                seen[tid.as_u8() as usize] += 1;
            }
            for meld in &self.melds[seat] {
                for &tid in meld.tiles.iter() {
                    seen[tid.as_u8() as usize] += 1;
                }
            }
            for entry in &self.rivers[seat] {
                seen[entry.tile.as_u8() as usize] += 1;
            }
        }

        seen.iter().all(|&c| c == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::action::Action;

    fn new_kyoku(seed: u64) -> Kyoku {
        Kyoku::new(
            GameMode::FourPlayerRedHalf,
            Rules::default(),
            Tile::new(tu8!(E)),
            0,
            0,
            0,
            0,
            [25000; 4],
            seed,
            true,
        )
    }

    #[test]
    fn deals_thirteen_plus_one_to_dealer() {
        let kyoku = new_kyoku(1);
        assert_eq!(kyoku.hand_tiles(0).len(), 14);
        for seat in 1..4 {
            assert_eq!(kyoku.hand_tiles(seat).len(), 13);
        }
        assert!(matches!(kyoku.phase, Phase::WaitAct));
        assert_eq!(kyoku.active_players, vec![0]);
    }

    #[test]
    fn riichi_suppresses_chi_and_pon_offers() {
        let mut kyoku = new_kyoku(2);
        kyoku.riichi_declared[1] = true;
        let legal = kyoku.legal_wait_act(0);
        assert!(!legal.is_empty());
        // force seat 1 into WaitResponse to check suppression directly
        kyoku.last_discard = Some((0, Tid::new(0)));
        kyoku.phase = Phase::WaitResponse;
        let legal1 = kyoku.legal_wait_response(1);
        assert!(legal1.iter().all(|a| matches!(a, Action::Pass | Action::Ron)));
    }

    /// Builds a `PlayerState` mirror seeded with a literal 13-tile hand,
    /// already having observed `discarder`'s `discard_tid` the way
    /// `Kyoku::broadcast` would have delivered it.
    fn seat_after_discard(
        mode: GameMode,
        seat: u8,
        hand_tids: &[u8; 13],
        discarder: u8,
        discard_tid: u8,
    ) -> PlayerState {
        let mut ps = PlayerState::new(seat);
        let hand: [Tile; 13] = std::array::from_fn(|i| Tid::new(hand_tids[i]).to_tile(mode));
        let filler = [Tile::new(0); 13];
        let tehais: [[Tile; 13]; 4] = std::array::from_fn(|s| if s as u8 == seat { hand } else { filler });
        ps.update(&Event::StartKyoku {
            bakaze: Tile::new(tu8!(E)),
            dora_marker: Tile::new(tu8!(E)),
            kyoku: 1,
            honba: 0,
            kyotaku: 0,
            oya: 0,
            scores: [25000; 4],
            tehais,
        })
        .unwrap();
        ps.update(&Event::Dahai {
            actor: discarder,
            pai: Tid::new(discard_tid).to_tile(mode),
            tsumogiri: false,
        })
        .unwrap();
        ps
    }

    /// spec.md §8 scenario 1: a seat in riichi offered only PASS against a
    /// discard it could otherwise chi.
    #[test]
    fn scenario_no_chi_during_riichi() {
        let mode = GameMode::FourPlayerRedHalf;
        let hand_tids = [76, 80, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44];
        let mut kyoku = new_kyoku(10);
        kyoku.hands[2] = hand_tids.iter().map(|&t| Tid::new(t)).collect();
        kyoku.seats[2] = seat_after_discard(mode, 2, &hand_tids, 1, 72);
        kyoku.riichi_declared[2] = true;
        kyoku.last_discard = Some((1, Tid::new(72)));
        kyoku.phase = Phase::WaitResponse;

        assert_eq!(kyoku.legal_wait_response(2), vec![Action::Pass]);
    }

    /// spec.md §8 scenario 2: same idea with a pair (PON-shaped) wait.
    #[test]
    fn scenario_no_pon_during_riichi() {
        let mode = GameMode::FourPlayerRedHalf;
        let hand_tids = [76, 77, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44];
        let mut kyoku = new_kyoku(11);
        kyoku.hands[2] = hand_tids.iter().map(|&t| Tid::new(t)).collect();
        kyoku.seats[2] = seat_after_discard(mode, 2, &hand_tids, 1, 78);
        kyoku.riichi_declared[2] = true;
        kyoku.last_discard = Some((1, Tid::new(78)));
        kyoku.phase = Phase::WaitResponse;

        assert_eq!(kyoku.legal_wait_response(2), vec![Action::Pass]);
    }

    /// spec.md §8 scenario 3: the same hand as scenario 1, without riichi,
    /// must offer at least one CHI (consuming the held 2s/3s to complete
    /// the discarded 1s into a run).
    #[test]
    fn scenario_chi_available_without_riichi() {
        let mode = GameMode::FourPlayerRedHalf;
        let hand_tids = [76, 80, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44];
        let mut kyoku = new_kyoku(12);
        kyoku.hands[2] = hand_tids.iter().map(|&t| Tid::new(t)).collect();
        kyoku.seats[2] = seat_after_discard(mode, 2, &hand_tids, 1, 72);
        kyoku.last_discard = Some((1, Tid::new(72)));
        kyoku.phase = Phase::WaitResponse;

        let legal = kyoku.legal_wait_response(2);
        assert!(legal.iter().any(|a| matches!(a, Action::Chi { .. })));
    }

    #[test]
    fn tile_conservation_holds_after_deal() {
        let kyoku = new_kyoku(3);
        assert!(kyoku.check_tile_conservation());
    }

    #[test]
    fn discard_then_all_pass_advances_turn() {
        let mut kyoku = new_kyoku(4);
        let legal = kyoku.legal_wait_act(0);
        let Action::Discard { tile } = *legal
            .iter()
            .find(|a| matches!(a, Action::Discard { .. }))
            .unwrap()
        else {
            unreachable!()
        };
        let mut actions = BTreeMap::new();
        actions.insert(0u8, Action::Discard { tile });
        let outcome = kyoku.step(actions).unwrap();
        let StepOutcome::Continue(obs) = outcome else { panic!("expected continue") };
        assert_eq!(obs.len(), 3);
        let mut pass_actions = BTreeMap::new();
        for seat in [1u8, 2, 3] {
            pass_actions.insert(seat, Action::Pass);
        }
        let outcome2 = kyoku.step(pass_actions).unwrap();
        let StepOutcome::Continue(obs2) = outcome2 else { panic!("expected continue") };
        assert_eq!(obs2.len(), 1);
        assert!(obs2.contains_key(&1));
    }
}
