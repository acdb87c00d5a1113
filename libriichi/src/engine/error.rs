//! The typed error taxonomy the physical engine surfaces. There is no
//! recovery layer inside the engine: any of these abort the current `step`
//! and, for [`EngineError::CorruptState`], poison the table for good.
//!
//! Split grounded on the `ActionError`/`ReactionError` split in the
//! `tsubakisakura-riichi-rs`/`JBreidfjord-riichi-rs` lineage's
//! `engine::errors` modules: an acting seat's own submission
//! (discard/kan/riichi/tsumo/kyushu) fails differently from a responding
//! seat's claim (chi/pon/kan/ron/pass), so each gets its own leaf enum; both
//! are folded into the single [`EngineError`] that `step`/`reset` return.

use thiserror::Error;

/// The acting seat's own submission was illegal (phase = WaitAct).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("actor {actor} tried to discard a tile not in hand")]
    TileNotInHand { actor: u8 },
    #[error("actor {actor} may not discard under an active riichi: {detail}")]
    RiichiLocked { actor: u8, detail: String },
    #[error("actor {actor} does not have four concealed copies to ankan")]
    NoAnkanCandidate { actor: u8 },
    #[error("actor {actor} ankan would change their wait")]
    AnkanChangesWait { actor: u8 },
    #[error("actor {actor} has no matching pon to kakan")]
    NoKakanCandidate { actor: u8 },
    #[error("actor {actor} is not eligible for riichi: {detail}")]
    RiichiNotEligible { actor: u8, detail: String },
    #[error("actor {actor} hand is not agari or has no yaku")]
    NoYakuOnTsumo { actor: u8 },
    #[error("actor {actor} is not eligible for kyushu kyuhai: {detail}")]
    KyushuNotEligible { actor: u8, detail: String },
}

/// A responding seat's claim was illegal (phase = WaitResponse/WaitResponseKan).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReactionError {
    #[error("actor {actor} cannot pon: does not hold two copies")]
    NoPonCandidate { actor: u8 },
    #[error("actor {actor} cannot daiminkan: does not hold three copies")]
    NoDaiminkanCandidate { actor: u8 },
    #[error("actor {actor} cannot chi: is not the next seat, or lacks the consumed pair")]
    NoChiCandidate { actor: u8 },
    #[error("actor {actor} cannot ron: hand is not agari, has no yaku, or is furiten")]
    NoRonCandidate { actor: u8 },
    #[error("actor {actor} is in riichi and may only ron or pass")]
    RiichiSuppressed { actor: u8 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An action not in the legal set offered to its seat.
    #[error("invalid action for actor {actor} in phase {phase}: {detail}")]
    InvalidAction {
        actor: u8,
        phase: String,
        detail: String,
    },

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Reaction(#[from] ReactionError),

    /// The caller's action does not name the seat(s) the engine expects.
    #[error("expected an action from actor(s) {expected:?}, got {got:?}")]
    MissingOrExtraActor { expected: Vec<u8>, got: Vec<u8> },

    /// An internal invariant broke (tile total, phase/discard mismatch, ...).
    /// Fatal: the table is poisoned and further `step` calls fail.
    #[error("corrupt state: {0}")]
    CorruptState(String),

    /// A tile id fell outside 0..=135.
    #[error("tile id {0} is out of range (expected 0..=135)")]
    OutOfRangeTile(u8),

    /// Replay-only: a logged event contradicts what the legality engine
    /// offered at that point.
    #[error("replay diverged at actor {actor}: expected one of {expected:?}, got {got}")]
    ReplayDivergence {
        actor: u8,
        expected: Vec<String>,
        got: String,
    },

    /// The table already poisoned by an earlier [`EngineError::CorruptState`].
    #[error("table is poisoned by a prior corrupt-state error")]
    Poisoned,
}

pub type EngineResult<T> = Result<T, EngineError>;

#[must_use]
pub fn out_of_range(tid: u8) -> EngineError {
    EngineError::OutOfRangeTile(tid)
}

#[must_use]
pub fn invalid_action(actor: u8, phase: impl Into<String>, detail: impl Into<String>) -> EngineError {
    EngineError::InvalidAction {
        actor,
        phase: phase.into(),
        detail: detail.into(),
    }
}
