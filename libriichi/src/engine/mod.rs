//! The authoritative turn/claim state machine: the physical, TID-level
//! counterpart to [`crate::state::PlayerState`]'s reactive legality
//! bookkeeping. [`kyoku::Kyoku`] drives a single hand; [`game::Game`] wraps
//! it across a full match (dealer rotation, honba, riichi-stick carry-over,
//! game-end ranking).

pub mod action;
pub mod error;
pub mod game;
pub mod kyoku;
pub mod meld;
pub mod rules;
pub mod wall;

pub use action::Action;
pub use error::{ActionError, EngineError, EngineResult, ReactionError};
pub use game::{Game, GameStepOutcome, KyokuOutcome};
pub use kyoku::{HuleResult, Kyoku, KyokuEnd, Observation, Phase, RiverEntry, StepOutcome};
pub use meld::{Meld, MeldKind};
pub use rules::Rules;
pub use wall::Wall;

use crate::py_helper::add_submodule;
use pyo3::prelude::*;

pub fn register_module(py: Python<'_>, prefix: &str, super_mod: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(py, "engine")?;
    m.add_class::<Game>()?;
    add_submodule(py, prefix, super_mod, &m)
}
