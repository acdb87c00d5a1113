//! The legality result `PlayerState::update` hands back after every event:
//! which of the fixed action kinds are currently open to the observing seat.

use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// A snapshot of which actions the observing seat may currently take.
/// Exactly one instance is live at a time (`PlayerState::last_cans`),
/// replaced wholesale on every non-announce event.
#[pyclass]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionCandidate {
    /// The seat this candidate set is about (not necessarily the observer).
    pub target_actor: u8,
    pub can_discard: bool,
    pub can_riichi: bool,
    pub can_chi_low: bool,
    pub can_chi_mid: bool,
    pub can_chi_high: bool,
    pub can_pon: bool,
    pub can_daiminkan: bool,
    pub can_kakan: bool,
    pub can_ankan: bool,
    pub can_tsumo_agari: bool,
    pub can_ron_agari: bool,
    pub can_ryukyoku: bool,
}

#[pymethods]
impl ActionCandidate {
    /// `true` iff any action other than passing is currently legal.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.can_discard
            || self.can_riichi
            || self.can_chi_low
            || self.can_chi_mid
            || self.can_chi_high
            || self.can_pon
            || self.can_daiminkan
            || self.can_kakan
            || self.can_ankan
            || self.can_tsumo_agari
            || self.can_ron_agari
            || self.can_ryukyoku
    }

    fn __repr__(&self) -> String {
        format!("{self:?}")
    }
}
