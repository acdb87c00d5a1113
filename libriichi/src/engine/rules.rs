//! Table rule toggles beyond [`crate::tile::GameMode`] (which only selects
//! the red-five table and round length). Constructed once per [`super::game::Game`]
//! and immutable thereafter.

/// Standard Tenhou-style defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rules {
    /// Head-bump: only the nearest claimant counterclockwise from the
    /// discarder is honored on a multi-ron. When `false`, every
    /// ron-declaring seat is paid independently (double/triple ron), with
    /// the riichi-stick pot going only to the first (nearest) winner.
    pub atama_hane: bool,
    /// Open tanyao allowed (tanyao does not require a concealed hand).
    pub kuitan: bool,
    pub starting_score: i32,
    /// Points added to 1st place / subtracted from last at game end
    /// (uma), winner-takes-oka already folded into `uma[0]`.
    pub uma: [i32; 4],
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            atama_hane: true,
            kuitan: true,
            starting_score: 25000,
            uma: [15, 5, -5, -15],
        }
    }
}
