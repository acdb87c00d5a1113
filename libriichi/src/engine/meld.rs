//! The physical (TID-level) meld record the engine exposes externally.
//! [`crate::state::PlayerState`] keeps its own deaka'd-face bookkeeping for
//! legality/observation purposes; this is the authoritative copy.

use crate::tile::Tid;
use tinyvec::ArrayVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MeldKind {
    Chi,
    Pon,
    DaiMinKan,
    AnKan,
    KaKan,
}

impl MeldKind {
    #[must_use]
    pub const fn is_kan(self) -> bool {
        matches!(self, Self::DaiMinKan | Self::AnKan | Self::KaKan)
    }

    #[must_use]
    pub const fn is_concealed(self) -> bool {
        matches!(self, Self::AnKan)
    }
}

/// Append-only once created; a `KaKan` is represented as its own record
/// (rather than mutating the earlier `Pon`) carrying the upgraded tile last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meld {
    pub kind: MeldKind,
    pub tiles: ArrayVec<[Tid; 4]>,
    pub claimed_from: Option<u8>,
}

impl Meld {
    #[must_use]
    pub const fn opened(&self) -> bool {
        !self.kind.is_concealed()
    }
}
