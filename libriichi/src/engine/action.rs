//! The external action polymorphism a caller submits to [`super::kyoku::Kyoku::step`].
//! Tagged variant so a replay driver can deserialize a recorded decision
//! straight off disk.

use crate::tile::Tid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Discard { tile: Tid },
    Chi { tile: Tid, consume: [Tid; 2] },
    Pon { tile: Tid, consume: [Tid; 2] },
    DaiMinKan { tile: Tid, consume: [Tid; 3] },
    AnKan { tile: Tid },
    KaKan { tile: Tid, consume: [Tid; 3] },
    Riichi { tile: Tid },
    Ron,
    Tsumo,
    Pass,
    KyushuKyuhai,
}

impl Action {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Discard { .. } => "discard",
            Self::Chi { .. } => "chi",
            Self::Pon { .. } => "pon",
            Self::DaiMinKan { .. } => "daiminkan",
            Self::AnKan { .. } => "ankan",
            Self::KaKan { .. } => "kakan",
            Self::Riichi { .. } => "riichi",
            Self::Ron => "ron",
            Self::Tsumo => "tsumo",
            Self::Pass => "pass",
            Self::KyushuKyuhai => "kyushu_kyuhai",
        }
    }
}
