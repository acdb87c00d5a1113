//! The mjai-style event protocol: the wire format this engine both consumes
//! (when replaying a recorded game) and produces (the event log, when
//! enabled). Tile notation in JSON matches [`crate::tile::Tile`]'s
//! `Display`/`FromStr` (`"5mr"` for a red five, `"E"` for an honor).

use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// One entry of the event stream. Tagged by `type` in JSON, matching the
/// mjai convention (`snake_case`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StartGame {
        #[serde(default)]
        names: Vec<String>,
    },
    StartKyoku {
        bakaze: Tile,
        dora_marker: Tile,
        /// 1-indexed, unlike `PlayerState::kyoku`.
        kyoku: u8,
        honba: u8,
        kyotaku: u8,
        oya: u8,
        scores: [i32; 4],
        tehais: [[Tile; 13]; 4],
    },
    Tsumo {
        actor: u8,
        pai: Tile,
    },
    Dahai {
        actor: u8,
        pai: Tile,
        tsumogiri: bool,
    },
    Chi {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 2],
    },
    Pon {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 2],
    },
    Daiminkan {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 3],
    },
    Kakan {
        actor: u8,
        pai: Tile,
        consumed: [Tile; 3],
    },
    Ankan {
        actor: u8,
        consumed: [Tile; 4],
    },
    Dora {
        dora_marker: Tile,
    },
    Reach {
        actor: u8,
    },
    ReachAccepted {
        actor: u8,
    },
    Hora {
        actor: u8,
        target: u8,
        pai: Tile,
        #[serde(default)]
        deltas: Option<[i32; 4]>,
        #[serde(default)]
        ura_markers: Vec<Tile>,
    },
    Ryukyoku {
        #[serde(default)]
        deltas: Option<[i32; 4]>,
    },
    EndKyoku,
    EndGame,
}

impl Event {
    /// The seat this event is about, for events that have one.
    #[must_use]
    pub const fn actor(&self) -> Option<u8> {
        match *self {
            Self::Tsumo { actor, .. }
            | Self::Dahai { actor, .. }
            | Self::Chi { actor, .. }
            | Self::Pon { actor, .. }
            | Self::Daiminkan { actor, .. }
            | Self::Kakan { actor, .. }
            | Self::Ankan { actor, .. }
            | Self::Reach { actor }
            | Self::ReachAccepted { actor }
            | Self::Hora { actor, .. } => Some(actor),
            _ => None,
        }
    }

    /// Announcement-only events: they report a state change that was already
    /// implied by the event that triggered it (a kan's dora reveal, a riichi
    /// stick being posted, a win's point delta) rather than requesting a
    /// fresh legality check.
    #[must_use]
    pub const fn is_in_game_announce(&self) -> bool {
        matches!(
            self,
            Self::Dora { .. } | Self::ReachAccepted { .. } | Self::Hora { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsumo_roundtrips_through_json() {
        let event = Event::Tsumo { actor: 2, pai: "5mr".parse().unwrap() };
        let s = serde_json::to_string(&event).unwrap();
        assert_eq!(s, r#"{"type":"tsumo","actor":2,"pai":"5mr"}"#);
        let back: Event = serde_json::from_str(&s).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn actor_extraction() {
        let event = Event::Reach { actor: 1 };
        assert_eq!(event.actor(), Some(1));
        assert!(!event.is_in_game_announce());
        assert!(Event::Dora { dora_marker: "E".parse().unwrap() }.is_in_game_announce());
    }
}
