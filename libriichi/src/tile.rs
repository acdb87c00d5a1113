use std::fmt;

use thiserror::Error;

use crate::{must_tile, t, tu8, tuz};

/// A tile *kind* (face), 0..=36.
///
/// 0..=26 are the suited tiles (`1m..9m, 1p..9p, 1s..9s`), 27..=33 are the
/// honors (`E,S,W,N,P,F,C`), and 34..=36 are the three red-five faces
/// (`5mr, 5pr, 5sr`), kept as distinct kinds because they carry an
/// unconditional extra han but otherwise behave exactly like their plain
/// `5m/5p/5s` counterpart in every set/yaku computation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tile(u8);

impl Tile {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 36;
    /// Sentinel for "some tile, face unknown to this observer" — used by the
    /// mjai protocol to report another seat's concealed draw.
    pub const UNKNOWN: Self = Self(37);

    #[inline]
    pub const fn new(id: u8) -> Self {
        assert!(id <= Self::UNKNOWN.0, "tile face out of range");
        Self(id)
    }

    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_aka(self) -> bool {
        self.0 >= tu8!(5mr)
    }

    /// Collapses an aka face to its plain counterpart (`5mr -> 5m`); a no-op
    /// for every other face.
    #[inline]
    pub const fn deaka(self) -> Self {
        match self.0 {
            x if x == tu8!(5mr) => Self(tu8!(5m)),
            x if x == tu8!(5pr) => Self(tu8!(5p)),
            x if x == tu8!(5sr) => Self(tu8!(5s)),
            x => Self(x),
        }
    }

    /// Promotes a plain `5m/5p/5s` to its aka face; a no-op for every other
    /// face (including one that is already aka).
    #[inline]
    pub const fn akaize(self) -> Self {
        match self.0 {
            x if x == tu8!(5m) => Self(tu8!(5mr)),
            x if x == tu8!(5p) => Self(tu8!(5pr)),
            x if x == tu8!(5s) => Self(tu8!(5sr)),
            x => Self(x),
        }
    }

    #[inline]
    pub const fn is_jihai(self) -> bool {
        let f = self.deaka().0;
        f >= tu8!(E)
    }

    #[inline]
    pub const fn is_yakuhai_always(self) -> bool {
        let f = self.deaka().0;
        f >= tu8!(P)
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        let f = self.deaka().0;
        matches!(f % 9, 0 | 8) && f < tu8!(E)
    }

    #[inline]
    pub const fn is_terminal_or_honor(self) -> bool {
        self.is_terminal() || self.is_jihai()
    }

    /// Alias of [`Self::is_terminal_or_honor`] ("yaokyuuhai"), kept under this
    /// name because it is how the fu/yaku tables in `algo::agari` refer to it.
    #[inline]
    pub const fn is_yaokyuu(self) -> bool {
        self.is_terminal_or_honor()
    }

    /// The previous face in the same dora cycle (inverse of [`Self::dora_next`]).
    #[inline]
    pub const fn prev(self) -> Self {
        let f = self.deaka().0;
        let prev = if f < tu8!(E) {
            let suit_base = (f / 9) * 9;
            suit_base + (f - suit_base + 8) % 9
        } else if f < tu8!(P) {
            tu8!(E) + (f - tu8!(E) + 3) % 4
        } else {
            tu8!(P) + (f - tu8!(P) + 2) % 3
        };
        Self(prev)
    }

    /// Suit index 0=m,1=p,2=s, or `None` for honors.
    #[inline]
    pub const fn suit(self) -> Option<u8> {
        let f = self.deaka().0;
        if f < tu8!(E) { Some(f / 9) } else { None }
    }

    /// 1..=9 for suited tiles, `None` for honors.
    #[inline]
    pub const fn rank(self) -> Option<u8> {
        let f = self.deaka().0;
        if f < tu8!(E) { Some(f % 9 + 1) } else { None }
    }

    /// The face a dora indicator equal to `self` points to, with wraparound
    /// inside each suit (9->1) and inside the wind (E->S->W->N->E) and
    /// dragon (P->F->C->P) cycles.
    #[inline]
    pub const fn dora_next(self) -> Self {
        let f = self.deaka().0;
        let next = if f < tu8!(E) {
            let suit_base = (f / 9) * 9;
            suit_base + (f - suit_base + 1) % 9
        } else if f < tu8!(P) {
            tu8!(E) + (f - tu8!(E) + 1) % 4
        } else {
            tu8!(P) + (f - tu8!(P) + 1) % 3
        };
        Self(next)
    }

    /// Alias of [`Self::dora_next`], kept under this name because it is how
    /// the dora-indicator bookkeeping in `state::update` refers to it.
    #[inline]
    pub const fn next(self) -> Self {
        self.dora_next()
    }
}

#[derive(Error, Debug)]
#[error("'{0}' is not a valid single-tile notation")]
pub struct TileParseError(String);

impl std::str::FromStr for Tile {
    type Err = TileParseError;

    /// Parses a single tile in the same notation [`fmt::Display`] produces:
    /// `1m..9m/1p..9p/1s..9s`, `E/S/W/N/P/F/C`, with an optional trailing `r`
    /// marking the red five.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const HONORS: [&str; 7] = ["E", "S", "W", "N", "P", "F", "C"];
        if s == "?" {
            return Ok(Self::UNKNOWN);
        }
        let err = || TileParseError(s.to_string());
        let (body, aka) = match s.strip_suffix('r') {
            Some(b) => (b, true),
            None => (s, false),
        };
        if let Some(idx) = HONORS.iter().position(|&h| h == body) {
            if aka {
                return Err(err());
            }
            return Ok(Self(tu8!(E) + idx as u8));
        }
        let mut chars = body.chars();
        let rank = chars.next().and_then(|c| c.to_digit(10)).ok_or_else(err)?;
        let suit = chars.next().ok_or_else(err)?;
        if chars.next().is_some() || !(1..=9).contains(&rank) {
            return Err(err());
        }
        let suit_base = match suit {
            'm' => tu8!(1m),
            'p' => tu8!(1p),
            's' => tu8!(1s),
            _ => return Err(err()),
        };
        let face = Self(suit_base + rank as u8 - 1);
        if aka {
            if rank != 5 {
                return Err(err());
            }
            Ok(face.akaize())
        } else {
            Ok(face)
        }
    }
}

impl serde::Serialize for Tile {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Tile {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SUITS: [char; 3] = ['m', 'p', 's'];
        const HONORS: [&str; 7] = ["E", "S", "W", "N", "P", "F", "C"];
        if self.is_unknown() {
            return write!(f, "?");
        }
        let face = self.deaka().0;
        if face < tu8!(E) {
            write!(f, "{}{}", face % 9 + 1, SUITS[(face / 9) as usize])?;
        } else {
            write!(f, "{}", HONORS[(face - tu8!(E)) as usize])?;
        }
        if self.is_aka() {
            write!(f, "r")?;
        }
        Ok(())
    }
}

/// A concrete physical tile instance, 0..=135, plus the `NONE = 136`
/// sentinel. `tid / 4` is the canonical face (0..=33, never an aka face —
/// aka-ness of a physical instance is a property of *which* copy it is,
/// resolved through [`Tid::to_tile`] against the active [`GameMode`]).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Tid(u8);

impl Tid {
    pub const NONE: Tid = Tid(136);

    #[inline]
    pub const fn new(id: u8) -> Self {
        assert!(id <= 136, "tid out of range");
        Self(id)
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 136
    }

    /// Canonical face 0..=33 (never an aka variant).
    #[inline]
    pub const fn face(self) -> u8 {
        assert!(!self.is_none());
        self.0 / 4
    }

    /// Whether this *specific physical copy* is a red five under `mode`.
    ///
    /// Convention: for each suited five (`5m=4, 5p=13, 5s=22`) the copy
    /// whose id is a multiple of 4 is the red one — the same convention the
    /// mjai/Tenhou tile-id ecosystem uses (tile id 16 == the red `0m`).
    #[inline]
    pub const fn is_red(self, mode: GameMode) -> bool {
        if self.is_none() || !mode.has_aka() {
            return false;
        }
        let face = self.face();
        self.0 % 4 == 0 && matches!(face, x if x == tu8!(5m) || x == tu8!(5p) || x == tu8!(5s))
    }

    #[inline]
    pub fn to_tile(self, mode: GameMode) -> Tile {
        let face = Tile::new(self.face());
        if self.is_red(mode) { face.akaize() } else { face }
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() { write!(f, "?") } else { write!(f, "{}", self.0) }
    }
}

/// Table rule set selecting the red-five table and round length.
#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub enum GameMode {
    #[serde(rename = "4p-red-half")]
    FourPlayerRedHalf,
    #[serde(rename = "4p-red-east")]
    FourPlayerRedEast,
    #[serde(rename = "4p-no-red-half")]
    FourPlayerNoRedHalf,
    #[serde(rename = "4p-no-red-east")]
    FourPlayerNoRedEast,
}

impl GameMode {
    #[inline]
    pub const fn has_aka(self) -> bool {
        matches!(self, Self::FourPlayerRedHalf | Self::FourPlayerRedEast)
    }

    #[inline]
    pub const fn is_tonpuusen(self) -> bool {
        matches!(self, Self::FourPlayerRedEast | Self::FourPlayerNoRedEast)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "4p-red-half" => Self::FourPlayerRedHalf,
            "4p-red-east" => Self::FourPlayerRedEast,
            "4p-no-red-half" => Self::FourPlayerNoRedHalf,
            "4p-no-red-east" => Self::FourPlayerNoRedEast,
            _ => return None,
        })
    }
}

impl Default for GameMode {
    fn default() -> Self {
        Self::FourPlayerRedHalf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tu8_macro_matches_display() {
        assert_eq!(must_tile!(tu8!(1m)), t!(1m));
        assert_eq!(t!(5mr).to_string(), "5mr");
        assert_eq!(t!(E).to_string(), "E");
    }

    #[test]
    fn dora_next_wraps() {
        assert_eq!(t!(9m).dora_next(), t!(1m));
        assert_eq!(t!(N).dora_next(), t!(E));
        assert_eq!(t!(C).dora_next(), t!(P));
        assert_eq!(t!(5mr).dora_next(), t!(6m));
    }

    #[test]
    fn tid_red_five_convention() {
        let tid16 = Tid::new(16); // 5m block starts at 4*4=16
        assert_eq!(tid16.face(), tuz!(5m) as u8);
        assert!(tid16.is_red(GameMode::FourPlayerRedHalf));
        assert!(!tid16.is_red(GameMode::FourPlayerNoRedHalf));
        assert_eq!(tid16.to_tile(GameMode::FourPlayerRedHalf), t!(5mr));
        let tid17 = Tid::new(17);
        assert!(!tid17.is_red(GameMode::FourPlayerRedHalf));
    }
}
