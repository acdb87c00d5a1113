//! Point (score) calculation from a finished han/fu count, per spec.md
//! §4.5: base points, mangan+ caps, and ron/tsumo payment splits including
//! honba bonuses.

/// The settled score for one agari, independent of who's paying whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Points the non-dealer loses on a ron, or each non-dealer pays on a
    /// tsumo (excludes honba).
    pub ko_ron: i32,
    /// Points the dealer loses on a ron, or the dealer pays on a tsumo when
    /// a non-dealer wins (excludes honba).
    pub oya_ron: i32,
    /// `(non_dealer_pay, non_dealer_pay, ...)` on a non-dealer tsumo, or the
    /// flat payment each of the three others makes on a dealer tsumo
    /// (excludes honba); always three entries even for a dealer win, where
    /// all three equal the dealer-tsumo payment.
    pub tsumo: [i32; 3],
    pub is_oya: bool,
}

#[must_use]
const fn round_up_100(v: i32) -> i32 {
    (v + 99) / 100 * 100
}

#[must_use]
fn base_points(fu: u32, han: u32) -> u32 {
    match han {
        0 => 0,
        1..=4 => {
            let base = fu * 2u32.pow(han + 2);
            base.min(2000)
        }
        5 => 2000,
        6 | 7 => 3000,
        8..=10 => 4000,
        11 | 12 => 6000,
        _ => 8000,
    }
}

impl Point {
    /// `fu`/`han` are the already-finalized values (dora, ura-dora, and aka
    /// han already folded in). `han >= 5` makes `fu` irrelevant.
    #[must_use]
    pub fn calc(is_oya: bool, fu: u8, han: u8) -> Self {
        let base = base_points(fu as u32, han as u32) as i32;
        Self::from_base(is_oya, base)
    }

    /// Yakuman multiplier `n` (2 for a double yakuman, etc.).
    #[must_use]
    pub fn yakuman(is_oya: bool, n: i32) -> Self {
        Self::from_base(is_oya, 8000 * n)
    }

    fn from_base(is_oya: bool, base: i32) -> Self {
        if is_oya {
            let ron = round_up_100(base * 6);
            let tsumo = round_up_100(base * 2);
            Self {
                ko_ron: 0,
                oya_ron: ron,
                tsumo: [tsumo, tsumo, tsumo],
                is_oya,
            }
        } else {
            let ko_ron = round_up_100(base * 4);
            let oya_ron = round_up_100(base * 6);
            let ko_tsumo = round_up_100(base);
            let oya_tsumo = round_up_100(base * 2);
            Self {
                ko_ron,
                oya_ron,
                tsumo: [ko_tsumo, ko_tsumo, oya_tsumo],
                is_oya,
            }
        }
    }

    /// Total ron payment the loser owes, honba included (300/stick).
    #[must_use]
    pub fn ron_total(&self, honba: u32, is_dealer_win: bool) -> i32 {
        let base = if is_dealer_win { self.oya_ron } else { self.ko_ron };
        base + honba as i32 * 300
    }

    /// Per-payer tsumo totals `[ko, ko, oya]` (dealer win: all three equal
    /// `self.tsumo[2]`), honba included (100/stick/payer).
    #[must_use]
    pub fn tsumo_total(&self, honba: u32) -> [i32; 3] {
        let bonus = honba as i32 * 100;
        [
            self.tsumo[0] + bonus,
            self.tsumo[1] + bonus,
            self.tsumo[2] + bonus,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangan_caps_at_five_han() {
        let p = Point::calc(false, 30, 5);
        assert_eq!(p.ko_ron, 8000);
        assert_eq!(p.oya_ron, 12000);
    }

    #[test]
    fn thirty_fu_four_han_ko_ron() {
        // 30fu 4han = base 30*2^6=1920, ron(ko)=1920*4=7680 -> 7700
        let p = Point::calc(false, 30, 4);
        assert_eq!(p.ko_ron, 7700);
    }

    #[test]
    fn dealer_tsumo_sanbun_split() {
        let p = Point::calc(true, 40, 3);
        // base = 40 * 2^5 = 1280; tsumo(each) = ceil(1280*2,100) = 2600
        assert_eq!(p.tsumo[0], 2600);
        assert_eq!(p.tsumo, [2600, 2600, 2600]);
    }

    #[test]
    fn honba_adds_to_ron_and_tsumo() {
        let p = Point::calc(false, 30, 3);
        assert_eq!(p.ron_total(1, false), p.ko_ron + 300);
        let t = p.tsumo_total(2);
        assert_eq!(t[0], p.tsumo[0] + 200);
    }

    #[test]
    fn double_yakuman() {
        let p = Point::yakuman(false, 2);
        assert_eq!(p.ko_ron, 32000);
        assert_eq!(p.oya_ron, 48000);
    }
}
