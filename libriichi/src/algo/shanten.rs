//! Shanten (tenpai distance) calculators for the three hand shapes
//! recognized by the rules: standard (four sets + a pair), chiitoitsu
//! (seven pairs) and kokushi musou (thirteen orphans).
//!
//! All three operate on a 34-wide face histogram (`tehai[face] == count`,
//! never including the aka-dora faces 34..=36 — callers must deaka first).
//! `-1` means agari (the hand is already complete); positive values count
//! how many tile exchanges remain until tenpai.

/// Standard-form shanten. `len_div3` is the number of sets already locked in
/// as open/closed melds (chi/pon/kan each count as one, regardless of how
/// many physical tiles they hold); `tehai` holds only the concealed portion.
#[must_use]
pub fn calc_regular(tehai: &[u8; 34], len_div3: u8) -> i8 {
    let need_sets = 4 - len_div3 as i32;
    let mut tiles = *tehai;
    let mut best = i32::MAX;
    search(&mut tiles, 0, 0, false, 0, need_sets, &mut best);
    (best as i8).max(-1)
}

fn search(
    tiles: &mut [u8; 34],
    idx: usize,
    sets: i32,
    has_pair: bool,
    partials: i32,
    need_sets: i32,
    best: &mut i32,
) {
    if idx >= 34 || sets >= need_sets {
        finalize(sets, has_pair, partials, need_sets, best);
        return;
    }

    // Skip this face entirely.
    search(tiles, idx + 1, sets, has_pair, partials, need_sets, best);

    let suit_pos = idx % 9;
    let is_suited = idx < 27;

    if tiles[idx] >= 3 {
        tiles[idx] -= 3;
        search(tiles, idx, sets + 1, has_pair, partials, need_sets, best);
        tiles[idx] += 3;
    }
    if is_suited && suit_pos <= 6 && tiles[idx] >= 1 && tiles[idx + 1] >= 1 && tiles[idx + 2] >= 1 {
        tiles[idx] -= 1;
        tiles[idx + 1] -= 1;
        tiles[idx + 2] -= 1;
        search(tiles, idx, sets + 1, has_pair, partials, need_sets, best);
        tiles[idx] += 1;
        tiles[idx + 1] += 1;
        tiles[idx + 2] += 1;
    }
    if tiles[idx] >= 2 {
        tiles[idx] -= 2;
        if !has_pair {
            search(tiles, idx + 1, sets, true, partials, need_sets, best);
        } else {
            search(tiles, idx + 1, sets, has_pair, partials + 1, need_sets, best);
        }
        tiles[idx] += 2;
    }
    if is_suited && suit_pos <= 7 && tiles[idx] >= 1 && tiles[idx + 1] >= 1 {
        tiles[idx] -= 1;
        tiles[idx + 1] -= 1;
        search(tiles, idx + 1, sets, has_pair, partials + 1, need_sets, best);
        tiles[idx] += 1;
        tiles[idx + 1] += 1;
    }
    if is_suited && suit_pos <= 6 && tiles[idx] >= 1 && tiles[idx + 2] >= 1 {
        tiles[idx] -= 1;
        tiles[idx + 2] -= 1;
        search(tiles, idx + 1, sets, has_pair, partials + 1, need_sets, best);
        tiles[idx] += 1;
        tiles[idx + 2] += 1;
    }
}

fn finalize(sets: i32, has_pair: bool, partials: i32, need_sets: i32, best: &mut i32) {
    let remaining_sets = (need_sets - sets).max(0);
    let used_partials = partials.min(remaining_sets);
    let mut shanten = (need_sets - sets) * 2 - used_partials;
    if !has_pair && used_partials + sets >= need_sets {
        // No pair found and every remaining block is already covered by a
        // partial set: one of those blocks must be downgraded to serve as
        // the head, costing one more exchange.
        shanten += 1;
    } else if has_pair {
        shanten -= 1;
    }
    if shanten < *best {
        *best = shanten;
    }
}

/// Chiitoitsu shanten: `6 - pairs + max(0, 7 - kinds)`, the standard formula
/// accounting for the "at least 7 distinct kinds" requirement.
#[must_use]
pub fn calc_chiitoi(tehai: &[u8; 34]) -> i8 {
    let pairs = tehai.iter().filter(|&&c| c >= 2).count() as i8;
    let kinds = tehai.iter().filter(|&&c| c >= 1).count() as i8;
    6 - pairs + (7 - kinds).max(0)
}

const YAOCHUU: [u8; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

/// Kokushi musou shanten: `13 - kinds - has_pair`.
#[must_use]
pub fn calc_kokushi(tehai: &[u8; 34]) -> i8 {
    let mut kinds = 0i8;
    let mut has_pair = false;
    for &f in &YAOCHUU {
        let c = tehai[f as usize];
        if c > 0 {
            kinds += 1;
            has_pair |= c >= 2;
        }
    }
    13 - kinds - has_pair as i8
}

/// The overall shanten, i.e. the minimum across all three hand shapes.
#[must_use]
pub fn calc_all(tehai: &[u8; 34], len_div3: u8) -> i8 {
    calc_regular(tehai, len_div3)
        .min(calc_chiitoi(tehai))
        .min(calc_kokushi(tehai))
}

/// The set of faces whose addition to `tehai` (a 3n+1-tile concealed hand)
/// brings `calc_all` down to `-1`, i.e. the exact ukeire for a hand that is
/// already tenpai or better. Returns an empty set if the hand is not tenpai.
#[must_use]
pub fn waits(tehai: &[u8; 34], len_div3: u8) -> [bool; 34] {
    let mut out = [false; 34];
    for face in 0..34 {
        if tehai[face] >= 4 {
            continue;
        }
        let mut tmp = *tehai;
        tmp[face] += 1;
        if calc_all(&tmp, len_div3) == -1 {
            out[face] = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::hand;

    #[test]
    fn tenpai_is_zero_shanten() {
        // 13 tiles, one away from 123m 456p 789s 11z + 22z (tanki on 2z)
        let tehai = hand("123456789m 123p 123s 1z").unwrap();
        assert_eq!(calc_all(&tehai, 0), 0);
    }

    #[test]
    fn complete_hand_is_agari() {
        let tehai = hand("123456789m 123p 11s").unwrap();
        assert_eq!(calc_regular(&tehai, 0), -1);
    }

    #[test]
    fn kokushi_tenpai() {
        let tehai = hand("19m 19p 19s 1234567z").unwrap();
        assert_eq!(calc_kokushi(&tehai), 0);
    }

    #[test]
    fn chiitoi_shanten() {
        let tehai = hand("1122334455667z").unwrap();
        assert_eq!(calc_chiitoi(&tehai), 0);
    }
}
