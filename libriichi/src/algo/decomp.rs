//! Live hand decomposition: enumerate every way a 14-tile concealed hand
//! (histogram over the 34 faces) can be split into four sets + one pair
//! (standard shape), plus the chiitoitsu and kokushi special shapes.
//!
//! This replaces a precomputed lookup table with a direct recursive search
//! bounded by the 34-face alphabet and the fixed 4-sets-plus-pair target, so
//! it stays fast enough to run per legality check without needing to ship a
//! multi-megabyte data file. The set-removal recursion in [`remove_sets`] is
//! memoized on `(remaining histogram, start face, sets still needed)` per
//! spec.md §4.2, since distinct pair choices (and distinct branches within
//! the same pair choice) routinely bottom out at an identical sub-histogram.

use ahash::AHashMap;
use tinyvec::ArrayVec;

/// One decomposition of a winning hand. Indices refer to positions in the
/// `tile14` array built by [`build_tile14`] (the hand's *distinct* faces,
/// each listed once regardless of how many physical copies are present),
/// not to raw face numbers — this indirection is what lets
/// [`crate::algo::agari::DivWorker`] recover the original face via
/// `tile14[idx]` without caring which particular representative tile of a
/// triplet/run/pair it pulled out.
#[derive(Debug, Default, Clone)]
pub struct Div {
    pub pair_idx: u8,
    pub kotsu_idxs: ArrayVec<[u8; 4]>,
    pub shuntsu_idxs: ArrayVec<[u8; 4]>,
    pub has_chitoi: bool,
    pub has_chuuren: bool,
    pub has_ittsuu: bool,
    pub has_ryanpeikou: bool,
    pub has_ipeikou: bool,
}

/// Builds the "distinct faces present" array consumed by [`Div`]'s indices.
/// Unused tail slots stay `0` and must never be referenced by a real `Div`.
#[must_use]
pub fn build_tile14(tehai: &[u8; 34]) -> [u8; 14] {
    let mut tile14 = [0u8; 14];
    let mut i = 0;
    for (face, &c) in tehai.iter().enumerate() {
        if c > 0 && i < 14 {
            tile14[i] = face as u8;
            i += 1;
        }
    }
    tile14
}

fn face_index(tile14: &[u8; 14], n: usize, face: u8) -> u8 {
    tile14[..n]
        .iter()
        .position(|&f| f == face)
        .expect("face must be present in tile14") as u8
}

/// Enumerates every valid standard/chiitoi decomposition of a 14-tile
/// concealed hand (kokushi is detected separately by the caller via
/// [`crate::algo::shanten::calc_kokushi`], since its "decomposition" isn't a
/// set/pair partition at all). Returns an empty vector if `tehai` is not a
/// complete 3n+2 shape.
#[must_use]
pub fn decompose(tehai: &[u8; 34]) -> Vec<Div> {
    let total: u16 = tehai.iter().map(|&c| c as u16).sum();
    if total != 14 {
        return vec![];
    }

    let n_distinct = tehai.iter().filter(|&&c| c > 0).count();
    let tile14 = build_tile14(tehai);
    let mut results = Vec::new();

    if n_distinct == 7 && tehai.iter().all(|&c| c == 0 || c == 2) {
        results.push(Div {
            has_chitoi: true,
            ..Default::default()
        });
    }

    let mut hist = *tehai;
    let mut memo = AHashMap::default();
    for pair_face in 0u8..34 {
        if hist[pair_face as usize] < 2 {
            continue;
        }
        hist[pair_face as usize] -= 2;
        let found = remove_sets(&mut hist, 0, 4, &mut memo);
        hist[pair_face as usize] += 2;

        let pair_idx = face_index(&tile14, n_distinct, pair_face);
        for (k, s) in found {
            let has_ittsuu = (0..3).any(|suit| {
                let base = suit * 9;
                s.contains(&base) && s.contains(&(base + 3)) && s.contains(&(base + 6))
            });
            let (has_ipeikou, has_ryanpeikou) = peikou_flags(&s);
            results.push(Div {
                pair_idx,
                kotsu_idxs: k.iter().map(|&f| face_index(&tile14, n_distinct, f)).collect(),
                shuntsu_idxs: s.iter().map(|&f| face_index(&tile14, n_distinct, f)).collect(),
                has_chitoi: false,
                has_chuuren: false,
                has_ittsuu,
                has_ryanpeikou,
                has_ipeikou,
            });
        }
    }

    if is_chuuren(tehai) {
        for div in &mut results {
            if !div.has_chitoi {
                div.has_chuuren = true;
            }
        }
    }

    results
}

type SetFaces = (ArrayVec<[u8; 4]>, ArrayVec<[u8; 4]>);
type SetMemo = AHashMap<([u8; 34], u8, u8), Vec<SetFaces>>;

/// Recursively removes triplets and runs from `hist` starting the search at
/// face `start`, collecting every distinct way to reach exactly `remaining`
/// more sets. Memoized on `(hist, start, remaining)`: once faces before
/// `start` are exhausted they stay exhausted for the rest of this search, so
/// the same sub-histogram recurs often across both different pair choices
/// and different branches within one pair choice.
fn remove_sets(hist: &mut [u8; 34], start: u8, remaining: u8, memo: &mut SetMemo) -> Vec<SetFaces> {
    let mut s = start;
    while (s as usize) < 34 && hist[s as usize] == 0 {
        s += 1;
    }

    let key = (*hist, s, remaining);
    if let Some(cached) = memo.get(&key) {
        return cached.clone();
    }

    let mut found = Vec::new();
    if s as usize == 34 {
        if remaining == 0 {
            found.push((ArrayVec::new(), ArrayVec::new()));
        }
    } else if remaining > 0 {
        let f = s as usize;
        if hist[f] >= 3 {
            hist[f] -= 3;
            for (k, sh) in remove_sets(hist, s, remaining - 1, memo) {
                let k: ArrayVec<[u8; 4]> = std::iter::once(s).chain(k).collect();
                found.push((k, sh));
            }
            hist[f] += 3;
        }
        if f < 27 && f % 9 <= 6 && hist[f + 1] > 0 && hist[f + 2] > 0 {
            hist[f] -= 1;
            hist[f + 1] -= 1;
            hist[f + 2] -= 1;
            for (k, sh) in remove_sets(hist, s, remaining - 1, memo) {
                let sh: ArrayVec<[u8; 4]> = std::iter::once(s).chain(sh).collect();
                found.push((k, sh));
            }
            hist[f] += 1;
            hist[f + 1] += 1;
            hist[f + 2] += 1;
        }
    }

    memo.insert(key, found.clone());
    found
}

fn peikou_flags(shuntsu: &ArrayVec<[u8; 4]>) -> (bool, bool) {
    let mut counts = [0u8; 27];
    for &f in shuntsu.iter() {
        counts[f as usize] += 1;
    }
    let dup_groups = counts.iter().filter(|&&c| c >= 2).count();
    (dup_groups >= 1 && dup_groups < 2, dup_groups >= 2)
}

/// Chuurenpoutou shape check: one suit only, base pattern `1112345678999`
/// plus exactly one extra tile of that suit (any rank).
fn is_chuuren(tehai: &[u8; 34]) -> bool {
    for suit in 0..3 {
        let base = suit * 9;
        let other_suits_empty = tehai
            .iter()
            .enumerate()
            .all(|(f, &c)| (base..base + 9).contains(&f) || c == 0);
        if !other_suits_empty {
            continue;
        }
        let run = &tehai[base..base + 9];
        let sum: u16 = run.iter().map(|&c| c as u16).sum();
        if sum == 14 && run[0] >= 3 && run[8] >= 3 && run[1..8].iter().all(|&c| c >= 1) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::hand;

    #[test]
    fn standard_hand_has_at_least_one_decomposition() {
        let tehai = hand("123456789m 123p 11s").unwrap();
        let divs = decompose(&tehai);
        assert!(!divs.is_empty());
        assert!(divs.iter().any(|d| !d.has_chitoi));
    }

    #[test]
    fn chiitoi_hand_is_flagged() {
        let tehai = hand("1122334455667z7z").unwrap();
        let divs = decompose(&tehai);
        assert!(divs.iter().any(|d| d.has_chitoi));
    }

    #[test]
    fn ambiguous_hand_has_multiple_decompositions() {
        // 678m + 789m can be read as 678/789 (two shuntsu), matches iipeikou
        // detection path when duplicated; here 112233m is always iipeikou.
        let tehai = hand("112233m456p789s 11z").unwrap();
        let divs = decompose(&tehai);
        assert!(divs.iter().any(|d| d.has_ipeikou));
    }

    #[test]
    fn non_agari_hand_has_no_decomposition() {
        let tehai = hand("1234567m 123p 11s").unwrap();
        assert!(decompose(&tehai).is_empty());
    }
}
