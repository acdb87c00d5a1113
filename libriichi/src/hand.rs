//! Human-readable hand notation: the usual `123m456p789s11z` shorthand,
//! with `0` standing for a red five in its preceding suit run.

use thiserror::Error;

use crate::tile::Tile;
use crate::tu8;

#[derive(Error, Debug)]
pub enum HandParseError {
    #[error("unexpected character '{0}' in hand notation")]
    UnexpectedChar(char),
    #[error("digit '{0}' has no suit/honor marker following it")]
    DanglingDigit(char),
    #[error("'{0}' is not a valid honor index (expected 1..=7)")]
    BadHonor(char),
    #[error("'0' (red five) is only valid in the m/p/s suits")]
    RedFiveInHonors,
}

/// Parses `123m456p789s11z` style notation into face counts over the
/// 37-wide table (0..=33 plain faces, 34..=36 the three red fives).
pub fn hand_with_aka(s: &str) -> Result<[u8; 37], HandParseError> {
    let mut counts = [0u8; 37];
    let mut pending = Vec::new();
    for ch in s.chars() {
        match ch {
            '0'..='9' => pending.push(ch),
            'm' | 'p' | 's' => {
                let suit_base = match ch {
                    'm' => tu8!(1m),
                    'p' => tu8!(1p),
                    's' => tu8!(1s),
                    _ => unreachable!(),
                };
                for d in pending.drain(..) {
                    if d == '0' {
                        let aka = suit_base + 4 + (tu8!(5mr) - tu8!(1m));
                        counts[aka as usize] += 1;
                    } else {
                        let rank = d.to_digit(10).unwrap() as u8;
                        counts[(suit_base + rank - 1) as usize] += 1;
                    }
                }
            }
            'z' => {
                for d in pending.drain(..) {
                    if d == '0' {
                        return Err(HandParseError::RedFiveInHonors);
                    }
                    let idx = d.to_digit(10).unwrap();
                    if !(1..=7).contains(&idx) {
                        return Err(HandParseError::BadHonor(d));
                    }
                    counts[(tu8!(E) + idx as u8 - 1) as usize] += 1;
                }
            }
            c if c.is_whitespace() => {}
            c => return Err(HandParseError::UnexpectedChar(c)),
        }
    }
    if let Some(&d) = pending.last() {
        return Err(HandParseError::DanglingDigit(d));
    }
    Ok(counts)
}

/// Expands a 37-wide count table into a sorted `Vec<Tile>`.
pub fn tile37_to_vec(counts: &[u8; 37]) -> Vec<Tile> {
    let mut out = Vec::new();
    for (face, &n) in counts.iter().enumerate() {
        for _ in 0..n {
            out.push(Tile::new(face as u8));
        }
    }
    out
}

/// Folds the three aka faces into their plain 34-wide counterparts.
pub fn fold_aka(counts: &[u8; 37]) -> [u8; 34] {
    let mut out = [0u8; 34];
    out[..34].copy_from_slice(&counts[..34]);
    out[tu8!(5m) as usize] += counts[tu8!(5mr) as usize];
    out[tu8!(5p) as usize] += counts[tu8!(5pr) as usize];
    out[tu8!(5s) as usize] += counts[tu8!(5sr) as usize];
    out
}

/// Parses hand notation straight into a 34-wide face-count histogram, with
/// any red fives folded into their plain counterpart. Convenience wrapper
/// used pervasively by tests throughout the crate.
pub fn hand(s: &str) -> Result<[u8; 34], HandParseError> {
    hand_with_aka(s).map(|counts| fold_aka(&counts))
}

/// Renders a 34-wide face-count histogram back into `123m456p789s11z`
/// notation, grouped by suit in tile order. `akas_in_hand` marks whether the
/// concealed 5m/5p/5s (if any) is the red one, rendered as a leading `0`.
pub fn tiles_to_string(counts: &[u8; 34], akas_in_hand: &[bool; 3]) -> String {
    let mut out = String::new();
    for (suit_idx, suit_char) in ['m', 'p', 's'].iter().enumerate() {
        let base = suit_idx * 9;
        let mut any = false;
        for rank in 0..9 {
            let mut n = counts[base + rank];
            if rank == 4 && akas_in_hand[suit_idx] && n > 0 {
                out.push('0');
                any = true;
                n -= 1;
            }
            for _ in 0..n {
                out.push(char::from_digit(rank as u32 + 1, 10).unwrap());
                any = true;
            }
        }
        if any {
            out.push(*suit_char);
        }
    }
    let honor_base = tu8!(E) as usize;
    let mut any = false;
    for idx in 0..7 {
        for _ in 0..counts[honor_base + idx] {
            out.push(char::from_digit(idx as u32 + 1, 10).unwrap());
            any = true;
        }
    }
    if any {
        out.push('z');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_hand() {
        let h = hand_with_aka("123m456p789s11z").unwrap();
        assert_eq!(h[tu8!(1m) as usize], 1);
        assert_eq!(h[tu8!(9s) as usize], 1);
        assert_eq!(h[tu8!(E) as usize], 2);
    }

    #[test]
    fn parses_red_five() {
        let h = hand_with_aka("0m").unwrap();
        assert_eq!(h[tu8!(5mr) as usize], 1);
        assert_eq!(h[tu8!(5m) as usize], 0);
    }

    #[test]
    fn roundtrips_through_string() {
        let h = hand_with_aka("123m456p789s").unwrap();
        let folded = fold_aka(&h);
        assert_eq!(tiles_to_string(&folded, &[false; 3]), "123m456p789s");
    }

    #[test]
    fn hand_helper_folds_aka() {
        assert_eq!(hand("0m123p").unwrap(), hand("5m123p").unwrap());
    }
}
