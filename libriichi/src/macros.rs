/// Compile-time tile face index, by mnemonic (`1m`, `E`, `5pr`, ...).
///
/// The face space is 0..=36: `1m..9m, 1p..9p, 1s..9s` (0..=26), honors
/// `E,S,W,N,P,F,C` (27..=33), then the three red-five faces `5mr,5pr,5sr`
/// (34..=36).
#[macro_export]
macro_rules! tu8 {
    (1m) => { 0u8 }; (2m) => { 1u8 }; (3m) => { 2u8 }; (4m) => { 3u8 };
    (5m) => { 4u8 }; (6m) => { 5u8 }; (7m) => { 6u8 }; (8m) => { 7u8 }; (9m) => { 8u8 };
    (1p) => { 9u8 }; (2p) => { 10u8 }; (3p) => { 11u8 }; (4p) => { 12u8 };
    (5p) => { 13u8 }; (6p) => { 14u8 }; (7p) => { 15u8 }; (8p) => { 16u8 }; (9p) => { 17u8 };
    (1s) => { 18u8 }; (2s) => { 19u8 }; (3s) => { 20u8 }; (4s) => { 21u8 };
    (5s) => { 22u8 }; (6s) => { 23u8 }; (7s) => { 24u8 }; (8s) => { 25u8 }; (9s) => { 26u8 };
    (E) => { 27u8 }; (S) => { 28u8 }; (W) => { 29u8 }; (N) => { 30u8 };
    (P) => { 31u8 }; (F) => { 32u8 }; (C) => { 33u8 };
    (5mr) => { 34u8 }; (5pr) => { 35u8 }; (5sr) => { 36u8 };
}

/// Same as [`tu8!`] but returns `usize`, for indexing `[T; 34]`/`[T; 37]` arrays.
#[macro_export]
macro_rules! tuz {
    ($($t:tt)*) => { $crate::tu8!($($t)*) as usize };
}

/// Builds a [`crate::tile::Tile`] from a mnemonic.
#[macro_export]
macro_rules! t {
    ($($t:tt)*) => { $crate::tile::Tile::new($crate::tu8!($($t)*)) };
}

/// Converts a runtime face index (`u8` or `usize`) into a [`crate::tile::Tile`],
/// panicking if it is out of the 0..=36 range. Use this whenever a face comes
/// back from an array index or a histogram position and is known-valid by
/// construction.
#[macro_export]
macro_rules! must_tile {
    ($e:expr) => {
        $crate::tile::Tile::new(($e) as u8)
    };
}

/// Matches a `u8` face against a list of mnemonics, `|`-separated.
#[macro_export]
macro_rules! matches_tu8 {
    ($e:expr, $($t:tt)|+) => {
        matches!($e, $($crate::tu8!($t))|+)
    };
}
