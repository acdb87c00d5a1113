//! Thin command-line front end over `libriichi`: a live mjai-event analyzer,
//! a single-hand shanten/agari calculator, and a self-played match runner
//! over the engine's own `reset`/`step` loop.
//!
//! Subcommands are adapted from the ancestor binary's `live`/`single`
//! commands (`washizu`'s hand-rolled `std::env::args()` dispatch), now
//! parsed with `clap` derive rather than by hand.

use std::collections::BTreeMap;
use std::io::BufRead;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::user_attended;
use indicatif::ProgressBar;
use rayon::prelude::*;

use riichi::algo::agari::{AgariCalculator, AgariCaculatorWithYaku};
use riichi::algo::shanten;
use riichi::engine::{Action, EngineError, Game, GameStepOutcome, KyokuEnd, KyokuOutcome, Rules};
use riichi::hand::{hand_with_aka, tile37_to_vec};
use riichi::mjai::Event;
use riichi::state::PlayerState;
use riichi::tile::GameMode;
use riichi::tu8;

#[derive(Parser)]
#[command(name = "riichi-cli", about = "Riichi mahjong rules engine command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reads newline-delimited mjai events from stdin and prints the
    /// observing seat's brief state whenever it has a non-pass action.
    Live {
        /// The seat (0..=3) to analyze the game from the perspective of.
        #[arg(long, default_value_t = 0)]
        player_id: u8,
    },
    /// Shanten/agari analysis for a single closed hand in shorthand notation
    /// (e.g. "123m456789p11z55s", red fives as "0").
    Hand {
        hand: String,
    },
    /// Drives a full self-played match through the engine's reset/step loop
    /// and prints each kyoku's settlement plus the final scores.
    Play {
        /// Wall/dealing seed; reusing the same seed reproduces the match
        /// bit-exactly.
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// One of "4p-red-half", "4p-red-east", "4p-no-red-half", "4p-no-red-east".
        #[arg(long, default_value = "4p-red-half")]
        mode: String,
    },
    /// Drives many independent self-played matches (one seed each, starting
    /// at `first_seed`) across all available cores and prints the aggregate
    /// average reward per seat.
    Batch {
        #[arg(long, default_value_t = 1)]
        first_seed: u64,
        #[arg(long, default_value_t = 100)]
        count: u64,
        #[arg(long, default_value = "4p-red-half")]
        mode: String,
    },
}

fn main() -> std::process::ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        if matches!(err.downcast_ref::<EngineError>(), Some(EngineError::ReplayDivergence { .. })) {
            return std::process::ExitCode::from(3);
        }
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Live { player_id } => live(player_id),
        Command::Hand { hand } => hand_cmd(&hand),
        Command::Play { seed, mode } => play(seed, &mode),
        Command::Batch { first_seed, count, mode } => batch(first_seed, count, &mode),
    }
}

fn live(player_id: u8) -> Result<()> {
    let mut state = PlayerState::new(player_id);
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read a line from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event =
            serde_json::from_str(&line).with_context(|| format!("failed to parse mjai event: {line}"))?;
        let cans = state.update(&event)?;
        log::debug!("{event:?}");
        if cans.can_act() {
            println!("{}", state.brief_info());
        }
    }
    Ok(())
}

fn hand_cmd(hand: &str) -> Result<()> {
    let counts37 = hand_with_aka(hand).with_context(|| format!("malformed hand: {hand}"))?;
    let tiles = tile37_to_vec(&counts37);
    let mut tehai = [0u8; 34];
    for tile in &tiles {
        tehai[tile.deaka().as_usize()] += 1;
    }
    let len_div3 = (tiles.len() / 3) as u8;
    let shanten = shanten::calc_all(&tehai, len_div3);
    if shanten != -1 {
        println!("shanten: {shanten}");
        return Ok(());
    }

    let winning_tile = tiles.last().context("hand must not be empty")?.deaka().as_u8();
    let agari_calc = AgariCalculator {
        tehai: &tehai,
        is_menzen: true,
        chis: &[],
        pons: &[],
        minkans: &[],
        ankans: &[],
        bakaze: tu8!(E),
        jikaze: tu8!(E),
        winning_tile,
        is_ron: true,
    };
    match agari_calc.agari_with_names(0, 0) {
        Some((agari, names)) => {
            println!("{} [{}]", agari.point(true).ron_total(0, true), names.join(", "));
        }
        None => println!("no-yaku"),
    }
    Ok(())
}

/// Prefers a winning claim so the demo match doesn't stall on discards;
/// otherwise takes whatever the engine offered first.
fn choose_action(legal: &[Action]) -> Action {
    legal
        .iter()
        .find(|a| matches!(a, Action::Tsumo | Action::Ron))
        .or_else(|| legal.first())
        .copied()
        .expect("legal_actions is never empty")
}

fn play(seed: u64, mode: &str) -> Result<()> {
    let mode = GameMode::from_str(mode).with_context(|| format!("unknown game mode {mode:?}"))?;
    let mut game = Game::new(mode, Rules::default(), seed);
    let pb = (!user_attended()).then(ProgressBar::new_spinner);

    let mut observations = game.observations();
    loop {
        let actions: BTreeMap<u8, Action> = observations
            .iter()
            .map(|(&seat, obs)| (seat, choose_action(&obs.legal_actions)))
            .collect();
        match game.step(actions)? {
            GameStepOutcome::Continue(next) => observations = next,
            GameStepOutcome::KyokuEnded(outcome) => {
                if let Some(ref pb) = pb {
                    pb.inc(1);
                }
                print_outcome(&outcome);
                if outcome.game_over {
                    break;
                }
                observations = game.advance();
            }
        }
    }
    if let Some(pb) = pb {
        pb.finish_with_message("match complete");
    }
    println!("final scores: {:?}", game.scores);
    println!("rewards: {:?}", game.rewards());
    Ok(())
}

/// Runs one self-played match to completion with no progress/settlement
/// printing, for use from a parallel batch.
fn run_match_silent(seed: u64, mode: GameMode) -> Result<[f32; 4]> {
    let mut game = Game::new(mode, Rules::default(), seed);
    let mut observations = game.observations();
    loop {
        let actions: BTreeMap<u8, Action> = observations
            .iter()
            .map(|(&seat, obs)| (seat, choose_action(&obs.legal_actions)))
            .collect();
        match game.step(actions)? {
            GameStepOutcome::Continue(next) => observations = next,
            GameStepOutcome::KyokuEnded(outcome) => {
                if outcome.game_over {
                    break;
                }
                observations = game.advance();
            }
        }
    }
    Ok(game.rewards())
}

fn batch(first_seed: u64, count: u64, mode: &str) -> Result<()> {
    let mode = GameMode::from_str(mode).with_context(|| format!("unknown game mode {mode:?}"))?;
    let pb = (!user_attended()).then(|| ProgressBar::new(count));

    let results: Vec<[f32; 4]> = (first_seed..first_seed + count)
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|seed| {
            let r = run_match_silent(seed, mode);
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            r
        })
        .collect::<Result<_>>()?;

    let mut totals = [0f64; 4];
    for rewards in &results {
        for (t, &r) in totals.iter_mut().zip(rewards) {
            *t += r as f64;
        }
    }
    if let Some(pb) = pb {
        pb.finish_with_message("batch complete");
    }
    let n = results.len() as f64;
    println!(
        "{n} matches, average reward per seat: {:?}",
        totals.map(|t| t / n)
    );
    Ok(())
}

fn print_outcome(outcome: &KyokuOutcome) {
    match &outcome.end {
        KyokuEnd::Hule { wins, deltas, .. } => {
            for win in wins {
                println!(
                    "kyoku {} settled: seat {} {} {}han{}fu, deltas {:?}",
                    outcome.next_kyoku_idx,
                    win.winner,
                    if win.is_tsumo { "tsumo" } else { "ron" },
                    win.han,
                    win.fu,
                    deltas,
                );
            }
        }
        KyokuEnd::Ryuukyoku { abortive, tenpai, deltas, .. } => {
            println!(
                "kyoku {} ended in {}ryuukyoku, tenpai {:?}, deltas {:?}",
                outcome.next_kyoku_idx,
                if *abortive { "abortive " } else { "" },
                tenpai,
                deltas,
            );
        }
    }
}
