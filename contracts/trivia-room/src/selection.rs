//! Winner selection shared by round winners (scored by votes) and game
//! winners (scored by rounds won).
//!
//! Candidates are identified by their position in the caller's list and
//! ranked by descending score. Equal scores keep their original order, so
//! an earlier answer or an earlier joiner ranks first among ties.

use soroban_sdk::{Env, Vec};

/// Candidate positions sorted by descending score, stable among ties.
pub fn rank_by_score(env: &Env, scores: &Vec<u32>) -> Vec<u32> {
    let mut ranked: Vec<u32> = Vec::new(env);

    for idx in 0..scores.len() {
        let score = scores.get_unchecked(idx);
        let mut inserted = false;
        for pos in 0..ranked.len() {
            if score > scores.get_unchecked(ranked.get_unchecked(pos)) {
                ranked.insert(pos, idx);
                inserted = true;
                break;
            }
        }
        if !inserted {
            ranked.push_back(idx);
        }
    }

    ranked
}

/// Pick the winners among `scores`, best first.
///
/// - `requested >= candidates`: everyone wins.
/// - `requested == 1`: only the top candidate wins, even when others tie it.
/// - otherwise the top `requested` win, and the cutoff grows by one for each
///   further candidate tied with the last winner included.
///
/// `requested` is taken by value; the room's configured count is untouched.
pub fn select_winners(env: &Env, scores: &Vec<u32>, requested: u32) -> Vec<u32> {
    let ranked = rank_by_score(env, scores);
    if requested >= ranked.len() {
        return ranked;
    }

    let mut winners: Vec<u32> = Vec::new(env);
    if requested == 0 {
        return winners;
    }

    let first = ranked.get_unchecked(0);
    winners.push_back(first);
    if requested == 1 {
        return winners;
    }

    let mut cutoff = requested;
    let mut last_score = scores.get_unchecked(first);
    for pos in 1..ranked.len() {
        let idx = ranked.get_unchecked(pos);
        let score = scores.get_unchecked(idx);
        if winners.len() >= cutoff {
            if score != last_score {
                break;
            }
            cutoff += 1;
        }
        winners.push_back(idx);
        last_score = score;
    }

    winners
}
