//! Prize distribution for round and game winners.
//!
//! Payouts go through the ledger one recipient at a time. A payout that
//! fails or traps is logged and reported in a `RewardResult` event; the
//! remaining payouts and the phase transition still go ahead. Whatever is
//! not paid out stays in the ledger pool for the host.

use soroban_sdk::{log, Address, Env, Vec};
use stellarcade_shared::{commission_of, weighted_reward, GAME_PRIZE_POOL_COMMISSION};

use crate::interfaces::LedgerClient;
use crate::types::{Answer, Player, Room};
use crate::{Error, RewardResult};

/// Split the round pool: 20% moves into the game pool, and the rest is
/// shared among `winners` by vote weight. The round pool is emptied either way.
pub fn distribute_round_reward(
    env: &Env,
    ledger: &Address,
    room: &mut Room,
    winners: &Vec<Answer>,
) -> Result<(), Error> {
    let pool = room.round_prize_pool;
    let commission = commission_of(pool, GAME_PRIZE_POOL_COMMISSION)?;
    room.game_prize_pool = room
        .game_prize_pool
        .checked_add(commission)
        .ok_or(Error::Overflow)?;
    room.round_prize_pool = 0;
    let distributable = pool.checked_sub(commission).ok_or(Error::Overflow)?;

    let mut total_votes: u32 = 0;
    for answer in winners.iter() {
        total_votes = total_votes
            .checked_add(answer.votes.len())
            .ok_or(Error::Overflow)?;
    }

    if total_votes == 0 {
        log!(env, "no votes, skipping round reward", room.id);
        return Ok(());
    }

    for answer in winners.iter() {
        let reward = weighted_reward(distributable, answer.votes.len(), total_votes)?;
        pay(env, ledger, room.id, &answer.author, reward);
    }

    Ok(())
}

/// Share the game pool among `winners` by rounds won. The game pool is
/// emptied either way.
pub fn distribute_game_reward(
    env: &Env,
    ledger: &Address,
    room: &mut Room,
    winners: &Vec<Player>,
) -> Result<(), Error> {
    let pool = room.game_prize_pool;
    room.game_prize_pool = 0;

    let total_rounds = room.rounds.len();
    if total_rounds == 0 {
        log!(env, "no rounds played, skipping game reward", room.id);
        return Ok(());
    }

    for player in winners.iter() {
        let reward = weighted_reward(pool, player.rounds_won, total_rounds)?;
        pay(env, ledger, room.id, &player.wallet, reward);
    }

    Ok(())
}

fn pay(env: &Env, ledger: &Address, room_id: u64, wallet: &Address, amount: i128) {
    let rewarded = matches!(
        LedgerClient::new(env, ledger).try_reward_player(wallet, &amount),
        Ok(Ok(true))
    );
    if !rewarded {
        log!(env, "reward payout failed", room_id, wallet.clone(), amount);
    }

    RewardResult {
        room_id,
        player: wallet.clone(),
        amount,
        rewarded,
    }
    .publish(env);
}
