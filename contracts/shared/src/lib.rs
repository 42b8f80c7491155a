//! Shared stake arithmetic for Stellarcade contracts.
//!
//! Amounts are fixed-point integers where `ONE_GAS` units make up one whole
//! stake token. Commission rates use the same scale, so `20_000_000` is 20%.
#![no_std]
#![allow(unexpected_cfgs)]

use soroban_sdk::contracttype;

/// Error codes for the arithmetic helpers.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    InvalidAmount = 1,
    Overflow = 2,
    ZeroWeight = 3,
}

/// One whole stake token.
pub const ONE_GAS: i128 = 100_000_000;

/// Share of every round pool moved into the game pool (20%).
pub const GAME_PRIZE_POOL_COMMISSION: i128 = 20_000_000;

/// Share of a distributable pool paid out to winners (70%).
pub const USER_COMMISSION: i128 = 70_000_000;

/// Default stake paid by a host to open a room.
pub const CREATE_ROOM_STAKE: i128 = 4 * ONE_GAS;

/// Default stake paid by a player to join a room.
pub const JOIN_ROOM_STAKE: i128 = 2 * ONE_GAS;

/// Default stake paid by a player per submitted answer.
pub const SEND_ANSWER_STAKE: i128 = ONE_GAS;

/// `amount * rate / ONE_GAS`, truncated toward zero.
pub fn commission_of(amount: i128, rate: i128) -> Result<i128, Error> {
    if amount < 0 || rate < 0 || rate > ONE_GAS {
        return Err(Error::InvalidAmount);
    }
    amount
        .checked_mul(rate)
        .and_then(|v| v.checked_div(ONE_GAS))
        .ok_or(Error::Overflow)
}

/// Reward owed to one winner out of `pool`.
///
/// Computes `pool * (weight / total_weight) * USER_COMMISSION / ONE_GAS` in
/// that order. The weight ratio is an integer division, so any winner holding
/// less than the whole `total_weight` receives zero.
pub fn weighted_reward(pool: i128, weight: u32, total_weight: u32) -> Result<i128, Error> {
    if pool < 0 {
        return Err(Error::InvalidAmount);
    }
    if total_weight == 0 {
        return Err(Error::ZeroWeight);
    }
    let ratio = (weight / total_weight) as i128;
    pool.checked_mul(ratio)
        .and_then(|v| v.checked_mul(USER_COMMISSION))
        .and_then(|v| v.checked_div(ONE_GAS))
        .ok_or(Error::Overflow)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_commission_of_round_pool() {
        assert_eq!(commission_of(100, GAME_PRIZE_POOL_COMMISSION), Ok(20));
        assert_eq!(commission_of(2 * ONE_GAS, GAME_PRIZE_POOL_COMMISSION), Ok(40_000_000));
        assert_eq!(commission_of(0, GAME_PRIZE_POOL_COMMISSION), Ok(0));
    }

    #[test]
    fn test_commission_of_truncates() {
        // 20% of 7 is 1.4
        assert_eq!(commission_of(7, GAME_PRIZE_POOL_COMMISSION), Ok(1));
    }

    #[test]
    fn test_commission_of_rejects_bad_input() {
        assert_eq!(commission_of(-1, GAME_PRIZE_POOL_COMMISSION), Err(Error::InvalidAmount));
        assert_eq!(commission_of(100, ONE_GAS + 1), Err(Error::InvalidAmount));
        assert_eq!(commission_of(i128::MAX, USER_COMMISSION), Err(Error::Overflow));
    }

    #[test]
    fn test_weighted_reward_split_votes_truncate_to_zero() {
        // 3 of 6 votes: the ratio is truncated before scaling.
        assert_eq!(weighted_reward(80, 3, 6), Ok(0));
        assert_eq!(weighted_reward(80, 5, 6), Ok(0));
    }

    #[test]
    fn test_weighted_reward_sole_winner() {
        assert_eq!(weighted_reward(80, 6, 6), Ok(56));
        assert_eq!(weighted_reward(160_000_000, 1, 1), Ok(112_000_000));
    }

    #[test]
    fn test_weighted_reward_zero_weight_winner() {
        assert_eq!(weighted_reward(80, 0, 4), Ok(0));
    }

    #[test]
    fn test_weighted_reward_rejects_bad_input() {
        assert_eq!(weighted_reward(80, 1, 0), Err(Error::ZeroWeight));
        assert_eq!(weighted_reward(-5, 1, 1), Err(Error::InvalidAmount));
        assert_eq!(weighted_reward(i128::MAX, 1, 1), Err(Error::Overflow));
    }
}
