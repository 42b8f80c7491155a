//! Client interfaces for the contracts a room talks to.

use soroban_sdk::{contractclient, Address, Bytes, Env};

use crate::types::QuestionProperties;

/// Custodian of staked funds. Stakes are pooled here and prizes are paid
/// out of the pooled balance.
#[contractclient(name = "LedgerClient")]
pub trait Ledger {
    /// Move `amount` from `wallet` into the pool. `false` when the wallet
    /// cannot cover it.
    fn deposit(env: Env, wallet: Address, amount: i128) -> bool;

    /// Move `amount` from the pool to `wallet`.
    fn reward_player(env: Env, wallet: Address, amount: i128) -> bool;
}

/// Owner of the question assets a host can ask.
#[contractclient(name = "QuestionRegistryClient")]
pub trait QuestionRegistry {
    fn properties(env: Env, question_id: Bytes) -> Option<QuestionProperties>;
}
