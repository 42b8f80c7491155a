//! Room store and contract configuration.
//!
//! - `instance()`: Admin, Config, Paused, NextRoomId. Small fixed-size
//!   contract config sharing one ledger entry.
//! - `persistent()`: one `Room(id)` entry per room holding the whole
//!   aggregate. Operations read it, mutate a local copy, and write it back
//!   once as their final step; there are no field-level writes.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{GameConfig, Room};
use crate::Error;

/// Persistent storage TTL in ledgers (~30 days at 5 s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // --- instance() ---
    Admin,
    Config,
    Paused,
    NextRoomId,
    // --- persistent() ---
    Room(u64),
}

pub fn load_room(env: &Env, room_id: u64) -> Result<Room, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Room(room_id))
        .ok_or(Error::RoomNotFound)
}

pub fn save_room(env: &Env, room: &Room) {
    let key = DataKey::Room(room.id);
    env.storage().persistent().set(&key, room);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

/// Ids start at 1 and are never reused.
pub fn allocate_room_id(env: &Env) -> Result<u64, Error> {
    let last: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextRoomId)
        .unwrap_or(0);
    let room_id = last.checked_add(1).ok_or(Error::Overflow)?;
    env.storage().instance().set(&DataKey::NextRoomId, &room_id);
    Ok(room_id)
}

pub fn require_initialized(env: &Env) -> Result<(), Error> {
    if !env.storage().instance().has(&DataKey::Admin) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn ensure_not_paused(env: &Env) -> Result<(), Error> {
    if is_paused(env) {
        return Err(Error::ContractPaused);
    }
    Ok(())
}

/// Verify that `caller` is the stored admin and has signed the invocation.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    let admin: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)?;
    caller.require_auth();
    if *caller != admin {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

pub fn get_config(env: &Env) -> Result<GameConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}
