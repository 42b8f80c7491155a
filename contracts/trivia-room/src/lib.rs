//! Stellarcade Trivia Room Contract
//!
//! Multiplayer trivia with staked entry. A host opens a room, players join
//! and ready up, and the host runs question rounds drawn from the question
//! registry. Players stake on every answer, vote for each other's answers,
//! and the best-voted answers split the round pool. When the game ends the
//! game pool is split among the players who won the most rounds.
//!
//! ## Game Flow
//! 1. Host calls `create_room` (stakes `create_room_stake`) → `Waiting`.
//! 2. Players `join_room` (stake `join_room_stake`) and `confirm_readiness`.
//! 3. Host calls `start_game` once everyone is ready → `Gaming`.
//! 4. Host `ask_question` with an owned, unused question → `Answering`.
//! 5. Players `send_answer` (stake `send_answer_stake` each).
//! 6. Host `end_question` → `Voting`; players `vote_answer`.
//! 7. Host `get_round_winner` pays the round winners → back to `Gaming`.
//! 8. The game ends through `manually_finish_game` or a unanimous
//!    `vote_to_finish_game` → `Finished`, paying the game winners.
//!
//! ## Payout
//! 20% of each round pool is moved into the game pool. Each winner is paid
//! `pool * (weight / total_weight) * 70%`, with the weight ratio computed as
//! an integer division first: only a winner holding the whole weight is paid
//! a non-zero amount. Unpaid funds remain in the ledger pool for the host.
//!
//! ## Atomicity
//! Each entry point loads the room, mutates a local copy and saves it as its
//! last step. Any returned error leaves the stored room untouched.
#![no_std]
#![allow(unexpected_cfgs)]

mod interfaces;
mod rewards;
mod selection;
mod storage;
mod types;

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, Address, Bytes, Env, String, Vec,
};

pub use interfaces::{Ledger, LedgerClient, QuestionRegistry, QuestionRegistryClient};
pub use selection::{rank_by_score, select_winners};
pub use storage::{DataKey, PERSISTENT_BUMP_LEDGERS};
pub use types::{Answer, GameConfig, Player, QuestionProperties, Room, RoomStatus, Round};

use storage::{
    allocate_room_id, ensure_not_paused, get_config, load_room, require_admin,
    require_initialized, save_room,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Bounds every per-room loop.
pub const MAX_PLAYERS_PER_ROOM: u32 = 100;

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAuthorized = 3,
    InvalidConfig = 4,
    ContractPaused = 5,
    AlreadyPaused = 6,
    NotPaused = 7,
    InvalidWinnersCount = 8,
    RoomNotFound = 9,
    InvalidState = 10,
    HostCannotPlay = 11,
    DuplicatePlayer = 12,
    RoomFull = 13,
    NotAPlayer = 14,
    PlayerInactive = 15,
    AlreadyReady = 16,
    NotEnoughPlayers = 17,
    PlayersNotReady = 18,
    QuestionNotFound = 19,
    NotQuestionOwner = 20,
    QuestionAlreadyUsed = 21,
    EmptyAnswer = 22,
    AlreadyAnswered = 23,
    InvalidAnswerIndex = 24,
    SelfVote = 25,
    AlreadyVoted = 26,
    NoAnswers = 27,
    AlreadyVotedToFinish = 28,
    StakeDepositFailed = 29,
    InvalidAmount = 30,
    Overflow = 31,
}

impl Error {
    /// Unrecoverable conditions that abort the operation, as opposed to a
    /// rejected precondition (wrong phase, wrong caller, duplicate action).
    pub const fn is_fatal(self) -> bool {
        matches!(
            self,
            Error::NotInitialized
                | Error::RoomNotFound
                | Error::StakeDepositFailed
                | Error::InvalidAmount
                | Error::Overflow
        )
    }
}

impl From<stellarcade_shared::Error> for Error {
    fn from(err: stellarcade_shared::Error) -> Self {
        match err {
            stellarcade_shared::Error::Overflow => Error::Overflow,
            stellarcade_shared::Error::InvalidAmount | stellarcade_shared::Error::ZeroWeight => {
                Error::InvalidAmount
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[contractevent]
pub struct Initialized {
    #[topic]
    pub admin: Address,
    pub ledger: Address,
    pub question_registry: Address,
}

#[contractevent]
pub struct Paused {
    pub admin: Address,
}

#[contractevent]
pub struct Unpaused {
    pub admin: Address,
}

#[contractevent]
pub struct RoomCreated {
    #[topic]
    pub room_id: u64,
    pub host: Address,
    pub round_winners_count: u32,
    pub game_winners_count: u32,
    pub game_prize_pool: i128,
}

#[contractevent]
pub struct PlayerJoined {
    #[topic]
    pub room_id: u64,
    #[topic]
    pub player: Address,
    pub player_count: u32,
    pub game_prize_pool: i128,
}

#[contractevent]
pub struct PlayerReady {
    #[topic]
    pub room_id: u64,
    #[topic]
    pub player: Address,
}

#[contractevent]
pub struct GameStarted {
    #[topic]
    pub room_id: u64,
    pub player_count: u32,
}

#[contractevent]
pub struct RoundQuestion {
    #[topic]
    pub room_id: u64,
    pub round: u32,
    pub question: String,
}

#[contractevent]
pub struct AnswerSubmitted {
    #[topic]
    pub room_id: u64,
    #[topic]
    pub player: Address,
    pub answer_index: u32,
    pub round_prize_pool: i128,
}

/// Answers of the closed round, in index order for `vote_answer`.
#[contractevent]
pub struct RoundAnswers {
    #[topic]
    pub room_id: u64,
    pub answers: Vec<Answer>,
}

#[contractevent]
pub struct AnswerVoted {
    #[topic]
    pub room_id: u64,
    #[topic]
    pub voter: Address,
    pub answer_index: u32,
}

#[contractevent]
pub struct RoundWinners {
    #[topic]
    pub room_id: u64,
    pub winners: Vec<Address>,
    pub votes: Vec<u32>,
}

#[contractevent]
pub struct RewardResult {
    #[topic]
    pub room_id: u64,
    #[topic]
    pub player: Address,
    pub amount: i128,
    pub rewarded: bool,
}

#[contractevent]
pub struct FinishVote {
    #[topic]
    pub room_id: u64,
    pub voted: u32,
    pub needed: u32,
}

#[contractevent]
pub struct GameFinished {
    #[topic]
    pub room_id: u64,
    pub winners: Vec<Address>,
    pub scores: Vec<u32>,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct TriviaRoom;

#[contractimpl]
impl TriviaRoom {
    // -----------------------------------------------------------------------
    // Admin
    // -----------------------------------------------------------------------

    /// Initialize the contract. May only be called once.
    ///
    /// `config` is validated here and never re-read from the caller: stakes
    /// must be positive and the ledger, registry and this contract must be
    /// three distinct addresses.
    pub fn init(env: Env, admin: Address, config: GameConfig) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();
        validate_config(&env, &config)?;

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Paused, &false);
        env.storage().instance().set(&DataKey::NextRoomId, &0u64);

        Initialized {
            admin,
            ledger: config.ledger,
            question_registry: config.question_registry,
        }
        .publish(&env);

        Ok(())
    }

    /// Block every room operation. Only callable by admin.
    pub fn pause(env: Env, admin: Address) -> Result<(), Error> {
        require_admin(&env, &admin)?;
        if storage::is_paused(&env) {
            return Err(Error::AlreadyPaused);
        }

        env.storage().instance().set(&DataKey::Paused, &true);
        Paused { admin }.publish(&env);
        Ok(())
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), Error> {
        require_admin(&env, &admin)?;
        if !storage::is_paused(&env) {
            return Err(Error::NotPaused);
        }

        env.storage().instance().set(&DataKey::Paused, &false);
        Unpaused { admin }.publish(&env);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    // -----------------------------------------------------------------------
    // Lobby
    // -----------------------------------------------------------------------

    /// Open a room hosted by `host`, who stakes `create_room_stake`.
    /// Returns the new room id.
    pub fn create_room(
        env: Env,
        host: Address,
        round_winners_count: u32,
        game_winners_count: u32,
    ) -> Result<u64, Error> {
        require_initialized(&env)?;
        ensure_not_paused(&env)?;
        host.require_auth();

        if round_winners_count == 0 || game_winners_count == 0 {
            return Err(Error::InvalidWinnersCount);
        }

        let config = get_config(&env)?;
        collect_stake(&env, &config, &host, config.create_room_stake)?;

        let room_id = allocate_room_id(&env)?;
        let room = Room::new(
            &env,
            room_id,
            host.clone(),
            config.create_room_stake,
            round_winners_count,
            game_winners_count,
        );
        save_room(&env, &room);

        RoomCreated {
            room_id,
            host,
            round_winners_count,
            game_winners_count,
            game_prize_pool: room.game_prize_pool,
        }
        .publish(&env);

        Ok(room_id)
    }

    pub fn join_room(env: Env, room_id: u64, player: Address) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &player)?;

        if room.status != RoomStatus::Waiting {
            return Err(Error::InvalidState);
        }
        if room.host == player {
            return Err(Error::HostCannotPlay);
        }
        if room.player_index(&player).is_some() {
            return Err(Error::DuplicatePlayer);
        }
        if room.players.len() >= MAX_PLAYERS_PER_ROOM {
            return Err(Error::RoomFull);
        }

        let config = get_config(&env)?;
        collect_stake(&env, &config, &player, config.join_room_stake)?;

        room.game_prize_pool = room
            .game_prize_pool
            .checked_add(config.join_room_stake)
            .ok_or(Error::Overflow)?;
        room.players.push_back(Player::new(player.clone()));
        save_room(&env, &room);

        PlayerJoined {
            room_id,
            player,
            player_count: room.players.len(),
            game_prize_pool: room.game_prize_pool,
        }
        .publish(&env);

        Ok(())
    }

    pub fn confirm_readiness(env: Env, room_id: u64, player: Address) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &player)?;

        if room.status != RoomStatus::Waiting {
            return Err(Error::InvalidState);
        }
        let idx = room.player_index(&player).ok_or(Error::NotAPlayer)?;
        let mut entry = room.players.get_unchecked(idx);
        if !entry.is_active {
            return Err(Error::PlayerInactive);
        }
        if entry.is_ready {
            return Err(Error::AlreadyReady);
        }

        entry.is_ready = true;
        room.players.set(idx, entry);
        save_room(&env, &room);

        PlayerReady { room_id, player }.publish(&env);

        Ok(())
    }

    /// Requires more players than round winners, all of them ready.
    pub fn start_game(env: Env, room_id: u64, host: Address) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &host)?;
        require_host(&room, &host)?;

        if room.status != RoomStatus::Waiting {
            return Err(Error::InvalidState);
        }
        if room.players.len() <= room.round_winners_count {
            return Err(Error::NotEnoughPlayers);
        }
        if room.players.iter().any(|p| !p.is_ready) {
            return Err(Error::PlayersNotReady);
        }

        room.status = RoomStatus::Gaming;
        save_room(&env, &room);

        GameStarted {
            room_id,
            player_count: room.players.len(),
        }
        .publish(&env);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Rounds
    // -----------------------------------------------------------------------

    /// Open a round with a registry question the host owns and has not
    /// asked in this room before. The question text is copied into the round.
    pub fn ask_question(
        env: Env,
        room_id: u64,
        host: Address,
        question_id: Bytes,
    ) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &host)?;
        require_host(&room, &host)?;

        if room.status != RoomStatus::Gaming {
            return Err(Error::InvalidState);
        }
        if room.question_used(&question_id) {
            return Err(Error::QuestionAlreadyUsed);
        }

        let config = get_config(&env)?;
        let registry = QuestionRegistryClient::new(&env, &config.question_registry);
        let properties = match registry.try_properties(&question_id) {
            Ok(Ok(Some(properties))) => properties,
            _ => return Err(Error::QuestionNotFound),
        };
        if properties.owner != host {
            return Err(Error::NotQuestionOwner);
        }

        room.rounds.push_back(Round {
            question_id,
            question: properties.question.clone(),
            answers: Vec::new(&env),
        });
        room.status = RoomStatus::Answering;
        save_room(&env, &room);

        RoundQuestion {
            room_id,
            round: room.rounds.len(),
            question: properties.question,
        }
        .publish(&env);

        Ok(())
    }

    /// Submit one answer for the open round, staking `send_answer_stake`.
    pub fn send_answer(
        env: Env,
        room_id: u64,
        player: Address,
        content: String,
    ) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &player)?;

        if room.status != RoomStatus::Answering {
            return Err(Error::InvalidState);
        }
        require_active_player(&room, &player)?;

        let mut round = room.current_round().ok_or(Error::InvalidState)?;
        if round.has_answered(&player) {
            return Err(Error::AlreadyAnswered);
        }
        if content.is_empty() {
            return Err(Error::EmptyAnswer);
        }

        let config = get_config(&env)?;
        collect_stake(&env, &config, &player, config.send_answer_stake)?;

        room.round_prize_pool = room
            .round_prize_pool
            .checked_add(config.send_answer_stake)
            .ok_or(Error::Overflow)?;
        let answer_index = round.answers.len();
        round.answers.push_back(Answer {
            author: player.clone(),
            content,
            votes: Vec::new(&env),
        });
        room.set_current_round(round);
        save_room(&env, &room);

        AnswerSubmitted {
            room_id,
            player,
            answer_index,
            round_prize_pool: room.round_prize_pool,
        }
        .publish(&env);

        Ok(())
    }

    /// Close answering, refresh player activity and broadcast the answers.
    pub fn end_question(env: Env, room_id: u64, host: Address) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &host)?;
        require_host(&room, &host)?;

        if room.status != RoomStatus::Answering {
            return Err(Error::InvalidState);
        }

        room.status = RoomStatus::Voting;
        room.refresh_activity();
        let round = room.current_round().ok_or(Error::InvalidState)?;
        save_room(&env, &room);

        RoundAnswers {
            room_id,
            answers: round.answers,
        }
        .publish(&env);

        Ok(())
    }

    /// Vote for the answer at `answer_index` of the current round. A voter
    /// may back several answers but each only once, and never their own.
    pub fn vote_answer(
        env: Env,
        room_id: u64,
        voter: Address,
        answer_index: u32,
    ) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &voter)?;

        if room.status != RoomStatus::Voting {
            return Err(Error::InvalidState);
        }
        require_active_player(&room, &voter)?;

        let mut round = room.current_round().ok_or(Error::InvalidState)?;
        let mut answer = round
            .answers
            .get(answer_index)
            .ok_or(Error::InvalidAnswerIndex)?;
        if answer.author == voter {
            return Err(Error::SelfVote);
        }
        if answer.votes.contains(&voter) {
            return Err(Error::AlreadyVoted);
        }

        answer.votes.push_back(voter.clone());
        round.answers.set(answer_index, answer);
        room.set_current_round(round);
        save_room(&env, &room);

        AnswerVoted {
            room_id,
            voter,
            answer_index,
        }
        .publish(&env);

        Ok(())
    }

    /// Select and pay the round winners, then return the room to `Gaming`.
    /// If every player has voted to finish meanwhile, the game ends here.
    pub fn get_round_winner(env: Env, room_id: u64, host: Address) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &host)?;
        require_host(&room, &host)?;

        if room.status != RoomStatus::Voting {
            return Err(Error::InvalidState);
        }
        let round = room.current_round().ok_or(Error::InvalidState)?;
        if round.answers.is_empty() {
            return Err(Error::NoAnswers);
        }

        let mut scores: Vec<u32> = Vec::new(&env);
        for answer in round.answers.iter() {
            scores.push_back(answer.votes.len());
        }

        let mut winners: Vec<Answer> = Vec::new(&env);
        let mut wallets: Vec<Address> = Vec::new(&env);
        let mut votes: Vec<u32> = Vec::new(&env);
        for pick in select_winners(&env, &scores, room.round_winners_count).iter() {
            let answer = round.answers.get_unchecked(pick);
            if let Some(idx) = room.player_index(&answer.author) {
                let mut entry = room.players.get_unchecked(idx);
                entry.rounds_won = entry.rounds_won.checked_add(1).ok_or(Error::Overflow)?;
                room.players.set(idx, entry);
            }
            wallets.push_back(answer.author.clone());
            votes.push_back(answer.votes.len());
            winners.push_back(answer);
        }

        RoundWinners {
            room_id,
            winners: wallets,
            votes,
        }
        .publish(&env);

        let config = get_config(&env)?;
        rewards::distribute_round_reward(&env, &config.ledger, &mut room, &winners)?;
        room.status = RoomStatus::Gaming;

        if room.everyone_voted_to_finish() {
            finish_game(&env, &config, &mut room)?;
        }
        save_room(&env, &room);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Finishing
    // -----------------------------------------------------------------------

    /// Record `player`'s vote to end the game. Returns `true` when this vote
    /// finished the game. A unanimous vote cast mid-round takes effect when
    /// the round is settled by `get_round_winner`.
    pub fn vote_to_finish_game(env: Env, room_id: u64, player: Address) -> Result<bool, Error> {
        let mut room = open_room(&env, room_id, &player)?;

        if room.status == RoomStatus::Finished {
            return Err(Error::InvalidState);
        }
        if room.host == player {
            return Err(Error::HostCannotPlay);
        }
        let idx = room.player_index(&player).ok_or(Error::NotAPlayer)?;
        let mut entry = room.players.get_unchecked(idx);
        if entry.is_voted_to_finish {
            return Err(Error::AlreadyVotedToFinish);
        }
        entry.is_voted_to_finish = true;
        room.players.set(idx, entry);

        let voted = room.finish_votes();
        FinishVote {
            room_id,
            voted,
            needed: room.players.len(),
        }
        .publish(&env);

        let finished = room.everyone_voted_to_finish()
            && matches!(room.status, RoomStatus::Waiting | RoomStatus::Gaming);
        if finished {
            let config = get_config(&env)?;
            finish_game(&env, &config, &mut room)?;
        }
        save_room(&env, &room);

        Ok(finished)
    }

    pub fn manually_finish_game(env: Env, room_id: u64, host: Address) -> Result<(), Error> {
        let mut room = open_room(&env, room_id, &host)?;
        require_host(&room, &host)?;

        if room.status != RoomStatus::Gaming {
            return Err(Error::InvalidState);
        }

        let config = get_config(&env)?;
        finish_game(&env, &config, &mut room)?;
        save_room(&env, &room);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn get_room(env: Env, room_id: u64) -> Result<Room, Error> {
        require_initialized(&env)?;
        load_room(&env, room_id)
    }

    pub fn get_config(env: Env) -> Result<GameConfig, Error> {
        get_config(&env)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_config(env: &Env, config: &GameConfig) -> Result<(), Error> {
    if config.create_room_stake <= 0
        || config.join_room_stake <= 0
        || config.send_answer_stake <= 0
    {
        return Err(Error::InvalidConfig);
    }

    let this = env.current_contract_address();
    if config.ledger == config.question_registry
        || config.ledger == this
        || config.question_registry == this
    {
        return Err(Error::InvalidConfig);
    }

    Ok(())
}

/// Common prologue of every room operation: contract live, caller signed,
/// room loaded.
fn open_room(env: &Env, room_id: u64, caller: &Address) -> Result<Room, Error> {
    require_initialized(env)?;
    ensure_not_paused(env)?;
    caller.require_auth();
    load_room(env, room_id)
}

fn require_host(room: &Room, caller: &Address) -> Result<(), Error> {
    if room.host != *caller {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

fn require_active_player(room: &Room, wallet: &Address) -> Result<(), Error> {
    let idx = room.player_index(wallet).ok_or(Error::NotAPlayer)?;
    if !room.players.get_unchecked(idx).is_active {
        return Err(Error::PlayerInactive);
    }
    Ok(())
}

fn collect_stake(
    env: &Env,
    config: &GameConfig,
    wallet: &Address,
    amount: i128,
) -> Result<(), Error> {
    if !LedgerClient::new(env, &config.ledger).deposit(wallet, &amount) {
        return Err(Error::StakeDepositFailed);
    }
    Ok(())
}

/// Select the game winners by rounds won, pay them and close the room.
fn finish_game(env: &Env, config: &GameConfig, room: &mut Room) -> Result<(), Error> {
    let mut scores: Vec<u32> = Vec::new(env);
    for player in room.players.iter() {
        scores.push_back(player.rounds_won);
    }

    let mut winners: Vec<Player> = Vec::new(env);
    let mut wallets: Vec<Address> = Vec::new(env);
    let mut won: Vec<u32> = Vec::new(env);
    for pick in select_winners(env, &scores, room.game_winners_count).iter() {
        let player = room.players.get_unchecked(pick);
        wallets.push_back(player.wallet.clone());
        won.push_back(player.rounds_won);
        winners.push_back(player);
    }

    GameFinished {
        room_id: room.id,
        winners: wallets,
        scores: won,
    }
    .publish(env);

    rewards::distribute_game_reward(env, &config.ledger, room, &winners)?;
    room.status = RoomStatus::Finished;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
