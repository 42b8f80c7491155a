use soroban_sdk::{
    contract, contractimpl, contracttype, testutils::Address as _, Address, Bytes, Env, String,
};

use stellarcade_shared::{CREATE_ROOM_STAKE, JOIN_ROOM_STAKE, ONE_GAS, SEND_ANSWER_STAKE};
use stellarcade_trivia_room::{
    Error, GameConfig, QuestionProperties, RoomStatus, TriviaRoom, TriviaRoomClient,
};

#[contracttype]
#[derive(Clone)]
enum Key {
    Balance(Address),
    Pool,
}

/// Pooled-balance ledger without any failure injection.
#[contract]
struct Ledger;

#[contractimpl]
impl Ledger {
    pub fn mint(env: Env, wallet: Address, amount: i128) {
        let balance = Self::balance(env.clone(), wallet.clone());
        env.storage()
            .instance()
            .set(&Key::Balance(wallet), &(balance + amount));
    }

    pub fn balance(env: Env, wallet: Address) -> i128 {
        env.storage()
            .instance()
            .get(&Key::Balance(wallet))
            .unwrap_or(0)
    }

    pub fn pool(env: Env) -> i128 {
        env.storage().instance().get(&Key::Pool).unwrap_or(0)
    }

    pub fn deposit(env: Env, wallet: Address, amount: i128) -> bool {
        let balance = Self::balance(env.clone(), wallet.clone());
        if balance < amount {
            return false;
        }
        let pool = Self::pool(env.clone());
        env.storage()
            .instance()
            .set(&Key::Balance(wallet), &(balance - amount));
        env.storage().instance().set(&Key::Pool, &(pool + amount));
        true
    }

    pub fn reward_player(env: Env, wallet: Address, amount: i128) -> bool {
        let pool = Self::pool(env.clone());
        if pool < amount {
            return false;
        }
        let balance = Self::balance(env.clone(), wallet.clone());
        env.storage().instance().set(&Key::Pool, &(pool - amount));
        env.storage()
            .instance()
            .set(&Key::Balance(wallet), &(balance + amount));
        true
    }
}

#[contract]
struct Registry;

#[contractimpl]
impl Registry {
    pub fn mint_question(env: Env, question_id: Bytes, owner: Address, question: String) {
        let properties = QuestionProperties {
            owner,
            question,
            source_link: String::from_str(&env, "https://en.wikipedia.org/wiki/Paris"),
            prev_owners: 0,
        };
        env.storage().persistent().set(&question_id, &properties);
    }

    pub fn properties(env: Env, question_id: Bytes) -> Option<QuestionProperties> {
        env.storage().persistent().get(&question_id)
    }
}

#[test]
fn test_full_game_integration() {
    let env = Env::default();

    let admin = Address::generate(&env);
    let host = Address::generate(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);

    let ledger_id = env.register(Ledger, ());
    let ledger = LedgerClient::new(&env, &ledger_id);
    let registry_id = env.register(Registry, ());
    let registry = RegistryClient::new(&env, &registry_id);
    let trivia_id = env.register(TriviaRoom, ());
    let trivia = TriviaRoomClient::new(&env, &trivia_id);

    env.mock_all_auths();
    trivia.init(
        &admin,
        &GameConfig {
            ledger: ledger_id.clone(),
            question_registry: registry_id.clone(),
            create_room_stake: CREATE_ROOM_STAKE,
            join_room_stake: JOIN_ROOM_STAKE,
            send_answer_stake: SEND_ANSWER_STAKE,
        },
    );

    for wallet in [&host, &alice, &bob] {
        ledger.mint(wallet, &(10 * ONE_GAS));
    }

    let room_id = trivia.create_room(&host, &1, &1);
    trivia.join_room(&room_id, &alice);
    trivia.join_room(&room_id, &bob);
    trivia.confirm_readiness(&room_id, &alice);
    trivia.confirm_readiness(&room_id, &bob);
    trivia.start_game(&room_id, &host);

    let q1 = Bytes::from_array(&env, &[0x71, 0x01]);
    registry.mint_question(
        &q1,
        &host,
        &String::from_str(&env, "What is the capital of France?"),
    );
    trivia.ask_question(&room_id, &host, &q1);
    trivia.send_answer(&room_id, &alice, &String::from_str(&env, "Paris"));
    trivia.send_answer(&room_id, &bob, &String::from_str(&env, "Lyon"));
    trivia.end_question(&room_id, &host);
    trivia.vote_answer(&room_id, &bob, &0);
    trivia.vote_answer(&room_id, &alice, &1);
    // one vote each; the earlier answer wins the tie
    trivia.get_round_winner(&room_id, &host);

    let room = trivia.get_room(&room_id);
    assert_eq!(room.status, RoomStatus::Gaming);
    assert_eq!(room.round_prize_pool, 0);
    assert_eq!(room.game_prize_pool, 840_000_000);
    assert_eq!(room.players.get_unchecked(0).rounds_won, 1);
    assert_eq!(room.players.get_unchecked(1).rounds_won, 0);
    assert_eq!(ledger.balance(&alice), 812_000_000);
    assert_eq!(ledger.balance(&bob), 700_000_000);

    assert_eq!(
        trivia.try_ask_question(&room_id, &host, &q1),
        Err(Ok(Error::QuestionAlreadyUsed))
    );

    trivia.manually_finish_game(&room_id, &host);
    let room = trivia.get_room(&room_id);
    assert_eq!(room.status, RoomStatus::Finished);
    assert_eq!(room.game_prize_pool, 0);
    assert_eq!(ledger.balance(&alice), 1_400_000_000);
    // 10 GAS staked, 7 GAS paid out; the rest stays pooled
    assert_eq!(ledger.pool(), 300_000_000);
}
