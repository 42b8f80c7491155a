use soroban_sdk::{contracttype, Address, Bytes, Env, String, Vec};

/// Room lifecycle: Waiting → Gaming → Answering → Voting → Gaming … → Finished.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RoomStatus {
    /// Players are joining and confirming readiness.
    Waiting = 0,
    /// Between rounds; the host may ask the next question.
    Gaming = 1,
    /// A question is open and players submit answers.
    Answering = 2,
    /// Answers are closed and players vote for the best one.
    Voting = 3,
    /// Terminal. Rewards have been distributed.
    Finished = 4,
}

/// Contract-level configuration, supplied once at `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameConfig {
    /// Ledger contract holding the pooled stake balance.
    pub ledger: Address,
    /// Registry contract that owns the question assets.
    pub question_registry: Address,
    pub create_room_stake: i128,
    pub join_room_stake: i128,
    pub send_answer_stake: i128,
}

/// Question record as exposed by the registry's `properties` call.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuestionProperties {
    pub owner: Address,
    pub question: String,
    pub source_link: String,
    pub prev_owners: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    pub wallet: Address,
    pub rounds_won: u32,
    pub is_ready: bool,
    pub is_voted_to_finish: bool,
    /// Recomputed on every `end_question` once two rounds exist.
    pub is_active: bool,
}

impl Player {
    pub fn new(wallet: Address) -> Self {
        Player {
            wallet,
            rounds_won: 0,
            is_ready: false,
            is_voted_to_finish: false,
            is_active: true,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Answer {
    pub author: Address,
    pub content: String,
    /// Distinct voters; never contains `author`.
    pub votes: Vec<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Round {
    /// Registry id of the question; unique across the rounds of a room.
    pub question_id: Bytes,
    /// Snapshot of the question text taken when the round was opened.
    pub question: String,
    pub answers: Vec<Answer>,
}

impl Round {
    pub fn has_answered(&self, wallet: &Address) -> bool {
        self.answers.iter().any(|answer| answer.author == *wallet)
    }
}

/// Aggregate root for one game session, stored as a single entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Room {
    pub id: u64,
    /// Creator of the room. Never one of `players`.
    pub host: Address,
    pub status: RoomStatus,
    pub game_prize_pool: i128,
    pub round_prize_pool: i128,
    pub round_winners_count: u32,
    pub game_winners_count: u32,
    /// Join order.
    pub players: Vec<Player>,
    /// Append-only, one per asked question.
    pub rounds: Vec<Round>,
}

impl Room {
    pub fn new(
        env: &Env,
        id: u64,
        host: Address,
        game_prize_pool: i128,
        round_winners_count: u32,
        game_winners_count: u32,
    ) -> Self {
        Room {
            id,
            host,
            status: RoomStatus::Waiting,
            game_prize_pool,
            round_prize_pool: 0,
            round_winners_count,
            game_winners_count,
            players: Vec::new(env),
            rounds: Vec::new(env),
        }
    }

    pub fn player_index(&self, wallet: &Address) -> Option<u32> {
        (0..self.players.len()).find(|&i| self.players.get_unchecked(i).wallet == *wallet)
    }

    pub fn current_round(&self) -> Option<Round> {
        self.rounds.last()
    }

    /// Replace the latest round. No-op when no round has been asked.
    pub fn set_current_round(&mut self, round: Round) {
        let len = self.rounds.len();
        if len > 0 {
            self.rounds.set(len - 1, round);
        }
    }

    pub fn question_used(&self, question_id: &Bytes) -> bool {
        self.rounds
            .iter()
            .any(|round| round.question_id == *question_id)
    }

    pub fn finish_votes(&self) -> u32 {
        self.players
            .iter()
            .filter(|player| player.is_voted_to_finish)
            .count() as u32
    }

    pub fn everyone_voted_to_finish(&self) -> bool {
        !self.players.is_empty() && self.finish_votes() == self.players.len()
    }

    /// Mark each player active iff they answered in either of the last two
    /// rounds. Leaves activity untouched while fewer than two rounds exist.
    pub fn refresh_activity(&mut self) {
        let len = self.rounds.len();
        if len < 2 {
            return;
        }
        let previous = self.rounds.get_unchecked(len - 2);
        let current = self.rounds.get_unchecked(len - 1);

        for i in 0..self.players.len() {
            let mut player = self.players.get_unchecked(i);
            player.is_active =
                previous.has_answered(&player.wallet) || current.has_answered(&player.wallet);
            self.players.set(i, player);
        }
    }
}
