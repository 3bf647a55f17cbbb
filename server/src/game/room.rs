use std::collections::{BTreeMap, HashMap};

use comms::{
    command::UserCommand,
    event::{self, Event},
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use super::{
    feedback::feedback_for,
    roster::{Roster, RosterSnapshot},
    scoring::ScoringPolicy,
    similarity::{normalize, similarity},
    user_registry::UserRegistry,
    words::WordList,
};

const WORD_OPTION_COUNT: usize = 3;

const SELECTING_EMOJIS_MESSAGE: &str = "Host is selecting emojis...";
const HOST_LEFT_MESSAGE: &str = "Host left, round abandoned";
const WORD_SAMPLING_FAILED_MESSAGE: &str = "Failed to generate new words";

/// Who should receive an outbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every connection of the room
    All,
    /// Every connection but the given one, usually the sender
    AllExcept(String),
    /// A single connection, usually a reply to the sender
    Connection(String),
    /// Every connection logged in as the given identity
    Player(String),
}

/// An event the room wants delivered, paired with its recipients
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipient: Recipient,
    pub event: Event,
}

impl Outbound {
    fn broadcast(event: Event) -> Self {
        Outbound {
            recipient: Recipient::All,
            event,
        }
    }

    fn broadcast_except(connection: &str, event: Event) -> Self {
        Outbound {
            recipient: Recipient::AllExcept(String::from(connection)),
            event,
        }
    }

    fn reply(connection: &str, event: Event) -> Self {
        Outbound {
            recipient: Recipient::Connection(String::from(connection)),
            event,
        }
    }

    fn to_player(identity: &str, event: Event) -> Self {
        Outbound {
            recipient: Recipient::Player(String::from(identity)),
            event,
        }
    }
}

/// Where the current round stands.
///
/// A won or abandoned round goes straight back to [RoundPhase::Idle].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    /// Candidate words were sent to the host, no word picked yet
    WordOffered,
    /// The host picked a word and is choosing clues
    AwaitingClues { word: String },
    /// Clues are out, guesses are accepted
    CluesRevealed { word: String, clues: Vec<String> },
}

impl RoundPhase {
    pub fn word(&self) -> Option<&str> {
        match self {
            RoundPhase::AwaitingClues { word } | RoundPhase::CluesRevealed { word, .. } => {
                Some(word)
            }
            RoundPhase::Idle | RoundPhase::WordOffered => None,
        }
    }

    pub fn clues(&self) -> &[String] {
        match self {
            RoundPhase::CluesRevealed { clues, .. } => clues,
            _ => &[],
        }
    }

    fn name(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::WordOffered => "word_offered",
            RoundPhase::AwaitingClues { .. } => "awaiting_clues",
            RoundPhase::CluesRevealed { .. } => "clues_revealed",
        }
    }
}

/// [GameRoom] is the whole state of the single game room and the rules that move it forward.
///
/// Every command is applied to completion and answered with the list of events to deliver,
/// the room itself never touches a connection.
#[derive(Debug)]
pub struct GameRoom {
    words: WordList,
    scoring: ScoringPolicy,
    rng: StdRng,
    users: UserRegistry,
    roster: Roster,
    phase: RoundPhase,
    host_ready: bool,
    attempts: HashMap<String, u32>,
    scores: BTreeMap<String, u32>,
    round: u32,
}

impl GameRoom {
    pub fn new(words: WordList) -> Self {
        Self::with_rng(words, StdRng::from_entropy())
    }

    pub fn with_rng(words: WordList, rng: StdRng) -> Self {
        GameRoom {
            words,
            scoring: ScoringPolicy::default(),
            rng,
            users: UserRegistry::new(),
            roster: Roster::new(),
            phase: RoundPhase::Idle,
            host_ready: false,
            attempts: HashMap::new(),
            scores: BTreeMap::new(),
            round: 1,
        }
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase != RoundPhase::Idle
    }

    pub fn host_ready(&self) -> bool {
        self.host_ready
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn roster(&self) -> RosterSnapshot {
        self.roster.snapshot()
    }

    pub fn scores(&self) -> &BTreeMap<String, u32> {
        &self.scores
    }

    pub fn attempts_of(&self, identity: &str) -> u32 {
        self.attempts.get(identity).copied().unwrap_or(0)
    }

    pub fn connections_of(&self, identity: &str) -> Vec<String> {
        self.users.connections_of(identity)
    }

    /// Apply a command sent by the given connection
    pub fn handle(&mut self, connection: &str, command: UserCommand) -> Vec<Outbound> {
        match command {
            UserCommand::Login(cmd) => self.login(connection, &cmd.username),
            UserCommand::BecomeHost(cmd) => self.become_host(connection, &cmd.username),
            UserCommand::StartGame(_) => self.start_game(connection),
            UserCommand::SelectWord(cmd) => self.select_word(connection, &cmd.word),
            UserCommand::SetEmojis(cmd) => self.reveal_clues(connection, cmd.emojis, false),
            UserCommand::HostReady(cmd) => self.reveal_clues(connection, cmd.emojis, true),
            UserCommand::MakeGuess(cmd) => self.make_guess(connection, &cmd.guess),
            UserCommand::PlayAgain(_) => self.play_again(),
            UserCommand::RequestNewWords(_) => self.request_new_words(connection),
            UserCommand::Quit(_) => self.disconnect(connection),
        }
    }

    /// The connection is gone, its identity leaves the roster once no other connection holds it
    pub fn disconnect(&mut self, connection: &str) -> Vec<Outbound> {
        let mut outbound = Vec::new();

        if self.release(connection, &mut outbound) {
            outbound.push(self.players_update());
        }

        outbound
    }

    fn login(&mut self, connection: &str, username: &str) -> Vec<Outbound> {
        let username = username.trim();
        if username.is_empty() {
            debug!(connection, "ignoring login with a blank name");
            return Vec::new();
        }

        let mut outbound = Vec::new();

        match self.users.identity_of(connection).map(String::from) {
            Some(current) if current == username => {}
            Some(_) => {
                self.release(connection, &mut outbound);
                self.users.bind(connection, username);
            }
            None => {
                self.users.bind(connection, username);
            }
        }

        self.roster.register(username);
        info!(connection, identity = username, "player logged in");

        outbound.push(self.players_update());

        outbound
    }

    fn become_host(&mut self, connection: &str, username: &str) -> Vec<Outbound> {
        let username = username.trim();
        if username.is_empty() {
            return Vec::new();
        }

        let bound = self.users.identity_of(connection).map(String::from);
        if bound.as_deref().is_some_and(|current| current != username) {
            debug!(connection, identity = username, "cannot claim host for another identity");
            return Vec::new();
        }
        if self.roster.host().is_some() {
            debug!(connection, identity = username, "host seat is already taken");
            return Vec::new();
        }

        if bound.is_none() {
            self.users.bind(connection, username);
        }
        self.roster.promote_to_host(username);
        info!(connection, identity = username, "player became host");

        vec![self.players_update()]
    }

    // Starting without a host, without guessers or during a round is silently ignored
    fn start_game(&mut self, connection: &str) -> Vec<Outbound> {
        let Some(host) = self.roster.host().map(String::from) else {
            debug!(connection, "cannot start a round without a host");
            return Vec::new();
        };
        if !self.roster.has_guessers() || self.phase != RoundPhase::Idle {
            debug!(connection, phase = self.phase.name(), "round cannot start now");
            return Vec::new();
        }

        let words = match self.words.sample(&mut self.rng, WORD_OPTION_COUNT) {
            Ok(words) => words,
            Err(e) => {
                warn!(connection, error = %e, "could not sample word options");
                return vec![Outbound::reply(
                    connection,
                    Event::error(WORD_SAMPLING_FAILED_MESSAGE),
                )];
            }
        };

        self.host_ready = false;
        self.phase = RoundPhase::WordOffered;
        info!(round = self.round, host = %host, "round started");

        vec![
            Outbound::to_player(&host, Event::WordOptions(event::WordOptionsEvent { words })),
            Outbound::broadcast(Event::GameStarted(event::GameStartedEvent {
                round: self.round,
            })),
        ]
    }

    fn select_word(&mut self, connection: &str, word: &str) -> Vec<Outbound> {
        if !self.is_host_connection(connection) || self.phase != RoundPhase::WordOffered {
            debug!(connection, phase = self.phase.name(), "ignoring word selection");
            return Vec::new();
        }

        let Some(word) = self.words.find(word).map(String::from) else {
            debug!(connection, "selected word is not in the word list");
            return Vec::new();
        };

        info!(connection, "host selected the word");
        self.phase = RoundPhase::AwaitingClues { word };

        vec![Outbound::broadcast_except(
            connection,
            Event::GameMessage(event::GameMessageEvent {
                content: String::from(SELECTING_EMOJIS_MESSAGE),
            }),
        )]
    }

    // set_emojis and host_ready share the transition, host_ready additionally confirms the clues
    fn reveal_clues(&mut self, connection: &str, clues: Vec<String>, confirm: bool) -> Vec<Outbound> {
        if !self.is_host_connection(connection) {
            debug!(connection, "only the host can reveal clues");
            return Vec::new();
        }

        let Some(word) = self.phase.word().map(String::from) else {
            debug!(connection, phase = self.phase.name(), "no word to reveal clues for");
            return Vec::new();
        };

        self.phase = RoundPhase::CluesRevealed {
            word,
            clues: clues.clone(),
        };

        if confirm {
            self.host_ready = true;
            info!(clues = clues.len(), "host confirmed clues");

            vec![Outbound::broadcast(Event::HostConfirmed(
                event::HostConfirmedEvent { emojis: clues },
            ))]
        } else {
            info!(clues = clues.len(), "clues revealed");

            vec![Outbound::broadcast(Event::GameState(event::GameStateEvent {
                emojis: clues,
            }))]
        }
    }

    fn make_guess(&mut self, connection: &str, guess: &str) -> Vec<Outbound> {
        let Some(identity) = self.users.identity_of(connection).map(String::from) else {
            debug!(connection, "ignoring guess from a connection without a name");
            return Vec::new();
        };
        if !self.roster.is_guesser(&identity) {
            debug!(connection, identity = %identity, "only guessers can guess");
            return Vec::new();
        }
        let RoundPhase::CluesRevealed { word, .. } = &self.phase else {
            debug!(connection, phase = self.phase.name(), "guesses are not accepted now");
            return Vec::new();
        };

        let word = word.clone();
        let normalized_guess = normalize(guess);
        let normalized_word = normalize(&word);

        if normalized_guess == normalized_word {
            let points = self.scoring.points(self.attempts_of(&identity));
            let score = self.scores.entry(identity.clone()).or_insert(0);
            *score = score.saturating_add(points);

            info!(winner = %identity, points, round = self.round, "word guessed");
            self.round += 1;
            self.end_round();

            return vec![Outbound::broadcast(Event::CorrectGuess(
                event::CorrectGuessEvent {
                    winner: identity,
                    word,
                    new_scores: self.scores.clone(),
                },
            ))];
        }

        *self.attempts.entry(identity.clone()).or_insert(0) += 1;
        let similarity = similarity(&normalized_guess, &normalized_word);
        debug!(identity = %identity, similarity, "wrong guess");

        vec![Outbound::reply(
            connection,
            Event::GuessResponse(event::GuessResponseEvent {
                message: String::from(feedback_for(similarity)),
                similarity,
            }),
        )]
    }

    fn play_again(&mut self) -> Vec<Outbound> {
        self.scores.clear();
        self.round = 1;
        self.roster.clear();
        self.end_round();
        info!("game reset");

        vec![Outbound::broadcast(Event::ResetGame(event::ResetGameEvent))]
    }

    fn request_new_words(&mut self, connection: &str) -> Vec<Outbound> {
        match self.words.sample(&mut self.rng, WORD_OPTION_COUNT) {
            Ok(words) => vec![Outbound::reply(
                connection,
                Event::WordOptions(event::WordOptionsEvent { words }),
            )],
            Err(e) => {
                warn!(connection, error = %e, "could not sample new words");
                vec![Outbound::reply(
                    connection,
                    Event::error(WORD_SAMPLING_FAILED_MESSAGE),
                )]
            }
        }
    }

    /// Unbinds a connection. Returns true if the roster changed, pushing any round abandon notice to `outbound`.
    fn release(&mut self, connection: &str, outbound: &mut Vec<Outbound>) -> bool {
        let Some((identity, was_last)) = self.users.unbind(connection) else {
            return false;
        };
        if !was_last {
            return false;
        }

        let was_host = self.roster.is_host(&identity);
        let changed = self.roster.unregister(&identity);
        info!(connection, identity = %identity, was_host, "player left");

        if was_host && self.phase != RoundPhase::Idle {
            warn!(phase = self.phase.name(), "host left mid-round, abandoning it");
            self.end_round();
            outbound.push(Outbound::broadcast(Event::GameMessage(
                event::GameMessageEvent {
                    content: String::from(HOST_LEFT_MESSAGE),
                },
            )));
        }

        changed
    }

    fn end_round(&mut self) {
        self.phase = RoundPhase::Idle;
        self.host_ready = false;
        self.attempts.clear();
    }

    fn is_host_connection(&self, connection: &str) -> bool {
        self.users
            .identity_of(connection)
            .is_some_and(|identity| self.roster.is_host(identity))
    }

    fn players_update(&self) -> Outbound {
        let RosterSnapshot { host, guessers } = self.roster.snapshot();

        Outbound::broadcast(Event::UpdatePlayers(event::UpdatePlayersEvent {
            host,
            guessers,
        }))
    }
}
