use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The current host and guessers of the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePlayersEvent {
    /// The username of the host, if the seat is taken
    pub host: Option<String>,
    /// The usernames of the guessers in the order they joined
    pub guessers: Vec<String>,
}

/// Candidate words offered to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordOptionsEvent {
    pub words: Vec<String>,
}

/// A new round has started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStartedEvent {
    /// The number of the round, starting from 1
    pub round: u32,
}

/// A free-form status line meant to be shown to players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMessageEvent {
    #[serde(rename = "c")]
    pub content: String,
}

/// The clues of the active round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateEvent {
    #[serde(rename = "e")]
    pub emojis: Vec<String>,
}

/// The host confirmed the clues of the active round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfirmedEvent {
    #[serde(rename = "e")]
    pub emojis: Vec<String>,
}

/// Private feedback for a wrong guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessResponseEvent {
    pub message: String,
    /// Closeness of the guess to the secret word, in [0, 1]
    pub similarity: f64,
}

/// A guesser found the secret word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectGuessEvent {
    pub winner: String,
    pub word: String,
    /// The whole scoreboard after the points were awarded
    pub new_scores: BTreeMap<String, u32>,
}

/// The room was reset to its initial state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetGameEvent;

/// Something went wrong while processing a command of the receiving connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
/// Events that can be sent to the client
/// Some events are broadcast to the whole room, others are replies to a single connection
pub enum Event {
    UpdatePlayers(UpdatePlayersEvent),
    WordOptions(WordOptionsEvent),
    GameStarted(GameStartedEvent),
    GameMessage(GameMessageEvent),
    GameState(GameStateEvent),
    HostConfirmed(HostConfirmedEvent),
    GuessResponse(GuessResponseEvent),
    CorrectGuess(CorrectGuessEvent),
    ResetGame(ResetGameEvent),
    Error(ErrorEvent),
}

impl Event {
    /// Shorthand for an [Event::Error] with the given message
    pub fn error(message: impl Into<String>) -> Self {
        Event::Error(ErrorEvent {
            message: message.into(),
        })
    }
}
