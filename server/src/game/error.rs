use thiserror::Error;

/// Failures the game core can run into on its own.
/// Unmet preconditions (wrong phase, wrong player) are not errors, they are ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot sample {requested} distinct words out of {available}")]
    NotEnoughWords { requested: usize, available: usize },

    #[error("invalid word list: {0}")]
    InvalidWordList(String),
}
