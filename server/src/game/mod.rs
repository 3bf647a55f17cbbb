pub use self::error::GameError;
pub use self::room::{GameRoom, Outbound, Recipient, RoundPhase};
pub use self::roster::RosterSnapshot;
pub use self::words::WordList;

mod error;
pub mod feedback;
mod room;
mod roster;
pub mod scoring;
pub mod similarity;
mod user_registry;
mod words;
