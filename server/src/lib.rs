/// Settings read from the environment
pub mod config;
/// The game rules: scoring, similarity feedback, roles and the round state machine
pub mod game;
/// The single task owning the game room and routing its events to connections
pub mod gateway;
/// Bridges one player TCP connection to the gateway
pub mod session;
pub mod telemetry;

pub use self::runner::serve;

mod runner;
