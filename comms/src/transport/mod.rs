/// Player side of the line transport: writes commands, reads the room's events
#[cfg(feature = "client")]
pub mod client;
#[cfg(any(feature = "client", feature = "server"))]
mod common;
/// Server side of the line transport for a single player connection: reads commands, writes events
#[cfg(feature = "server")]
pub mod server;

#[cfg(any(feature = "client", feature = "server"))]
pub use self::common::{ReadError, MAX_LINE_LENGTH};
