/// Set of commands which the server can receive and process
pub mod command;
/// Set of events the server sends, either broadcast to the room or as a reply to one connection
pub mod event;
/// Implementation of event and command transportation over TCP Streams.
/// Requires 'server' or 'client' features to be enabled and will bring in tokio dependency alongside with other dependencies
pub mod transport;
