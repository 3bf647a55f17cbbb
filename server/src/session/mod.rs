use std::sync::Arc;

use comms::{
    command::UserCommand,
    event::{self, Event},
    transport::{
        self,
        server::{CommandStream, EventWriter},
    },
};
use nanoid::nanoid;
use tokio::{net::TcpStream, sync::broadcast};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    gateway::{ConnectionHandle, GameGateway},
};

const ORIGIN_NOT_ALLOWED_MESSAGE: &str = "origin not allowed";
const MALFORMED_COMMAND_MESSAGE: &str = "could not understand the command";

/// How the command loop of a session came to an end
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// The player quit, closed the stream or the connection broke
    Left,
    /// The server is going down, the room does not need to hear about it
    Shutdown,
}

/// Given a tcp stream and the game gateway, handles the player connection
/// until the player quits, or the tcp stream is closed for some reason, or the server shuts down
///
/// Unless the server is shutting down, the room is always told the connection left,
/// even when the session ends on an error.
pub async fn handle_player_session(
    gateway: GameGateway,
    config: Arc<Config>,
    mut quit_rx: broadcast::Receiver<()>,
    stream: TcpStream,
) -> anyhow::Result<()> {
    let connection_id = nanoid!();
    // Split the tcp stream into a command stream and an event writer with better ergonomics
    let (mut commands, mut event_writer) = transport::server::split_tcp_stream(stream);

    // Register with the gateway, every event addressed to this connection arrives through the handle
    let mut handle = gateway.connect(&connection_id).await?;
    info!(connection = %connection_id, "player connected");

    let ended = pump(
        &config,
        &mut handle,
        &mut commands,
        &mut event_writer,
        &mut quit_rx,
    )
    .await;

    match ended {
        Ok(SessionEnd::Shutdown) => {
            drop(event_writer);
            debug!(connection = %connection_id, "gracefully shutting down player tcp stream");
            Ok(())
        }
        Ok(SessionEnd::Left) => {
            handle.leave().await?;
            info!(connection = %connection_id, "player disconnected");
            Ok(())
        }
        Err(e) => {
            // the runner reports the error, the room still has to forget the connection
            debug!(connection = %connection_id, "player session failed, leaving the room");
            handle.leave().await?;
            Err(e)
        }
    }
}

/// Moves commands to the room and events to the player until the session ends
async fn pump(
    config: &Config,
    handle: &mut ConnectionHandle,
    commands: &mut CommandStream,
    event_writer: &mut EventWriter,
    quit_rx: &mut broadcast::Receiver<()>,
) -> anyhow::Result<SessionEnd> {
    loop {
        tokio::select! {
            cmd = commands.next() => match cmd {
                // If the player closes the tcp stream, or sends a quit cmd
                // the room has to forget them so the others see them leave
                None | Some(Ok(UserCommand::Quit(_))) => return Ok(SessionEnd::Left),
                // A reset connection or a flood without newlines, nothing more worth reading
                Some(Err(e)) if e.is_fatal() => {
                    debug!(connection = handle.connection(), error = %e, "connection broke");
                    return Ok(SessionEnd::Left);
                }
                // Origin is a transport concern, the room never sees rejected logins
                Some(Ok(UserCommand::Login(cmd))) if !config.is_origin_allowed(cmd.origin.as_deref()) => {
                    warn!(connection = handle.connection(), origin = ?cmd.origin, "rejected login from foreign origin");
                    event_writer.write(&Event::error(ORIGIN_NOT_ALLOWED_MESSAGE)).await?;
                }
                Some(Ok(cmd)) => {
                    handle.send_command(cmd).await?;
                }
                // A broken line is answered but does not end the session
                Some(Err(e)) => {
                    debug!(connection = handle.connection(), error = %e, "malformed command");
                    event_writer.write(&Event::Error(event::ErrorEvent {
                        message: String::from(MALFORMED_COMMAND_MESSAGE),
                    })).await?;
                }
            },
            // Events routed to this connection by the gateway are sent to the player
            Ok(event) = handle.recv() => {
                event_writer.write(&event).await?;
            }
            // If the server is shutting down, we can just close the tcp streams
            // and exit the session handler without telling the room
            Ok(_) = quit_rx.recv() => return Ok(SessionEnd::Shutdown),
        }
    }
}
