use anyhow::Context;
use comms::{command::UserCommand, event::Event};
use tokio::sync::mpsc;

use super::GatewayMessage;

#[derive(Debug)]
/// [ConnectionHandle] is a handle that allows a single connection to
/// talk to the game room and receive the events addressed to it.
///
/// It is created when a connection registers with the [super::GameGateway].
pub struct ConnectionHandle {
    /// The connection id associated with this handle
    connection: String,
    /// The channel to use for sending commands to the gateway loop
    gateway_tx: mpsc::Sender<GatewayMessage>,
    /// Events the gateway routed to this connection
    events_rx: mpsc::Receiver<Event>,
}

impl ConnectionHandle {
    pub(super) fn new(
        connection: String,
        gateway_tx: mpsc::Sender<GatewayMessage>,
        events_rx: mpsc::Receiver<Event>,
    ) -> Self {
        ConnectionHandle {
            connection,
            gateway_tx,
            events_rx,
        }
    }

    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// Send a command to the room on behalf of this connection
    pub async fn send_command(&self, command: UserCommand) -> anyhow::Result<()> {
        self.gateway_tx
            .send(GatewayMessage::Command {
                connection: self.connection.clone(),
                command,
            })
            .await
            .context("could not write to the gateway channel")
    }

    /// Recieve the next event addressed to this connection
    ///
    /// # Cancel Safety
    ///
    /// Cancel safe, can be used as a [tokio::select!] branch.
    pub async fn recv(&mut self) -> anyhow::Result<Event> {
        self.events_rx
            .recv()
            .await
            .context("could not recv from the gateway channel")
    }

    /// Leave the room, consuming the handle
    pub async fn leave(self) -> anyhow::Result<()> {
        self.gateway_tx
            .send(GatewayMessage::Disconnect {
                connection: self.connection,
            })
            .await
            .context("could not write to the gateway channel")
    }
}
