use std::collections::HashMap;

use anyhow::Context;
use comms::{command::UserCommand, event::Event};
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::game::{GameRoom, Outbound, Recipient};

pub use self::connection_handle::ConnectionHandle;

mod connection_handle;

const GATEWAY_CHANNEL_CAPACITY: usize = 256;
const CONNECTION_CHANNEL_CAPACITY: usize = 100;

/// Everything the gateway loop reacts to, processed strictly one at a time
#[derive(Debug)]
pub enum GatewayMessage {
    Connect {
        connection: String,
        events_tx: mpsc::Sender<Event>,
    },
    Command {
        connection: String,
        command: UserCommand,
    },
    Disconnect {
        connection: String,
    },
}

/// [GameGateway] is the entry point connections use to reach the game room.
///
/// The room is owned by a single task, so commands from different connections never interleave.
#[derive(Debug, Clone)]
pub struct GameGateway {
    gateway_tx: mpsc::Sender<GatewayMessage>,
}

impl GameGateway {
    /// Spawn the task owning the room. It stops once every [GameGateway] and [ConnectionHandle] is dropped.
    pub fn start(room: GameRoom) -> (GameGateway, JoinHandle<()>) {
        let (gateway_tx, gateway_rx) = mpsc::channel(GATEWAY_CHANNEL_CAPACITY);
        let join_handle = tokio::spawn(run(room, gateway_rx));

        (GameGateway { gateway_tx }, join_handle)
    }

    /// Register a connection, handing out a [ConnectionHandle] to act on its behalf
    pub async fn connect(&self, connection: &str) -> anyhow::Result<ConnectionHandle> {
        let (events_tx, events_rx) = mpsc::channel(CONNECTION_CHANNEL_CAPACITY);

        self.gateway_tx
            .send(GatewayMessage::Connect {
                connection: String::from(connection),
                events_tx,
            })
            .await
            .context("could not write to the gateway channel")?;

        Ok(ConnectionHandle::new(
            String::from(connection),
            self.gateway_tx.clone(),
            events_rx,
        ))
    }
}

async fn run(mut room: GameRoom, mut gateway_rx: mpsc::Receiver<GatewayMessage>) {
    let mut connections: HashMap<String, mpsc::Sender<Event>> = HashMap::new();

    while let Some(message) = gateway_rx.recv().await {
        let outbound = match message {
            GatewayMessage::Connect {
                connection,
                events_tx,
            } => {
                debug!(connection = %connection, "connection registered");
                connections.insert(connection, events_tx);
                continue;
            }
            GatewayMessage::Command {
                connection,
                command,
            } => room.handle(&connection, command),
            GatewayMessage::Disconnect { connection } => {
                connections.remove(&connection);
                debug!(connection = %connection, "connection removed");
                room.disconnect(&connection)
            }
        };

        for item in outbound {
            deliver(&connections, &room, item);
        }
    }

    info!("gateway stopped");
}

/// Routes one outbound event to its recipients without ever waiting on a slow connection
fn deliver(connections: &HashMap<String, mpsc::Sender<Event>>, room: &GameRoom, outbound: Outbound) {
    let Outbound { recipient, event } = outbound;

    match recipient {
        Recipient::All => {
            for (connection, events_tx) in connections {
                push(connection, events_tx, event.clone());
            }
        }
        Recipient::AllExcept(excluded) => {
            for (connection, events_tx) in connections.iter().filter(|(c, _)| **c != excluded) {
                push(connection, events_tx, event.clone());
            }
        }
        Recipient::Connection(connection) => match connections.get(&connection) {
            Some(events_tx) => push(&connection, events_tx, event),
            None => debug!(connection = %connection, "reply target is gone"),
        },
        Recipient::Player(identity) => {
            for connection in room.connections_of(&identity) {
                if let Some(events_tx) = connections.get(&connection) {
                    push(&connection, events_tx, event.clone());
                }
            }
        }
    }
}

fn push(connection: &str, events_tx: &mpsc::Sender<Event>, event: Event) {
    match events_tx.try_send(event) {
        Ok(()) => {}
        // The session is gone and its disconnect is already on the way
        Err(TrySendError::Closed(_)) => debug!(connection, "dropping event for closed connection"),
        Err(e) => warn!(connection, error = %e, "dropping event for connection"),
    }
}
