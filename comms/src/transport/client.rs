use tokio::net::{tcp::OwnedWriteHalf, TcpStream};

use crate::{command, event};

use super::common::{json_lines, BoxedStream, JsonLineWriter, ReadError};

/// [EventStream] is a stream of [crate::event::Event]s sent by the server
///
/// # Cancel Safety
///
/// This stream is cancel-safe, meaning that it can be used in [tokio::select]
/// without the risk of missing events.
pub type EventStream = BoxedStream<Result<event::Event, ReadError>>;

/// [CommandWriter] is a wrapper around a [TcpStream] which writes [crate::command::UserCommand]s to the server
pub struct CommandWriter {
    inner: JsonLineWriter,
}

impl CommandWriter {
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self {
            inner: JsonLineWriter::new(writer),
        }
    }

    /// Send a [crate::command::UserCommand] to the backing [TcpStream]
    ///
    /// # Cancel Safety
    ///
    /// Not cancellation safe, see [crate::transport::server::EventWriter::write].
    pub async fn write(&mut self, command: &command::UserCommand) -> anyhow::Result<()> {
        self.inner.write(command).await
    }
}

/// Splits a TCP stream into a stream of events and a command writer.
///
/// # Arguments
///
/// - `stream` - A [TcpStream] to split
pub fn split_tcp_stream(stream: TcpStream) -> (EventStream, CommandWriter) {
    let (reader, writer) = stream.into_split();

    (json_lines(reader, "server"), CommandWriter::new(writer))
}
