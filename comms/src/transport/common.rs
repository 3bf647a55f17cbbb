use std::pin::Pin;

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::{
    io::AsyncWriteExt,
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
};
use tokio_stream::{Stream, StreamExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

pub const NEW_LINE: &[u8; 2] = b"\r\n";

/// Longest line accepted from the peer, a longer line ends the stream
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

pub type BoxedStream<Item> = Pin<Box<dyn Stream<Item = Item> + Send>>;

/// Why a line could not be turned into a value
#[derive(Debug, Error)]
pub enum ReadError {
    /// The connection itself failed, nothing more will arrive
    #[error("could not read from the {peer}: {source}")]
    Io {
        peer: &'static str,
        source: std::io::Error,
    },
    /// The peer sent more than [MAX_LINE_LENGTH] bytes without a newline
    #[error("line from the {peer} exceeded {} bytes", MAX_LINE_LENGTH)]
    LineTooLong { peer: &'static str },
    /// The line was read but is not a valid value
    #[error("failed to deserialize line from the {peer}: {source}")]
    Malformed {
        peer: &'static str,
        source: serde_json::Error,
    },
}

impl ReadError {
    /// Whether the stream must be abandoned after this error, as opposed to a single bad line
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReadError::Io { .. } | ReadError::LineTooLong { .. })
    }
}

/// Turns the read half of a TCP stream into a stream of JSON values, one per line.
///
/// A line that fails to deserialize yields an `Err` item and the stream keeps going.
/// Read failures and overlong lines are reported as fatal, see [ReadError::is_fatal].
pub(super) fn json_lines<T>(
    reader: OwnedReadHalf,
    peer: &'static str,
) -> BoxedStream<Result<T, ReadError>>
where
    T: DeserializeOwned + Send + 'static,
{
    Box::pin(
        FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)).map(
            move |line| {
                let line = line.map_err(|e| match e {
                    LinesCodecError::MaxLineLengthExceeded => ReadError::LineTooLong { peer },
                    LinesCodecError::Io(source) => ReadError::Io { peer, source },
                })?;

                serde_json::from_str::<T>(&line).map_err(|source| ReadError::Malformed { peer, source })
            },
        ),
    )
}

/// Writes JSON values to the write half of a TCP stream, terminating each with [NEW_LINE]
pub(super) struct JsonLineWriter {
    writer: OwnedWriteHalf,
}

impl JsonLineWriter {
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self { writer }
    }

    pub async fn write<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        let mut serialized_bytes = serde_json::to_vec(value)?;
        serialized_bytes.extend_from_slice(NEW_LINE);

        self.writer
            .write_all(serialized_bytes.as_slice())
            .await
            .context("could not write line to the peer")?;

        Ok(())
    }
}
