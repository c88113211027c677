//! RCON connection over TCP, usable as the translator's [`Transport`].

use crate::config::ClientConfig;
use async_trait::async_trait;
use log::{debug, info, trace, warn};
use protocol::{read_packet, write_packet, Packet, PacketKind, ProtocolError, AUTH_FAILURE_ID, MAX_COMMAND_LEN};
use std::io::ErrorKind;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use translator::{Transport, TransportError};

/// Id of the first request on a fresh connection. Auth takes it, commands follow.
const FIRST_REQUEST_ID: i32 = 1;

struct Session {
    stream: TcpStream,
    next_id: i32,
}

impl Session {
    fn take_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = following(id);
        id
    }
}

/// Ids stay positive; -1 is reserved for auth failures.
fn following(id: i32) -> i32 {
    if id == i32::MAX {
        FIRST_REQUEST_ID
    } else {
        id + 1
    }
}

/// An authenticated console connection.
///
/// Requests are serialized: each `send` holds the connection until its reply
/// has been fully read. A transport failure or timeout drops the connection,
/// after which every send reports [`TransportError::NotConnected`].
pub struct RconClient {
    config: ClientConfig,
    session: Mutex<Option<Session>>,
}

impl RconClient {
    /// Connects and authenticates.
    pub async fn connect(config: ClientConfig) -> Result<Self, TransportError> {
        info!("Connecting to console at {}", config.address);
        let stream = timeout(config.timeout, TcpStream::connect(&config.address))
            .await
            .map_err(|_| TransportError::Timeout(config.timeout))??;
        stream.set_nodelay(true)?;

        let mut session = Session {
            stream,
            next_id: FIRST_REQUEST_ID,
        };
        timeout(config.timeout, authenticate(&mut session, &config.password))
            .await
            .map_err(|_| TransportError::Timeout(config.timeout))??;
        info!("Authenticated with {}", config.address);

        Ok(Self {
            config,
            session: Mutex::new(Some(session)),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Drops the connection. Later sends fail with `NotConnected`.
    pub async fn close(&self) {
        if self.session.lock().await.take().is_some() {
            debug!("Closed connection to {}", self.config.address);
        }
    }
}

#[async_trait]
impl Transport for RconClient {
    async fn send(&self, command: &str) -> Result<Option<String>, TransportError> {
        if command.len() > MAX_COMMAND_LEN {
            return Err(TransportError::Protocol(format!(
                "command is {} bytes, the console accepts at most {}",
                command.len(),
                MAX_COMMAND_LEN
            )));
        }

        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(TransportError::NotConnected)?;

        let outcome = match timeout(self.config.timeout, exchange(session, command)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.config.timeout)),
        };
        if let Err(e) = &outcome {
            // The stream position is unknown after a failure.
            warn!("Dropping connection to {}: {}", self.config.address, e);
            *guard = None;
        }
        outcome.map(Some)
    }
}

async fn authenticate(session: &mut Session, password: &str) -> Result<(), TransportError> {
    let id = session.take_id();
    write_packet(&mut session.stream, &Packet::auth(id, password))
        .await
        .map_err(transport_error)?;

    loop {
        let packet = read_packet(&mut session.stream).await.map_err(transport_error)?;
        // Some servers send an empty response value ahead of the auth response.
        if packet.kind != PacketKind::AUTH_RESPONSE {
            trace!("Skipping packet of kind {} during auth", packet.kind.0);
            continue;
        }
        return match packet.id {
            AUTH_FAILURE_ID => Err(TransportError::AuthenticationFailed),
            echoed if echoed == id => Ok(()),
            other => Err(TransportError::Protocol(format!(
                "auth response id {other} does not match request id {id}"
            ))),
        };
    }
}

/// Sends `command` followed by an empty marker packet of a kind the server
/// does not handle. Fragments of the reply arrive under the command's id;
/// the server's answer to the marker shows that the reply is complete.
async fn exchange(session: &mut Session, command: &str) -> Result<String, TransportError> {
    let command_id = session.take_id();
    let marker_id = session.take_id();

    write_packet(&mut session.stream, &Packet::command(command_id, command))
        .await
        .map_err(transport_error)?;
    write_packet(&mut session.stream, &Packet::response(marker_id, ""))
        .await
        .map_err(transport_error)?;

    let mut reply = String::new();
    let mut fragments = 0usize;
    loop {
        let packet = read_packet(&mut session.stream).await.map_err(transport_error)?;
        match packet.id {
            id if id == command_id => {
                fragments += 1;
                reply.push_str(&packet.body);
            }
            id if id == marker_id => break,
            AUTH_FAILURE_ID => return Err(TransportError::AuthenticationFailed),
            other => trace!("Ignoring packet with stale id {}", other),
        }
    }
    if fragments > 1 {
        debug!("Reassembled reply from {} packets", fragments);
    }
    Ok(reply)
}

fn transport_error(e: ProtocolError) -> TransportError {
    match e {
        ProtocolError::Io(io) if io.kind() == ErrorKind::UnexpectedEof => TransportError::Disconnected,
        ProtocolError::Io(io) => TransportError::Io(io),
        other => TransportError::Protocol(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_wrap_to_positive() {
        assert_eq!(following(1), 2);
        assert_eq!(following(i32::MAX), FIRST_REQUEST_ID);
    }

    #[test]
    fn test_eof_maps_to_disconnected() {
        let eof = ProtocolError::Io(std::io::Error::new(ErrorKind::UnexpectedEof, "eof"));
        assert!(matches!(transport_error(eof), TransportError::Disconnected));

        let size = ProtocolError::InvalidSize(3);
        assert!(matches!(transport_error(size), TransportError::Protocol(_)));
    }
}
