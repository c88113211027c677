//! TCP listener answering RCON requests from a [`ReplyScript`].

use crate::script::ReplyScript;
use log::{debug, error, info, warn};
use protocol::{read_packet, write_packet, Packet, PacketKind, ProtocolError, AUTH_FAILURE_ID, MAX_BODY_LEN};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A stand-in console for tests and demos.
///
/// Each accepted connection is served by its own task. Commands are only
/// answered after the client authenticated with the configured password.
pub struct StubServer {
    listener: TcpListener,
    password: Arc<str>,
    script: Arc<ReplyScript>,
}

impl StubServer {
    pub async fn bind(addr: &str, password: &str, script: ReplyScript) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Stub console listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            password: Arc::from(password),
            script: Arc::new(script),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the listener fails.
    pub async fn run(self) -> std::io::Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            info!("Client connected from {}", peer);

            let password = Arc::clone(&self.password);
            let script = Arc::clone(&self.script);
            tokio::spawn(async move {
                match serve(stream, &password, &script).await {
                    Ok(()) => info!("Client {} disconnected", peer),
                    Err(e) => warn!("Connection with {} ended: {}", peer, e),
                }
            });
        }
    }

    /// Runs the accept loop on a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                error!("Stub console stopped: {}", e);
            }
        })
    }
}

async fn serve(mut stream: TcpStream, password: &str, script: &ReplyScript) -> protocol::Result<()> {
    let mut authenticated = false;

    loop {
        let packet = match read_packet(&mut stream).await {
            Ok(packet) => packet,
            Err(ProtocolError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        };

        match packet.kind {
            PacketKind::AUTH => {
                authenticated = packet.body == password;
                let id = if authenticated { packet.id } else { AUTH_FAILURE_ID };
                debug!("Auth attempt {} {}", packet.id, if authenticated { "accepted" } else { "rejected" });
                write_packet(&mut stream, &Packet::new(id, PacketKind::AUTH_RESPONSE, "")).await?;
            }
            PacketKind::EXEC_COMMAND if !authenticated => {
                warn!("Command before authentication: {:?}", packet.body);
                write_packet(&mut stream, &Packet::new(AUTH_FAILURE_ID, PacketKind::AUTH_RESPONSE, "")).await?;
            }
            PacketKind::EXEC_COMMAND => {
                let reply = script.reply_to(&packet.body);
                debug!("{:?} -> {:?}", packet.body, reply);
                for chunk in split_reply(reply) {
                    write_packet(&mut stream, &Packet::response(packet.id, chunk)).await?;
                }
            }
            PacketKind(other) => {
                let body = format!("Unknown request {other:x}");
                write_packet(&mut stream, &Packet::response(packet.id, body)).await?;
            }
        }
    }
}

/// Splits `reply` into packet-sized bodies on character boundaries. An
/// empty reply is still one (empty) packet.
pub fn split_reply(reply: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = reply;
    while rest.len() > MAX_BODY_LEN {
        let mut cut = MAX_BODY_LEN;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let (chunk, tail) = rest.split_at(cut);
        chunks.push(chunk);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}
