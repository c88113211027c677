//! # RCON Wire Protocol
//!
//! Packet layout shared by the console client and the stub console server.
//! Every frame on the TCP stream is
//!
//! ```text
//! i32 size | i32 id | i32 kind | body bytes | 0x00 | 0x00
//! ```
//!
//! with all integers little-endian and `size` counting everything after the
//! size field itself. The 12-byte header is encoded with `bincode`'s legacy
//! fixed-int configuration, which matches that layout exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Bytes taken by `size`, `id` and `kind`.
pub const HEADER_SIZE: usize = 12;
/// Bytes taken by the `size` prefix alone.
pub const SIZE_PREFIX: usize = 4;
/// Smallest legal `size` value: id, kind and the two terminating nul bytes.
pub const MIN_FRAME_SIZE: i32 = 10;
/// Largest body a console server sends in a single packet.
pub const MAX_BODY_LEN: usize = 4096;
/// Largest command body a vanilla console accepts from a client.
pub const MAX_COMMAND_LEN: usize = 1446;
/// Request id the server answers an authentication attempt with when the password is wrong.
pub const AUTH_FAILURE_ID: i32 = -1;

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("header encoding failed: {0}")]
    Header(#[from] bincode::Error),

    #[error("packet body is {len} bytes, limit is {max}")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("invalid frame size {0}")]
    InvalidSize(i32),

    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("frame is missing its nul terminator")]
    MissingTerminator,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Packet type field. Request and response kinds overlap on the wire
/// (`2` is both "exec command" and "auth response"), so the meaning depends
/// on the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PacketKind(pub i32);

impl PacketKind {
    pub const RESPONSE_VALUE: PacketKind = PacketKind(0);
    pub const EXEC_COMMAND: PacketKind = PacketKind(2);
    pub const AUTH_RESPONSE: PacketKind = PacketKind(2);
    pub const AUTH: PacketKind = PacketKind(3);
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    size: i32,
    id: i32,
    kind: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub kind: PacketKind,
    pub body: String,
}

impl Packet {
    pub fn new(id: i32, kind: PacketKind, body: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    pub fn auth(id: i32, password: &str) -> Self {
        Self::new(id, PacketKind::AUTH, password)
    }

    pub fn command(id: i32, command: &str) -> Self {
        Self::new(id, PacketKind::EXEC_COMMAND, command)
    }

    pub fn response(id: i32, body: impl Into<String>) -> Self {
        Self::new(id, PacketKind::RESPONSE_VALUE, body)
    }

    /// Serializes the packet into one complete frame, size prefix included.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let body = self.body.as_bytes();
        if body.len() > MAX_BODY_LEN {
            return Err(ProtocolError::PayloadTooLarge {
                len: body.len(),
                max: MAX_BODY_LEN,
            });
        }

        let header = Header {
            size: MIN_FRAME_SIZE + body.len() as i32,
            id: self.id,
            kind: self.kind.0,
        };

        let mut frame = bincode::serialize(&header)?;
        frame.reserve(body.len() + 2);
        frame.extend_from_slice(body);
        frame.extend_from_slice(&[0, 0]);
        Ok(frame)
    }

    /// Parses one complete frame, size prefix included.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() < HEADER_SIZE + 2 {
            return Err(ProtocolError::Truncated {
                expected: HEADER_SIZE + 2,
                actual: frame.len(),
            });
        }

        let header: Header = bincode::deserialize(&frame[..HEADER_SIZE])?;
        let remaining = frame_len(header.size)?;
        let expected = SIZE_PREFIX + remaining;
        if frame.len() < expected {
            return Err(ProtocolError::Truncated {
                expected,
                actual: frame.len(),
            });
        }

        let body = &frame[HEADER_SIZE..expected];
        let body = body
            .strip_suffix(&[0, 0])
            .ok_or(ProtocolError::MissingTerminator)?;

        Ok(Self {
            id: header.id,
            kind: PacketKind(header.kind),
            body: String::from_utf8_lossy(body).into_owned(),
        })
    }
}

/// Validates a `size` field and returns how many bytes follow it.
pub fn frame_len(size: i32) -> Result<usize> {
    if size < MIN_FRAME_SIZE || size as usize > MAX_BODY_LEN + MIN_FRAME_SIZE as usize {
        return Err(ProtocolError::InvalidSize(size));
    }
    Ok(size as usize)
}

/// Reads exactly one packet from the stream.
pub async fn read_packet<R>(reader: &mut R) -> Result<Packet>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; SIZE_PREFIX];
    reader.read_exact(&mut prefix).await?;
    let remaining = frame_len(i32::from_le_bytes(prefix))?;

    let mut frame = Vec::with_capacity(SIZE_PREFIX + remaining);
    frame.extend_from_slice(&prefix);
    frame.resize(SIZE_PREFIX + remaining, 0);
    reader.read_exact(&mut frame[SIZE_PREFIX..]).await?;

    Packet::decode(&frame)
}

/// Writes one packet and flushes the stream.
pub async fn write_packet<W>(writer: &mut W, packet: &Packet) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let frame = packet.encode()?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}
