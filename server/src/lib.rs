//! # Stub Console Server Library
//!
//! A small stand-in for a game server's remote console. It speaks the same
//! RCON framing as a real server and answers commands from a fixed script,
//! which makes end-to-end tests of the client and translator possible
//! without a running game.
//!
//! ## Module Organization
//!
//! ### Script Module (`script`)
//! Command-to-reply table with the vanilla unknown-command text as fallback.
//!
//! ### Network Module (`network`)
//! The TCP listener:
//! - One task per accepted connection
//! - Password check before any command is answered
//! - Long replies split across packets
//! - `Unknown request <kind>` for packet kinds it does not handle, which
//!   clients use to detect the end of a multi-packet reply
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::{ReplyScript, StubServer};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let script = ReplyScript::new().with_reply("seed", "Seed: [-42]");
//!     let server = StubServer::bind("127.0.0.1:25575", "secret", script).await?;
//!     server.run().await
//! }
//! ```

pub mod network;
pub mod script;

pub use network::StubServer;
pub use script::{ReplyScript, ScriptError};
