//! # Console Client Library
//!
//! Connects to a game server's remote console and exposes the connection as
//! a [`translator::Transport`], so every typed operation of
//! [`translator::CommandTranslator`] runs over it.
//!
//! ## Module Organization
//!
//! ### Config Module (`config`)
//! Address, password and the timeout applied to each round trip.
//!
//! ### Network Module (`network`)
//! The RCON session itself:
//! - TCP connection and password authentication
//! - One request in flight at a time, guarded by an async mutex
//! - Reassembly of replies split across several packets
//! - Dropping the session after any transport failure
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::{ClientConfig, RconClient};
//! use translator::CommandTranslator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("127.0.0.1:25575", "secret");
//!     let console = CommandTranslator::new(RconClient::connect(config).await?);
//!
//!     let players = console.list_players(false).await?;
//!     println!("{} of {} online", players.online, players.max);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod network;

pub use config::ClientConfig;
pub use network::RconClient;
