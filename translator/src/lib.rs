//! # Console Command Translator
//!
//! Typed operations for a remote game-server console. Each operation
//! validates its parameters, builds the console command line, sends it
//! through an injected [`Transport`] and turns the free-form reply into a
//! typed value or a [`CommandError`].
//!
//! ## Layout
//! - [`command`]: command-line builder and input checks
//! - [`reply`]: ordered reply recognizers
//! - [`types`]: keyword enums, positions and result records
//! - [`translator`]: the round trip shared by every operation
//! - `ops`: the operations, grouped by subject
//! - [`stub`]: a scripted transport for tests and demos
//!
//! ## Example
//! ```no_run
//! # async fn demo() -> translator::Result<()> {
//! use translator::{stub::StubTransport, types::Difficulty, CommandTranslator};
//!
//! let console = CommandTranslator::new(
//!     StubTransport::new().with_reply("difficulty hard", "Changed the difficulty to hard"),
//! );
//! console.set_difficulty(Difficulty::Hard).await?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod error;
mod ops;
pub mod reply;
pub mod stub;
pub mod translator;
pub mod transport;
pub mod types;

pub use error::{CommandError, Result, TransportError};
pub use translator::CommandTranslator;
pub use transport::Transport;
