//! Error taxonomy for console operations
//!
//! Every operation fails with exactly one of four kinds:
//! - `Validation`: rejected locally, nothing was sent
//! - `Transport`: the connection produced no reply or broke, passed through unchanged
//! - `Domain`: the server answered with a recognized failure message
//! - `UnexpectedResponse`: the server answered with something no rule recognizes

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommandError>;

/// Failures reported by a [`crate::Transport`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no reply was captured for the command")]
    NoReply,

    #[error("not connected to the console")]
    NotConnected,

    #[error("connection closed by the console")]
    Disconnected,

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("console rejected the password")]
    AuthenticationFailed,

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid {parameter}: {reason}")]
    Validation {
        parameter: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("`{command}` failed: {reason} (console said: {reply:?})")]
    Domain {
        command: String,
        reply: String,
        reason: String,
    },

    #[error("`{command}` produced an unrecognized reply ({reason}): {reply:?}")]
    UnexpectedResponse {
        command: String,
        reply: String,
        reason: String,
    },
}

impl CommandError {
    pub fn validation(parameter: &'static str, reason: impl Into<String>) -> Self {
        CommandError::Validation {
            parameter,
            reason: reason.into(),
        }
    }

    pub fn domain(command: &str, reply: &str, reason: impl Into<String>) -> Self {
        CommandError::Domain {
            command: command.to_string(),
            reply: reply.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unexpected(command: &str, reply: &str, reason: impl Into<String>) -> Self {
        CommandError::UnexpectedResponse {
            command: command.to_string(),
            reply: reply.to_string(),
            reason: reason.into(),
        }
    }

    /// The command line that produced this error, when one was sent.
    pub fn command(&self) -> Option<&str> {
        match self {
            CommandError::Domain { command, .. }
            | CommandError::UnexpectedResponse { command, .. } => Some(command),
            _ => None,
        }
    }

    /// The raw console reply attached to this error, when there was one.
    pub fn reply(&self) -> Option<&str> {
        match self {
            CommandError::Domain { reply, .. }
            | CommandError::UnexpectedResponse { reply, .. } => Some(reply),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CommandError::Validation { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CommandError::Transport(_))
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, CommandError::Domain { .. })
    }

    pub fn is_unexpected(&self) -> bool {
        matches!(self, CommandError::UnexpectedResponse { .. })
    }
}
