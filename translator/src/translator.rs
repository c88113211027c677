//! # Command Translator
//!
//! Owns the injected [`Transport`] and the send-and-classify round trip every
//! operation goes through. The operations themselves live in `crate::ops`,
//! one `impl` block per subject.
//!
//! The translator keeps no state between calls. Multi-step operations send
//! their command lines one after another and stop at the first failure.

use crate::command::CommandLine;
use crate::error::{CommandError, Result, TransportError};
use crate::reply::Recognizer;
use crate::transport::Transport;
use log::{debug, trace, warn};

pub struct CommandTranslator<T> {
    transport: T,
}

impl<T: Transport> CommandTranslator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Sends a caller-provided command line verbatim and returns the reply.
    ///
    /// Any present reply counts as success, including an empty one.
    pub async fn execute_raw(&self, command: &str) -> Result<String> {
        let command = crate::command::require("command", command)?;
        self.dispatch(command).await
    }

    /// One transport round trip. An absent reply becomes `TransportError::NoReply`.
    pub(crate) async fn dispatch(&self, command: &str) -> Result<String> {
        debug!("-> {}", command);
        match self.transport.send(command).await {
            Ok(Some(reply)) => {
                trace!("<- {:?}", reply);
                Ok(reply)
            }
            Ok(None) => {
                warn!("no reply captured for `{}`", command);
                Err(CommandError::Transport(TransportError::NoReply))
            }
            Err(e) => {
                warn!("transport failed for `{}`: {}", command, e);
                Err(CommandError::Transport(e))
            }
        }
    }

    /// Sends `command` and classifies the reply with `rules`.
    pub(crate) async fn run<R>(&self, command: CommandLine, rules: &Recognizer<R>) -> Result<R> {
        let reply = self.dispatch(command.as_str()).await?;
        let result = rules.classify(command.as_str(), &reply);
        if let Err(CommandError::UnexpectedResponse { reason, .. }) = &result {
            warn!("unrecognized reply to `{}` ({}): {:?}", command, reason, reply);
        }
        result
    }

    /// Sends each step in order, stopping at the first failure.
    pub(crate) async fn run_sequence(&self, steps: Vec<(CommandLine, Recognizer<()>)>) -> Result<()> {
        let total = steps.len();
        for (index, (command, rules)) in steps.into_iter().enumerate() {
            if let Err(e) = self.run(command, &rules).await {
                if index + 1 < total {
                    debug!("aborting after step {} of {}", index + 1, total);
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
