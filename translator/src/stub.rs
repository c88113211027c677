//! Scripted in-memory transport
//!
//! Records every command it is asked to send and answers from a script, so
//! tests can assert both the exact command lines produced and how many
//! transport calls happened. Unscripted commands get the console's
//! unknown-command reply.

use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Reply a vanilla console gives for a command it cannot parse.
pub const UNKNOWN_COMMAND: &str = "Unknown or incomplete command, see below for error";

enum Scripted {
    Reply(String),
    Silence,
    Failure(fn() -> TransportError),
}

#[derive(Default)]
pub struct StubTransport {
    script: HashMap<String, VecDeque<Scripted>>,
    fallback: Option<String>,
    sent: Mutex<Vec<String>>,
    calls: AtomicU64,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `command`. Repeated calls queue further replies;
    /// the last one keeps answering once the queue is down to it.
    pub fn with_reply(mut self, command: impl Into<String>, reply: impl Into<String>) -> Self {
        self.push(command.into(), Scripted::Reply(reply.into()));
        self
    }

    /// Sends to `command` complete without a reply.
    pub fn with_silence(mut self, command: impl Into<String>) -> Self {
        self.push(command.into(), Scripted::Silence);
        self
    }

    pub fn with_failure(mut self, command: impl Into<String>, failure: fn() -> TransportError) -> Self {
        self.push(command.into(), Scripted::Failure(failure));
        self
    }

    /// Reply used for every command without a script entry.
    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    fn push(&mut self, command: String, entry: Scripted) {
        self.script.entry(command).or_default().push_back(entry);
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every command sent so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn last_command(&self) -> Option<String> {
        self.commands().pop()
    }

    fn answer(&self, command: &str, position: usize) -> Result<Option<String>, TransportError> {
        let Some(queue) = self.script.get(command) else {
            return Ok(Some(
                self.fallback.clone().unwrap_or_else(|| UNKNOWN_COMMAND.to_string()),
            ));
        };
        let entry = queue.get(position).or_else(|| queue.back());
        match entry {
            Some(Scripted::Reply(reply)) => Ok(Some(reply.clone())),
            Some(Scripted::Silence) | None => Ok(None),
            Some(Scripted::Failure(make)) => Err(make()),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, command: &str) -> Result<Option<String>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let position = {
            let mut sent = self
                .sent
                .lock()
                .map_err(|_| TransportError::Protocol("stub transport lock poisoned".into()))?;
            let position = sent.iter().filter(|c| c.as_str() == command).count();
            sent.push(command.to_string());
            position
        };
        self.answer(command, position)
    }
}
