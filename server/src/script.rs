//! Scripted console replies.

use std::collections::HashMap;
use thiserror::Error;

/// What vanilla consoles answer to a command they do not know.
pub const UNKNOWN_COMMAND_REPLY: &str = "Unknown or incomplete command, see below for error";

const PAIR_SEPARATOR: &str = "=>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("expected `command=>reply`, got {0:?}")]
    MissingSeparator(String),

    #[error("empty command in {0:?}")]
    EmptyCommand(String),
}

/// Maps exact command lines to the reply the console gives for them.
#[derive(Debug, Clone)]
pub struct ReplyScript {
    replies: HashMap<String, String>,
    fallback: String,
}

impl Default for ReplyScript {
    fn default() -> Self {
        Self {
            replies: HashMap::new(),
            fallback: UNKNOWN_COMMAND_REPLY.to_string(),
        }
    }
}

impl ReplyScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, command: impl Into<String>, reply: impl Into<String>) -> Self {
        self.replies.insert(command.into(), reply.into());
        self
    }

    /// Reply for commands without a script entry.
    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = reply.into();
        self
    }

    /// Adds a `command=>reply` pair. The reply may be empty; `\n` in it
    /// becomes a line break.
    pub fn add_pair(&mut self, pair: &str) -> Result<(), ScriptError> {
        let (command, reply) = pair
            .split_once(PAIR_SEPARATOR)
            .ok_or_else(|| ScriptError::MissingSeparator(pair.to_string()))?;
        let command = command.trim();
        if command.is_empty() {
            return Err(ScriptError::EmptyCommand(pair.to_string()));
        }
        let reply = reply.replace("\\n", "\n");
        self.replies.insert(command.to_string(), reply.trim().to_string());
        Ok(())
    }

    pub fn reply_to(&self, command: &str) -> &str {
        self.replies
            .get(command.trim())
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_parse() {
        let mut script = ReplyScript::new();
        script.add_pair("seed=>Seed: [42]").unwrap();
        script.add_pair("say hi => ").unwrap();
        script.add_pair("list=>There are 0 of a max of 20 players online:\\n").unwrap();

        assert_eq!(script.reply_to("seed"), "Seed: [42]");
        assert_eq!(script.reply_to("say hi"), "");
        assert_eq!(script.reply_to("list"), "There are 0 of a max of 20 players online:");
        assert_eq!(script.len(), 3);
    }

    #[test]
    fn test_bad_pairs_rejected() {
        let mut script = ReplyScript::new();
        assert_eq!(
            script.add_pair("seed"),
            Err(ScriptError::MissingSeparator("seed".into()))
        );
        assert_eq!(
            script.add_pair(" =>x"),
            Err(ScriptError::EmptyCommand(" =>x".into()))
        );
        assert!(script.is_empty());
    }

    #[test]
    fn test_unknown_command_fallback() {
        let script = ReplyScript::new().with_reply("seed", "Seed: [1]");
        assert_eq!(script.reply_to("bogus"), UNKNOWN_COMMAND_REPLY);

        let script = script.with_fallback("");
        assert_eq!(script.reply_to("bogus"), "");
    }
}
