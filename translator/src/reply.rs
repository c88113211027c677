//! # Reply Recognizers
//!
//! Console replies are free-form sentences. Each operation classifies its
//! reply with a [`Recognizer`]: an ordered table of rules, each pairing a
//! [`Matcher`] with an outcome. The first rule whose matcher fires decides
//! the result; a reply no rule recognizes is an unexpected response.
//!
//! ## Outcomes
//! - `accept`: success, with an extractor pulling the typed value out of the
//!   reply. An extractor returning `None` means the reply looked like success
//!   but the value was not there, which is reported as unexpected rather than
//!   defaulted.
//! - `reject`: a recognized failure sentence, reported as a domain error.
//!
//! ## Shared failures
//! After an operation's own rules, every reply is checked against the
//! console's generic failure sentences (unknown command, bad argument, no
//! matching target). Only when those miss too is the reply unexpected.

use crate::error::{CommandError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::str::FromStr;

/// How a rule decides whether it applies to a reply.
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(Cow<'static, str>),
    Prefix(Cow<'static, str>),
    Contains(Cow<'static, str>),
    Pattern(Regex),
}

impl Matcher {
    pub fn exact(text: impl Into<Cow<'static, str>>) -> Self {
        Matcher::Exact(text.into())
    }

    pub fn prefix(text: impl Into<Cow<'static, str>>) -> Self {
        Matcher::Prefix(text.into())
    }

    pub fn contains(text: impl Into<Cow<'static, str>>) -> Self {
        Matcher::Contains(text.into())
    }

    pub fn pattern(regex: &Regex) -> Self {
        Matcher::Pattern(regex.clone())
    }

    /// Returns the match (with captures for patterns) when the rule applies.
    fn test<'r>(&self, reply: &'r str) -> Option<Reply<'r>> {
        let hit = match self {
            Matcher::Exact(text) => reply == text.as_ref(),
            Matcher::Prefix(text) => reply.starts_with(text.as_ref()),
            Matcher::Contains(text) => reply.contains(text.as_ref()),
            Matcher::Pattern(regex) => {
                return regex.captures(reply).map(|captures| Reply {
                    text: reply,
                    captures: Some(captures),
                });
            }
        };
        hit.then_some(Reply {
            text: reply,
            captures: None,
        })
    }
}

/// A reply that matched a rule, with its capture groups when the rule was a pattern.
pub struct Reply<'r> {
    text: &'r str,
    captures: Option<Captures<'r>>,
}

impl<'r> Reply<'r> {
    /// The reply with trailing whitespace removed.
    pub fn text(&self) -> &'r str {
        self.text
    }

    pub fn group(&self, index: usize) -> Option<&'r str> {
        self.captures
            .as_ref()
            .and_then(|captures| captures.get(index))
            .map(|m| m.as_str())
    }

    pub fn named(&self, name: &str) -> Option<&'r str> {
        self.captures
            .as_ref()
            .and_then(|captures| captures.name(name))
            .map(|m| m.as_str())
    }

    /// The first of the given groups that participated in the match.
    pub fn first_group(&self, indices: &[usize]) -> Option<&'r str> {
        indices.iter().find_map(|&index| self.group(index))
    }

    pub fn parse<T: FromStr>(&self, index: usize) -> Option<T> {
        self.group(index)?.trim().parse().ok()
    }

    /// Parses the first participating group among `indices`.
    pub fn parse_first<T: FromStr>(&self, indices: &[usize]) -> Option<T> {
        self.first_group(indices)?.trim().parse().ok()
    }

    pub fn owned(&self, index: usize) -> Option<String> {
        self.group(index).map(str::to_string)
    }
}

/// Failure sentences any command can produce, checked after an operation's own rules.
static SHARED_FAILURES: Lazy<Vec<(Matcher, &'static str)>> = Lazy::new(|| {
    vec![
        (Matcher::prefix("Unknown or incomplete command"), "the console did not recognize the command"),
        (Matcher::prefix("Incorrect argument for command"), "the console rejected an argument"),
        (Matcher::prefix("Unknown command"), "the console did not recognize the command"),
        (Matcher::prefix("Unparseable"), "the console could not parse the command"),
        (Matcher::prefix("No entity was found"), "no entity matched the target"),
        (Matcher::prefix("No player was found"), "no player matched the target"),
        (Matcher::prefix("That player does not exist"), "unknown player"),
        (Matcher::prefix("Only one entity is allowed"), "the selector matched more than one entity"),
        (Matcher::prefix("Only one player is allowed"), "the selector matched more than one player"),
        (Matcher::prefix("I'm sorry, but you do not have permission"), "permission denied"),
    ]
});

enum Outcome<T> {
    Accept(fn(&Reply<'_>) -> Option<T>),
    Reject(Cow<'static, str>),
}

struct Rule<T> {
    matcher: Matcher,
    outcome: Outcome<T>,
}

/// Ordered reply classification table for one operation.
pub struct Recognizer<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for Recognizer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Recognizer<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn accept(mut self, matcher: Matcher, extract: fn(&Reply<'_>) -> Option<T>) -> Self {
        self.rules.push(Rule {
            matcher,
            outcome: Outcome::Accept(extract),
        });
        self
    }

    pub fn reject(mut self, matcher: Matcher, reason: impl Into<Cow<'static, str>>) -> Self {
        self.rules.push(Rule {
            matcher,
            outcome: Outcome::Reject(reason.into()),
        });
        self
    }

    /// Classifies `reply`, which was received for `command`.
    ///
    /// Errors carry the reply exactly as received, untrimmed.
    pub fn classify(&self, command: &str, reply: &str) -> Result<T> {
        let trimmed = reply.trim_end();
        for rule in &self.rules {
            let Some(matched) = rule.matcher.test(trimmed) else {
                continue;
            };
            return match &rule.outcome {
                Outcome::Accept(extract) => extract(&matched).ok_or_else(|| {
                    CommandError::unexpected(command, reply, "reply value could not be extracted")
                }),
                Outcome::Reject(reason) => Err(CommandError::domain(command, reply, reason.as_ref())),
            };
        }
        if let Some((_, reason)) = SHARED_FAILURES
            .iter()
            .find(|(matcher, _)| matcher.test(trimmed).is_some())
        {
            return Err(CommandError::domain(command, reply, *reason));
        }
        Err(CommandError::unexpected(command, reply, "no rule matched the reply"))
    }
}

impl Recognizer<()> {
    /// Shorthand for a success rule carrying no value.
    pub fn ok(self, matcher: Matcher) -> Self {
        self.accept(matcher, |_| Some(()))
    }
}

impl Recognizer<String> {
    /// Shorthand for a success rule returning the whole reply.
    pub fn text(self, matcher: Matcher) -> Self {
        self.accept(matcher, |reply| Some(reply.text().to_string()))
    }
}

/// Splits a list payload on commas and newlines, dropping empty entries.
pub fn split_list(payload: &str) -> Vec<String> {
    payload
        .split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like [`split_list`], also removing the `[...]` wrapping some lists put around entries.
pub fn split_bracketed_list(payload: &str) -> Vec<String> {
    split_list(payload)
        .into_iter()
        .map(|entry| {
            entry
                .strip_prefix('[')
                .and_then(|inner| inner.strip_suffix(']'))
                .map(str::to_string)
                .unwrap_or(entry)
        })
        .collect()
}

/// Finds the first integer in `text`, sign included.
pub fn first_integer<T: FromStr>(text: &str) -> Option<T> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let start = if start > 0 && text.as_bytes()[start - 1] == b'-' {
        start - 1
    } else {
        start
    };
    let digits = text[start..]
        .char_indices()
        .skip(1)
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| start + i)
        .unwrap_or(text.len());
    text[start..digits].parse().ok()
}
