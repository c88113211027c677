//! # Command Lines
//!
//! Builder for the single line of text sent per transport call, plus the
//! input checks every operation runs before anything is built.
//!
//! Tokens are joined with one space in the order they are appended. Optional
//! tokens are appended only when present, and [`CommandLine::chain`] enforces
//! the positional rule that a later optional token needs all earlier ones.

use crate::error::{CommandError, Result};
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    pub fn new(root: &str) -> Self {
        Self(root.to_string())
    }

    pub fn arg(mut self, token: impl Display) -> Self {
        self.0.push(' ');
        self.0.push_str(&token.to_string());
        self
    }

    pub fn opt<T: Display>(self, token: Option<T>) -> Self {
        match token {
            Some(token) => self.arg(token),
            None => self,
        }
    }

    /// Appends `token` only when `flag` is set.
    pub fn flag(self, flag: bool, token: &str) -> Self {
        if flag {
            self.arg(token)
        } else {
            self
        }
    }

    /// Appends a run of positional optional tokens.
    ///
    /// Stops at the first absent token; any present token after a gap is a
    /// validation error naming the missing parameter.
    pub fn chain(mut self, tail: &[(&'static str, Option<String>)]) -> Result<Self> {
        let mut gap: Option<&'static str> = None;
        for (name, value) in tail {
            match (value, gap) {
                (Some(_), Some(missing)) => {
                    return Err(CommandError::validation(
                        missing,
                        format!("required when {name} is given"),
                    ));
                }
                (Some(value), None) => self = self.arg(value),
                (None, None) => gap = Some(name),
                (None, Some(_)) => {}
            }
        }
        Ok(self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommandLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CommandLine> for String {
    fn from(line: CommandLine) -> Self {
        line.0
    }
}

/// Rejects empty values and anything that would break the one-line framing.
pub fn require<'a>(parameter: &'static str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(CommandError::validation(parameter, "must not be empty"));
    }
    if value.contains(['\n', '\r']) {
        return Err(CommandError::validation(parameter, "must be a single line"));
    }
    Ok(value)
}

/// Like [`require`], for identifiers that must also be a single token.
pub fn require_token<'a>(parameter: &'static str, value: &'a str) -> Result<&'a str> {
    let value = require(parameter, value)?;
    if value.contains(char::is_whitespace) {
        return Err(CommandError::validation(parameter, "must not contain whitespace"));
    }
    Ok(value)
}

/// Validates an optional value when present.
pub fn require_opt<'a>(parameter: &'static str, value: Option<&'a str>) -> Result<Option<&'a str>> {
    value.map(|value| require(parameter, value)).transpose()
}

pub fn require_list<'a, S: AsRef<str>>(parameter: &'static str, values: &'a [S]) -> Result<Vec<&'a str>> {
    if values.is_empty() {
        return Err(CommandError::validation(parameter, "at least one entry is required"));
    }
    values
        .iter()
        .map(|value| require_token(parameter, value.as_ref()))
        .collect()
}

pub fn require_range<T>(parameter: &'static str, value: T, min: T, max: T) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(CommandError::validation(
            parameter,
            format!("{value} is outside {min}..={max}"),
        ));
    }
    Ok(value)
}

pub fn require_at_least<T>(parameter: &'static str, value: T, min: T) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if value < min {
        return Err(CommandError::validation(
            parameter,
            format!("{value} must be at least {min}"),
        ));
    }
    Ok(value)
}

pub fn require_finite(parameter: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(CommandError::validation(parameter, "must be a finite number"));
    }
    Ok(value)
}

/// Display names are text components. JSON input passes through as is,
/// plain text is sent as a JSON string.
pub fn text_component(text: &str) -> String {
    let trimmed = text.trim();
    let json = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.len() > 1 && trimmed.starts_with('"') && trimmed.ends_with('"'))
        || (trimmed.starts_with('[')
            && trimmed.ends_with(']')
            && trimmed[1..].trim_start().starts_with(['{', '"']));
    if json {
        return text.to_string();
    }
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_joined_in_order() {
        let line = CommandLine::new("setblock")
            .arg(1)
            .arg(2)
            .arg(3)
            .arg("minecraft:stone")
            .opt(Some("keep"));
        assert_eq!(line.as_str(), "setblock 1 2 3 minecraft:stone keep");
    }

    #[test]
    fn test_absent_optional_leaves_no_trailing_space() {
        let line = CommandLine::new("kick").arg("Steve").opt(None::<&str>);
        assert_eq!(line.to_string(), "kick Steve");
    }

    #[test]
    fn test_chain_stops_at_first_gap() {
        let line = CommandLine::new("effect give @p minecraft:speed")
            .chain(&[("seconds", Some("30".into())), ("amplifier", None), ("hide_particles", None)])
            .unwrap();
        assert_eq!(line.as_str(), "effect give @p minecraft:speed 30");
    }

    #[test]
    fn test_chain_rejects_later_value_after_gap() {
        let err = CommandLine::new("effect give @p minecraft:speed")
            .chain(&[("seconds", None), ("amplifier", Some("2".into()))])
            .unwrap_err();
        match err {
            CommandError::Validation { parameter, .. } => assert_eq!(parameter, "seconds"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_require_rejects_blank_and_multiline() {
        assert!(require("player", "").is_err());
        assert!(require("player", "   ").is_err());
        assert!(require("player", "Steve\nop Mallory").is_err());
        assert_eq!(require("player", "Steve").unwrap(), "Steve");
        assert!(require_token("objective", "two words").is_err());
    }

    #[test]
    fn test_text_component_quotes_plain_text() {
        assert_eq!(text_component("Red Team"), "\"Red Team\"");
        assert_eq!(text_component("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(text_component("{\"text\":\"Kills\"}"), "{\"text\":\"Kills\"}");
        assert_eq!(text_component("[\"a\",\"b\"]"), "[\"a\",\"b\"]");
        assert_eq!(text_component("[Red] "), "\"[Red] \"");
    }

    #[test]
    fn test_ranges() {
        assert!(require_range("amplifier", 256, 0, 255).is_err());
        assert!(require_range("amplifier", 255, 0, 255).is_ok());
        assert!(require_at_least("count", 0, 1).is_err());
        assert!(require_finite("x", f64::NAN).is_err());
    }

    #[test]
    fn test_require_list() {
        assert!(require_list::<&str>("players", &[]).is_err());
        assert_eq!(require_list("players", &["a", "b"]).unwrap(), vec!["a", "b"]);
    }
}
