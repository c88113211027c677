//! Broadcasts, whispers, raw JSON text and titles.

use crate::command::{require, CommandLine};
use crate::error::Result;
use crate::reply::{Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::TitleKind;
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

/// One line per recipient, in the current or the older confirmation wording.
static WHISPERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:You whisper to \S|Your whisper to \w+ was successful)").unwrap()
});

fn title_rules() -> Recognizer<()> {
    Recognizer::new()
        .ok(Matcher::prefix("Showing new"))
        .ok(Matcher::prefix("Changed title display times"))
        .ok(Matcher::prefix("Cleared titles"))
        .ok(Matcher::prefix("Reset title options"))
        .reject(Matcher::contains("Invalid chat component"), "malformed text component")
}

impl<T: Transport> CommandTranslator<T> {
    /// Broadcasts `message` to every player. Most consoles echo nothing back.
    pub async fn say(&self, message: &str) -> Result<()> {
        let message = require("message", message)?;
        let rules = Recognizer::new()
            .ok(Matcher::exact(""))
            .ok(Matcher::prefix("Broadcasting: "))
            .ok(Matcher::prefix("[Server]"));
        self.run(CommandLine::new("say").arg(message), &rules).await
    }

    /// Whispers `message` to `targets` and returns how many players received it.
    pub async fn message(&self, targets: &str, message: &str) -> Result<u32> {
        let targets = require("targets", targets)?;
        let message = require("message", message)?;
        let rules = Recognizer::new().accept(Matcher::pattern(&WHISPERED), |reply| {
            let count = reply
                .text()
                .lines()
                .filter(|line| WHISPERED.is_match(line.trim_start()))
                .count();
            u32::try_from(count).ok()
        });
        self.run(CommandLine::new("msg").arg(targets).arg(message), &rules)
            .await
    }

    /// Sends a JSON text component to `targets`. Success is silent.
    pub async fn tell_raw(&self, targets: &str, component: &str) -> Result<()> {
        let targets = require("targets", targets)?;
        let component = require("component", component)?;
        let rules = Recognizer::new()
            .ok(Matcher::exact(""))
            .reject(Matcher::contains("Invalid chat component"), "malformed text component")
            .reject(Matcher::prefix("Error"), "text component rejected");
        self.run(CommandLine::new("tellraw").arg(targets).arg(component), &rules)
            .await
    }

    pub async fn title(&self, targets: &str, component: &str) -> Result<()> {
        self.show(targets, TitleKind::Title, component).await
    }

    pub async fn subtitle(&self, targets: &str, component: &str) -> Result<()> {
        self.show(targets, TitleKind::Subtitle, component).await
    }

    pub async fn actionbar(&self, targets: &str, component: &str) -> Result<()> {
        self.show(targets, TitleKind::Actionbar, component).await
    }

    /// Sets fade-in, stay and fade-out durations, in ticks.
    pub async fn title_times(&self, targets: &str, fade_in: u32, stay: u32, fade_out: u32) -> Result<()> {
        let targets = require("targets", targets)?;
        self.run(times_line(targets, fade_in, stay, fade_out), &title_rules())
            .await
    }

    pub async fn title_clear(&self, targets: &str) -> Result<()> {
        let targets = require("targets", targets)?;
        self.run(CommandLine::new("title").arg(targets).arg("clear"), &title_rules())
            .await
    }

    pub async fn title_reset(&self, targets: &str) -> Result<()> {
        let targets = require("targets", targets)?;
        self.run(CommandLine::new("title").arg(targets).arg("reset"), &title_rules())
            .await
    }

    /// Sets the display times, then shows the title and the optional subtitle.
    pub async fn show_title(
        &self,
        targets: &str,
        title: &str,
        subtitle: Option<&str>,
        (fade_in, stay, fade_out): (u32, u32, u32),
    ) -> Result<()> {
        let targets = require("targets", targets)?;
        let title = require("title", title)?;
        let mut steps = vec![
            (times_line(targets, fade_in, stay, fade_out), title_rules()),
            (title_line(targets, TitleKind::Title, title), title_rules()),
        ];
        if let Some(subtitle) = subtitle {
            let subtitle = require("subtitle", subtitle)?;
            steps.push((title_line(targets, TitleKind::Subtitle, subtitle), title_rules()));
        }
        self.run_sequence(steps).await
    }

    async fn show(&self, targets: &str, kind: TitleKind, component: &str) -> Result<()> {
        let targets = require("targets", targets)?;
        let component = require("component", component)?;
        self.run(title_line(targets, kind, component), &title_rules())
            .await
    }
}

fn title_line(targets: &str, kind: TitleKind, component: &str) -> CommandLine {
    CommandLine::new("title").arg(targets).arg(kind).arg(component)
}

fn times_line(targets: &str, fade_in: u32, stay: u32, fade_out: u32) -> CommandLine {
    CommandLine::new("title")
        .arg(targets)
        .arg("times")
        .arg(fade_in)
        .arg(stay)
        .arg(fade_out)
}
