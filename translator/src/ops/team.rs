//! Team management.

use crate::command::{require, require_opt, require_token, text_component, CommandLine};
use crate::error::Result;
use crate::reply::{split_bracketed_list, split_list, Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::TeamOption;
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static TEAMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^There (?:are|is) \d+ teams?(?:\(s\))?:\s*(.*)$").unwrap());
static MEMBERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^Team .+ has \d+ members?(?:\(s\))?:\s*(.*)$").unwrap());
static EMPTIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Removed (\d+) members?(?:\(s\))? from team").unwrap());
static INVISIBLES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Team .+ can (?:now|no longer) see invisible teammates").unwrap());

fn team_rules() -> Recognizer<()> {
    Recognizer::new()
        .reject(Matcher::prefix("Unknown team"), "unknown team")
        .reject(Matcher::prefix("No team was found"), "unknown team")
        .reject(Matcher::prefix("Nothing changed"), "team already in that state")
        .reject(Matcher::prefix("Team option is the same as current"), "team already in that state")
}

impl<T: Transport> CommandTranslator<T> {
    pub async fn team_list(&self) -> Result<Vec<String>> {
        let rules = Recognizer::new()
            .accept(Matcher::prefix("There are no teams"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&TEAMS), |reply| {
                Some(split_bracketed_list(reply.group(1).unwrap_or_default()))
            });
        self.run(CommandLine::new("team list"), &rules).await
    }

    pub async fn team_members(&self, team: &str) -> Result<Vec<String>> {
        let team = require_token("team", team)?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Unknown team"), "unknown team")
            .reject(Matcher::prefix("No team was found"), "unknown team")
            .accept(Matcher::prefix("There are no members"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&MEMBERS), |reply| {
                Some(split_list(reply.group(1).unwrap_or_default()))
            });
        self.run(CommandLine::new("team list").arg(team), &rules).await
    }

    pub async fn team_add(&self, team: &str, display_name: Option<&str>) -> Result<()> {
        let team = require_token("team", team)?;
        let display_name = require_opt("display name", display_name)?.map(text_component);
        let rules = team_rules()
            .ok(Matcher::prefix("Created team"))
            .reject(Matcher::prefix("A team already exists"), "team already exists")
            .reject(Matcher::prefix("A team with the name"), "team already exists");
        self.run(CommandLine::new("team add").arg(team).opt(display_name), &rules)
            .await
    }

    pub async fn team_remove(&self, team: &str) -> Result<()> {
        let team = require_token("team", team)?;
        let rules = team_rules().ok(Matcher::prefix("Removed team"));
        self.run(CommandLine::new("team remove").arg(team), &rules).await
    }

    /// Removes every member of `team` and returns how many were removed.
    pub async fn team_empty(&self, team: &str) -> Result<u32> {
        let team = require_token("team", team)?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Unknown team"), "unknown team")
            .reject(Matcher::prefix("Nothing changed"), "team is already empty")
            .accept(Matcher::pattern(&EMPTIED), |reply| reply.parse(1));
        self.run(CommandLine::new("team empty").arg(team), &rules).await
    }

    /// Adds `members` to `team`. Without members the command applies to its
    /// executor, which a console cannot be.
    pub async fn team_join(&self, team: &str, members: Option<&str>) -> Result<()> {
        let team = require_token("team", team)?;
        let members = require_opt("members", members)?;
        let rules = team_rules().ok(Matcher::prefix("Added"));
        self.run(CommandLine::new("team join").arg(team).opt(members), &rules)
            .await
    }

    pub async fn team_leave(&self, members: &str) -> Result<()> {
        let members = require("members", members)?;
        let rules = team_rules().ok(Matcher::prefix("Removed"));
        self.run(CommandLine::new("team leave").arg(members), &rules)
            .await
    }

    pub async fn team_modify(&self, team: &str, option: &TeamOption) -> Result<()> {
        let team = require_token("team", team)?;
        match option {
            TeamOption::DisplayName(text) | TeamOption::Prefix(text) | TeamOption::Suffix(text) => {
                require("text", text)?;
            }
            _ => {}
        }
        let rules = team_rules()
            .ok(Matcher::prefix("Updated"))
            .ok(Matcher::prefix("Set"))
            .ok(Matcher::prefix("Team prefix set to"))
            .ok(Matcher::prefix("Team suffix set to"))
            .ok(Matcher::pattern(&INVISIBLES))
            .ok(Matcher::prefix("Enabled friendly fire"))
            .ok(Matcher::prefix("Disabled friendly fire"))
            .ok(Matcher::prefix("Friendly fire is now"))
            .ok(Matcher::prefix("Nametag visibility"))
            .ok(Matcher::prefix("Death message visibility"))
            .ok(Matcher::prefix("Collision rule"));
        self.run(CommandLine::new("team modify").arg(team).arg(option), &rules)
            .await
    }
}
