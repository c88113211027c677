//! Custom boss bars.

use crate::command::{require, require_token, CommandLine};
use crate::error::Result;
use crate::reply::{split_bracketed_list, split_list, Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::{BossbarData, BossbarProperty, BossbarSetting};
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static MAXIMUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"has a maximum of (-?\d+)$").unwrap());
static VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"has a value of (-?\d+)$").unwrap());
static SHOWN: Lazy<Regex> = Lazy::new(|| Regex::new(r"is currently (shown|hidden)$").unwrap());
static ONLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)has \d+ players?(?:\(s\))? currently online:\s*(.*)$").unwrap());
static LEGACY_DATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s) has the following bossbar data: (.*)$").unwrap());
static BARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^There (?:are|is) \d+ custom bossbars?(?:\(s\))? active:\s*(.*)$").unwrap()
});

const MISSING: &str = "No bossbar exists with the ID";

impl<T: Transport> CommandTranslator<T> {
    /// Creates a bar. `name` is a JSON text component.
    pub async fn bossbar_add(&self, id: &str, name: &str) -> Result<()> {
        let id = require_token("id", id)?;
        let name = require("name", name)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Created custom bossbar"))
            .reject(Matcher::prefix("A bossbar already exists"), "bossbar already exists");
        self.run(CommandLine::new("bossbar add").arg(id).arg(name), &rules)
            .await
    }

    pub async fn bossbar_get(&self, id: &str, property: BossbarProperty) -> Result<BossbarData> {
        let id = require_token("id", id)?;
        let rules = Recognizer::new().reject(Matcher::prefix(MISSING), "unknown bossbar");
        let rules = match property {
            BossbarProperty::Max => rules
                .accept(Matcher::pattern(&MAXIMUM), |reply| reply.parse(1).map(BossbarData::Max))
                .accept(Matcher::pattern(&LEGACY_DATA), |reply| reply.parse(1).map(BossbarData::Max)),
            BossbarProperty::Value => rules
                .accept(Matcher::pattern(&VALUE), |reply| reply.parse(1).map(BossbarData::Value))
                .accept(Matcher::pattern(&LEGACY_DATA), |reply| reply.parse(1).map(BossbarData::Value)),
            BossbarProperty::Visible => rules
                .accept(Matcher::pattern(&SHOWN), |reply| {
                    Some(BossbarData::Visible(reply.group(1)? == "shown"))
                })
                .accept(Matcher::pattern(&LEGACY_DATA), |reply| reply.parse(1).map(BossbarData::Visible)),
            BossbarProperty::Players => rules
                .accept(Matcher::contains("has no players currently online"), |_| {
                    Some(BossbarData::Players(Vec::new()))
                })
                .accept(Matcher::pattern(&ONLINE), |reply| {
                    Some(BossbarData::Players(split_list(reply.group(1)?)))
                })
                .accept(Matcher::pattern(&LEGACY_DATA), |reply| {
                    Some(BossbarData::Players(split_list(reply.group(1)?)))
                }),
        };
        self.run(CommandLine::new("bossbar get").arg(id).arg(property), &rules)
            .await
    }

    pub async fn bossbar_list(&self) -> Result<Vec<String>> {
        let rules = Recognizer::new()
            .accept(Matcher::prefix("There are no custom bossbars"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&BARS), |reply| {
                Some(split_bracketed_list(reply.group(1).unwrap_or_default()))
            });
        self.run(CommandLine::new("bossbar list"), &rules).await
    }

    pub async fn bossbar_remove(&self, id: &str) -> Result<()> {
        let id = require_token("id", id)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Removed custom bossbar"))
            .reject(Matcher::prefix(MISSING), "unknown bossbar");
        self.run(CommandLine::new("bossbar remove").arg(id), &rules)
            .await
    }

    pub async fn bossbar_set(&self, id: &str, setting: &BossbarSetting) -> Result<()> {
        let id = require_token("id", id)?;
        setting.check()?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix(MISSING), "unknown bossbar")
            .reject(Matcher::prefix("Nothing changed"), "bossbar already has that setting")
            .ok(Matcher::prefix("Custom bossbar"));
        self.run(CommandLine::new("bossbar set").arg(id).arg(setting), &rules)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::types::{BossbarColor, BossbarData, BossbarProperty, BossbarSetting};

    #[tokio::test]
    async fn test_bossbar_add_and_remove() {
        let console = answering("bossbar add demo:bar \"Boss\"", "Created custom bossbar [Boss]");
        console.bossbar_add("demo:bar", "\"Boss\"").await.unwrap();

        let console = always("No bossbar exists with the ID 'demo:ghost'");
        assert!(console.bossbar_remove("demo:ghost").await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_bossbar_get_properties() {
        let console = answering("bossbar get demo:bar max", "Custom bossbar [Boss] has a maximum of 100");
        assert_eq!(
            console.bossbar_get("demo:bar", BossbarProperty::Max).await.unwrap(),
            BossbarData::Max(100)
        );

        let console = answering("bossbar get demo:bar visible", "Custom bossbar [Boss] is currently hidden");
        assert_eq!(
            console.bossbar_get("demo:bar", BossbarProperty::Visible).await.unwrap(),
            BossbarData::Visible(false)
        );

        let console = answering(
            "bossbar get demo:bar players",
            "Custom bossbar [Boss] has 2 player(s) currently online: Steve, Alex",
        );
        assert_eq!(
            console.bossbar_get("demo:bar", BossbarProperty::Players).await.unwrap(),
            BossbarData::Players(vec!["Steve".into(), "Alex".into()])
        );

        let console = answering("bossbar get demo:bar value", "demo:bar has the following bossbar data: 42");
        assert_eq!(
            console.bossbar_get("demo:bar", BossbarProperty::Value).await.unwrap(),
            BossbarData::Value(42)
        );
    }

    #[tokio::test]
    async fn test_bossbar_list() {
        let console = answering("bossbar list", "There are 2 custom bossbar(s) active: [Boss], [Timer]");
        assert_eq!(console.bossbar_list().await.unwrap(), vec!["Boss", "Timer"]);

        let console = answering("bossbar list", "There are no custom bossbars active");
        assert!(console.bossbar_list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bossbar_set_renders_settings() {
        let console = always("Custom bossbar [Boss] has changed color");
        console
            .bossbar_set("demo:bar", &BossbarSetting::Color(BossbarColor::Red))
            .await
            .unwrap();
        console
            .bossbar_set("demo:bar", &BossbarSetting::Players(vec!["Steve".into(), "Alex".into()]))
            .await
            .unwrap();
        console
            .bossbar_set("demo:bar", &BossbarSetting::Players(Vec::new()))
            .await
            .unwrap();
        assert_eq!(
            console.transport().commands(),
            vec![
                "bossbar set demo:bar color red",
                "bossbar set demo:bar players Steve Alex",
                "bossbar set demo:bar players",
            ]
        );

        assert!(console
            .bossbar_set("demo:bar", &BossbarSetting::Max(0))
            .await
            .unwrap_err()
            .is_validation());
    }

    #[tokio::test]
    async fn test_bossbar_set_unchanged() {
        let console = always("Nothing changed. That's already the color of this bossbar");
        assert!(console
            .bossbar_set("demo:bar", &BossbarSetting::Color(BossbarColor::Blue))
            .await
            .unwrap_err()
            .is_domain());
    }
}
