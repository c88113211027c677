//! Difficulty, game modes, game rules, time and weather.

use crate::command::{require_opt, require_token, CommandLine};
use crate::error::Result;
use crate::reply::{Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::{Difficulty, GameMode, GameRuleValue, TimeAmount, TimeQuery, TimeSetting, Weather};
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static DIFFICULTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^The difficulty is (\w+)").unwrap());
static GAME_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Gamerule \S+ is (?:currently|now) set to: (.+)$").unwrap());
static GAME_RULE_LEGACY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Game rule |The value of )\S+ (?:is|has been)(?: set to| updated to)?:? (.+)$").unwrap()
});
static TIME_SET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Set the time to (-?\d+)").unwrap());
static TIME_IS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^The time is (-?\d+)").unwrap());
static WEATHER_STATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^The current weather state is (\w+)$").unwrap());

impl<T: Transport> CommandTranslator<T> {
    pub async fn set_difficulty(&self, difficulty: Difficulty) -> Result<()> {
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Changed the difficulty to"))
            .ok(Matcher::prefix("The difficulty has been set to"))
            .reject(Matcher::prefix("The difficulty did not change"), "difficulty already set");
        self.run(CommandLine::new("difficulty").arg(difficulty), &rules)
            .await
    }

    pub async fn query_difficulty(&self) -> Result<Difficulty> {
        let rules = Recognizer::new().accept(Matcher::pattern(&DIFFICULTY), |reply| reply.parse(1));
        self.run(CommandLine::new("difficulty"), &rules).await
    }

    pub async fn set_default_game_mode(&self, mode: GameMode) -> Result<()> {
        let rules = Recognizer::new()
            .ok(Matcher::prefix("The default game mode is now"))
            .ok(Matcher::prefix("Changed the default game mode"));
        self.run(CommandLine::new("defaultgamemode").arg(mode), &rules)
            .await
    }

    /// Changes the game mode of `target`. Players already in that mode
    /// produce no feedback, reported as a domain error.
    pub async fn set_game_mode(&self, mode: GameMode, target: Option<&str>) -> Result<()> {
        let target = require_opt("target", target)?;
        let rules = Recognizer::new()
            .ok(Matcher::contains("game mode"))
            .reject(Matcher::exact(""), "no player changed game mode");
        self.run(CommandLine::new("gamemode").arg(mode).opt(target), &rules)
            .await
    }

    /// Sets a game rule when `value` is given, otherwise queries it.
    /// Returns the rule's value as the console reports it.
    pub async fn game_rule(&self, rule: &str, value: Option<GameRuleValue>) -> Result<String> {
        let rule = require_token("rule", rule)?;
        let command = CommandLine::new("gamerule").arg(rule).opt(value);
        let rules = Recognizer::new()
            .reject(Matcher::prefix("No game rule called"), "unknown game rule")
            .accept(Matcher::pattern(&GAME_RULE), |reply| reply.owned(1))
            .accept(Matcher::pattern(&GAME_RULE_LEGACY), |reply| reply.owned(1));
        self.run(command, &rules).await
    }

    /// Sets the time of day and returns the resulting day time.
    pub async fn time_set(&self, time: TimeSetting) -> Result<i64> {
        if let TimeSetting::Amount(amount) = &time {
            amount.check("time")?;
        }
        self.run(CommandLine::new("time set").arg(time), &time_rules())
            .await
    }

    /// Advances the time and returns the resulting day time.
    pub async fn time_add(&self, amount: TimeAmount) -> Result<i64> {
        amount.check("amount")?;
        self.run(CommandLine::new("time add").arg(amount), &time_rules())
            .await
    }

    pub async fn query_time(&self, query: TimeQuery) -> Result<i64> {
        let rules = Recognizer::new().accept(Matcher::pattern(&TIME_IS), |reply| reply.parse(1));
        self.run(CommandLine::new("time query").arg(query), &rules)
            .await
    }

    pub async fn set_weather(&self, weather: Weather, duration: Option<TimeAmount>) -> Result<()> {
        if let Some(duration) = &duration {
            duration.check("duration")?;
        }
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Set the weather to"))
            .ok(Matcher::prefix("Changed the weather to"))
            .ok(Matcher::prefix("Changing to"));
        self.run(CommandLine::new("weather").arg(weather).opt(duration), &rules)
            .await
    }

    /// Queries the current weather. Only consoles that implement `weather query` answer this.
    pub async fn query_weather(&self) -> Result<Weather> {
        let rules = Recognizer::new().accept(Matcher::pattern(&WEATHER_STATE), |reply| reply.parse(1));
        self.run(CommandLine::new("weather query"), &rules).await
    }
}

fn time_rules() -> Recognizer<i64> {
    Recognizer::new().accept(Matcher::pattern(&TIME_SET), |reply| reply.parse(1))
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::types::{Difficulty, GameMode, GameRuleValue, TimeAmount, TimeOfDay, TimeQuery, TimeSetting, Weather};

    #[tokio::test]
    async fn test_set_difficulty_success() {
        let console = answering("difficulty hard", "Changed the difficulty to hard");
        console.set_difficulty(Difficulty::Hard).await.unwrap();

        let console = answering("difficulty peaceful", "The difficulty has been set to Peaceful");
        let level = "p".parse::<Difficulty>().unwrap();
        console.set_difficulty(level).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_difficulty_unchanged() {
        let console = answering("difficulty easy", "The difficulty did not change; it is already set to Easy");
        assert!(console.set_difficulty(Difficulty::Easy).await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_query_difficulty() {
        let console = answering("difficulty", "The difficulty is Normal");
        assert_eq!(console.query_difficulty().await.unwrap(), Difficulty::Normal);
    }

    #[tokio::test]
    async fn test_game_modes() {
        let console = answering("gamemode creative Steve", "Set Steve's game mode to Creative Mode");
        console.set_game_mode(GameMode::Creative, Some("Steve")).await.unwrap();

        let console = answering("gamemode survival @a", "");
        assert!(console
            .set_game_mode(GameMode::Survival, Some("@a"))
            .await
            .unwrap_err()
            .is_domain());

        let console = answering("defaultgamemode adventure", "The default game mode is now Adventure Mode");
        console.set_default_game_mode(GameMode::Adventure).await.unwrap();
    }

    #[tokio::test]
    async fn test_game_rule_set_and_query() {
        let console = answering("gamerule keepInventory true", "Gamerule keepInventory is now set to: true");
        let value = console
            .game_rule("keepInventory", Some(GameRuleValue::from(true)))
            .await
            .unwrap();
        assert_eq!(value, "true");

        let console = answering("gamerule randomTickSpeed", "Gamerule randomTickSpeed is currently set to: 3");
        assert_eq!(console.game_rule("randomTickSpeed", None).await.unwrap(), "3");

        let console = always("No game rule called 'fooBar'");
        assert!(console.game_rule("fooBar", None).await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_time() {
        let console = answering("time set noon", "Set the time to 6000");
        assert_eq!(console.time_set(TimeSetting::Named(TimeOfDay::Noon)).await.unwrap(), 6000);

        let console = answering("time add 20s", "Set the time to 6400");
        assert_eq!(console.time_add(TimeAmount::Seconds(20.0)).await.unwrap(), 6400);

        let console = answering("time query gametime", "The time is 123456");
        assert_eq!(console.query_time(TimeQuery::GameTime).await.unwrap(), 123456);

        assert!(console.time_add(TimeAmount::Days(-1.0)).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_weather() {
        let console = answering("weather rain 600", "Set the weather to rain");
        console.set_weather(Weather::Rain, Some(TimeAmount::Ticks(600))).await.unwrap();

        let console = answering("weather query", "The current weather state is thunder");
        assert_eq!(console.query_weather().await.unwrap(), Weather::Thunder);
    }
}
