//! Scoreboard objectives and player scores.

use crate::command::{require, require_at_least, require_opt, require_token, text_component, CommandLine};
use crate::error::{CommandError, Result};
use crate::reply::{split_bracketed_list, split_list, Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::{RenderType, ScoreOperation, ScoreOperator, ScorePlayer, ScoreboardObjective};
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static OBJECTIVES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^There (?:are|is) \d+ objectives?(?:\(s\))?:\s*(.*)$").unwrap());
static TRACKED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^There (?:are|is) \d+ tracked (?:entity|entities|entity/entities):\s*(.*)$").unwrap()
});
static SCORES_OF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^.+ has \d+ scores?(?:\(s\))?:\s*(.*)$").unwrap());
static SCORE_ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]: (-?\d+)").unwrap());
static SCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+ has (-?\d+) \[.+\]$").unwrap());

fn score_change_rules() -> Recognizer<()> {
    Recognizer::new()
        .ok(Matcher::prefix("Set"))
        .ok(Matcher::prefix("Added"))
        .ok(Matcher::prefix("Removed"))
        .ok(Matcher::prefix("Reset"))
        .reject(Matcher::prefix("Unknown scoreboard objective"), "unknown objective")
        .reject(Matcher::contains("is read-only"), "objective is read-only")
        .reject(Matcher::prefix("Can't get value"), "no score is set")
}

fn objective_rules() -> Recognizer<()> {
    Recognizer::new()
        .ok(Matcher::prefix("Created new objective"))
        .ok(Matcher::prefix("Removed objective"))
        .ok(Matcher::prefix("Changed the display name"))
        .ok(Matcher::prefix("Changed the render type"))
        .ok(Matcher::prefix("Set display slot"))
        .ok(Matcher::prefix("Cleared any objectives in display slot"))
        .reject(Matcher::prefix("An objective already exists"), "objective already exists")
        .reject(Matcher::prefix("Unknown scoreboard objective"), "unknown objective")
        .reject(Matcher::prefix("Nothing changed"), "display slot already in that state")
}

impl<T: Transport> CommandTranslator<T> {
    pub async fn scoreboard_objectives_list(&self) -> Result<Vec<String>> {
        let rules = Recognizer::new()
            .accept(Matcher::prefix("There are no objectives"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&OBJECTIVES), |reply| {
                Some(split_bracketed_list(reply.group(1).unwrap_or_default()))
            });
        self.run(CommandLine::new("scoreboard objectives list"), &rules)
            .await
    }

    pub async fn scoreboard_objectives_add(&self, name: &str, criteria: &str, display_name: Option<&str>) -> Result<()> {
        let name = require_token("objective", name)?;
        let criteria = require_token("criteria", criteria)?;
        let display_name = require_opt("display name", display_name)?.map(text_component);
        let command = CommandLine::new("scoreboard objectives add")
            .arg(name)
            .arg(criteria)
            .opt(display_name);
        self.run(command, &objective_rules()).await
    }

    pub async fn scoreboard_objectives_remove(&self, name: &str) -> Result<()> {
        let name = require_token("objective", name)?;
        self.run(CommandLine::new("scoreboard objectives remove").arg(name), &objective_rules())
            .await
    }

    /// Shows `objective` in `slot`, or clears the slot when no objective is given.
    pub async fn scoreboard_objectives_setdisplay(&self, slot: &str, objective: Option<&str>) -> Result<()> {
        let slot = require_token("slot", slot)?;
        let objective = objective.map(|o| require_token("objective", o)).transpose()?;
        let command = CommandLine::new("scoreboard objectives setdisplay").arg(slot).opt(objective);
        self.run(command, &objective_rules()).await
    }

    /// `display_name` is a JSON text component, passed through verbatim.
    pub async fn scoreboard_objectives_modify_displayname(&self, objective: &str, display_name: &str) -> Result<()> {
        let objective = require_token("objective", objective)?;
        let display_name = text_component(require("display name", display_name)?);
        let command = CommandLine::new("scoreboard objectives modify")
            .arg(objective)
            .arg("displayname")
            .arg(display_name);
        self.run(command, &objective_rules()).await
    }

    pub async fn scoreboard_objectives_modify_rendertype(&self, objective: &str, render_type: RenderType) -> Result<()> {
        let objective = require_token("objective", objective)?;
        let command = CommandLine::new("scoreboard objectives modify")
            .arg(objective)
            .arg("rendertype")
            .arg(render_type);
        self.run(command, &objective_rules()).await
    }

    /// Without a target, lists every tracked score holder. With one, lists
    /// that holder's scores as `objective: value` entries.
    pub async fn scoreboard_players_list(&self, target: Option<&str>) -> Result<Vec<String>> {
        let target = require_opt("target", target)?;
        let rules = Recognizer::new()
            .accept(Matcher::prefix("There are no tracked"), |_| Some(Vec::new()))
            .accept(Matcher::contains("has no scores"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&TRACKED), |reply| {
                Some(split_list(reply.group(1).unwrap_or_default()))
            })
            .accept(Matcher::pattern(&SCORES_OF), |reply| {
                let entries = reply.group(1).unwrap_or_default();
                Some(
                    SCORE_ENTRY
                        .captures_iter(entries)
                        .map(|c| format!("{}: {}", &c[1], &c[2]))
                        .collect(),
                )
            });
        self.run(CommandLine::new("scoreboard players list").opt(target), &rules)
            .await
    }

    pub async fn scoreboard_players_get(&self, target: &str, objective: &str) -> Result<i32> {
        let target = require("target", target)?;
        let objective = require_token("objective", objective)?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Can't get value"), "no score is set")
            .reject(Matcher::prefix("Unknown scoreboard objective"), "unknown objective")
            .accept(Matcher::pattern(&SCORE), |reply| reply.parse(1));
        self.run(CommandLine::new("scoreboard players get").arg(target).arg(objective), &rules)
            .await
    }

    pub async fn scoreboard_players_set(&self, targets: &str, objective: &str, score: i32) -> Result<()> {
        self.score_change("set", targets, objective, score).await
    }

    pub async fn scoreboard_players_add(&self, targets: &str, objective: &str, amount: i32) -> Result<()> {
        require_at_least("amount", amount, 0)?;
        self.score_change("add", targets, objective, amount).await
    }

    pub async fn scoreboard_players_remove(&self, targets: &str, objective: &str, amount: i32) -> Result<()> {
        require_at_least("amount", amount, 0)?;
        self.score_change("remove", targets, objective, amount).await
    }

    /// Resets one objective for the targets, or all of their scores.
    pub async fn scoreboard_players_reset(&self, targets: &str, objective: Option<&str>) -> Result<()> {
        let targets = require("targets", targets)?;
        let objective = objective.map(|o| require_token("objective", o)).transpose()?;
        let command = CommandLine::new("scoreboard players reset").arg(targets).opt(objective);
        self.run(command, &score_change_rules()).await
    }

    pub async fn scoreboard_players_enable(&self, targets: &str, objective: &str) -> Result<()> {
        let targets = require("targets", targets)?;
        let objective = require_token("objective", objective)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Enabled trigger"))
            .reject(Matcher::contains("is not a trigger"), "objective is not a trigger")
            .reject(Matcher::prefix("Trigger is already enabled"), "trigger already enabled");
        self.run(CommandLine::new("scoreboard players enable").arg(targets).arg(objective), &rules)
            .await
    }

    /// Applies `operator` to the targets' scores using the source holders' scores.
    pub async fn scoreboard_players_operation(
        &self,
        targets: &str,
        objective: &str,
        operator: ScoreOperator,
        source: &str,
        source_objective: &str,
    ) -> Result<()> {
        let targets = require("targets", targets)?;
        let objective = require_token("objective", objective)?;
        let source = require("source", source)?;
        let source_objective = require_token("source objective", source_objective)?;
        let command = CommandLine::new("scoreboard players operation")
            .arg(targets)
            .arg(objective)
            .arg(operator)
            .arg(source)
            .arg(source_objective);
        self.run(command, &score_change_rules()).await
    }

    /// Creates an objective from its structured form.
    pub async fn scoreboard_add_objective(&self, objective: &ScoreboardObjective) -> Result<()> {
        self.scoreboard_objectives_add(&objective.name, &objective.criteria, objective.display_name.as_deref())
            .await
    }

    /// Applies `operation` to a structured score holder. `Set`, `Add` and
    /// `Remove` take their amount from `player.score`.
    pub async fn scoreboard_apply(&self, player: &ScorePlayer, operation: ScoreOperation) -> Result<()> {
        let amount = || {
            player
                .score
                .ok_or_else(|| CommandError::validation("score", format!("required for {operation:?}")))
        };
        match operation {
            ScoreOperation::Set => self.scoreboard_players_set(&player.name, &player.objective, amount()?).await,
            ScoreOperation::Add => self.scoreboard_players_add(&player.name, &player.objective, amount()?).await,
            ScoreOperation::Remove => {
                self.scoreboard_players_remove(&player.name, &player.objective, amount()?)
                    .await
            }
            ScoreOperation::Reset => self.scoreboard_players_reset(&player.name, Some(&player.objective)).await,
            ScoreOperation::Enable => self.scoreboard_players_enable(&player.name, &player.objective).await,
        }
    }

    async fn score_change(&self, verb: &str, targets: &str, objective: &str, value: i32) -> Result<()> {
        let targets = require("targets", targets)?;
        let objective = require_token("objective", objective)?;
        let command = CommandLine::new("scoreboard players")
            .arg(verb)
            .arg(targets)
            .arg(objective)
            .arg(value);
        self.run(command, &score_change_rules()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::types::{RenderType, ScoreOperation, ScoreOperator, ScorePlayer, ScoreboardObjective};

    #[tokio::test]
    async fn test_objectives_list_split() {
        let console = answering(
            "scoreboard objectives list",
            "There are 3 objective(s): [kills], [deaths], [Health]",
        );
        assert_eq!(
            console.scoreboard_objectives_list().await.unwrap(),
            vec!["kills", "deaths", "Health"]
        );

        let console = answering("scoreboard objectives list", "There are no objectives");
        assert!(console.scoreboard_objectives_list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_objectives_add_and_duplicate() {
        let console = answering("scoreboard objectives add kills playerKillCount", "Created new objective [kills]");
        console.scoreboard_objectives_add("kills", "playerKillCount", None).await.unwrap();

        let console = answering(
            "scoreboard objectives add deaths deathCount \"Death Count\"",
            "Created new objective [Death Count]",
        );
        console
            .scoreboard_objectives_add("deaths", "deathCount", Some("Death Count"))
            .await
            .unwrap();

        let console = always("An objective already exists by that name");
        let objective = ScoreboardObjective {
            name: "kills".into(),
            criteria: "playerKillCount".into(),
            display_name: Some("{\"text\":\"Kills\"}".into()),
        };
        assert!(console.scoreboard_add_objective(&objective).await.unwrap_err().is_domain());
        assert_eq!(
            console.transport().last_command().as_deref(),
            Some("scoreboard objectives add kills playerKillCount {\"text\":\"Kills\"}")
        );
    }

    #[tokio::test]
    async fn test_objective_names_validated() {
        let console = always("Created new objective [x]");
        assert!(console
            .scoreboard_objectives_add("two words", "dummy", None)
            .await
            .unwrap_err()
            .is_validation());
        assert!(console.scoreboard_objectives_remove("").await.unwrap_err().is_validation());
        assert_eq!(console.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_setdisplay_and_modify() {
        let console = always("Set display slot sidebar to show objective kills");
        console.scoreboard_objectives_setdisplay("sidebar", Some("kills")).await.unwrap();

        let console = always("Changed the render type of objective [Health]");
        console
            .scoreboard_objectives_modify_rendertype("Health", RenderType::Hearts)
            .await
            .unwrap();
        assert_eq!(
            console.transport().commands(),
            vec!["scoreboard objectives modify Health rendertype hearts"]
        );
    }

    #[tokio::test]
    async fn test_players_list_forms() {
        let console = answering(
            "scoreboard players list",
            "There are 2 tracked entity/entities: Steve, Alex",
        );
        assert_eq!(console.scoreboard_players_list(None).await.unwrap(), vec!["Steve", "Alex"]);

        let console = answering(
            "scoreboard players list Steve",
            "Steve has 2 score(s):\n[kills]: 5\n[deaths]: -1",
        );
        assert_eq!(
            console.scoreboard_players_list(Some("Steve")).await.unwrap(),
            vec!["kills: 5", "deaths: -1"]
        );
    }

    #[tokio::test]
    async fn test_players_get() {
        let console = answering("scoreboard players get Steve kills", "Steve has 12 [kills]");
        assert_eq!(console.scoreboard_players_get("Steve", "kills").await.unwrap(), 12);

        let console = answering("scoreboard players get Alex kills", "Can't get value of kills for Alex; none is set");
        assert!(console.scoreboard_players_get("Alex", "kills").await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_players_changes() {
        let console = always("Added 5 to [kills] for Steve (now 17)");
        console.scoreboard_players_add("Steve", "kills", 5).await.unwrap();
        assert!(console.scoreboard_players_add("Steve", "kills", -5).await.unwrap_err().is_validation());

        let console = always("Set [kills] for Steve to 17");
        console
            .scoreboard_players_operation("Steve", "kills", ScoreOperator::Add, "Alex", "kills")
            .await
            .unwrap();
        assert_eq!(
            console.transport().commands(),
            vec!["scoreboard players operation Steve kills += Alex kills"]
        );
    }

    #[tokio::test]
    async fn test_structured_score_player() {
        let console = always("Set [kills] for Steve to 3");
        let player = ScorePlayer {
            name: "Steve".into(),
            objective: "kills".into(),
            score: Some(3),
        };
        console.scoreboard_apply(&player, ScoreOperation::Set).await.unwrap();

        let unscored = ScorePlayer { score: None, ..player };
        assert!(console
            .scoreboard_apply(&unscored, ScoreOperation::Add)
            .await
            .unwrap_err()
            .is_validation());

        let console = always("Reset [kills] for Steve");
        console.scoreboard_apply(&unscored, ScoreOperation::Reset).await.unwrap();
        assert_eq!(
            console.transport().commands(),
            vec!["scoreboard players reset Steve kills"]
        );
    }
}
