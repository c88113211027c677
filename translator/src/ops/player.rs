//! Player progression and inventory: experience, items, advancements, recipes, loot.

use crate::command::{require, require_at_least, require_opt, require_token, CommandLine};
use crate::error::Result;
use crate::reply::{Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::{AdvancementAction, AdvancementSelection, ExperienceKind, LootSource, Position, RecipeAction, TriggerAction};
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static XP_QUERY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+ has (-?\d+) experience (?:points|levels)").unwrap());
static ITEMS_REMOVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Removed|Found) (\d+) (?:matching )?items?(?:\(s\))?|(\d+) items cleared from").unwrap()
});
static RECIPES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) recipes?").unwrap());
static DROPPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Dropped (\d+)").unwrap());

fn loot_rules() -> Recognizer<u32> {
    Recognizer::new()
        .reject(Matcher::prefix("Failed"), "loot could not be generated")
        .reject(Matcher::contains("can't hold any items"), "entity cannot hold items")
        .reject(Matcher::contains("has no loot table"), "entity has no loot table")
        .accept(Matcher::pattern(&DROPPED), |reply| reply.parse(1))
}

impl<T: Transport> CommandTranslator<T> {
    pub async fn experience_add(&self, targets: &str, amount: i32, kind: ExperienceKind) -> Result<()> {
        let targets = require("targets", targets)?;
        let command = CommandLine::new("experience add").arg(targets).arg(amount).arg(kind);
        self.run(command, &experience_rules("Gave")).await
    }

    pub async fn experience_set(&self, targets: &str, amount: i32, kind: ExperienceKind) -> Result<()> {
        let targets = require("targets", targets)?;
        require_at_least("amount", amount, 0)?;
        let command = CommandLine::new("experience set").arg(targets).arg(amount).arg(kind);
        self.run(command, &experience_rules("Set")).await
    }

    /// Experience points or levels held by a single player.
    pub async fn experience_query(&self, target: &str, kind: ExperienceKind) -> Result<i32> {
        let target = require("target", target)?;
        let rules = Recognizer::new().accept(Matcher::pattern(&XP_QUERY), |reply| reply.parse(1));
        self.run(CommandLine::new("experience query").arg(target).arg(kind), &rules)
            .await
    }

    pub async fn give(&self, targets: &str, item: &str, count: Option<u32>) -> Result<()> {
        let targets = require("targets", targets)?;
        let item = require("item", item)?;
        if let Some(count) = count {
            require_at_least("count", count, 1)?;
        }
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Gave"))
            .ok(Matcher::prefix("Given"))
            .reject(Matcher::prefix("Can't give more than"), "count exceeds the give limit")
            .reject(Matcher::prefix("Unknown item"), "unknown item");
        self.run(CommandLine::new("give").arg(targets).arg(item).opt(count), &rules)
            .await
    }

    /// Clears items and returns how many were removed. A `max_count` of `0`
    /// only counts matching items.
    pub async fn clear(&self, targets: Option<&str>, item: Option<&str>, max_count: Option<u32>) -> Result<u32> {
        let targets = require_opt("targets", targets)?;
        let item = require_opt("item", item)?;
        let command = CommandLine::new("clear").chain(&[
            ("targets", targets.map(str::to_string)),
            ("item", item.map(str::to_string)),
            ("max count", max_count.map(|c| c.to_string())),
        ])?;
        let rules = Recognizer::new()
            .accept(Matcher::prefix("No items were"), |_| Some(0))
            .accept(Matcher::pattern(&ITEMS_REMOVED), |reply| reply.parse_first(&[1, 2]));
        self.run(command, &rules).await
    }

    /// Puts `item` into an entity's inventory `slot`.
    pub async fn item_replace_entity(&self, targets: &str, slot: &str, item: &str, count: Option<u32>) -> Result<()> {
        let targets = require("targets", targets)?;
        let slot = require_token("slot", slot)?;
        let item = require("item", item)?;
        if let Some(count) = count {
            require_at_least("count", count, 1)?;
        }
        let command = CommandLine::new("item replace entity")
            .arg(targets)
            .arg(slot)
            .arg("with")
            .arg(item)
            .opt(count);
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Replaced"))
            .reject(Matcher::contains("does not have slot"), "target lacks that slot")
            .reject(Matcher::contains("doesn't have the specified slot"), "target lacks that slot")
            .reject(Matcher::contains("exceeds the stack limit"), "count exceeds the stack limit")
            .reject(Matcher::prefix("No targets accepted"), "no target accepted the item");
        self.run(command, &rules).await
    }

    pub async fn advancement(&self, action: AdvancementAction, targets: &str, selection: &AdvancementSelection) -> Result<()> {
        let targets = require("targets", targets)?;
        let command = CommandLine::new("advancement").arg(action).arg(targets);
        let command = match selection {
            AdvancementSelection::Everything => command.arg("everything"),
            AdvancementSelection::Only {
                advancement,
                criterion,
            } => command
                .arg("only")
                .arg(require("advancement", advancement)?)
                .opt(require_opt("criterion", criterion.as_deref())?),
            AdvancementSelection::From(advancement) => command.arg("from").arg(require("advancement", advancement)?),
            AdvancementSelection::Through(advancement) => {
                command.arg("through").arg(require("advancement", advancement)?)
            }
            AdvancementSelection::Until(advancement) => command.arg("until").arg(require("advancement", advancement)?),
        };
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Granted"))
            .ok(Matcher::prefix("Revoked"))
            .reject(Matcher::prefix("Couldn't grant"), "advancement already granted")
            .reject(Matcher::prefix("Couldn't revoke"), "advancement not granted")
            .reject(Matcher::prefix("No advancement was found"), "unknown advancement");
        self.run(command, &rules).await
    }

    /// Unlocks or locks recipes and returns how many changed. `recipe` may be `*`.
    pub async fn recipe(&self, action: RecipeAction, targets: &str, recipe: &str) -> Result<u32> {
        let targets = require("targets", targets)?;
        let recipe = require_token("recipe", recipe)?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("No recipes could be"), "nothing changed")
            .reject(Matcher::prefix("No recipe matches"), "unknown recipe")
            .reject(Matcher::prefix("Unknown recipe"), "unknown recipe")
            .accept(Matcher::pattern(&RECIPES), |reply| reply.parse(1));
        self.run(CommandLine::new("recipe").arg(action).arg(targets).arg(recipe), &rules)
            .await
    }

    /// Drops loot into the world and returns how many items dropped.
    pub async fn loot_spawn(&self, position: Position, source: &LootSource) -> Result<u32> {
        position.check("position")?;
        source.check()?;
        self.run(CommandLine::new("loot spawn").arg(position).arg(source), &loot_rules())
            .await
    }

    /// Gives loot to players and returns how many items were handed out.
    pub async fn loot_give(&self, targets: &str, source: &LootSource) -> Result<u32> {
        let targets = require("targets", targets)?;
        source.check()?;
        self.run(CommandLine::new("loot give").arg(targets).arg(source), &loot_rules())
            .await
    }

    /// Activates a trigger objective, optionally adding to or setting its value.
    pub async fn trigger(&self, objective: &str, action: Option<TriggerAction>) -> Result<()> {
        let objective = require_token("objective", objective)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Triggered"))
            .reject(Matcher::contains("'trigger' type"), "objective is not a trigger")
            .reject(Matcher::prefix("You cannot trigger this objective yet"), "trigger not enabled")
            .reject(Matcher::prefix("Only players can trigger"), "trigger needs a player source")
            .reject(Matcher::prefix("No trigger objective was found"), "objective is not a trigger")
            .reject(Matcher::prefix("You can only use trigger for a trigger objective"), "objective is not a trigger");
        self.run(CommandLine::new("trigger").arg(objective).opt(action), &rules)
            .await
    }
}

fn experience_rules(success: &'static str) -> Recognizer<()> {
    Recognizer::new()
        .ok(Matcher::prefix(success))
        .reject(Matcher::prefix("Can't set experience points above"), "points exceed the current level")
}
