//! Entities: spawning, killing, moving, tagging, effects and attributes.

use crate::command::{require, require_at_least, require_finite, require_opt, require_range, require_token, CommandLine};
use crate::error::Result;
use crate::reply::{split_list, Matcher, Recognizer, Reply};
use crate::transport::Transport;
use crate::types::{ModifierOperation, Position, Rotation};
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static KILLED_MANY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Killed (\d+) entities").unwrap());
static SPREAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Spread (\d+) (?:players?|entities|player\(s\))").unwrap());
static TAG_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^.+ (?:has|have) \d+ (?:total )?tags?:\s*(.*)$").unwrap());
static NUMBER_AT_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" (?:is|to) (-?\d+(?:\.\d+)?(?:[eE]-?\d+)?)$").unwrap());

fn trailing_number(reply: &Reply<'_>) -> Option<f64> {
    reply.parse(1)
}

fn attribute_value_rules() -> Recognizer<f64> {
    Recognizer::new()
        .reject(Matcher::contains("has no attribute"), "entity lacks that attribute")
        .reject(Matcher::prefix("There is no modifier"), "no such modifier")
        .accept(Matcher::pattern(&NUMBER_AT_END), trailing_number)
}

impl<T: Transport> CommandTranslator<T> {
    /// Spawns an entity, optionally at a position with extra NBT.
    pub async fn summon(&self, entity: &str, position: Option<Position>, nbt: Option<&str>) -> Result<()> {
        let entity = require("entity", entity)?;
        if let Some(position) = &position {
            position.check("position")?;
        }
        let nbt = require_opt("nbt", nbt)?;
        let command = CommandLine::new("summon").arg(entity).chain(&[
            ("position", position.map(|p| p.to_string())),
            ("nbt", nbt.map(str::to_string)),
        ])?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Summoned new"))
            .reject(Matcher::prefix("Unable to summon"), "entity could not be summoned")
            .reject(Matcher::prefix("Invalid position"), "invalid position for summon");
        self.run(command, &rules).await
    }

    /// Kills the targets and returns how many died.
    pub async fn kill(&self, targets: &str) -> Result<u32> {
        let targets = require("targets", targets)?;
        let rules = Recognizer::new()
            .accept(Matcher::pattern(&KILLED_MANY), |reply| reply.parse(1))
            .accept(Matcher::prefix("Killed "), |_| Some(1));
        self.run(CommandLine::new("kill").arg(targets), &rules).await
    }

    /// Deals `amount` damage, optionally of a damage type and caused by an entity.
    pub async fn damage(&self, target: &str, amount: f64, damage_type: Option<&str>, by: Option<&str>) -> Result<()> {
        let target = require("target", target)?;
        require_at_least("amount", require_finite("amount", amount)?, 0.0)?;
        let damage_type = require_opt("damage type", damage_type)?;
        let by = require_opt("by", by)?;
        let command = CommandLine::new("damage").arg(target).arg(amount).chain(&[
            ("damage type", damage_type.map(str::to_string)),
            ("by", by.map(|entity| format!("by {entity}"))),
        ])?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Applied"))
            .reject(Matcher::contains("invulnerable"), "target is invulnerable to that damage")
            .reject(Matcher::contains("failed"), "damage was not applied")
            .reject(Matcher::contains("error"), "damage was not applied");
        self.run(command, &rules).await
    }

    pub async fn teleport(&self, targets: &str, position: impl Into<Position>, rotation: Option<Rotation>) -> Result<()> {
        let targets = require("targets", targets)?;
        let position: Position = position.into();
        let position = position.check("position")?;
        if let Some(rotation) = &rotation {
            rotation.check("rotation")?;
        }
        let command = CommandLine::new("teleport").arg(targets).arg(position).opt(rotation);
        self.run(command, &teleport_rules()).await
    }

    pub async fn teleport_to_entity(&self, targets: &str, destination: &str) -> Result<()> {
        let targets = require("targets", targets)?;
        let destination = require("destination", destination)?;
        let command = CommandLine::new("teleport").arg(targets).arg(destination);
        self.run(command, &teleport_rules()).await
    }

    pub async fn ride_mount(&self, target: &str, vehicle: &str) -> Result<()> {
        let target = require("target", target)?;
        let vehicle = require("vehicle", vehicle)?;
        let rules = Recognizer::new()
            .ok(Matcher::contains("started riding"))
            .ok(Matcher::contains("Now riding"))
            .reject(Matcher::contains("is already riding"), "target is already riding")
            .reject(Matcher::contains("couldn't start riding"), "mount failed")
            .reject(Matcher::prefix("Players can't be ridden"), "players cannot be ridden")
            .reject(Matcher::prefix("Can't mount entity on itself"), "mount would loop")
            .reject(Matcher::contains("Could not find that entity"), "entity not found");
        self.run(CommandLine::new("ride").arg(target).arg("mount").arg(vehicle), &rules)
            .await
    }

    pub async fn ride_dismount(&self, target: &str) -> Result<()> {
        let target = require("target", target)?;
        let rules = Recognizer::new()
            .ok(Matcher::contains("stopped riding"))
            .ok(Matcher::contains("Dismounted"))
            .reject(Matcher::contains("is not riding"), "target is not riding anything")
            .reject(Matcher::contains("Could not find that entity"), "entity not found");
        self.run(CommandLine::new("ride").arg(target).arg("dismount"), &rules)
            .await
    }

    /// Makes `player` spectate `target`; with no target, stops spectating.
    pub async fn spectate(&self, target: Option<&str>, player: Option<&str>) -> Result<()> {
        let target = require_opt("target", target)?;
        let player = require_opt("player", player)?;
        let command = CommandLine::new("spectate").chain(&[
            ("target", target.map(str::to_string)),
            ("player", player.map(str::to_string)),
        ])?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Now spectating"))
            .ok(Matcher::prefix("No longer spectating"))
            .reject(Matcher::contains("must be in spectator mode"), "player is not in spectator mode")
            .reject(Matcher::prefix("Can't spectate yourself"), "cannot spectate self")
            .reject(Matcher::prefix("Failed"), "spectate failed");
        self.run(command, &rules).await
    }

    /// Spreads targets around a center and returns how many were placed.
    pub async fn spread_players(
        &self,
        center: (f64, f64),
        spread_distance: f64,
        max_range: f64,
        under: Option<i32>,
        respect_teams: bool,
        targets: &str,
    ) -> Result<u32> {
        require_finite("center", center.0)?;
        require_finite("center", center.1)?;
        require_at_least("spread distance", require_finite("spread distance", spread_distance)?, 0.0)?;
        require_at_least("max range", require_finite("max range", max_range)?, spread_distance + 1.0)?;
        let targets = require("targets", targets)?;
        let command = CommandLine::new("spreadplayers")
            .arg(center.0)
            .arg(center.1)
            .arg(spread_distance)
            .arg(max_range)
            .opt(under.map(|height| format!("under {height}")))
            .arg(respect_teams)
            .arg(targets);
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Could not spread"), "not enough space to spread targets")
            .accept(Matcher::pattern(&SPREAD), |reply| reply.parse(1))
            .accept(Matcher::prefix("Successfully"), |reply| crate::reply::first_integer(reply.text()));
        self.run(command, &rules).await
    }

    pub async fn tag_add(&self, targets: &str, tag: &str) -> Result<()> {
        let targets = require("targets", targets)?;
        let tag = require_token("tag", tag)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Added tag"))
            .reject(Matcher::contains("already has"), "target already has the tag")
            .reject(Matcher::contains("too many tags"), "target already has the tag or too many tags");
        self.run(CommandLine::new("tag").arg(targets).arg("add").arg(tag), &rules)
            .await
    }

    pub async fn tag_remove(&self, targets: &str, tag: &str) -> Result<()> {
        let targets = require("targets", targets)?;
        let tag = require_token("tag", tag)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Removed tag"))
            .reject(Matcher::contains("does not have"), "target does not have the tag")
            .reject(Matcher::contains("doesn't have"), "target does not have the tag");
        self.run(CommandLine::new("tag").arg(targets).arg("remove").arg(tag), &rules)
            .await
    }

    pub async fn tag_list(&self, targets: &str) -> Result<Vec<String>> {
        let targets = require("targets", targets)?;
        let rules = Recognizer::new()
            .accept(Matcher::contains("no tags"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&TAG_LIST), |reply| {
                Some(split_list(reply.group(1).unwrap_or_default()))
            });
        self.run(CommandLine::new("tag").arg(targets).arg("list"), &rules)
            .await
    }

    /// Applies a status effect. `seconds`, `amplifier` and `hide_particles`
    /// are positional: each requires the ones before it.
    pub async fn effect_give(
        &self,
        targets: &str,
        effect: &str,
        seconds: Option<u32>,
        amplifier: Option<u8>,
        hide_particles: Option<bool>,
    ) -> Result<()> {
        let targets = require("targets", targets)?;
        let effect = require_token("effect", effect)?;
        if let Some(seconds) = seconds {
            require_range("seconds", seconds, 1, 1_000_000)?;
        }
        let command = CommandLine::new("effect give").arg(targets).arg(effect).chain(&[
            ("seconds", seconds.map(|s| s.to_string())),
            ("amplifier", amplifier.map(|a| a.to_string())),
            ("hide_particles", hide_particles.map(|h| h.to_string())),
        ])?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Applied effect"))
            .ok(Matcher::prefix("Gave"))
            .reject(Matcher::prefix("Unable to apply this effect"), "target is immune or has a stronger effect")
            .reject(Matcher::prefix("No effect"), "effect was not applied");
        self.run(command, &rules).await
    }

    /// Removes one effect, or every effect when `effect` is `None`.
    pub async fn effect_clear(&self, targets: &str, effect: Option<&str>) -> Result<()> {
        let targets = require("targets", targets)?;
        let effect = require_opt("effect", effect)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Removed"))
            .ok(Matcher::prefix("Took"))
            .reject(Matcher::prefix("Target has no effects"), "target has no effects")
            .reject(Matcher::prefix("Target doesn't have the requested effect"), "target lacks that effect")
            .reject(Matcher::prefix("No effect"), "nothing to clear");
        self.run(CommandLine::new("effect clear").arg(targets).opt(effect), &rules)
            .await
    }

    pub async fn enchant(&self, targets: &str, enchantment: &str, level: Option<u8>) -> Result<()> {
        let targets = require("targets", targets)?;
        let enchantment = require_token("enchantment", enchantment)?;
        if let Some(level) = level {
            require_at_least("level", level, 1)?;
        }
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Applied enchantment"))
            .ok(Matcher::contains("has been enchanted with"))
            .reject(Matcher::contains("is not holding any item"), "target holds no item")
            .reject(Matcher::contains("cannot support that enchantment"), "item cannot take that enchantment")
            .reject(Matcher::contains("is higher than the maximum level"), "level too high")
            .reject(Matcher::contains("Could not enchant"), "item could not be enchanted")
            .reject(Matcher::contains("can't be combined"), "conflicts with an existing enchantment");
        self.run(CommandLine::new("enchant").arg(targets).arg(enchantment).opt(level), &rules)
            .await
    }

    /// Total value of an attribute, optionally multiplied by `scale`.
    pub async fn attribute_get(&self, target: &str, attribute: &str, scale: Option<f64>) -> Result<f64> {
        let (target, attribute) = attribute_subject(target, attribute)?;
        let scale = attribute_scale(scale)?;
        let command = CommandLine::new("attribute").arg(target).arg(attribute).arg("get").opt(scale);
        self.run(command, &attribute_value_rules()).await
    }

    pub async fn attribute_base_get(&self, target: &str, attribute: &str, scale: Option<f64>) -> Result<f64> {
        let (target, attribute) = attribute_subject(target, attribute)?;
        let scale = attribute_scale(scale)?;
        let command = CommandLine::new("attribute").arg(target).arg(attribute).arg("base get").opt(scale);
        self.run(command, &attribute_value_rules()).await
    }

    /// Sets the base value and returns the value the console confirms.
    pub async fn attribute_base_set(&self, target: &str, attribute: &str, value: f64) -> Result<f64> {
        let (target, attribute) = attribute_subject(target, attribute)?;
        require_finite("value", value)?;
        let command = CommandLine::new("attribute").arg(target).arg(attribute).arg("base set").arg(value);
        self.run(command, &attribute_value_rules()).await
    }

    /// Adds a modifier. `name` is only sent to consoles whose grammar still takes one.
    pub async fn attribute_modifier_add(
        &self,
        target: &str,
        attribute: &str,
        id: &str,
        name: Option<&str>,
        value: f64,
        operation: ModifierOperation,
    ) -> Result<()> {
        let (target, attribute) = attribute_subject(target, attribute)?;
        let id = require_token("modifier id", id)?;
        let name = require_opt("modifier name", name)?;
        require_finite("value", value)?;
        let command = CommandLine::new("attribute")
            .arg(target)
            .arg(attribute)
            .arg("modifier add")
            .arg(id)
            .opt(name)
            .arg(value)
            .arg(operation);
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Added modifier"))
            .reject(Matcher::contains("is already present"), "modifier already present")
            .reject(Matcher::contains("has no attribute"), "entity lacks that attribute");
        self.run(command, &rules).await
    }

    pub async fn attribute_modifier_remove(&self, target: &str, attribute: &str, id: &str) -> Result<()> {
        let (target, attribute) = attribute_subject(target, attribute)?;
        let id = require_token("modifier id", id)?;
        let command = CommandLine::new("attribute")
            .arg(target)
            .arg(attribute)
            .arg("modifier remove")
            .arg(id);
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Removed modifier"))
            .reject(Matcher::prefix("There is no modifier"), "no such modifier")
            .reject(Matcher::contains("has no attribute"), "entity lacks that attribute");
        self.run(command, &rules).await
    }

    pub async fn attribute_modifier_value_get(&self, target: &str, attribute: &str, id: &str, scale: Option<f64>) -> Result<f64> {
        let (target, attribute) = attribute_subject(target, attribute)?;
        let id = require_token("modifier id", id)?;
        let scale = attribute_scale(scale)?;
        let command = CommandLine::new("attribute")
            .arg(target)
            .arg(attribute)
            .arg("modifier value get")
            .arg(id)
            .opt(scale);
        self.run(command, &attribute_value_rules()).await
    }

    /// Merges each NBT compound into the target in turn, stopping at the first refusal.
    pub async fn modify_entity<S: AsRef<str>>(&self, target: &str, changes: &[S]) -> Result<()> {
        let target = require("target", target)?;
        if changes.is_empty() {
            return Err(crate::CommandError::validation("changes", "at least one NBT compound is required"));
        }
        let steps = changes
            .iter()
            .map(|nbt| {
                let nbt = require("nbt", nbt.as_ref())?;
                Ok((
                    CommandLine::new("data merge entity").arg(target).arg(nbt),
                    super::data::merge_rules(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        self.run_sequence(steps).await
    }
}

fn teleport_rules() -> Recognizer<()> {
    Recognizer::new()
        .ok(Matcher::prefix("Teleported"))
        .reject(Matcher::prefix("No entity was found"), "no entity matched the targets")
        .reject(Matcher::prefix("Invalid position"), "invalid teleport position")
}

fn attribute_subject<'a>(target: &'a str, attribute: &'a str) -> Result<(&'a str, &'a str)> {
    Ok((require("target", target)?, require_token("attribute", attribute)?))
}

fn attribute_scale(scale: Option<f64>) -> Result<Option<f64>> {
    scale.map(|scale| require_finite("scale", scale)).transpose()
}
