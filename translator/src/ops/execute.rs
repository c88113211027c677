//! `execute` wrappers around an embedded command.
//!
//! The embedded command's own reply is returned untouched; only the generic
//! execute failures are classified.

use crate::command::{require, require_at_least, require_finite, require_range, require_token, CommandLine};
use crate::error::Result;
use crate::reply::{Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::Position;
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static ANYTHING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^.*$").unwrap());

fn passthrough() -> Recognizer<String> {
    Recognizer::new()
        .reject(Matcher::prefix("Test failed"), "execute condition did not hold")
        .reject(Matcher::prefix("Unknown or incomplete command"), "unknown command")
        .reject(Matcher::prefix("Incorrect argument for command"), "incorrect argument")
        .reject(Matcher::prefix("Unknown command"), "unknown command")
        .text(Matcher::pattern(&ANYTHING))
}

impl<T: Transport> CommandTranslator<T> {
    pub async fn execute_as(&self, targets: &str, command: &str) -> Result<String> {
        let targets = require("targets", targets)?;
        let line = CommandLine::new("execute as").arg(targets);
        self.run_embedded(line, command).await
    }

    pub async fn execute_at(&self, targets: &str, command: &str) -> Result<String> {
        let targets = require("targets", targets)?;
        let line = CommandLine::new("execute at").arg(targets);
        self.run_embedded(line, command).await
    }

    pub async fn execute_if_block(&self, position: impl Into<Position>, block: &str, command: &str) -> Result<String> {
        let position: Position = position.into();
        let position = position.check("position")?;
        let block = require_token("block", block)?;
        let line = CommandLine::new("execute if block").arg(position).arg(block);
        self.run_embedded(line, command).await
    }

    pub async fn execute_if_entity(&self, targets: &str, command: &str) -> Result<String> {
        let targets = require("targets", targets)?;
        let line = CommandLine::new("execute if entity").arg(targets);
        self.run_embedded(line, command).await
    }

    /// Runs `command` as each `targets` entity, turned to face the eyes of `facing`.
    pub async fn execute_facing_entity(&self, targets: &str, facing: &str, command: &str) -> Result<String> {
        let targets = require("targets", targets)?;
        let facing = require("facing", facing)?;
        let line = CommandLine::new("execute as")
            .arg(targets)
            .arg("facing entity")
            .arg(facing)
            .arg("eyes");
        self.run_embedded(line, command).await
    }

    pub async fn execute_rotated_to_position(
        &self,
        targets: &str,
        position: impl Into<Position>,
        command: &str,
    ) -> Result<String> {
        let targets = require("targets", targets)?;
        let position: Position = position.into();
        let position = position.check("position")?;
        let line = CommandLine::new("execute as")
            .arg(targets)
            .arg("rotated as")
            .arg(targets)
            .arg("facing")
            .arg(position);
        self.run_embedded(line, command).await
    }

    /// Runs `command` as `targets`, storing whether it succeeded in `holder`'s score.
    pub async fn execute_store_success(
        &self,
        targets: &str,
        holder: &str,
        objective: &str,
        command: &str,
    ) -> Result<String> {
        let targets = require("targets", targets)?;
        let holder = require("holder", holder)?;
        let objective = require_token("objective", objective)?;
        let line = CommandLine::new("execute as")
            .arg(targets)
            .arg("store success score")
            .arg(holder)
            .arg(objective);
        self.run_embedded(line, command).await
    }

    /// Teleports every entity of `entity_type`, optionally only those with `name`.
    pub async fn teleport_entity_type(
        &self,
        entity_type: &str,
        name: Option<&str>,
        destination: impl Into<Position>,
    ) -> Result<String> {
        let entity_type = require_token("entity type", entity_type)?;
        let destination: Position = destination.into();
        let destination = destination.check("destination")?;
        let selector = match name {
            Some(name) => format!("@e[type={entity_type},name={}]", require_token("name", name)?),
            None => format!("@e[type={entity_type}]"),
        };
        let line = CommandLine::new("execute as").arg(selector);
        self.run_embedded(line, &format!("tp @s {destination}")).await
    }

    pub async fn give_item_as(&self, player: &str, item: &str, count: u32) -> Result<String> {
        let player = require("player", player)?;
        let item = require_token("item", item)?;
        require_at_least("count", count, 1)?;
        let line = CommandLine::new("execute as").arg(player);
        self.run_embedded(line, &format!("give @s {item} {count}")).await
    }

    pub async fn summon_via_execute(&self, entity: &str, position: impl Into<Position>) -> Result<String> {
        let entity = require_token("entity", entity)?;
        let position: Position = position.into();
        let position = position.check("position")?;
        self.run_embedded(CommandLine::new("execute"), &format!("summon {entity} {position}"))
            .await
    }

    /// Tests for `block` at `position`. A failed test is `false`, not an error.
    pub async fn test_for_block(&self, position: impl Into<Position>, block: &str) -> Result<bool> {
        let position: Position = position.into();
        let position = position.check("position")?;
        let block = require_token("block", block)?;
        let rules = Recognizer::new()
            .accept(Matcher::prefix("Test passed"), |_| Some(true))
            .accept(Matcher::prefix("Test failed"), |_| Some(false));
        let command = CommandLine::new("execute if block").arg(position).arg(block);
        self.run(command, &rules).await
    }

    /// Plays `sound` on the master channel for every player, from `position`.
    pub async fn play_sound_for_all(
        &self,
        sound: &str,
        position: impl Into<Position>,
        volume: f64,
        pitch: f64,
    ) -> Result<String> {
        let sound = require_token("sound", sound)?;
        let position: Position = position.into();
        let position = position.check("position")?;
        let volume = require_finite("volume", volume)?;
        require_at_least("volume", volume, 0.0)?;
        let pitch = require_range("pitch", require_finite("pitch", pitch)?, 0.0, 2.0)?;
        let embedded = format!("playsound {sound} master @a {position} {volume} {pitch}");
        self.run_embedded(CommandLine::new("execute"), &embedded).await
    }

    async fn run_embedded(&self, line: CommandLine, command: &str) -> Result<String> {
        let command = require("command", command)?;
        let command = command.strip_prefix('/').unwrap_or(command);
        self.run(line.arg("run").arg(command), &passthrough()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::types::Position;

    #[tokio::test]
    async fn test_execute_as_returns_embedded_reply() {
        let console = answering("execute as @a run say hi", "");
        assert_eq!(console.execute_as("@a", "say hi").await.unwrap(), "");

        let console = answering(
            "execute at Steve run setblock ~ ~-1 ~ minecraft:stone",
            "Changed the block at 10, 63, 5",
        );
        let reply = console
            .execute_at("Steve", "/setblock ~ ~-1 ~ minecraft:stone")
            .await
            .unwrap();
        assert_eq!(reply, "Changed the block at 10, 63, 5");
    }

    #[tokio::test]
    async fn test_execute_generic_failures() {
        let console = always("Test failed");
        assert!(console
            .execute_if_entity("@e[type=pig]", "say oink")
            .await
            .unwrap_err()
            .is_domain());

        let console = always("Unknown or incomplete command, see below for error");
        assert!(console.execute_as("@a", "bogus").await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_execute_shapes() {
        let console = always("ok");
        console
            .execute_if_block((0, 64, 0), "minecraft:chest", "say found")
            .await
            .unwrap();
        console
            .execute_facing_entity("@e[type=zombie]", "@p", "tp @s ^ ^ ^1")
            .await
            .unwrap();
        console
            .execute_rotated_to_position("@s", (1, 2, 3), "say turned")
            .await
            .unwrap();
        console
            .execute_store_success("@a", "#global", "found", "clear @s minecraft:diamond 0")
            .await
            .unwrap();
        assert_eq!(
            console.transport().commands(),
            vec![
                "execute if block 0 64 0 minecraft:chest run say found",
                "execute as @e[type=zombie] facing entity @p eyes run tp @s ^ ^ ^1",
                "execute as @s rotated as @s facing 1 2 3 run say turned",
                "execute as @a store success score #global found run clear @s minecraft:diamond 0",
            ]
        );
    }

    #[tokio::test]
    async fn test_convenience_shapes() {
        let console = always("");
        console
            .teleport_entity_type("minecraft:pig", Some("Babe"), (5, 70, 5))
            .await
            .unwrap();
        console.give_item_as("Steve", "minecraft:apple", 3).await.unwrap();
        console
            .summon_via_execute("minecraft:cow", Position::from((0.5, 64.0, 0.5)))
            .await
            .unwrap();
        console
            .play_sound_for_all("minecraft:block.bell.use", (0, 64, 0), 1.0, 0.5)
            .await
            .unwrap();
        assert_eq!(
            console.transport().commands(),
            vec![
                "execute as @e[type=minecraft:pig,name=Babe] run tp @s 5 70 5",
                "execute as Steve run give @s minecraft:apple 3",
                "execute run summon minecraft:cow 0.5 64 0.5",
                "execute run playsound minecraft:block.bell.use master @a 0 64 0 1 0.5",
            ]
        );

        assert!(console
            .play_sound_for_all("minecraft:block.bell.use", (0, 64, 0), 1.0, 3.0)
            .await
            .unwrap_err()
            .is_validation());
    }

    #[tokio::test]
    async fn test_for_block_reports_bool() {
        let console = answering("execute if block 1 2 3 minecraft:gold_block", "Test passed");
        assert!(console.test_for_block((1, 2, 3), "minecraft:gold_block").await.unwrap());

        let console = answering("execute if block 1 2 3 minecraft:gold_block", "Test failed");
        assert!(!console.test_for_block((1, 2, 3), "minecraft:gold_block").await.unwrap());
    }
}
