//! Block editing, structure placement and world queries.

use crate::command::{require, require_opt, require_range, CommandLine};
use crate::error::Result;
use crate::reply::{Matcher, Recognizer, Reply};
use crate::transport::Transport;
use crate::types::{CloneMode, FillMode, LocateKind, Located, MaskMode, Position, SetBlockMode, TemplateMirror, TemplateRotation};
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static FILLED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Successfully filled (\d+) blocks?").unwrap());
static CHANGED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) blocks? (?:have|has) been changed").unwrap());
static CLONED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Successfully cloned (\d+) blocks?").unwrap());
static BIOMES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+) biome (?:entry|entries|entry/entries|cells?)").unwrap());
static LOCATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(-?\d+), (~|-?\d+), (-?\d+)\] \((\d+) blocks? away\)").unwrap()
});
static SEED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Seed: \[(-?\d+)\]$").unwrap());

fn count(reply: &Reply<'_>) -> Option<u64> {
    reply.parse(1)
}

fn placement_rules() -> Recognizer<()> {
    Recognizer::new()
        .ok(Matcher::prefix("Placed"))
        .ok(Matcher::prefix("Generated"))
        .ok(Matcher::prefix("Loaded structure"))
        .reject(Matcher::prefix("Failed"), "placement failed")
        .reject(Matcher::prefix("Template not found"), "unknown template")
        .reject(Matcher::prefix("Invalid"), "invalid placement")
}

impl<T: Transport> CommandTranslator<T> {
    /// Fills the box between two corners and returns how many blocks changed.
    pub async fn fill(&self, from: Position, to: Position, block: &str, mode: Option<FillMode>) -> Result<u64> {
        from.check("from")?;
        to.check("to")?;
        let block = require("block", block)?;
        if let Some(FillMode::Replace(Some(filter))) = &mode {
            require("filter", filter)?;
        }
        let command = CommandLine::new("fill").arg(from).arg(to).arg(block).opt(mode);
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Failed"), "no blocks were filled")
            .reject(Matcher::prefix("No blocks were filled"), "no blocks were filled")
            .reject(Matcher::prefix("Too many blocks"), "area is too large")
            .accept(Matcher::pattern(&FILLED), count)
            .accept(Matcher::pattern(&CHANGED), count);
        self.run(command, &rules).await
    }

    /// Sets the biome in a box. Older consoles report no count, giving `None`.
    pub async fn fill_biome(&self, from: Position, to: Position, biome: &str, filter: Option<&str>) -> Result<Option<u64>> {
        from.check("from")?;
        to.check("to")?;
        let biome = require("biome", biome)?;
        let filter = require_opt("filter", filter)?;
        let command = CommandLine::new("fillbiome")
            .arg(from)
            .arg(to)
            .arg(biome)
            .opt(filter.map(|f| format!("replace {f}")));
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Too many blocks"), "area is too large")
            .reject(Matcher::contains("not loaded"), "area is not loaded")
            .accept(Matcher::pattern(&BIOMES), |reply| Some(reply.parse(1)))
            .accept(Matcher::prefix("Biomes set between"), |_| Some(None));
        self.run(command, &rules).await
    }

    /// Copies a region to `destination`; the clone mode needs a mask mode before it.
    pub async fn clone(
        &self,
        from: Position,
        to: Position,
        destination: Position,
        mask: Option<MaskMode>,
        mode: Option<CloneMode>,
    ) -> Result<u64> {
        from.check("from")?;
        to.check("to")?;
        destination.check("destination")?;
        if let Some(MaskMode::Filtered(filter)) = &mask {
            require("filter", filter)?;
        }
        let command = CommandLine::new("clone").arg(from).arg(to).arg(destination).chain(&[
            ("mask", mask.map(|m| m.to_string())),
            ("clone mode", mode.map(|m| m.to_string())),
        ])?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("No blocks were cloned"), "no blocks were cloned")
            .reject(Matcher::prefix("Failed"), "no blocks were cloned")
            .reject(Matcher::contains("cannot overlap"), "source and destination overlap")
            .reject(Matcher::prefix("Too many blocks"), "area is too large")
            .accept(Matcher::pattern(&CLONED), count)
            .accept(Matcher::pattern(&CHANGED), count);
        self.run(command, &rules).await
    }

    pub async fn set_block(&self, position: Position, block: &str, mode: Option<SetBlockMode>) -> Result<()> {
        position.check("position")?;
        let block = require("block", block)?;
        let command = CommandLine::new("setblock").arg(position).arg(block).opt(mode);
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Changed the block"))
            .reject(Matcher::prefix("Could not set the block"), "block was not changed");
        self.run(command, &rules).await
    }

    pub async fn place_feature(&self, feature: &str, position: Option<Position>) -> Result<()> {
        let feature = require("feature", feature)?;
        if let Some(position) = &position {
            position.check("position")?;
        }
        let command = CommandLine::new("place feature").arg(feature).opt(position);
        self.run(command, &placement_rules()).await
    }

    /// Generates a jigsaw structure from `pool`, starting at the jigsaw named `target`.
    pub async fn place_jigsaw(&self, pool: &str, target: &str, max_depth: u32, position: Option<Position>) -> Result<()> {
        let pool = require("pool", pool)?;
        let target = require("target", target)?;
        let max_depth = require_range("max depth", max_depth, 1, 20)?;
        if let Some(position) = &position {
            position.check("position")?;
        }
        let command = CommandLine::new("place jigsaw")
            .arg(pool)
            .arg(target)
            .arg(max_depth)
            .opt(position);
        self.run(command, &placement_rules()).await
    }

    pub async fn place_structure(&self, structure: &str, position: Option<Position>) -> Result<()> {
        let structure = require("structure", structure)?;
        if let Some(position) = &position {
            position.check("position")?;
        }
        let command = CommandLine::new("place structure").arg(structure).opt(position);
        self.run(command, &placement_rules()).await
    }

    /// Places a saved template. Trailing options are positional: each one
    /// requires all options before it.
    pub async fn place_template(
        &self,
        template: &str,
        position: Option<Position>,
        rotation: Option<TemplateRotation>,
        mirror: Option<TemplateMirror>,
        integrity: Option<f64>,
        seed: Option<i32>,
    ) -> Result<()> {
        let template = require("template", template)?;
        if let Some(position) = &position {
            position.check("position")?;
        }
        if let Some(integrity) = integrity {
            require_range("integrity", integrity, 0.0, 1.0)?;
        }
        let command = CommandLine::new("place template").arg(template).chain(&[
            ("position", position.map(|p| p.to_string())),
            ("rotation", rotation.map(|r| r.to_string())),
            ("mirror", mirror.map(|m| m.to_string())),
            ("integrity", integrity.map(|i| i.to_string())),
            ("seed", seed.map(|s| s.to_string())),
        ])?;
        self.run(command, &placement_rules()).await
    }

    /// Finds the nearest structure, biome or point of interest.
    pub async fn locate(&self, kind: LocateKind, target: &str) -> Result<Located> {
        let target = require("target", target)?;
        let command = CommandLine::new("locate").arg(kind).arg(target);
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Could not find"), "nothing of that type nearby")
            .reject(Matcher::prefix("There is no"), "unknown structure, biome or point of interest")
            .accept(Matcher::pattern(&LOCATED), |reply| {
                Some(Located {
                    x: reply.parse(1)?,
                    y: reply.parse(2),
                    z: reply.parse(3)?,
                    distance: reply.parse(4)?,
                })
            });
        self.run(command, &rules).await
    }

    pub async fn seed(&self) -> Result<i64> {
        let rules = Recognizer::new().accept(Matcher::pattern(&SEED), |reply| reply.parse(1));
        self.run(CommandLine::new("seed"), &rules).await
    }

    pub async fn set_world_spawn(&self, position: Option<Position>, angle: Option<f64>) -> Result<()> {
        if let Some(position) = &position {
            position.check("position")?;
        }
        if let Some(angle) = angle {
            require_range("angle", angle, -180.0, 180.0)?;
        }
        let command = CommandLine::new("setworldspawn").chain(&[
            ("position", position.map(|p| p.to_string())),
            ("angle", angle.map(|a| a.to_string())),
        ])?;
        let rules = Recognizer::new().ok(Matcher::prefix("Set the world spawn point"));
        self.run(command, &rules).await
    }

    pub async fn set_spawn_point(&self, targets: Option<&str>, position: Option<Position>, angle: Option<f64>) -> Result<()> {
        let targets = require_opt("targets", targets)?;
        if let Some(position) = &position {
            position.check("position")?;
        }
        if let Some(angle) = angle {
            require_range("angle", angle, -180.0, 180.0)?;
        }
        let command = CommandLine::new("spawnpoint").chain(&[
            ("targets", targets.map(str::to_string)),
            ("position", position.map(|p| p.to_string())),
            ("angle", angle.map(|a| a.to_string())),
        ])?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Set spawn point"))
            .ok(Matcher::prefix("Successful"))
            .reject(Matcher::prefix("Failed"), "spawn point was not set");
        self.run(command, &rules).await
    }
}
