//! # Typed Parameters and Results
//!
//! Closed keyword sets are enums that render as their console keyword and
//! parse (through `FromStr`) from the keyword or its documented
//! abbreviations, so a caller holding user text gets a validation error
//! before anything is sent.
//!
//! Result records derive `serde` so callers can forward them as JSON.

use crate::command::text_component;
use crate::error::{CommandError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Declares a keyword enum with `as_str`, `Display` and `FromStr`.
///
/// Each variant lists its console keyword first, then any accepted aliases.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($param:literal) {
            $($variant:ident => $keyword:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $keyword),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CommandError;

            fn from_str(s: &str) -> Result<Self> {
                let key = s.trim();
                $(
                    if key.eq_ignore_ascii_case($keyword) $(|| key.eq_ignore_ascii_case($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(CommandError::validation(
                    $param,
                    format!(
                        "{s:?} is not one of {}",
                        [$($keyword),+].join(", ")
                    ),
                ))
            }
        }
    };
}

keyword_enum! {
    Difficulty("difficulty") {
        Peaceful => "peaceful" | "p" | "0",
        Easy => "easy" | "e" | "1",
        Normal => "normal" | "n" | "2",
        Hard => "hard" | "h" | "3",
    }
}

keyword_enum! {
    GameMode("game mode") {
        Survival => "survival" | "s" | "0",
        Creative => "creative" | "c" | "1",
        Adventure => "adventure" | "a" | "2",
        Spectator => "spectator" | "sp" | "3",
    }
}

keyword_enum! {
    Weather("weather") {
        Clear => "clear",
        Rain => "rain",
        Thunder => "thunder",
    }
}

keyword_enum! {
    /// Which ban list `banlist` reports.
    BanListKind("ban list") {
        Players => "players",
        Ips => "ips",
    }
}

keyword_enum! {
    WhitelistAction("whitelist action") {
        On => "on",
        Off => "off",
        Reload => "reload",
        List => "list",
        Add => "add",
        Remove => "remove",
    }
}

keyword_enum! {
    SetBlockMode("setblock mode") {
        Destroy => "destroy",
        Keep => "keep",
        Replace => "replace",
    }
}

keyword_enum! {
    CloneMode("clone mode") {
        Force => "force",
        Move => "move",
        Normal => "normal",
    }
}

keyword_enum! {
    TimeQuery("time query") {
        DayTime => "daytime",
        GameTime => "gametime",
        Day => "day",
    }
}

keyword_enum! {
    TimeOfDay("time of day") {
        Day => "day",
        Night => "night",
        Noon => "noon",
        Midnight => "midnight",
    }
}

keyword_enum! {
    LocateKind("locate kind") {
        Structure => "structure",
        Biome => "biome",
        Poi => "poi",
    }
}

keyword_enum! {
    ExperienceKind("experience kind") {
        Points => "points",
        Levels => "levels",
    }
}

keyword_enum! {
    AdvancementAction("advancement action") {
        Grant => "grant",
        Revoke => "revoke",
    }
}

keyword_enum! {
    RecipeAction("recipe action") {
        Give => "give",
        Take => "take",
    }
}

keyword_enum! {
    ScheduleMode("schedule mode") {
        Append => "append",
        Replace => "replace",
    }
}

keyword_enum! {
    TemplateRotation("template rotation") {
        None => "none",
        Clockwise90 => "clockwise_90",
        Counterclockwise90 => "counterclockwise_90",
        Rotate180 => "180",
    }
}

keyword_enum! {
    TemplateMirror("template mirror") {
        None => "none",
        FrontBack => "front_back",
        LeftRight => "left_right",
    }
}

keyword_enum! {
    SoundSource("sound source") {
        Master => "master",
        Music => "music",
        Record => "record",
        Weather => "weather",
        Block => "block",
        Hostile => "hostile",
        Neutral => "neutral",
        Player => "player",
        Ambient => "ambient",
        Voice => "voice",
    }
}

keyword_enum! {
    ParticleMode("particle mode") {
        Force => "force",
        Normal => "normal",
    }
}

keyword_enum! {
    RandomMode("random mode") {
        Value => "value",
        Roll => "roll",
    }
}

keyword_enum! {
    TitleKind("title kind") {
        Title => "title",
        Subtitle => "subtitle",
        Actionbar => "actionbar",
    }
}

keyword_enum! {
    RenderType("render type") {
        Integer => "integer",
        Hearts => "hearts",
    }
}

keyword_enum! {
    /// `scoreboard players operation` operators.
    ScoreOperator("score operator") {
        Assign => "=",
        Add => "+=",
        Subtract => "-=",
        Multiply => "*=",
        Divide => "/=",
        Modulo => "%=",
        Swap => "><",
        Min => "<",
        Max => ">",
    }
}

keyword_enum! {
    ModifierOperation("modifier operation") {
        Add => "add" | "add_value",
        Multiply => "multiply" | "add_multiplied_total",
        MultiplyBase => "multiply_base" | "add_multiplied_base",
    }
}

keyword_enum! {
    BossbarColor("bossbar color") {
        Blue => "blue",
        Green => "green",
        Pink => "pink",
        Purple => "purple",
        Red => "red",
        White => "white",
        Yellow => "yellow",
    }
}

keyword_enum! {
    BossbarStyle("bossbar style") {
        Notched6 => "notched_6",
        Notched10 => "notched_10",
        Notched12 => "notched_12",
        Notched20 => "notched_20",
        Progress => "progress",
    }
}

keyword_enum! {
    BossbarProperty("bossbar property") {
        Max => "max",
        Players => "players",
        Value => "value",
        Visible => "visible",
    }
}

keyword_enum! {
    TeamColor("team color") {
        Black => "black",
        DarkBlue => "dark_blue",
        DarkGreen => "dark_green",
        DarkAqua => "dark_aqua",
        DarkRed => "dark_red",
        DarkPurple => "dark_purple",
        Gold => "gold",
        Gray => "gray",
        DarkGray => "dark_gray",
        Blue => "blue",
        Green => "green",
        Aqua => "aqua",
        Red => "red",
        LightPurple => "light_purple",
        Yellow => "yellow",
        White => "white",
        Reset => "reset",
    }
}

keyword_enum! {
    Visibility("visibility") {
        Always => "always",
        Never => "never",
        HideForOtherTeams => "hideForOtherTeams",
        HideForOwnTeam => "hideForOwnTeam",
    }
}

keyword_enum! {
    CollisionRule("collision rule") {
        Always => "always",
        Never => "never",
        PushOtherTeams => "pushOtherTeams",
        PushOwnTeam => "pushOwnTeam",
    }
}

keyword_enum! {
    DatapackOrder("datapack order") {
        First => "first",
        Last => "last",
    }
}

keyword_enum! {
    DatapackFilter("datapack filter") {
        Available => "available",
        Enabled => "enabled",
    }
}

/// One axis of a position: absolute, relative (`~`) or local (`^`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Coordinate {
    Absolute(f64),
    Relative(f64),
    Local(f64),
}

impl Coordinate {
    fn offset(&self) -> f64 {
        match *self {
            Coordinate::Absolute(v) | Coordinate::Relative(v) | Coordinate::Local(v) => v,
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Coordinate::Absolute(v) => write!(f, "{v}"),
            Coordinate::Relative(v) if v == 0.0 => f.write_str("~"),
            Coordinate::Relative(v) => write!(f, "~{v}"),
            Coordinate::Local(v) if v == 0.0 => f.write_str("^"),
            Coordinate::Local(v) => write!(f, "^{v}"),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(v: f64) -> Self {
        Coordinate::Absolute(v)
    }
}

impl From<i32> for Coordinate {
    fn from(v: i32) -> Self {
        Coordinate::Absolute(v.into())
    }
}

/// A block or entity position, rendered as `x y z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: Coordinate,
    pub y: Coordinate,
    pub z: Coordinate,
}

impl Position {
    pub fn new(x: impl Into<Coordinate>, y: impl Into<Coordinate>, z: impl Into<Coordinate>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Offsets from the executing entity (`~dx ~dy ~dz`).
    pub fn relative(dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(
            Coordinate::Relative(dx),
            Coordinate::Relative(dy),
            Coordinate::Relative(dz),
        )
    }

    /// The executing entity's own position, `~ ~ ~`.
    pub fn here() -> Self {
        Self::relative(0.0, 0.0, 0.0)
    }

    pub fn check(&self, parameter: &'static str) -> Result<Self> {
        for axis in [self.x, self.y, self.z] {
            if !axis.offset().is_finite() {
                return Err(CommandError::validation(parameter, "coordinates must be finite"));
            }
        }
        Ok(*self)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Position {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(f64, f64, f64)> for Position {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

/// Yaw then pitch, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f64,
    pub pitch: f64,
}

impl Rotation {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    pub fn check(&self, parameter: &'static str) -> Result<Self> {
        if !self.yaw.is_finite() || !(-90.0..=90.0).contains(&self.pitch) {
            return Err(CommandError::validation(
                parameter,
                "yaw must be finite and pitch within -90..=90",
            ));
        }
        Ok(*self)
    }
}

impl Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.yaw, self.pitch)
    }
}

/// A duration or point in game time: `100` ticks, `20s` or `1.5d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeAmount {
    Ticks(u32),
    Seconds(f64),
    Days(f64),
}

impl TimeAmount {
    pub fn check(&self, parameter: &'static str) -> Result<Self> {
        match *self {
            TimeAmount::Seconds(v) | TimeAmount::Days(v) if !v.is_finite() || v < 0.0 => Err(
                CommandError::validation(parameter, "must be a non-negative finite amount"),
            ),
            _ => Ok(*self),
        }
    }
}

impl Display for TimeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TimeAmount::Ticks(t) => write!(f, "{t}"),
            TimeAmount::Seconds(s) => write!(f, "{s}s"),
            TimeAmount::Days(d) => write!(f, "{d}d"),
        }
    }
}

/// Argument to `time set`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeSetting {
    Named(TimeOfDay),
    Amount(TimeAmount),
}

impl Display for TimeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSetting::Named(name) => name.fmt(f),
            TimeSetting::Amount(amount) => amount.fmt(f),
        }
    }
}

/// A game rule setting: rules are either boolean or integer valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameRuleValue {
    Bool(bool),
    Int(i32),
}

impl From<bool> for GameRuleValue {
    fn from(v: bool) -> Self {
        GameRuleValue::Bool(v)
    }
}

impl From<i32> for GameRuleValue {
    fn from(v: i32) -> Self {
        GameRuleValue::Int(v)
    }
}

impl Display for GameRuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameRuleValue::Bool(v) => write!(f, "{v}"),
            GameRuleValue::Int(v) => write!(f, "{v}"),
        }
    }
}

/// An integer range such as `1..6`, `..10` or `5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl IntRange {
    pub fn between(min: i32, max: i32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn check(&self, parameter: &'static str) -> Result<Self> {
        match (self.min, self.max) {
            (None, None) => Err(CommandError::validation(parameter, "needs at least one bound")),
            (Some(min), Some(max)) if min > max => Err(CommandError::validation(
                parameter,
                format!("lower bound {min} exceeds upper bound {max}"),
            )),
            _ => Ok(*self),
        }
    }
}

impl Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(f, "{min}"),
            (Some(min), Some(max)) => write!(f, "{min}..{max}"),
            (Some(min), None) => write!(f, "{min}.."),
            (None, Some(max)) => write!(f, "..{max}"),
            (None, None) => Ok(()),
        }
    }
}

/// `fill` placement behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillMode {
    Destroy,
    Hollow,
    Keep,
    Outline,
    /// Replace everything, or only blocks matching the filter.
    Replace(Option<String>),
}

impl Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillMode::Destroy => f.write_str("destroy"),
            FillMode::Hollow => f.write_str("hollow"),
            FillMode::Keep => f.write_str("keep"),
            FillMode::Outline => f.write_str("outline"),
            FillMode::Replace(None) => f.write_str("replace"),
            FillMode::Replace(Some(filter)) => write!(f, "replace {filter}"),
        }
    }
}

/// `clone` mask behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskMode {
    Replace,
    Masked,
    Filtered(String),
}

impl Display for MaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskMode::Replace => f.write_str("replace"),
            MaskMode::Masked => f.write_str("masked"),
            MaskMode::Filtered(filter) => write!(f, "filtered {filter}"),
        }
    }
}

/// Where NBT lives for the `data` commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataTarget {
    Block(Position),
    Entity(String),
    Storage(String),
}

impl DataTarget {
    /// Builds a target from the keyword form `block|entity|storage` plus its
    /// locator (`"x y z"`, a selector or a resource id).
    pub fn parse(kind: &str, locator: &str) -> Result<Self> {
        let locator = crate::command::require("data target", locator)?;
        match kind.trim().to_ascii_lowercase().as_str() {
            "block" => {
                let parts: Vec<&str> = locator.split_whitespace().collect();
                let [x, y, z] = parts.as_slice() else {
                    return Err(CommandError::validation("data target", "block target needs x y z"));
                };
                let axis = |v: &str| {
                    v.parse::<f64>()
                        .map(Coordinate::Absolute)
                        .map_err(|_| CommandError::validation("data target", format!("{v:?} is not a coordinate")))
                };
                Ok(DataTarget::Block(Position::new(axis(*x)?, axis(*y)?, axis(*z)?)))
            }
            "entity" => Ok(DataTarget::Entity(locator.to_string())),
            "storage" => Ok(DataTarget::Storage(locator.to_string())),
            other => Err(CommandError::validation(
                "data target",
                format!("{other:?} is not one of block, entity, storage"),
            )),
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        match self {
            DataTarget::Block(pos) => pos.check("data target").map(|_| ()),
            DataTarget::Entity(id) | DataTarget::Storage(id) => {
                crate::command::require("data target", id).map(|_| ())
            }
        }
    }
}

impl Display for DataTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataTarget::Block(pos) => write!(f, "block {pos}"),
            DataTarget::Entity(selector) => write!(f, "entity {selector}"),
            DataTarget::Storage(id) => write!(f, "storage {id}"),
        }
    }
}

/// How `data modify` writes into the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataModifyMode {
    Append,
    Insert(i32),
    Merge,
    Prepend,
    Set,
}

impl Display for DataModifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataModifyMode::Append => f.write_str("append"),
            DataModifyMode::Insert(index) => write!(f, "insert {index}"),
            DataModifyMode::Merge => f.write_str("merge"),
            DataModifyMode::Prepend => f.write_str("prepend"),
            DataModifyMode::Set => f.write_str("set"),
        }
    }
}

/// Where `data modify` reads its value from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataSource {
    /// A literal SNBT value.
    Value(String),
    From {
        source: DataTarget,
        path: Option<String>,
    },
    /// A substring of a string tag.
    Substring {
        source: DataTarget,
        path: Option<String>,
        start: Option<i32>,
        end: Option<i32>,
    },
}

/// A tick-profiling summary reported by `debug stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub seconds: f64,
    pub ticks: Option<u64>,
    pub ticks_per_second: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerList {
    pub online: u32,
    pub max: u32,
    pub players: Vec<String>,
}

/// Result of `locate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Located {
    pub x: i32,
    /// `None` when the console reports the height as `~`.
    pub y: Option<i32>,
    pub z: i32,
    pub distance: u32,
}

/// A value returned by `bossbar get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossbarData {
    Max(i32),
    Value(i32),
    Visible(bool),
    Players(Vec<String>),
}

/// One setting applied with `bossbar set`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossbarSetting {
    Color(BossbarColor),
    Max(i32),
    /// JSON text component.
    Name(String),
    Players(Vec<String>),
    Style(BossbarStyle),
    Value(i32),
    Visible(bool),
}

impl BossbarSetting {
    pub(crate) fn check(&self) -> Result<()> {
        use crate::command::{require, require_at_least, require_list};
        match self {
            BossbarSetting::Max(max) => require_at_least("max", *max, 1).map(|_| ()),
            BossbarSetting::Value(value) => require_at_least("value", *value, 0).map(|_| ()),
            BossbarSetting::Name(name) => require("name", name).map(|_| ()),
            BossbarSetting::Players(players) if !players.is_empty() => require_list("players", players).map(|_| ()),
            _ => Ok(()),
        }
    }
}

impl Display for BossbarSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BossbarSetting::Color(color) => write!(f, "color {color}"),
            BossbarSetting::Max(max) => write!(f, "max {max}"),
            BossbarSetting::Name(name) => write!(f, "name {name}"),
            // An empty list removes every player from the bar.
            BossbarSetting::Players(players) if players.is_empty() => f.write_str("players"),
            BossbarSetting::Players(players) => write!(f, "players {}", players.join(" ")),
            BossbarSetting::Style(style) => write!(f, "style {style}"),
            BossbarSetting::Value(value) => write!(f, "value {value}"),
            BossbarSetting::Visible(visible) => write!(f, "visible {visible}"),
        }
    }
}

/// One option applied with `team modify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamOption {
    /// JSON text component.
    DisplayName(String),
    Color(TeamColor),
    FriendlyFire(bool),
    SeeFriendlyInvisibles(bool),
    NametagVisibility(Visibility),
    DeathMessageVisibility(Visibility),
    CollisionRule(CollisionRule),
    Prefix(String),
    Suffix(String),
}

impl Display for TeamOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamOption::DisplayName(name) => write!(f, "displayName {}", text_component(name)),
            TeamOption::Color(color) => write!(f, "color {color}"),
            TeamOption::FriendlyFire(on) => write!(f, "friendlyFire {on}"),
            TeamOption::SeeFriendlyInvisibles(on) => write!(f, "seeFriendlyInvisibles {on}"),
            TeamOption::NametagVisibility(v) => write!(f, "nametagVisibility {v}"),
            TeamOption::DeathMessageVisibility(v) => write!(f, "deathMessageVisibility {v}"),
            TeamOption::CollisionRule(rule) => write!(f, "collisionRule {rule}"),
            TeamOption::Prefix(text) => write!(f, "prefix {}", text_component(text)),
            TeamOption::Suffix(text) => write!(f, "suffix {}", text_component(text)),
        }
    }
}

/// Which advancements `advancement grant|revoke` touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvancementSelection {
    Everything,
    Only {
        advancement: String,
        criterion: Option<String>,
    },
    From(String),
    Through(String),
    Until(String),
}

/// Where `loot` draws its drops from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LootSource {
    Loot(String),
    Kill(String),
    Mine {
        position: Position,
        tool: Option<String>,
    },
    Fish {
        table: String,
        position: Position,
        tool: Option<String>,
    },
}

impl LootSource {
    /// The common case: roll a loot table.
    pub fn table(name: impl Into<String>) -> Self {
        LootSource::Loot(name.into())
    }

    pub(crate) fn check(&self) -> Result<()> {
        use crate::command::{require, require_opt};
        match self {
            LootSource::Loot(table) => require("loot table", table).map(|_| ()),
            LootSource::Kill(target) => require("target", target).map(|_| ()),
            LootSource::Mine { position, tool } => {
                position.check("position")?;
                require_opt("tool", tool.as_deref()).map(|_| ())
            }
            LootSource::Fish {
                table,
                position,
                tool,
            } => {
                require("loot table", table)?;
                position.check("position")?;
                require_opt("tool", tool.as_deref()).map(|_| ())
            }
        }
    }
}

impl Display for LootSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LootSource::Loot(table) => write!(f, "loot {table}"),
            LootSource::Kill(target) => write!(f, "kill {target}"),
            LootSource::Mine { position, tool } => {
                write!(f, "mine {position}")?;
                if let Some(tool) = tool {
                    write!(f, " {tool}")?;
                }
                Ok(())
            }
            LootSource::Fish {
                table,
                position,
                tool,
            } => {
                write!(f, "fish {table} {position}")?;
                if let Some(tool) = tool {
                    write!(f, " {tool}")?;
                }
                Ok(())
            }
        }
    }
}

/// Optional value change applied by `trigger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerAction {
    Add(i32),
    Set(i32),
}

impl Display for TriggerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerAction::Add(v) => write!(f, "add {v}"),
            TriggerAction::Set(v) => write!(f, "set {v}"),
        }
    }
}

/// Structured form of a scoreboard objective, for callers that hold records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardObjective {
    pub name: String,
    pub criteria: String,
    pub display_name: Option<String>,
}

/// Structured form of a score holder on one objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePlayer {
    pub name: String,
    pub objective: String,
    pub score: Option<i32>,
}

/// Operations applicable to a [`ScorePlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreOperation {
    Add,
    Remove,
    Set,
    Reset,
    Enable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_keywords_are_camel_case() {
        assert_eq!(Visibility::HideForOtherTeams.to_string(), "hideForOtherTeams");
        assert_eq!(CollisionRule::PushOwnTeam.to_string(), "pushOwnTeam");
        assert_eq!(
            "hideforownteam".parse::<Visibility>().unwrap(),
            Visibility::HideForOwnTeam
        );
        assert_eq!(
            "pushOtherTeams".parse::<CollisionRule>().unwrap(),
            CollisionRule::PushOtherTeams
        );
        assert_eq!(
            TeamOption::Prefix("[Red] ".into()).to_string(),
            "prefix \"[Red] \""
        );
    }

    #[test]
    fn test_difficulty_aliases() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("P".parse::<Difficulty>().unwrap(), Difficulty::Peaceful);
        assert_eq!("2".parse::<Difficulty>().unwrap(), Difficulty::Normal);
        let err = "extreme".parse::<Difficulty>().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("peaceful, easy, normal, hard"));
    }

    #[test]
    fn test_game_mode_aliases() {
        assert_eq!("sp".parse::<GameMode>().unwrap(), GameMode::Spectator);
        assert_eq!("s".parse::<GameMode>().unwrap(), GameMode::Survival);
        assert_eq!(GameMode::Creative.to_string(), "creative");
    }

    #[test]
    fn test_position_rendering() {
        assert_eq!(Position::from((1, 2, 3)).to_string(), "1 2 3");
        assert_eq!(Position::from((0.5, 64.0, -3.25)).to_string(), "0.5 64 -3.25");
        assert_eq!(Position::relative(0.0, 1.0, -2.0).to_string(), "~ ~1 ~-2");
        assert_eq!(Position::here().to_string(), "~ ~ ~");
        assert!(Position::from((f64::NAN, 0.0, 0.0)).check("pos").is_err());
    }

    #[test]
    fn test_time_and_range_rendering() {
        assert_eq!(TimeAmount::Ticks(100).to_string(), "100");
        assert_eq!(TimeAmount::Seconds(20.0).to_string(), "20s");
        assert_eq!(TimeAmount::Days(1.5).to_string(), "1.5d");
        assert_eq!(TimeSetting::Named(TimeOfDay::Noon).to_string(), "noon");
        assert_eq!(IntRange::between(1, 6).to_string(), "1..6");
        assert_eq!(IntRange::between(4, 4).to_string(), "4");
        assert!(IntRange::between(6, 1).check("range").is_err());
    }

    #[test]
    fn test_data_target_parse() {
        assert_eq!(
            DataTarget::parse("block", "1 64 -2").unwrap().to_string(),
            "block 1 64 -2"
        );
        assert_eq!(
            DataTarget::parse("entity", "@s").unwrap(),
            DataTarget::Entity("@s".into())
        );
        assert!(DataTarget::parse("block", "1 2").is_err());
        assert!(DataTarget::parse("chunk", "x").is_err());
    }

    #[test]
    fn test_fill_and_loot_rendering() {
        assert_eq!(FillMode::Replace(Some("minecraft:air".into())).to_string(), "replace minecraft:air");
        assert_eq!(
            LootSource::Mine {
                position: Position::from((1, 2, 3)),
                tool: Some("mainhand".into())
            }
            .to_string(),
            "mine 1 2 3 mainhand"
        );
    }
}
