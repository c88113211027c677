//! Console operations, one `impl CommandTranslator` block per subject.

mod admin;
mod border;
mod bossbar;
mod chat;
mod data;
mod debug;
mod entity;
mod environment;
mod execute;
mod player;
mod scoreboard;
mod sound;
mod team;
mod world;
