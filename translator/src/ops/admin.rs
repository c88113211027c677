//! Server administration: bans, whitelist, operators, saving, lifecycle.

use crate::command::{require, require_list, require_opt, require_range, CommandLine};
use crate::error::{CommandError, Result};
use crate::reply::{split_list, Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::{BanListKind, PlayerList, WhitelistAction};
use crate::CommandTranslator;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

static BAN_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^There (?:are|is) (\d+) ban(?:s|\(s\))?:\s*(.*)$").unwrap());
static WHITELIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^There (?:are|is) (\d+) whitelisted players?(?:\(s\))?:\s*(.*)$").unwrap()
});
static PLAYERS_OF_MAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^There are (\d+) of a max of (\d+) players online:\s*(.*)$").unwrap()
});
static PLAYERS_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^There are (\d+)/(\d+) players online:\s*(.*)$").unwrap());
static BANNED_BY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?) was banned by ").unwrap());

/// Splits a ban list payload. Detailed entries (`X was banned by Y: reason`)
/// come one per line and reduce to `X`; short lists are comma separated.
fn ban_entries(payload: &str) -> Vec<String> {
    if BANNED_BY.is_match(payload.lines().next().unwrap_or_default()) {
        return payload
            .lines()
            .filter_map(|line| BANNED_BY.captures(line.trim()))
            .filter_map(|captures| captures.get(1))
            .map(|name| name.as_str().to_string())
            .collect();
    }
    split_list(payload)
}

fn player_list(reply: &crate::reply::Reply<'_>) -> Option<PlayerList> {
    Some(PlayerList {
        online: reply.parse(1)?,
        max: reply.parse(2)?,
        players: split_list(reply.group(3).unwrap_or_default()),
    })
}

impl<T: Transport> CommandTranslator<T> {
    /// Bans a player by name, with an optional reason. Returns the console's confirmation.
    pub async fn ban(&self, target: &str, reason: Option<&str>) -> Result<String> {
        let target = require("target", target)?;
        let reason = require_opt("reason", reason)?;
        let command = CommandLine::new("ban").arg(target).opt(reason);
        let rules = Recognizer::new()
            .text(Matcher::prefix("Banned"))
            .reject(Matcher::contains("already banned"), "player is already banned");
        self.run(command, &rules).await
    }

    pub async fn ban_ip(&self, target: &str, reason: Option<&str>) -> Result<String> {
        let target = require("target", target)?;
        let reason = require_opt("reason", reason)?;
        let command = CommandLine::new("ban-ip").arg(target).opt(reason);
        let rules = Recognizer::new()
            .text(Matcher::prefix("Banned"))
            .reject(Matcher::contains("already banned"), "address is already banned")
            .reject(Matcher::prefix("Invalid IP address"), "not an address or online player");
        self.run(command, &rules).await
    }

    /// Names (or addresses) on the chosen ban list.
    pub async fn ban_list(&self, kind: BanListKind) -> Result<Vec<String>> {
        let command = CommandLine::new("banlist").arg(kind);
        let rules = Recognizer::new()
            .accept(Matcher::prefix("There are no bans"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&BAN_LIST), |reply| {
                Some(ban_entries(reply.group(2).unwrap_or_default()))
            });
        self.run(command, &rules).await
    }

    pub async fn pardon(&self, target: &str) -> Result<()> {
        let target = require("target", target)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Unbanned"))
            .reject(Matcher::contains("isn't banned"), "player is not banned");
        self.run(CommandLine::new("pardon").arg(target), &rules).await
    }

    pub async fn pardon_ip(&self, address: &str) -> Result<()> {
        let address = require("address", address)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Unbanned IP"))
            .reject(Matcher::contains("isn't banned"), "address is not banned")
            .reject(Matcher::prefix("Invalid IP address"), "not a valid address");
        self.run(CommandLine::new("pardon-ip").arg(address), &rules).await
    }

    /// Runs one whitelist action. `add` and `remove` need a player; `list`
    /// is better served by [`Self::whitelist_list`], here it only confirms.
    pub async fn whitelist(&self, action: WhitelistAction, player: Option<&str>) -> Result<()> {
        let player = require_opt("player", player)?;
        let command = CommandLine::new("whitelist").arg(action);
        let (command, rules) = match action {
            WhitelistAction::Add | WhitelistAction::Remove => {
                let player = player.ok_or_else(|| {
                    CommandError::validation("player", format!("required for whitelist {action}"))
                })?;
                let rules = Recognizer::new()
                    .ok(Matcher::prefix("Added"))
                    .ok(Matcher::prefix("Removed"))
                    .ok(Matcher::prefix("Player added to whitelist"))
                    .ok(Matcher::prefix("Player removed from whitelist"))
                    .reject(Matcher::prefix("Player is already whitelisted"), "already whitelisted")
                    .reject(Matcher::prefix("Player is not whitelisted"), "not whitelisted")
                    .reject(Matcher::prefix("Could not add player to whitelist"), "player could not be added")
                    .reject(Matcher::prefix("Could not remove player from whitelist"), "player could not be removed");
                (command.arg(player), rules)
            }
            WhitelistAction::On | WhitelistAction::Off => {
                let rules = Recognizer::new()
                    .ok(Matcher::prefix("Whitelist is now turned"))
                    .ok(Matcher::prefix("Turned on the whitelist"))
                    .ok(Matcher::prefix("Turned off the whitelist"))
                    .reject(Matcher::prefix("Whitelist is already turned"), "whitelist already in that state");
                (command, rules)
            }
            WhitelistAction::Reload => (
                command,
                Recognizer::new()
                    .ok(Matcher::prefix("Reloaded the whitelist"))
                    .ok(Matcher::exact("Whitelist reloaded")),
            ),
            WhitelistAction::List => (
                command,
                Recognizer::new()
                    .ok(Matcher::prefix("There are no whitelisted players"))
                    .ok(Matcher::exact("Whitelist is empty"))
                    .ok(Matcher::pattern(&WHITELIST)),
            ),
        };
        self.run(command, &rules).await
    }

    pub async fn whitelist_list(&self) -> Result<Vec<String>> {
        let rules = Recognizer::new()
            .accept(Matcher::prefix("There are no whitelisted players"), |_| Some(Vec::new()))
            .accept(Matcher::exact("Whitelist is empty"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&WHITELIST), |reply| {
                Some(split_list(reply.group(2).unwrap_or_default()))
            });
        self.run(CommandLine::new("whitelist list"), &rules).await
    }

    pub async fn op(&self, target: &str) -> Result<()> {
        let target = require("target", target)?;
        self.run(CommandLine::new("op").arg(target), &op_rules()).await
    }

    /// Ops every listed player in turn, stopping at the first refusal.
    pub async fn op_players<S: AsRef<str>>(&self, targets: &[S]) -> Result<()> {
        let targets = require_list("targets", targets)?;
        let steps = targets
            .into_iter()
            .map(|target| (CommandLine::new("op").arg(target), op_rules()))
            .collect();
        self.run_sequence(steps).await
    }

    pub async fn deop(&self, target: &str) -> Result<()> {
        let target = require("target", target)?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Made"))
            .reject(Matcher::contains("is not an operator"), "player is not an operator")
            .reject(Matcher::contains("is not an op"), "player is not an operator");
        self.run(CommandLine::new("deop").arg(target), &rules).await
    }

    pub async fn kick(&self, target: &str, reason: Option<&str>) -> Result<()> {
        let target = require("target", target)?;
        let reason = require_opt("reason", reason)?;
        let rules = Recognizer::new().ok(Matcher::prefix("Kicked"));
        self.run(CommandLine::new("kick").arg(target).opt(reason), &rules)
            .await
    }

    /// Who is online. With `uuids`, each entry carries its UUID in parentheses.
    pub async fn list_players(&self, uuids: bool) -> Result<PlayerList> {
        let command = CommandLine::new("list").flag(uuids, "uuids");
        let rules = Recognizer::new()
            .accept(Matcher::pattern(&PLAYERS_OF_MAX), player_list)
            .accept(Matcher::pattern(&PLAYERS_SLASH), player_list);
        self.run(command, &rules).await
    }

    pub async fn save_all(&self, flush: bool) -> Result<()> {
        let rules = Recognizer::new()
            .reject(Matcher::contains("Failed"), "saving failed")
            .reject(Matcher::contains("Saving failed"), "saving failed")
            .ok(Matcher::contains("Saved the game"))
            .ok(Matcher::prefix("Saving"));
        self.run(CommandLine::new("save-all").flag(flush, "flush"), &rules)
            .await
    }

    pub async fn save_off(&self) -> Result<()> {
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Automatic saving is now disabled"))
            .reject(Matcher::prefix("Saving is already turned off"), "saving already off");
        self.run(CommandLine::new("save-off"), &rules).await
    }

    pub async fn save_on(&self) -> Result<()> {
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Automatic saving is now enabled"))
            .reject(Matcher::prefix("Saving is already turned on"), "saving already on");
        self.run(CommandLine::new("save-on"), &rules).await
    }

    /// Asks the server to shut down. The console may close before answering
    /// in full, so an empty reply also counts.
    pub async fn stop(&self) -> Result<()> {
        info!("requesting server stop");
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Stopping"))
            .ok(Matcher::exact(""));
        self.run(CommandLine::new("stop"), &rules).await
    }

    pub async fn reload(&self) -> Result<()> {
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Reload failed"), "reload failed, old data kept")
            .ok(Matcher::prefix("Reloading"))
            .ok(Matcher::contains("reloaded"));
        self.run(CommandLine::new("reload"), &rules).await
    }

    /// Sets the idle kick timeout in minutes; `0` disables it.
    pub async fn set_idle_timeout(&self, minutes: i64) -> Result<()> {
        let minutes = require_range("minutes", minutes, 0, i64::from(i32::MAX))?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("The player idle timeout is now"))
            .ok(Matcher::prefix("Set the idle kick timer"));
        self.run(CommandLine::new("setidletimeout").arg(minutes), &rules)
            .await
    }
}

fn op_rules() -> Recognizer<()> {
    Recognizer::new()
        .ok(Matcher::prefix("Made "))
        .reject(Matcher::contains("already is an operator"), "player is already an operator")
        .reject(Matcher::prefix("No such player"), "player not found or offline")
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::stub::StubTransport;
    use crate::types::{BanListKind, WhitelistAction};
    use crate::CommandTranslator;

    #[tokio::test]
    async fn test_ban_list_scenario() {
        let console = answering("banlist players", "There are 2 bans: Alice, Bob");
        let bans = console.ban_list(BanListKind::Players).await.unwrap();
        assert_eq!(bans, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_ban_list_detailed_entries() {
        let reply = "There are 2 ban(s):\nAlice was banned by Server: Banned by an operator.\nBob was banned by Steve: griefing, again";
        let console = answering("banlist players", reply);
        assert_eq!(
            console.ban_list(BanListKind::Players).await.unwrap(),
            vec!["Alice", "Bob"]
        );
    }

    #[tokio::test]
    async fn test_ban_list_empty() {
        let console = answering("banlist ips", "There are no bans");
        assert!(console.ban_list(BanListKind::Ips).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ban_sent_once_without_trailing_space() {
        let console = always("Banned Steve: Banned by an operator.");
        console.ban("Steve", None).await.unwrap();
        assert_eq!(console.transport().commands(), vec!["ban Steve"]);
    }

    #[tokio::test]
    async fn test_ban_with_reason_and_already_banned() {
        let console = answering("ban Steve griefing spawn", "Nothing changed. The player is already banned");
        let err = console.ban("Steve", Some("griefing spawn")).await.unwrap_err();
        assert!(err.is_domain());
        assert_eq!(err.command(), Some("ban Steve griefing spawn"));
    }

    #[tokio::test]
    async fn test_ban_empty_target_never_sent() {
        let console = always("Banned");
        assert!(console.ban("", None).await.unwrap_err().is_validation());
        assert!(console.ban_ip(" ", Some("x")).await.unwrap_err().is_validation());
        assert_eq!(console.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_pardon_variants() {
        let console = answering("pardon Alice", "Unbanned Alice");
        console.pardon("Alice").await.unwrap();

        let console = answering("pardon-ip 10.0.0.1", "Nothing changed. That IP isn't banned");
        assert!(console.pardon_ip("10.0.0.1").await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_whitelist_add_requires_player() {
        let console = always("Added Steve to the whitelist");
        let err = console.whitelist(WhitelistAction::Add, None).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(console.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitelist_add_and_already_whitelisted() {
        let console = answering("whitelist add Steve", "Added Steve to the whitelist");
        console.whitelist(WhitelistAction::Add, Some("Steve")).await.unwrap();

        let console = answering("whitelist add Steve", "Player is already whitelisted");
        let err = console
            .whitelist(WhitelistAction::Add, Some("Steve"))
            .await
            .unwrap_err();
        assert!(err.is_domain());
    }

    #[tokio::test]
    async fn test_whitelist_list() {
        let console = answering(
            "whitelist list",
            "There are 3 whitelisted player(s): Alice, Bob, Carol",
        );
        assert_eq!(
            console.whitelist_list().await.unwrap(),
            vec!["Alice", "Bob", "Carol"]
        );
    }

    #[tokio::test]
    async fn test_whitelist_legacy_wording() {
        let console = answering("whitelist on", "Turned on the whitelist");
        console.whitelist(WhitelistAction::On, None).await.unwrap();

        let console = answering("whitelist off", "Turned off the whitelist");
        console.whitelist(WhitelistAction::Off, None).await.unwrap();

        let console = answering("whitelist reload", "Whitelist reloaded");
        console.whitelist(WhitelistAction::Reload, None).await.unwrap();

        let console = answering("whitelist list", "Whitelist is empty");
        console.whitelist(WhitelistAction::List, None).await.unwrap();
        assert!(console.whitelist_list().await.unwrap().is_empty());

        let console = answering("whitelist add Bob", "Could not add player to whitelist");
        let err = console.whitelist(WhitelistAction::Add, Some("Bob")).await.unwrap_err();
        assert!(err.is_domain());

        let console = answering("whitelist remove Bob", "Could not remove player from whitelist");
        let err = console.whitelist(WhitelistAction::Remove, Some("Bob")).await.unwrap_err();
        assert!(err.is_domain());
    }

    #[tokio::test]
    async fn test_op_players_stops_on_failure() {
        let stub = StubTransport::new()
            .with_reply("op Alice", "Made Alice a server operator")
            .with_reply("op Bob", "Nothing changed. The player already is an operator")
            .with_reply("op Carol", "Made Carol a server operator");
        let console = CommandTranslator::new(stub);

        let err = console.op_players(&["Alice", "Bob", "Carol"]).await.unwrap_err();
        assert!(err.is_domain());
        assert_eq!(console.transport().commands(), vec!["op Alice", "op Bob"]);
    }

    #[tokio::test]
    async fn test_deop_not_an_operator() {
        let console = answering("deop Bob", "Nothing changed. The player is not an operator");
        assert!(console.deop("Bob").await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_kick() {
        let console = answering("kick Steve", "Kicked Steve: Kicked by an operator");
        console.kick("Steve", None).await.unwrap();

        let console = answering("kick Ghost", "No player was found");
        assert!(console.kick("Ghost", None).await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_list_players_both_wordings() {
        let console = answering("list", "There are 2 of a max of 20 players online: Alice, Bob");
        let list = console.list_players(false).await.unwrap();
        assert_eq!(list.online, 2);
        assert_eq!(list.max, 20);
        assert_eq!(list.players, vec!["Alice", "Bob"]);

        let console = answering("list uuids", "There are 0/10 players online: ");
        let list = console.list_players(true).await.unwrap();
        assert_eq!((list.online, list.max), (0, 10));
        assert!(list.players.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let console = answering("save-all flush", "Saving the game (this may take a moment!)Saved the game");
        console.save_all(true).await.unwrap();

        let console = answering("save-off", "Saving is already turned off");
        assert!(console.save_off().await.unwrap_err().is_domain());

        let console = answering("reload", "Reloading!");
        console.reload().await.unwrap();

        let console = answering("stop", "");
        console.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_idle_timeout_range() {
        let console = answering("setidletimeout 15", "The player idle timeout is now 15 minute(s)");
        console.set_idle_timeout(15).await.unwrap();

        assert!(console.set_idle_timeout(-1).await.unwrap_err().is_validation());
        assert!(console
            .set_idle_timeout(i64::from(i32::MAX) + 1)
            .await
            .unwrap_err()
            .is_validation());
        assert_eq!(console.transport().call_count(), 1);
    }
}
