//! NBT data access and datapack management.

use crate::command::{require, require_opt, CommandLine};
use crate::error::Result;
use crate::reply::{split_bracketed_list, Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::{DataModifyMode, DataSource, DataTarget, DatapackFilter, DatapackOrder};
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static DATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)has the following (?:[a-z]+ data|contents): (.*)$").unwrap());
static SCALED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Got value of .+ after scale factor of .+ is (.+)$").unwrap());
static PACK_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) (?:data )?packs? (?:loaded|disabled|enabled)").unwrap());
static PACK_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^There (?:are|is) \d+ data packs?(?:\(s\))? (?:enabled|available): (.*)$").unwrap());

pub(crate) fn merge_rules() -> Recognizer<()> {
    Recognizer::new()
        .ok(Matcher::prefix("Modified"))
        .reject(Matcher::prefix("Nothing changed"), "properties already have these values")
        .reject(Matcher::prefix("Unable to modify player data"), "player data cannot be modified")
        .reject(Matcher::contains("is not a block entity"), "target block holds no data")
        .reject(Matcher::prefix("Found no elements matching"), "path matched nothing")
}

fn datapack_toggle_rules() -> Recognizer<()> {
    Recognizer::new()
        .reject(Matcher::prefix("Failed"), "datapack change failed")
        .reject(Matcher::prefix("Unknown data pack"), "unknown datapack")
        .reject(Matcher::contains("is already enabled"), "datapack already enabled")
        .reject(Matcher::contains("is not enabled"), "datapack not enabled")
        .ok(Matcher::prefix("Enabled pack"))
        .ok(Matcher::prefix("Disabled pack"))
        .ok(Matcher::pattern(&PACK_COUNT))
}

impl<T: Transport> CommandTranslator<T> {
    /// Reads NBT at `path` (or the whole target). With `scale` the value is
    /// read as a number and multiplied; `scale` requires a path.
    pub async fn data_get(&self, target: &DataTarget, path: Option<&str>, scale: Option<f64>) -> Result<String> {
        target.check()?;
        let path = require_opt("path", path)?;
        let command = CommandLine::new("data get").arg(target).chain(&[
            ("path", path.map(str::to_string)),
            ("scale", scale.map(|s| s.to_string())),
        ])?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Found no elements matching"), "path matched nothing")
            .reject(Matcher::contains("is not a block entity"), "target block holds no data")
            .accept(Matcher::pattern(&DATA), |reply| reply.owned(1))
            .accept(Matcher::pattern(&SCALED), |reply| reply.owned(1));
        self.run(command, &rules).await
    }

    pub async fn data_merge(&self, target: &DataTarget, nbt: &str) -> Result<()> {
        target.check()?;
        let nbt = require("nbt", nbt)?;
        self.run(CommandLine::new("data merge").arg(target).arg(nbt), &merge_rules())
            .await
    }

    /// Writes into `path` on `target` from a literal value or another NBT source.
    pub async fn data_modify(&self, target: &DataTarget, path: &str, mode: DataModifyMode, source: &DataSource) -> Result<()> {
        target.check()?;
        let path = require("path", path)?;
        let command = CommandLine::new("data modify").arg(target).arg(path).arg(mode);
        let command = match source {
            DataSource::Value(value) => command.arg("value").arg(require("value", value)?),
            DataSource::From { source, path } => {
                source.check()?;
                let path = require_opt("source path", path.as_deref())?;
                command.arg("from").arg(source).opt(path)
            }
            DataSource::Substring {
                source,
                path,
                start,
                end,
            } => {
                source.check()?;
                let path = require_opt("source path", path.as_deref())?;
                command.arg("string").arg(source).chain(&[
                    ("source path", path.map(str::to_string)),
                    ("start", start.map(|s| s.to_string())),
                    ("end", end.map(|e| e.to_string())),
                ])?
            }
        };
        self.run(command, &merge_rules()).await
    }

    pub async fn data_remove(&self, target: &DataTarget, path: &str) -> Result<()> {
        target.check()?;
        let path = require("path", path)?;
        self.run(CommandLine::new("data remove").arg(target).arg(path), &merge_rules())
            .await
    }

    /// Enables a datapack, optionally placing it relative to the load order.
    pub async fn datapack_enable(&self, name: &str, order: Option<DatapackOrder>) -> Result<()> {
        let name = require("name", name)?;
        let command = CommandLine::new("datapack enable").arg(name).opt(order);
        self.run(command, &datapack_toggle_rules()).await
    }

    /// Enables `name` directly before or after `existing` in the load order.
    pub async fn datapack_enable_relative(&self, name: &str, before: bool, existing: &str) -> Result<()> {
        let name = require("name", name)?;
        let existing = require("existing", existing)?;
        let command = CommandLine::new("datapack enable")
            .arg(name)
            .arg(if before { "before" } else { "after" })
            .arg(existing);
        self.run(command, &datapack_toggle_rules()).await
    }

    pub async fn datapack_disable(&self, name: &str) -> Result<()> {
        let name = require("name", name)?;
        self.run(CommandLine::new("datapack disable").arg(name), &datapack_toggle_rules())
            .await
    }

    /// Lists datapacks, all of them or only the enabled or available ones.
    pub async fn datapack_list(&self, filter: Option<DatapackFilter>) -> Result<Vec<String>> {
        let rules = Recognizer::new()
            .accept(Matcher::prefix("There are no"), |_| Some(Vec::new()))
            .accept(Matcher::pattern(&PACK_LIST), |reply| {
                Some(split_bracketed_list(reply.group(1).unwrap_or_default()))
            });
        self.run(CommandLine::new("datapack list").opt(filter), &rules)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::types::{DataModifyMode, DataSource, DataTarget, DatapackFilter, DatapackOrder, Position};

    #[tokio::test]
    async fn test_data_get_entity() {
        let console = answering(
            "data get entity Steve Health",
            "Steve has the following entity data: 20.0f",
        );
        let value = console
            .data_get(&DataTarget::Entity("Steve".into()), Some("Health"), None)
            .await
            .unwrap();
        assert_eq!(value, "20.0f");
    }

    #[tokio::test]
    async fn test_data_get_scale_requires_path() {
        let console = always("");
        let err = console
            .data_get(&DataTarget::Storage("demo:store".into()), None, Some(2.0))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(console.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_data_get_block_missing() {
        let console = always("The target block is not a block entity");
        let target = DataTarget::Block(Position::from((0, 64, 0)));
        assert!(console.data_get(&target, None, None).await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_data_merge_and_remove() {
        let console = answering("data merge block 1 2 3 {Lock:\"key\"}", "Modified block data of 1, 2, 3");
        console
            .data_merge(&DataTarget::Block(Position::from((1, 2, 3))), "{Lock:\"key\"}")
            .await
            .unwrap();

        let console = answering("data remove storage demo:store items[0]", "Found no elements matching items[0]");
        assert!(console
            .data_remove(&DataTarget::Storage("demo:store".into()), "items[0]")
            .await
            .unwrap_err()
            .is_domain());
    }

    #[tokio::test]
    async fn test_data_modify_shapes() {
        let console = always("Modified storage demo:store");
        let store = DataTarget::Storage("demo:store".into());

        console
            .data_modify(&store, "count", DataModifyMode::Set, &DataSource::Value("5".into()))
            .await
            .unwrap();
        console
            .data_modify(
                &store,
                "items",
                DataModifyMode::Insert(0),
                &DataSource::From {
                    source: DataTarget::Entity("@s".into()),
                    path: Some("SelectedItem".into()),
                },
            )
            .await
            .unwrap();
        console
            .data_modify(
                &store,
                "prefix",
                DataModifyMode::Set,
                &DataSource::Substring {
                    source: DataTarget::Entity("@s".into()),
                    path: Some("CustomName".into()),
                    start: Some(0),
                    end: Some(3),
                },
            )
            .await
            .unwrap();

        assert_eq!(
            console.transport().commands(),
            vec![
                "data modify storage demo:store count set value 5",
                "data modify storage demo:store items insert 0 from entity @s SelectedItem",
                "data modify storage demo:store prefix set string entity @s CustomName 0 3",
            ]
        );
    }

    #[tokio::test]
    async fn test_datapack_toggle() {
        let console = answering("datapack enable \"file/demo.zip\" last", "Enabled pack [file/demo.zip]");
        console
            .datapack_enable("\"file/demo.zip\"", Some(DatapackOrder::Last))
            .await
            .unwrap();

        let console = answering("datapack disable vanilla", "2 packs disabled");
        console.datapack_disable("vanilla").await.unwrap();

        let console = always("Unknown data pack 'ghost'");
        assert!(console.datapack_enable("ghost", None).await.unwrap_err().is_domain());

        let console = always("Enabled pack [file/b.zip]");
        console.datapack_enable_relative("file/b.zip", true, "file/a.zip").await.unwrap();
        assert_eq!(
            console.transport().commands(),
            vec!["datapack enable file/b.zip before file/a.zip"]
        );
    }

    #[tokio::test]
    async fn test_datapack_list() {
        let console = answering(
            "datapack list enabled",
            "There are 2 data pack(s) enabled: [vanilla (built-in)], [file/demo.zip]",
        );
        assert_eq!(
            console.datapack_list(Some(DatapackFilter::Enabled)).await.unwrap(),
            vec!["vanilla (built-in)", "file/demo.zip"]
        );

        let console = answering("datapack list available", "There are no more data packs available");
        assert!(console
            .datapack_list(Some(DatapackFilter::Available))
            .await
            .unwrap()
            .is_empty());
    }
}
