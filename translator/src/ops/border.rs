//! World border.

use crate::command::{require_at_least, require_finite, require_range, CommandLine};
use crate::error::Result;
use crate::reply::{Matcher, Recognizer};
use crate::transport::Transport;
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static WIDTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^The world border is currently (-?\d+(?:\.\d+)?) block(?:s|\(s\))? wide").unwrap()
});

/// Largest diameter the console accepts.
pub const MAX_BORDER_SIZE: f64 = 59_999_968.0;

fn border_rules() -> Recognizer<()> {
    Recognizer::new()
        .reject(Matcher::prefix("Nothing changed"), "world border already in that state")
        .reject(Matcher::prefix("World border cannot"), "world border size out of range")
        .ok(Matcher::prefix("Set the world border"))
        .ok(Matcher::prefix("Set the center of the world border"))
        .ok(Matcher::prefix("Shrinking the world border"))
        .ok(Matcher::prefix("Growing the world border"))
}

impl<T: Transport> CommandTranslator<T> {
    /// Grows (or with a negative distance, shrinks) the border, optionally over `seconds`.
    pub async fn worldborder_add(&self, distance: f64, seconds: Option<u32>) -> Result<()> {
        require_finite("distance", distance)?;
        let command = CommandLine::new("worldborder add").arg(distance).opt(seconds);
        self.run(command, &border_rules()).await
    }

    pub async fn worldborder_set(&self, diameter: f64, seconds: Option<u32>) -> Result<()> {
        require_range("diameter", diameter, 1.0, MAX_BORDER_SIZE)?;
        let command = CommandLine::new("worldborder set").arg(diameter).opt(seconds);
        self.run(command, &border_rules()).await
    }

    pub async fn worldborder_center(&self, x: f64, z: f64) -> Result<()> {
        require_finite("x", x)?;
        require_finite("z", z)?;
        let command = CommandLine::new("worldborder center").arg(x).arg(z);
        self.run(command, &border_rules()).await
    }

    /// Damage per block per second outside the border buffer.
    pub async fn worldborder_damage_amount(&self, per_block: f64) -> Result<()> {
        require_at_least("damage", require_finite("damage", per_block)?, 0.0)?;
        let command = CommandLine::new("worldborder damage amount").arg(per_block);
        self.run(command, &border_rules()).await
    }

    pub async fn worldborder_damage_buffer(&self, distance: f64) -> Result<()> {
        require_at_least("buffer", require_finite("buffer", distance)?, 0.0)?;
        let command = CommandLine::new("worldborder damage buffer").arg(distance);
        self.run(command, &border_rules()).await
    }

    /// Sets the damage amount, then the buffer when given. Stops if the amount is refused.
    pub async fn worldborder_damage(&self, per_block: f64, buffer: Option<f64>) -> Result<()> {
        require_at_least("damage", require_finite("damage", per_block)?, 0.0)?;
        let mut steps = vec![(
            CommandLine::new("worldborder damage amount").arg(per_block),
            border_rules(),
        )];
        if let Some(buffer) = buffer {
            require_at_least("buffer", require_finite("buffer", buffer)?, 0.0)?;
            steps.push((
                CommandLine::new("worldborder damage buffer").arg(buffer),
                border_rules(),
            ));
        }
        self.run_sequence(steps).await
    }

    /// Current border diameter in blocks.
    pub async fn worldborder_get(&self) -> Result<f64> {
        let rules = Recognizer::new().accept(Matcher::pattern(&WIDTH), |reply| reply.parse(1));
        self.run(CommandLine::new("worldborder get"), &rules).await
    }

    pub async fn worldborder_warning_distance(&self, blocks: u32) -> Result<()> {
        let command = CommandLine::new("worldborder warning distance").arg(blocks);
        self.run(command, &border_rules()).await
    }

    pub async fn worldborder_warning_time(&self, seconds: u32) -> Result<()> {
        let command = CommandLine::new("worldborder warning time").arg(seconds);
        self.run(command, &border_rules()).await
    }

    /// Sets the warning distance, then the warning time when given.
    pub async fn worldborder_warning(&self, blocks: u32, seconds: Option<u32>) -> Result<()> {
        let mut steps = vec![(
            CommandLine::new("worldborder warning distance").arg(blocks),
            border_rules(),
        )];
        if let Some(seconds) = seconds {
            steps.push((
                CommandLine::new("worldborder warning time").arg(seconds),
                border_rules(),
            ));
        }
        self.run_sequence(steps).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::stub::StubTransport;
    use crate::CommandTranslator;
    use assert_approx_eq::assert_approx_eq;

    #[tokio::test]
    async fn test_get_width() {
        let console = answering("worldborder get", "The world border is currently 59999968 block(s) wide");
        assert_approx_eq!(console.worldborder_get().await.unwrap(), 59_999_968.0);

        let console = answering("worldborder get", "The world border is currently 12.5 blocks wide");
        assert_approx_eq!(console.worldborder_get().await.unwrap(), 12.5);
    }

    #[tokio::test]
    async fn test_set_and_add() {
        let console = always("Shrinking the world border to 100.0 block(s) wide over 60 second(s)");
        console.worldborder_set(100.0, Some(60)).await.unwrap();
        console.worldborder_add(-20.5, None).await.unwrap();
        assert_eq!(
            console.transport().commands(),
            vec!["worldborder set 100 60", "worldborder add -20.5"]
        );

        assert!(console.worldborder_set(0.5, None).await.unwrap_err().is_validation());
        assert_eq!(console.transport().call_count(), 2);
    }

    #[tokio::test]
    async fn test_nothing_changed_is_domain() {
        let console = always("Nothing changed. The world border is already centered there");
        assert!(console.worldborder_center(0.0, 0.0).await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_damage_sequence() {
        let stub = StubTransport::new()
            .with_reply("worldborder damage amount 0.2", "Set the world border damage to 0.20 per block each second")
            .with_reply("worldborder damage buffer 5", "Set the world border damage buffer to 5.0 block(s)");
        let console = CommandTranslator::new(stub);
        console.worldborder_damage(0.2, Some(5.0)).await.unwrap();
        assert_eq!(console.transport().call_count(), 2);
    }

    #[tokio::test]
    async fn test_damage_sequence_fails_fast() {
        let console = always("Nothing changed. The world border damage is already that amount");
        assert!(console.worldborder_damage(1.0, Some(5.0)).await.unwrap_err().is_domain());
        assert_eq!(console.transport().commands(), vec!["worldborder damage amount 1"]);
    }

    #[tokio::test]
    async fn test_negative_damage_rejected_locally() {
        let console = always("Set the world border damage to 0 per block each second");
        assert!(console.worldborder_damage_amount(-1.0).await.unwrap_err().is_validation());
        assert!(console.worldborder_damage(1.0, Some(-2.0)).await.unwrap_err().is_validation());
        assert_eq!(console.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_warning_sequence() {
        let console = always("Set the world border warning distance to 10 block(s)");
        console.worldborder_warning(10, None).await.unwrap();
        assert_eq!(console.transport().commands(), vec!["worldborder warning distance 10"]);

        let console = always("Set the world border warning time to 15 second(s)");
        console.worldborder_warning(10, Some(15)).await.unwrap();
        assert_eq!(
            console.transport().commands(),
            vec!["worldborder warning distance 10", "worldborder warning time 15"]
        );
    }
}
