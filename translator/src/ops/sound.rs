//! Sounds and particles.

use crate::command::{require, require_at_least, require_finite, require_opt, require_range, require_token, CommandLine};
use crate::error::Result;
use crate::reply::{Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::{ParticleMode, Position, SoundSource};
use crate::CommandTranslator;

impl<T: Transport> CommandTranslator<T> {
    /// Plays `sound` to `targets`. The trailing arguments are positional:
    /// each one requires every argument before it.
    #[allow(clippy::too_many_arguments)]
    pub async fn play_sound(
        &self,
        sound: &str,
        source: SoundSource,
        targets: &str,
        position: Option<Position>,
        volume: Option<f64>,
        pitch: Option<f64>,
        min_volume: Option<f64>,
    ) -> Result<()> {
        let sound = require_token("sound", sound)?;
        let targets = require("targets", targets)?;
        if let Some(position) = &position {
            position.check("position")?;
        }
        if let Some(volume) = volume {
            require_at_least("volume", require_finite("volume", volume)?, 0.0)?;
        }
        if let Some(pitch) = pitch {
            require_range("pitch", require_finite("pitch", pitch)?, 0.0, 2.0)?;
        }
        if let Some(min_volume) = min_volume {
            require_range("min volume", require_finite("min volume", min_volume)?, 0.0, 1.0)?;
        }
        let command = CommandLine::new("playsound")
            .arg(sound)
            .arg(source)
            .arg(targets)
            .chain(&[
                ("position", position.map(|p| p.to_string())),
                ("volume", volume.map(|v| v.to_string())),
                ("pitch", pitch.map(|p| p.to_string())),
                ("min volume", min_volume.map(|m| m.to_string())),
            ])?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Played sound"))
            .reject(Matcher::contains("too far away to hear"), "no target can hear the sound");
        self.run(command, &rules).await
    }

    /// Stops sounds for `targets`, narrowed by source and/or sound id.
    pub async fn stop_sound(&self, targets: &str, source: Option<SoundSource>, sound: Option<&str>) -> Result<()> {
        let targets = require("targets", targets)?;
        let sound = sound.map(|s| require_token("sound", s)).transpose()?;
        let mut command = CommandLine::new("stopsound").arg(targets);
        command = match (source, sound) {
            (Some(source), sound) => command.arg(source).opt(sound),
            // Any source, one sound.
            (None, Some(sound)) => command.arg("*").arg(sound),
            (None, None) => command,
        };
        let rules = Recognizer::new().ok(Matcher::prefix("Stopped"));
        self.run(command, &rules).await
    }

    /// Spawns `count` particles spread over `delta` around `position`.
    #[allow(clippy::too_many_arguments)]
    pub async fn particle(
        &self,
        name: &str,
        position: Position,
        delta: (f64, f64, f64),
        speed: f64,
        count: u32,
        mode: Option<ParticleMode>,
        viewers: Option<&str>,
    ) -> Result<()> {
        let name = require("particle", name)?;
        let position = position.check("position")?;
        let delta = Position::from(delta).check("delta")?;
        let speed = require_at_least("speed", require_finite("speed", speed)?, 0.0)?;
        let viewers = require_opt("viewers", viewers)?;
        let command = CommandLine::new("particle")
            .arg(name)
            .arg(position)
            .arg(delta)
            .arg(speed)
            .arg(count)
            .chain(&[
                ("mode", mode.map(|m| m.to_string())),
                ("viewers", viewers.map(str::to_string)),
            ])?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Displaying particle"))
            .reject(Matcher::prefix("Unable to see the particle"), "no player can see the particle")
            .reject(Matcher::prefix("Failed"), "particle could not be shown");
        self.run(command, &rules).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::types::{ParticleMode, Position, SoundSource};

    #[tokio::test]
    async fn test_play_sound_chain() {
        let console = always("Played sound minecraft:entity.pig.ambient to Steve");
        console
            .play_sound("minecraft:entity.pig.ambient", SoundSource::Neutral, "Steve", None, None, None, None)
            .await
            .unwrap();
        console
            .play_sound(
                "minecraft:entity.pig.ambient",
                SoundSource::Master,
                "@a",
                Some(Position::relative(0.0, 0.0, 0.0)),
                Some(2.0),
                Some(0.5),
                None,
            )
            .await
            .unwrap();
        assert_eq!(
            console.transport().commands(),
            vec![
                "playsound minecraft:entity.pig.ambient neutral Steve",
                "playsound minecraft:entity.pig.ambient master @a ~ ~ ~ 2 0.5",
            ]
        );
    }

    #[tokio::test]
    async fn test_play_sound_gap_rejected() {
        let console = always("Played sound");
        let err = console
            .play_sound("minecraft:ui.button.click", SoundSource::Master, "@a", None, Some(1.0), None, None)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(console.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_play_sound_out_of_range() {
        let console = always("The player is too far away to hear the sound");
        assert!(console
            .play_sound("minecraft:ui.button.click", SoundSource::Master, "Steve", None, None, None, None)
            .await
            .unwrap_err()
            .is_domain());
    }

    #[tokio::test]
    async fn test_stop_sound_forms() {
        let console = always("Stopped all sounds");
        console.stop_sound("@a", None, None).await.unwrap();
        console
            .stop_sound("@a", None, Some("minecraft:music.game"))
            .await
            .unwrap();
        console.stop_sound("@a", Some(SoundSource::Weather), None).await.unwrap();
        assert_eq!(
            console.transport().commands(),
            vec![
                "stopsound @a",
                "stopsound @a * minecraft:music.game",
                "stopsound @a weather",
            ]
        );
    }

    #[tokio::test]
    async fn test_particle() {
        let console = answering(
            "particle minecraft:flame 0 64 0 0.5 0.5 0.5 0.01 20 force @a",
            "Displaying particle minecraft:flame",
        );
        console
            .particle(
                "minecraft:flame",
                Position::from((0, 64, 0)),
                (0.5, 0.5, 0.5),
                0.01,
                20,
                Some(ParticleMode::Force),
                Some("@a"),
            )
            .await
            .unwrap();

        let console = always("");
        assert!(console
            .particle("minecraft:flame", Position::from((0, 64, 0)), (0.0, 0.0, 0.0), 0.0, 1, None, Some("@a"))
            .await
            .unwrap_err()
            .is_validation());
    }
}
