//! Profiling sessions, functions, schedules and random sequences.
//!
//! Start and stop halves are independent calls. Nothing is remembered
//! between them; the console alone knows whether a session is running, so a
//! stop without a matching start is judged purely on its own reply.

use crate::command::{require_opt, require_token, CommandLine};
use crate::error::Result;
use crate::reply::{Matcher, Recognizer};
use crate::transport::Transport;
use crate::types::{IntRange, RandomMode, ScheduleMode, TickReport, TimeAmount};
use crate::CommandTranslator;
use once_cell::sync::Lazy;
use regex::Regex;

static STOPPED_TICKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Stopped (?:tick |performance |debug )?profiling after ([\d.]+) seconds and (\d+) ticks \(([\d.]+) ticks per second\)").unwrap()
});
static STOPPED_MS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Stopped after ([\d.]+) ms \(([\d.]+) tps\)").unwrap());
static EXECUTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:Executed|Traced) (\d+) commands?(?:\(s\))? from function").unwrap());
static SUCCESS_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"Success count is (\d+)").unwrap());
static RETURNED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Function \S+ returned (-?\d+)").unwrap());
static UNSCHEDULED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Removed (\d+) schedules? (?:\(s\) )?with id").unwrap());
static RANDOM_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w ]+: (-?\d+)$").unwrap());
static ROLLED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+ rolled (-?\d+)").unwrap());

fn tick_report(reply: &crate::reply::Reply<'_>) -> Option<TickReport> {
    Some(TickReport {
        seconds: reply.parse(1)?,
        ticks: Some(reply.parse(2)?),
        ticks_per_second: reply.parse(3)?,
    })
}

impl<T: Transport> CommandTranslator<T> {
    pub async fn debug_start(&self) -> Result<()> {
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Started tick profiling"))
            .ok(Matcher::prefix("Started debug profiling"))
            .reject(Matcher::contains("already"), "profiler already running");
        self.run(CommandLine::new("debug start"), &rules).await
    }

    /// Stops tick profiling and reports how long it ran and the tick rate.
    pub async fn debug_stop(&self) -> Result<TickReport> {
        let rules = Recognizer::new()
            .accept(Matcher::pattern(&STOPPED_TICKS), tick_report)
            .accept(Matcher::pattern(&STOPPED_MS), |reply| {
                let millis: f64 = reply.parse(1)?;
                Some(TickReport {
                    seconds: millis / 1000.0,
                    ticks: None,
                    ticks_per_second: reply.parse(2)?,
                })
            })
            .reject(Matcher::contains("hasn't started"), "profiler not running")
            .reject(Matcher::prefix("Can't stop profiling"), "profiler not running");
        self.run(CommandLine::new("debug stop"), &rules).await
    }

    /// Traces one function run and returns the number of commands it executed.
    pub async fn debug_function(&self, function: &str) -> Result<u32> {
        let function = require_token("function", function)?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Unknown function"), "unknown function")
            .accept(Matcher::pattern(&EXECUTED), |reply| reply.parse(1));
        self.run(CommandLine::new("debug function").arg(function), &rules)
            .await
    }

    pub async fn jfr_start(&self) -> Result<()> {
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Started JFR profiling"))
            .reject(Matcher::contains("already been started"), "JFR profiler already running")
            .reject(Matcher::prefix("Failed to start JFR"), "JFR profiler failed to start");
        self.run(CommandLine::new("jfr start"), &rules).await
    }

    /// Stops JFR profiling and returns the console's confirmation, which names the dump file.
    pub async fn jfr_stop(&self) -> Result<String> {
        let rules = Recognizer::new()
            .reject(Matcher::prefix("There's no JFR profiler running"), "JFR profiler not running")
            .reject(Matcher::prefix("Failed to dump JFR"), "JFR recording could not be written")
            .text(Matcher::prefix("JFR profiling stopped"));
        self.run(CommandLine::new("jfr stop"), &rules).await
    }

    /// Starts a ten second performance run.
    pub async fn perf_start(&self) -> Result<()> {
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Started 10 second performance profiling"))
            .ok(Matcher::prefix("Started performance profiling"))
            .reject(Matcher::contains("already started"), "performance profiler already running");
        self.run(CommandLine::new("perf start"), &rules).await
    }

    pub async fn perf_stop(&self) -> Result<TickReport> {
        let rules = Recognizer::new()
            .accept(Matcher::pattern(&STOPPED_TICKS), tick_report)
            .reject(Matcher::contains("hasn't started"), "performance profiler not running")
            .reject(Matcher::contains("not started"), "performance profiler not running");
        self.run(CommandLine::new("perf stop"), &rules).await
    }

    /// Runs a function and returns the count the console reports for it.
    ///
    /// `arguments` is an SNBT compound for macro functions.
    pub async fn run_function(&self, function: &str, arguments: Option<&str>) -> Result<i64> {
        let function = require_token("function", function)?;
        let arguments = require_opt("arguments", arguments)?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Unknown function"), "unknown function")
            .reject(Matcher::prefix("Failed"), "function failed")
            .accept(Matcher::pattern(&EXECUTED), |reply| reply.parse(1))
            .accept(Matcher::pattern(&SUCCESS_COUNT), |reply| reply.parse(1))
            .accept(Matcher::pattern(&RETURNED), |reply| reply.parse(1));
        self.run(CommandLine::new("function").arg(function).opt(arguments), &rules)
            .await
    }

    pub async fn schedule_function(&self, function: &str, delay: TimeAmount, mode: ScheduleMode) -> Result<()> {
        let function = require_token("function", function)?;
        delay.check("delay")?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Scheduled"))
            .reject(Matcher::prefix("Can't schedule for current tick"), "delay must be positive")
            .reject(Matcher::prefix("Unknown function"), "unknown function");
        let command = CommandLine::new("schedule function")
            .arg(function)
            .arg(delay)
            .arg(mode);
        self.run(command, &rules).await
    }

    /// Clears pending schedules for `function` and returns how many were removed.
    pub async fn schedule_clear(&self, function: &str) -> Result<u32> {
        let function = require_token("function", function)?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("No schedules with id"), "nothing scheduled")
            .reject(Matcher::contains("can't be found"), "nothing scheduled")
            .accept(Matcher::pattern(&UNSCHEDULED), |reply| reply.parse(1));
        self.run(CommandLine::new("schedule clear").arg(function), &rules)
            .await
    }

    /// Draws a value privately.
    pub async fn random_value(&self, range: IntRange, sequence: Option<&str>) -> Result<i32> {
        self.random(RandomMode::Value, range, sequence).await
    }

    /// Draws a value and announces it to every player.
    pub async fn random_roll(&self, range: IntRange, sequence: Option<&str>) -> Result<i32> {
        self.random(RandomMode::Roll, range, sequence).await
    }

    /// Resets `sequence`, or every sequence when given `*`.
    pub async fn random_reset(
        &self,
        sequence: &str,
        seed: Option<i64>,
        include_world_seed: Option<bool>,
        include_sequence_id: Option<bool>,
    ) -> Result<()> {
        let sequence = require_token("sequence", sequence)?;
        let command = CommandLine::new("random reset").arg(sequence).chain(&[
            ("seed", seed.map(|s| s.to_string())),
            ("include world seed", include_world_seed.map(|b| b.to_string())),
            ("include sequence id", include_sequence_id.map(|b| b.to_string())),
        ])?;
        let rules = Recognizer::new()
            .ok(Matcher::prefix("Reset"))
            .reject(Matcher::prefix("Unknown"), "unknown random sequence");
        self.run(command, &rules).await
    }

    async fn random(&self, mode: RandomMode, range: IntRange, sequence: Option<&str>) -> Result<i32> {
        let range = range.check("range")?;
        let sequence = sequence.map(|s| require_token("sequence", s)).transpose()?;
        let rules = Recognizer::new()
            .reject(Matcher::prefix("Range"), "range is too large or too small")
            .reject(Matcher::prefix("The range"), "range is too large or too small")
            .accept(Matcher::pattern(&ROLLED), |reply| reply.parse(1))
            .accept(Matcher::pattern(&RANDOM_VALUE), |reply| reply.parse(1));
        let command = CommandLine::new("random").arg(mode).arg(range).opt(sequence);
        self.run(command, &rules).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::testing::{always, answering};
    use crate::types::{IntRange, ScheduleMode, TimeAmount};
    use assert_approx_eq::assert_approx_eq;

    #[tokio::test]
    async fn test_debug_stop_parses_tick_report() {
        let console = answering(
            "debug stop",
            "Stopped tick profiling after 12.50 seconds and 250 ticks (20.00 ticks per second)",
        );
        let report = console.debug_stop().await.unwrap();
        assert_approx_eq!(report.seconds, 12.5);
        assert_eq!(report.ticks, Some(250));
        assert_approx_eq!(report.ticks_per_second, 20.0);
    }

    #[tokio::test]
    async fn test_debug_stop_legacy_form() {
        let console = answering("debug stop", "Stopped after 5000 ms (19.8 tps)");
        let report = console.debug_stop().await.unwrap();
        assert_approx_eq!(report.seconds, 5.0);
        assert_eq!(report.ticks, None);
        assert_approx_eq!(report.ticks_per_second, 19.8);
    }

    #[tokio::test]
    async fn test_stop_without_start_is_judged_by_reply() {
        let console = answering("jfr stop", "There's no JFR profiler running");
        assert!(console.jfr_stop().await.unwrap_err().is_domain());

        let console = answering("debug stop", "The tick profiler hasn't started");
        assert!(console.debug_stop().await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_profilers_start() {
        let console = answering("debug start", "Started tick profiling");
        console.debug_start().await.unwrap();

        let console = answering("jfr start", "Started JFR profiling");
        console.jfr_start().await.unwrap();

        let console = answering(
            "perf start",
            "Started 10 second performance profiling run (use '/perf stop' to stop early)",
        );
        console.perf_start().await.unwrap();

        let console = answering("jfr stop", "JFR profiling stopped. Dumped to debug/server.jfr");
        assert!(console.jfr_stop().await.unwrap().ends_with("server.jfr"));
    }

    #[tokio::test]
    async fn test_debug_function_count() {
        let console = answering(
            "debug function demo:tick",
            "Executed 14 commands from function 'demo:tick'",
        );
        assert_eq!(console.debug_function("demo:tick").await.unwrap(), 14);
    }

    #[tokio::test]
    async fn test_run_function_forms() {
        let console = answering("function demo:setup", "Executed 3 command(s) from function 'demo:setup'");
        assert_eq!(console.run_function("demo:setup", None).await.unwrap(), 3);

        let console = answering("function demo:macro {x:1}", "Success count is 1");
        assert_eq!(console.run_function("demo:macro", Some("{x:1}")).await.unwrap(), 1);

        let console = always("Unknown function demo:nope");
        assert!(console.run_function("demo:nope", None).await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_schedule() {
        let console = answering(
            "schedule function demo:later 5s replace",
            "Scheduled function 'demo:later' in 100 ticks at gametime 1100",
        );
        console
            .schedule_function("demo:later", TimeAmount::Seconds(5.0), ScheduleMode::Replace)
            .await
            .unwrap();

        let console = answering("schedule clear demo:later", "Removed 2 schedule(s) with id demo:later");
        assert_eq!(console.schedule_clear("demo:later").await.unwrap(), 2);

        let console = answering("schedule clear demo:none", "No schedules with id demo:none");
        assert!(console.schedule_clear("demo:none").await.unwrap_err().is_domain());
    }

    #[tokio::test]
    async fn test_random_draws() {
        let console = answering("random value 1..6", "Random value: 4");
        assert_eq!(console.random_value(IntRange::between(1, 6), None).await.unwrap(), 4);

        let console = answering("random roll 1..20 demo:dice", "Steve rolled 17 (from 1 to 20)");
        assert_eq!(
            console.random_roll(IntRange::between(1, 20), Some("demo:dice")).await.unwrap(),
            17
        );

        assert!(console
            .random_value(IntRange::between(6, 1), None)
            .await
            .unwrap_err()
            .is_validation());
    }

    #[tokio::test]
    async fn test_random_reset_chain() {
        let console = always("Reset random sequence demo:dice");
        console.random_reset("demo:dice", Some(42), Some(false), None).await.unwrap();
        assert_eq!(
            console.transport().commands(),
            vec!["random reset demo:dice 42 false"]
        );

        assert!(console
            .random_reset("demo:dice", None, None, Some(true))
            .await
            .unwrap_err()
            .is_validation());
    }
}
