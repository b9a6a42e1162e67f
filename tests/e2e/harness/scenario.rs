use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::ScenarioStep;
use anyhow::{Context, Result};
use std::time::Duration;

/// Fluent DSL for building test scenarios
pub struct Scenario {
    name: String,
    initial_log: Option<Vec<u8>>,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            initial_log: None,
            steps: Vec::new(),
        }
    }

    // ===== Initial setup =====

    /// Start from a log file that already holds `content`
    pub fn with_log(mut self, content: &[u8]) -> Self {
        self.initial_log = Some(content.to_vec());
        self
    }

    // ===== Runs =====

    /// Generate `count` UUIDs without comment or tags
    pub fn generate(self, count: usize) -> Self {
        self.generate_with(count, None, &[])
    }

    /// Generate `count` UUIDs with a comment and tags
    pub fn generate_with(mut self, count: usize, comment: Option<&str>, tags: &[&str]) -> Self {
        self.steps.push(ScenarioStep::Generate {
            count,
            comment: comment.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    /// Generate `count` UUIDs, with a termination signal arriving after
    /// `after` of them
    pub fn generate_interrupted(mut self, count: usize, after: usize) -> Self {
        self.steps
            .push(ScenarioStep::GenerateInterrupted { count, after });
        self
    }

    /// Log an existing UUID instead of generating one
    pub fn log_existing(mut self, uuid: &str) -> Self {
        self.steps.push(ScenarioStep::LogExisting {
            uuid: uuid.to_string(),
        });
        self
    }

    /// Attempt a run whose comment must be refused
    pub fn generate_rejected(mut self, comment: &[u8]) -> Self {
        self.steps.push(ScenarioStep::GenerateRejected {
            comment: comment.to_vec(),
        });
        self
    }

    // ===== Time control =====

    /// Wait for a duration
    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(ScenarioStep::Wait { duration });
        self
    }

    /// Step the clock backwards
    pub fn rewind_clock(mut self, duration: Duration) -> Self {
        self.steps.push(ScenarioStep::RewindClock { duration });
        self
    }

    // ===== Failure simulation =====

    /// Simulate a process killed before it restored the closing marker
    pub fn crash(mut self) -> Self {
        self.steps.push(ScenarioStep::Crash);
        self
    }

    /// Another program appends to the log
    pub fn foreign_write(mut self, bytes: &[u8]) -> Self {
        self.steps.push(ScenarioStep::ForeignWrite {
            bytes: bytes.to_vec(),
        });
        self
    }

    // ===== Assertions =====

    /// Add an assertion
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Assert the log is well formed and holds `n` entries
    pub fn assert_entries(self, n: usize) -> Self {
        self.assert(Assertion::WellFormed)
            .assert(Assertion::EntryCount(n))
    }

    // ===== Execution =====

    /// Run the scenario
    pub fn run(self) -> Result<()> {
        let mut runner = match self.initial_log {
            Some(ref content) => ScenarioRunner::with_log(content)?,
            None => ScenarioRunner::new()?,
        };
        runner
            .execute(&self.steps)
            .with_context(|| format!("Scenario '{}' failed", self.name))
    }
}
