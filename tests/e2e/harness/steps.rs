use std::time::Duration;

use super::assertions::Assertion;

/// All possible actions in a test scenario
#[derive(Debug)]
pub enum ScenarioStep {
    // Runs
    Generate {
        count: usize,
        comment: Option<String>,
        tags: Vec<String>,
    },
    GenerateInterrupted {
        count: usize,
        after: usize,
    },
    LogExisting {
        uuid: String,
    },
    GenerateRejected {
        comment: Vec<u8>,
    },

    // Time control
    Wait {
        duration: Duration,
    },
    RewindClock {
        duration: Duration,
    },

    // Failure simulation
    Crash,
    ForeignWrite {
        bytes: Vec<u8>,
    },

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}
