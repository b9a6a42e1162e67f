//! E2E test harness for suuid.

#![allow(dead_code)]

pub mod assertions;
pub mod clock;
pub mod scenario;
pub mod steps;

pub use assertions::{Assertion, LogAssertions};
pub use clock::MockClock;
pub use runner::ScenarioRunner;
pub use scenario::Scenario;
pub use steps::ScenarioStep;
pub use workspace::TestWorkspace;
