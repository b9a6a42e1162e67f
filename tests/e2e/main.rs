//! End-to-end tests for suuid logging.

mod harness;
mod scenarios;
