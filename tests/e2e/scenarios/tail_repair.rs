use crate::harness::{Assertion, Scenario};
use suuid_core::{CLOSING_MARKER, LOG_HEADER};

#[test]
fn test_crash_leaves_entries_recoverable() {
    Scenario::new("crash_recovery")
        .generate(2)
        .crash()
        .generate(1)
        .assert_entries(3)
        .assert(Assertion::TimestampsIncreasing)
        .run()
        .unwrap();
}

#[test]
fn test_repeated_crashes() {
    Scenario::new("repeated_crashes")
        .generate(1)
        .crash()
        .generate(1)
        .crash()
        .generate(1)
        .assert_entries(3)
        .run()
        .unwrap();
}

#[test]
fn test_foreign_tail_is_preserved() {
    let log = format!("{}<note>kept</note>", LOG_HEADER);
    Scenario::new("foreign_tail")
        .with_log(log.as_bytes())
        .generate(1)
        .assert(Assertion::LogContains("<note>kept</note><suuid t=".into()))
        .assert(Assertion::LogContains(CLOSING_MARKER.into()))
        .run()
        .unwrap();
}

#[test]
fn test_short_file_is_appended_to() {
    Scenario::new("short_file")
        .with_log(b"<x/>")
        .generate(1)
        .assert(Assertion::LogContains("<x/><suuid t=".into()))
        .run()
        .unwrap();
}

#[test]
fn test_empty_file_gets_header() {
    Scenario::new("empty_file")
        .with_log(b"")
        .generate(2)
        .assert_entries(2)
        .run()
        .unwrap();
}

#[test]
fn test_foreign_write_after_marker() {
    Scenario::new("foreign_after_marker")
        .generate(1)
        .foreign_write(b"<!-- appended by hand -->\n")
        .generate(1)
        .assert(Assertion::LogContains(
            "</suuids>\n<!-- appended by hand -->\n<suuid t=".into(),
        ))
        .run()
        .unwrap();
}
