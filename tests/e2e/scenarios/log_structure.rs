use crate::harness::{Assertion, Scenario};
use std::time::Duration;

#[test]
fn test_first_run_creates_log() {
    Scenario::new("first_run")
        .generate(1)
        .assert_entries(1)
        .assert(Assertion::LastRun {
            produced: 1,
            interrupted: false,
        })
        .run()
        .unwrap();
}

#[test]
fn test_runs_accumulate_in_one_document() {
    Scenario::new("runs_accumulate")
        .generate(3)
        .generate_with(2, Some("second batch"), &["build", "release"])
        .generate(1)
        .assert_entries(6)
        .assert(Assertion::UuidsUnique)
        .assert(Assertion::TimestampsIncreasing)
        .assert(Assertion::LogContains("<txt>second batch</txt>".into()))
        .assert(Assertion::LogContains(" <tag>build</tag> <tag>release</tag>".into()))
        .run()
        .unwrap();
}

#[test]
fn test_existing_uuid_is_logged_once() {
    let uuid = "d3de2000-4695-11e6-8000-000000000000";
    Scenario::new("existing_uuid")
        .generate(2)
        .log_existing(uuid)
        .assert_entries(3)
        .assert(Assertion::HasEntryFor(uuid.into()))
        .assert(Assertion::LogContains(
            "<suuid t=\"2016-07-10T12:00:00.0000000Z\"".into(),
        ))
        .run()
        .unwrap();
}

#[test]
fn test_rejected_comment_leaves_log_untouched() {
    Scenario::new("rejected_comment")
        .generate(1)
        .generate_rejected(&[b'o', b'k', 0xc3, 0x28])
        .generate_rejected(b"bell\x07")
        .assert_entries(1)
        .run()
        .unwrap();
}

#[test]
fn test_rejected_comment_on_fresh_log_creates_nothing() {
    Scenario::new("rejected_fresh")
        .generate_rejected(&[0xff, 0xfe])
        .generate(1)
        .assert_entries(1)
        .run()
        .unwrap();
}

#[test]
fn test_clock_stepping_back_keeps_order() {
    Scenario::new("clock_rewind")
        .generate(2)
        .rewind_clock(Duration::from_secs(3600))
        .generate(2)
        .wait(Duration::from_secs(7200))
        .generate(1)
        .assert_entries(5)
        .assert(Assertion::UuidsUnique)
        .assert(Assertion::TimestampsIncreasing)
        .run()
        .unwrap();
}

#[test]
fn test_markup_in_comment_is_escaped() {
    Scenario::new("escaped_comment")
        .generate_with(1, Some("a < b & \"c\""), &[])
        .assert_entries(1)
        .assert(Assertion::LogContains(
            "<txt>a &lt; b &amp; \"c\"</txt>".into(),
        ))
        .run()
        .unwrap();
}
