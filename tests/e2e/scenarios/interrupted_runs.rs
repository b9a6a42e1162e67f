use crate::harness::{Assertion, Scenario};

#[test]
fn test_interrupt_mid_run_keeps_finished_entries() {
    Scenario::new("interrupt_mid_run")
        .generate_interrupted(10, 4)
        .assert(Assertion::LastRun {
            produced: 4,
            interrupted: true,
        })
        .assert_entries(4)
        .run()
        .unwrap();
}

#[test]
fn test_interrupt_before_first_entry() {
    Scenario::new("interrupt_before_start")
        .generate(2)
        .generate_interrupted(5, 0)
        .assert(Assertion::LastRun {
            produced: 0,
            interrupted: true,
        })
        .assert_entries(2)
        .run()
        .unwrap();
}

#[test]
fn test_run_after_interrupt_continues_log() {
    Scenario::new("continue_after_interrupt")
        .generate_interrupted(3, 1)
        .generate(2)
        .assert(Assertion::LastRun {
            produced: 2,
            interrupted: false,
        })
        .assert_entries(3)
        .assert(Assertion::UuidsUnique)
        .assert(Assertion::TimestampsIncreasing)
        .run()
        .unwrap();
}

#[test]
fn test_interrupt_after_last_entry_is_not_reported() {
    Scenario::new("interrupt_too_late")
        .generate_interrupted(3, 3)
        .assert(Assertion::LastRun {
            produced: 3,
            interrupted: false,
        })
        .assert_entries(3)
        .run()
        .unwrap();
}
