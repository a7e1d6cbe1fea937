//! Process-wide instance lifecycle. Every test touches the global slot.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::*;
use guardian::{get_instance, init_instance, reset, GuardianConfig, GuardianError};
use serial_test::serial;

fn config_for(path: &std::path::Path) -> GuardianConfig {
    GuardianConfig::new().with_filter_file_path(path)
}

#[test]
#[serial]
fn test_init_then_get() {
    reset();
    let dir = tempfile::tempdir().unwrap();
    let path = filter_file(dir.path(), "bloom_filter.gob", &[LISTED]);

    init_instance(config_for(&path));

    let guardian = get_instance().unwrap();
    assert_eq!(guardian.filter_path(), path.as_path());
    assert!(guardian.is_reloading());
    assert!(guardian.check_address(LISTED).unwrap());

    reset();
}

#[test]
#[serial]
fn test_get_without_init_is_error() {
    reset();
    let err = get_instance().unwrap_err();
    assert!(matches!(err, GuardianError::NotInitialized));
    assert_eq!(err.to_string(), "guardian is not initialized");
}

#[test]
#[serial]
fn test_disabled_installs_nothing() {
    reset();
    let dir = tempfile::tempdir().unwrap();
    let path = filter_file(dir.path(), "bloom_filter.gob", &[LISTED]);

    init_instance(config_for(&path).with_disabled(true));
    assert!(get_instance().is_err());

    // The one-shot guard is consumed until reset
    init_instance(config_for(&path));
    assert!(get_instance().is_err());

    reset();
    init_instance(config_for(&path));
    assert!(get_instance().is_ok());
    reset();
}

#[test]
#[serial]
fn test_construction_failure_installs_nothing() {
    reset();
    let dir = tempfile::tempdir().unwrap();

    init_instance(config_for(&dir.path().join("missing.gob")));
    assert!(matches!(get_instance(), Err(GuardianError::NotInitialized)));

    let corrupt = dir.path().join("corrupt.gob");
    std::fs::write(&corrupt, b"AGBF\x01\x00garbage").unwrap();
    reset();
    init_instance(config_for(&corrupt));
    assert!(get_instance().is_err());

    reset();
}

#[test]
#[serial]
fn test_concurrent_init_constructs_once() {
    reset();
    let dir = tempfile::tempdir().unwrap();
    let first = filter_file(dir.path(), "first.gob", &[LISTED]);
    let second = filter_file(dir.path(), "second.gob", &[ALSO_LISTED]);

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let path = if i % 2 == 0 { first.clone() } else { second.clone() };
            thread::spawn(move || {
                barrier.wait();
                init_instance(config_for(&path));
                // Returning callers observe a completed construction
                get_instance().unwrap()
            })
        })
        .collect();

    let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
    reset();
}

#[test]
#[serial]
fn test_reset_stops_worker_and_allows_new_config() {
    reset();
    let dir = tempfile::tempdir().unwrap();
    let first = filter_file(dir.path(), "first.gob", &[LISTED]);
    let second = filter_file(dir.path(), "second.gob", &[ALSO_LISTED]);

    init_instance(config_for(&first));
    let old = get_instance().unwrap();
    assert!(old.check_address(LISTED).unwrap());

    reset();
    assert!(!old.is_reloading(), "old reload worker still running");
    assert!(get_instance().is_err());

    init_instance(config_for(&second));
    let new = get_instance().unwrap();
    assert!(!Arc::ptr_eq(&old, &new));
    assert_eq!(new.filter_path(), second.as_path());
    assert!(new.check_address(ALSO_LISTED).unwrap());
    assert!(!new.check_address(LISTED).unwrap());

    // Method form resets the global slot too
    new.reset();
    assert!(!new.is_reloading());
    assert!(get_instance().is_err());
}

#[test]
#[serial]
fn test_reset_is_safe_without_instance() {
    reset();
    reset();
    assert!(get_instance().is_err());
}

#[test]
#[serial]
fn test_stop_is_idempotent() {
    reset();
    let dir = tempfile::tempdir().unwrap();
    let path = filter_file(dir.path(), "bloom_filter.gob", &[LISTED]);

    init_instance(config_for(&path));
    let guardian = get_instance().unwrap();

    guardian.stop();
    guardian.stop();
    assert!(!guardian.is_reloading());

    // Screening still works against the last published snapshot
    assert!(guardian.check_address(LISTED).unwrap());
    reset();
}
