//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = LiveConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_event_bus_capacity_too_small() {
    let mut config = LiveConfig::default();
    config.ipc.event_bus_capacity = 8;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("ipc.event_bus_capacity"));
}

#[test]
fn catches_push_capacity_too_large() {
    let mut config = LiveConfig::default();
    config.ipc.push_capacity = 10_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("ipc.push_capacity"));
}

#[test]
fn boundaries_are_inclusive() {
    let mut config = LiveConfig::default();
    config.ipc.event_bus_capacity = 16;
    config.ipc.push_capacity = 4096;
    assert!(validate(&config).is_ok());
}

#[test]
fn collects_all_errors() {
    let mut config = LiveConfig::default();
    config.ipc.event_bus_capacity = 0;
    config.ipc.push_capacity = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("ipc.event_bus_capacity"));
    assert!(err.contains("ipc.push_capacity"));
    assert!(err.contains("; "));
}
