// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn executor_config_default_coalesces_and_drains() {
    let config = ExecutorConfig::default();
    assert!(config.coalesce_if_busy);
    assert!(config.drain_while_pending);
}

#[test]
fn executor_config_builder() {
    let config = ExecutorConfig::new()
        .with_coalesce_if_busy(false)
        .with_drain_while_pending(false);

    assert!(!config.coalesce_if_busy);
    assert!(!config.drain_while_pending);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = CoordinationConfig::from_toml_str("").unwrap();
    assert_eq!(config, CoordinationConfig::default());
}

#[test]
fn toml_overrides_individual_fields() {
    let config = CoordinationConfig::from_toml_str(
        r#"
        [executor]
        drain_while_pending = false

        [maintenance]
        hold_threshold = "2m"
        "#,
    )
    .unwrap();

    assert!(config.executor.coalesce_if_busy);
    assert!(!config.executor.drain_while_pending);
    assert_eq!(config.maintenance.hold_threshold, Duration::from_secs(120));
    assert_eq!(
        config.maintenance.interval,
        MaintenanceConfig::default().interval
    );
}

#[test]
fn invalid_duration_is_rejected() {
    let err = CoordinationConfig::from_toml_str(
        r#"
        [maintenance]
        interval = "soon"
        "#,
    )
    .unwrap_err();

    assert!(err.to_string().contains("TOML parse error"));
}

#[test]
fn config_survives_toml_serialization() {
    let config = CoordinationConfig {
        executor: ExecutorConfig::new().with_coalesce_if_busy(false),
        maintenance: MaintenanceConfig::new().with_hold_threshold(Duration::from_secs(5)),
    };

    let text = toml::to_string(&config).unwrap();
    let parsed = CoordinationConfig::from_toml_str(&text).unwrap();

    assert_eq!(parsed, config);
}
