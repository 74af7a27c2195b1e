// tests/unit_config_test.rs

use lmslink::config::Config;
use lmslink::core::queue::OverflowPolicy;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_minimal_config_uses_defaults() {
    let file = write_config(
        r#"
        server = "lms.local"
        player = "Living Room"
        "#,
    );
    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.server, "lms.local");
    assert_eq!(config.port, 9090);
    assert_eq!(config.player, "Living Room");
    assert_eq!(config.log_level, "info");
    assert_eq!(config.tick_interval, Duration::from_millis(250));
    assert_eq!(config.max_line_len, 4096);
    assert_eq!(config.queue.capacity, 64);
    assert_eq!(config.queue.overflow, OverflowPolicy::RejectNew);
    assert!(config.queue.purge_on_disconnect);
    assert_eq!(config.reconnect.initial_delay, Duration::from_millis(500));
    assert_eq!(config.reconnect.max_delay, Duration::from_secs(30));
    assert_eq!(config.server_addr(), "lms.local:9090");
}

#[test]
fn test_full_config_overrides() {
    let file = write_config(
        r#"
        server = "10.0.0.5"
        port = 9095
        player = "Kitchen"
        log_level = "debug"
        tick_interval = "50ms"
        max_line_len = 1024

        [queue]
        capacity = 16
        overflow = "drop-oldest"
        purge_on_disconnect = false

        [reconnect]
        initial_delay = "100ms"
        max_delay = "5s"
        "#,
    );
    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.port, 9095);
    assert_eq!(config.tick_interval, Duration::from_millis(50));
    assert_eq!(config.queue.capacity, 16);
    assert_eq!(config.queue.overflow, OverflowPolicy::DropOldest);
    assert!(!config.queue.purge_on_disconnect);
    assert_eq!(config.reconnect.initial_delay, Duration::from_millis(100));
    assert_eq!(config.reconnect.max_delay, Duration::from_secs(5));
}

#[test]
fn test_missing_file_fails_with_context() {
    let err = Config::from_file("/nonexistent/lmslink.toml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_invalid_toml_fails_with_context() {
    let file = write_config("server = ");
    let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
fn test_empty_player_rejected() {
    let file = write_config(
        r#"
        server = "lms.local"
        player = "  "
        "#,
    );
    let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("player cannot be empty"));
}

#[test]
fn test_zero_port_rejected() {
    let file = write_config(
        r#"
        server = "lms.local"
        port = 0
        player = "Living Room"
        "#,
    );
    let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("port cannot be 0"));
}

#[test]
fn test_zero_queue_capacity_rejected() {
    let file = write_config(
        r#"
        server = "lms.local"
        player = "Living Room"

        [queue]
        capacity = 0
        "#,
    );
    let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("queue.capacity cannot be 0"));
}

#[test]
fn test_inverted_reconnect_delays_rejected() {
    let file = write_config(
        r#"
        server = "lms.local"
        player = "Living Room"

        [reconnect]
        initial_delay = "10s"
        max_delay = "1s"
        "#,
    );
    let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("initial_delay cannot exceed"));
}
