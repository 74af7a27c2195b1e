// tests/unit_client_test.rs

use lmslink::config::Config;
use lmslink::core::client::{ConnectionState, LmsClient};
use lmslink::core::discovery::DiscoveryStage;
use lmslink::core::events::ClientEvent;

fn test_config() -> Config {
    toml::from_str(
        r#"
        server = "127.0.0.1"
        player = "Living Room"
        "#,
    )
    .unwrap()
}

fn line(client: &mut LmsClient, text: &str) {
    client.handle(ClientEvent::Line(text.to_string()));
}

fn drain(client: &mut LmsClient) -> Vec<String> {
    let mut sent = Vec::new();
    while let Some(command) = client.poll_command() {
        sent.push(command);
    }
    sent
}

#[test]
fn test_full_discovery_and_tag_notification() {
    let mut client = LmsClient::new(&test_config());
    client.on_connecting();
    assert_eq!(client.connection_state(), ConnectionState::Connecting);

    client.handle(ClientEvent::Connected);
    assert_eq!(client.connection_state(), ConnectionState::Connected);
    assert_eq!(drain(&mut client), vec!["player count ?"]);

    line(&mut client, "player count 2");
    assert_eq!(
        client.queue().iter().collect::<Vec<_>>(),
        vec!["player name 0 ?", "player name 1 ?"]
    );
    drain(&mut client);

    line(&mut client, "player name 0 Kitchen");
    assert!(client.queue().is_empty());

    // The line codec has already decoded "Living%20Room".
    line(&mut client, "player name 1 Living Room");
    assert_eq!(client.queue().iter().collect::<Vec<_>>(), vec!["player id 1 ?"]);
    drain(&mut client);

    line(&mut client, "player id 1 AA:BB:CC:DD:EE:FF");
    assert_eq!(client.player_id(), Some("AA:BB:CC:DD:EE:FF"));

    client.send_tag("01-02-03-04");
    assert_eq!(
        client.queue().iter().collect::<Vec<_>>(),
        vec!["AA:BB:CC:DD:EE:FF rfid tag 01-02-03-04"]
    );
    drain(&mut client);

    client.send_tag_removed();
    assert_eq!(
        client.queue().iter().collect::<Vec<_>>(),
        vec!["AA:BB:CC:DD:EE:FF rfid tag removed"]
    );
}

#[test]
fn test_premature_tag_is_dropped_silently() {
    let mut client = LmsClient::new(&test_config());
    client.send_tag("x");
    client.send_tag_removed();
    assert!(client.queue().is_empty());

    // Connected but unresolved: still dropped.
    client.handle(ClientEvent::Connected);
    drain(&mut client);
    client.send_tag("x");
    assert!(client.queue().is_empty());
}

#[test]
fn test_disconnect_mid_discovery_forces_rediscovery() {
    let mut client = LmsClient::new(&test_config());
    client.handle(ClientEvent::Connected);
    drain(&mut client);
    line(&mut client, "player count 2");
    assert_eq!(client.discovery_stage(), DiscoveryStage::AwaitingNames);

    client.handle(ClientEvent::Disconnected);
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert_eq!(client.discovery_stage(), DiscoveryStage::Idle);
    assert_eq!(client.player_id(), None);
    assert!(client.queue().is_empty());

    client.handle(ClientEvent::Connected);
    assert_eq!(
        client.queue().iter().collect::<Vec<_>>(),
        vec!["player count ?"]
    );
}

#[test]
fn test_disconnect_after_resolution_clears_identifier() {
    let mut client = LmsClient::new(&test_config());
    client.handle(ClientEvent::Connected);
    drain(&mut client);
    line(&mut client, "player count 1");
    line(&mut client, "player name 0 Living Room");
    line(&mut client, "player id 0 AA:BB:CC:DD:EE:FF");
    assert_eq!(client.player_id(), Some("AA:BB:CC:DD:EE:FF"));
    drain(&mut client);

    // Any number of idle polls later, a disconnect still invalidates.
    for _ in 0..5 {
        assert_eq!(client.poll_command(), None);
    }
    client.handle(ClientEvent::Disconnected);
    assert_eq!(client.discovery_stage(), DiscoveryStage::Idle);
    assert_eq!(client.player_id(), None);

    client.send_tag("01-02-03-04");
    assert!(client.queue().is_empty());
}

#[test]
fn test_poll_command_gated_on_connection() {
    let mut config = test_config();
    config.queue.purge_on_disconnect = false;
    let mut client = LmsClient::new(&config);

    client.handle(ClientEvent::Connected);
    line(&mut client, "player count 1");
    client.handle(ClientEvent::Disconnected);

    // Reference behavior: commands survive the disconnect, but nothing is
    // dispatched until the connection is back.
    assert!(!client.queue().is_empty());
    assert_eq!(client.poll_command(), None);
}

#[test]
fn test_poll_command_returns_one_command_per_call() {
    let mut client = LmsClient::new(&test_config());
    client.handle(ClientEvent::Connected);
    line(&mut client, "player count 2");

    assert_eq!(client.poll_command().as_deref(), Some("player count ?"));
    assert_eq!(client.poll_command().as_deref(), Some("player name 0 ?"));
    assert_eq!(client.poll_command().as_deref(), Some("player name 1 ?"));
    assert_eq!(client.poll_command(), None);
}

#[test]
fn test_unrecognized_lines_are_ignored() {
    let mut client = LmsClient::new(&test_config());
    client.handle(ClientEvent::Connected);
    drain(&mut client);

    line(&mut client, "listen 1");
    line(&mut client, "   ");
    line(&mut client, "unknown chatter with many tokens");
    assert_eq!(client.discovery_stage(), DiscoveryStage::AwaitingCount);
    assert!(client.queue().is_empty());
}
