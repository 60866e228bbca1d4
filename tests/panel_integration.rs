// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a fake device served by wiremock.

use std::time::Duration;

use tasmota_panel::event_log::MemoryLog;
use tasmota_panel::protocol::{HttpClient, build_command_url};
use tasmota_panel::{
    DeviceConfig, Error, EventLog, OutputState, Panel, PanelEvent, PowerAction, ProtocolError,
    Snapshot,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn config_for(server: &MockServer) -> DeviceConfig {
    DeviceConfig::new(server.address().to_string())
}

fn power(state: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "POWER1": state }))
}

async fn mount_state(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/cm"))
        .and(query_param("cmnd", "Power1 State"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn wait_for(panel: &Panel, predicate: impl FnMut(&Snapshot) -> bool) -> Snapshot {
    let mut rx = panel.watch();
    tokio::time::timeout(WAIT, rx.wait_for(predicate))
        .await
        .expect("timed out waiting for snapshot")
        .expect("snapshot channel closed")
        .clone()
}

// ============================================================================
// Transport
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn get_returns_body_of_200() {
        let server = MockServer::start().await;
        mount_state(&server, power("ON")).await;

        let url = build_command_url(&config_for(&server), PowerAction::State);
        let response = HttpClient::new()
            .unwrap()
            .get(&url, Duration::from_secs(4))
            .await
            .unwrap();

        assert!(response.body().contains("ON"));
    }

    #[tokio::test]
    async fn non_200_is_protocol_error() {
        let server = MockServer::start().await;
        mount_state(&server, ResponseTemplate::new(404)).await;

        let url = build_command_url(&config_for(&server), PowerAction::State);
        let err = HttpClient::new()
            .unwrap()
            .get(&url, Duration::from_secs(4))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::UnexpectedStatus(404))
        ));
    }

    #[tokio::test]
    async fn credentials_are_sent_as_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cm"))
            .and(query_param("user", "admin"))
            .and(query_param("password", "p&ss word"))
            .and(query_param("cmnd", "Power1 On"))
            .respond_with(power("ON"))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server).with_credentials("admin", "p&ss word");
        let url = build_command_url(&config, PowerAction::On);
        HttpClient::new()
            .unwrap()
            .get(&url, Duration::from_secs(3))
            .await
            .unwrap();
    }
}

// ============================================================================
// Polling
// ============================================================================

mod polling {
    use super::*;

    #[tokio::test]
    async fn first_poll_connects_and_logs_change_from_unknown() {
        let server = MockServer::start().await;
        mount_state(&server, power("ON")).await;

        let buffer = MemoryLog::new();
        let panel = Panel::start(config_for(&server), EventLog::to_writer(buffer.clone())).unwrap();

        let snapshot = wait_for(&panel, Snapshot::is_connected).await;
        panel.shutdown().await;

        assert_eq!(snapshot.output(), OutputState::On);
        assert!(snapshot.last_update().is_some());
        assert!(snapshot.logging_enabled());
        assert_eq!(buffer.count("Output state changed from UNKNOWN to ON"), 1);
    }

    #[tokio::test]
    async fn bare_power_field_is_accepted_for_relay_one() {
        let server = MockServer::start().await;
        mount_state(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "POWER": "OFF" })),
        )
        .await;

        let panel = Panel::start(config_for(&server), EventLog::disabled()).unwrap();
        let snapshot = wait_for(&panel, Snapshot::is_connected).await;
        panel.shutdown().await;

        assert_eq!(snapshot.output(), OutputState::Off);
    }

    #[tokio::test]
    async fn server_error_keeps_device_offline() {
        let server = MockServer::start().await;
        mount_state(&server, ResponseTemplate::new(500)).await;

        let buffer = MemoryLog::new();
        let panel = Panel::start(config_for(&server), EventLog::to_writer(buffer.clone())).unwrap();

        let mut rx = panel.watch();
        tokio::time::timeout(WAIT, rx.changed()).await.unwrap().unwrap();
        let snapshot = rx.borrow_and_update().clone();
        panel.shutdown().await;

        assert!(!snapshot.is_connected());
        assert_eq!(snapshot.output(), OutputState::Unknown);
        assert_eq!(
            buffer.messages()[0],
            "Connection check failed: unexpected HTTP status 500"
        );
        assert_eq!(buffer.count("Connection lost"), 0);
    }

    #[tokio::test]
    async fn malformed_body_keeps_device_offline() {
        let server = MockServer::start().await;
        mount_state(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

        let buffer = MemoryLog::new();
        let panel = Panel::start(config_for(&server), EventLog::to_writer(buffer.clone())).unwrap();

        let mut rx = panel.watch();
        tokio::time::timeout(WAIT, rx.changed()).await.unwrap().unwrap();
        let connected = rx.borrow_and_update().is_connected();
        panel.shutdown().await;

        assert!(!connected);
        assert!(buffer.messages()[0].starts_with("Connection check failed: JSON parse error"));
    }

    #[tokio::test]
    async fn connection_lost_is_logged_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("cmnd", "Power1 State"))
            .respond_with(power("ON"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_state(&server, ResponseTemplate::new(500)).await;

        let buffer = MemoryLog::new();
        let config = config_for(&server).with_poll_interval_secs(1);
        let panel = Panel::start(config, EventLog::to_writer(buffer.clone())).unwrap();

        wait_for(&panel, Snapshot::is_connected).await;
        wait_for(&panel, |s| !s.is_connected()).await;

        // Let at least one more failing poll happen.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        panel.shutdown().await;

        assert_eq!(buffer.count("Connection lost"), 1);
        assert!(buffer.count("Connection check failed: unexpected HTTP status 500") >= 2);
    }

    #[tokio::test]
    async fn too_small_interval_is_logged_once_and_corrected() {
        let server = MockServer::start().await;
        mount_state(&server, power("OFF")).await;

        let buffer = MemoryLog::new();
        let config = config_for(&server).with_poll_interval_secs(0);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));

        let panel = Panel::start(config, EventLog::to_writer(buffer.clone())).unwrap();
        wait_for(&panel, Snapshot::is_connected).await;
        panel.shutdown().await;

        assert_eq!(buffer.messages()[0], "Adjusted poll interval to 5 seconds (was too small)");
        assert_eq!(
            buffer.count("Adjusted poll interval to 5 seconds (was too small)"),
            1
        );
    }

    #[tokio::test]
    async fn shutdown_stops_polling() {
        let server = MockServer::start().await;
        mount_state(&server, power("ON")).await;

        let config = config_for(&server).with_poll_interval_secs(1);
        let panel = Panel::start(config, EventLog::disabled()).unwrap();
        wait_for(&panel, Snapshot::is_connected).await;
        panel.shutdown().await;

        let before = server.received_requests().await.unwrap().len();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let after = server.received_requests().await.unwrap().len();

        assert_eq!(before, after);
    }
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    async fn mount_command(server: &MockServer, command: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/cm"))
            .and(query_param("cmnd", command))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn successful_command_is_verified_without_waiting_for_next_poll() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("cmnd", "Power1 State"))
            .respond_with(power("OFF"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_state(&server, power("ON")).await;
        mount_command(&server, "Power1 On", power("ON")).await;

        let buffer = MemoryLog::new();
        let config = config_for(&server).with_poll_interval_secs(60);
        let panel = Panel::start(config, EventLog::to_writer(buffer.clone())).unwrap();

        wait_for(&panel, |s| s.output() == OutputState::Off).await;
        panel.power_on().unwrap();
        let snapshot = wait_for(&panel, |s| s.output() == OutputState::On).await;
        panel.shutdown().await;

        assert!(snapshot.is_connected());
        assert_eq!(
            buffer.messages(),
            vec![
                "Output state changed from UNKNOWN to OFF",
                "Sending command: On",
                "Command On successful",
                "Output state changed from OFF to ON",
            ]
        );
    }

    #[tokio::test]
    async fn timeout_while_connected_notifies_once_and_disconnects() {
        let server = MockServer::start().await;
        mount_state(&server, power("ON")).await;
        mount_command(
            &server,
            "Power1 Off",
            power("OFF").set_delay(Duration::from_secs(2)),
        )
        .await;

        let buffer = MemoryLog::new();
        let config = config_for(&server)
            .with_poll_interval_secs(60)
            .with_command_timeout(Duration::from_millis(300));
        let panel = Panel::start(config, EventLog::to_writer(buffer.clone())).unwrap();
        wait_for(&panel, Snapshot::is_connected).await;

        let mut events = panel.subscribe();
        panel.power_off().unwrap();

        let failure = tokio::time::timeout(WAIT, async {
            loop {
                match events.recv().await.unwrap() {
                    event @ PanelEvent::CommandFailed { .. } => break event,
                    PanelEvent::ConnectionChanged { .. } => {}
                }
            }
        })
        .await
        .unwrap();

        let snapshot = panel.snapshot();
        panel.shutdown().await;

        assert_eq!(
            failure,
            PanelEvent::command_failed(PowerAction::Off, "request timed out after 300 ms")
        );
        assert!(!snapshot.is_connected());
        assert_eq!(snapshot.output(), OutputState::Unknown);

        let mut more_failures = 0;
        while let Ok(event) = events.try_recv() {
            if event.is_command_failure() {
                more_failures += 1;
            }
        }
        assert_eq!(more_failures, 0);

        assert_eq!(buffer.count("Command Off failed: request timed out after 300 ms"), 1);
        assert_eq!(buffer.count("Connection lost"), 1);
        assert!(
            !buffer
                .messages()
                .iter()
                .any(|m| m.starts_with("Connection check failed"))
        );
    }

    #[tokio::test]
    async fn failure_while_offline_is_logged_without_notification() {
        let server = MockServer::start().await;
        mount_state(&server, ResponseTemplate::new(500)).await;
        mount_command(&server, "Power1 Toggle", ResponseTemplate::new(500)).await;

        let buffer = MemoryLog::new();
        let config = config_for(&server).with_poll_interval_secs(60);
        let panel = Panel::start(config, EventLog::to_writer(buffer.clone())).unwrap();
        let mut events = panel.subscribe();

        panel.toggle().unwrap();
        panel.shutdown().await;

        while let Ok(event) = events.try_recv() {
            assert!(!event.is_command_failure());
        }
        assert_eq!(
            buffer.count("Command Toggle failed: unexpected HTTP status 500"),
            1
        );
        assert_eq!(buffer.count("Connection lost"), 0);
    }

    #[tokio::test]
    async fn saturated_queue_rejects_commands() {
        let server = MockServer::start().await;
        mount_state(&server, power("ON")).await;
        mount_command(
            &server,
            "Power1 On",
            power("ON").set_delay(Duration::from_millis(100)),
        )
        .await;

        let buffer = MemoryLog::new();
        let config = config_for(&server).with_poll_interval_secs(60);
        let panel = Panel::start(config, EventLog::to_writer(buffer.clone())).unwrap();

        let results: Vec<_> = (0..10).map(|_| panel.power_on()).collect();
        panel.shutdown().await;

        assert!(results[..8].iter().all(Result::is_ok));
        assert!(matches!(results[9], Err(Error::CommandQueueFull)));
        assert!(buffer.count("Command On dropped: command queue is full") >= 1);
    }

    #[tokio::test]
    async fn shutdown_drains_queued_commands() {
        let server = MockServer::start().await;
        mount_state(&server, power("OFF")).await;
        Mock::given(method("GET"))
            .and(query_param("cmnd", "Power1 Off"))
            .respond_with(power("OFF"))
            .expect(3)
            .mount(&server)
            .await;

        let config = config_for(&server).with_poll_interval_secs(60);
        let panel = Panel::start(config, EventLog::disabled()).unwrap();
        for _ in 0..3 {
            panel.power_off().unwrap();
        }
        panel.shutdown().await;
    }
}
