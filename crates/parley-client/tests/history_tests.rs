// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end history flows against a mock service.

use std::time::Duration;

use parley_client::HistoryClient;
use parley_core::{
    reduce, HealthStatus, HistoryAction, HistoryService, HistoryState, TransportFailure,
};
use parley_test_utils::{closed_port_url, fixtures, MockHistoryServer};
use serde_json::json;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn sync_issues_one_read_per_summary_in_list_order() {
    let mock = MockHistoryServer::start().await;
    let ids = ["c-1", "c-2", "c-3", "c-4", "c-5"];
    mock.mount_list(json!([
        fixtures::summary("c-1", "one", "2026-03-05T00:00:00"),
        fixtures::summary("c-2", "two", "2026-03-04T00:00:00"),
        fixtures::summary("c-3", "three", "2026-03-03T00:00:00"),
        fixtures::summary("c-4", "four", "2026-03-02T00:00:00"),
        fixtures::summary("c-5", "five", "2026-03-01T00:00:00"),
    ]))
    .await;
    // Earlier list entries answer later.
    for (i, id) in ids.iter().enumerate() {
        let delay = Duration::from_millis(40 * (ids.len() - i) as u64);
        mock.mount_read(id, fixtures::exchange(id), delay).await;
    }

    let client = HistoryClient::new(&mock.uri()).unwrap();
    let conversations = client.sync().await.expect("history should load");

    assert_eq!(mock.hits("/history/read").await, ids.len());
    let got: Vec<_> = conversations.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(got, ids);
    assert_eq!(conversations[1].title, "two");
    assert_eq!(
        conversations[4].messages[0].content.as_text(),
        Some("question in c-5")
    );
}

#[tokio::test]
async fn one_failed_read_only_empties_its_entry() {
    let mock = MockHistoryServer::start().await;
    mock.mount_list(json!([
        fixtures::summary("ok-1", "first", ""),
        fixtures::summary("broken", "second", ""),
        fixtures::summary("ok-2", "third", ""),
    ]))
    .await;
    mock.mount_read("ok-1", fixtures::exchange("ok-1"), Duration::ZERO)
        .await;
    mock.mount_read_response("broken", ResponseTemplate::new(200).set_body_string("]["))
        .await;
    mock.mount_read("ok-2", fixtures::exchange("ok-2"), Duration::ZERO)
        .await;

    let client = HistoryClient::new(&mock.uri()).unwrap();
    let conversations = client.sync().await.unwrap();

    assert_eq!(conversations.len(), 3);
    assert_eq!(conversations[0].messages.len(), 2);
    assert!(conversations[1].messages.is_empty());
    assert_eq!(conversations[1].title, "second");
    assert_eq!(conversations[2].messages.len(), 2);
}

#[tokio::test]
async fn server_error_on_one_read_is_isolated() {
    let mock = MockHistoryServer::start().await;
    mock.mount_list(json!([
        fixtures::summary("a", "A", ""),
        fixtures::summary("b", "B", ""),
    ]))
    .await;
    mock.mount_read_response("a", ResponseTemplate::new(500)).await;
    mock.mount_read("b", fixtures::exchange("b"), Duration::ZERO).await;

    let client = HistoryClient::new(&mock.uri()).unwrap();
    let conversations = client.sync().await.unwrap();
    assert!(conversations[0].messages.is_empty());
    assert_eq!(conversations[1].messages.len(), 2);
}

#[tokio::test]
async fn non_array_list_yields_none_without_reads() {
    let mock = MockHistoryServer::start().await;
    mock.mount_list(json!({"conversations": []})).await;

    let client = HistoryClient::new(&mock.uri()).unwrap();
    assert!(client.sync().await.is_none());
    assert_eq!(mock.hits("/history/read").await, 0);
}

#[tokio::test]
async fn every_mutation_reports_500_when_unreachable() {
    let client = HistoryClient::new(&closed_port_url()).unwrap();
    let messages = [parley_core::Message::new(
        "m",
        parley_core::Role::Assistant,
        "",
        "x",
    )];

    let results = [
        client.rename("c", "t").await,
        client.clear("c").await,
        client.delete("c").await,
        client.delete_all().await,
        client.update("c", &messages).await,
    ];
    for result in results {
        assert!(!result.is_ok());
        assert_eq!(result.status(), 500);
        assert!(matches!(result.failure(), Some(TransportFailure::Network(_))));
    }
}

#[tokio::test]
async fn sync_against_unreachable_server_is_none() {
    let client = HistoryClient::new(&closed_port_url()).unwrap();
    assert!(client.sync().await.is_none());
}

#[tokio::test]
async fn mutations_drive_the_reducer() {
    let mock = MockHistoryServer::start().await;
    mock.mount_history(&["a", "b"]).await;
    mock.mount_mutation("POST", "/history/rename", 200).await;
    mock.mount_mutation("POST", "/history/clear", 200).await;
    mock.mount_mutation("DELETE", "/history/delete", 200).await;
    mock.mount_ensure(200, json!({"message": "CosmosDB is configured and working"}))
        .await;

    let client = HistoryClient::new(&mock.uri()).unwrap();
    let service: &dyn HistoryService = &client;

    let mut state = reduce(HistoryState::default(), HistoryAction::Hydrated(service.sync().await));
    assert_eq!(state.conversations.len(), 2);

    if service.rename("a", "Renamed").await.is_ok() {
        state = reduce(
            state,
            HistoryAction::Renamed {
                id: "a".into(),
                title: "Renamed".into(),
            },
        );
    }
    if service.clear("a").await.is_ok() {
        state = reduce(state, HistoryAction::Cleared { id: "a".into() });
    }
    if service.delete("b").await.is_ok() {
        state = reduce(state, HistoryAction::Deleted { id: "b".into() });
    }
    state = reduce(state, HistoryAction::HealthProbed(service.probe().await));

    assert_eq!(state.conversations.len(), 1);
    let a = state.conversation("a").unwrap();
    assert_eq!(a.title, "Renamed");
    assert!(a.messages.is_empty());
    assert_eq!(state.health.map(|h| h.status), Some(HealthStatus::Working));

    assert_eq!(
        mock.bodies("/history/rename").await,
        vec![json!({"conversation_id": "a", "title": "Renamed"})]
    );
    assert_eq!(
        mock.bodies("/history/delete").await,
        vec![json!({"conversation_id": "b"})]
    );
}

#[tokio::test]
async fn rejected_mutation_keeps_status_and_state() {
    let mock = MockHistoryServer::start().await;
    mock.mount_history(&["a"]).await;
    mock.mount_mutation("DELETE", "/history/delete_all", 403).await;

    let client = HistoryClient::new(&mock.uri()).unwrap();
    let state = reduce(HistoryState::default(), HistoryAction::Hydrated(client.sync().await));

    let result = client.delete_all().await;
    assert_eq!(result.status(), 403);
    let state = if result.is_ok() {
        reduce(state, HistoryAction::DeletedAll)
    } else {
        state
    };
    assert_eq!(state.conversations.len(), 1);
}
