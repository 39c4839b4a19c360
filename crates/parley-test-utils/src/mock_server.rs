// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock history service built on wiremock.
//!
//! Each `mount_*` helper installs one endpoint. Mocks mounted with an
//! expected call count are verified when the server is dropped.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures;

/// A wiremock server answering on the history service routes.
pub struct MockHistoryServer {
    server: MockServer,
}

impl MockHistoryServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to hand to the client.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// The underlying wiremock server, for custom mocks.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Serves `body` from `GET /history/list`.
    pub async fn mount_list(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/history/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serves `messages` for one conversation after `delay`; expects one call.
    pub async fn mount_read(&self, conversation_id: &str, messages: Vec<Value>, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/history/read"))
            .and(body_json(json!({ "conversation_id": conversation_id })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "conversation_id": conversation_id,
                        "messages": messages
                    }))
                    .set_delay(delay),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Answers a read for one conversation with a raw response.
    pub async fn mount_read_response(&self, conversation_id: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/history/read"))
            .and(body_json(json!({ "conversation_id": conversation_id })))
            .respond_with(response)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mounts a list plus a two-message read for every id, in the given order.
    pub async fn mount_history(&self, ids: &[&str]) {
        let summaries: Vec<Value> = ids
            .iter()
            .map(|id| fixtures::summary(id, &format!("Conversation {id}"), "2026-03-01T10:00:00"))
            .collect();
        self.mount_list(Value::from(summaries)).await;
        for id in ids {
            self.mount_read(id, fixtures::exchange(id), Duration::ZERO)
                .await;
        }
    }

    /// Answers `verb route` with `status` and a small JSON body.
    pub async fn mount_mutation(&self, verb: &str, route: &str, status: u16) {
        let body = if (200..300).contains(&status) {
            json!({ "success": true })
        } else {
            json!({ "error": "rejected by mock" })
        };
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_ensure(&self, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path("/history/ensure"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Streams `lines` as NDJSON from `POST route`.
    pub async fn mount_generate(&self, route: &str, lines: &[Value]) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json-lines")
                    .set_body_string(fixtures::ndjson(lines)),
            )
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request received on `route`, in arrival order.
    pub async fn bodies(&self, route: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == route)
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }

    /// Number of requests received on `route`.
    pub async fn hits(&self, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == route)
            .count()
    }
}
