// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation message reads. Never fails; degrades to no messages.

use parley_core::Message;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::client::HistoryClient;
use crate::endpoints;
use crate::transport::Request;

#[derive(Debug, Deserialize)]
struct ReadResponse {
    messages: Option<Vec<Message>>,
}

impl HistoryClient {
    /// Fetches the messages of one conversation.
    ///
    /// Network failures, rejections, undecodable bodies and a missing
    /// `messages` field all yield an empty vector.
    pub async fn read(&self, conversation_id: &str) -> Vec<Message> {
        let body = json!({ "conversation_id": conversation_id });
        let result = self
            .transport
            .execute_json::<ReadResponse>(Request::post(endpoints::HISTORY_READ, body))
            .await;

        let status = result.status();
        match result.into_result() {
            Ok(ReadResponse {
                messages: Some(messages),
            }) => messages,
            Ok(ReadResponse { messages: None }) => {
                warn!(conversation_id, status, "read response has no messages field");
                Vec::new()
            }
            Err(failure) => {
                warn!(conversation_id, status, error = %failure, "history read degraded to empty");
                Vec::new()
            }
        }
    }
}
