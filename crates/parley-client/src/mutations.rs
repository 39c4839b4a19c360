// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-request history mutations.
//!
//! Each operation issues exactly one request and hands back the normalized
//! [`TransportResult`] untouched. Nothing is retried.

use parley_core::{Message, TransportResult};
use serde_json::json;

use crate::client::HistoryClient;
use crate::endpoints;
use crate::transport::Request;

impl HistoryClient {
    pub async fn rename(&self, conversation_id: &str, title: &str) -> TransportResult<()> {
        let body = json!({ "conversation_id": conversation_id, "title": title });
        self.transport
            .execute_status(Request::post(endpoints::HISTORY_RENAME, body))
            .await
    }

    /// Purges the messages of a conversation. The conversation itself stays.
    pub async fn clear(&self, conversation_id: &str) -> TransportResult<()> {
        let body = json!({ "conversation_id": conversation_id });
        self.transport
            .execute_status(Request::post(endpoints::HISTORY_CLEAR, body))
            .await
    }

    /// Removes the conversation and everything in it.
    pub async fn delete(&self, conversation_id: &str) -> TransportResult<()> {
        let body = json!({ "conversation_id": conversation_id });
        self.transport
            .execute_status(Request::delete(endpoints::HISTORY_DELETE, body))
            .await
    }

    pub async fn delete_all(&self) -> TransportResult<()> {
        self.transport
            .execute_status(Request::delete(endpoints::HISTORY_DELETE_ALL, json!({})))
            .await
    }

    /// Persists the trailing messages of a turn into an existing conversation.
    pub async fn update(&self, conversation_id: &str, messages: &[Message]) -> TransportResult<()> {
        let body = json!({ "conversation_id": conversation_id, "messages": messages });
        self.transport
            .execute_status(Request::post(endpoints::HISTORY_UPDATE, body))
            .await
    }
}
