// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History service trait covering synchronization, mutation, and health.

use async_trait::async_trait;

use crate::result::TransportResult;
use crate::types::{Conversation, HealthReport, Message};

/// Client-side view of the remote conversation history store.
///
/// No method returns an error: transport and server failures are reported
/// through [`TransportResult`], and reads degrade to empty data.
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Fetches the conversation list and every conversation's messages.
    ///
    /// Returns `None` when the list itself cannot be obtained.
    async fn sync(&self) -> Option<Vec<Conversation>>;

    /// Fetches the messages of one conversation, or an empty vector on failure.
    async fn read(&self, conversation_id: &str) -> Vec<Message>;

    /// Changes a conversation's title.
    async fn rename(&self, conversation_id: &str, title: &str) -> TransportResult<()>;

    /// Removes all messages from a conversation but keeps the conversation.
    async fn clear(&self, conversation_id: &str) -> TransportResult<()>;

    /// Removes a conversation and its messages.
    async fn delete(&self, conversation_id: &str) -> TransportResult<()>;

    /// Removes every conversation of the current user.
    async fn delete_all(&self) -> TransportResult<()>;

    /// Appends the trailing assistant (and tool) messages to a conversation.
    async fn update(&self, conversation_id: &str, messages: &[Message]) -> TransportResult<()>;

    /// Probes the history store's health.
    async fn probe(&self) -> HealthReport;
}
