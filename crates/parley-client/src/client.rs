// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`HistoryClient`]: the concrete [`HistoryService`] over HTTP.
//!
//! Operations are implemented in their own modules (`mutations`, `reader`,
//! `sync`, `generate`, `health`) as inherent methods; this module wires them
//! into the trait.

use std::time::Duration;

use async_trait::async_trait;
use parley_config::model::ClientConfig;
use parley_core::{
    Conversation, HealthReport, HistoryService, Message, ParleyError, TransportResult,
};
use tracing::debug;

use crate::transport::{Transport, TransportOptions};

/// HTTP client for the conversation history service.
///
/// Cheap to clone: the connection pool is shared between clones.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    pub(crate) transport: Transport,
}

impl HistoryClient {
    /// Creates a client for `base_url` with default timeouts.
    pub fn new(base_url: &str) -> Result<Self, ParleyError> {
        Self::with_options(base_url, TransportOptions::default())
    }

    pub fn with_options(base_url: &str, options: TransportOptions) -> Result<Self, ParleyError> {
        let transport = Transport::new(base_url, options)?;
        debug!(base_url = transport.base_url(), "history client created");
        Ok(Self { transport })
    }

    /// Creates a client from the `[client]` config section.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ParleyError> {
        Self::with_options(
            &config.base_url,
            TransportOptions {
                connect_timeout: Duration::from_secs(config.connect_timeout_secs),
                request_timeout: Duration::from_secs(config.request_timeout_secs),
                user_agent: config.user_agent.clone(),
            },
        )
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[async_trait]
impl HistoryService for HistoryClient {
    async fn sync(&self) -> Option<Vec<Conversation>> {
        HistoryClient::sync(self).await
    }

    async fn read(&self, conversation_id: &str) -> Vec<Message> {
        HistoryClient::read(self, conversation_id).await
    }

    async fn rename(&self, conversation_id: &str, title: &str) -> TransportResult<()> {
        HistoryClient::rename(self, conversation_id, title).await
    }

    async fn clear(&self, conversation_id: &str) -> TransportResult<()> {
        HistoryClient::clear(self, conversation_id).await
    }

    async fn delete(&self, conversation_id: &str) -> TransportResult<()> {
        HistoryClient::delete(self, conversation_id).await
    }

    async fn delete_all(&self) -> TransportResult<()> {
        HistoryClient::delete_all(self).await
    }

    async fn update(&self, conversation_id: &str, messages: &[Message]) -> TransportResult<()> {
        HistoryClient::update(self, conversation_id, messages).await
    }

    async fn probe(&self) -> HealthReport {
        HistoryClient::probe(self).await
    }
}
