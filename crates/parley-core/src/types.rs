// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation, message, and health types exchanged with the history service.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Server-assigned timestamp, kept verbatim.
///
/// The service emits ISO-8601 strings, sometimes without an offset, so the
/// raw text is stored and parsed on demand with [`parse_timestamp`].
pub type Timestamp = String;

/// Parses a server timestamp as UTC.
///
/// Accepts RFC 3339 (`2026-01-02T03:04:05Z`) and offset-less ISO-8601
/// (`2026-01-02T03:04:05.123456`), which is treated as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Metadata for one conversation as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    #[serde(alias = "conversation_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Timestamp,
}

/// Author role of a message.
///
/// Unknown roles are preserved in [`Role::Other`] so they round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
            Role::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            "tool" => Role::Tool,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message body: plain text or an opaque structured payload
/// (citations, tool invocations, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Structured(serde_json::Value),
}

impl MessageContent {
    /// Returns the text if this is a plain-text body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Structured(_) => None,
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub role: Role,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Timestamp,
    pub content: MessageContent,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        role: Role,
        created_at: impl Into<Timestamp>,
        content: impl Into<MessageContent>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            created_at: created_at.into(),
            content: content.into(),
        }
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// A fully materialized conversation: summary metadata plus its messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub date: Timestamp,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Combines a summary with the messages read for it.
    pub fn from_summary(summary: ConversationSummary, messages: Vec<Message>) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            date: summary.created_at,
            messages,
        }
    }

    pub fn date_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }
}

/// Outbound generation payload.
///
/// The session fields thread an external Direct Line conversation across
/// turns and use the service's wire names. Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationRequest {
    pub messages: Vec<Message>,
    #[serde(
        rename = "directline_token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub session_token: Option<String>,
    #[serde(
        rename = "directline_conversation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub session_handle: Option<String>,
    #[serde(
        rename = "directline_watermark",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub watermark: Option<String>,
}

impl ConversationRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Attaches the session token and handle from a previous turn.
    pub fn with_session(mut self, token: impl Into<String>, handle: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self.session_handle = Some(handle.into());
        self
    }

    pub fn with_watermark(mut self, watermark: impl Into<String>) -> Self {
        self.watermark = Some(watermark.into());
        self
    }
}

/// Classification of the history store's health.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum HealthStatus {
    /// Store is configured and answering.
    Working,
    /// Store is configured but failing.
    NotWorking,
    /// Store is not set up on the server.
    NotConfigured,
}

/// Outcome of a health probe.
///
/// `available` reflects whether the HTTP response was 2xx and is computed
/// independently of `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub available: bool,
    pub status: HealthStatus,
}
