// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned payloads in the service's wire format.

use parley_core::{ConversationRequest, Message, Role};
use serde_json::{json, Value};

/// A list entry as served by `/history/list` (service field names).
pub fn summary(id: &str, title: &str, created_at: &str) -> Value {
    json!({
        "conversation_id": id,
        "title": title,
        "created_at": created_at,
        "user_id": "00000000-0000-0000-0000-000000000000"
    })
}

/// A stored message as served by `/history/read`.
pub fn message(id: &str, role: &str, content: &str) -> Value {
    json!({
        "id": id,
        "role": role,
        "createdAt": "2026-03-01T10:00:00.000000",
        "content": content
    })
}

/// A user/assistant exchange for conversation `id`.
pub fn exchange(id: &str) -> Vec<Value> {
    vec![
        message(&format!("{id}-q"), "user", &format!("question in {id}")),
        message(&format!("{id}-a"), "assistant", &format!("answer in {id}")),
    ]
}

/// A single-message user turn ready to send to a generation endpoint.
pub fn user_turn(text: &str) -> ConversationRequest {
    ConversationRequest::new(vec![Message::new(
        "turn-1",
        Role::User,
        "2026-03-01T10:00:00Z",
        text,
    )])
}

/// Joins values into an NDJSON body.
pub fn ndjson(lines: &[Value]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}
