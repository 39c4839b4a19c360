// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley generate` command: send one user turn and print the streamed reply.

use std::io::Write;

use chrono::Utc;
use futures::StreamExt;
use parley_client::{CancellationToken, HistoryClient};
use parley_core::{ConversationRequest, Message, ParleyError, Role};
use serde_json::Value;
use tracing::{debug, warn};

use crate::history::into_client_result;

/// Sends `text` as a user message and streams the answer to stdout.
///
/// With `conversation_id` the turn is appended to that stored conversation.
/// Cancelling `cancel` (Ctrl+C) stops the request or the stream.
pub async fn run_generate(
    client: &HistoryClient,
    text: &str,
    conversation_id: Option<&str>,
    raw: bool,
    cancel: &CancellationToken,
) -> Result<(), ParleyError> {
    let now = Utc::now();
    let message = Message::new(
        format!("cli-{}", now.timestamp_millis()),
        Role::User,
        now.to_rfc3339(),
        text,
    );
    let request = ConversationRequest::new(vec![message]);

    let result = client.generate(&request, cancel, conversation_id).await;
    if result.is_cancelled() {
        eprintln!("cancelled");
        return Ok(());
    }
    let response = into_client_result(result)?;
    debug!(status = response.status(), "generation started");

    let mut chunks = response.chunks();
    let mut stdout = std::io::stdout();
    while let Some(item) = chunks.next().await {
        match item {
            Ok(chunk) if raw => println!("{chunk}"),
            Ok(chunk) => {
                if let Some(text) = chunk_text(&chunk) {
                    print!("{text}");
                    let _ = stdout.flush();
                }
            }
            Err(failure) => warn!(error = %failure, "stream item skipped"),
        }
    }
    if !raw {
        println!();
    }
    if cancel.is_cancelled() {
        eprintln!("cancelled");
    }
    Ok(())
}

/// Extracts the assistant text carried by one streamed chunk.
///
/// Chunks look like `{"choices": [{"messages": [{"role", "content"}, ...]}]}`;
/// the text is the last assistant message's content.
fn chunk_text(chunk: &Value) -> Option<&str> {
    chunk
        .get("choices")?
        .get(0)?
        .get("messages")?
        .as_array()?
        .iter()
        .rev()
        .find(|m| m.get("role").and_then(Value::as_str) == Some("assistant"))?
        .get("content")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_test_utils::MockHistoryServer;
    use serde_json::json;

    #[test]
    fn chunk_text_picks_last_assistant_message() {
        let chunk = json!({
            "choices": [{"messages": [
                {"role": "tool", "content": "{\"citations\": []}"},
                {"role": "assistant", "content": "Hello"}
            ]}]
        });
        assert_eq!(chunk_text(&chunk), Some("Hello"));
        assert_eq!(chunk_text(&json!({"error": "x"})), None);
    }

    #[tokio::test]
    async fn sends_one_user_message() {
        let mock = MockHistoryServer::start().await;
        mock.mount_generate(
            "/history/generate",
            &[json!({"choices": [{"messages": [{"role": "assistant", "content": "Hi"}]}]})],
        )
        .await;
        let client = HistoryClient::new(&mock.uri()).unwrap();

        run_generate(&client, "Hello", Some("c-1"), true, &CancellationToken::new())
            .await
            .unwrap();

        let sent = mock.bodies("/history/generate").await;
        assert_eq!(sent[0]["conversation_id"], "c-1");
        assert_eq!(sent[0]["messages"][0]["role"], "user");
        assert_eq!(sent[0]["messages"][0]["content"], "Hello");
    }

    #[tokio::test]
    async fn cancelled_generation_is_not_an_error() {
        let mock = MockHistoryServer::start().await;
        let client = HistoryClient::new(&mock.uri()).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        assert!(run_generate(&client, "Hello", None, false, &token).await.is_ok());
        assert_eq!(mock.hits("/history/generate").await, 0);
    }
}
