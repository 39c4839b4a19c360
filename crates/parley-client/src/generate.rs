// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellable generation requests.
//!
//! [`HistoryClient::generate`] starts or continues a stored conversation;
//! [`HistoryClient::converse`] talks to the model without touching history.
//! Both return the raw streaming response wrapped in a [`GenerationResponse`]
//! that stays bound to the caller's [`CancellationToken`].

use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use parley_core::{ConversationRequest, TransportFailure, TransportResult, TRANSPORT_FAILURE_STATUS};
use reqwest::header::HeaderMap;
use reqwest::Response;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::HistoryClient;
use crate::endpoints;
use crate::transport::Request;

/// Raw response body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportFailure>> + Send>>;

/// Wire shape of a generation request. A fresh conversation carries no
/// `conversation_id` key at all.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GenerateBody<'a> {
    Continue {
        conversation_id: &'a str,
        #[serde(flatten)]
        request: &'a ConversationRequest,
    },
    Start(&'a ConversationRequest),
}

impl<'a> GenerateBody<'a> {
    fn new(request: &'a ConversationRequest, conversation_id: Option<&'a str>) -> Self {
        match conversation_id {
            Some(conversation_id) => Self::Continue {
                conversation_id,
                request,
            },
            None => Self::Start(request),
        }
    }
}

/// A successful generation response whose body has not been read yet.
#[derive(Debug)]
pub struct GenerationResponse {
    response: Response,
    cancel: CancellationToken,
}

impl GenerationResponse {
    pub fn status(&self) -> u16 {
        self.response.status().as_u16()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Gives up the cancellation binding and returns the reqwest response.
    pub fn into_inner(self) -> Response {
        self.response
    }

    /// Body as raw chunks. The stream ends early once the token fires.
    pub fn into_bytes_stream(self) -> ByteStream {
        let Self { response, cancel } = self;
        Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| TransportFailure::Network(e.to_string())))
                .take_until(cancel.cancelled_owned()),
        )
    }
}

impl HistoryClient {
    /// Sends one generation turn to `/history/generate`.
    ///
    /// With `Some(conversation_id)` the turn is appended to that
    /// conversation; with `None` the server starts a new one. If `cancel`
    /// fires before the response arrives, the connection is dropped and the
    /// result is a cancelled failure with status 500.
    pub async fn generate(
        &self,
        request: &ConversationRequest,
        cancel: &CancellationToken,
        conversation_id: Option<&str>,
    ) -> TransportResult<GenerationResponse> {
        let body = GenerateBody::new(request, conversation_id);
        self.stream_request(endpoints::HISTORY_GENERATE, &body, cancel)
            .await
    }

    /// Sends a history-less turn to `/conversation`.
    pub async fn converse(
        &self,
        request: &ConversationRequest,
        cancel: &CancellationToken,
    ) -> TransportResult<GenerationResponse> {
        self.stream_request(endpoints::CONVERSATION, request, cancel)
            .await
    }

    async fn stream_request<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> TransportResult<GenerationResponse> {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(e) => {
                warn!(path, error = %e, "failed to encode generation request");
                return TransportResult::err(
                    TRANSPORT_FAILURE_STATUS,
                    TransportFailure::Malformed(e.to_string()),
                );
            }
        };

        let result = self
            .transport
            .execute(Request::post(path, body).streaming(), Some(cancel))
            .await;
        if result.is_cancelled() {
            debug!(path, "generation cancelled");
        }
        result.map(|response| GenerationResponse {
            response,
            cancel: cancel.clone(),
        })
    }
}
