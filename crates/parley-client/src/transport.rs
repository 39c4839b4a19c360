// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request execution with failure normalization.
//!
//! [`Transport`] is the only place where reqwest errors are observed. Every
//! outcome leaves this module as data: network failures and cancellation
//! become [`TransportFailure`]s with status 500, non-2xx responses keep their
//! real status, and undecodable bodies are reported as malformed.

use std::time::Duration;

use parley_core::{ParleyError, TransportFailure, TransportResult, TRANSPORT_FAILURE_STATUS};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Connection settings for a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    /// Applies to every request except streaming ones.
    pub request_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

/// Description of one outbound request.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    method: Method,
    path: &'a str,
    body: Option<serde_json::Value>,
    streaming: bool,
}

impl<'a> Request<'a> {
    pub fn get(path: &'a str) -> Self {
        Self {
            method: Method::GET,
            path,
            body: None,
            streaming: false,
        }
    }

    pub fn post(path: &'a str, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            path,
            body: Some(body),
            streaming: false,
        }
    }

    pub fn delete(path: &'a str, body: serde_json::Value) -> Self {
        Self {
            method: Method::DELETE,
            path,
            body: Some(body),
            streaming: false,
        }
    }

    /// Marks the request as long-running: no whole-request timeout is applied.
    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    pub fn path(&self) -> &str {
        self.path
    }
}

/// HTTP transport bound to one conversation service origin.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl Transport {
    /// Creates a transport for `base_url` (scheme, host, optional path prefix).
    pub fn new(base_url: &str, options: TransportOptions) -> Result<Self, ParleyError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| ParleyError::Config(format!("invalid base URL `{base_url}`: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ParleyError::Config(format!(
                "base URL `{base_url}` must use http or https"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let agent = options
            .user_agent
            .unwrap_or_else(|| concat!("parley/", env!("CARGO_PKG_VERSION")).to_string());
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&agent)
                .map_err(|e| ParleyError::Config(format!("invalid user agent: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| ParleyError::Client {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: options.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and returns the raw response.
    ///
    /// Fails only when no response was obtained: [`TransportFailure::Network`]
    /// for connection-level errors, [`TransportFailure::Cancelled`] when
    /// `cancel` fires first. On cancellation the pending request future is
    /// dropped, which closes the underlying connection.
    pub async fn send(
        &self,
        request: Request<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response, TransportFailure> {
        let Request {
            method,
            path,
            body,
            streaming,
        } = request;

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            debug!(%method, path, "request cancelled before sending");
            return Err(TransportFailure::Cancelled);
        }

        let mut builder = self.client.request(method.clone(), self.url(path));
        if !streaming {
            builder = builder.timeout(self.request_timeout);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let pending = builder.send();
        let outcome = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(%method, path, "request aborted by cancellation");
                    return Err(TransportFailure::Cancelled);
                }
                outcome = pending => outcome,
            },
            None => pending.await,
        };

        match outcome {
            Ok(response) => {
                debug!(%method, path, status = %response.status(), "response received");
                Ok(response)
            }
            Err(e) => {
                warn!(%method, path, error = %e, "HTTP request failed");
                Err(TransportFailure::Network(e.to_string()))
            }
        }
    }

    /// Sends a request; non-2xx responses become [`TransportFailure::Rejected`].
    ///
    /// The response body of a successful call is left unread.
    pub async fn execute(
        &self,
        request: Request<'_>,
        cancel: Option<&CancellationToken>,
    ) -> TransportResult<Response> {
        let response = match self.send(request, cancel).await {
            Ok(response) => response,
            Err(failure) => return TransportResult::err(TRANSPORT_FAILURE_STATUS, failure),
        };

        let status = response.status();
        if status.is_success() {
            return TransportResult::ok(status.as_u16(), response);
        }

        // A stalled error body must not outlive the caller's cancellation.
        let read = response.text();
        let body = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(status = %status, "rejection body read aborted by cancellation");
                    return TransportResult::cancelled();
                }
                body = read => body,
            },
            None => read.await,
        }
        .unwrap_or_default();
        warn!(status = %status, body = %body, "server rejected request");
        TransportResult::err(status.as_u16(), TransportFailure::Rejected { body })
    }

    /// Sends a request and decodes a 2xx JSON body into `T`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: Request<'_>,
    ) -> TransportResult<T> {
        let path = request.path().to_string();
        let (status, body) = match self.send_and_read(request).await {
            Ok(read) => read,
            Err(failure) => return TransportResult::err(TRANSPORT_FAILURE_STATUS, failure),
        };

        if !status.is_success() {
            warn!(path, status = %status, body = %body, "server rejected request");
            return TransportResult::err(status.as_u16(), TransportFailure::Rejected { body });
        }

        match serde_json::from_str::<T>(&body) {
            Ok(value) => TransportResult::ok(status.as_u16(), value),
            Err(e) => {
                warn!(path, error = %e, "failed to decode response body");
                TransportResult::err(status.as_u16(), TransportFailure::Malformed(e.to_string()))
            }
        }
    }

    /// Sends a request whose only meaningful output is its status.
    ///
    /// A 2xx body carrying `{"error": ...}` or `{"success": false}` is still
    /// reported as rejected, with the real status.
    pub async fn execute_status(&self, request: Request<'_>) -> TransportResult<()> {
        let path = request.path().to_string();
        let (status, body) = match self.send_and_read(request).await {
            Ok(read) => read,
            Err(failure) => return TransportResult::err(TRANSPORT_FAILURE_STATUS, failure),
        };

        if !status.is_success() || signals_application_error(&body) {
            warn!(path, status = %status, body = %body, "server rejected request");
            return TransportResult::err(status.as_u16(), TransportFailure::Rejected { body });
        }

        TransportResult::ok(status.as_u16(), ())
    }

    async fn send_and_read(
        &self,
        request: Request<'_>,
    ) -> Result<(StatusCode, String), TransportFailure> {
        let response = self.send(request, None).await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(status = %status, error = %e, "failed to read response body");
            TransportFailure::Network(format!("failed to read response body: {e}"))
        })?;
        Ok((status, body))
    }
}

/// Whether a 2xx body nevertheless reports failure.
fn signals_application_error(body: &str) -> bool {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body)
    else {
        return false;
    };
    let has_error = map.get("error").is_some_and(|v| !v.is_null());
    let unsuccessful = map.get("success") == Some(&serde_json::Value::Bool(false));
    has_error || unsuccessful
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(base_url: &str) -> Transport {
        Transport::new(base_url, TransportOptions::default()).unwrap()
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = Transport::new("not a url", TransportOptions::default()).unwrap_err();
        assert!(matches!(err, ParleyError::Config(_)), "got: {err}");

        let err = Transport::new("ftp://example.com", TransportOptions::default()).unwrap_err();
        assert!(err.to_string().contains("http or https"), "got: {err}");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let t = transport("http://127.0.0.1:5000/app/");
        assert_eq!(t.url("/history/list"), "http://127.0.0.1:5000/app/history/list");
    }

    #[test]
    fn application_error_flags() {
        assert!(signals_application_error(r#"{"error": "nope"}"#));
        assert!(signals_application_error(r#"{"success": false}"#));
        assert!(!signals_application_error(r#"{"success": true}"#));
        assert!(!signals_application_error(r#"{"error": null}"#));
        assert!(!signals_application_error("OK"));
        assert!(!signals_application_error(""));
    }

    #[tokio::test]
    async fn sends_json_content_type_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/history/clear"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"conversation_id": "c-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = transport(&server.uri())
            .execute_status(Request::post("/history/clear", json!({"conversation_id": "c-1"})))
            .await;
        assert!(result.is_ok());
        assert_eq!(result.status(), 200);
    }

    #[tokio::test]
    async fn non_success_keeps_real_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/history/list"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "none"})))
            .mount(&server)
            .await;

        let result = transport(&server.uri())
            .execute_json::<serde_json::Value>(Request::get("/history/list"))
            .await;
        assert_eq!(result.status(), 404);
        assert!(matches!(
            result.failure(),
            Some(TransportFailure::Rejected { body }) if body.contains("none")
        ));
    }

    #[tokio::test]
    async fn success_with_error_flag_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/history/rename"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "title is required"})),
            )
            .mount(&server)
            .await;

        let result = transport(&server.uri())
            .execute_status(Request::post("/history/rename", json!({})))
            .await;
        assert!(!result.is_ok());
        assert_eq!(result.status(), 200);
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/history/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = transport(&server.uri())
            .execute_json::<Vec<serde_json::Value>>(Request::get("/history/list"))
            .await;
        assert_eq!(result.status(), 200);
        assert!(matches!(result.failure(), Some(TransportFailure::Malformed(_))));
    }

    #[tokio::test]
    async fn connection_refused_becomes_500() {
        let url = parley_test_utils::closed_port_url();
        let result = transport(&url).execute(Request::get("/history/list"), None).await;
        assert_eq!(result.status(), 500);
        assert!(matches!(result.failure(), Some(TransportFailure::Network(_))));
    }

    #[tokio::test]
    async fn pre_cancelled_token_never_sends() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        token.cancel();
        let result = transport(&server.uri())
            .execute(Request::post("/conversation", json!({})).streaming(), Some(&token))
            .await;
        assert_eq!(result.status(), 500);
        assert!(matches!(result.failure(), Some(TransportFailure::Cancelled)));
    }

    #[tokio::test]
    async fn cancellation_interrupts_stalled_error_body() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Headers promise 100 bytes of body but only 5 ever arrive.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\n\
                      content-type: text/plain\r\n\
                      content-length: 100\r\n\r\nhello",
                )
                .await;
            let _ = socket.flush().await;
            tokio::time::sleep(Duration::from_secs(60)).await;
            drop(socket);
        });

        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let t = transport(&format!("http://{addr}"));
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            t.execute(Request::post("/conversation", json!({})).streaming(), Some(&token)),
        )
        .await
        .expect("cancellation should end the request");
        assert!(result.is_cancelled());
        assert_eq!(result.status(), 500);
    }

    #[tokio::test]
    async fn rejection_body_is_read_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/conversation"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let result = transport(&server.uri())
            .execute(Request::post("/conversation", json!({})).streaming(), None)
            .await;
        assert_eq!(result.status(), 503);
        assert!(matches!(
            result.failure(),
            Some(TransportFailure::Rejected { body }) if body == "busy"
        ));
    }
}
