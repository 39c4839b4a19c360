// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The uniform result envelope returned by every history operation.
//!
//! A [`TransportResult`] is either `Ok` with the HTTP status and a decoded
//! value, or `Err` with the status and a [`TransportFailure`] cause. Network
//! failures and cancellation carry the synthetic status
//! [`TRANSPORT_FAILURE_STATUS`]; server rejections carry the real one.

use thiserror::Error;

/// Status reported when no HTTP response was obtained at all.
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Why an operation did not produce a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// The request never completed (DNS, connection reset, timeout).
    #[error("network failure: {0}")]
    Network(String),

    /// The caller's cancellation token fired before the request settled.
    #[error("request cancelled")]
    Cancelled,

    /// The server answered with a non-2xx status or an application-level
    /// error flag in a 2xx body.
    #[error("server rejected request: {body}")]
    Rejected { body: String },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Result of a single request, with every failure represented as data.
#[derive(Debug)]
#[must_use]
pub enum TransportResult<T> {
    Ok { status: u16, value: T },
    Err { status: u16, failure: TransportFailure },
}

impl<T> TransportResult<T> {
    /// A successful result.
    pub fn ok(status: u16, value: T) -> Self {
        Self::Ok { status, value }
    }

    /// A failed result with an explicit status.
    pub fn err(status: u16, failure: TransportFailure) -> Self {
        Self::Err { status, failure }
    }

    /// A transport-level failure (no response obtained).
    pub fn network(message: impl Into<String>) -> Self {
        Self::err(
            TRANSPORT_FAILURE_STATUS,
            TransportFailure::Network(message.into()),
        )
    }

    /// A request aborted through its cancellation token.
    pub fn cancelled() -> Self {
        Self::err(TRANSPORT_FAILURE_STATUS, TransportFailure::Cancelled)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Err {
                failure: TransportFailure::Cancelled,
                ..
            }
        )
    }

    /// HTTP status of the response, or 500 when none was obtained.
    pub fn status(&self) -> u16 {
        match self {
            Self::Ok { status, .. } | Self::Err { status, .. } => *status,
        }
    }

    /// The value, only when the operation succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok { value, .. } => Some(value),
            Self::Err { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Ok { value, .. } => Some(value),
            Self::Err { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&TransportFailure> {
        match self {
            Self::Ok { .. } => None,
            Self::Err { failure, .. } => Some(failure),
        }
    }

    /// Maps the success value, leaving status and failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TransportResult<U> {
        match self {
            Self::Ok { status, value } => TransportResult::Ok {
                status,
                value: f(value),
            },
            Self::Err { status, failure } => TransportResult::Err { status, failure },
        }
    }

    /// Converts into a plain `Result`, dropping the status.
    pub fn into_result(self) -> Result<T, TransportFailure> {
        match self {
            Self::Ok { value, .. } => Ok(value),
            Self::Err { failure, .. } => Err(failure),
        }
    }
}
