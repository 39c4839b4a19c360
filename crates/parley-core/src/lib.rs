// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Parley.
//!
//! This crate holds the data model shared by the history client and its
//! callers: conversation and message types, the uniform [`TransportResult`]
//! envelope, the [`HistoryService`] trait, and a pure reducer for UI state.

pub mod error;
pub mod result;
pub mod state;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParleyError;
pub use result::{TransportFailure, TransportResult, TRANSPORT_FAILURE_STATUS};
pub use state::{reduce, HistoryAction, HistoryState};
pub use traits::HistoryService;
pub use types::{
    Conversation, ConversationRequest, ConversationSummary, HealthReport, HealthStatus, Message,
    MessageContent, Role, Timestamp,
};
