// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Parley conversation history service.
//!
//! [`HistoryClient`] implements [`parley_core::HistoryService`] and adds the
//! streaming generation calls. Every request goes through
//! [`transport::Transport`], which turns network errors, cancellation and
//! server rejections into [`parley_core::TransportResult`] values.

mod client;
pub mod endpoints;
mod generate;
pub mod health;
mod mutations;
mod reader;
pub mod stream;
mod sync;
pub mod transport;

pub use client::HistoryClient;
pub use generate::{ByteStream, GenerationResponse};
pub use stream::{decode_ndjson, ChunkStream};
pub use transport::TransportOptions;

pub use tokio_util::sync::CancellationToken;
