// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full history hydration: list, then read every conversation concurrently.

use futures::future::join_all;
use parley_core::{Conversation, ConversationSummary};
use tracing::{debug, warn};

use crate::client::HistoryClient;
use crate::endpoints;
use crate::transport::Request;

impl HistoryClient {
    /// Lists all conversations and reads their messages.
    ///
    /// Returns `None` if the list cannot be fetched or is not an array of
    /// summaries. Reads run concurrently on the calling task; a failed read
    /// leaves that conversation with no messages and never affects its
    /// siblings. The result follows list order.
    pub async fn sync(&self) -> Option<Vec<Conversation>> {
        let result = self
            .transport
            .execute_json::<Vec<ConversationSummary>>(Request::get(endpoints::HISTORY_LIST))
            .await;

        let status = result.status();
        let summaries = match result.into_result() {
            Ok(summaries) => summaries,
            Err(failure) => {
                warn!(status, error = %failure, "history list unavailable");
                return None;
            }
        };
        debug!(count = summaries.len(), "history list fetched");

        let reads = join_all(summaries.iter().map(|s| self.read(&s.id))).await;

        Some(
            summaries
                .into_iter()
                .zip(reads)
                .map(|(summary, messages)| Conversation::from_summary(summary, messages))
                .collect(),
        )
    }
}
