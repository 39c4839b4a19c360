// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service trait definitions.
//!
//! Traits use `#[async_trait]` for dynamic dispatch compatibility, so UI
//! layers can hold a `Box<dyn HistoryService>` and swap in test doubles.

pub mod history;

pub use history::HistoryService;
