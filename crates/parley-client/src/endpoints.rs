// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paths of the conversation service endpoints, relative to the base URL.

pub const CONVERSATION: &str = "/conversation";
pub const HISTORY_GENERATE: &str = "/history/generate";
pub const HISTORY_LIST: &str = "/history/list";
pub const HISTORY_READ: &str = "/history/read";
pub const HISTORY_UPDATE: &str = "/history/update";
pub const HISTORY_DELETE: &str = "/history/delete";
pub const HISTORY_DELETE_ALL: &str = "/history/delete_all";
pub const HISTORY_CLEAR: &str = "/history/clear";
pub const HISTORY_RENAME: &str = "/history/rename";
pub const HISTORY_ENSURE: &str = "/history/ensure";
