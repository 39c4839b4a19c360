// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure reducer for client-side history state.
//!
//! UI layers keep a single [`HistoryState`] and feed it [`HistoryAction`]s
//! produced from client results. [`reduce`] never performs I/O.

use serde::{Deserialize, Serialize};

use crate::types::{Conversation, HealthReport};

/// Client-side snapshot of the conversation history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    /// Conversations in list order (newest first as served).
    pub conversations: Vec<Conversation>,
    /// Last health probe outcome, if any.
    pub health: Option<HealthReport>,
    /// Whether a hydration attempt has completed (successfully or not).
    pub loaded: bool,
    /// Conversation currently shown in the chat view.
    pub current_id: Option<String>,
}

impl HistoryState {
    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn current(&self) -> Option<&Conversation> {
        self.current_id.as_deref().and_then(|id| self.conversation(id))
    }
}

/// Events applied to [`HistoryState`].
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    /// Result of a history sync. `None` means the list could not be fetched.
    Hydrated(Option<Vec<Conversation>>),
    Renamed { id: String, title: String },
    /// Messages removed; the conversation stays.
    Cleared { id: String },
    Deleted { id: String },
    DeletedAll,
    /// A conversation was created or extended by a generation turn.
    Upserted(Conversation),
    HealthProbed(HealthReport),
    Selected(Option<String>),
}

/// Applies `action` to `state` and returns the next state.
pub fn reduce(mut state: HistoryState, action: HistoryAction) -> HistoryState {
    match action {
        HistoryAction::Hydrated(conversations) => {
            state.conversations = conversations.unwrap_or_default();
            state.loaded = true;
            let stale = state
                .current_id
                .as_deref()
                .is_some_and(|id| state.conversation(id).is_none());
            if stale {
                state.current_id = None;
            }
        }
        HistoryAction::Renamed { id, title } => {
            if let Some(conv) = state.conversations.iter_mut().find(|c| c.id == id) {
                conv.title = title;
            }
        }
        HistoryAction::Cleared { id } => {
            if let Some(conv) = state.conversations.iter_mut().find(|c| c.id == id) {
                conv.messages.clear();
            }
        }
        HistoryAction::Deleted { id } => {
            state.conversations.retain(|c| c.id != id);
            if state.current_id.as_deref() == Some(id.as_str()) {
                state.current_id = None;
            }
        }
        HistoryAction::DeletedAll => {
            state.conversations.clear();
            state.current_id = None;
        }
        HistoryAction::Upserted(conversation) => {
            match state
                .conversations
                .iter_mut()
                .find(|c| c.id == conversation.id)
            {
                Some(existing) => *existing = conversation,
                None => state.conversations.insert(0, conversation),
            }
        }
        HistoryAction::HealthProbed(report) => {
            state.health = Some(report);
        }
        HistoryAction::Selected(id) => {
            state.current_id = id;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HealthStatus, Message, Role};

    fn conv(id: &str, title: &str, messages: usize) -> Conversation {
        Conversation {
            id: id.into(),
            title: title.into(),
            date: "2026-03-01T10:00:00Z".into(),
            messages: (0..messages)
                .map(|i| Message::new(format!("{id}-m{i}"), Role::User, "", "hi"))
                .collect(),
        }
    }

    fn hydrated(convs: Vec<Conversation>) -> HistoryState {
        reduce(HistoryState::default(), HistoryAction::Hydrated(Some(convs)))
    }

    #[test]
    fn failed_hydration_marks_loaded_and_empty() {
        let state = reduce(HistoryState::default(), HistoryAction::Hydrated(None));
        assert!(state.loaded);
        assert!(state.conversations.is_empty());
    }

    #[test]
    fn clear_keeps_shell_but_delete_removes() {
        let state = hydrated(vec![conv("a", "A", 2), conv("b", "B", 3)]);

        let cleared = reduce(state.clone(), HistoryAction::Cleared { id: "a".into() });
        assert_eq!(cleared.conversations.len(), 2);
        assert!(cleared.conversation("a").unwrap().messages.is_empty());
        assert_eq!(cleared.conversation("b").unwrap().messages.len(), 3);

        let deleted = reduce(state, HistoryAction::Deleted { id: "a".into() });
        assert_eq!(deleted.conversations.len(), 1);
        assert!(deleted.conversation("a").is_none());
    }

    #[test]
    fn deleting_current_conversation_deselects_it() {
        let state = hydrated(vec![conv("a", "A", 1)]);
        let state = reduce(state, HistoryAction::Selected(Some("a".into())));
        assert_eq!(state.current().map(|c| c.title.as_str()), Some("A"));

        let state = reduce(state, HistoryAction::Deleted { id: "a".into() });
        assert!(state.current_id.is_none());
    }

    #[test]
    fn rename_only_touches_target() {
        let state = hydrated(vec![conv("a", "A", 0), conv("b", "B", 0)]);
        let state = reduce(
            state,
            HistoryAction::Renamed {
                id: "b".into(),
                title: "Renamed".into(),
            },
        );
        assert_eq!(state.conversation("a").unwrap().title, "A");
        assert_eq!(state.conversation("b").unwrap().title, "Renamed");
    }

    #[test]
    fn upsert_replaces_or_prepends() {
        let state = hydrated(vec![conv("a", "A", 1)]);

        let state = reduce(state, HistoryAction::Upserted(conv("a", "A", 4)));
        assert_eq!(state.conversations.len(), 1);
        assert_eq!(state.conversations[0].messages.len(), 4);

        let state = reduce(state, HistoryAction::Upserted(conv("new", "New", 1)));
        assert_eq!(state.conversations[0].id, "new");
        assert_eq!(state.conversations[1].id, "a");
    }

    #[test]
    fn health_and_delete_all() {
        let state = hydrated(vec![conv("a", "A", 1)]);
        let state = reduce(state, HistoryAction::Selected(Some("a".into())));
        let state = reduce(
            state,
            HistoryAction::HealthProbed(HealthReport {
                available: true,
                status: HealthStatus::Working,
            }),
        );
        let state = reduce(state, HistoryAction::DeletedAll);
        assert!(state.conversations.is_empty());
        assert!(state.current_id.is_none());
        assert_eq!(state.health.map(|h| h.status), Some(HealthStatus::Working));
    }

    #[test]
    fn rehydration_drops_stale_selection() {
        let state = hydrated(vec![conv("a", "A", 1)]);
        let state = reduce(state, HistoryAction::Selected(Some("a".into())));
        let state = reduce(state, HistoryAction::Hydrated(Some(vec![conv("b", "B", 0)])));
        assert!(state.current_id.is_none());
    }
}
