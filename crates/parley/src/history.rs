// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History subcommands: `list`, `read`, `rename`, `clear`, `delete`,
//! `delete-all` and `ensure`.
//!
//! Each command works against any [`HistoryService`]. Output goes to stdout,
//! either as a human-readable table or as pretty JSON with `--json`.

use std::io::IsTerminal;

use parley_core::{
    Conversation, HealthReport, HealthStatus, HistoryService, Message, ParleyError,
    TransportResult,
};
use serde::Serialize;

/// Output options shared by every history command.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub plain: bool,
}

impl Output {
    fn use_color(self) -> bool {
        !self.plain && std::io::stdout().is_terminal()
    }
}

/// Outcome of a mutation in `--json` mode.
#[derive(Debug, Serialize)]
struct MutationReport {
    ok: bool,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run_list(service: &dyn HistoryService, output: Output) -> Result<(), ParleyError> {
    let conversations = service.sync().await.ok_or_else(|| ParleyError::Client {
        message: "conversation history is unavailable".into(),
        source: None,
    })?;

    if output.json {
        print_json(&conversations);
    } else {
        print!("{}", render_list(&conversations));
    }
    Ok(())
}

pub async fn run_read(
    service: &dyn HistoryService,
    conversation_id: &str,
    output: Output,
) -> Result<(), ParleyError> {
    let messages = service.read(conversation_id).await;
    if output.json {
        print_json(&messages);
    } else {
        print!("{}", render_messages(&messages));
    }
    Ok(())
}

/// A history mutation selected on the command line.
#[derive(Debug, Clone)]
pub enum Mutation {
    Rename { id: String, title: String },
    Clear { id: String },
    Delete { id: String },
    DeleteAll,
}

impl Mutation {
    fn describe(&self) -> String {
        match self {
            Mutation::Rename { id, title } => format!("renamed {id} to \"{title}\""),
            Mutation::Clear { id } => format!("cleared {id}"),
            Mutation::Delete { id } => format!("deleted {id}"),
            Mutation::DeleteAll => "deleted all conversations".to_string(),
        }
    }
}

pub async fn run_mutation(
    service: &dyn HistoryService,
    mutation: Mutation,
    output: Output,
) -> Result<(), ParleyError> {
    let result = match &mutation {
        Mutation::Rename { id, title } => service.rename(id, title).await,
        Mutation::Clear { id } => service.clear(id).await,
        Mutation::Delete { id } => service.delete(id).await,
        Mutation::DeleteAll => service.delete_all().await,
    };

    if output.json {
        print_json(&MutationReport {
            ok: result.is_ok(),
            status: result.status(),
            error: result.failure().map(ToString::to_string),
        });
    }

    let status = result.status();
    into_client_result(result)?;
    if !output.json {
        println!("{} (status {status})", mutation.describe());
    }
    Ok(())
}

pub async fn run_ensure(service: &dyn HistoryService, output: Output) -> Result<(), ParleyError> {
    let report = service.probe().await;
    if output.json {
        print_json(&report);
    } else {
        println!("{}", render_health(report, output.use_color()));
    }
    Ok(())
}

/// Turns a failed [`TransportResult`] into a [`ParleyError::Client`].
pub fn into_client_result<T>(result: TransportResult<T>) -> Result<T, ParleyError> {
    let status = result.status();
    result.into_result().map_err(|failure| ParleyError::Client {
        message: format!("request failed with status {status}: {failure}"),
        source: Some(Box::new(failure)),
    })
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
    );
}

fn render_list(conversations: &[Conversation]) -> String {
    if conversations.is_empty() {
        return "no conversations\n".to_string();
    }
    let mut out = String::new();
    for conv in conversations {
        let date = conv
            .date_utc()
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| conv.date.clone());
        let title = if conv.title.is_empty() {
            "(untitled)"
        } else {
            conv.title.as_str()
        };
        out.push_str(&format!(
            "{}  {:<16}  {} ({} messages)\n",
            conv.id,
            date,
            title,
            conv.messages.len()
        ));
    }
    out
}

fn render_messages(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        let body = match message.content.as_text() {
            Some(text) => text.to_string(),
            None => serde_json::to_string(&message.content).unwrap_or_default(),
        };
        out.push_str(&format!("[{}] {}\n", message.role, body));
    }
    out
}

fn render_health(report: HealthReport, use_color: bool) -> String {
    let label = match report.status {
        HealthStatus::Working => "working",
        HealthStatus::NotWorking => "not working",
        HealthStatus::NotConfigured => "not configured",
    };
    let available = if report.available { "available" } else { "unavailable" };

    if use_color {
        use colored::Colorize;
        let label = match report.status {
            HealthStatus::Working => label.green(),
            HealthStatus::NotWorking => label.red(),
            HealthStatus::NotConfigured => label.yellow(),
        };
        format!("history store: {label} ({available})")
    } else {
        let tag = match report.status {
            HealthStatus::Working => "[OK]",
            HealthStatus::NotWorking => "[FAIL]",
            HealthStatus::NotConfigured => "[WARN]",
        };
        format!("history store: {tag} {label} ({available})")
    }
}
