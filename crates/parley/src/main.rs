// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parley - command-line client for the conversation history service.

mod generate;
mod history;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parley_client::HistoryClient;
use parley_core::ParleyError;

use crate::history::{Mutation, Output};

/// Parley - command-line client for the conversation history service.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the usual search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override `client.base_url` from the configuration.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List conversations with their message counts.
    List,
    /// Print the messages of one conversation.
    Read {
        /// Conversation ID.
        id: String,
    },
    /// Change a conversation's title.
    Rename {
        /// Conversation ID.
        id: String,
        /// New title.
        title: String,
    },
    /// Remove all messages from a conversation, keeping the conversation.
    Clear {
        /// Conversation ID.
        id: String,
    },
    /// Delete a conversation.
    Delete {
        /// Conversation ID.
        id: String,
    },
    /// Delete every conversation.
    DeleteAll {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Check whether the history store is configured and working.
    Ensure,
    /// Send a message and stream the reply. Ctrl+C cancels.
    Generate {
        /// Append to an existing conversation instead of starting a new one.
        #[arg(long)]
        conversation: Option<String>,
        /// Print raw NDJSON chunks instead of assistant text.
        #[arg(long)]
        raw: bool,
        /// Message text.
        text: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => parley_config::load_and_validate_path(path),
        None => parley_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            parley_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }

    init_tracing(&config.log.level);

    let client = match HistoryClient::from_config(&config.client) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let output = Output {
        json: cli.json,
        plain: cli.plain,
    };

    if let Err(e) = run(&client, cli.command, output).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(client: &HistoryClient, command: Commands, output: Output) -> Result<(), ParleyError> {
    match command {
        Commands::List => history::run_list(client, output).await,
        Commands::Read { id } => history::run_read(client, &id, output).await,
        Commands::Rename { id, title } => {
            history::run_mutation(client, Mutation::Rename { id, title }, output).await
        }
        Commands::Clear { id } => {
            history::run_mutation(client, Mutation::Clear { id }, output).await
        }
        Commands::Delete { id } => {
            history::run_mutation(client, Mutation::Delete { id }, output).await
        }
        Commands::DeleteAll { yes } => {
            if !yes {
                return Err(ParleyError::Config(
                    "delete-all removes every conversation; pass --yes to confirm".into(),
                ));
            }
            history::run_mutation(client, Mutation::DeleteAll, output).await
        }
        Commands::Ensure => history::run_ensure(client, output).await,
        Commands::Generate {
            conversation,
            raw,
            text,
        } => {
            let cancel = shutdown::install_signal_handler();
            let outcome =
                generate::run_generate(client, &text, conversation.as_deref(), raw, &cancel).await;
            cancel.cancel();
            outcome
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` takes precedence over
/// `log.level` from the configuration.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parley={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use parley_test_utils::closed_port_url;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_with_conversation() {
        let cli = Cli::try_parse_from([
            "parley",
            "generate",
            "--conversation",
            "c-1",
            "hello there",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                conversation, text, ..
            } => {
                assert_eq!(conversation.as_deref(), Some("c-1"));
                assert_eq!(text, "hello there");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["parley", "list", "--json", "--base-url", "http://h:1"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.base_url.as_deref(), Some("http://h:1"));
    }

    #[test]
    fn rename_requires_title() {
        assert!(Cli::try_parse_from(["parley", "rename", "c-1"]).is_err());
    }

    #[tokio::test]
    async fn delete_all_requires_confirmation() {
        let client = HistoryClient::new(&closed_port_url()).unwrap();
        let output = Output {
            json: false,
            plain: true,
        };
        let err = run(&client, Commands::DeleteAll { yes: false }, output)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--yes"));
    }

    #[test]
    fn parses_config_path() {
        let cli = Cli::try_parse_from(["parley", "ensure", "--config", "/tmp/parley.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/parley.toml")));
    }

    #[test]
    #[serial_test::serial]
    fn binary_loads_config_defaults() {
        figment::Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.clear_env();
            jail.set_env("XDG_CONFIG_HOME", home.display());
            let config =
                parley_config::load_and_validate().expect("default config should be valid");
            assert_eq!(config.client.base_url, "http://127.0.0.1:5000");
            Ok(())
        });
    }
}
