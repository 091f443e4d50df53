//! # incident-agent CLI Interface (Module)
//!
//! This module implements the full CLI interface for incident-agent,
//! handling command parsing, argument validation, main entrypoints, and
//! user-visible invocations.
//!
//! All core business logic (composition, sync workflow, tools) lives in
//! the [`incident-agent-core`] crate. This module is strictly for CLI
//! glue, ergonomic argument exposure, and orchestration.
//!
//! ## Features
//! - Entry struct [`Cli`] defines all user-facing options and subcommands.
//! - Subcommand routing (`draft`, `ticket`, `notify`, `query`) and
//!   argument validation.
//! - Async entrypoint ([`run`]) for programmatic invocation and
//!   integration testing.
//! - Every tool prints its status string contract on stdout; logging and
//!   structured error output happen at CLI level.
//!
//! ## How To Use
//! - For command-line users: use the installed `incident-agent` binary
//!   with `--help`.
//! - For programmatic/integration use: call [`run`] with a constructed
//!   [`Cli`].
//!
//! ## Extending
//! When adding subcommands, update [`Commands`] below and keep all
//! non-trivial business logic inside `incident-agent-core`.
//!
//! [`incident-agent-core`]: ../../incident-agent-core/

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use incident_agent_core::compose::IncidentFields;
use incident_agent_core::notify::{send_incident_email, NotificationRequest};
use incident_agent_core::orchestrate::OrchestrateClient;
use incident_agent_core::query::{build_incident_search_query, SearchFields};
use incident_agent_core::synchronise::draft_runbook_entry;
use incident_agent_core::ticket::{create_incident_ticket, TicketRequest};

use crate::load_config::load_config;

/// CLI for the incident agent: publish runbook knowledge and fan out incident actions.
#[derive(Parser)]
#[clap(
    name = "incident-agent",
    version,
    about = "Draft and publish incident runbook entries, file tickets, and notify on-call engineers"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose a runbook entry and publish it to the configured knowledge base
    Draft {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        #[clap(long)]
        title: String,
        #[clap(long)]
        service: String,
        #[clap(long)]
        environment: String,
        #[clap(long)]
        symptoms: String,
        #[clap(long)]
        likely_causes: String,
        #[clap(long)]
        immediate_mitigation: String,
        #[clap(long)]
        escalation_triggers: String,
        #[clap(long)]
        verification_steps: String,
    },
    /// File the incident as an issue in the configured tracker
    Ticket {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        #[clap(long)]
        service: String,
        #[clap(long)]
        environment: String,
        #[clap(long)]
        severity: String,
        #[clap(long)]
        summary: String,
        #[clap(long)]
        recommended_actions: String,
    },
    /// Email the incident notification to the on-call engineer
    Notify {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        #[clap(long)]
        service: String,
        #[clap(long)]
        environment: String,
        #[clap(long)]
        severity: String,
        #[clap(long)]
        summary: String,
        #[clap(long)]
        recommended_actions: String,
        /// Overrides the rendered subject when non-blank
        #[clap(long, default_value = "")]
        email_subject: String,
        /// Overrides the rendered body when non-blank
        #[clap(long, default_value = "")]
        email_body: String,
        /// Overrides the configured default recipient when non-blank
        #[clap(long, default_value = "")]
        recipient_email: String,
    },
    /// Build a knowledge-base search query from incident form fields
    Query {
        #[clap(long)]
        service: String,
        #[clap(long)]
        environment: String,
        #[clap(long)]
        symptoms_error: String,
        #[clap(long)]
        time_window: String,
        #[clap(long)]
        user_impact: String,
        #[clap(long)]
        recent_changes: String,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Draft {
            config,
            title,
            service,
            environment,
            symptoms,
            likely_causes,
            immediate_mitigation,
            escalation_triggers,
            verification_steps,
        } => {
            let agent = load_config(config)?;
            if agent.orchestrate.instance_url.is_empty() {
                return Err(anyhow::anyhow!(
                    "knowledge_base.instance_url is not configured (set it in the config file or via WO_INSTANCE)"
                ));
            }
            if agent.orchestrate.api_key.is_empty() {
                return Err(anyhow::anyhow!("WO_API_KEY is not set"));
            }
            tracing::info!(
                command = "draft",
                store = %agent.knowledge_base,
                "Starting runbook draft and publish"
            );
            let client = OrchestrateClient::new(agent.orchestrate);
            let fields = IncidentFields {
                title,
                service,
                environment,
                symptoms,
                likely_causes,
                immediate_mitigation,
                escalation_triggers,
                verification_steps,
            };
            let status = draft_runbook_entry(&client, &agent.knowledge_base, fields).await;
            println!("{status}");
        }
        Commands::Ticket {
            config,
            service,
            environment,
            severity,
            summary,
            recommended_actions,
        } => {
            let agent = load_config(config)?;
            tracing::info!(command = "ticket", "Filing incident ticket");
            let request = TicketRequest {
                service,
                environment,
                severity,
                summary,
                recommended_actions,
            };
            let status = create_incident_ticket(&agent.ticket, &request).await;
            println!("{status}");
        }
        Commands::Notify {
            config,
            service,
            environment,
            severity,
            summary,
            recommended_actions,
            email_subject,
            email_body,
            recipient_email,
        } => {
            let agent = load_config(config)?;
            tracing::info!(command = "notify", "Sending incident notification");
            let request = NotificationRequest {
                service,
                environment,
                severity,
                summary,
                recommended_actions,
                email_subject,
                email_body,
                recipient_email,
            };
            let status = send_incident_email(&agent.email, &request).await;
            println!("{status}");
        }
        Commands::Query {
            service,
            environment,
            symptoms_error,
            time_window,
            user_impact,
            recent_changes,
        } => {
            let fields = SearchFields {
                service,
                environment,
                symptoms_error,
                time_window,
                user_impact,
                recent_changes,
            };
            println!("{}", build_incident_search_query(&fields));
        }
    }

    Ok(())
}
