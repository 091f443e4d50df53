//! `load_config` module: loads and adapts a static YAML config, including
//! environment secret injection, into the typed [`AgentConfig`].
//!
//! This module is the only place where untrusted YAML is parsed and mapped
//! to rich, strongly-typed internal structs.
//!
//! # Responsibilities
//! - Parse user-supplied YAML configuration files into type-safe Rust structs
//! - Fill omitted keys with the documented defaults (store name, token
//!   endpoint, SMTP relay settings)
//! - Inject environment variables for secret fields: `WO_API_KEY`,
//!   `GITHUB_TOKEN` and `SENDER_PASSWORD` never appear in the file
//! - Ensure robust error messages for CLI and tests: any failure in loading
//!   must result in clear diagnostics
//! - Acts as the adapter layer decoupling the input schema from the domain core
//!
//! # Environment
//! - `WO_API_KEY`: API key exchanged for bearer tokens (required to publish)
//! - `WO_INSTANCE`: overrides `knowledge_base.instance_url` when set
//! - `GITHUB_REPO`: fallback for `ticket.repo` when the file leaves it empty
//! - `GITHUB_TOKEN`: issue tracker token
//! - `SENDER_PASSWORD`: SMTP login password for the sender address
//!
//! # Errors
//! All errors in this module use `anyhow::Error` for context-rich
//! diagnostics, and are surfaced at the CLI boundary. Missing secrets are
//! not errors here; each tool decides how to degrade without them.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use incident_agent_core::notify::EmailConfig;
use incident_agent_core::orchestrate::OrchestrateConfig;
use incident_agent_core::ticket::TicketConfig;
use incident_agent_core::token::DEFAULT_TOKEN_URL;

/// Fully adapted configuration, ready for the core tools.
#[derive(Debug)]
pub struct AgentConfig {
    pub orchestrate: OrchestrateConfig,
    /// Name of the knowledge base the runbook entries are published into.
    pub knowledge_base: String,
    pub ticket: TicketConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseSection,
    #[serde(default)]
    pub ticket: TicketSection,
    #[serde(default)]
    pub email: EmailSection,
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeBaseSection {
    #[serde(default)]
    pub instance_url: String,
    #[serde(default = "default_store_name")]
    pub name: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

impl Default for KnowledgeBaseSection {
    fn default() -> Self {
        Self {
            instance_url: String::new(),
            name: default_store_name(),
            token_url: default_token_url(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TicketSection {
    #[serde(default)]
    pub repo: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailSection {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub default_recipient: String,
}

impl Default for EmailSection {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            use_tls: default_use_tls(),
            sender: String::new(),
            default_recipient: String::new(),
        }
    }
}

fn default_store_name() -> String {
    "incident_runbooks_kb".to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_use_tls() -> bool {
    true
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

/// Loads a static YAML config file (no secrets) and injects required env
/// vars for secrets. Returns the adapted config for use by the CLI.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AgentConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: FileConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    Ok(adapt(raw))
}

/// Merge the parsed file with the secret-bearing environment. Secrets are
/// injected leniently; tools that need an absent secret degrade or fail
/// with their own diagnostics.
fn adapt(raw: FileConfig) -> AgentConfig {
    let instance_override = env_or_empty("WO_INSTANCE");
    let instance_url = if instance_override.is_empty() {
        raw.knowledge_base.instance_url
    } else {
        instance_override
    };

    let repo = if raw.ticket.repo.is_empty() {
        env_or_empty("GITHUB_REPO")
    } else {
        raw.ticket.repo
    };

    AgentConfig {
        orchestrate: OrchestrateConfig {
            instance_url,
            token_url: raw.knowledge_base.token_url,
            api_key: env_or_empty("WO_API_KEY"),
        },
        knowledge_base: raw.knowledge_base.name,
        ticket: TicketConfig::new(repo, env_or_empty("GITHUB_TOKEN")),
        email: EmailConfig {
            smtp_host: raw.email.smtp_host,
            smtp_port: raw.email.smtp_port,
            use_tls: raw.email.use_tls,
            sender: raw.email.sender,
            sender_password: env_or_empty("SENDER_PASSWORD"),
            default_recipient: raw.email.default_recipient,
        },
    }
}
