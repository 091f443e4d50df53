//! Incident ticket filing against the GitHub issues API.
//!
//! Single-call tool with the same contract as the sync workflow's status
//! strings: every outcome, including missing configuration, comes back as
//! a `ticket_*` status line rather than an error.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

const TICKET_TIMEOUT: Duration = Duration::from_secs(15);
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "incident-triage-agent";

/// Where incident tickets get filed.
#[derive(Debug, Clone)]
pub struct TicketConfig {
    /// `owner/repo` target. Empty skips ticket creation.
    pub repo: String,
    /// Token with permission to open issues. Empty skips ticket creation.
    pub token: String,
    /// API base URL, overridable for tests.
    pub api_base: String,
}

impl TicketConfig {
    pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            token: token.into(),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// Incident facts carried into the issue title and body.
#[derive(Debug, Clone, Default)]
pub struct TicketRequest {
    pub service: String,
    pub environment: String,
    pub severity: String,
    pub summary: String,
    pub recommended_actions: String,
}

fn issue_title(req: &TicketRequest) -> String {
    format!(
        "[{}] {} incident in {}: {}",
        req.severity, req.service, req.environment, req.summary
    )
}

fn issue_body(req: &TicketRequest) -> String {
    format!(
        "## Incident Details\n- Service: {}\n- Environment: {}\n- Severity: {}\n- Summary: {}\n\n## Recommended Actions\n{}\n",
        req.service, req.environment, req.severity, req.summary, req.recommended_actions
    )
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    number: Option<u64>,
    html_url: Option<String>,
    message: Option<String>,
}

/// File the incident as a tracker issue, labelled `incident` plus the
/// lowercased severity. Returns a status string on every path.
pub async fn create_incident_ticket(config: &TicketConfig, req: &TicketRequest) -> String {
    if config.repo.is_empty() {
        return "ticket_skipped: missing GITHUB_REPO runtime secret".to_string();
    }
    if config.token.is_empty() {
        return "ticket_skipped: missing GITHUB_TOKEN runtime secret".to_string();
    }

    let payload = json!({
        "title": issue_title(req),
        "body": issue_body(req),
        "labels": ["incident", req.severity.to_lowercase()],
    });

    let url = format!("{}/repos/{}/issues", config.api_base, config.repo);
    info!(repo = %config.repo, "Filing incident ticket");

    let client = reqwest::Client::new();
    let response = match client
        .post(&url)
        .header("Accept", "application/vnd.github+json")
        .header("X-GitHub-Api-Version", API_VERSION)
        .header("User-Agent", USER_AGENT)
        .bearer_auth(&config.token)
        .json(&payload)
        .timeout(TICKET_TIMEOUT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Ticket request could not be sent");
            return format!("ticket_failed: {e}");
        }
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(text) => text,
        Err(e) => return format!("ticket_failed: {e}"),
    };

    if !status.is_success() {
        error!(status = %status, "Issue tracker rejected the ticket");
        return format!("ticket_failed: http_{} {}", status.as_u16(), body)
            .trim_end()
            .to_string();
    }
    if body.is_empty() {
        return "ticket_failed: empty response from github".to_string();
    }

    let parsed: IssueResponse = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(_) => return format!("ticket_failed: non-json response {body}"),
    };

    match parsed {
        IssueResponse {
            number: Some(number),
            html_url: Some(html_url),
            ..
        } => {
            info!(issue = number, "Incident ticket created");
            format!("ticket_created: issue #{number} {html_url}")
        }
        IssueResponse {
            message: Some(message),
            ..
        } => format!("ticket_failed: {message}"),
        _ => format!("ticket_failed: unexpected github response {body}"),
    }
}
