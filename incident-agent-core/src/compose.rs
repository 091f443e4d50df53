//! Composition of runbook entries: slug derivation, filename generation
//! and rendering of the plain-text entry body.
//!
//! Composition is pure and infallible. Every submission produces an entry,
//! however sparse the input, so the publish step downstream always has
//! something to upload.

use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use regex::Regex;

/// Slug used when the title contains no alphanumeric characters at all.
pub const FALLBACK_SLUG: &str = "new-incident";

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern compiles"));

/// Raw incident facts captured from the reporter, used verbatim (modulo
/// whitespace trimming) in the rendered entry body.
#[derive(Debug, Clone, Default)]
pub struct IncidentFields {
    pub title: String,
    pub service: String,
    pub environment: String,
    pub symptoms: String,
    pub likely_causes: String,
    pub immediate_mitigation: String,
    pub escalation_triggers: String,
    pub verification_steps: String,
}

/// A fully composed runbook entry, ready for upload.
#[derive(Debug, Clone)]
pub struct RunbookEntry {
    pub fields: IncidentFields,
    pub slug: String,
    /// `custom-<slug>-<unix-seconds>.txt`. Unique per second per slug;
    /// two entries composed for the same title within the same second
    /// collide and the later upload overwrites the earlier one.
    pub filename: String,
    pub body: String,
}

/// Derive a URL-safe slug from a free-form title.
///
/// Lowercases the title, collapses every run of non-alphanumeric
/// characters into a single hyphen and strips hyphens from both ends.
/// Deterministic and idempotent; never returns an empty string.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let collapsed = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

impl RunbookEntry {
    /// Compose an entry stamped with the current unix time.
    pub fn new(fields: IncidentFields) -> Self {
        let unix_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::with_timestamp(fields, unix_seconds)
    }

    /// Compose an entry with an explicit timestamp, so callers that need a
    /// reproducible filename can pin one.
    pub fn with_timestamp(fields: IncidentFields, unix_seconds: u64) -> Self {
        let slug = slugify(&fields.title);
        let filename = format!("custom-{slug}-{unix_seconds}.txt");
        let body = render_body(&fields, &slug);
        Self {
            fields,
            slug,
            filename,
            body,
        }
    }
}

fn render_body(fields: &IncidentFields, slug: &str) -> String {
    format!(
        "=== RUNBOOK ENTRY START ===
Title: {title}
Slug: {slug}
Service: {service}
Environment: {environment}

Symptoms:
{symptoms}

Likely Causes:
{likely_causes}

Immediate Mitigation:
{immediate_mitigation}

Escalation:
{escalation_triggers}

Verification:
{verification_steps}
=== RUNBOOK ENTRY END ===
",
        title = fields.title.trim(),
        slug = slug,
        service = fields.service.trim(),
        environment = fields.environment.trim(),
        symptoms = fields.symptoms.trim(),
        likely_causes = fields.likely_causes.trim(),
        immediate_mitigation = fields.immediate_mitigation.trim(),
        escalation_triggers = fields.escalation_triggers.trim(),
        verification_steps = fields.verification_steps.trim(),
    )
}
