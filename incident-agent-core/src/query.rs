//! Assembly of knowledge-base search queries from incident form fields.

/// Fields captured from the incident triage form.
#[derive(Debug, Clone, Default)]
pub struct SearchFields {
    pub service: String,
    pub environment: String,
    pub symptoms_error: String,
    pub time_window: String,
    pub user_impact: String,
    pub recent_changes: String,
}

/// Build a focused search query from the form fields.
///
/// Pure string assembly: fields are trimmed, labelled and joined with
/// ` | ` in a fixed order, so equal inputs always produce equal queries.
pub fn build_incident_search_query(fields: &SearchFields) -> String {
    [
        format!("service={}", fields.service.trim()),
        format!("environment={}", fields.environment.trim()),
        format!("symptoms={}", fields.symptoms_error.trim()),
        format!("time_window={}", fields.time_window.trim()),
        format!("user_impact={}", fields.user_impact.trim()),
        format!("recent_changes={}", fields.recent_changes.trim()),
    ]
    .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_labels_and_joins_in_fixed_order() {
        let fields = SearchFields {
            service: "checkout".to_string(),
            environment: "production".to_string(),
            symptoms_error: "HTTP 504 at the gateway".to_string(),
            time_window: "last 30m".to_string(),
            user_impact: "payments failing".to_string(),
            recent_changes: "release 42 rolled out".to_string(),
        };
        assert_eq!(
            build_incident_search_query(&fields),
            "service=checkout | environment=production | symptoms=HTTP 504 at the gateway | \
             time_window=last 30m | user_impact=payments failing | recent_changes=release 42 rolled out"
        );
    }

    #[test]
    fn query_trims_each_field() {
        let fields = SearchFields {
            service: "  checkout  ".to_string(),
            ..SearchFields::default()
        };
        let query = build_incident_search_query(&fields);
        assert!(query.starts_with("service=checkout | environment= |"));
    }

    #[test]
    fn empty_fields_keep_their_labels() {
        let query = build_incident_search_query(&SearchFields::default());
        assert_eq!(
            query,
            "service= | environment= | symptoms= | time_window= | user_impact= | recent_changes="
        );
    }
}
