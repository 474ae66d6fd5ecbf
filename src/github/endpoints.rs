// GitHub API endpoint functions.
// Provides typed methods for fetching data from the GitHub REST API.

use reqwest::StatusCode;

use crate::error::{FeedError, Result};

use super::client::GitHubClient;
use super::jsonp;
use super::types::{ActivityEvent, JsonpEnvelope};

impl GitHubClient {
    /// Get recent activity events for a repository.
    ///
    /// The request carries `callback` so the API answers in JSON-P form; the
    /// real status and rate limit then arrive in the body's `meta` object.
    pub async fn get_repo_events(
        &mut self,
        owner: &str,
        repo: &str,
        callback: &str,
    ) -> Result<Vec<ActivityEvent>> {
        let endpoint = format!("/repos/{}/{}/events", owner, repo);
        let params = [("callback", callback)];
        let response = self.get_with_params(&endpoint, &params).await?;
        let body = response.text().await?;

        let envelope = jsonp::decode(&body, callback)?;
        self.events_from_envelope(&endpoint, envelope)
    }

    fn events_from_envelope(
        &mut self,
        endpoint: &str,
        envelope: JsonpEnvelope,
    ) -> Result<Vec<ActivityEvent>> {
        let meta = &envelope.meta;
        self.set_rate_limit(
            meta.ratelimit_limit.as_deref(),
            meta.ratelimit_remaining.as_deref(),
            meta.ratelimit_reset.as_deref(),
        );

        let status = StatusCode::from_u16(meta.status)
            .map_err(|_| FeedError::Jsonp(format!("invalid status {}", meta.status)))?;
        if !status.is_success() {
            let message = envelope.data["message"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            return Err(self.status_error(status, endpoint, message));
        }

        let events: Vec<ActivityEvent> = serde_json::from_value(envelope.data)?;
        tracing::debug!(count = events.len(), "decoded repository events");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::EventKind;

    #[test]
    fn test_events_from_successful_envelope() {
        let body = r#"/**/tpieevents({
            "meta": {"status": 200, "X-RateLimit-Limit": "60", "X-RateLimit-Remaining": "42"},
            "data": [{
                "type": "CreateEvent",
                "actor": {"login": "jakobt"},
                "created_at": "2013-05-02T10:15:00Z",
                "payload": {"ref": "v1.1", "ref_type": "tag"}
            }]
        })"#;
        let mut client = GitHubClient::new(None).unwrap();
        let envelope = jsonp::decode(body, "tpieevents").unwrap();

        let events = client.events_from_envelope("/repos/o/r/events", envelope).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, EventKind::Create(_)));
        assert_eq!(client.rate_limit().remaining, 42);
    }

    #[test]
    fn test_error_status_in_envelope() {
        let body = r#"cb({"meta": {"status": 404}, "data": {"message": "Not Found"}})"#;
        let mut client = GitHubClient::new(None).unwrap();
        let envelope = jsonp::decode(body, "cb").unwrap();

        let err = client
            .events_from_envelope("/repos/o/missing/events", envelope)
            .unwrap_err();
        assert!(matches!(err, FeedError::NotFound(_)));
    }
}
