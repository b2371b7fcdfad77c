// Outbound notifications: pick submissions and finished drafts are POSTed to
// the cube server. Delivery is best-effort; callers log failures and move on.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::NotifySettings;
use crate::protocol::{DraftRecord, PickSubmission};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
}

/// Sink for draft progress.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn submit_pick(&self, submission: &PickSubmission) -> Result<(), NotifyError>;

    async fn submit_draft(&self, record: &DraftRecord) -> Result<(), NotifyError>;
}

// ---------------------------------------------------------------------------
// HttpNotifier
// ---------------------------------------------------------------------------

/// Posts JSON to `{base_url}/cube/api/...`.
pub struct HttpNotifier {
    http: reqwest::Client,
    base_url: String,
    cube_id: String,
}

impl HttpNotifier {
    pub fn new(base_url: impl Into<String>, cube_id: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cube_id: cube_id.into(),
        }
    }

    pub fn pick_url(&self) -> String {
        format!("{}/cube/api/draftpickcard/{}", self.base_url, self.cube_id)
    }

    pub fn draft_url(&self) -> String {
        format!("{}/cube/api/submitdraft/{}", self.base_url, self.cube_id)
    }

    async fn post<T: Serialize + Sync>(&self, url: String, body: &T) -> Result<(), NotifyError> {
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
                url,
            });
        }
        debug!(%url, status = status.as_u16(), "notification delivered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn submit_pick(&self, submission: &PickSubmission) -> Result<(), NotifyError> {
        self.post(self.pick_url(), submission).await
    }

    async fn submit_draft(&self, record: &DraftRecord) -> Result<(), NotifyError> {
        self.post(self.draft_url(), record).await
    }
}

// ---------------------------------------------------------------------------
// DraftNotifier
// ---------------------------------------------------------------------------

/// Notifier selected from config: active when a server is configured,
/// otherwise every submission is dropped.
pub enum DraftNotifier {
    Active(HttpNotifier),
    Disabled,
}

impl DraftNotifier {
    /// `Active` when `base_url` is set and non-empty. The cube id falls back to
    /// `default_cube`.
    pub fn from_config(settings: &NotifySettings, default_cube: &str) -> Self {
        match &settings.base_url {
            Some(url) if !url.is_empty() => {
                let cube = settings.cube_id.as_deref().unwrap_or(default_cube);
                DraftNotifier::Active(HttpNotifier::new(url.clone(), cube))
            }
            _ => DraftNotifier::Disabled,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DraftNotifier::Active(_))
    }
}

#[async_trait]
impl Notifier for DraftNotifier {
    async fn submit_pick(&self, submission: &PickSubmission) -> Result<(), NotifyError> {
        match self {
            DraftNotifier::Active(http) => http.submit_pick(submission).await,
            DraftNotifier::Disabled => Ok(()),
        }
    }

    async fn submit_draft(&self, record: &DraftRecord) -> Result<(), NotifyError> {
        match self {
            DraftNotifier::Active(http) => http.submit_draft(record).await,
            DraftNotifier::Disabled => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: Option<&str>, cube_id: Option<&str>) -> NotifySettings {
        NotifySettings {
            base_url: base_url.map(String::from),
            cube_id: cube_id.map(String::from),
        }
    }

    #[test]
    fn disabled_without_base_url() {
        assert!(!DraftNotifier::from_config(&settings(None, Some("c")), "x").is_active());
        assert!(!DraftNotifier::from_config(&settings(Some(""), None), "x").is_active());
    }

    #[test]
    fn urls_use_cube_id_and_trim_slash() {
        let notifier = match DraftNotifier::from_config(&settings(Some("http://host:8080/"), None), "legacy") {
            DraftNotifier::Active(http) => http,
            DraftNotifier::Disabled => panic!("expected active notifier"),
        };
        assert_eq!(notifier.pick_url(), "http://host:8080/cube/api/draftpickcard/legacy");
        assert_eq!(notifier.draft_url(), "http://host:8080/cube/api/submitdraft/legacy");
    }

    #[tokio::test]
    async fn disabled_notifier_accepts_everything() {
        let submission = PickSubmission {
            draft_id: "d".into(),
            pick: "Card".into(),
            pack: vec!["Card".into()],
            pack_number: 1,
            pick_number: 1,
        };
        DraftNotifier::Disabled.submit_pick(&submission).await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let http = HttpNotifier::new("http://127.0.0.1:9", "c");
        let submission = PickSubmission {
            draft_id: "d".into(),
            pick: "Card".into(),
            pack: Vec::new(),
            pack_number: 1,
            pick_number: 1,
        };
        let err = http.submit_pick(&submission).await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
