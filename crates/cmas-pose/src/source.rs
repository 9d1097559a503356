use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cmas_core::{Frame, LandmarkPayload};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PoseError;

/// Pull interface to the landmark-producing service.
///
/// `poll` returns the most recent frame, or `None` when nothing usable is
/// available right now. It must not fail and must not block indefinitely;
/// the caller simply tries again on its next sample.
pub trait FrameSource: Send {
    fn poll(&mut self) -> impl Future<Output = Option<Frame>> + Send;
}

/// Where to reach the landmark service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    /// Upper bound on one request, connect through body.
    pub request_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/latest-frame".to_string(),
            request_timeout_ms: 1000,
        }
    }
}

/// Polls the landmark service over HTTP.
///
/// Requests run on tokio's blocking pool so the detector loop keeps its
/// cadence; every failure collapses to an absent frame.
#[derive(Clone)]
pub struct HttpFrameSource {
    agent: ureq::Agent,
    url: Arc<str>,
}

impl HttpFrameSource {
    pub fn new(config: &SourceConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_millis(config.request_timeout_ms)))
            .build()
            .into();

        info!(url = %config.url, timeout_ms = config.request_timeout_ms, "landmark source configured");
        Self {
            agent,
            url: Arc::from(config.url.as_str()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FrameSource for HttpFrameSource {
    async fn poll(&mut self) -> Option<Frame> {
        let agent = self.agent.clone();
        let url = Arc::clone(&self.url);

        match tokio::task::spawn_blocking(move || fetch_frame(&agent, &url)).await {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "landmark request task failed");
                None
            }
        }
    }
}

fn fetch_frame(agent: &ureq::Agent, url: &str) -> Option<Frame> {
    let mut response = match agent.get(url).call() {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "landmark request failed");
            return None;
        }
    };

    let body = match response.body_mut().read_to_string() {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, "failed to read landmark response body");
            return None;
        }
    };

    match LandmarkPayload::parse(&body) {
        Ok(payload) => payload.into_frame(),
        Err(e) => {
            warn!(error = %e, "unparsable landmark payload");
            None
        }
    }
}

/// Replays a recorded sequence of samples, one per poll, then reports
/// absence forever.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    samples: VecDeque<Option<Frame>>,
}

impl ReplaySource {
    pub fn new(samples: impl IntoIterator<Item = Option<Frame>>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Parse a JSON-lines recording: one landmark payload per line.
    ///
    /// Blank lines are ignored. `null` and unparsable lines become absent
    /// samples, the same as a failed live request.
    pub fn from_json_lines(text: &str) -> Self {
        let samples = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                let line = line.trim();
                if line == "null" {
                    return None;
                }
                match LandmarkPayload::parse(line) {
                    Ok(payload) => payload.into_frame(),
                    Err(e) => {
                        warn!(line = n + 1, error = %e, "skipping unparsable recorded frame");
                        None
                    }
                }
            });
        Self::new(samples)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, PoseError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        let source = Self::from_json_lines(&text);
        info!(path = %path.display(), samples = source.remaining(), "loaded frame recording");
        Ok(source)
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl FrameSource for ReplaySource {
    async fn poll(&mut self) -> Option<Frame> {
        self.samples.pop_front().flatten()
    }
}
