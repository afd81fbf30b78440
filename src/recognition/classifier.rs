use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ClassifierConfig;

/// Turns image bytes into a food label. `Ok(None)` means nothing was recognised.
#[async_trait]
pub trait FoodClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> anyhow::Result<Option<String>>;
}

/// Hosted inference endpoint (object detection model) reached with a bearer token.
pub struct HuggingFaceClassifier {
    client: Client,
    url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct Detection {
    label: String,
    #[serde(default)]
    score: f64,
}

impl HuggingFaceClassifier {
    pub fn new(url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build classifier http client")?;
        Ok(Self {
            client,
            url: url.into(),
            token: token.into(),
        })
    }

    /// `None` when no token is configured.
    pub fn from_config(cfg: &ClassifierConfig) -> anyhow::Result<Option<Self>> {
        match &cfg.token {
            Some(token) => Ok(Some(Self::new(
                cfg.url.clone(),
                token.clone(),
                Duration::from_secs(cfg.timeout_secs),
            )?)),
            None => Ok(None),
        }
    }
}

/// Highest-scoring label of a detection list.
fn best_label(detections: Vec<Detection>) -> Option<String> {
    detections
        .into_iter()
        .filter(|d| !d.label.trim().is_empty())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|d| d.label)
}

#[async_trait]
impl FoodClassifier for HuggingFaceClassifier {
    async fn classify(&self, image: &[u8]) -> anyhow::Result<Option<String>> {
        let body = json!({ "inputs": STANDARD.encode(image) });
        let detections: Vec<Detection> = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("classifier request")?
            .error_for_status()
            .context("classifier status")?
            .json()
            .await
            .context("classifier response body")?;

        debug!(count = detections.len(), "classifier detections");
        Ok(best_label(detections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Vec<Detection> {
        serde_json::from_str(raw).expect("valid detections")
    }

    #[test]
    fn picks_highest_score() {
        let d = parse(
            r#"[{"score":0.41,"label":"dining table","box":{}},
                {"score":0.97,"label":"banana","box":{}},
                {"score":0.62,"label":"bowl"}]"#,
        );
        assert_eq!(best_label(d).as_deref(), Some("banana"));
    }

    #[test]
    fn empty_detections_have_no_label() {
        assert_eq!(best_label(parse("[]")), None);
    }

    #[test]
    fn blank_labels_are_skipped() {
        let d = parse(r#"[{"score":0.9,"label":"  "},{"score":0.1,"label":"pizza"}]"#);
        assert_eq!(best_label(d).as_deref(), Some("pizza"));
    }

    #[test]
    fn no_token_means_no_client() {
        let cfg = ClassifierConfig {
            token: None,
            url: "http://localhost".into(),
            timeout_secs: 1,
        };
        assert!(HuggingFaceClassifier::from_config(&cfg).unwrap().is_none());
    }
}
