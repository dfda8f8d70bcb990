//! Google Cloud Vision label-detection client
//!
//! The only external collaborator of the classifier: given image bytes,
//! return descriptive text labels. Uses the `images:annotate` REST endpoint
//! with an API key. Any failure here is `Error::LabelDetection` and fails
//! the request; it is never downgraded to an "Unknown" classification.

use crate::config::VisionConfig;
use crate::error::{Error, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// One label returned by the vision service, with its confidence score.
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub score: f32,
}

pub struct VisionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: u32,
}

impl VisionClient {
    pub fn new(config: &VisionConfig, api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::LabelDetection(e.to_string()))?;

        Ok(VisionClient {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key,
            max_results: config.max_results,
        })
    }

    /// Run label detection on the image stored at `path`.
    pub async fn detect_labels(&self, path: &Path) -> Result<Vec<Label>> {
        let image = tokio::fs::read(path).await?;
        self.detect_labels_bytes(&image).await
    }

    /// Run label detection on in-memory image bytes.
    pub async fn detect_labels_bytes(&self, image: &[u8]) -> Result<Vec<Label>> {
        let body = serde_json::json!({
            "requests": [{
                "image": { "content": general_purpose::STANDARD.encode(image) },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": self.max_results }],
            }]
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::LabelDetection(format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::LabelDetection(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Error::LabelDetection(format!(
                "label service returned HTTP {status}: {text}"
            )));
        }

        parse_annotate_response(&text)
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    message: String,
}

fn parse_annotate_response(body: &str) -> Result<Vec<Label>> {
    let parsed: AnnotateResponse = serde_json::from_str(body)
        .map_err(|e| Error::LabelDetection(format!("unexpected response format: {e}")))?;

    let image_response = parsed
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| Error::LabelDetection("empty annotate response".to_string()))?;

    // Per-image errors come back inside a 200 response.
    if let Some(status) = image_response.error {
        return Err(Error::LabelDetection(format!(
            "annotation error {}: {}",
            status.code, status.message
        )));
    }

    let labels = image_response
        .label_annotations
        .into_iter()
        .map(|a| Label {
            text: a.description,
            score: a.score,
        })
        .collect::<Vec<_>>();

    log::debug!("label detection returned {} label(s)", labels.len());
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_annotations() {
        let body = r#"{
            "responses": [{
                "labelAnnotations": [
                    { "mid": "/m/01", "description": "Plastic bottle", "score": 0.97, "topicality": 0.97 },
                    { "mid": "/m/02", "description": "Bottle cap", "score": 0.88, "topicality": 0.88 }
                ]
            }]
        }"#;

        let labels = parse_annotate_response(body).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "Plastic bottle");
        assert!(labels[0].score > 0.9);
    }

    #[test]
    fn no_annotations_is_an_empty_label_set() {
        // Vision omits labelAnnotations entirely when it finds nothing.
        let labels = parse_annotate_response(r#"{ "responses": [{}] }"#).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn per_image_error_is_a_detection_failure() {
        let body = r#"{
            "responses": [{
                "error": { "code": 3, "message": "Bad image data." }
            }]
        }"#;

        match parse_annotate_response(body) {
            Err(Error::LabelDetection(msg)) => assert!(msg.contains("Bad image data")),
            other => panic!("expected LabelDetection error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_a_detection_failure() {
        assert!(matches!(
            parse_annotate_response("not json"),
            Err(Error::LabelDetection(_))
        ));
    }
}
