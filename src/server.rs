//! HTTP shell around the classifier
//!
//! One upload endpoint: `POST /classify` takes a multipart image, runs label
//! detection, classifies the labels, and returns the category with disposal
//! instructions. A no-match classification is a normal 200 response; only
//! upstream failures become error responses.

use crate::classifier::{classify, Classification};
use crate::rules::RuleTable;
use crate::vision::{Label, VisionClient};
use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state. The rule table is immutable after startup, so
/// handlers read it without synchronization.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RuleTable>,
    pub vision: Arc<VisionClient>,
}

/// Start the HTTP server.
pub async fn start(listen_addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    log::info!("HTTP server listening on {listen_addr}");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/classify", post(classify_image))
        .layer(cors)
        .with_state(state)
}

/// Success payload for `/classify`. Field names are part of the public
/// contract consumed by the frontend.
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub rawlabels: Vec<String>,
    pub category: String,
    #[serde(rename = "disposalMethod")]
    pub disposal_method: String,
}

impl From<Classification> for ClassifyResponse {
    fn from(result: Classification) -> Self {
        ClassifyResponse {
            rawlabels: result.labels,
            category: result.category,
            disposal_method: result.disposal,
        }
    }
}

/// Request-level failures. Classification itself never errors; these come
/// from the upload or the label-detection collaborator.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to process the image." })),
            )
                .into_response(),
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": "binwise",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "categories": state.table.len(),
    }))
}

async fn classify_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {e}")))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
            image = Some(bytes);
            break;
        }
    }

    let Some(image) = image else {
        return Err(ApiError::BadRequest(
            "missing multipart field 'image'".to_string(),
        ));
    };
    if image.is_empty() {
        return Err(ApiError::BadRequest("empty image upload".to_string()));
    }

    // The upload is spooled to a temp file for the duration of this request.
    // The guard deletes it on every exit path, including the error returns
    // below.
    let spooled = spool_upload(&image).map_err(|e| {
        log::error!("failed to spool upload: {e}");
        ApiError::Internal
    })?;

    let labels = match state.vision.detect_labels(spooled.path()).await {
        Ok(labels) => labels,
        Err(e) => {
            log::error!("label detection failed: {e}");
            return Err(ApiError::Internal);
        }
    };

    let normalized = normalize_labels(&labels);
    let result = classify(&normalized, &state.table);
    log::info!(
        "classified {} label(s) as '{}'",
        normalized.len(),
        result.category
    );

    Ok(Json(ClassifyResponse::from(result)))
}

fn spool_upload(data: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file)
}

/// Lowercase and trim raw label text. The classifier documents this as a
/// caller precondition, and this is the single place it happens.
pub fn normalize_labels(labels: &[Label]) -> Vec<String> {
    labels
        .iter()
        .map(|l| l.text.trim().to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{UNKNOWN_CATEGORY, UNKNOWN_DISPOSAL};

    fn label(text: &str) -> Label {
        Label {
            text: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn normalization_lowercases_and_trims() {
        let labels = vec![label("Plastic Bottle"), label("  Bottle Cap ")];
        assert_eq!(
            normalize_labels(&labels),
            vec!["plastic bottle".to_string(), "bottle cap".to_string()]
        );
    }

    #[test]
    fn response_uses_contract_field_names() {
        let result = Classification {
            category: "plastic_water_bottles".to_string(),
            disposal: "Rinse and recycle.".to_string(),
            labels: vec!["plastic water bottle".to_string()],
        };
        let body = serde_json::to_value(ClassifyResponse::from(result)).unwrap();

        assert_eq!(body["category"], "plastic_water_bottles");
        assert_eq!(body["disposalMethod"], "Rinse and recycle.");
        assert_eq!(body["rawlabels"][0], "plastic water bottle");
    }

    #[test]
    fn unknown_classification_serializes_as_success_shape() {
        let result = Classification {
            category: UNKNOWN_CATEGORY.to_string(),
            disposal: UNKNOWN_DISPOSAL.to_string(),
            labels: vec![],
        };
        let body = serde_json::to_value(ClassifyResponse::from(result)).unwrap();

        assert_eq!(body["category"], "Unknown");
        assert_eq!(body["disposalMethod"], UNKNOWN_DISPOSAL);
        assert!(body.get("error").is_none());
    }

    #[test]
    fn spooled_upload_is_removed_on_drop() {
        let spooled = spool_upload(b"fake image bytes").unwrap();
        let path = spooled.path().to_path_buf();
        assert!(path.exists());
        drop(spooled);
        assert!(!path.exists());
    }
}
