//! Axum route handler for the rating endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::analysis::job_resolver::resolve_job_description;
use crate::analysis::rater::{rate_resume, RatingResult};
use crate::errors::AppError;
use crate::ingestion::extract::extract_text;
use crate::ingestion::session::BytesUpload;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub session_id: String,
    pub analysis_result: RatingResult,
}

/// POST /rater
///
/// Multipart fields: `resume` (PDF file) and `job_description` (text).
/// Pipeline: create session → save PDF → extract text → resolve job
/// description → rate. Strictly sequential; any stage failure surfaces as
/// the uniform 500 response.
pub async fn handle_rate_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RateResponse>, AppError> {
    let (file_name, file_bytes, job_description) = read_multipart(multipart).await?;

    info!(
        file = file_name.as_deref().unwrap_or("<unnamed>"),
        job_description_chars = job_description.len(),
        "Starting resume analysis"
    );

    let session = state.store.create(None)?;

    let mut upload = BytesUpload::new(file_name, file_bytes);
    let saved_path = state.store.save(&mut upload, &session)?;
    info!(session_id = %session.id, path = %saved_path.display(), "Resume saved");

    // pdf-extract is CPU-bound; keep it off the async workers.
    let resume_text = tokio::task::spawn_blocking(move || extract_text(&saved_path))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task panicked: {e}")))??;
    info!(session_id = %session.id, chars = resume_text.len(), "Resume text extracted");

    let job_text = resolve_job_description(&state.llm, &job_description).await?;
    let analysis_result = rate_resume(&state.llm, &resume_text, &job_text).await?;

    info!(
        session_id = %session.id,
        overall_score = analysis_result.overall_score,
        "Analysis completed"
    );

    Ok(Json(RateResponse {
        session_id: session.id,
        analysis_result,
    }))
}

/// Pulls the `resume` file field and `job_description` text field out of the
/// multipart body; both are required.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Option<String>, Bytes, String), AppError> {
    let mut file: Option<(Option<String>, Bytes)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("resume") => {
                let name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume field: {e}")))?;
                file = Some((name, bytes));
            }
            Some("job_description") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job_description field: {e}"))
                })?;
                job_description = Some(text);
            }
            _ => {} // ignore unknown fields
        }
    }

    let (file_name, file_bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'resume' file field".into()))?;
    let job_description = job_description
        .ok_or_else(|| AppError::Validation("Missing 'job_description' form field".into()))?;

    Ok((file_name, file_bytes, job_description))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::{Config, LlmSettings};
    use crate::ingestion::session::SessionStore;
    use crate::llm_client::{LlmClient, ProviderKind};
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "rater-test-boundary";

    /// State backed by a temp session base and a dummy-key LLM client; every
    /// scenario here fails before any LLM call is made.
    fn test_state(base: std::path::PathBuf) -> AppState {
        let config = Config {
            llm_provider: ProviderKind::Google,
            google_api_key: Some("test-key".into()),
            groq_api_key: None,
            data_storage_path: base.clone(),
            llm: LlmSettings::default(),
            session_retention_hours: None,
            port: 8080,
            rust_log: "info".into(),
        };
        AppState {
            llm: LlmClient::from_config(&config).unwrap(),
            store: SessionStore::new(base),
            config,
        }
    }

    /// Builds a multipart POST to /rater. A part with a filename is sent as
    /// a file field, one without as a plain form field.
    fn rater_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, filename, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/rater")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn detail_of(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["detail"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_rater_rejects_non_pdf_upload_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(test_state(tmp.path().to_path_buf()));

        let response = app
            .oneshot(rater_request(&[
                ("resume", Some("resume.docx"), b"not a pdf"),
                ("job_description", None, b"Senior Engineer at Acme"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = detail_of(response).await;
        assert!(detail.starts_with("Resume scoring failed"), "{detail}");

        // The session directory exists but nothing was stored in it.
        let sessions: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0]
            .file_name()
            .to_string_lossy()
            .starts_with("session_"));
        assert_eq!(std::fs::read_dir(sessions[0].path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_rater_requires_resume_field() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(test_state(tmp.path().to_path_buf()));

        let response = app
            .oneshot(rater_request(&[(
                "job_description",
                None,
                b"Senior Engineer at Acme",
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = detail_of(response).await;
        assert!(detail.contains("Resume scoring failed"), "{detail}");
        assert!(detail.contains("resume"), "{detail}");

        // Validation fires before any session is created.
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_rater_requires_job_description_field() {
        let tmp = TempDir::new().unwrap();
        let app = build_router(test_state(tmp.path().to_path_buf()));

        let response = app
            .oneshot(rater_request(&[(
                "resume",
                Some("resume.pdf"),
                b"%PDF-1.4",
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = detail_of(response).await;
        assert!(detail.contains("Resume scoring failed"), "{detail}");
        assert!(detail.contains("job_description"), "{detail}");
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
