use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tracing::{error, info, warn};

use super::pages;
use crate::analysis::client::CompletionClient;
use crate::analysis::template;
use crate::extract;

/// Uploads larger than this are rejected by the HTTP layer before the
/// pipeline runs.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    client: Arc<CompletionClient>,
}

impl AppState {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Binds the listener and serves the upload form until the process exits.
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!("PO analyzer listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .context("HTTP server terminated")?;

    Ok(())
}

async fn index() -> Html<String> {
    Html(pages::index_page())
}

struct Upload {
    filename: String,
    bytes: Bytes,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("document") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await?;
            return Ok(Some(Upload { filename, bytes }));
        }
    }
    Ok(None)
}

/// One upload, one pipeline run: extract text, build the prompt, call the
/// completion endpoint, render the answer. Nothing survives the request.
async fn analyze(State(state): State<AppState>, mut multipart: Multipart) -> Html<String> {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return Html(pages::error_page(
                "No file was uploaded. Choose a PDF or DOCX file and try again.",
            ));
        }
        Err(err) => {
            warn!("Rejected malformed upload: {}", err);
            return Html(pages::error_page(&format!("Upload failed: {}", err)));
        }
    };

    info!(
        "Analyzing uploaded PO file: {} ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );

    let text = extract::extract_text(&upload.bytes, &upload.filename);
    if text.trim().is_empty() {
        return Html(pages::error_page(
            "No readable text found in the uploaded file.",
        ));
    }

    let prompt = template::render(&text, &template::display_label(&upload.filename));

    match state.client.analyze(&prompt).await {
        Ok(markdown) => Html(pages::result_page(&upload.filename, &markdown)),
        Err(err) => {
            error!("Analysis failed for {}: {}", upload.filename, err);
            Html(pages::error_page(&err.to_string()))
        }
    }
}
