//! HTTP upload surface: one page, one form-submission endpoint.
//!
//! POST / takes the two uploads as multipart fields, runs a batch in a
//! per-request temp directory and answers with the ZIP as an
//! attachment. Missing uploads are a plain 400; an internal failure is
//! reported inline on the page (status 200), matching the clerical
//! workflow this replaces where the browser stays on the form.

use std::path::Path;

use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use chartfill_core::error::FillError;

const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

const UPLOAD_PAGE_HTML: &str = r#"<!doctype html>
<html>
<head><title>chartfill</title></head>
<body>
  <h2>Batch-fill intake forms</h2>
  <form method="post" enctype="multipart/form-data">
    <p>Appointment data (CSV/XLS/XLSX): <input type="file" name="data_file"></p>
    <p>Blank form template (PDF): <input type="file" name="pdf_template"></p>
    <p><button type="submit">Generate forms</button></p>
  </form>
</body>
</html>
"#;

pub fn run(port: u16) -> Result<(), FillError> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(port))
}

async fn serve(port: u16) -> Result<(), FillError> {
    let app = Router::new()
        .route("/", get(upload_page).post(handle_fill))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "chartfill upload server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

async fn handle_fill(mut multipart: Multipart) -> Response {
    let mut data_file: Option<(String, Vec<u8>)> = None;
    let mut template: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "data_file" => {
                let filename = field.file_name().unwrap_or("data.csv").to_string();
                match field.bytes().await {
                    Ok(bytes) if !bytes.is_empty() => data_file = Some((filename, bytes.to_vec())),
                    Ok(_) => {}
                    Err(e) => return upload_read_error(e),
                }
            }
            "pdf_template" => match field.bytes().await {
                Ok(bytes) if !bytes.is_empty() => template = Some(bytes.to_vec()),
                Ok(_) => {}
                Err(e) => return upload_read_error(e),
            },
            _ => {}
        }
    }

    let (Some((data_name, data_bytes)), Some(template_bytes)) = (data_file, template) else {
        return (
            StatusCode::BAD_REQUEST,
            "Missing files. Please upload both a data file and a PDF template.",
        )
            .into_response();
    };

    let extension = Path::new(&data_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string();

    let result = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, FillError> {
        let workdir = tempfile::tempdir()?;
        let (summary, archive) = chartfill_core::fill_batch_to_archive(
            &data_bytes,
            &extension,
            &template_bytes,
            &workdir.path().join("output"),
        )?;
        tracing::info!(records = summary.record_count, "batch served");
        Ok(archive)
    })
    .await;

    match result {
        Ok(Ok(archive)) => (
            [
                (header::CONTENT_TYPE, "application/zip"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"filled_forms.zip\"",
                ),
            ],
            archive,
        )
            .into_response(),
        Ok(Err(e)) => inline_error(&e.to_string()),
        Err(e) => inline_error(&e.to_string()),
    }
}

fn upload_read_error(e: axum::extract::multipart::MultipartError) -> Response {
    tracing::warn!("failed to read upload: {e}");
    (StatusCode::BAD_REQUEST, "Failed to read uploaded file data.").into_response()
}

/// Internal failures come back on the page itself rather than as an
/// HTTP error, visually marked so the clerk knows the batch did not run.
fn inline_error(message: &str) -> Response {
    tracing::warn!("batch failed: {message}");
    Html(format!(
        "<h3 style=\"color:red;\">Error: {}</h3>",
        html_escape(message)
    ))
    .into_response()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
