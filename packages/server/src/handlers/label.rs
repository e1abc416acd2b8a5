use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use crate::utils::filename::{content_disposition_value, validate_flat_filename};

#[utoipa::path(
    get,
    path = "/{filename}",
    tag = "Labels",
    operation_id = "downloadLabel",
    summary = "Download a label artifact",
    description = "Streams a generated label or the merged label document.",
    params(("filename" = String, Path, description = "Artifact file name, e.g. `label-<id>.pdf`")),
    responses(
        (status = 200, description = "Artifact content"),
        (status = 400, description = "Invalid file name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "No such artifact (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_label(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let filename =
        validate_flat_filename(&filename).map_err(|e| AppError::Validation(e.message().into()))?;

    let reader = state.labels.get_stream(filename).await?;
    let body = Body::from_stream(ReaderStream::new(reader));
    let content_type = mime_guess::from_path(filename).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value("inline", filename),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
