use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shipment::{CreateShipmentRequest, ShipmentResponse};
use crate::state::AppState;
use crate::utils::filename::content_disposition_value;

#[utoipa::path(
    post,
    path = "/",
    tag = "Shipments",
    operation_id = "createShipment",
    summary = "Create a shipment",
    description = "Persists a shipment and returns it immediately. The label PDF is generated \
        in the background; `labelReference` is absent from this response and appears on the \
        record once the label has been written.",
    request_body = CreateShipmentRequest,
    responses(
        (status = 200, description = "Shipment created", body = ShipmentResponse),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_shipment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateShipmentRequest>,
) -> Result<Json<ShipmentResponse>, AppError> {
    let shipment = state.store.insert(payload).await?;
    info!(shipment_id = %shipment.id, "Shipment created");

    // Detached: the response does not wait for the label.
    state.pipeline.submit(shipment.clone());

    Ok(Json(ShipmentResponse::from(shipment)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Shipments",
    operation_id = "listShipments",
    summary = "List recent shipments",
    description = "Returns the most recent shipments, newest first, bounded by the configured \
        list limit. Records whose label is still being generated have no `labelReference`.",
    responses(
        (status = 200, description = "Recent shipments", body = Vec<ShipmentResponse>),
        (status = 500, description = "Persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_shipments(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShipmentResponse>>, AppError> {
    let shipments = state
        .store
        .list_recent(state.config.shipments.limit())
        .await?;

    Ok(Json(
        shipments.into_iter().map(ShipmentResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/merge-recent",
    tag = "Shipments",
    operation_id = "mergeRecentLabels",
    summary = "Merge and download recent labels",
    description = "Merges the most recent label PDFs into one document, stores it under the \
        fixed merged name and returns it as an attachment.",
    responses(
        (status = 200, description = "Merged label PDF (application/pdf)"),
        (status = 400, description = "No labels to merge (NO_DOCUMENTS)", body = ErrorBody),
        (status = 500, description = "Merge failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn merge_recent(State(state): State<AppState>) -> Result<Response, AppError> {
    let merged = state
        .merger
        .merge_recent(state.config.labels.merge_window)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, merged.bytes.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value("attachment", &merged.name),
        )
        .body(Body::from(merged.bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
