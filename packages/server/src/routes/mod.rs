use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

/// JSON API, mounted under `/api`.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/shipments", shipment_routes())
        .routes(routes!(handlers::health::health))
}

/// Static label artifacts, mounted under `/labels`.
pub fn label_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::label::download_label))
}

fn shipment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::shipment::create_shipment,
            handlers::shipment::list_shipments
        ))
        .routes(routes!(handlers::shipment::merge_recent))
}
