use crate::error::Result;
use crate::models::{GenerateRouteRequest, GenerateRouteResponse};
use crate::services::CancelToken;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /routes/generate
/// Fit the named template onto the road network around the start point and
/// return the routed polyline, metrics and guidance.
pub async fn generate_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRouteRequest>,
) -> Result<Json<GenerateRouteResponse>> {
    tracing::info!(
        template = %request.template_name,
        target_km = request.target_km,
        save = request.save_geojson,
        "Route generation request: ({:.4}, {:.4}), {:.1}km",
        request.start_point.lat,
        request.start_point.lng,
        request.target_km
    );

    let cancel = CancelToken::new();
    let data = state.generator.generate(&request, cancel).await?;

    Ok(Json(GenerateRouteResponse { ok: true, data }))
}
