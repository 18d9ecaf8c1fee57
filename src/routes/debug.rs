use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if collaborators are reachable
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    if state.generator.templates_healthy().await {
        status["checks"]["templates"] = json!("ok");
    } else {
        status["checks"]["templates"] = json!({"error": "template directory missing"});
        status["status"] = json!("error");
    }

    if state.generator.graph_provider_healthy().await {
        status["checks"]["graph_provider"] = json!("ok");
    } else {
        status["checks"]["graph_provider"] = json!({"error": "graph source unreachable"});
        status["status"] = json!("error");
    }

    if state.generator.output_healthy().await {
        status["checks"]["output"] = json!("ok");
    } else {
        status["checks"]["output"] = json!({"error": "generated directory missing"});
        status["status"] = json!("degraded");
    }

    let cache = state.generator.graph_cache().stats().await;
    status["checks"]["graph_cache"] = json!({
        "hits": cache.hits,
        "misses": cache.misses,
        "hit_rate": format!("{:.1}%", cache.hit_rate),
        "entries": cache.entries,
    });

    Json(status)
}
