use crate::error::{AppError, Result};
use crate::geometry::LocalProjection;
use crate::graph::GraphCache;
use crate::models::{
    FeatureCollection, GenerateRouteRequest, RouteData, RouteMetrics, RouteProperties,
};
use crate::output::OutputSink;
use crate::services::guidance::build_guidance;
use crate::services::scaling::fit_to_target;
use crate::services::CancelToken;
use crate::template::{self, TemplateStore};
use std::sync::Arc;

/// End-to-end route generation: template -> placement/fit -> guidance ->
/// assembled response payload. One instance is shared across requests; all
/// per-request state lives on the stack.
pub struct RouteGenerator {
    templates: Arc<dyn TemplateStore>,
    graphs: Arc<GraphCache>,
    output: Arc<dyn OutputSink>,
}

impl RouteGenerator {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        graphs: Arc<GraphCache>,
        output: Arc<dyn OutputSink>,
    ) -> Self {
        RouteGenerator {
            templates,
            graphs,
            output,
        }
    }

    pub async fn generate(
        &self,
        request: &GenerateRouteRequest,
        cancel: CancelToken,
    ) -> Result<RouteData> {
        request.validate().map_err(AppError::BadRequest)?;
        let opts = &request.options;

        tracing::info!(
            template = %request.template_name,
            lat = request.start_point.lat,
            lng = request.start_point.lng,
            target_km = request.target_km,
            "Generating route"
        );

        let source = self.templates.load(&request.template_name).await?;
        let unit = template::load_template(&source, opts)?;
        tracing::debug!(points = unit.len(), "Template loaded");

        let graph = self
            .graphs
            .get(request.start_point, opts.graph_radius_m)
            .await?;
        let projection = LocalProjection::new(request.start_point);

        let fit = fit_to_target(
            &graph,
            &projection,
            &unit,
            &request.start_point,
            opts,
            request.target_km,
            &cancel,
        )?;
        tracing::info!(
            scale_used = fit.scale_used,
            matched = fit.matched,
            route_length_m = fit.routed.length_m,
            nodes = fit.routed.nodes.len(),
            "Distance fit finished"
        );

        let guidance = build_guidance(&fit.routed.coords, &projection, opts.min_wp_gap_m);

        let align_mode = if opts.use_anchors { "anchors" } else { "shape" };
        let geojson = FeatureCollection::line_string(
            &fit.routed.coords,
            RouteProperties {
                template: request.template_name.clone(),
                align_mode: align_mode.to_string(),
                matched: fit.matched,
                scale_used: fit.scale_used,
                name: format!("Template route ~{:.1}km", request.target_km),
            },
        );

        let saved = if request.save_geojson {
            Some(self.output.save_geojson(&geojson).await?)
        } else {
            None
        };

        Ok(RouteData {
            metrics: RouteMetrics {
                nodes: fit.routed.nodes.len(),
                route_length_m: fit.routed.length_m,
                target_km: request.target_km,
            },
            geojson,
            guidance,
            saved,
        })
    }

    pub async fn templates_healthy(&self) -> bool {
        self.templates.health_check().await
    }

    pub async fn graph_provider_healthy(&self) -> bool {
        self.graphs.provider_healthy().await
    }

    pub async fn output_healthy(&self) -> bool {
        self.output.health_check().await
    }

    pub fn graph_cache(&self) -> &GraphCache {
        &self.graphs
    }
}
