use std::collections::BTreeMap;
use std::sync::Arc;
use axum::{extract::Path, routing::post, Router, Json};
use axum::http::StatusCode;
use tower_http::cors::{CorsLayer, Any};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::engine::evaluate;
use crate::error::AtmoError;
use crate::pipeline::{AirQualityPayload, Assessment, Pipeline};

#[derive(Deserialize)]
pub struct EvaluateRequest {
    pub inputs: BTreeMap<String, f64>,
}

#[derive(Serialize)]
pub struct EvaluateResponse {
    pub engine: String,
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);
    let for_assess = Arc::clone(&pipeline);
    let for_evaluate = pipeline;
    Router::new()
        .route("/v1/assess", post(move |Json(payload): Json<AirQualityPayload>| {
            let pipeline = Arc::clone(&for_assess);
            async move {
                // inference is synchronous CPU work, keep it off the async workers
                let started = std::time::Instant::now();
                let assessment = tokio::task::spawn_blocking(move || pipeline.assess(&payload))
                    .await
                    .map_err(|e| {
                        warn!(error=%e, "Join error");
                        (StatusCode::INTERNAL_SERVER_ERROR, "Join error")
                    })?;
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                info!(
                    ms = elapsed_ms,
                    aqi = ?assessment.final_aqi(),
                    forecast = ?assessment.forecast_risk(),
                    "assessment complete"
                );
                Ok::<Json<Assessment>, (StatusCode, &'static str)>(Json(assessment))
            }
        }))
        .route("/v1/engines/:name/evaluate", post(move |Path(name): Path<String>, Json(req): Json<EvaluateRequest>| {
            let pipeline = Arc::clone(&for_evaluate);
            async move {
                let started = std::time::Instant::now();
                let engine_name = name.clone();
                let result = tokio::task::spawn_blocking(move || {
                    pipeline
                        .engine(&engine_name)
                        .map(|engine| evaluate(engine, &req.inputs))
                })
                .await
                .map_err(|e| {
                    warn!(error=%e, "Join error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Join error")
                })?;
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                let (status, outputs, error) = match result {
                    None => (StatusCode::NOT_FOUND, None, Some(format!("unknown engine '{name}'"))),
                    Some(Ok(outputs)) => {
                        info!(engine=%name, ms=elapsed_ms, "evaluation complete");
                        (StatusCode::OK, Some(outputs), None)
                    }
                    Some(Err(e)) => {
                        let code = status_for(&e);
                        warn!(engine=%name, error=%e, code=%code.as_u16(), "evaluation error");
                        (code, None, Some(e.to_string()))
                    }
                };
                let body = EvaluateResponse {
                    engine: name,
                    status: if error.is_none() { "ok".into() } else { "error".into() },
                    elapsed_ms,
                    outputs,
                    error,
                };
                Ok::<_, (StatusCode, &'static str)>((status, Json(body)))
            }
        }))
        .layer(cors)
}

fn status_for(error: &AtmoError) -> StatusCode {
    match error {
        AtmoError::IncompleteInput { .. }
        | AtmoError::InvalidInput { .. }
        | AtmoError::UndefinedDefuzzification { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
