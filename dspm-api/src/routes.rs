//! Router and route handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::debug;

use dspm_engine::{LineageExport, MisconfigurationFinding, PiiFinding, RiskBreakdown, ScanResult};

use crate::error::ApiError;
use crate::state::{AppState, all_providers};

/// Build the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/scan", post(run_scan))
        .route("/misconfigurations", get(list_misconfigurations))
        .route("/sensitive-data", get(list_sensitive_data))
        .route("/lineage", get(get_lineage))
        .route("/risk-score", get(get_risk))
        .route("/healthz", get(healthcheck))
        .with_state(state)
}

async fn run_scan(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ScanResult>, ApiError> {
    let providers = parse_providers(&body)?;
    debug!(providers = ?providers, "scan requested");
    let result = state.scan(&providers).await?;
    Ok(Json(result))
}

async fn list_misconfigurations(
    State(state): State<AppState>,
) -> Result<Json<Vec<MisconfigurationFinding>>, ApiError> {
    let result = state.scan_all().await?;
    Ok(Json(result.misconfigurations))
}

async fn list_sensitive_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<PiiFinding>>, ApiError> {
    let result = state.scan_all().await?;
    Ok(Json(result.pii_findings))
}

async fn get_lineage(State(state): State<AppState>) -> Result<Json<LineageExport>, ApiError> {
    let result = state.scan_all().await?;
    Ok(Json(result.lineage.to_json()))
}

async fn get_risk(State(state): State<AppState>) -> Result<Json<RiskBreakdown>, ApiError> {
    let result = state.scan_all().await?;
    Ok(Json(result.risk))
}

async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// An empty body, `null` or `[]` scans every provider.
fn parse_providers(body: &[u8]) -> Result<Vec<String>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(default_providers());
    }
    let requested: Option<Vec<String>> =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    match requested {
        Some(providers) if !providers.is_empty() => Ok(providers),
        _ => Ok(default_providers()),
    }
}

fn default_providers() -> Vec<String> {
    all_providers().into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_means_all_providers() {
        assert_eq!(parse_providers(b"").unwrap(), vec!["aws", "azure", "gcp"]);
        assert_eq!(parse_providers(b"  \n").unwrap(), vec!["aws", "azure", "gcp"]);
        assert_eq!(parse_providers(b"null").unwrap(), vec!["aws", "azure", "gcp"]);
        assert_eq!(parse_providers(b"[]").unwrap(), vec!["aws", "azure", "gcp"]);
    }

    #[test]
    fn explicit_list_is_kept_verbatim() {
        assert_eq!(
            parse_providers(br#"["GCP", "aws", "gcp"]"#).unwrap(),
            vec!["GCP", "aws", "gcp"]
        );
    }

    #[test]
    fn non_array_body_is_rejected() {
        let err = parse_providers(br#"{"providers": ["aws"]}"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
