use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use formulaire2086_core::{
    disposals::{DisposalFieldUpdate, DisposalRecord, DisposalSummary},
    report::Form2086Report,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarryInFraction {
    value: f64,
}

async fn list_disposals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<DisposalRecord>>> {
    let records = state.disposal_service.get_disposals()?;
    Ok(Json(records))
}

async fn add_disposal(
    State(state): State<Arc<AppState>>,
    Json(record): Json<DisposalRecord>,
) -> ApiResult<Json<DisposalSummary>> {
    let summary = state.disposal_service.add_disposal(record).await?;
    Ok(Json(summary))
}

async fn replace_disposals(
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<DisposalRecord>>,
) -> ApiResult<Json<DisposalSummary>> {
    let summary = state.disposal_service.replace_disposals(records).await?;
    Ok(Json(summary))
}

async fn update_disposal_field(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<DisposalFieldUpdate>,
) -> ApiResult<Json<DisposalSummary>> {
    let summary = state
        .disposal_service
        .update_disposal_field(index, update)
        .await?;
    Ok(Json(summary))
}

async fn delete_disposal(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DisposalSummary>> {
    let summary = state.disposal_service.delete_disposal(index).await?;
    Ok(Json(summary))
}

async fn get_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<DisposalSummary>> {
    let summary = state.disposal_service.get_summary()?;
    Ok(Json(summary))
}

async fn get_report(State(state): State<Arc<AppState>>) -> ApiResult<Json<Form2086Report>> {
    let report = state.disposal_service.get_report()?;
    Ok(Json(report))
}

async fn get_carry_in_fraction(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CarryInFraction>> {
    let value = state.disposal_service.get_carry_in_fraction()?;
    Ok(Json(CarryInFraction { value }))
}

async fn set_carry_in_fraction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CarryInFraction>,
) -> ApiResult<Json<DisposalSummary>> {
    let summary = state
        .disposal_service
        .set_carry_in_fraction(body.value)
        .await?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/disposals",
            get(list_disposals)
                .post(add_disposal)
                .put(replace_disposals),
        )
        .route("/disposals/summary", get(get_summary))
        .route("/disposals/report", get(get_report))
        .route(
            "/disposals/{index}",
            patch(update_disposal_field).delete(delete_disposal),
        )
        .route(
            "/carry-in-fraction",
            get(get_carry_in_fraction).put(set_carry_in_fraction),
        )
}
