//! Route handlers. Each one is a thin wrapper over [`PatientService`].
//!
//! Store access is blocking file I/O, so every service call runs on the
//! blocking thread pool.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use patient_records_core::{PatientDraft, PatientService, PatientUpdate, PatientView, ServiceResult};

use crate::error::ApiResult;
use crate::server::AppState;

/// Plain `{"message": ...}` response body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query parameters of `GET /sort`.
#[derive(Debug, Default, Deserialize)]
pub struct SortParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Run a service call off the async runtime.
async fn with_service<T, F>(state: &AppState, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&PatientService) -> ServiceResult<T> + Send + 'static,
{
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || op(&service)).await?;
    Ok(result?)
}

pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new("Patient Management System API"))
}

pub async fn about() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "A fully functional API to manage your patient records",
    ))
}

pub async fn view(State(state): State<Arc<AppState>>) -> ApiResult<Json<IndexMap<String, PatientView>>> {
    let patients = with_service(&state, |service| service.view()).await?;
    Ok(Json(patients))
}

pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<PatientView>> {
    let patient = with_service(&state, move |service| service.get(&patient_id)).await?;
    Ok(Json(patient))
}

pub async fn sort_patients(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SortParams>, QueryRejection>,
) -> ApiResult<Json<Vec<PatientView>>> {
    let Query(params) = params?;
    let sorted = with_service(&state, move |service| {
        service.sort_by_query(params.sort_by.as_deref(), params.order.as_deref())
    })
    .await?;
    Ok(Json(sorted))
}

pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PatientDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(draft) = payload?;
    with_service(&state, move |service| service.create(&draft)).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("patient created successfully")),
    ))
}

pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    payload: Result<Json<PatientUpdate>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(update) = payload?;
    with_service(&state, move |service| service.update(&patient_id, &update)).await?;
    Ok(Json(MessageResponse::new("patient updated")))
}

pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    with_service(&state, move |service| service.delete(&patient_id)).await?;
    Ok(Json(MessageResponse::new("patient deleted")))
}
