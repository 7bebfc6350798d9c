use crate::{
    error::ApiResult,
    models::{Case, CreateCaseRequest, HealthResponse, UpdateCaseRequest},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::info;

/// Unwraps a JSON body, treating a request without a JSON content type as an
/// empty object. Syntax and data errors are still rejected.
fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Handler for GET /cases - returns every case in insertion order
pub async fn list_cases(State(state): State<AppState>) -> ApiResult<Json<Vec<Case>>> {
    let cases = state.cases.list().await?;
    Ok(Json(cases))
}

/// Handler for GET /cases/:id
pub async fn get_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResult<Json<Case>> {
    let case = state.cases.get(&case_id).await?;
    Ok(Json(case))
}

/// Handler for POST /cases
pub async fn create_case(
    State(state): State<AppState>,
    body: Result<Json<CreateCaseRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Case>)> {
    let request = body_or_default(body)?;
    let case = state.cases.create(request).await?;

    info!(case_id = %case.id, "case created");
    Ok((StatusCode::CREATED, Json(case)))
}

/// Handler for PUT /cases/:id - partial update
pub async fn update_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    body: Result<Json<UpdateCaseRequest>, JsonRejection>,
) -> ApiResult<Json<Case>> {
    let request = body_or_default(body)?;
    let case = state.cases.update(&case_id, request).await?;

    info!(case_id = %case.id, status = %case.status, "case updated");
    Ok(Json(case))
}

/// Handler for DELETE /cases/:id
pub async fn delete_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.cases.delete(&case_id).await?;

    info!(case_id = %case_id, "case deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}
