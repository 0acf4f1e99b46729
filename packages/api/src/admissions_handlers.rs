// ABOUTME: HTTP handlers for the admission application lifecycle
// ABOUTME: Submission, listing, approval into a student record, and rejection

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use schoolgate_core::{
    AdmissionApplication, AdmissionCreateInput, AdmissionFilter, ApplicationStatus, Student,
};

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub message: String,
    pub student: Student,
    pub admission: AdmissionApplication,
    pub roll_number: String,
    pub admission_number: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
    pub interview_date: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
}

/// POST /api/admissions - public submission endpoint
pub async fn create_admission(
    State(state): State<AppState>,
    Json(input): Json<AdmissionCreateInput>,
) -> Result<impl IntoResponse, AppError> {
    let application = state.admissions.create_application(input).await?;
    info!(
        application_id = %application.id,
        application_number = %application.application_number,
        "Admission application submitted"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(application)),
    ))
}

/// GET /api/admissions - list with optional search/status/class filters
pub async fn list_admissions(
    State(state): State<AppState>,
    Query(filter): Query<AdmissionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let applications = state.admissions.list_applications(&filter).await?;
    Ok(Json(ApiResponse::success(applications)))
}

/// GET /api/admissions/{id}
pub async fn get_admission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let application = state.admissions.get_application(&id).await?;
    Ok(Json(ApiResponse::success(application)))
}

/// POST /api/admissions/{id}/approve - enroll the applicant as a student
pub async fn approve_admission(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (student, admission) = state.admissions.approve_application(&id).await?;
    info!(
        application_id = %id,
        student_id = %student.id,
        roll_number = %student.roll_number,
        approved_by = %claims.username,
        "Admission approved and student enrolled"
    );
    let roll_number = student.roll_number.clone();
    let admission_number = student.admission_number.clone();
    Ok(Json(ApiResponse::success(ApproveResponse {
        message: "Application approved and student enrolled".to_string(),
        student,
        admission,
        roll_number,
        admission_number,
    })))
}

/// PUT /api/admissions/{id}/status - move between intermediate review states
pub async fn update_admission_status(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let application = state
        .admissions
        .update_status(&id, body.status, body.interview_date, body.remarks)
        .await?;
    info!(
        application_id = %id,
        status = ?application.status,
        updated_by = %claims.username,
        "Admission status updated"
    );
    Ok(Json(ApiResponse::success(application)))
}

/// POST /api/admissions/{id}/reject
pub async fn reject_admission(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<RejectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let application = state
        .admissions
        .reject_application(&id, body.remarks)
        .await?;
    info!(
        application_id = %id,
        rejected_by = %claims.username,
        "Admission application rejected"
    );
    Ok(Json(ApiResponse::success(application)))
}
