// ABOUTME: Read-only HTTP handlers over enrolled students
// ABOUTME: Listing with an optional class filter plus lookup by id

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StudentFilter {
    pub class: Option<String>,
}

/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilter>,
) -> Result<impl IntoResponse, AppError> {
    let students = state.students.list_students(filter.class.as_deref()).await?;
    Ok(Json(ApiResponse::success(students)))
}

/// GET /api/students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.students.get_student(&id).await?;
    Ok(Json(ApiResponse::success(student)))
}
