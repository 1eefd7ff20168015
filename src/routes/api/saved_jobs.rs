use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use sqlx::PgPool;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::saved_job::{NewSavedJob, SavedJob};

pub async fn list(
    State(pool): State<PgPool>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<SavedJob>>, AppError> {
    let jobs = SavedJob::list_for_user(&pool, user_id).await?;
    Ok(Json(jobs))
}

/// POST /api/v1/me/jobs
///
/// The owner always comes from the bearer token; the body carries only
/// the job's display fields.
pub async fn create(
    State(pool): State<PgPool>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(input): Json<NewSavedJob>,
) -> Result<(StatusCode, Json<SavedJob>), AppError> {
    let job = SavedJob::create(&pool, user_id, input).await?;
    tracing::info!("User {user_id} saved job {}", job.id);
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn delete(
    State(pool): State<PgPool>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    SavedJob::delete(&pool, user_id, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
