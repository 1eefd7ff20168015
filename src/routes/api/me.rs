use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::saved_job::SavedJob;
use crate::models::user::User;

#[derive(Debug, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub saved_jobs: Vec<SavedJob>,
    pub saved_job_count: usize,
}

/// GET /api/v1/me
pub async fn get(
    State(pool): State<PgPool>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Profile>, AppError> {
    let user = User::get(&pool, user_id).await?;
    let saved_jobs = SavedJob::list_for_user(&pool, user_id).await?;
    Ok(Json(Profile {
        user,
        saved_job_count: saved_jobs.len(),
        saved_jobs,
    }))
}
