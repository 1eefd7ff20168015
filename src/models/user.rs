use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::{generate_token, hash_token};
use crate::error::AppError;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A freshly issued token. The raw value is only ever returned here.
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub id: i32,
    pub token: String,
}

impl User {
    pub async fn get(pool: &PgPool, id: i32) -> Result<User, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    pub async fn create(pool: &PgPool, username: &str) -> Result<User, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("username is required".to_string()));
        }
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username) VALUES ($1) RETURNING *",
        )
        .bind(username)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    pub async fn issue_token(
        pool: &PgPool,
        user_id: i32,
        name: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<IssuedToken, AppError> {
        let raw_token = generate_token();
        let row: (i32,) = sqlx::query_as(
            "INSERT INTO api_tokens (user_id, name, token_hash, expires_at) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(user_id)
        .bind(name)
        .bind(hash_token(&raw_token))
        .bind(expires_at)
        .fetch_one(pool)
        .await?;
        Ok(IssuedToken {
            id: row.0,
            token: raw_token,
        })
    }
}
