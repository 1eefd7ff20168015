use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;

/// A job saved to a user's account. Rows have no life of their own:
/// they are always read and written through the owning user.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SavedJob {
    pub id: i32,
    pub user_id: i32,
    pub job_id: Option<String>,
    pub name: String,
    pub company: String,
    pub category: String,
    pub level: String,
    pub location: String,
    pub link: Option<String>,
    pub saved_at: DateTime<Utc>,
}

/// Body of a save request. Required fields default to empty so that a
/// missing field is reported by [`NewSavedJob::validate`] like a blank one.
#[derive(Debug, Default, Deserialize)]
pub struct NewSavedJob {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub link: Option<String>,
}

impl NewSavedJob {
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("name", &self.name),
            ("company", &self.company),
            ("category", &self.category),
            ("level", &self.level),
            ("location", &self.location),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SavedJob {
    pub async fn list_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<SavedJob>, AppError> {
        let jobs = sqlx::query_as::<_, SavedJob>(
            "SELECT * FROM saved_jobs WHERE user_id = $1 ORDER BY saved_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(jobs)
    }

    /// Attach a job to the user's record. A second save of the same
    /// `job_id` trips the unique index and surfaces as a conflict.
    pub async fn create(
        pool: &PgPool,
        user_id: i32,
        input: NewSavedJob,
    ) -> Result<SavedJob, AppError> {
        input.validate()?;
        let job = sqlx::query_as::<_, SavedJob>(
            "INSERT INTO saved_jobs (user_id, job_id, name, company, category, level, location, link) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(user_id)
        .bind(non_blank(&input.job_id))
        .bind(input.name.trim())
        .bind(input.company.trim())
        .bind(input.category.trim())
        .bind(input.level.trim())
        .bind(input.location.trim())
        .bind(non_blank(&input.link))
        .fetch_one(pool)
        .await?;
        Ok(job)
    }

    pub async fn delete(pool: &PgPool, user_id: i32, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Saved job {id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NewSavedJob {
        NewSavedJob {
            job_id: Some("42".into()),
            name: "Engineer".into(),
            company: "Acme".into(),
            category: "Software".into(),
            level: "Senior".into(),
            location: "Remote".into(),
            link: Some("http://x".into()),
        }
    }

    #[test]
    fn complete_record_is_valid() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let input = NewSavedJob {
            job_id: None,
            link: None,
            ..complete()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn blank_required_fields_are_listed() {
        let input = NewSavedJob {
            company: "   ".into(),
            level: String::new(),
            ..complete()
        };
        match input.validate() {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "missing required fields: company, level");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_fields_deserialize_as_blank() {
        let input: NewSavedJob = serde_json::from_str(r#"{"name":"Engineer"}"#).unwrap();
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("company, category, level, location"));
    }

    #[test]
    fn blank_optionals_are_stored_as_null() {
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&Some(" 42 ".into())), Some("42"));
        assert_eq!(non_blank(&None), None);
    }
}
