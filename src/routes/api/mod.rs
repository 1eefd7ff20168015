pub mod me;
pub mod saved_jobs;

use axum::Router;
use axum::middleware;
use axum::routing::{delete, get};
use sqlx::PgPool;

use crate::auth::require_user;

pub fn router(pool: PgPool) -> Router {
    let protected = Router::new()
        .route("/me", get(me::get))
        .route(
            "/me/jobs",
            get(saved_jobs::list).post(saved_jobs::create),
        )
        .route("/me/jobs/{id}", delete(saved_jobs::delete))
        .layer(middleware::from_fn_with_state(pool.clone(), require_user))
        .with_state(pool);

    Router::new().nest("/api/v1", protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://jobsearch@localhost/unused")
            .unwrap();
        router(pool)
    }

    #[tokio::test]
    async fn profile_requires_token() {
        let resp = app()
            .oneshot(Request::get("/api/v1/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn save_without_token_is_rejected_before_body_is_read() {
        let resp = app()
            .oneshot(
                Request::post("/api/v1/me/jobs")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Engineer"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let resp = app()
            .oneshot(
                Request::delete("/api/v1/me/jobs/1")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    mod with_database {
        use super::*;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;
        use serde_json::{Value, json};
        use uuid::Uuid;

        use crate::models::user::User;

        async fn pool() -> PgPool {
            let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
            let pool = crate::db::create_pool(&url).await.expect("pool");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("migrations");
            pool
        }

        async fn user_token(pool: &PgPool) -> String {
            let user = User::create(pool, &format!("user-{}", Uuid::new_v4()))
                .await
                .expect("create user");
            User::issue_token(pool, user.id, "test", None)
                .await
                .expect("issue token")
                .token
        }

        async fn body_json(resp: axum::response::Response) -> Value {
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            serde_json::from_slice(&bytes).unwrap()
        }

        fn save(token: &str, job_id: &str) -> Request<Body> {
            let body = json!({
                "job_id": job_id,
                "name": "Engineer",
                "company": "Acme",
                "category": "Software",
                "level": "Senior",
                "location": "Remote",
                "link": "http://jobs.example/1"
            });
            Request::post("/api/v1/me/jobs")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        }

        fn remove(token: &str, id: i64) -> Request<Body> {
            Request::delete(format!("/api/v1/me/jobs/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap()
        }

        #[tokio::test]
        #[ignore = "needs a Postgres database in DATABASE_URL"]
        async fn repeat_save_conflicts_and_delete_is_owner_scoped() {
            let pool = pool().await;
            let owner = user_token(&pool).await;
            let other = user_token(&pool).await;
            let app = router(pool);
            let job_id = Uuid::new_v4().to_string();

            let resp = app.clone().oneshot(save(&owner, &job_id)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
            let saved = body_json(resp).await;
            assert_eq!(saved["job_id"], job_id.as_str());
            let id = saved["id"].as_i64().unwrap();

            let resp = app.clone().oneshot(save(&owner, &job_id)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::CONFLICT);
            assert_eq!(body_json(resp).await["error"], "Job already saved");

            let resp = app.clone().oneshot(save(&other, &job_id)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);

            let resp = app.clone().oneshot(remove(&other, id)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);

            let resp = app.clone().oneshot(remove(&owner, id)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(body_json(resp).await, json!({ "deleted": true }));

            let resp = app.oneshot(save(&owner, &job_id)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        #[tokio::test]
        #[ignore = "needs a Postgres database in DATABASE_URL"]
        async fn duplicate_username_is_a_generic_conflict() {
            let pool = pool().await;
            let username = format!("user-{}", Uuid::new_v4());
            User::create(&pool, &username).await.expect("create user");

            let err = User::create(&pool, &username).await.unwrap_err();
            let resp = err.into_response();
            assert_eq!(resp.status(), StatusCode::CONFLICT);
            assert_eq!(body_json(resp).await["error"], "Resource already exists");
        }
    }
}
