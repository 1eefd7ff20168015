mod auth;
mod client;
mod config;
mod db;
mod error;
mod models;
mod routes;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::client::browse::{BrowseSession, render_results};
use crate::client::session::TokenSession;
use crate::config::{ClientArgs, Command, Config, DatabaseArgs};
use crate::models::user::User;

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(pool: PgPool) -> impl IntoResponse {
    let result: Result<(i32,), _> = sqlx::query_as("SELECT 1").fetch_one(&pool).await;
    match result {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready"),
    }
}

async fn connect(database: &DatabaseArgs) -> anyhow::Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database.database_url).await?;

    if database.run_migrations {
        tracing::info!("Running database migrations...");
        db::run_migrations(&pool).await?;
        tracing::info!("Migrations complete");
    }
    Ok(pool)
}

async fn serve(database: &DatabaseArgs, listen_addr: &str) -> anyhow::Result<()> {
    let pool = connect(database).await?;

    let readyz_pool = pool.clone();
    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(move || readyz(readyz_pool.clone())))
        .merge(routes::api::router(pool))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("Listening on {listen_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn create_user(
    database: &DatabaseArgs,
    username: &str,
    token_name: &str,
) -> anyhow::Result<()> {
    let pool = connect(database).await?;
    let user = User::create(&pool, username).await?;
    let issued = User::issue_token(&pool, user.id, token_name, None).await?;
    tracing::info!("Created user {} ({})", user.username, user.id);
    println!("{}", issued.token);
    Ok(())
}

async fn search_once(args: &ClientArgs, query: &str, json: bool) -> anyhow::Result<()> {
    let session = BrowseSession::from_args(args)?;
    let mut view = session.mount();
    if let Err(e) = session.search_controller().search(&mut view, query).await {
        session.unmount(view);
        return Err(e.into());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(view.results())?);
    } else {
        let auth = TokenSession::new(args.token.clone());
        print!("{}", render_results(&view, &auth));
    }
    session.unmount(view);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobsearch=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    match config.command {
        Command::Serve {
            database,
            listen_addr,
        } => serve(&database, &listen_addr).await,
        Command::CreateUser {
            database,
            username,
            token_name,
        } => create_user(&database, &username, &token_name).await,
        Command::Search {
            client,
            query,
            json,
        } => search_once(&client, &query, json).await,
        Command::Browse { client } => BrowseSession::from_args(&client)?.run().await,
    }
}
