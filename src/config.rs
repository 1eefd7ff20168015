use std::path::PathBuf;

use clap::Parser;

use crate::client::muse::DEFAULT_API_URL;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobsearch", about = "Search job listings and save them to your account")]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the saved-jobs backend
    Serve {
        #[command(flatten)]
        database: DatabaseArgs,

        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,
    },
    /// Create a user and print an API token for it
    CreateUser {
        #[command(flatten)]
        database: DatabaseArgs,

        /// Unique user name
        #[arg(long)]
        username: String,

        /// Label stored with the token
        #[arg(long, default_value = "cli")]
        token_name: String,
    },
    /// Run a single search and print the results
    Search {
        #[command(flatten)]
        client: ClientArgs,

        /// Free-text search
        query: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: search, then save jobs to your account
    Browse {
        #[command(flatten)]
        client: ClientArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Run database migrations on startup
    #[arg(long, env = "RUN_MIGRATIONS", default_value = "true")]
    pub run_migrations: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ClientArgs {
    /// Job listing API endpoint
    #[arg(long, env = "JOB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Optional API key for the listing API
    #[arg(long, env = "JOB_API_KEY")]
    pub api_key: Option<String>,

    /// Base URL of the saved-jobs backend
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8080")]
    pub backend_url: String,

    /// API token issued by `create-user`; without it jobs cannot be saved
    #[arg(long, env = "JOBSEARCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File holding the ids of saved jobs between sessions
    #[arg(long, env = "SAVED_IDS_PATH", default_value = ".jobsearch/saved_jobs.json")]
    pub saved_ids_path: PathBuf,
}
