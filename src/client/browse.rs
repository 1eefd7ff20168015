use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::client::backend::BackendClient;
use crate::client::muse::MuseApi;
use crate::client::save::{SaveController, SaveOutcome};
use crate::client::search::{SearchController, SearchOutcome};
use crate::client::session::TokenSession;
use crate::client::storage::FileStorage;
use crate::client::view::SearchView;
use crate::client::{AuthSession, JobPersistence, SavedIdStorage};
use crate::config::ClientArgs;

const HELP: &str = "\
Commands:
  search <text>   search for jobs
  save <job id>   save a displayed job to your account
  list            show the current results
  saved           list jobs saved on your account
  help            show this help
  quit            leave (saved ids are written to disk)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Save(String),
    List,
    Saved,
    Help,
    Quit,
}

impl Input {
    pub fn parse(line: &str) -> Option<Input> {
        let line = line.trim();
        let (cmd, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));
        match cmd.to_ascii_lowercase().as_str() {
            "search" | "s" => Some(Input::Search(rest.to_string())),
            "save" => Some(Input::Save(rest.to_string())),
            "list" | "ls" => Some(Input::List),
            "saved" => Some(Input::Saved),
            "help" | "?" => Some(Input::Help),
            "quit" | "exit" | "q" => Some(Input::Quit),
            _ => None,
        }
    }
}

/// Everything an interactive session needs, wired from the CLI arguments.
pub struct BrowseSession {
    search: SearchController,
    save: SaveController,
    persistence: Arc<dyn JobPersistence>,
    auth: Arc<dyn AuthSession>,
    storage: Arc<dyn SavedIdStorage>,
}

impl BrowseSession {
    pub fn from_args(args: &ClientArgs) -> anyhow::Result<Self> {
        let api = Arc::new(MuseApi::new(&args.api_url, args.api_key.clone())?);
        let persistence: Arc<dyn JobPersistence> =
            Arc::new(BackendClient::new(&args.backend_url)?);
        let auth: Arc<dyn AuthSession> = Arc::new(TokenSession::new(args.token.clone()));
        let storage = Arc::new(FileStorage::new(&args.saved_ids_path));
        Ok(Self {
            search: SearchController::new(api),
            save: SaveController::new(persistence.clone(), auth.clone()),
            persistence,
            auth,
            storage,
        })
    }

    pub fn search_controller(&self) -> &SearchController {
        &self.search
    }

    pub fn mount(&self) -> SearchView {
        SearchView::mount(&*self.storage)
    }

    pub fn unmount(&self, view: SearchView) {
        if let Err(e) = view.unmount(&*self.storage) {
            tracing::error!("Failed to write saved job ids: {e}");
        }
    }

    /// Read commands from stdin until quit, EOF or Ctrl-C, then flush the
    /// saved ids.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut view = self.mount();
        if !self.auth.is_logged_in() {
            println!("Not logged in: set JOBSEARCH_TOKEN to save jobs.");
        }
        println!(
            "Search for jobs! {} saved on this device. Type `help` for commands.",
            view.saved_ids().len()
        );

        let lines = BufReader::new(tokio::io::stdin()).lines();
        let result = self
            .drive(&mut view, lines, tokio::signal::ctrl_c())
            .await;

        self.unmount(view);
        result
    }

    /// Dispatch lines until quit or EOF, or until `interrupt` resolves. The
    /// interrupt is polled across iterations, so one that fires while a
    /// command runs ends the session once that command returns.
    async fn drive<R, F>(
        &self,
        view: &mut SearchView,
        mut lines: Lines<R>,
        interrupt: F,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        F: Future,
    {
        tokio::pin!(interrupt);
        loop {
            tokio::select! {
                biased;
                _ = &mut interrupt => {
                    tracing::info!("Interrupted, closing session");
                    return Ok(());
                }
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !self.dispatch(view, &line).await {
                                return Ok(());
                            }
                        }
                        None => return Ok(()),
                    }
                }
            }
        }
    }

    /// Handle one line of input. Returns false when the session should end.
    async fn dispatch(&self, view: &mut SearchView, line: &str) -> bool {
        let Some(input) = Input::parse(line) else {
            if !line.trim().is_empty() {
                println!("Unknown command. Type `help` for commands.");
            }
            return true;
        };

        match input {
            Input::Search(query) => {
                view.input = query.clone();
                match self.search.search(view, &query).await {
                    Ok(SearchOutcome::Skipped) => println!("Type something to search for."),
                    Ok(SearchOutcome::Replaced(_)) => {
                        print!("{}", render_results(view, &*self.auth))
                    }
                    Err(_) => println!("Something went wrong with the search."),
                }
            }
            Input::Save(job_id) => match self.save.save(view, &job_id).await {
                Ok(SaveOutcome::Saved) => println!("Saved job {job_id}."),
                Ok(SaveOutcome::AlreadySaved) => println!("This job has already been saved!"),
                Ok(SaveOutcome::NotFound) => println!("No displayed job has id {job_id}."),
                Ok(SaveOutcome::AuthRequired) => println!("Log in to save jobs."),
                Err(_) => println!("Something went wrong saving job {job_id}."),
            },
            Input::List => print!("{}", render_results(view, &*self.auth)),
            Input::Saved => self.print_saved().await,
            Input::Help => println!("{HELP}"),
            Input::Quit => return false,
        }
        true
    }

    async fn print_saved(&self) {
        let Some(token) = self.auth.current_token() else {
            println!("Log in to see your saved jobs.");
            return;
        };
        match self.persistence.saved_jobs(&token).await {
            Ok(jobs) if jobs.is_empty() => println!("You have no saved jobs."),
            Ok(jobs) => {
                println!("Viewing {} saved jobs:", jobs.len());
                for job in jobs {
                    println!(
                        "  [{}] {} at {} ({}, {})",
                        job.id, job.name, job.company, job.level, job.location
                    );
                    if let Some(link) = &job.link {
                        println!("      {link}");
                    }
                }
            }
            Err(e) => {
                tracing::error!("Listing saved jobs failed: {e}");
                println!("Could not load your saved jobs.");
            }
        }
    }
}

/// Text rendering of the result list, one block per job.
pub fn render_results(view: &SearchView, auth: &dyn AuthSession) -> String {
    let jobs = view.results();
    if jobs.is_empty() {
        return "Search for a job to begin\n".to_string();
    }

    let mut out = format!("Viewing {} results:\n", jobs.len());
    for job in jobs {
        let _ = writeln!(out, "\n[{}] {}", job.job_id, job.company);
        let _ = writeln!(out, "  Title: {}", job.name);
        let _ = writeln!(out, "  {} | {} | {}", job.category, job.level, job.location);
        let _ = writeln!(out, "  Job link: {}", job.link);
        if auth.is_logged_in() {
            let label = if view.can_save(auth, &job.job_id) {
                "Save this Job!"
            } else {
                "This job has already been saved!"
            };
            let _ = writeln!(out, "  {label}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::sync::oneshot;

    use crate::client::error::ClientError;
    use crate::client::fakes::{FakePersistence, job};
    use crate::client::storage::MemoryStorage;
    use crate::client::{JobSearchApi, SaveReceipt, SearchResponse};

    /// Answers every search with an empty page and fires the interrupt on
    /// the first one.
    struct InterruptingApi {
        calls: AtomicUsize,
        interrupt: Mutex<Option<oneshot::Sender<()>>>,
    }

    impl InterruptingApi {
        fn new(interrupt: Option<oneshot::Sender<()>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                interrupt: Mutex::new(interrupt),
            }
        }
    }

    #[async_trait]
    impl JobSearchApi for InterruptingApi {
        async fn search(&self, _query: &str) -> Result<SearchResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(tx) = self.interrupt.lock().unwrap().take() {
                let _ = tx.send(());
            }
            Ok(SearchResponse {
                status: StatusCode::OK,
                body: r#"{"results":[]}"#.into(),
            })
        }
    }

    fn session(api: Arc<InterruptingApi>) -> BrowseSession {
        let persistence: Arc<dyn JobPersistence> =
            Arc::new(FakePersistence::new(|| Ok(SaveReceipt::Created)));
        let auth: Arc<dyn AuthSession> = Arc::new(TokenSession::new(None));
        BrowseSession {
            search: SearchController::new(api),
            save: SaveController::new(persistence.clone(), auth.clone()),
            persistence,
            auth,
            storage: Arc::new(MemoryStorage::default()),
        }
    }

    #[tokio::test]
    async fn interrupt_during_a_command_ends_the_session_after_it() {
        let (tx, rx) = oneshot::channel();
        let api = Arc::new(InterruptingApi::new(Some(tx)));
        let session = session(api.clone());
        let mut view = session.mount();
        let lines = BufReader::new(&b"search data\nsearch more\n"[..]).lines();

        session.drive(&mut view, lines, rx).await.unwrap();

        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lines_run_until_quit_without_interrupt() {
        let api = Arc::new(InterruptingApi::new(None));
        let session = session(api.clone());
        let mut view = session.mount();
        let lines = BufReader::new(&b"search a\n\nsearch b\nquit\nsearch c\n"[..]).lines();

        session
            .drive(&mut view, lines, std::future::pending::<()>())
            .await
            .unwrap();

        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            Input::parse("search  data science "),
            Some(Input::Search("data science".into()))
        );
        assert_eq!(Input::parse("search"), Some(Input::Search(String::new())));
        assert_eq!(Input::parse("SAVE 42"), Some(Input::Save("42".into())));
        assert_eq!(Input::parse(" ls"), Some(Input::List));
        assert_eq!(Input::parse("q"), Some(Input::Quit));
        assert_eq!(Input::parse("frobnicate"), None);
        assert_eq!(Input::parse(""), None);
    }

    #[test]
    fn empty_view_prompts_for_search() {
        let view = SearchView::mount(&MemoryStorage::default());
        let out = render_results(&view, &TokenSession::new(None));
        assert_eq!(out, "Search for a job to begin\n");
    }

    #[test]
    fn saved_jobs_are_labelled_for_logged_in_users() {
        let mut view = SearchView::mount(&MemoryStorage::with_ids(&["1"]));
        view.replace_results(vec![job("1"), job("2")]);

        let out = render_results(&view, &TokenSession::new(Some("tok".into())));
        assert!(out.starts_with("Viewing 2 results:"));
        assert!(out.contains("[1] Acme"));
        assert_eq!(out.matches("This job has already been saved!").count(), 1);
        assert_eq!(out.matches("Save this Job!").count(), 1);

        let anonymous = render_results(&view, &TokenSession::new(None));
        assert!(!anonymous.contains("Save this Job!"));
        assert!(!anonymous.contains("already been saved"));
    }
}
