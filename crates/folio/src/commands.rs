//! `folio serve` command implementation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use folio_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to.
    #[arg(short, long, default_value_t = 55555)]
    port: u16,

    /// Site root holding `articles/` and `web/`.
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Article fragment the root path redirects to.
    #[arg(long, default_value = "101.html")]
    home: String,

    /// Printable book as `NAME=ROOT_FRAGMENT` (repeatable).
    #[arg(long = "book", value_name = "NAME=ROOT")]
    books: Vec<String>,

    /// Periodically re-pull site content with `git pull`.
    #[arg(long)]
    refresh: bool,

    /// Open the site in the default browser after startup.
    #[arg(long)]
    open: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if a book mapping is malformed or the server fails
    /// to start.
    pub async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let books = self.parse_books()?;
        let config = ServerConfig {
            host: self.host,
            port: self.port,
            root_dir: self.root,
            home_article: self.home,
            books,
            refresh_enabled: self.refresh,
        };

        output.info(&format!(
            "Starting server on {}:{}",
            config.host, config.port
        ));
        output.info(&format!("Site root: {}", config.root_dir.display()));

        if self.open {
            let url = format!("http://localhost:{}/", config.port);
            std::thread::spawn(move || {
                // Give the listener a moment to bind.
                std::thread::sleep(Duration::from_millis(300));
                if let Err(err) = open_browser(&url) {
                    tracing::warn!(error = %err, "could not open browser");
                }
            });
        }

        run_server(config)
            .await
            .map_err(|err| CliError::Server(err.to_string()))
    }

    /// Parse `NAME=ROOT` book mappings, falling back to the default set.
    fn parse_books(&self) -> Result<HashMap<String, String>, CliError> {
        if self.books.is_empty() {
            return Ok(ServerConfig::default().books);
        }
        self.books
            .iter()
            .map(|spec| {
                spec.split_once('=')
                    .map(|(name, root)| (name.to_owned(), root.to_owned()))
                    .ok_or_else(|| {
                        CliError::Validation(format!("invalid book mapping: {spec} (want NAME=ROOT)"))
                    })
            })
            .collect()
    }
}

/// Launch the platform browser opener, detached.
fn open_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = std::process::Command::new("cmd");
        command.args(["/c", "start", url]);
        command
    };
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = std::process::Command::new("open");
        command.arg(url);
        command
    };
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut command = std::process::Command::new("xdg-open");
        command.arg(url);
        command
    };
    command.spawn().map(|_| ())
}
