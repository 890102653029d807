// Entrypoint for the CLI application.
// - Keeps `main` small: resolve configuration, connect, then hand the
//   client to the menu loop.
// - Exit code 1 only when the startup connection check (or the terminal
//   itself) fails.

use std::process::ExitCode;

use prowlarr_cli::config::Config;
use prowlarr_cli::console::TerminalConsole;
use prowlarr_cli::ui::{startup, Session, Startup};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    // Logs go to stderr so they never mix with the menu on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prowlarr_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> anyhow::Result<()> {
    let config = Config::from_env();
    tracing::debug!(url = config.base_url(), "configuration loaded");

    let mut console = TerminalConsole::new();
    let api = match startup(&config, &mut console)? {
        Startup::Ready(api) => api,
        Startup::Cancelled => return Ok(()),
    };

    // Start the interactive menu. This call blocks until the user exits.
    Session::new(api, console).run()
}

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables win.
    let _ = dotenvy::dotenv();
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting");
            ExitCode::FAILURE
        }
    }
}
