// UI layer: startup checks and the interactive numbered menu. The menu is
// a small state machine; each state has one handler that performs at most
// one API call and then hands control back to the main menu.

use std::str::FromStr;

use anyhow::Result;

use crate::api::{ApiClient, Category, Release, SortBy};
use crate::config::{Config, API_KEY_VAR};
use crate::console::{Console, Notice};
use crate::error::{GrabFailure, InputError};
use crate::format::{format_date, format_size, header, truncate};

/// Maximum number of results requested per search.
pub const SEARCH_LIMIT: u32 = 100;
/// Number of results printed after a search.
pub const DISPLAY_LIMIT: usize = 30;
const TITLE_WIDTH: usize = 70;
const GRAB_TITLE_WIDTH: usize = 60;

/// An option of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Search,
    ListIndexers,
    ListDownloadClients,
    Grab,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::Search),
            "2" => Ok(MenuChoice::ListIndexers),
            "3" => Ok(MenuChoice::ListDownloadClients),
            "4" => Ok(MenuChoice::Grab),
            "5" => Ok(MenuChoice::Exit),
            _ => Err(InputError::InvalidOption),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MainMenu,
    Searching,
    ListingIndexers,
    ListingClients,
    Grabbing,
    Exit,
}

impl From<MenuChoice> for State {
    fn from(choice: MenuChoice) -> Self {
        match choice {
            MenuChoice::Search => State::Searching,
            MenuChoice::ListIndexers => State::ListingIndexers,
            MenuChoice::ListDownloadClients => State::ListingClients,
            MenuChoice::Grab => State::Grabbing,
            MenuChoice::Exit => State::Exit,
        }
    }
}

/// Map the category prompt answer to a filter. Anything other than 1-3
/// (including a blank answer) means all categories.
pub fn parse_category(input: &str) -> Option<Category> {
    match input.trim() {
        "1" => Some(Category::Movies),
        "2" => Some(Category::Tv),
        "3" => Some(Category::Audio),
        _ => None,
    }
}

/// Validate a release number against the current result count.
pub fn select_release(input: &str, len: usize) -> Result<usize, InputError> {
    let index: i64 = input.trim().parse().map_err(|_| InputError::NotANumber)?;
    if index < 0 || index as u64 >= len as u64 {
        return Err(InputError::OutOfRange { index, len });
    }
    Ok(index as usize)
}

/// Parse the optional download client id; blank means server default.
pub fn parse_download_client(input: &str) -> Result<Option<i32>, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input.parse().map(Some).map_err(|_| InputError::NotANumber)
}

/// Result of the startup sequence.
pub enum Startup {
    /// Connected; the client is ready for the menu.
    Ready(ApiClient),
    /// The operator declined to enter an API key.
    Cancelled,
}

/// Resolve the API key (prompting if only the placeholder is configured)
/// and verify the server is reachable.
///
/// A failed connection check is printed and returned as an error.
pub fn startup<C: Console>(config: &Config, console: &mut C) -> Result<Startup> {
    console.line(&header("Prowlarr CLI"));

    let config = if config.has_placeholder_key() {
        console.notice(Notice::Warning, "API Key not configured!");
        console.line(&format!("   Set {} in the environment or in a .env file", API_KEY_VAR));
        console.line(&format!("   Current URL: {}", config.base_url()));
        console.line("");
        let key = console.read_secret("Enter API Key (or press Enter to exit)")?;
        if key.is_empty() {
            tracing::info!("no API key entered, exiting");
            return Ok(Startup::Cancelled);
        }
        config.with_api_key(key)
    } else {
        config.clone()
    };

    let api = ApiClient::new(&config)?;
    console.line(&format!("Testing connection to {}...", config.base_url()));
    let spinner = console.spinner("Connecting...");
    let status = api.test_connection();
    spinner.finish_and_clear();

    match status {
        Ok(status) => {
            tracing::info!(version = ?status.version, "connected");
            console.notice(
                Notice::Success,
                &format!("Connected to Prowlarr v{}", status.version.as_deref().unwrap_or("unknown")),
            );
            console.line(&format!(
                "   Instance: {}",
                status.instance_name.as_deref().unwrap_or("default")
            ));
            Ok(Startup::Ready(api))
        }
        Err(e) => {
            console.notice(Notice::Failure, &format!("Connection failed: {}", e));
            Err(e.into())
        }
    }
}

/// Interactive session: owns the client, the console and the results of
/// the most recent search (used by the grab action).
pub struct Session<C: Console> {
    api: ApiClient,
    console: C,
    last_results: Vec<Release>,
}

impl<C: Console> Session<C> {
    pub fn new(api: ApiClient, console: C) -> Self {
        Session {
            api,
            console,
            last_results: Vec::new(),
        }
    }

    pub fn last_results(&self) -> &[Release] {
        &self.last_results
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Run the menu until the operator chooses "Exit". Only console I/O
    /// errors end the loop early; API errors are reported and the menu
    /// continues.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::MainMenu;
        loop {
            state = match state {
                State::MainMenu => self.main_menu()?,
                State::Searching => {
                    self.search()?;
                    State::MainMenu
                }
                State::ListingIndexers => {
                    self.list_indexers();
                    State::MainMenu
                }
                State::ListingClients => {
                    self.list_download_clients();
                    State::MainMenu
                }
                State::Grabbing => {
                    self.grab()?;
                    State::MainMenu
                }
                State::Exit => {
                    self.console.line("\nGoodbye! 👋");
                    return Ok(());
                }
            };
        }
    }

    fn main_menu(&mut self) -> Result<State> {
        self.console.line(&header("Main Menu"));
        self.console.line("  1. Search for releases");
        self.console.line("  2. List configured indexers");
        self.console.line("  3. List download clients");
        self.console.line("  4. Grab a release from last search");
        self.console.line("  5. Exit");
        self.console.line("");

        let input = self.console.read_line("Select option (1-5)")?;
        match input.parse::<MenuChoice>() {
            Ok(choice) => Ok(choice.into()),
            Err(e) => {
                self.console.notice(Notice::Warning, &e.to_string());
                Ok(State::MainMenu)
            }
        }
    }

    fn search(&mut self) -> Result<()> {
        self.console.line(&header("Search Releases"));
        let query = self.console.read_line("Enter search term")?;
        if query.is_empty() {
            self.console.line("Search cancelled.");
            return Ok(());
        }

        self.console.line("\nCategory filter (optional):");
        self.console.line("  [1] Movies (2000)");
        self.console.line("  [2] TV Shows (5000)");
        self.console.line("  [3] Audio (3000)");
        self.console.line("  [4] All categories");
        let input = self.console.read_line("Select category (1-4, default=4)")?;
        let categories: Vec<Category> = parse_category(&input).into_iter().collect();

        self.console.line(&format!("\n🔍 Searching for '{}'...", query));
        let spinner = self.console.spinner("Searching indexers...");
        let result = self.api.search(&query, &categories, SEARCH_LIMIT, SortBy::Seeders);
        spinner.finish_and_clear();

        match result {
            Ok(releases) => {
                self.last_results = releases;
                self.show_results();
            }
            Err(e) => self.console.notice(Notice::Failure, &format!("Search failed: {}", e)),
        }
        Ok(())
    }

    fn show_results(&mut self) {
        let total = self.last_results.len();
        if total == 0 {
            self.console.notice(Notice::Failure, "No results found.");
            return;
        }

        self.console.line(&header(&format!(
            "Search Results ({} found) - Sorted by Seeders ↓",
            total
        )));
        for (i, release) in self.last_results.iter().take(DISPLAY_LIMIT).enumerate() {
            for line in release_lines(i, release) {
                self.console.line(&line);
            }
        }
        if total > DISPLAY_LIMIT {
            self.console.line(&format!(
                "  ... and {} more results (showing top {} by seeders)",
                total - DISPLAY_LIMIT,
                DISPLAY_LIMIT
            ));
        }
        self.console.notice(Notice::Info, "\n💡 Use option 4 to grab a release by its number.");
    }

    fn list_indexers(&mut self) {
        self.console.line(&header("Configured Indexers"));
        match self.api.list_indexers() {
            Ok(indexers) if indexers.is_empty() => self.console.line("No indexers configured."),
            Ok(indexers) => {
                for idx in indexers {
                    self.console.line(&format!(
                        "  {} [{}] {} ({})",
                        enabled_mark(idx.enable),
                        idx.id,
                        idx.name,
                        idx.protocol.as_deref().unwrap_or("unknown")
                    ));
                }
            }
            Err(e) => self
                .console
                .notice(Notice::Failure, &format!("Failed to get indexers: {}", e)),
        }
    }

    fn list_download_clients(&mut self) {
        self.console.line(&header("Download Clients"));
        match self.api.list_download_clients() {
            Ok(clients) if clients.is_empty() => self.console.line("No download clients configured."),
            Ok(clients) => {
                for dc in clients {
                    self.console.line(&format!(
                        "  {} [{}] {} ({})",
                        enabled_mark(dc.enable),
                        dc.id,
                        dc.name,
                        dc.implementation.as_deref().unwrap_or("unknown")
                    ));
                }
            }
            Err(e) => self
                .console
                .notice(Notice::Failure, &format!("Failed to get download clients: {}", e)),
        }
    }

    fn grab(&mut self) -> Result<()> {
        if self.last_results.is_empty() {
            self.console
                .notice(Notice::Warning, "No search results available. Search first!");
            return Ok(());
        }

        self.console.line(&header("Grab Release"));
        self.console.line(&format!(
            "Available releases (from last search): 0-{}",
            self.last_results.len() - 1
        ));

        let input = self.console.read_line("Enter release number to grab")?;
        let index = match select_release(&input, self.last_results.len()) {
            Ok(index) => index,
            Err(e) => {
                self.console.notice(Notice::Warning, &e.to_string());
                return Ok(());
            }
        };
        let input = self
            .console
            .read_line("Download client ID (blank for server default)")?;
        let download_client = match parse_download_client(&input) {
            Ok(id) => id,
            Err(e) => {
                self.console.notice(Notice::Warning, &e.to_string());
                return Ok(());
            }
        };

        let release = self.last_results[index].clone();
        let title = release.title.as_deref().unwrap_or("Unknown");
        self.console.line(&format!(
            "\n📥 Grabbing: {}...",
            title.chars().take(GRAB_TITLE_WIDTH).collect::<String>()
        ));

        let spinner = self.console.spinner("Sending to download client...");
        let result = self
            .api
            .grab_release(release.indexer_id, &release.guid, download_client);
        spinner.finish_and_clear();

        match result {
            Ok(confirmation) => {
                self.console
                    .notice(Notice::Success, "Success! Release sent to download client.");
                self.console.line(&format!(
                    "   Title: {}",
                    confirmation.title.as_deref().unwrap_or("Unknown")
                ));
            }
            Err(e) => {
                let message = match e.grab_failure() {
                    GrabFailure::NotInCache => "Release not found in cache. Try searching again.".to_string(),
                    GrabFailure::IndexerFetchFailed => "Failed to get release from indexer.".to_string(),
                    GrabFailure::Other => format!("Grab failed: {}", e),
                };
                self.console.notice(Notice::Failure, &message);
            }
        }
        Ok(())
    }
}

fn enabled_mark(enabled: bool) -> &'static str {
    if enabled {
        "✅"
    } else {
        "❌"
    }
}

/// The display lines for one search result.
fn release_lines(index: usize, release: &Release) -> [String; 3] {
    let title = release.title.as_deref().unwrap_or("Unknown");
    let count = |n: Option<i32>| n.map_or_else(|| "?".to_string(), |n| n.to_string());
    [
        format!("  [{}] {}", index, truncate(title, TITLE_WIDTH)),
        format!(
            "      Indexer: {} | Size: {} | S:{} L:{} | {}",
            release.indexer.as_deref().unwrap_or("Unknown"),
            format_size(release.size.unwrap_or(0)),
            count(release.seeders),
            count(release.leechers),
            format_date(release.publish_date.as_deref().unwrap_or(""))
        ),
        String::new(),
    ]
}
