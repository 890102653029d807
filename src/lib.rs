// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive tool.
//
// Module responsibilities:
// - `config`: Resolves the server URL and API key from the environment.
// - `api`: Encapsulates HTTP interactions with the Prowlarr server
//   (status, indexers, download clients, search, grab).
// - `error`: Typed errors returned by the API client and the menu.
// - `format`: Display helpers for sizes, dates and titles.
// - `console`: The terminal seam used by the UI (prompts, notices, spinners).
// - `ui`: Startup sequence and the interactive menu loop.
pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod format;
pub mod ui;
