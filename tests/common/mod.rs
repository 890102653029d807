//! Common test utilities for prowlarr-cli integration tests
//!
//! - A scripted `Console` that replays operator input and records output
//! - Helpers to run blocking client code next to a wiremock server
//! - JSON fixtures shaped like Prowlarr responses

#![allow(dead_code)]

use std::collections::VecDeque;

use indicatif::ProgressBar;
use prowlarr_cli::api::{ApiClient, Release};
use prowlarr_cli::config::Config;
use prowlarr_cli::console::{Console, Notice};
use prowlarr_cli::ui::Session;
use serde_json::{json, Value};

/// API key the mock server expects.
pub const TEST_KEY: &str = "0123456789abcdef";

/// Replays canned answers and records everything printed.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedConsole {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    fn next(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.push(prompt.to_string());
        match self.inputs.pop_front() {
            Some(answer) => Ok(answer.trim().to_string()),
            None => anyhow::bail!("script exhausted at prompt {:?}", prompt),
        }
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.next(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.next(prompt)
    }

    fn line(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn notice(&mut self, _kind: Notice, text: &str) {
        self.output.push(text.to_string());
    }

    fn spinner(&self, _message: &str) -> ProgressBar {
        ProgressBar::hidden()
    }
}

/// What a finished session left behind.
#[derive(Debug)]
pub struct SessionOutcome {
    pub result: Result<(), String>,
    pub transcript: String,
    pub prompts: Vec<String>,
    pub last_results: Vec<Release>,
}

pub fn client(uri: &str) -> ApiClient {
    ApiClient::new(&Config::new(uri, TEST_KEY)).expect("client builds")
}

/// Run `f` with a blocking client on a thread where blocking is allowed.
/// The client is created and dropped on that thread.
pub async fn with_client<T, F>(uri: String, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&ApiClient) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&client(&uri)))
        .await
        .expect("blocking task panicked")
}

/// Drive a full menu session against `uri` with the given answers.
pub async fn run_session(uri: String, inputs: &[&str]) -> SessionOutcome {
    let inputs: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        let mut session = Session::new(client(&uri), ScriptedConsole::new(inputs));
        let result = session.run().map_err(|e| e.to_string());
        SessionOutcome {
            result,
            transcript: session.console().transcript(),
            prompts: session.console().prompts.clone(),
            last_results: session.last_results().to_vec(),
        }
    })
    .await
    .expect("session thread panicked")
}

/// A release as the search endpoint returns it.
pub fn release_json(n: usize, seeders: u32) -> Value {
    json!({
        "guid": format!("https://tracker.example/details/{n}"),
        "indexerId": 10 + n,
        "indexer": "Linux Tracker",
        "title": format!("ubuntu-24.04.{n}-desktop-amd64.iso"),
        "size": 6_114_656_256u64,
        "seeders": seeders,
        "leechers": 3,
        "publishDate": "2024-04-25T15:02:00Z",
        "protocol": "torrent",
        "downloadUrl": format!("http://localhost:9696/1/download?link={n}"),
        "categories": [{"id": 4000, "name": "PC"}]
    })
}

/// `count` releases with seeder counts that are not pre-sorted.
pub fn releases_json(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|n| release_json(n, ((n * 37) % 101) as u32))
        .collect();
    Value::Array(items)
}

pub fn status_json() -> Value {
    json!({
        "appName": "Prowlarr",
        "instanceName": "Prowlarr",
        "version": "1.16.2.4435",
        "isDebug": false
    })
}
