//! Minimal terminal front-end standing in for the web UI: wires the config,
//! storage, session store, and chat client together into a prompt loop.

use std::fs;
use std::io::{self, Write};
use std::time::Duration;

use brainchat::chat::ChatClient;
use brainchat::config;
use brainchat::history::{ChatMessage, UserHistory};
use brainchat::storage::{DisabledStorage, FileStorage, KeyValueStorage};
use brainchat::store::SessionStore;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = dirs_next::data_dir()
        .expect("Failed to find data directory")
        .join("brainchat")
        .join("logs");
    fs::create_dir_all(&log_dir).ok();

    let appender = tracing_appender::rolling::daily(log_dir, "brainchat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .json()
        .init();
    guard
}

#[tokio::main]
async fn main() {
    let _guard = init_tracing();

    let config = config::load_or_initialize();
    let storage: Box<dyn KeyValueStorage> = match FileStorage::in_app_data_dir() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            warn!(error = %e, "Durable storage unavailable, running in memory");
            Box::new(DisabledStorage)
        }
    };

    let chat_client = match ChatClient::new(
        &config.chat.base_url,
        Duration::from_secs(config.chat.timeout_secs),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to initialize chat client: {}", e);
            return;
        }
    };

    let mut store = SessionStore::new(storage);
    let mut history = UserHistory::new();
    let mut session_id = store.create_session();
    let mut messages: Vec<ChatMessage> = Vec::new();

    println!("brainchat: type a message, /new for a fresh session, /quit to exit");
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        match prompt {
            "/quit" => break,
            "/new" => {
                session_id = store.create_session();
                messages.clear();
                continue;
            }
            _ => {}
        }

        messages.push(ChatMessage::user(prompt));
        match chat_client.chat(prompt).await {
            Ok(reply) => {
                println!("{}", reply.answer);
                history.add("local", prompt, &reply.answer);
                messages.push(ChatMessage::assistant(reply.answer));
                store.update_session(&session_id, messages.clone());
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}
