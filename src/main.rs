use clap::{Arg, Command};
use std::env;
use std::process;
use tracing::{error, info};

mod analysis;
mod extract;
mod web;

use analysis::client::{CompletionClient, DEFAULT_MODEL};
use web::AppState;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Prints a small startup box to stderr (stdout stays clean).
fn print_banner(bind: &str) {
    const BOX_WIDTH: usize = 60;
    let line = "═".repeat(BOX_WIDTH - 2);
    let addr = format!("http://{}", bind);
    eprintln!("\n\x1b[36m╔{}╗", line);
    for text in [
        "",
        "PO Analyzer: GenAI Purchase Order extraction",
        addr.as_str(),
        "",
    ] {
        let padding = BOX_WIDTH.saturating_sub(2 + text.chars().count());
        let left = padding / 2;
        eprintln!(
            "║{}{}{}║",
            " ".repeat(left),
            text,
            " ".repeat(padding - left)
        );
    }
    eprintln!("╚{}╝\x1b[0m\n", line);
}

#[tokio::main]
async fn main() {
    // Parse command line arguments first
    let matches = Command::new("po-analyzer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A web form that extracts Purchase Order fields from PDF/DOCX uploads")
        .long_about(
            "Serves a single-widget upload form. Each uploaded PO document is\n\
             converted to plain text, wrapped in a field-extraction prompt, and\n\
             sent to the Together AI chat-completion endpoint. The model's\n\
             markdown-table answer is rendered back on the page.",
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .value_name("KEY")
                .help("Together AI API key (falls back to TOGETHER_API_KEY)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_name("ADDR")
                .help("Listen address (falls back to PO_ANALYZER_BIND, default 127.0.0.1:8080)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("MODEL")
                .help("Completion model identifier")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Suppress the startup banner")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize tracing to stderr
    let log_level = if env::var("RUST_LOG").is_ok() {
        // Use RUST_LOG if set
        None
    } else if matches.get_flag("quiet") {
        Some("error")
    } else {
        Some("info")
    };

    let subscriber = tracing_subscriber::fmt().with_writer(std::io::stderr);

    if let Some(level) = log_level {
        env::set_var("RUST_LOG", level);
    }

    subscriber.init();

    // The credential is the only mandatory configuration; halt before the
    // upload form becomes reachable if it is missing.
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("TOGETHER_API_KEY").ok());

    let Some(api_key) = api_key else {
        error!("No API key configured. Pass --api-key or set TOGETHER_API_KEY.");
        process::exit(1);
    };

    let model = matches
        .get_one::<String>("model")
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let bind = matches
        .get_one::<String>("bind")
        .cloned()
        .or_else(|| env::var("PO_ANALYZER_BIND").ok())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    if !matches.get_flag("quiet") {
        print_banner(&bind);
    }

    info!("Starting PO analyzer with model {}", model);

    let state = AppState::new(CompletionClient::new(api_key, model));
    if let Err(e) = web::serve(&bind, state).await {
        error!("Failed to start server: {:#}", e);
        process::exit(1);
    }
}
