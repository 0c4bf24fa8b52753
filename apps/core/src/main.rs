// Storefront terminal driver.
// Reads commands from stdin, forwards them to the dispatcher and redraws the
// view every time it changes.

use anyhow::Context;
use std::sync::Arc;
use storefront_core::actors::InputControl;
use storefront_core::render::render;
use storefront_core::{telemetry, Key, SearchConfig, StorefrontHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

const HELP: &str = "\
Commands:
  <text>                type <text> and press Enter
  :type <text>          type without submitting (autocomplete, prompt)
  :enter | :esc         press Enter / Escape
  :pick <n>             pick the n-th suggestion (1-based)
  :category <id>        filter results (all, heritage, adventure, ...)
  :now | :more          answer the inactivity prompt
  :choose <key> <val>   pick an option in the analysis
  :contact <email> [phone]
  :close                close the analysis
  :quit";

/// The terminal has no caret to move; requests are only logged.
struct TerminalInput;

impl InputControl for TerminalInput {
    fn focus(&self) {
        info!("search input focused");
    }

    fn place_caret(&self, position: usize) {
        info!(position, "caret moved to end of query");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SearchConfig::load().context("invalid storefront configuration")?;
    telemetry::init(config.log_format);
    info!(api = %config.api_base, analysis = %config.analysis_base, "Storefront starting");

    let handle = StorefrontHandle::from_config(&config, Arc::new(TerminalInput))
        .context("failed to build HTTP clients")?;
    handle.focus().await?;

    let mut view = handle.subscribe();
    let printer = tokio::spawn(async move {
        while view.changed().await.is_ok() {
            let text = render(&view.borrow_and_update());
            println!("\n{}", text);
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match run_command(&handle, line.trim()).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => error!("{:#}", e),
        }
    }

    handle.shutdown().await?;
    printer.abort();
    info!("Storefront stopped");
    Ok(())
}

/// Returns `false` when the driver should exit.
async fn run_command(handle: &StorefrontHandle, line: &str) -> anyhow::Result<bool> {
    let (command, rest) = match line.strip_prefix(':') {
        Some(cmd) => cmd.split_once(' ').unwrap_or((cmd, "")),
        None => {
            handle.edit_query(line).await?;
            handle.key_pressed(Key::Enter).await?;
            return Ok(true);
        }
    };
    let rest = rest.trim();

    match command {
        "quit" | "q" => return Ok(false),
        "help" => println!("{}", HELP),
        "type" => handle.edit_query(rest).await?,
        "enter" => handle.key_pressed(Key::Enter).await?,
        "esc" => handle.key_pressed(Key::Escape).await?,
        "pick" => {
            let n: usize = rest.parse().context("usage: :pick <n>")?;
            handle.select_suggestion(n.saturating_sub(1)).await?;
        }
        "category" => handle.select_category(rest).await?,
        "now" => handle.prompt_search_now().await?,
        "more" => handle.prompt_add_more().await?,
        "choose" => {
            let (key, value) = rest.split_once(' ').context("usage: :choose <key> <value>")?;
            handle.choose_option(key, value.trim()).await?;
        }
        "contact" => {
            let mut parts = rest.split_whitespace();
            let email = parts.next().unwrap_or("");
            let phone = parts.next();
            let reference = handle.submit_contact(email, phone).await?;
            println!("Submitted. Reference: {}", reference);
        }
        "close" => handle.close_analysis().await?,
        other => warn!(command = other, "unknown command, try :help"),
    }
    Ok(true)
}
