mod config;
mod consts;
mod error_classifier;
mod events;
mod feed;
mod loader;
mod logging;
mod page;
mod render;
mod seen;
mod source;
mod state;
mod toast;

use crate::config::{Config, get_config_path, get_state_path};
use crate::consts::panel_consts::{EVENT_QUEUE_SIZE, text};
use crate::events::{Event, EventSink, EventType};
use crate::loader::UpdatesFeedLoader;
use crate::logging::LogLevel;
use crate::page::Page;
use crate::render::Renderer;
use crate::seen::{FileSeenStore, MemorySeenStore, SeenStore, SeenTracker};
use crate::source::{SourceChain, SourceFactory};
use crate::state::PanelState;
use crate::toast::Toast;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the updates feed, render the panel and show the toast once
    Show(ShowArgs),
    /// Open the updates panel
    Open,
    /// Close the updates panel
    Close,
    /// Open the panel if it is closed, close it otherwise
    Toggle,
    /// Forget that the notification was seen, so the toast shows again
    ResetSeen {
        /// Seen key to clear. Defaults to the configured key.
        #[arg(long, value_name = "KEY")]
        key: Option<String>,
    },
}

#[derive(clap::Args)]
struct ShowArgs {
    /// Page URL that relative source paths are resolved against
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Primary API path or URL
    #[arg(long, value_name = "PATH", conflicts_with = "no_api")]
    api_path: Option<String>,

    /// Skip the API and use only the fallback sources
    #[arg(long)]
    no_api: bool,

    /// Fallback feed location, tried in the order given. Replaces the configured list.
    #[arg(long = "fallback", value_name = "PATH")]
    fallbacks: Vec<String>,

    /// Write the markup to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Render without a panel element
    #[arg(long)]
    no_panel: bool,

    /// Render without a toast element
    #[arg(long)]
    no_toast: bool,

    /// Keep the seen flag in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Versioned seen key. Defaults to the configured key.
    #[arg(long, value_name = "KEY")]
    seen_key: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum PanelAction {
    Open,
    Close,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let args = Args::parse();
    let config_path = get_config_path()?;
    let state_path = get_state_path()?;
    let config = Config::load_or_default(&config_path)
        .map_err(|e| format!("Failed to load config {}: {}", config_path.display(), e))?;

    match args.command {
        Command::Show(show_args) => show(show_args, &config, &state_path).await,
        Command::Open => change_panel(&config, &state_path, PanelAction::Open).await,
        Command::Close => change_panel(&config, &state_path, PanelAction::Close).await,
        Command::Toggle => change_panel(&config, &state_path, PanelAction::Toggle).await,
        Command::ResetSeen { key } => {
            let key = key.unwrap_or_else(|| config.seen_key.clone());
            let tracker = SeenTracker::new(
                Box::new(FileSeenStore::new(state_path.clone())),
                EventSink::disabled(),
            );
            tracker.reset(&key).map_err(|e| {
                format!("Failed to clear seen flag in {}: {}", state_path.display(), e)
            })?;
            println!("Cleared seen flag {}", key);
            Ok(())
        }
    }
}

/// Runs one page load and writes the resulting markup.
async fn show(args: ShowArgs, config: &Config, state_path: &Path) -> Result<(), Box<dyn Error>> {
    let (event_sender, event_receiver) = mpsc::channel(EVENT_QUEUE_SIZE);
    let printer = tokio::spawn(events::print_events(event_receiver));

    let html = render_page(&args, config, state_path, EventSink::new(event_sender)).await;
    // Every sink is gone once render_page returns, so the printer drains and exits.
    let _ = printer.await;

    match &args.out {
        Some(path) => fs::write(path, html + "\n")
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?,
        None => println!("{}", html),
    }
    Ok(())
}

async fn render_page(
    args: &ShowArgs,
    config: &Config,
    state_path: &Path,
    events: EventSink,
) -> String {
    let api_path = if args.no_api {
        None
    } else {
        args.api_path.clone().or_else(|| config.api_path.clone())
    };
    let fallbacks = if args.fallbacks.is_empty() {
        config.fallback_paths.clone()
    } else {
        args.fallbacks.clone()
    };
    let base_url = args.base_url.as_deref().or(config.base_url.as_deref());

    let chain = match SourceFactory::new(base_url, config.request_timeout()) {
        Ok(factory) => factory.chain(api_path.as_deref(), &fallbacks),
        Err(e) => {
            events.emit(Event::loader_with_level(
                format!("Cannot set up sources: {}", e),
                EventType::Error,
                LogLevel::Error,
            ));
            SourceChain::default()
        }
    };
    events.emit(Event::loader_with_level(
        format!("Sources: [{}]", chain.locations().join(", ")),
        EventType::Starting,
        LogLevel::Debug,
    ));
    let loaded = UpdatesFeedLoader::new(chain, events.clone())
        .load_with_origin()
        .await;
    if let Some(origin) = &loaded.origin {
        events.emit(Event::renderer_with_level(
            format!("Rendering {} update(s) from {}", loaded.feed.len(), origin),
            EventType::Starting,
            LogLevel::Debug,
        ));
    }

    let mut page = Page::new();
    if !args.no_panel {
        page = page.with_panel(&config.panel_id);
    }
    if !args.no_toast {
        page = page.with_toast(&config.toast_id);
    }

    let panel_open = match PanelState::load_or_default(state_path) {
        Ok(state) => state.panel_open,
        Err(e) => {
            events.emit(Event::renderer_with_level(
                format!("Ignoring unreadable state {}: {}", state_path.display(), e),
                EventType::Error,
                LogLevel::Warn,
            ));
            false
        }
    };
    let renderer = Renderer::new(page.panel(), events.clone());
    renderer.set_open(panel_open).await;
    renderer.render(&loaded.feed).await;

    let store: Box<dyn SeenStore> = if args.ephemeral {
        Box::new(MemorySeenStore::new())
    } else {
        Box::new(FileSeenStore::new(state_path.to_path_buf()).with_events(events.clone()))
    };
    let tracker = SeenTracker::new(store, events.clone());
    let key = args
        .seen_key
        .clone()
        .unwrap_or_else(|| config.seen_key.clone());
    let toast = Toast::new(page.toast(), events);
    toast.notify_once(&tracker, &key, text::TOAST_MESSAGE).await;

    page.to_html().await
}

/// Applies an open/close/toggle to the persisted panel flag.
async fn change_panel(
    config: &Config,
    state_path: &Path,
    action: PanelAction,
) -> Result<(), Box<dyn Error>> {
    let state = PanelState::load_or_default(state_path)
        .map_err(|e| format!("Failed to read state {}: {}", state_path.display(), e))?;

    let page = Page::new().with_panel(&config.panel_id);
    let renderer = Renderer::new(page.panel(), EventSink::disabled());
    renderer.set_open(state.panel_open).await;
    match action {
        PanelAction::Open => renderer.open().await,
        PanelAction::Close => renderer.close().await,
        PanelAction::Toggle => {
            renderer.toggle().await;
        }
    }

    let open = renderer.is_open().await;
    PanelState::update(state_path, |state| state.panel_open = open)
        .map_err(|e| format!("Failed to save state {}: {}", state_path.display(), e))?;
    println!("Panel {}", if open { "open" } else { "closed" });
    Ok(())
}
