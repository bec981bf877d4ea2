use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;

use newscast::app::{App, AppEvent};
use newscast::feed::{fetch_channel, relay_url, DEFAULT_FEED_URL};
use newscast::player::{AudioOutput, Player, RodioOutput};
use newscast::ui;

#[derive(Parser, Debug)]
#[command(name = "newscast", about = "Terminal player for a daily-news podcast feed")]
struct Args {
    /// Feed URL to load instead of the default channel
    #[arg(long, value_name = "URL")]
    feed_url: Option<String>,

    /// Disable audio output (UI-only mode)
    #[arg(long)]
    mute: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging (RUST_LOG); stderr keeps the
    // alternate screen clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let output: Option<Box<dyn AudioOutput>> = if args.mute {
        None
    } else {
        match RodioOutput::new() {
            Ok(output) => Some(Box::new(output)),
            Err(e) => {
                tracing::warn!(error = %e, "No audio device; continuing in UI-only mode");
                None
            }
        }
    };

    let mut app = App::new(Player::new(output)).context("Failed to create application")?;

    // Single startup fetch; the UI starts in the loading state and the
    // result arrives as an event
    let feed_url = args.feed_url.as_deref().unwrap_or(DEFAULT_FEED_URL);
    let url = relay_url(feed_url)
        .context("Invalid feed URL")?
        .to_string();

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let fetch_tx = event_tx.clone();
    let client = app.http_client.clone();
    tokio::spawn(async move {
        let result = fetch_channel(&client, &url).await;
        if fetch_tx.send(AppEvent::FeedLoaded(result)).await.is_err() {
            tracing::warn!("Feed result dropped (UI already gone)");
        }
    });

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
