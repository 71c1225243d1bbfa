use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use radio_proto::config::Config;
use radio_proto::protocol::StationId;
use radio_remote::bulk_delete::BulkDeleteOutcome;
use radio_remote::document::{element_id, Event, NewStationDocument, CHECKBOX_PREFIX, LINK_PREFIX};
use radio_remote::pages::{DeletePage, IndexPage, NewStationPage};
use radio_remote::request::RequestClient;

#[derive(Parser)]
#[command(name = "radio-remote", about = "Drive the radio playlist manager from a terminal")]
struct Cli {
    /// Base URL of the playlist manager (overrides config.toml).
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the playlist, the current station and the track title, live.
    Watch,
    /// Switch to a station.
    Play { id: String },
    /// Add a station.
    Add { name: String, url: String },
    /// Delete one or more stations.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = radio_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("remote.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,radio_remote=debug,hyper=warn,reqwest=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("radio-remote log: {}", log_path.display());

    let config = Config::load().unwrap_or_default();
    let base_url = cli.server.unwrap_or_else(|| config.server.base_url.clone());
    tracing::info!("radio-remote starting against {}", base_url);
    let client = RequestClient::http(base_url);

    match cli.command {
        Command::Watch => watch(client, &config).await,
        Command::Play { id } => play(client, &config, &id).await,
        Command::Add { name, url } => add(client, name, url).await,
        Command::Delete { ids } => delete(client, &config, &ids).await,
    }
}

async fn watch(client: RequestClient, config: &Config) -> anyhow::Result<()> {
    let page = IndexPage::from_config(client, config);
    let document = page.document();
    let _tasks = page.ready();

    let mut last = String::new();
    loop {
        let snapshot = document.lock().await.to_string();
        if snapshot != last {
            println!("── {} ──", chrono::Local::now().format("%H:%M:%S"));
            print!("{}", snapshot);
            last = snapshot;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}

async fn play(client: RequestClient, config: &Config, id: &str) -> anyhow::Result<()> {
    let page = IndexPage::from_config(client, config);
    let tasks = page.ready();
    tasks.playlist.await.context("playlist task failed")?;
    tasks.title_poll.abort();

    let target = element_id(LINK_PREFIX, &StationId::new(id));
    if !page.click(&target, &mut Event::new()).await? {
        anyhow::bail!("server refused to switch to station {}", id);
    }

    let document = page.document();
    println!("now playing: {}", document.lock().await.now_playing_text());
    Ok(())
}

async fn add(client: RequestClient, name: String, url: String) -> anyhow::Result<()> {
    let page = NewStationPage::new(client, NewStationDocument::new(name.clone(), url));
    if !page.submit(&mut Event::new()).await {
        anyhow::bail!("server rejected station {:?}", name);
    }
    println!("added {}", name);
    Ok(())
}

async fn delete(client: RequestClient, config: &Config, ids: &[String]) -> anyhow::Result<()> {
    let page = DeletePage::from_config(client, config);
    page.ready().await.context("playlist task failed")?;

    {
        let document = page.document();
        let mut document = document.lock().await;
        for id in ids {
            document.set_checked(&element_id(CHECKBOX_PREFIX, &StationId::new(id.as_str())), true)?;
        }
    }

    match page.submit(&mut Event::new()).await {
        BulkDeleteOutcome::Submitted { deleted } => {
            println!("deleted {} stations", deleted);
            Ok(())
        }
        BulkDeleteOutcome::Aborted { station, status } => {
            anyhow::bail!(
                "delete of station {} failed with status {}; other deletions may have been applied",
                station,
                status
            )
        }
    }
}
