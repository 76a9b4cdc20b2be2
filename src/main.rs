//! Strictly Sync - Unified CLI
//!
//! Hosts the authority, or runs a client against it.

#![warn(missing_docs)]

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_duet::{GameId, GameSession, Side};
use strictly_sync::{
    submit_chat, submit_guess, submit_join, submit_leave, BoardFile, ClientConfig, Driver, HttpRemote,
    MemoryLog, RemoteLog, SyncClient, SyncStep, ViewEvent,
};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            board,
            hold_secs,
        } => {
            init_tracing("info");
            run_server(host, port, &board, Duration::from_secs(hold_secs)).await
        }
        Command::Watch {
            config,
            server_url,
            game_id,
            name,
        } => {
            let mut config = ClientConfig::from_file(&config)?;
            if let Some(url) = server_url {
                config = config.with_server_url(url);
            }
            if let Some(game_id) = game_id {
                config = config.with_game_id(GameId::from(game_id));
            }
            if let Some(name) = name {
                config = config.with_name(name);
            }
            init_tracing(config.log_filter());
            run_watch(config).await
        }
        Command::Guess { config, index } => {
            let config = load_client_config(&config)?;
            run_one_shot(config, OneShot::Guess(index)).await
        }
        Command::Join { config, side } => {
            let config = load_client_config(&config)?;
            run_one_shot(config, OneShot::Join(side)).await
        }
        Command::Leave { config } => {
            let config = load_client_config(&config)?;
            run_one_shot(config, OneShot::Leave).await
        }
        Command::Chat { config, message } => {
            let config = load_client_config(&config)?;
            run_one_shot(config, OneShot::Chat(message)).await
        }
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

fn load_client_config(path: &Path) -> Result<ClientConfig> {
    let config = ClientConfig::from_file(path)
        .with_context(|| format!("loading {}", path.display()))?;
    init_tracing(config.log_filter());
    Ok(config)
}

fn connect(config: &ClientConfig) -> Result<HttpRemote> {
    Ok(HttpRemote::new(config.server_url().clone(), config.poll().timeout())?)
}

/// Host the authority with the board from `board_path`.
#[instrument(skip(board_path), fields(board = %board_path.display()))]
async fn run_server(host: String, port: u16, board_path: &Path, hold: Duration) -> Result<()> {
    let board = BoardFile::from_file(board_path)?;
    let log = MemoryLog::with_hold(hold);
    log.create(board.into()).await?;

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Server ready at http://{}:{}/", host, port);
    strictly_sync::serve(listener, log).await?;
    Ok(())
}

/// Follow a game until Ctrl+C.
#[instrument(skip_all, fields(game_id = %config.game_id()))]
async fn run_watch(config: ClientConfig) -> Result<()> {
    let remote: Arc<dyn RemoteLog> = Arc::new(connect(&config)?);
    let (views_tx, mut views) = mpsc::unbounded_channel();
    let (commands_tx, commands) = mpsc::channel(16);

    let driver = Driver::new(
        remote,
        config.game_id().clone(),
        config.identity(),
        config.poll(),
        views_tx,
    );
    let mut task = tokio::spawn(driver.run(commands));

    loop {
        tokio::select! {
            Some(view) = views.recv() => match view {
                ViewEvent::SessionLoaded(status) => info!(%status, "Session loaded"),
                ViewEvent::Updated { status, .. } => info!(%status, "Board updated"),
                ViewEvent::SessionReplaced(status) => info!(%status, "Game was reseeded"),
                ViewEvent::SubmitFailed { reason } => warn!(%reason, "Submission failed"),
            },
            result = &mut task => {
                result??;
                return Ok(());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down watcher");
                drop(commands_tx);
                return Ok(());
            }
        }
    }
}

/// A single submission made outside the driver.
#[derive(Debug)]
enum OneShot {
    Guess(i64),
    Join(Side),
    Leave,
    Chat(String),
}

/// Load the game, submit once, merge the response and print the board.
#[instrument(skip(config), fields(game_id = %config.game_id()))]
async fn run_one_shot(config: ClientConfig, action: OneShot) -> Result<()> {
    let remote = connect(&config)?;
    let snapshot = remote.snapshot(config.game_id()).await?;
    let session = GameSession::from_snapshot(snapshot, config.identity())?;
    let mut client = SyncClient::new(session);
    let tag = client.tag();

    let result = match action {
        OneShot::Guess(index) => {
            let request = submit_guess(client.session(), index).with_context(|| {
                format!("guess {} is redundant or not allowed from this seat", index)
            })?;
            remote.guess(&request).await
        }
        OneShot::Join(side) => remote.join(&submit_join(client.session(), side)).await,
        OneShot::Leave => {
            let request = submit_leave(client.session()).context("not seated on a side")?;
            remote.leave(&request).await
        }
        OneShot::Chat(message) => {
            let request =
                submit_chat(client.session(), &message).context("chat message is empty")?;
            remote.chat(&request).await
        }
    };
    let result = result?;

    match client.on_submit_response(tag, Ok(result)) {
        SyncStep::Invalidated => anyhow::bail!("game was reseeded; reload and try again"),
        SyncStep::Ignored | SyncStep::Continue(_) => {}
    }

    println!("{}", client.session().board().display());
    println!("{}", client.session().status());
    Ok(())
}
