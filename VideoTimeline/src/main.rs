mod cli;
mod report;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vtconfig::get_config;
use vtplaylist::{Classifier, MediaApiExt, MediaScanner, PlaylistConfigExt, Reconciler};
use vtschedule::ScheduleApiExt;
use vtserver::{LoggingOptions, ServerBuilder};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.config_dir {
        // SAFETY: aucun autre thread n'existe encore, le runtime n'est pas démarré
        unsafe { std::env::set_var("VIDEOTIMELINE_CONFIG", dir) };
    }

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Cannot start tokio runtime")?;
            runtime.block_on(serve(port))
        }
        Command::Generate { json } => {
            init_cli_logging();
            generate(json)
        }
        Command::Analyze { media_dir } => {
            init_cli_logging();
            analyze(media_dir)
        }
        Command::Rules => {
            init_cli_logging();
            let settings = get_config().playlist_settings()?;
            let mut out = String::new();
            report::rules(&mut out, &Classifier::new(&settings))?;
            print!("{}", out);
            Ok(())
        }
    }
}

async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let mut builder = ServerBuilder::new_configured();
    if let Some(port) = port {
        builder = builder.http_port(port);
    }
    let mut server = builder.build();
    server.init_logging(LoggingOptions::from_config()).await;

    info!("📺 Initializing media playlist API...");
    let reconciler = server.init_media_api_configured().await?;
    let playlist = reconciler.get_playlist();
    info!("✅ Playlist ready with {} item(s)", playlist.len());

    info!("🕘 Initializing schedule API...");
    let schedule = server.init_schedule_api_configured().await?;
    if let Err(e) = schedule.ensure_default() {
        warn!("⚠️ Cannot write default schedule: {}", e);
    }

    server
        .add_route("/info", || async {
            serde_json::json!({"name": "VideoTimeline", "version": env!("CARGO_PKG_VERSION")})
        })
        .await;

    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("✅ VideoTimeline is ready on port {}!", server.info().http_port);
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}

fn generate(json: bool) -> anyhow::Result<()> {
    let settings = get_config().playlist_settings()?;
    let reconciler = Reconciler::new(settings);
    let outcome = reconciler.regenerate()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.playlist)?);
    } else {
        let mut out = String::new();
        report::playlist(&mut out, &outcome.playlist)?;
        println!("{}", outcome.message);
        print!("{}", out);
    }
    Ok(())
}

fn analyze(media_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = get_config().playlist_settings()?;
    let root = media_dir.unwrap_or_else(|| settings.media_dir.clone());

    let files = MediaScanner::new(&root).scan()?;
    let mut out = String::new();
    report::analyze(&mut out, &root, &files, &Classifier::new(&settings))?;
    print!("{}", out);
    Ok(())
}

/// Logs console des commandes ponctuelles, réglables par `RUST_LOG`
fn init_cli_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
