use crate::bungie::BungieClient;
use crate::cancel::CancelToken;
use crate::config::Config;
use crate::group::{Roster, SlotOutcome, GROUP_SIZE};
use crate::player::Platform;
use crate::source::StatsSource;
use anyhow::Context;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod buckets;
mod bungie;
mod cancel;
mod clock;
mod config;
mod fetchers;
mod group;
mod lighthouse;
mod map_stats;
mod merge;
mod payload;
mod player;
mod source;
mod stats;
mod weapons;


const USAGE: &str = "usage: trials-report [config.toml] <ps|xbox> <name> [name] [name]\n       trials-report [config.toml] map <referenceId>\n       trials-report [config.toml] previous <ps|xbox> <name>";

#[tokio::main]
async fn main() {
    // 로깅 초기화: 콘솔 + 일별 로테이션 파일
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("trials")
        .filename_suffix("log")
        .build("logs")
        .expect("initializing rolling file appender failed");

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr.and(non_blocking))
        .with_ansi(true)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = if args.first().map(|a| a.ends_with(".toml")).unwrap_or(false) {
        Cow::from(args.remove(0))
    } else {
        Cow::from("./config.toml")
    };

    let config = match get_config(&*config_path).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return;
        }
    };

    if let Err(e) = run(config, args).await {
        tracing::error!("Error: {}", e);
        tracing::error!("  {:?}", e);
    }
}

async fn run(config: Config, args: Vec<String>) -> anyhow::Result<()> {
    let client = Arc::new(BungieClient::new(&config));

    match args.first().map(String::as_str) {
        Some("map") => {
            let reference_id = args.get(1).context(USAGE)?;
            let payload = client.map_info(reference_id).await?;
            let summary = map_stats::aggregate_map(&payload, &config.weapons.table())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some("previous") => {
            let platform = args.get(1).and_then(|p| Platform::from_slug(p)).context(USAGE)?;
            let name = args.get(2).context(USAGE)?;
            let account = fetchers::resolve_account(&*client, platform, name)
                .await?
                .with_context(|| format!("no account found for {}", name))?;
            let rows = fetchers::previous_matches(&*client, &account).await?;
            println!("{}", serde_json::to_string_pretty(&rows.unwrap_or_default())?);
        }
        Some(platform) => {
            let platform = Platform::from_slug(platform).context(USAGE)?;
            let names: Vec<String> = args.into_iter().skip(1).take(GROUP_SIZE).collect();
            if names.is_empty() {
                anyhow::bail!(USAGE);
            }
            let roster = Roster::new(config.reset.schedule()?);
            populate_group(&roster, client, platform, names).await?;

            let group = roster.snapshot().await;
            if let Some(path) = group.route_path(platform) {
                tracing::info!("group path: {}", path);
            }
            println!("{}", serde_json::to_string_pretty(&group)?);
        }
        None => anyhow::bail!(USAGE),
    }

    Ok(())
}

/// 이름마다 슬롯 하나씩 동시에 채움
async fn populate_group<S: StatsSource + 'static>(
    roster: &Roster,
    source: Arc<S>,
    platform: Platform,
    names: Vec<String>,
) -> anyhow::Result<()> {
    let cancel = CancelToken::new();
    let mut handles = Vec::new();
    for (slot, name) in names.into_iter().enumerate() {
        let roster = roster.clone();
        let source = Arc::clone(&source);
        let cancel = cancel.clone();
        handles.push(tokio::task::spawn(async move {
            let outcome = roster
                .search_player(&*source, platform, &name, slot, &cancel)
                .await;
            (slot, name, outcome)
        }));
    }

    let results = futures_util::future::join_all(handles).await;
    for result in results {
        let (slot, name, outcome) = result.context("slot task panicked")?;
        match outcome {
            Ok(SlotOutcome::Written) => tracing::info!("slot {}: {}", slot, name),
            Ok(SlotOutcome::Skipped) => tracing::warn!("slot {}: {} not found", slot, name),
            Ok(SlotOutcome::Cancelled) => tracing::warn!("slot {}: {} cancelled", slot, name),
            Err(e) => tracing::error!("slot {}: {} failed: {:#}", slot, name, e),
        }
    }
    Ok(())
}

async fn get_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let mut f = File::open(path)
        .await
        .context("could not open config file")?;
    let mut toml = String::new();
    f.read_to_string(&mut toml)
        .await
        .context("could not read config file")?;
    let config = toml::from_str(&toml).context("could not parse config file")?;

    Ok(config)
}
