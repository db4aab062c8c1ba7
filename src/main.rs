//! Application entry point for toon-episodes.
//!
//! Prints the episode list of a Kakao Page series.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::info;
use toon_episodes::config::Config;
use toon_episodes::error::AppError;
use toon_episodes::event::EpisodeEvent;
use toon_episodes::feed::kakao_provider::KAKAO_ID;
use toon_episodes::feed::providers::Providers;
use toon_episodes::library::JsonFileLibrary;
use toon_episodes::library::Library;
use toon_episodes::logging::setup_logging;
use toon_episodes::model::ToonInfo;
use toon_episodes::service::EpisodeService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let (toon_id, pages) = parse_args()?;
    let config = load_config()?;

    let library: Arc<dyn Library> = Arc::new(JsonFileLibrary::open(&config.data_path)?);
    let providers = Providers::from_config(&config)?;

    let mut info = ToonInfo::new(toon_id);
    info.is_favorite = library.is_favorite(&info.id)?;
    let service = EpisodeService::new(info, providers.get(KAKAO_ID)?, library);
    debug!("Setup complete ({:.2}s).", init_start.elapsed().as_secs_f64());

    run(&service, pages).await?;

    info!("Done in {:.2}s.", init_start.elapsed().as_secs_f64());
    Ok(())
}

/// `toon-episodes <series_id> [pages]`
fn parse_args() -> Result<(String, u32)> {
    let mut args = std::env::args().skip(1);
    let toon_id = args.next().ok_or_else(|| AppError::MissingArgument {
        name: "series_id".to_string(),
    })?;
    let pages = match args.next() {
        Some(raw) => raw.parse::<u32>().map_err(|_| AppError::InvalidConfig {
            key: "pages".to_string(),
            value: raw,
        })?,
        None => 1,
    };
    Ok((toon_id, pages))
}

fn load_config() -> Result<Config> {
    let mut config = Config::new();
    config.load()?;
    setup_logging(&config)?;
    info!("Starting toon-episodes...");
    Ok(config)
}

async fn run(service: &EpisodeService, pages: u32) -> Result<()> {
    let mut episodes = service.episodes();
    let info = service.info();
    println!(
        "Series {}{}",
        info.id,
        if info.is_favorite { " [favorite]" } else { "" }
    );

    for _ in 0..pages {
        if !service.load().await? {
            break;
        }
        if !episodes.has_changed().unwrap_or(false) {
            continue;
        }
        for episode in episodes.borrow_and_update().iter() {
            println!(
                "{} {:>10}  {}  ({})",
                if episode.is_read { "[read]" } else { "      " },
                episode.id,
                episode.title,
                episode.update_date
            );
        }
    }

    let mut events = service.events();
    service.request_first().await;
    if let Ok(EpisodeEvent::First(first)) = events.try_recv() {
        println!("First episode: {} ({})", first.id, first.title);
    }

    Ok(())
}
