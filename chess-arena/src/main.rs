use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_arena::{build_selector, pgn_filename, save_pgn, ArenaConfig, MatchRunner, Oracles};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("chess_arena=info".parse()?))
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ArenaConfig::load(config_path.as_deref())?;

    let oracles = Oracles::from_config(&config);
    let white = build_selector(&config.white, &oracles);
    let black = build_selector(&config.black, &oracles);
    let start = config.start_position()?;

    info!("Playing {} game(s), saving to {}", config.games, config.output_dir.display());

    for round in 1..=config.games {
        let runner = MatchRunner::new(white.clone(), black.clone())
            .with_site(config.site.clone())
            .with_round(Some(round))
            .with_max_plies(config.max_plies);

        let record = runner
            .play(start.clone())
            .await
            .with_context(|| format!("第 {} 局中止", round))?;

        let path = config.output_dir.join(pgn_filename(&record));
        let written = save_pgn(&record, &path)?;
        info!("Round {}: {} -> {}", round, record.result_token(), written.display());
    }

    Ok(())
}
