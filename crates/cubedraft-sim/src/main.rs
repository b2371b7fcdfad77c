// Cube draft simulator entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the cube list and deal packs
// 4. Seat the bots and run the draft to completion
// 5. Write the draft record and submit it

mod packs;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use cubedraft_core::app::{DraftOutcome, DraftRunner};
use cubedraft_core::config;
use cubedraft_core::draft::{DraftSession, SeatSpec};
use cubedraft_core::notify::DraftNotifier;
use cubedraft_core::oracle::HeuristicOracle;
use cubedraft_core::protocol::DraftRecord;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("cubedraft starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} seats, {} packs of {}",
        config.draft.seats, config.draft.packs, config.draft.pack_size
    );

    // 3. Cube and packs
    let cube = packs::load_cube(Path::new(&config.data.cube))?;
    let mut rng = match config.draft.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let dealt = packs::deal_packs(cube.cards, &config.draft, &mut rng)?;

    // 4. Draft
    let cube_id = config.notify.cube_id.clone().unwrap_or(cube.id);
    let draft_id = format!("draft-{}", Utc::now().format("%Y%m%d%H%M%S"));
    let seats = (1..=config.draft.seats)
        .map(|i| SeatSpec::bot(format!("Bot {i}")))
        .collect();
    let session = DraftSession::new(
        draft_id,
        cube_id.clone(),
        seats,
        dealt,
        cube.basics,
        config.bots.default_rating,
    )
    .context("failed to start draft")?;

    let notifier = DraftNotifier::from_config(&config.notify, &cube_id);
    if notifier.is_active() {
        info!("Notifier active for cube {cube_id}");
    } else {
        info!("Notifier disabled (no base_url)");
    }

    let runner = DraftRunner::new(session, HeuristicOracle::default(), Arc::new(notifier), config.deck.clone());
    let record = match runner.all_bots_draft(false).await? {
        DraftOutcome::Finished(record) => record,
        DraftOutcome::Pending(runner) => runner.finish().await?,
    };

    // 5. Output
    write_record(&record, Path::new(&config.data.output))?;
    for seat in &record.seats {
        let main: usize = seat.deck.iter().map(Vec::len).sum();
        println!("{} ({main} cards)", seat.name);
    }
    println!("Draft record written to {}", config.data.output);
    Ok(())
}

fn write_record(record: &DraftRecord, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(record).context("failed to serialize draft record")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "draft record written");
    Ok(())
}

/// Log to `logs/cubedraft.log` so output stays readable.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("cubedraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cubedraft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    Ok(())
}
