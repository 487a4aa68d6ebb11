use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use surface_adapter::{compose_view, event_channel, PlatformAdapter};
use surface_adapter_glance::GlanceAdapter;
use surface_adapter_notify::NotifyAdapter;
use surface_cache::{HttpImageFetcher, ImageCacheManager};
use surface_core::model::StoredSurface;
use surface_core::rotation::{InteractionEvent, InteractionKind, RotationState};
use surface_core::validate;
use surface_session::{drive_events, SurfaceSessionManager};
use surface_store::{get_json, keys, FsSharedStore, SharedStateStore};

#[derive(Parser)]
#[command(name = "surfacectl", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a payload file and print what the surface would show
    Validate {
        #[arg(long)]
        file: String,
    },

    /// Run one full session cycle against a container directory
    Run {
        #[arg(long)]
        file: String,
        #[arg(long)]
        container: String,
        /// Adapter variant: glance or notify
        #[arg(long, default_value = "glance")]
        adapter: String,
        /// Simulated next-taps after the session starts
        #[arg(long, default_value_t = 0)]
        rotate: u32,
        /// Second payload pushed as a content refresh after the taps
        #[arg(long)]
        update_file: Option<String>,
    },

    /// Print the surface document and rotation index from a container
    Show {
        #[arg(long)]
        container: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Validate { file } => {
            let raw = tokio::fs::read_to_string(&file).await.context("read payload")?;
            let payload = validate::validate(&raw)?;
            println!("payload ok: {} tile(s)", payload.tile_count());
            for (slot, url) in payload.image_slots() {
                println!("  image {slot}: {url}");
            }
            if payload.is_empty() {
                println!("  (empty payload; surface would show the empty state)");
            }
        }
        Command::Run {
            file,
            container,
            adapter,
            rotate,
            update_file,
        } => {
            let raw = tokio::fs::read_to_string(&file).await.context("read payload")?;
            let payload = validate::validate(&raw)?;

            let store: Arc<dyn SharedStateStore> =
                Arc::new(FsSharedStore::open(container.as_str())?);
            let (sink, source) = event_channel();
            let adapter: Arc<dyn PlatformAdapter> = match adapter.as_str() {
                "glance" => Arc::new(GlanceAdapter::new(store.clone(), sink)),
                "notify" => Arc::new(NotifyAdapter::new(store.clone(), sink)),
                other => anyhow::bail!("unknown adapter: {other}"),
            };
            let fetcher = HttpImageFetcher::new(Duration::from_secs(10))?;
            let manager = Arc::new(SurfaceSessionManager::new(
                store.clone(),
                ImageCacheManager::new(Arc::new(fetcher)),
                adapter,
            ));
            tokio::spawn(drive_events(manager.clone(), source));

            let session_id = manager.start(payload).await?;
            for _ in 0..rotate {
                manager.handle_event(InteractionEvent {
                    session_id: session_id.clone(),
                    kind: InteractionKind::Next,
                });
            }

            if let Some(path) = update_file {
                let raw = tokio::fs::read_to_string(&path).await.context("read update payload")?;
                manager.update(validate::validate(&raw)?).await?;
            }

            let stored: StoredSurface = get_json(store.as_ref(), keys::SURFACE_DOC)?
                .context("no surface document after start")?;
            let index: u32 = get_json(store.as_ref(), keys::ROTATION_INDEX)?.unwrap_or(0);
            let view = compose_view(
                &session_id,
                &stored,
                RotationState {
                    current_index: index,
                },
                store.as_ref(),
            );
            println!("{}", serde_json::to_string_pretty(&view)?);

            manager.end();
        }
        Command::Show { container } => {
            let store = FsSharedStore::open(container.as_str())?;
            match get_json::<StoredSurface>(&store, keys::SURFACE_DOC)? {
                Some(stored) => {
                    println!("{}", serde_json::to_string_pretty(&stored)?);
                    let index: u32 = get_json(&store, keys::ROTATION_INDEX)?.unwrap_or(0);
                    println!("rotation index: {index}");
                }
                None => println!("no surface document in {container}"),
            }
        }
    }

    Ok(())
}
