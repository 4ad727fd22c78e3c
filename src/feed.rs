use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::config::DataSource;
use crate::snapshot_fetch;
use crate::state::{Delta, ProviderCommand};

/// Background provider. Each refresh runs as its own job so a slow load never
/// blocks a newer one; the UI decides which result wins by generation.
pub fn spawn_provider(
    source: DataSource,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let pool = build_fetch_pool();
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Refresh { generation } => {
                    let tx = tx.clone();
                    let source = source.clone();
                    let job = move || run_refresh(&source, generation, &tx);
                    if let Some(pool) = pool.as_ref() {
                        pool.spawn(job);
                    } else {
                        thread::spawn(job);
                    }
                }
            }
        }
        info!("provider command channel closed");
    })
}

pub fn run_refresh(source: &DataSource, generation: u64, tx: &Sender<Delta>) {
    let _ = tx.send(Delta::Log(format!(
        "[INFO] Refresh #{generation} from {}",
        source.describe()
    )));
    match snapshot_fetch::load_dataset(source, generation) {
        Ok(dataset) => {
            let _ = tx.send(Delta::DatasetLoaded(Box::new(dataset)));
        }
        Err(err) => {
            warn!(generation, error = %err, "dataset load failed");
            let _ = tx.send(Delta::LoadFailed {
                generation,
                error: err.to_string(),
            });
        }
    }
}

fn build_fetch_pool() -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(fetch_parallelism())
        .thread_name(|idx| format!("spotstats-fetch-{idx}"))
        .build()
        .ok()
}

fn fetch_parallelism() -> usize {
    env::var("SPOTSTATS_FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(4)
        .clamp(2, 16)
}
