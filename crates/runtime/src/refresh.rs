//! The daemon's refresh loop: select a tip, write it, sleep, repeat.
//!
//! Shutdown is a `watch` flag.  It is checked at the top of every cycle and
//! raced against the sleep, so a signal arriving mid-sleep ends the loop
//! promptly while a signal arriving mid-write lets the write finish first.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use tipline_config::AppConfig;

use crate::context::{CONTEXT_DIR_ENV, ContextDetector};
use crate::selector::select_tip;
use crate::store::{CacheStore, StoreError};

/// Where the detector looks each cycle.
#[derive(Debug, Clone)]
pub enum ContextSource {
    /// A fixed directory.
    Fixed(PathBuf),
    /// `TIPLINE_CONTEXT_DIR` if set, else the process working directory,
    /// resolved fresh every cycle.
    Ambient,
}

impl ContextSource {
    fn resolve(&self) -> std::io::Result<PathBuf> {
        match self {
            ContextSource::Fixed(dir) => Ok(dir.clone()),
            ContextSource::Ambient => match env::var_os(CONTEXT_DIR_ENV) {
                Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
                _ => env::current_dir(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefreshLoop {
    config: AppConfig,
    store: CacheStore,
    source: ContextSource,
    interval: Duration,
}

impl RefreshLoop {
    pub fn new(config: AppConfig, store: CacheStore) -> Self {
        let interval = config.refresh_interval();
        Self {
            config,
            store,
            source: ContextSource::Ambient,
            interval,
        }
    }

    pub fn with_context_source(mut self, source: ContextSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Select one tip and persist it.  When the context directory cannot be
    /// resolved the draw is uniform over the whole catalog.
    pub fn refresh_once(&self) -> Result<&'static str, StoreError> {
        let facts = match self.source.resolve() {
            Ok(dir) => Some(ContextDetector::from_config(&self.config, dir).detect()),
            Err(err) => {
                debug!(%err, "context directory unavailable; using uniform selection");
                None
            }
        };

        let tip = select_tip(facts.as_ref(), &mut rand::rng());
        self.store.write(tip)?;
        Ok(tip)
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    /// Returns the number of completed cycles.
    ///
    /// Failing to create the cache directory on the first cycle is fatal;
    /// later write failures are logged and retried next cycle.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<u64, StoreError> {
        self.store.ensure_dir()?;
        info!(
            cache = %self.store.cache_file().display(),
            interval_secs = self.interval.as_secs(),
            "refresh loop started"
        );

        let mut cycles = 0u64;
        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.refresh_once() {
                Ok(tip) => {
                    cycles += 1;
                    debug!(cycles, tip, "tip refreshed");
                }
                Err(err) => warn!(%err, "tip refresh failed"),
            }

            if sleep_or_shutdown(self.interval, &mut shutdown).await {
                break;
            }
        }

        info!(cycles, "refresh loop stopped");
        Ok(cycles)
    }
}

/// Sleep the full interval unless shutdown is requested first.  Returns
/// `true` on shutdown.  A change back to `false` keeps the same deadline.
async fn sleep_or_shutdown(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}
