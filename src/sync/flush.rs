use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::cache::ContentCache;
use crate::store::SharedStore;

/// Periodically persists dirty cached documents to durable storage.
///
/// Best-effort eventual persistence: a failed write leaves the document dirty
/// for the next cycle, and the cache stays authoritative throughout. The
/// data-loss window on a crash equals the flush interval.
pub struct FlushScheduler {
    cache: Arc<ContentCache>,
    store: SharedStore,
    interval: Duration,
}

impl FlushScheduler {
    pub fn new(cache: Arc<ContentCache>, store: SharedStore, interval: Duration) -> Self {
        Self {
            cache,
            store,
            interval,
        }
    }

    /// Run until `shutdown` flips, flushing once more on the way out.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately
        ticker.tick().await;

        info!("Flush scheduler running every {:?}", self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.flush_once().await;
                }
                _ = shutdown.changed() => {
                    info!("Flush scheduler draining before shutdown");
                    self.flush_once().await;
                    return;
                }
            }
        }
    }

    /// Persist every currently-dirty document. Returns how many were written.
    pub async fn flush_once(&self) -> usize {
        let dirty = self.cache.dirty_snapshot();
        if dirty.is_empty() {
            return 0;
        }
        info!("Syncing {} dirty document(s) to storage", dirty.len());

        let mut flushed = 0;
        for doc_id in dirty {
            let Some(content) = self.cache.get(&doc_id) else {
                warn!(
                    "Document {} is marked dirty but has no cached content, skipping",
                    doc_id
                );
                continue;
            };
            match self.store.save_content(&doc_id, &content).await {
                Ok(()) => {
                    // An edit racing in during the write may have its marker
                    // cleared here; the cache stays authoritative and the
                    // next edit re-marks.
                    self.cache.clear_dirty(&doc_id);
                    debug!("Document {} synced", doc_id);
                    flushed += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to sync document {}: {}, will retry next cycle",
                        doc_id, e
                    );
                }
            }
        }
        flushed
    }
}
