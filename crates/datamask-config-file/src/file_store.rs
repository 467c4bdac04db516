//! File-based RuleStore implementation

use async_trait::async_trait;
use futures::stream;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info, warn};

use datamask_core::{
    Error, MaskingRule, MaskingStrategy, PiiType, Result,
    rule_store::{RuleChange, RuleChangeStream, RuleStore, upsert_rule},
};

use crate::catalog::{CatalogFormat, RuleCatalog};

/// File-based masking rule catalog
///
/// Keeps a validated snapshot of the catalog in memory, rewrites the file on
/// every change and can watch it for external edits using the `notify` crate.
#[derive(Debug)]
pub struct FileRuleStore {
    /// Path to the catalog file
    catalog_path: PathBuf,
    format: CatalogFormat,
    snapshot: Arc<RwLock<RuleCatalog>>,
    /// Catalog version counter (incremented on each write or reload)
    version: Arc<AtomicU32>,
}

impl FileRuleStore {
    /// Open a catalog file
    ///
    /// # Arguments
    /// * `catalog_path` - Path to a YAML or TOML catalog; `~` is expanded
    ///
    /// # Errors
    /// - `Error::ConfigNotFound` if the file doesn't exist
    /// - `Error::Config` if the file can't be parsed
    /// - `Error::ConfigValidation` if the rules violate catalog invariants
    pub async fn new(catalog_path: impl Into<PathBuf>) -> Result<Self> {
        let catalog_path = expand_home(catalog_path.into())?;

        if !catalog_path.exists() {
            return Err(Error::ConfigNotFound);
        }

        let format = CatalogFormat::from_path(&catalog_path);
        let catalog = RuleCatalog::load(&catalog_path)?;

        info!(
            "Loaded {} masking rules from {:?}",
            catalog.rules.len(),
            catalog_path
        );

        Ok(Self {
            catalog_path,
            format,
            snapshot: Arc::new(RwLock::new(catalog)),
            version: Arc::new(AtomicU32::new(1)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn version(&self) -> u32 {
        self.version.load(Ordering::SeqCst)
    }

    /// Re-read the file, replacing the snapshot only if it is valid
    pub async fn reload(&self) -> Result<()> {
        let catalog = RuleCatalog::load(&self.catalog_path)?;
        *self.snapshot.write().await = catalog;
        self.version.fetch_add(1, Ordering::SeqCst);
        info!("Reloaded rule catalog {:?}", self.catalog_path);
        Ok(())
    }

    /// Write the catalog to disk
    fn write_catalog(&self, catalog: &RuleCatalog) -> Result<()> {
        let contents = catalog.render(self.format)?;

        std::fs::write(&self.catalog_path, contents).map_err(|e| {
            error!("Failed to write rule catalog: {}", e);
            Error::Io(e)
        })?;

        self.version.fetch_add(1, Ordering::SeqCst);

        debug!("Successfully wrote rule catalog");
        Ok(())
    }
}

fn expand_home(path: PathBuf) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?
            .join(rest)),
        Err(_) => Ok(path),
    }
}

#[async_trait]
impl RuleStore for FileRuleStore {
    async fn find_active_by_pii_type(&self, pii_type: PiiType) -> Result<Option<MaskingRule>> {
        Ok(self.snapshot.read().await.active_for(pii_type))
    }

    async fn find_by_pii_type(&self, pii_type: PiiType) -> Result<Vec<MaskingRule>> {
        Ok(self.snapshot.read().await.by_pii_type(pii_type))
    }

    async fn find_all_active(&self) -> Result<Vec<MaskingRule>> {
        Ok(self.snapshot.read().await.all_active())
    }

    async fn find_by_strategy(&self, strategy: MaskingStrategy) -> Result<Vec<MaskingRule>> {
        Ok(self.snapshot.read().await.by_strategy(strategy))
    }

    async fn find_all(&self) -> Result<Vec<MaskingRule>> {
        Ok(self.snapshot.read().await.sorted_by_id())
    }

    async fn save(&self, rule: MaskingRule) -> Result<MaskingRule> {
        let mut snapshot = self.snapshot.write().await;

        // Stage the change so a failed write leaves the snapshot untouched
        let mut staged = snapshot.clone();
        let stored = upsert_rule(&mut staged.rules, rule)?;
        self.write_catalog(&staged)?;
        *snapshot = staged;

        info!(id = stored.id, pii_type = %stored.pii_type, "Saved masking rule");
        Ok(stored)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let mut snapshot = self.snapshot.write().await;

        let mut staged = snapshot.clone();
        staged.remove(id)?;
        self.write_catalog(&staged)?;
        *snapshot = staged;

        info!(id, "Deleted masking rule");
        Ok(())
    }

    async fn watch_changes(&self) -> Result<RuleChangeStream<'_>> {
        // Create a channel for file system events
        let (tx, rx) = mpsc::channel(100);

        let catalog_path = self.catalog_path.clone();
        let snapshot = self.snapshot.clone();
        let version = self.version.clone();

        // Spawn watcher in a blocking task
        tokio::task::spawn_blocking(move || {
            let (notify_tx, notify_rx) = std::sync::mpsc::channel();

            // std::result::Result, not the crate alias
            let mut watcher = match RecommendedWatcher::new(
                move |res: std::result::Result<Event, notify::Error>| {
                    if let Err(e) = notify_tx.send(res) {
                        error!("Failed to send file watch event: {}", e);
                    }
                },
                notify::Config::default(),
            ) {
                Ok(w) => w,
                Err(e) => {
                    error!("Failed to create file watcher: {}", e);
                    return;
                }
            };

            if let Err(e) = watcher.watch(&catalog_path, RecursiveMode::NonRecursive) {
                error!("Failed to watch rule catalog: {}", e);
                return;
            }

            info!("Watching rule catalog for changes: {:?}", catalog_path);

            while let Ok(event_result) = notify_rx.recv() {
                let item = match event_result {
                    Ok(event) if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) => {
                        match RuleCatalog::load(&catalog_path) {
                            Ok(catalog) => {
                                *snapshot.blocking_write() = catalog;
                                let version = version.fetch_add(1, Ordering::SeqCst) + 1;
                                info!(version, "Rule catalog changed on disk, snapshot reloaded");
                                Ok(RuleChange {
                                    timestamp: chrono::Utc::now(),
                                    version,
                                })
                            }
                            Err(e) => {
                                // Keep serving the last good snapshot
                                warn!("Ignoring invalid rule catalog on disk: {}", e);
                                Err(e)
                            }
                        }
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("File watch error: {}", e);
                        Err(Error::Internal(format!("File watch error: {}", e)))
                    }
                };

                if tx.blocking_send(item).is_err() {
                    debug!("Rule change stream closed, stopping watcher");
                    break;
                }
            }
        });

        // Convert mpsc receiver to stream
        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });

        Ok(Box::pin(stream))
    }
}
