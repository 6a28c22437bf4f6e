//! Duplicate-listing detection backed by a JSON file.
//!
//! The fingerprint list is owned by a single actor, which also serializes
//! file writes. Writes go to a sibling temp file that is then renamed over
//! the cache.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::similarity::{listing_similarity, normalize};
use super::CacheError;
use crate::clients::DuplicateClient;
use crate::messages::{DuplicateRequest, ServiceResponse};

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 85.0;
pub const DEFAULT_MAX_FINGERPRINTS: usize = 5_000;
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub product_id: String,
    pub vendor_id: String,
    /// Normalized listing text.
    pub text: String,
    pub recorded_at: DateTime<Utc>,
}

impl Fingerprint {
    pub fn new(product_id: impl Into<String>, vendor_id: impl Into<String>, listing_text: &str) -> Self {
        Self {
            product_id: product_id.into(),
            vendor_id: vendor_id.into(),
            text: normalize(listing_text),
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub product_id: String,
    pub vendor_id: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCacheConfig {
    pub path: PathBuf,
    /// Minimum similarity percentage that counts as a duplicate.
    pub threshold: f64,
    pub max_entries: usize,
}

impl DuplicateCacheConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            threshold: DEFAULT_DUPLICATE_THRESHOLD,
            max_entries: DEFAULT_MAX_FINGERPRINTS,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: Vec<Fingerprint>,
}

/// Reads the cache file. A missing file is an empty cache.
pub fn load_fingerprints(path: &Path) -> Result<Vec<Fingerprint>, CacheError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(CacheError::Io(error.to_string())),
    };
    let file: CacheFile =
        serde_json::from_slice(&bytes).map_err(|error| CacheError::Serialization(error.to_string()))?;
    Ok(file.entries)
}

fn store_fingerprints(path: &Path, entries: &[Fingerprint]) -> Result<(), CacheError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|error| CacheError::Io(error.to_string()))?;
    }
    let file = CacheFile { version: CACHE_VERSION, entries: entries.to_vec() };
    let bytes =
        serde_json::to_vec_pretty(&file).map_err(|error| CacheError::Serialization(error.to_string()))?;
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);
    std::fs::write(&temp, bytes).map_err(|error| CacheError::Io(error.to_string()))?;
    std::fs::rename(&temp, path).map_err(|error| CacheError::Io(error.to_string()))
}

pub struct DuplicateCacheService {
    receiver: mpsc::Receiver<DuplicateRequest>,
    config: DuplicateCacheConfig,
    entries: Vec<Fingerprint>,
}

impl DuplicateCacheService {
    /// Loads the cache file; an unreadable file is logged and replaced on the
    /// next write.
    pub fn new(buffer_size: usize, config: DuplicateCacheConfig) -> (Self, DuplicateClient) {
        let entries = match load_fingerprints(&config.path) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(path = %config.path.display(), %error, "Duplicate cache unreadable, starting empty");
                Vec::new()
            }
        };
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, config, entries }, DuplicateClient::new(sender))
    }

    #[instrument(name = "duplicate_cache", skip(self), fields(path = %self.config.path.display()))]
    pub async fn run(mut self) {
        info!(entries = self.entries.len(), "DuplicateCacheService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                DuplicateRequest::Check { text, exclude_product_id, respond_to } => {
                    self.handle_check(text, exclude_product_id, respond_to);
                }
                DuplicateRequest::Record { fingerprint, respond_to } => {
                    self.handle_record(fingerprint, respond_to);
                }
                DuplicateRequest::Remove { product_id, respond_to } => {
                    self.handle_remove(product_id, respond_to);
                }
                DuplicateRequest::Len { respond_to } => {
                    let _ = respond_to.send(Ok(self.entries.len()));
                }
                DuplicateRequest::Shutdown => {
                    info!("DuplicateCacheService shutting down");
                    break;
                }
            }
        }
        info!("DuplicateCacheService stopped");
    }

    #[instrument(skip_all, fields(exclude = ?exclude_product_id))]
    fn handle_check(
        &self,
        text: String,
        exclude_product_id: Option<String>,
        respond_to: ServiceResponse<Option<DuplicateMatch>, CacheError>,
    ) {
        let normalized = normalize(&text);
        let best = self
            .entries
            .iter()
            .filter(|entry| Some(&entry.product_id) != exclude_product_id.as_ref())
            .map(|entry| (entry, listing_similarity(&normalized, &entry.text)))
            .filter(|(_, similarity)| *similarity >= self.config.threshold)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entry, similarity)| DuplicateMatch {
                product_id: entry.product_id.clone(),
                vendor_id: entry.vendor_id.clone(),
                similarity,
            });
        match &best {
            Some(found) => info!(product_id = %found.product_id, similarity = found.similarity, "Duplicate found"),
            None => debug!("No duplicate"),
        }
        let _ = respond_to.send(Ok(best));
    }

    #[instrument(skip_all, fields(product_id = %fingerprint.product_id))]
    fn handle_record(&mut self, fingerprint: Fingerprint, respond_to: ServiceResponse<(), CacheError>) {
        self.entries.retain(|entry| entry.product_id != fingerprint.product_id);
        self.entries.push(fingerprint);
        if self.entries.len() > self.config.max_entries {
            let overflow = self.entries.len() - self.config.max_entries;
            self.entries.drain(..overflow);
            debug!(dropped = overflow, "Oldest fingerprints dropped");
        }
        let _ = respond_to.send(self.persist());
    }

    #[instrument(skip(self, respond_to))]
    fn handle_remove(&mut self, product_id: String, respond_to: ServiceResponse<bool, CacheError>) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.product_id != product_id);
        let removed = self.entries.len() != before;
        let result = if removed { self.persist().map(|_| true) } else { Ok(false) };
        let _ = respond_to.send(result);
    }

    fn persist(&self) -> Result<(), CacheError> {
        store_fingerprints(&self.config.path, &self.entries).inspect_err(|error| {
            warn!(%error, "Failed to persist duplicate cache");
        })
    }
}
