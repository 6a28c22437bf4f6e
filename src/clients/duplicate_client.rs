use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::ai::{CacheError, DuplicateMatch, Fingerprint};
use crate::messages::DuplicateRequest;

/// Client for the duplicate-listing cache.
#[derive(Clone)]
pub struct DuplicateClient {
    sender: mpsc::Sender<DuplicateRequest>,
}

impl DuplicateClient {
    pub fn new(sender: mpsc::Sender<DuplicateRequest>) -> Self {
        Self { sender }
    }

    /// Stops the cache actor after the requests already queued.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CacheError> {
        debug!("Sending request");
        self.sender
            .send(DuplicateRequest::Shutdown)
            .await
            .map_err(|_| CacheError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(DuplicateClient => fn check(text: String, exclude_product_id: Option<String>) -> Option<DuplicateMatch> as DuplicateRequest::Check, Error = CacheError);
client_method!(DuplicateClient => fn record(fingerprint: Fingerprint) -> () as DuplicateRequest::Record, Error = CacheError);
client_method!(DuplicateClient => fn remove(product_id: String) -> bool as DuplicateRequest::Remove, Error = CacheError);
client_method!(DuplicateClient => fn entry_count() -> usize as DuplicateRequest::Len, Error = CacheError);
