mod memory;
mod supabase;

pub use memory::MemoryContactStore;
pub use supabase::SupabaseContactStore;

use crate::cli::{ configured, Args };
use crate::models::contact::ContactRecord;
use async_trait::async_trait;
use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Persists one submission. Returns the identifier assigned by the store
    /// when it reports one.
    async fn insert(
        &self,
        record: &ContactRecord
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;
}

/// Stand-in for a backend that is selected but missing credentials. Every
/// insert fails so the lost submission shows up in the logs.
pub struct DisabledContactStore {
    reason: String,
}

impl DisabledContactStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl ContactStore for DisabledContactStore {
    async fn insert(
        &self,
        _record: &ContactRecord
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        Err(format!("Contact store unavailable: {}", self.reason).into())
    }
}

pub fn create_contact_store(
    args: &Args
) -> Result<Arc<dyn ContactStore>, Box<dyn Error + Send + Sync>> {
    match args.store_type.to_lowercase().as_str() {
        "supabase" => {
            match (configured(&args.supabase_url), configured(&args.supabase_key)) {
                (Some(url), Some(key)) => {
                    let store = SupabaseContactStore::new(url, key, &args.supabase_table)?;
                    info!("Contact submissions will be stored in Supabase table '{}'", args.supabase_table);
                    Ok(Arc::new(store))
                }
                _ => {
                    warn!("SUPABASE_URL or SUPABASE_KEY not set. Contact submissions will not be persisted.");
                    Ok(Arc::new(DisabledContactStore::new("Supabase credentials not configured")))
                }
            }
        }
        "memory" => {
            warn!("Contact submissions are kept in memory only. They are never evicted and are lost on restart.");
            Ok(Arc::new(MemoryContactStore::new()))
        }
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported contact store type: {}", args.store_type)
                    )
                )
            ),
    }
}
