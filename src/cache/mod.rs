mod file;
mod memory;
mod remote;

use std::collections::HashMap;

use async_trait::async_trait;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use remote::RemoteCache;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::SemesterId;

/// Persisted mapping from course description to the last-seen grade, keyed
/// by semester. Read once per run before diffing, written back once after;
/// `set` has full-replace semantics.
#[async_trait]
pub trait CacheStore {
    /// Returns the stored mapping for the semester, empty if none exists.
    async fn get(&self, semester: &SemesterId) -> Result<HashMap<String, String>>;

    /// Replaces the semester's entry with the given mapping.
    async fn set(&mut self, semester: &SemesterId, grades: &HashMap<String, String>) -> Result<()>;

    /// Removes every entry this store is responsible for.
    async fn flush(&mut self) -> Result<()>;
}

pub fn build(config: &CacheConfig) -> Result<Box<dyn CacheStore>> {
    Ok(match config {
        CacheConfig::Memory => Box::new(MemoryCache::new()),
        CacheConfig::File { path } => Box::new(FileCache::new(path)?),
        CacheConfig::Remote { url, namespace } => {
            Box::new(RemoteCache::new(url.clone(), namespace.clone())?)
        }
    })
}
