use std::collections::HashMap;

use async_trait::async_trait;

use crate::cache::CacheStore;
use crate::error::Result;
use crate::models::SemesterId;

/// Process-local cache. State does not survive the process, so every run
/// starts from an empty slate; useful for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    semesters: HashMap<SemesterId, HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, semester: &SemesterId) -> Result<HashMap<String, String>> {
        Ok(self.semesters.get(semester).cloned().unwrap_or_default())
    }

    async fn set(&mut self, semester: &SemesterId, grades: &HashMap<String, String>) -> Result<()> {
        self.semesters.insert(semester.clone(), grades.clone());
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.semesters.clear();
        Ok(())
    }
}
