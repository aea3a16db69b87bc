use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use urlencoding::encode;

use crate::cache::CacheStore;
use crate::error::{Error, Result};
use crate::models::SemesterId;

// Lists every semester key this store has written, so flush can stay scoped
// to its own namespace instead of wiping the whole store.
const INDEX_KEY: &str = "__index";

/// HTTP key-value backend: one JSON blob per semester under
/// `<base>/<namespace>/<key>`. Unknown or missing keys read as an empty
/// mapping, so there is no schema versioning to negotiate.
#[derive(Debug)]
pub struct RemoteCache {
    client: Client,
    base: String,
    namespace: String,
}

impl RemoteCache {
    pub fn new(url: Url, namespace: String) -> Result<Self> {
        let client = Client::builder().build()?;
        let base = url.as_str().trim_end_matches('/').to_string();
        Ok(Self { client, base, namespace })
    }

    fn key_url(&self, key: &str) -> Result<Url> {
        let raw = format!("{}/{}/{}", self.base, self.namespace, encode(key));
        Url::parse(&raw)
            .map_err(|e| Error::CacheCorruption(format!("invalid store key {key:?}: {e}")))
    }

    async fn fetch_json<T: serde::de::DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let response = self.client.get(self.key_url(key)?).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(T::default());
        }
        if !response.status().is_success() {
            return Err(Error::CacheCorruption(format!(
                "remote store answered {} for key {key:?}",
                response.status()
            )));
        }
        let body = response.text().await?;
        // Undecipherable blobs read as empty rather than failing the run.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn store_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let response = self.client.put(self.key_url(key)?).json(value).send().await?;
        if !response.status().is_success() {
            return Err(Error::CacheCorruption(format!(
                "remote store refused write for key {key:?}: {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RemoteCache {
    async fn get(&self, semester: &SemesterId) -> Result<HashMap<String, String>> {
        self.fetch_json(semester.as_str()).await
    }

    async fn set(&mut self, semester: &SemesterId, grades: &HashMap<String, String>) -> Result<()> {
        self.store_json(semester.as_str(), grades).await?;

        let mut index: Vec<String> = self.fetch_json(INDEX_KEY).await?;
        if !index.iter().any(|key| key == semester.as_str()) {
            index.push(semester.as_str().to_string());
            self.store_json(INDEX_KEY, &index).await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        let index: Vec<String> = self.fetch_json(INDEX_KEY).await?;
        for key in &index {
            self.client.delete(self.key_url(key)?).send().await?;
        }
        self.client.delete(self.key_url(INDEX_KEY)?).send().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_and_escaped() {
        let cache = RemoteCache::new(
            Url::parse("https://kv.example.com/store/").unwrap(),
            "gradewatch".into(),
        )
        .unwrap();
        let url = cache.key_url("Herbst-2013-14").unwrap();
        assert_eq!(url.as_str(), "https://kv.example.com/store/gradewatch/Herbst-2013-14");
    }
}
