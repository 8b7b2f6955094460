//! Remote catalog access.
//!
//! [CatalogSource] is the seam between the loader and the network: [HttpCatalog] talks
//! to the real service, [StaticCatalog] answers from pre-registered JSON documents.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::data::{Entity, EvolutionChain, IndexPage, Species};
use crate::error::FetchError;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

/// Size of the full roster manifest requested from the index resource.
pub const DEFAULT_INDEX_LIMIT: u32 = 1302;

pub fn index_url(base: &str, limit: u32) -> String {
    format!("{}/pokemon?limit={limit}", base.trim_end_matches('/'))
}

/// Detail URL for a name or numeric id.
pub fn entity_url(base: &str, key: &str) -> String {
    format!(
        "{}/pokemon/{}",
        base.trim_end_matches('/'),
        key.trim().to_lowercase()
    )
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_index(&self, url: &str) -> Result<IndexPage, FetchError>;

    async fn fetch_entity(&self, url: &str) -> Result<Entity, FetchError>;

    async fn fetch_species(&self, url: &str) -> Result<Species, FetchError>;

    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChain, FetchError>;
}

/// reqwest-backed client for the live catalog.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dexvs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_index(&self, url: &str) -> Result<IndexPage, FetchError> {
        self.get_json(url).await
    }

    async fn fetch_entity(&self, url: &str) -> Result<Entity, FetchError> {
        self.get_json(url).await
    }

    async fn fetch_species(&self, url: &str) -> Result<Species, FetchError> {
        self.get_json(url).await
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChain, FetchError> {
        self.get_json(url).await
    }
}

/// In-memory catalog keyed by URL. Unknown URLs answer [FetchError::NotFound];
/// URLs registered with [StaticCatalog::fail] answer HTTP 500.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    documents: HashMap<String, serde_json::Value>,
    failing: HashMap<String, u16>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, document: serde_json::Value) -> &mut Self {
        self.documents.insert(url.into(), document);
        self
    }

    pub fn fail(&mut self, url: impl Into<String>, status: u16) -> &mut Self {
        self.failing.insert(url.into(), status);
        self
    }

    fn decode<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        if let Some(status) = self.failing.get(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            });
        }
        let document = self
            .documents
            .get(url)
            .ok_or_else(|| FetchError::NotFound(url.to_string()))?;
        T::deserialize(document).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_index(&self, url: &str) -> Result<IndexPage, FetchError> {
        self.decode(url)
    }

    async fn fetch_entity(&self, url: &str) -> Result<Entity, FetchError> {
        self.decode(url)
    }

    async fn fetch_species(&self, url: &str) -> Result<Species, FetchError> {
        self.decode(url)
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChain, FetchError> {
        self.decode(url)
    }
}
