use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogSource, CatalogState, HttpCatalog};
use crate::config::Config;
use crate::data::{load_selection, Selection};
use crate::error::{AppError, CatalogError, Result};

pub mod api;
pub mod routes;

/// Everything the routes read or write.
pub struct AppState {
    pub catalog: Arc<CatalogState>,
    pub source: Arc<dyn CatalogSource>,
    pub index_url: String,
    pub batch_size: usize,
    pub language: String,
    /// When `None`, selection changes stay in memory.
    pub selection_path: Option<String>,
    selection: Mutex<Selection>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogState>,
        source: Arc<dyn CatalogSource>,
        config: &Config,
        selection_path: Option<String>,
    ) -> Self {
        let selection = selection_path
            .as_deref()
            .map(load_selection)
            .unwrap_or_default();
        Self {
            catalog,
            source,
            index_url: config.index_url(),
            batch_size: config.batch_size,
            language: config.language.clone(),
            selection_path,
            selection: Mutex::new(selection),
        }
    }

    fn lock_selection(&self) -> MutexGuard<'_, Selection> {
        self.selection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn selection_snapshot(&self) -> Selection {
        self.lock_selection().clone()
    }

    /// Apply `change`, persist, and return the resulting selection. The lock is held
    /// through the write so the file always ends on the latest snapshot.
    pub fn update_selection<F>(&self, change: F) -> Selection
    where
        F: FnOnce(&mut Selection),
    {
        let mut selection = self.lock_selection();
        change(&mut selection);
        api::persist_selection(self.selection_path.as_deref(), &selection);
        selection.clone()
    }

    /// Claim the load slot, then run the load in the background. Fails with
    /// [CatalogError::LoadInFlight] without spawning anything while another load holds it.
    pub fn spawn_load(&self) -> std::result::Result<JoinHandle<()>, CatalogError> {
        let guard = self.catalog.begin_load()?;
        let source = Arc::clone(&self.source);
        let index_url = self.index_url.clone();
        let batch_size = self.batch_size;
        Ok(tokio::spawn(async move {
            match guard.run(source.as_ref(), &index_url, batch_size).await {
                Ok(count) => tracing::info!(count, "roster ready"),
                Err(err) => tracing::error!(%err, "catalog load did not complete"),
            }
        }))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let response = routes::route_request(&state, method.as_str(), path, &body).await;
    if response.status_code >= 500 {
        tracing::error!(%method, path, status = response.status_code, "request failed");
    } else {
        tracing::debug!(%method, path, status = response.status_code, "request served");
    }
    response.into_response()
}

pub async fn serve(state: Arc<AppState>, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("dexvs server listening on http://{bind_addr}");
    if let Err(err) = state.spawn_load() {
        tracing::warn!(%err, "initial catalog load not started");
    }
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub fn run_server(config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let source = HttpCatalog::new(config.timeout).map_err(|e| AppError::Client(e.to_string()))?;
        let state = Arc::new(AppState::new(
            Arc::new(CatalogState::new()),
            Arc::new(source),
            config,
            Some(config.selection_path.clone()),
        ));
        serve(state, &config.bind_addr).await
    })
}
