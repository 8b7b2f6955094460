//! Shared catalog state: the current roster snapshot and the status of the load
//! producing it. At most one load may be in flight; see [CatalogState::begin_load].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures_util::stream::Stream;
use serde::Serialize;
use tokio_stream::StreamExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::catalog::loader::{load, LoadEvent, LoadProgress};
use crate::catalog::roster::filter_by_name;
use crate::catalog::source::CatalogSource;
use crate::data::Entity;
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Idle,
    Loading,
    Complete,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadStatus {
    pub state: LoadPhase,
    pub loading: bool,
    pub loaded_count: usize,
    pub manifest_len: Option<usize>,
    pub batches_done: usize,
    pub batch_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl Default for LoadStatus {
    fn default() -> Self {
        Self {
            state: LoadPhase::Idle,
            loading: false,
            loaded_count: 0,
            manifest_len: None,
            batches_done: 0,
            batch_count: 0,
            error: None,
            run_id: None,
            started_at: None,
            finished_at: None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    roster: Arc<Vec<Entity>>,
    status: LoadStatus,
}

#[derive(Debug, Default)]
pub struct CatalogState {
    inner: RwLock<Inner>,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding an already complete roster (no load involved).
    pub fn with_roster(roster: Vec<Entity>) -> Self {
        let status = LoadStatus {
            state: LoadPhase::Complete,
            loaded_count: roster.len(),
            finished_at: Some(now_rfc3339()),
            ..LoadStatus::default()
        };
        Self {
            inner: RwLock::new(Inner {
                roster: Arc::new(roster),
                status,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim the single load slot. Fails with [CatalogError::LoadInFlight] while another
    /// guard is alive. The guard owns a handle to the state, so it can be moved into a
    /// spawned task after the claim succeeds.
    pub fn begin_load(self: &Arc<Self>) -> Result<LoadGuard, CatalogError> {
        let mut inner = self.write();
        if inner.status.loading {
            return Err(CatalogError::LoadInFlight);
        }
        let run_id = Uuid::new_v4();
        inner.status = LoadStatus {
            state: LoadPhase::Loading,
            loading: true,
            loaded_count: inner.roster.len(),
            run_id: Some(run_id),
            started_at: Some(now_rfc3339()),
            ..LoadStatus::default()
        };
        Ok(LoadGuard {
            state: Arc::clone(self),
            run_id,
            settled: false,
        })
    }

    pub fn status(&self) -> LoadStatus {
        self.read().status.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().status.loading
    }

    pub fn roster(&self) -> Arc<Vec<Entity>> {
        Arc::clone(&self.read().roster)
    }

    pub fn find(&self, id: u32) -> Option<Entity> {
        self.read().roster.iter().find(|e| e.id == id).cloned()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        let name = name.trim();
        self.read()
            .roster
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Numeric keys resolve by id, anything else by exact (case-insensitive) name.
    pub fn resolve(&self, key: &str) -> Option<Entity> {
        match key.trim().parse::<u32>() {
            Ok(id) => self.find(id),
            Err(_) => self.find_by_name(key),
        }
    }

    pub fn filtered(&self, term: &str) -> Vec<Entity> {
        let roster = self.roster();
        filter_by_name(&roster, term).into_iter().cloned().collect()
    }

    /// Run a full load against `source`, publishing each batch snapshot into this state.
    /// Returns the final roster size.
    pub async fn run_load<S>(
        self: &Arc<Self>,
        source: &S,
        index_url: &str,
        batch_size: usize,
    ) -> Result<usize, CatalogError>
    where
        S: CatalogSource + ?Sized,
    {
        self.begin_load()?.run(source, index_url, batch_size).await
    }
}

async fn drive_load<E>(guard: LoadGuard, events: E) -> Result<usize, CatalogError>
where
    E: Stream<Item = LoadEvent>,
{
    tokio::pin!(events);
    while let Some(event) = events.next().await {
        match event {
            LoadEvent::Progress(progress) => guard.publish(progress),
            LoadEvent::Complete(roster) => {
                let count = roster.len();
                guard.complete(roster);
                return Ok(count);
            }
            LoadEvent::Failed(err) => {
                guard.fail(&err);
                return Err(err);
            }
        }
    }
    // the loader always ends on a terminal event; treat a bare end as completion
    let count = guard.state.read().roster.len();
    guard.complete_in_place();
    Ok(count)
}

/// Exclusive right to publish into a [CatalogState]. Dropping it without settling marks
/// the load failed and clears the loading flag.
#[derive(Debug)]
pub struct LoadGuard {
    state: Arc<CatalogState>,
    run_id: Uuid,
    settled: bool,
}

impl LoadGuard {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Drive a full load against `source` under this claim. Returns the final roster size.
    pub async fn run<S>(
        self,
        source: &S,
        index_url: &str,
        batch_size: usize,
    ) -> Result<usize, CatalogError>
    where
        S: CatalogSource + ?Sized,
    {
        let span = tracing::info_span!("catalog_load", run_id = %self.run_id);
        drive_load(self, load(source, index_url, batch_size))
            .instrument(span)
            .await
    }

    pub fn publish(&self, progress: LoadProgress) {
        let mut inner = self.state.write();
        inner.status.loaded_count = progress.loaded_count;
        inner.status.manifest_len = Some(progress.manifest_len);
        inner.status.batches_done = progress.batch_index;
        inner.status.batch_count = progress.batch_count;
        inner.roster = Arc::new(progress.roster);
    }

    pub fn complete(mut self, roster: Vec<Entity>) {
        let mut inner = self.state.write();
        inner.roster = Arc::new(roster);
        Self::settle(&mut inner, LoadPhase::Complete, None);
        self.settled = true;
    }

    fn complete_in_place(mut self) {
        let mut inner = self.state.write();
        Self::settle(&mut inner, LoadPhase::Complete, None);
        self.settled = true;
    }

    /// Terminal failure; the roster keeps whatever it held.
    pub fn fail(mut self, err: &CatalogError) {
        let mut inner = self.state.write();
        Self::settle(&mut inner, LoadPhase::Failed, Some(err.to_string()));
        self.settled = true;
    }

    fn settle(inner: &mut Inner, phase: LoadPhase, error: Option<String>) {
        inner.status.state = phase;
        inner.status.loading = false;
        inner.status.loaded_count = inner.roster.len();
        inner.status.error = error;
        inner.status.finished_at = Some(now_rfc3339());
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!(run_id = %self.run_id, "catalog load abandoned before completion");
        let mut inner = self.state.write();
        Self::settle(&mut inner, LoadPhase::Failed, Some("load abandoned".to_string()));
    }
}
