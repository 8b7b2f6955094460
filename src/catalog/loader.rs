//! Batched catalog load: index once, then fixed-size batches of concurrent detail
//! fetches folded into a deduplicated roster.
//!
//! Batches run strictly one after another; the requests inside a batch run
//! concurrently. Progress is observable only between batches.

use futures_util::future::join_all;
use futures_util::stream::{self, Stream};
use tokio_stream::StreamExt;

use crate::catalog::batch::batch_ranges;
use crate::catalog::roster::RosterBuilder;
use crate::catalog::source::CatalogSource;
use crate::data::{Entity, IndexEntry};
use crate::error::{CatalogError, FetchError};

/// Snapshot emitted after every batch. `roster` only ever grows between snapshots.
#[derive(Debug, Clone)]
pub struct LoadProgress {
    /// 1-based index of the batch that just settled.
    pub batch_index: usize,
    pub batch_count: usize,
    pub manifest_len: usize,
    pub loaded_count: usize,
    pub roster: Vec<Entity>,
}

#[derive(Debug)]
pub enum LoadEvent {
    Progress(LoadProgress),
    Complete(Vec<Entity>),
    Failed(CatalogError),
}

impl LoadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

enum Phase {
    Index,
    Batches {
        manifest: Vec<IndexEntry>,
        ranges: std::vec::IntoIter<(usize, usize)>,
        batch_count: usize,
        builder: RosterBuilder,
    },
    Finished,
}

struct LoadRun<'a, S: ?Sized> {
    source: &'a S,
    index_url: String,
    batch_size: usize,
    phase: Phase,
}

impl<S> LoadRun<'_, S>
where
    S: CatalogSource + ?Sized,
{
    async fn step(&mut self) -> Option<LoadEvent> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Finished) {
                Phase::Index => match self.source.fetch_index(&self.index_url).await {
                    Ok(page) => {
                        let ranges = batch_ranges(page.results.len(), self.batch_size);
                        tracing::info!(
                            entries = page.results.len(),
                            batches = ranges.len(),
                            batch_size = self.batch_size,
                            "catalog manifest fetched"
                        );
                        self.phase = Phase::Batches {
                            manifest: page.results,
                            batch_count: ranges.len(),
                            ranges: ranges.into_iter(),
                            builder: RosterBuilder::new(),
                        };
                    }
                    Err(err) => {
                        tracing::error!(url = %self.index_url, %err, "catalog index fetch failed");
                        return Some(LoadEvent::Failed(CatalogError::Index(err)));
                    }
                },
                Phase::Batches {
                    manifest,
                    mut ranges,
                    batch_count,
                    mut builder,
                } => {
                    let Some((start, end)) = ranges.next() else {
                        tracing::info!(loaded = builder.len(), "catalog load complete");
                        return Some(LoadEvent::Complete(builder.into_roster()));
                    };
                    let results = fetch_batch(self.source, &manifest[start..end]).await;
                    let requested = results.len();
                    let added = builder.append_deduped(results);
                    let batch_index = batch_count - ranges.len();
                    tracing::debug!(batch_index, batch_count, requested, added, "batch settled");

                    let progress = LoadProgress {
                        batch_index,
                        batch_count,
                        manifest_len: manifest.len(),
                        loaded_count: builder.len(),
                        roster: builder.roster().to_vec(),
                    };
                    self.phase = Phase::Batches {
                        manifest,
                        ranges,
                        batch_count,
                        builder,
                    };
                    return Some(LoadEvent::Progress(progress));
                }
                Phase::Finished => return None,
            }
        }
    }
}

/// Issue one detail request per manifest entry concurrently and wait for all of them.
/// Results come back in manifest order, failures included.
pub async fn fetch_batch<S>(source: &S, entries: &[IndexEntry]) -> Vec<Result<Entity, FetchError>>
where
    S: CatalogSource + ?Sized,
{
    join_all(entries.iter().map(|entry| source.fetch_entity(&entry.url))).await
}

/// Lazy load: nothing is fetched until the stream is polled, and every call starts a
/// fresh run. Yields one [LoadEvent::Progress] per batch, then exactly one terminal
/// [LoadEvent::Complete] or [LoadEvent::Failed].
pub fn load<'a, S>(
    source: &'a S,
    index_url: &str,
    batch_size: usize,
) -> impl Stream<Item = LoadEvent> + 'a
where
    S: CatalogSource + ?Sized,
{
    let run = LoadRun {
        source,
        index_url: index_url.to_string(),
        batch_size: batch_size.max(1),
        phase: Phase::Index,
    };
    stream::unfold(run, |mut run| async move {
        let event = run.step().await?;
        Some((event, run))
    })
}

/// Drive [load] to completion, invoking `on_progress` after every batch.
pub async fn load_catalog<S, F>(
    source: &S,
    index_url: &str,
    batch_size: usize,
    mut on_progress: F,
) -> Result<Vec<Entity>, CatalogError>
where
    S: CatalogSource + ?Sized,
    F: FnMut(&LoadProgress),
{
    let events = load(source, index_url, batch_size);
    tokio::pin!(events);
    let mut roster = Vec::new();
    while let Some(event) = events.next().await {
        match event {
            LoadEvent::Progress(progress) => on_progress(&progress),
            LoadEvent::Complete(done) => roster = done,
            LoadEvent::Failed(err) => return Err(err),
        }
    }
    Ok(roster)
}
