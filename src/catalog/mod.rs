pub mod batch;
pub mod detail;
pub mod loader;
pub mod roster;
pub mod source;
pub mod state;

pub use batch::{batch_ranges, DEFAULT_BATCH_SIZE};
pub use detail::{fetch_detail, DetailView};
pub use loader::{fetch_batch, load, load_catalog, LoadEvent, LoadProgress};
pub use roster::{filter_by_name, RosterBuilder};
pub use source::{
    entity_url, index_url, CatalogSource, HttpCatalog, StaticCatalog, DEFAULT_API_BASE,
    DEFAULT_INDEX_LIMIT,
};
pub use state::{CatalogState, LoadGuard, LoadPhase, LoadStatus};
