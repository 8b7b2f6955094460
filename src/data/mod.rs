pub mod entity;
pub mod evolution;
pub mod selection;
pub mod species;

pub use entity::{
    AbilitySlot, Entity, EntitySummary, IndexEntry, IndexPage, NamedResource, Sprites, Stat,
    StatName, TypeSlot,
};
pub use evolution::{flatten_chain, ChainLink, EvolutionChain, EvolutionStage};
pub use selection::{load_selection, save_selection, Selection, SelectionSide};
pub use species::{Species, DEFAULT_LANGUAGE, NO_DESCRIPTION};

/// Numeric id from the trailing path segment of a catalog URL
/// (`.../pokemon-species/25/` -> 25).
pub fn resource_id(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}
