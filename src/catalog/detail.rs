//! Detail view: an entity plus its species description and flattened evolution chain.
//! Species and evolution data are best-effort; their failures degrade the view, never abort it.

use serde::Serialize;

use crate::catalog::source::CatalogSource;
use crate::data::{flatten_chain, Entity, EvolutionStage, NO_DESCRIPTION};

#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub entity: Entity,
    pub image: Option<String>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub description: String,
    pub evolutions: Vec<EvolutionStage>,
}

pub async fn fetch_detail<S>(source: &S, entity: Entity, language: &str) -> DetailView
where
    S: CatalogSource + ?Sized,
{
    let mut description = None;
    let mut evolutions = Vec::new();

    let species_url = entity
        .species
        .as_ref()
        .map(|s| s.url.clone())
        .filter(|url| !url.is_empty());

    match species_url {
        None => tracing::debug!(id = entity.id, "entity has no species link"),
        Some(url) => match source.fetch_species(&url).await {
            Err(err) => tracing::warn!(id = entity.id, %err, "species fetch failed"),
            Ok(species) => {
                description = species.description(language);
                if let Some(chain_url) = species.evolution_chain_url() {
                    match source.fetch_evolution_chain(chain_url).await {
                        Ok(chain) => evolutions = flatten_chain(&chain.chain),
                        Err(err) => {
                            tracing::warn!(id = entity.id, %err, "evolution chain fetch failed");
                        }
                    }
                }
            }
        },
    }

    DetailView {
        image: entity.image().map(str::to_string),
        height_m: entity.height_m(),
        weight_kg: entity.weight_kg(),
        description: description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        evolutions,
        entity,
    }
}
