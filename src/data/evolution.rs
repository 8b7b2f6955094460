//! Evolution chains: the recursive catalog tree and its flattened, parent-first form.

use serde::{Deserialize, Serialize};

use crate::data::entity::NamedResource;
use crate::data::resource_id;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionDetail {
    #[serde(default)]
    pub trigger: Option<NamedResource>,
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(default)]
    pub item: Option<NamedResource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionChain {
    #[serde(default)]
    pub id: Option<u32>,
    pub chain: ChainLink,
}

/// One stage of a flattened chain. Trigger, level and item come from the first
/// evolution detail of the link, i.e. how this stage is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvolutionStage {
    pub name: String,
    pub id: u32,
    pub trigger: Option<String>,
    pub level: Option<u32>,
    pub item: Option<String>,
}

impl From<&ChainLink> for EvolutionStage {
    fn from(link: &ChainLink) -> Self {
        let detail = link.evolution_details.first();
        Self {
            name: link.species.name.clone(),
            id: resource_id(&link.species.url).unwrap_or(0),
            trigger: detail
                .and_then(|d| d.trigger.as_ref())
                .map(|t| t.name.clone()),
            level: detail.and_then(|d| d.min_level),
            item: detail.and_then(|d| d.item.as_ref()).map(|i| i.name.clone()),
        }
    }
}

/// Pre-order depth-first flattening: every stage precedes its descendants and
/// siblings keep their array order. Uses an explicit stack, so deep chains cannot
/// exhaust the call stack.
pub fn flatten_chain(root: &ChainLink) -> Vec<EvolutionStage> {
    let mut stages = Vec::new();
    let mut stack = vec![root];
    while let Some(link) = stack.pop() {
        stages.push(EvolutionStage::from(link));
        // reversed so the first child is popped next
        stack.extend(link.evolves_to.iter().rev());
    }
    stages
}
