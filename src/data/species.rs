//! Species record: localized descriptions and the link to the evolution chain.

use serde::{Deserialize, Serialize};

use crate::data::entity::NamedResource;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResource {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Species {
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    pub evolution_chain: Option<ApiResource>,
}

impl Species {
    /// First flavor text in `language`, with the catalog's embedded line and page breaks
    /// folded into single spaces.
    pub fn description(&self, language: &str) -> Option<String> {
        self.flavor_text_entries
            .iter()
            .find(|entry| entry.language.name.eq_ignore_ascii_case(language))
            .map(|entry| clean_flavor_text(&entry.flavor_text))
    }

    pub fn evolution_chain_url(&self) -> Option<&str> {
        self.evolution_chain
            .as_ref()
            .map(|link| link.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

fn clean_flavor_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
