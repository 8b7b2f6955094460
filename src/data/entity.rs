//! Entity records as served by the remote catalog (PokéAPI v2 shape).
//! Unknown fields are ignored; absent collections deserialize as empty.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::resource_id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One `{name, url}` row of the index resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub url: String,
}

/// Index resource: the full roster manifest, in catalog order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexPage {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub results: Vec<IndexEntry>,
}

/// Minimal roster record before the full entity is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub id: u32,
    pub name: String,
    pub resource_url: String,
}

impl From<&IndexEntry> for EntitySummary {
    fn from(entry: &IndexEntry) -> Self {
        Self {
            id: resource_id(&entry.url).unwrap_or(0),
            name: entry.name.clone(),
            resource_url: entry.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatName {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Other(String),
}

impl StatName {
    /// Display order; never used for indexing into an entity's stats.
    pub const CANONICAL: [StatName; 6] = [
        StatName::Hp,
        StatName::Attack,
        StatName::Defense,
        StatName::SpecialAttack,
        StatName::SpecialDefense,
        StatName::Speed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Hp => "hp",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::SpecialAttack => "special-attack",
            Self::SpecialDefense => "special-defense",
            Self::Speed => "speed",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for StatName {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hp" => Self::Hp,
            "attack" => Self::Attack,
            "defense" => Self::Defense,
            "special-attack" => Self::SpecialAttack,
            "special-defense" => Self::SpecialDefense,
            "speed" => Self::Speed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// Wire shape of a stat: `{base_stat, effort, stat: {name, url}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStat", into = "RawStat")]
pub struct Stat {
    pub name: StatName,
    pub base_stat: u32,
}

impl Stat {
    pub fn new(name: StatName, base_stat: u32) -> Self {
        Self { name, base_stat }
    }
}

impl From<RawStat> for Stat {
    fn from(raw: RawStat) -> Self {
        Self {
            name: StatName::from(raw.stat.name.as_str()),
            base_stat: raw.base_stat,
        }
    }
}

impl From<Stat> for RawStat {
    fn from(stat: Stat) -> Self {
        Self {
            base_stat: stat.base_stat,
            effort: 0,
            stat: NamedResource {
                name: stat.name.as_str().to_string(),
                url: String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRef {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(default)]
    pub showdown: Option<SpriteRef>,
    #[serde(default)]
    pub home: Option<SpriteRef>,
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Option<SpriteRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

impl Sprites {
    /// Display image: showdown, then home, then official artwork, then the plain front sprite.
    pub fn preferred(&self) -> Option<&str> {
        let other = self.other.as_ref();
        other
            .and_then(|o| front_of(o.showdown.as_ref()))
            .or_else(|| other.and_then(|o| front_of(o.home.as_ref())))
            .or_else(|| other.and_then(|o| front_of(o.official_artwork.as_ref())))
            .or_else(|| self.front_default.as_deref().filter(|url| !url.is_empty()))
    }
}

fn front_of(sprite: Option<&SpriteRef>) -> Option<&str> {
    sprite
        .and_then(|s| s.front_default.as_deref())
        .filter(|url| !url.is_empty())
}

/// Full entity record. Identity key is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub name: String,
    /// Decimetres.
    #[serde(default)]
    pub height: u32,
    /// Hectograms.
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub species: Option<NamedResource>,
}

impl Entity {
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.type_ref.name.as_str()).collect()
    }

    pub fn ability_names(&self) -> Vec<&str> {
        self.abilities.iter().map(|a| a.ability.name.as_str()).collect()
    }

    /// Base value of a stat looked up by name; 0 when the entity does not carry it.
    pub fn stat(&self, name: &StatName) -> u32 {
        self.stats
            .iter()
            .find(|s| &s.name == name)
            .map_or(0, |s| s.base_stat)
    }

    pub fn image(&self) -> Option<&str> {
        self.sprites.preferred()
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }
}
