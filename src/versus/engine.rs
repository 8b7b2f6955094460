//! Versus heuristic: aggregate power scaled by type advantage, normalized into the
//! winning side's share.
//!
//! Every function here is pure: the same two entities always produce the same result.
use std::fmt;

use serde::Serialize;

use crate::data::Entity;
use crate::versus::stats::{radar_series, stat_lines, RadarPoint, StatLine};
use crate::versus::types::type_advantage;

/// Winner's power must exceed the loser's by more than this factor to count as a
/// statistical advantage.
pub const STATISTICAL_MARGIN: f64 = 1.2;

/// Share reported when neither side has any power at all.
pub const EVEN_CHANCE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reasoning {
    StatisticalAdvantage,
    TypeAdvantage,
    BalancedStats,
}

impl fmt::Display for Reasoning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StatisticalAdvantage => "statistical advantage",
            Self::TypeAdvantage => "type advantage",
            Self::BalancedStats => "balanced stats",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleResult {
    pub winner: Side,
    pub winner_id: u32,
    pub winner_name: String,
    /// Winning side's probability in percent, always within [50, 100].
    pub win_chance: f64,
    pub reasoning: Reasoning,
}

/// Sum of every base stat the entity carries; 0 with no stats. Summed in `u64`, so no
/// realistic number of `u32` stats can overflow it.
pub fn total_power(entity: &Entity) -> u64 {
    entity.stats.iter().map(|s| u64::from(s.base_stat)).sum()
}

/// Advantage multiplier of `attacker`'s types over `defender`'s.
pub fn entity_advantage(attacker: &Entity, defender: &Entity) -> f64 {
    type_advantage(&attacker.type_names(), &defender.type_names())
}

/// Left side's raw chance in percent: type-adjusted left power over the sum of the
/// adjusted left power and the plain right power. Defined as 50 when both are zero.
pub fn raw_win_chance(left: &Entity, right: &Entity) -> f64 {
    let adjusted_left = total_power(left) as f64 * entity_advantage(left, right);
    let denominator = adjusted_left + total_power(right) as f64;
    if denominator <= 0.0 {
        return EVEN_CHANCE;
    }
    adjusted_left / denominator * 100.0
}

pub fn reasoning(winner: &Entity, loser: &Entity) -> Reasoning {
    let winner_power = total_power(winner) as f64;
    let loser_power = total_power(loser) as f64;
    if winner_power > loser_power * STATISTICAL_MARGIN {
        Reasoning::StatisticalAdvantage
    } else if entity_advantage(winner, loser) > 1.0 {
        Reasoning::TypeAdvantage
    } else {
        Reasoning::BalancedStats
    }
}

/// Left wins only with a raw chance strictly above 50; an exact tie goes to the right.
pub fn compare(left: &Entity, right: &Entity) -> BattleResult {
    let raw = raw_win_chance(left, right);
    let (side, winner, loser) = if raw > EVEN_CHANCE {
        (Side::Left, left, right)
    } else {
        (Side::Right, right, left)
    };
    BattleResult {
        winner: side,
        winner_id: winner.id,
        winner_name: winner.name.clone(),
        win_chance: raw.max(100.0 - raw),
        reasoning: reasoning(winner, loser),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparedEntity {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub image: Option<String>,
    pub total_power: u64,
    pub height_m: f64,
    pub weight_kg: f64,
}

impl From<&Entity> for ComparedEntity {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            types: entity.type_names().into_iter().map(str::to_string).collect(),
            abilities: entity
                .ability_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            image: entity.image().map(str::to_string),
            total_power: total_power(entity),
            height_m: entity.height_m(),
            weight_kg: entity.weight_kg(),
        }
    }
}

/// Everything a versus view shows for one pair.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub left: ComparedEntity,
    pub right: ComparedEntity,
    pub battle: BattleResult,
    pub stats: Vec<StatLine>,
    pub radar: Vec<RadarPoint>,
}

pub fn build_comparison(left: &Entity, right: &Entity) -> Comparison {
    Comparison {
        left: ComparedEntity::from(left),
        right: ComparedEntity::from(right),
        battle: compare(left, right),
        stats: stat_lines(left, right),
        radar: radar_series(left, right),
    }
}
