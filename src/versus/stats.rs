//! Per-stat comparisons between the left and right entity, keyed by stat name.

use serde::Serialize;

use crate::data::{Entity, StatName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advantage {
    Left,
    Right,
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatComparison {
    pub advantage: Advantage,
    pub percentage_delta: f64,
}

/// Compare two stat values. The delta is relative to the larger value, so it is
/// always within [0, 100]; two zeros compare equal at 0.
pub fn stat_comparison(left: u32, right: u32) -> StatComparison {
    let diff = i64::from(left) - i64::from(right);
    let advantage = match diff.signum() {
        1 => Advantage::Left,
        -1 => Advantage::Right,
        _ => Advantage::Equal,
    };
    let larger = left.max(right);
    let percentage_delta = if advantage == Advantage::Equal || larger == 0 {
        0.0
    } else {
        diff.unsigned_abs() as f64 / f64::from(larger) * 100.0
    };
    StatComparison {
        advantage,
        percentage_delta,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLine {
    pub stat: StatName,
    pub left: u32,
    pub right: u32,
    pub comparison: StatComparison,
}

/// One line per canonical stat carried by either side, in canonical display order,
/// followed by any non-canonical stats in the order the left (then right) entity lists them.
pub fn stat_lines(left: &Entity, right: &Entity) -> Vec<StatLine> {
    let mut names: Vec<StatName> = StatName::CANONICAL
        .iter()
        .filter(|name| carries(left, name) || carries(right, name))
        .cloned()
        .collect();
    for stat in left.stats.iter().chain(&right.stats) {
        if !names.contains(&stat.name) {
            names.push(stat.name.clone());
        }
    }

    names
        .into_iter()
        .map(|stat| {
            let l = left.stat(&stat);
            let r = right.stat(&stat);
            StatLine {
                stat,
                left: l,
                right: r,
                comparison: stat_comparison(l, r),
            }
        })
        .collect()
}

fn carries(entity: &Entity, name: &StatName) -> bool {
    entity.stats.iter().any(|s| &s.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarPoint {
    pub label: &'static str,
    pub left: u32,
    pub right: u32,
}

/// Axis order of the radar chart, going around the polygon.
pub const RADAR_AXES: [(&str, StatName); 6] = [
    ("HP", StatName::Hp),
    ("Attack", StatName::Attack),
    ("Sp. Atk", StatName::SpecialAttack),
    ("Speed", StatName::Speed),
    ("Sp. Def", StatName::SpecialDefense),
    ("Defense", StatName::Defense),
];

pub fn radar_series(left: &Entity, right: &Entity) -> Vec<RadarPoint> {
    RADAR_AXES
        .iter()
        .map(|(label, stat)| RadarPoint {
            label: *label,
            left: left.stat(stat),
            right: right.stat(stat),
        })
        .collect()
}
