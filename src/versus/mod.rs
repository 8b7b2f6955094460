pub mod engine;
pub mod stats;
pub mod types;

pub use engine::{
    build_comparison, compare, entity_advantage, raw_win_chance, reasoning, total_power,
    BattleResult, ComparedEntity, Comparison, Reasoning, Side, EVEN_CHANCE, STATISTICAL_MARGIN,
};
pub use stats::{
    radar_series, stat_comparison, stat_lines, Advantage, RadarPoint, StatComparison, StatLine,
    RADAR_AXES,
};
pub use types::{is_strong_against, type_advantage, ADVANTAGES, ADVANTAGE_STEP};
