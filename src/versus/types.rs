//! Static type-advantage table and the compounding multiplier built from it.
//!
//! This is a deliberately simple table: one direction only ("strong against"),
//! no resistances, no immunities.

/// Multiplier applied once per matching (attacker type, defender type) pair.
pub const ADVANTAGE_STEP: f64 = 1.25;

/// Attacking type -> defending types it is strong against.
pub const ADVANTAGES: [(&str, &[&str]); 17] = [
    ("fire", &["grass", "ice", "bug", "steel"]),
    ("water", &["fire", "ground", "rock"]),
    ("grass", &["water", "ground", "rock"]),
    ("electric", &["water", "flying"]),
    ("ice", &["grass", "ground", "flying", "dragon"]),
    ("fighting", &["normal", "ice", "rock", "dark", "steel"]),
    ("poison", &["grass", "fairy"]),
    ("ground", &["fire", "electric", "poison", "rock", "steel"]),
    ("flying", &["grass", "fighting", "bug"]),
    ("psychic", &["fighting", "poison"]),
    ("bug", &["grass", "psychic", "dark"]),
    ("rock", &["fire", "ice", "flying", "bug"]),
    ("ghost", &["psychic", "ghost"]),
    ("dragon", &["dragon"]),
    ("dark", &["psychic", "ghost"]),
    ("steel", &["ice", "rock", "fairy"]),
    ("fairy", &["fighting", "dragon", "dark"]),
];

/// True when `attacker` is listed as strong against `defender`.
pub fn is_strong_against(attacker: &str, defender: &str) -> bool {
    ADVANTAGES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(attacker))
        .is_some_and(|(_, targets)| targets.iter().any(|t| t.eq_ignore_ascii_case(defender)))
}

/// Start at 1.0 and multiply by [ADVANTAGE_STEP] for every ordered pair where a type in
/// `attacking` is strong against a type in `defending`. Advantages compound, uncapped.
pub fn type_advantage<A, D>(attacking: &[A], defending: &[D]) -> f64
where
    A: AsRef<str>,
    D: AsRef<str>,
{
    let mut multiplier = 1.0;
    for attacker in attacking {
        for defender in defending {
            if is_strong_against(attacker.as_ref(), defender.as_ref()) {
                multiplier *= ADVANTAGE_STEP;
            }
        }
    }
    multiplier
}
