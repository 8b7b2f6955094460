//! Roster accumulation and lookup.

use std::collections::HashSet;

use crate::data::Entity;
use crate::error::FetchError;

/// Fold state of a catalog load: the roster so far plus the ids already in it.
#[derive(Debug, Clone, Default)]
pub struct RosterBuilder {
    roster: Vec<Entity>,
    seen: HashSet<u32>,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one batch: failed fetches are discarded, entities whose id is already in
    /// the roster are skipped, survivors keep their batch order. Returns how many were added.
    pub fn append_deduped<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = Result<Entity, FetchError>>,
    {
        let before = self.roster.len();
        for result in batch {
            let entity = match result {
                Ok(entity) => entity,
                Err(err) => {
                    tracing::debug!(url = err.url(), %err, "dropping entity that failed to load");
                    continue;
                }
            };
            if self.seen.insert(entity.id) {
                self.roster.push(entity);
            } else {
                tracing::debug!(id = entity.id, name = %entity.name, "skipping duplicate entity");
            }
        }
        self.roster.len() - before
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn roster(&self) -> &[Entity] {
        &self.roster
    }

    pub fn into_roster(self) -> Vec<Entity> {
        self.roster
    }
}

/// Case-insensitive substring match on the name. A blank term matches everything.
/// Roster order is preserved.
pub fn filter_by_name<'a>(roster: &'a [Entity], term: &str) -> Vec<&'a Entity> {
    let needle = term.trim().to_lowercase();
    roster
        .iter()
        .filter(|entity| needle.is_empty() || entity.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: u32, name: &str) -> Entity {
        serde_json::from_value(serde_json::json!({"id": id, "name": name}))
            .expect("entity should decode")
    }

    fn failed(url: &str) -> Result<Entity, FetchError> {
        Err(FetchError::NotFound(url.to_string()))
    }

    #[test]
    fn append_drops_errors_and_duplicates_in_order() {
        let mut builder = RosterBuilder::new();
        let added = builder.append_deduped(vec![
            Ok(entity(3, "c")),
            failed("mem://x"),
            Ok(entity(1, "a")),
            Ok(entity(3, "c-again")),
        ]);
        assert_eq!(added, 2);

        let added = builder.append_deduped(vec![Ok(entity(1, "a")), Ok(entity(2, "b"))]);
        assert_eq!(added, 1);

        let ids: Vec<_> = builder.roster().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(builder.roster()[0].name, "c");
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let roster = vec![entity(1, "pikachu"), entity(2, "raichu"), entity(3, "bulbasaur")];
        let names: Vec<_> = filter_by_name(&roster, " CHU")
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["pikachu", "raichu"]);
        assert_eq!(filter_by_name(&roster, "").len(), 3);
        assert!(filter_by_name(&roster, "mew").is_empty());
    }
}
