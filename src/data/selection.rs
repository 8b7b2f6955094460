//! Selection store: which entities sit on the left/right of a comparison and which one
//! is under detail view. Persisted as a single JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::entity::Entity;

pub const DEFAULT_SELECTION_PATH: &str = "data/selection.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSide {
    Left,
    Right,
    Detail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub left: Option<Entity>,
    #[serde(default)]
    pub right: Option<Entity>,
    #[serde(default)]
    pub detail: Option<Entity>,
}

impl Selection {
    pub fn select(&mut self, side: SelectionSide, entity: Entity) {
        let slot = match side {
            SelectionSide::Left => &mut self.left,
            SelectionSide::Right => &mut self.right,
            SelectionSide::Detail => &mut self.detail,
        };
        *slot = Some(entity);
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }

    /// Clears both comparison sides; the detail view is left alone.
    pub fn reset(&mut self) {
        self.left = None;
        self.right = None;
    }

    pub fn clear_detail(&mut self) {
        self.detail = None;
    }

    pub fn pair(&self) -> Option<(&Entity, &Entity)> {
        Some((self.left.as_ref()?, self.right.as_ref()?))
    }
}

/// Load the selection from JSON. Returns the empty selection if the file is missing or invalid.
pub fn load_selection(path: &str) -> Selection {
    let path = Path::new(path);
    if !path.exists() {
        return Selection::default();
    }
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "could not read selection; starting empty");
            return Selection::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), %err, "invalid selection file; starting empty");
        Selection::default()
    })
}

pub fn save_selection(path: &str, selection: &Selection) -> crate::error::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let serialized = serde_json::to_string_pretty(selection)?;
    fs::write(path, serialized)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn entity(id: u32, name: &str) -> Entity {
        serde_json::from_value(serde_json::json!({"id": id, "name": name}))
            .expect("entity should decode")
    }

    fn temp_path(name: &str) -> String {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir()
            .join(format!("dexvs-{name}-{stamp}"))
            .join("selection.json")
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn swap_and_reset_touch_only_comparison_sides() {
        let mut selection = Selection::default();
        selection.select(SelectionSide::Left, entity(1, "bulbasaur"));
        selection.select(SelectionSide::Right, entity(4, "charmander"));
        selection.select(SelectionSide::Detail, entity(7, "squirtle"));

        selection.swap();
        let (left, right) = selection.pair().expect("both sides selected");
        assert_eq!((left.id, right.id), (4, 1));

        selection.reset();
        assert!(selection.pair().is_none());
        assert_eq!(selection.detail.as_ref().map(|e| e.id), Some(7));

        selection.clear_detail();
        assert!(selection.detail.is_none());
    }

    #[test]
    fn save_then_load_restores_selection() {
        let path = temp_path("selection");
        let mut selection = Selection::default();
        selection.select(SelectionSide::Left, entity(25, "pikachu"));
        save_selection(&path, &selection).expect("selection should be written");

        assert_eq!(load_selection(&path), selection);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_or_invalid_file_loads_empty() {
        assert_eq!(load_selection("does/not/exist.json"), Selection::default());

        let path = temp_path("invalid");
        save_selection(&path, &Selection::default()).expect("selection should be written");
        fs::write(&path, "{not json").expect("fixture should be written");
        assert_eq!(load_selection(&path), Selection::default());
        let _ = fs::remove_file(&path);
    }
}
