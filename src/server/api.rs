use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::fetch_detail;
use crate::data::{save_selection, Entity, Selection, SelectionSide};
use crate::server::AppState;
use crate::versus::build_comparison;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "dexvs-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Decoded value of `key` in the query string of `path`, if present.
pub fn query_param(path: &str, key: &str) -> Option<String> {
    let url = reqwest::Url::parse(&format!("http://localhost{path}")).ok()?;
    let value = url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string());
    value
}

pub fn status_payload(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&state.catalog.status())
}

/// Starts a background reload unless one is already running.
pub fn reload_payload(state: &AppState) -> Result<String, ApiError> {
    state
        .spawn_load()
        .map_err(|err| ApiError::Conflict(err.to_string()))?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "accepted"
    }))?)
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityListItem {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Entity> for EntityListItem {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            types: entity.type_names().into_iter().map(str::to_string).collect(),
            image: entity.image().map(str::to_string),
        }
    }
}

pub fn entities_payload(state: &AppState, path: &str) -> Result<String, serde_json::Error> {
    let term = query_param(path, "q").unwrap_or_default();
    let status = state.catalog.status();
    let list: Vec<EntityListItem> = state
        .catalog
        .filtered(&term)
        .iter()
        .map(EntityListItem::from)
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "count": list.len(),
        "loaded": status.loaded_count,
        "loading": status.loading,
        "entities": list,
    }))
}

fn lookup(state: &AppState, key: &str) -> Result<Entity, ApiError> {
    state
        .catalog
        .resolve(key)
        .ok_or_else(|| ApiError::NotFound(format!("entity '{key}' not found")))
}

pub fn entity_payload(state: &AppState, key: &str) -> Result<String, ApiError> {
    let entity = lookup(state, key)?;
    Ok(serde_json::to_string_pretty(&entity)?)
}

pub async fn detail_payload(state: &AppState, key: &str) -> Result<String, ApiError> {
    let entity = lookup(state, key)?;
    let view = fetch_detail(state.source.as_ref(), entity, &state.language).await;
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Sides given in the query win; a missing side falls back to the selection store.
pub fn compare_payload(state: &AppState, path: &str) -> Result<String, ApiError> {
    let selection = state.selection_snapshot();
    let side = |key: &str, stored: Option<Entity>| -> Result<Option<Entity>, ApiError> {
        match query_param(path, key).filter(|v| !v.is_empty()) {
            Some(value) => lookup(state, &value).map(Some),
            None => Ok(stored),
        }
    };
    let left = side("left", selection.left)?;
    let right = side("right", selection.right)?;
    let (Some(left), Some(right)) = (left, right) else {
        return Err(ApiError::BadRequest(
            "select both a left and a right entity to compare".to_string(),
        ));
    };
    Ok(serde_json::to_string_pretty(&build_comparison(&left, &right))?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectRequest {
    pub side: SelectionSide,
    pub id: u32,
}

pub fn selection_get_payload(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&state.selection_snapshot())
}

pub fn selection_post_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: SelectRequest = serde_json::from_str(body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid request body: {err}")))?;
    let entity = state
        .catalog
        .find(request.id)
        .ok_or_else(|| ApiError::NotFound(format!("entity '{}' not found", request.id)))?;
    let selection = state.update_selection(|s| s.select(request.side, entity));
    Ok(serde_json::to_string_pretty(&selection)?)
}

pub fn selection_swap_payload(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&state.update_selection(Selection::swap))
}

pub fn selection_reset_payload(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&state.update_selection(Selection::reset))
}

pub fn selection_clear_detail_payload(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&state.update_selection(Selection::clear_detail))
}

pub(crate) fn persist_selection(path: Option<&str>, selection: &Selection) {
    let Some(path) = path else {
        return;
    };
    if let Err(err) = save_selection(path, selection) {
        tracing::warn!(path, %err, "could not persist selection");
    }
}
