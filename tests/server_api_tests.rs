use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dexvs::catalog::{CatalogState, LoadPhase, StaticCatalog};
use dexvs::config::Config;
use dexvs::data::{load_selection, Entity, SelectionSide};
use dexvs::server::routes::route_request;
use dexvs::server::{router, AppState};
use tower::ServiceExt;

fn entity(id: u32, name: &str, kind: &str, each: u32) -> Entity {
    let stats: Vec<serde_json::Value> = [
        "hp",
        "attack",
        "defense",
        "special-attack",
        "special-defense",
        "speed",
    ]
    .iter()
    .map(|stat| serde_json::json!({"base_stat": each, "stat": {"name": stat}}))
    .collect();
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "types": [{"slot": 1, "type": {"name": kind}}],
        "stats": stats,
        "species": {"name": name, "url": format!("mem://api/pokemon-species/{id}/")},
    }))
    .expect("entity fixture should decode")
}

fn test_config() -> Config {
    Config {
        api_base: "mem://api".to_string(),
        index_limit: 3,
        batch_size: 2,
        ..Config::default()
    }
}

fn state_with(catalog: StaticCatalog) -> AppState {
    let roster = vec![
        entity(1, "bulbasaur", "grass", 50),
        entity(4, "charmander", "fire", 50),
        entity(25, "pikachu", "electric", 55),
    ];
    AppState::new(
        Arc::new(CatalogState::with_roster(roster)),
        Arc::new(catalog),
        &test_config(),
        None,
    )
}

fn state() -> AppState {
    state_with(StaticCatalog::new())
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[tokio::test]
async fn health_endpoint_returns_ok_json() {
    let response = route_request(&state(), "GET", "/api/health", "").await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert_eq!(json(&response.body)["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let response = route_request(&state(), "GET", "/api/nope", "").await;
    assert_eq!(response.status_code, 404);
    assert_eq!(json(&response.body)["message"], "Route not found");

    let response = route_request(&state(), "PUT", "/api/selection", "").await;
    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn index_page_is_html() {
    let response = route_request(&state(), "GET", "/", "").await;
    assert_eq!(response.status_code, 200);
    assert!(response.content_type.starts_with("text/html"));
}

#[tokio::test]
async fn entities_are_listed_and_filtered_by_name() {
    let state = state();
    let response = route_request(&state, "GET", "/api/entities", "").await;
    let payload = json(&response.body);
    assert_eq!(payload["count"], 3);
    assert_eq!(payload["loaded"], 3);
    assert_eq!(payload["loading"], false);
    assert_eq!(payload["entities"][2]["name"], "pikachu");

    let response = route_request(&state, "GET", "/api/entities?q=CHAR", "").await;
    let payload = json(&response.body);
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["entities"][0]["id"], 4);
}

#[tokio::test]
async fn entity_lookup_by_id_or_name() {
    let state = state();
    let by_id = route_request(&state, "GET", "/api/entities/25", "").await;
    assert_eq!(by_id.status_code, 200);
    assert_eq!(json(&by_id.body)["name"], "pikachu");

    let by_name = route_request(&state, "GET", "/api/entities/Bulbasaur", "").await;
    assert_eq!(json(&by_name.body)["id"], 1);

    let missing = route_request(&state, "GET", "/api/entities/999", "").await;
    assert_eq!(missing.status_code, 404);
}

#[tokio::test]
async fn detail_endpoint_degrades_without_species_data() {
    let response = route_request(&state(), "GET", "/api/entities/4/detail", "").await;
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["entity"]["name"], "charmander");
    assert_eq!(payload["description"], "No description available.");
    assert_eq!(payload["evolutions"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn detail_endpoint_uses_species_description() {
    let mut catalog = StaticCatalog::new();
    catalog.insert(
        "mem://api/pokemon-species/25/",
        serde_json::json!({
            "flavor_text_entries": [{"flavor_text": "Stores\nelectricity.", "language": {"name": "en"}}]
        }),
    );
    let response = route_request(&state_with(catalog), "GET", "/api/entities/25/detail", "").await;
    assert_eq!(json(&response.body)["description"], "Stores electricity.");
}

#[tokio::test]
async fn compare_uses_query_sides() {
    let response = route_request(&state(), "GET", "/api/compare?left=4&right=bulbasaur", "").await;
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["battle"]["winner"], "left");
    assert_eq!(payload["battle"]["winner_name"], "charmander");
    assert_eq!(payload["battle"]["reasoning"], "type_advantage");
    assert_eq!(payload["radar"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn compare_without_both_sides_is_a_bad_request() {
    let state = state();
    let response = route_request(&state, "GET", "/api/compare?left=4", "").await;
    assert_eq!(response.status_code, 400);

    let response = route_request(&state, "GET", "/api/compare?left=4&right=mew", "").await;
    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn selection_flow_select_swap_compare_reset() {
    let state = state();

    let response = route_request(&state, "POST", "/api/selection", r#"{"side":"left","id":25}"#).await;
    assert_eq!(response.status_code, 200);
    route_request(&state, "POST", "/api/selection", r#"{"side":"right","id":1}"#).await;
    route_request(&state, "POST", "/api/selection", r#"{"side":"detail","id":4}"#).await;

    let swapped = json(&route_request(&state, "POST", "/api/selection/swap", "").await.body);
    assert_eq!(swapped["left"]["name"], "bulbasaur");
    assert_eq!(swapped["right"]["name"], "pikachu");

    // compare falls back to the stored pair
    let compared = json(&route_request(&state, "GET", "/api/compare", "").await.body);
    assert_eq!(compared["left"]["name"], "bulbasaur");
    assert_eq!(compared["battle"]["winner_name"], "pikachu");

    let reset = json(&route_request(&state, "DELETE", "/api/selection", "").await.body);
    assert!(reset["left"].is_null());
    assert!(reset["right"].is_null());
    assert_eq!(reset["detail"]["name"], "charmander");

    let cleared = json(&route_request(&state, "DELETE", "/api/selection/detail", "").await.body);
    assert!(cleared["detail"].is_null());
}

#[tokio::test]
async fn selection_rejects_bad_bodies_and_unknown_ids() {
    let state = state();
    let response = route_request(&state, "POST", "/api/selection", "{not json").await;
    assert_eq!(response.status_code, 400);

    let response = route_request(&state, "POST", "/api/selection", r#"{"side":"middle","id":1}"#).await;
    assert_eq!(response.status_code, 400);

    let response = route_request(&state, "POST", "/api/selection", r#"{"side":"left","id":999}"#).await;
    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn reload_runs_in_background_and_conflicts_while_busy() {
    let mut catalog = StaticCatalog::new();
    catalog
        .insert(
            "mem://api/pokemon?limit=3",
            serde_json::json!({"results": [
                {"name": "mew", "url": "mem://api/pokemon/151/"},
                {"name": "missing", "url": "mem://api/pokemon/0/"}
            ]}),
        )
        .insert(
            "mem://api/pokemon/151/",
            serde_json::json!({"id": 151, "name": "mew"}),
        );
    let state = state_with(catalog);

    let busy = state.catalog.begin_load().expect("claim load slot");
    let response = route_request(&state, "POST", "/api/catalog/reload", "").await;
    assert_eq!(response.status_code, 409);
    busy.complete(state.catalog.roster().to_vec());

    let response = route_request(&state, "POST", "/api/catalog/reload", "").await;
    assert_eq!(response.status_code, 202);

    assert!(state.catalog.is_loading());
    for _ in 0..200 {
        if !state.catalog.is_loading() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let status = json(&route_request(&state, "GET", "/api/catalog/status", "").await.body);
    assert_eq!(status["state"], "complete");
    assert_eq!(status["loaded_count"], 1);
    assert_eq!(status["manifest_len"], 2);
    assert_eq!(state.catalog.find(151).map(|e| e.name), Some("mew".to_string()));
}

#[tokio::test]
async fn back_to_back_reloads_accept_only_the_first() {
    let mut catalog = StaticCatalog::new();
    catalog.insert("mem://api/pokemon?limit=3", serde_json::json!({"results": []}));
    let state = state_with(catalog);

    let first = route_request(&state, "POST", "/api/catalog/reload", "").await;
    let second = route_request(&state, "POST", "/api/catalog/reload", "").await;
    assert_eq!(first.status_code, 202);
    assert_eq!(second.status_code, 409);
    assert_eq!(
        json(&second.body)["message"],
        "a catalog load is already in progress"
    );

    for _ in 0..200 {
        if !state.catalog.is_loading() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(state.catalog.status().state, LoadPhase::Complete);
    let third = route_request(&state, "POST", "/api/catalog/reload", "").await;
    assert_eq!(third.status_code, 202);
}

#[test]
fn concurrent_selection_writes_leave_the_latest_snapshot_on_disk() {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let path = std::env::temp_dir()
        .join(format!("dexvs-selection-race-{stamp}"))
        .join("selection.json")
        .to_string_lossy()
        .into_owned();

    let roster: Vec<Entity> = (1..=16)
        .map(|id| entity(id, &format!("mon-{id}"), "normal", 10))
        .collect();
    let state = AppState::new(
        Arc::new(CatalogState::with_roster(roster.clone())),
        Arc::new(StaticCatalog::new()),
        &test_config(),
        Some(path.clone()),
    );

    std::thread::scope(|scope| {
        for entity in &roster {
            let state = &state;
            scope.spawn(move || {
                state.update_selection(|s| s.select(SelectionSide::Left, entity.clone()));
            });
        }
    });

    assert_eq!(load_selection(&path), state.selection_snapshot());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn router_serves_through_axum() {
    let app = router(Arc::new(state()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/entities?q=pika")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(payload["entities"][0]["name"], "pikachu");
}
