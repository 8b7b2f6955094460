use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::server::api::{self, ApiError};
use crate::server::AppState;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(status_code: u16, status_text: &'static str, body: String) -> Self {
        Self {
            status_code,
            status_text,
            content_type: "application/json",
            body,
        }
    }

    fn ok(body: String) -> Self {
        Self::json(200, "OK", body)
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

fn from_json(result: Result<String, serde_json::Error>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::ok(payload),
        Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

fn from_api(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::ok(payload),
        Err(ApiError::NotFound(msg)) => error_response(404, "Not Found", &msg),
        Err(ApiError::BadRequest(msg)) => error_response(400, "Bad Request", &msg),
        Err(ApiError::Conflict(msg)) => error_response(409, "Conflict", &msg),
        Err(ApiError::Json(err)) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

pub async fn route_request(state: &AppState, method: &str, path: &str, body: &str) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path).trim_end_matches('/');
    match (method, route) {
        ("GET", "") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => from_json(api::health_payload()),
        ("GET", "/api/catalog/status") => from_json(api::status_payload(state)),
        ("POST", "/api/catalog/reload") => match api::reload_payload(state) {
            Ok(payload) => HttpResponse::json(202, "Accepted", payload),
            Err(err) => from_api(Err(err)),
        },
        ("GET", "/api/entities") => from_json(api::entities_payload(state, path)),
        ("GET", route) if route.starts_with("/api/entities/") => {
            let rest = route.trim_start_matches("/api/entities/");
            match rest.split_once('/') {
                None => from_api(api::entity_payload(state, rest)),
                Some((key, "detail")) => from_api(api::detail_payload(state, key).await),
                Some(_) => error_response(404, "Not Found", "Route not found"),
            }
        }
        ("GET", "/api/compare") => from_api(api::compare_payload(state, path)),
        ("GET", "/api/selection") => from_json(api::selection_get_payload(state)),
        ("POST", "/api/selection") => from_api(api::selection_post_payload(state, body)),
        ("DELETE", "/api/selection") => from_json(api::selection_reset_payload(state)),
        ("POST", "/api/selection/swap") => from_json(api::selection_swap_payload(state)),
        ("DELETE", "/api/selection/detail") => {
            from_json(api::selection_clear_detail_payload(state))
        }
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse::json(
        status_code,
        status_text,
        format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    )
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>dexvs API</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 760px; margin: 24px auto; padding: 0 12px; }
    code { background: #f2f2f2; padding: 1px 4px; border-radius: 4px; }
    li { margin: 6px 0; }
  </style>
</head>
<body>
  <h1>dexvs local API</h1>
  <ul>
    <li><code>GET /api/catalog/status</code> load progress</li>
    <li><code>GET /api/entities?q=chu</code> roster, filtered by name</li>
    <li><code>GET /api/entities/25</code> and <code>/api/entities/25/detail</code></li>
    <li><code>GET /api/compare?left=25&amp;right=4</code> versus heuristic</li>
    <li><code>GET|POST|DELETE /api/selection</code>, <code>POST /api/selection/swap</code>,
      <code>DELETE /api/selection/detail</code></li>
  </ul>
</body>
</html>
"#
    .to_string()
}
