use crate::handlers::{handle_create, handle_delete, handle_list, handle_update};
use crate::request::{todo_id_segment, ApiGatewayProxyRequest};
use crate::response::{json_response, preflight_response, ApiGatewayProxyResponse, ALL_METHODS};
use crate::state::AppState;
use serde_json::json;
use tracing::warn;

/// 単一関数で全ルートを処理する
///
/// - `OPTIONS *` → 204
/// - `POST /todos` / `GET /todos`
/// - `PUT /todos/{id}` / `DELETE /todos/{id}`
/// - それ以外 → 404 `{"error":"Not found"}`
pub async fn route(request: &ApiGatewayProxyRequest, state: &AppState) -> ApiGatewayProxyResponse {
    let method = request.http_method.to_uppercase();
    let path = request.path.trim_end_matches('/');

    match (method.as_str(), path) {
        ("OPTIONS", _) => preflight_response(ALL_METHODS),
        ("POST", "/todos") => handle_create(request, state).await,
        ("GET", "/todos") => handle_list(request, state).await,
        ("PUT", p) if todo_id_segment(p).is_some() => handle_update(request, state).await,
        ("DELETE", p) if todo_id_segment(p).is_some() => handle_delete(request, state).await,
        _ => {
            warn!(method = %method, path = %request.path, "未定義のルート");
            json_response(404, &json!({ "error": "Not found" }), ALL_METHODS)
        }
    }
}
