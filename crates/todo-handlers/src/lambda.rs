use crate::handlers::{handle_create, handle_delete, handle_list, handle_update};
use crate::request::ApiGatewayProxyRequest;
use crate::response::{
    preflight_response, ApiGatewayProxyResponse, COLLECTION_METHODS, DELETE_METHODS,
    UPDATE_METHODS,
};
use crate::router::route;
use crate::state::AppState;
use anyhow::Context as _;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use shared::{init_tracing, lambda_error::LambdaErrorHandler, trace_lambda_handler, Config};
use tracing::info;

/// Lambda 関数として公開するエンドポイント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Create,
    List,
    Update,
    Delete,
    /// 全ルートを 1 関数で扱う
    Router,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Create => "create-todo",
            Endpoint::List => "list-todos",
            Endpoint::Update => "update-todo",
            Endpoint::Delete => "delete-todo",
            Endpoint::Router => "todo-api",
        }
    }

    /// 単一ルート関数が許可するメソッド（ルーターは自前で判定する）
    fn allow_methods(&self) -> Option<&'static str> {
        match self {
            Endpoint::Create | Endpoint::List => Some(COLLECTION_METHODS),
            Endpoint::Update => Some(UPDATE_METHODS),
            Endpoint::Delete => Some(DELETE_METHODS),
            Endpoint::Router => None,
        }
    }

    /// リクエストを対応するハンドラーへ渡す
    pub async fn dispatch(
        &self,
        request: &ApiGatewayProxyRequest,
        state: &AppState,
    ) -> ApiGatewayProxyResponse {
        if let Some(methods) = self.allow_methods() {
            if request.http_method.eq_ignore_ascii_case("OPTIONS") {
                return preflight_response(methods);
            }
        }

        match self {
            Endpoint::Create => handle_create(request, state).await,
            Endpoint::List => handle_list(request, state).await,
            Endpoint::Update => handle_update(request, state).await,
            Endpoint::Delete => handle_delete(request, state).await,
            Endpoint::Router => route(request, state).await,
        }
    }
}

async fn function_handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    endpoint: Endpoint,
    state: &AppState,
) -> Result<ApiGatewayProxyResponse, Error> {
    let request_id = LambdaErrorHandler::extract_request_id(&event);
    let (mut payload, context) = event.into_parts();
    // requestContext を持たない呼び出しはランタイムのリクエスト ID で補う
    payload
        .request_context
        .request_id
        .get_or_insert(request_id);

    trace_lambda_handler!(
        endpoint.name(),
        payload,
        context,
        |payload: ApiGatewayProxyRequest, _context| async move {
            info!(
                "{}開始: method={}, path={}",
                endpoint.name(),
                payload.http_method,
                payload.path
            );
            Ok::<_, Error>(endpoint.dispatch(&payload, state).await)
        }
    )
}

/// Lambda ランタイムを起動する
///
/// 設定とクライアントはコールドスタート時に一度だけ初期化する。
pub async fn run(endpoint: Endpoint) -> Result<(), Error> {
    if let Err(e) = init_tracing() {
        eprintln!("トレーシング初期化エラー: {e}");
    }

    let config = Config::from_env().context("設定の読み込みに失敗")?;
    info!(
        function = endpoint.name(),
        table = %config.dynamodb_table,
        environment = %config.environment,
        "設定読み込み完了"
    );

    let state = AppState::from_config(&config).await;
    let state = &state;

    lambda_runtime::run(service_fn(move |event| {
        function_handler(event, endpoint, state)
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure::InMemoryTodoStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_single_route_answers_preflight() {
        let state = AppState::new(Arc::new(InMemoryTodoStore::new()));
        let request = ApiGatewayProxyRequest {
            http_method: "OPTIONS".to_string(),
            path: "/todos/abc".to_string(),
            ..Default::default()
        };

        let response = Endpoint::Delete.dispatch(&request, &state).await;

        assert_eq!(response.status_code, 204);
        assert_eq!(
            response.headers.get("Access-Control-Allow-Methods").map(String::as_str),
            Some(DELETE_METHODS)
        );
    }

    #[tokio::test]
    async fn test_single_route_ignores_path() {
        let state = AppState::new(Arc::new(InMemoryTodoStore::new()));
        let request = ApiGatewayProxyRequest {
            http_method: "GET".to_string(),
            path: "/prod/todos".to_string(),
            ..Default::default()
        };

        let response = Endpoint::List.dispatch(&request, &state).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.json_body().unwrap()["error"],
            "Missing user identity"
        );
    }
}
