mod create;
mod delete;
mod list;
mod update;

pub use create::*;
pub use delete::*;
pub use list::*;
pub use update::*;

use crate::request::ApiGatewayProxyRequest;
use crate::response::{error_response, json_response, ApiGatewayProxyResponse};
use crate::state::AppState;
use serde::Serialize;
use shared::{lambda_error::LambdaErrorHandler, telemetry::trace_http_request, AppError, TodoOperation};
use std::collections::HashMap;

/// 必須項目が欠けている場合のメッセージ
pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
/// 一覧取得で所有者が不明な場合のメッセージ
pub const MISSING_USER_IDENTITY: &str = "Missing user identity";

/// 操作結果をレスポンスへ変換し、メトリクスとログを記録する
async fn finish<T>(
    state: &AppState,
    request: &ApiGatewayProxyRequest,
    operation: TodoOperation,
    success_status: u16,
    allow_methods: &str,
    result: Result<T, AppError>,
) -> ApiGatewayProxyResponse
where
    T: Serialize,
{
    let response = match result {
        Ok(body) => {
            state.record(operation).await;
            json_response(success_status, &body, allow_methods)
        }
        Err(error) => {
            let mut context = HashMap::new();
            context.insert("operation".to_string(), operation.as_str().to_string());
            if let Some(request_id) = &request.request_context.request_id {
                context.insert("request_id".to_string(), request_id.clone());
            }
            LambdaErrorHandler::log_error(&error, Some(context));
            error_response(&error, allow_methods)
        }
    };

    let owner_id = request.owner_id();
    trace_http_request(
        &request.http_method,
        &request.path,
        response.status_code,
        owner_id.as_ref().map(|o| o.as_str()),
    );

    response
}
