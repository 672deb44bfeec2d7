use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::{AppError, ErrorResponse, INTERNAL_ERROR_MESSAGE};
use std::collections::HashMap;
use tracing::error;

/// `/todos` で許可するメソッド
pub const COLLECTION_METHODS: &str = "OPTIONS,GET,POST";
/// `PUT /todos/{id}` で許可するメソッド
pub const UPDATE_METHODS: &str = "OPTIONS,PUT";
/// `DELETE /todos/{id}` で許可するメソッド
pub const DELETE_METHODS: &str = "OPTIONS,DELETE";
/// ルーター全体で許可するメソッド
pub const ALL_METHODS: &str = "OPTIONS,GET,POST,PUT,DELETE";

/// API Gateway プロキシレスポンス構造体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ApiGatewayProxyResponse {
    /// ボディを JSON として読む
    pub fn json_body(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// 全オリジン許可の CORS ヘッダー
pub fn cors_headers(allow_methods: &str) -> HashMap<String, String> {
    HashMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        (
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type,Authorization".to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            allow_methods.to_string(),
        ),
    ])
}

/// JSON レスポンスを作成
pub fn json_response<T>(status_code: u16, body: &T, allow_methods: &str) -> ApiGatewayProxyResponse
where
    T: Serialize + ?Sized,
{
    let (status_code, body) = match serde_json::to_string(body) {
        Ok(body) => (status_code, body),
        Err(e) => {
            error!(error = %e, "レスポンスのシリアライズに失敗");
            (500, json!({ "error": INTERNAL_ERROR_MESSAGE }).to_string())
        }
    };

    let mut headers = cors_headers(allow_methods);
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    ApiGatewayProxyResponse {
        status_code,
        headers,
        body,
        is_base64_encoded: false,
    }
}

/// `{"message": "..."}` 形式の確認レスポンス
pub fn message_response(status_code: u16, message: &str, allow_methods: &str) -> ApiGatewayProxyResponse {
    json_response(status_code, &json!({ "message": message }), allow_methods)
}

/// エラーレスポンスを作成（内部の詳細は含めない）
pub fn error_response(error: &AppError, allow_methods: &str) -> ApiGatewayProxyResponse {
    json_response(
        error.http_status_code(),
        &ErrorResponse::from_app_error(error),
        allow_methods,
    )
}

/// プリフライト（OPTIONS）への応答
pub fn preflight_response(allow_methods: &str) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: 204,
        headers: cors_headers(allow_methods),
        body: String::new(),
        is_base64_encoded: false,
    }
}
