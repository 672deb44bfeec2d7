use crate::handlers::MISSING_REQUIRED_FIELDS;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use domain::{OwnerId, TodoId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::Value;
use shared::{AppError, Claims};
use std::collections::HashMap;

/// API Gateway プロキシリクエスト構造体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyRequest {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
    #[serde(default)]
    pub request_context: RequestContext,
}

/// リクエストコンテキスト構造体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

/// Cognito オーソライザーが付与する認証情報
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authorizer {
    #[serde(default)]
    pub claims: Option<HashMap<String, Value>>,
}

impl ApiGatewayProxyRequest {
    /// 検証済みクレーム（オーソライザーが無ければ空）
    pub fn claims(&self) -> Claims {
        self.request_context
            .authorizer
            .as_ref()
            .and_then(|a| a.claims.as_ref())
            .map(Claims::from_map)
            .unwrap_or_default()
    }

    /// 呼び出し元の所有者 ID
    pub fn owner_id(&self) -> Option<OwnerId> {
        self.claims().owner_id()
    }

    /// パスパラメーター `id`。API Gateway が渡さない場合は `/todos/{id}` から切り出す
    pub fn todo_id(&self) -> Option<TodoId> {
        let from_params = self
            .path_parameters
            .as_ref()
            .and_then(|params| params.get("id"))
            .map(String::as_str);

        from_params
            .or_else(|| todo_id_segment(&self.path))
            .and_then(|id| TodoId::parse(id).ok())
    }

    /// ボディ文字列（Base64 の場合はデコード）
    pub fn body_text(&self) -> Result<Option<String>, AppError> {
        let Some(body) = self.body.as_deref() else {
            return Ok(None);
        };

        if self.is_base64_encoded.unwrap_or(false) {
            let bytes = STANDARD
                .decode(body)
                .map_err(|e| AppError::Deserialization(format!("Base64 デコードエラー: {e}")))?;
            let text = String::from_utf8(bytes)
                .map_err(|e| AppError::Deserialization(format!("UTF-8 変換エラー: {e}")))?;
            return Ok(Some(text));
        }

        Ok(Some(body.to_string()))
    }

    /// JSON ボディをパースする。ボディが無い・空の場合は `{}` と同じ扱い
    ///
    /// JSON として壊れている場合は `Deserialization`、JSON としては正しいが
    /// フィールドの型が合わない場合は `Validation`（必須項目不足と同じ文言）。
    pub fn json_body<T>(&self) -> Result<T, AppError>
    where
        T: DeserializeOwned + Default,
    {
        match self.body_text()? {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|e| match e.classify() {
                    Category::Data => {
                        tracing::debug!(error = %e, "リクエストボディの型不一致");
                        AppError::Validation(MISSING_REQUIRED_FIELDS.to_string())
                    }
                    Category::Syntax | Category::Eof | Category::Io => {
                        AppError::Deserialization(format!("リクエストボディのパースエラー: {e}"))
                    }
                })
            }
            _ => Ok(T::default()),
        }
    }
}

/// `/todos/{id}` 形式のパスから `{id}` を取り出す
pub(crate) fn todo_id_segment(path: &str) -> Option<&str> {
    let rest = path.trim_end_matches('/').strip_prefix("/todos/")?;
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some(rest)
}
