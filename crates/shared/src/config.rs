use crate::errors::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub dynamodb_table: String,
    pub environment: String,
    pub aws_region: String,
    /// DynamoDB Local などへ向けるエンドポイント上書き
    pub dynamodb_endpoint: Option<String>,
    pub metrics_enabled: bool,
    pub metrics_namespace: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を組み立てる（テストでは HashMap を渡す）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let metrics_enabled = match lookup("METRICS_ENABLED").as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
            Some(v) => {
                return Err(AppError::Configuration(format!(
                    "METRICS_ENABLED must be true or false: {v}"
                )))
            }
        };

        Ok(Config {
            dynamodb_table: lookup("DYNAMODB_TABLE").unwrap_or_else(|| "Todos".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|v| !v.trim().is_empty()),
            metrics_enabled,
            metrics_namespace: lookup("METRICS_NAMESPACE")
                .unwrap_or_else(|| "TodoApp/Handlers".to_string()),
        })
    }
}
