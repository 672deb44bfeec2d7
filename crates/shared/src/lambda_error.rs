use lambda_runtime::LambdaEvent;
use std::collections::HashMap;

use crate::errors::{AppError, ErrorSeverity};

/// Lambda 関数用のエラーハンドリングユーティリティ
pub struct LambdaErrorHandler;

impl LambdaErrorHandler {
    /// Lambda ランタイムが払い出したリクエスト ID
    pub fn extract_request_id<T>(event: &LambdaEvent<T>) -> String {
        event.context.request_id.clone()
    }

    /// エラーを重要度に応じたレベルで記録する
    ///
    /// 内部の詳細はここでのみ出力し、レスポンスには含めない。
    pub fn log_error(error: &AppError, context: Option<HashMap<String, String>>) {
        let metadata = error.metadata();
        let context = context.unwrap_or_default();
        let status = error.http_status_code();

        macro_rules! log_at {
            ($level:ident, $message:literal) => {
                tracing::$level!(
                    error = %error,
                    code = metadata.code,
                    category = ?metadata.category,
                    status,
                    context = ?context,
                    $message
                )
            };
        }

        match metadata.severity {
            ErrorSeverity::Critical => log_at!(error, "重大なエラー"),
            ErrorSeverity::Error => log_at!(error, "リクエスト処理エラー"),
            ErrorSeverity::Warning => log_at!(warn, "不正なリクエスト"),
            ErrorSeverity::Info => log_at!(info, "リクエストを拒否"),
        }
    }
}
