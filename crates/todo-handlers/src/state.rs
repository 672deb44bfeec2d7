use infrastructure::{load_sdk_config, DynamoDbClient, DynamoTodoStore, TodoStore};
use shared::{BusinessMetrics, Config, MetricsClient, TodoOperation};
use std::sync::Arc;
use tracing::info;

/// ハンドラーへ注入する依存関係
///
/// プロセス（Lambda 実行環境）ごとに一度だけ組み立て、全リクエストで共有する。
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TodoStore>,
    metrics: Option<MetricsClient>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsClient) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// 設定から DynamoDB ストアと（有効なら）CloudWatch メトリクスを組み立てる
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = load_sdk_config(config).await;
        let db = DynamoDbClient::from_sdk_config(&sdk_config, config);
        info!(table = %db.table_name(), "DynamoDBクライアント初期化完了");

        let state = Self::new(Arc::new(DynamoTodoStore::new(db)));
        if !config.metrics_enabled {
            return state;
        }

        info!(namespace = %config.metrics_namespace, "CloudWatchメトリクス有効");
        state.with_metrics(MetricsClient::new(
            aws_sdk_cloudwatch::Client::new(&sdk_config),
            config.metrics_namespace.clone(),
            config.environment.clone(),
        ))
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    /// 成功した操作の件数メトリクスを送信（失敗はログのみ）
    pub async fn record(&self, operation: TodoOperation) {
        if let Some(metrics) = &self.metrics {
            shared::send_metric!(metrics, BusinessMetrics::todo_operation(operation));
        }
    }
}
