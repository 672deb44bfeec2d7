use crate::errors::AppError;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use aws_sdk_cloudwatch::Client as CloudWatchClient;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::DateTime as AwsDateTime;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// PutMetricData 1 回あたりの上限
const MAX_DATUMS_PER_REQUEST: usize = 20;

/// CloudWatch カスタムメトリクス送信クライアント
///
/// すべてのデータポイントに `Environment` ディメンションを付与する。
#[derive(Clone)]
pub struct MetricsClient {
    client: CloudWatchClient,
    namespace: String,
    environment: String,
}

impl MetricsClient {
    pub fn new(client: CloudWatchClient, namespace: String, environment: String) -> Self {
        Self {
            client,
            namespace,
            environment,
        }
    }

    /// メトリクスを送信（上限ごとに分割）
    #[instrument(skip(self, metrics), fields(namespace = %self.namespace, count = metrics.len()))]
    pub async fn publish(&self, metrics: &[CustomMetric]) -> Result<(), AppError> {
        for data in self.batches(metrics) {
            let batch_size = data.len();

            self.client
                .put_metric_data()
                .namespace(&self.namespace)
                .set_metric_data(Some(data))
                .send()
                .await
                .map_err(|e| {
                    AppError::Internal(format!(
                        "PutMetricData failed: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            debug!(batch_size, "メトリクス送信完了");
        }
        Ok(())
    }

    fn batches(&self, metrics: &[CustomMetric]) -> Vec<Vec<MetricDatum>> {
        metrics
            .chunks(MAX_DATUMS_PER_REQUEST)
            .map(|chunk| chunk.iter().map(|m| self.to_datum(m)).collect())
            .collect()
    }

    fn to_datum(&self, metric: &CustomMetric) -> MetricDatum {
        let environment = Dimension::builder()
            .name("Environment")
            .value(&self.environment)
            .build();
        let dimensions = std::iter::once(environment)
            .chain(
                metric
                    .dimensions
                    .iter()
                    .map(|(name, value)| Dimension::builder().name(name).value(value).build()),
            )
            .collect::<Vec<_>>();

        MetricDatum::builder()
            .metric_name(&metric.name)
            .value(metric.value)
            .unit(metric.unit.clone())
            .timestamp(AwsDateTime::from_millis(metric.timestamp.timestamp_millis()))
            .set_dimensions(Some(dimensions))
            .build()
    }
}

/// 1 データポイント
#[derive(Debug, Clone, PartialEq)]
pub struct CustomMetric {
    pub name: String,
    pub value: f64,
    pub unit: StandardUnit,
    pub dimensions: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl CustomMetric {
    /// 件数メトリクス
    pub fn count(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            unit: StandardUnit::Count,
            dimensions: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(name.into(), value.into());
        self
    }
}

/// ToDo 操作の種類（メトリクスの Operation ディメンション）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoOperation {
    Create,
    List,
    Update,
    Delete,
}

impl TodoOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoOperation::Create => "CreateTodo",
            TodoOperation::List => "ListTodos",
            TodoOperation::Update => "UpdateTodo",
            TodoOperation::Delete => "DeleteTodo",
        }
    }
}

pub struct BusinessMetrics;

impl BusinessMetrics {
    /// 成功した ToDo 操作 1 件
    ///
    /// 所有者 ID はカーディナリティが高いためディメンションに含めない。
    pub fn todo_operation(operation: TodoOperation) -> CustomMetric {
        CustomMetric::count("TodoOperations", 1.0).with_dimension("Operation", operation.as_str())
    }
}

/// メトリクス送信のマクロ（送信失敗はログのみ）
#[macro_export]
macro_rules! send_metric {
    ($metrics_client:expr, $metric:expr) => {{
        if let Err(e) = $metrics_client.publish(&[$metric]).await {
            tracing::warn!(error = %e, "メトリクス送信失敗");
        }
    }};
}
