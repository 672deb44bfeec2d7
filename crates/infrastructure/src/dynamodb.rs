use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::config::{Builder as DynamoDbConfigBuilder, Region};
use aws_sdk_dynamodb::Client;
use shared::Config;
use tracing::info;

/// AWS SDK 共通設定を読み込む（DynamoDB / CloudWatch で共有）
pub async fn load_sdk_config(config: &Config) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await
}

#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    pub async fn new(config: &Config) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::from_sdk_config(&sdk_config, config)
    }

    /// `DYNAMODB_ENDPOINT` の上書きは DynamoDB クライアントにだけ適用する
    pub fn from_sdk_config(sdk_config: &SdkConfig, config: &Config) -> Self {
        let mut builder = DynamoDbConfigBuilder::from(sdk_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            info!(endpoint = %endpoint, "DynamoDB エンドポイントを上書き");
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name: config.dynamodb_table.clone(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}
