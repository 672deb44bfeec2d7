use crate::models::{attributes, key_attributes, todo_from_item, todo_to_item};
use crate::DynamoDbClient;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use domain::{timestamp, OwnerId, Todo, TodoId, TodoUpdate};
use shared::{telemetry::trace_store_operation, AppError};
use tracing::warn;

/// ToDo アイテムの永続化ポート
///
/// すべての操作は呼び出し元の所有者 ID にスコープされる。
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// 無条件に保存する
    async fn put(&self, todo: &Todo) -> Result<(), AppError>;

    /// 所有者の全アイテムを取得（順序はストア依存）
    async fn query_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Todo>, AppError>;

    /// タイトル・完了フラグ・更新日時を上書きする
    ///
    /// アイテムが存在しない場合は `AppError::NotFound` を返し、何も書き込まない。
    async fn update(
        &self,
        owner_id: &OwnerId,
        todo_id: &TodoId,
        update: &TodoUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// 削除する（存在しなくてもエラーにしない）
    async fn delete(&self, owner_id: &OwnerId, todo_id: &TodoId) -> Result<(), AppError>;
}

/// DynamoDB 上の ToDo テーブル
pub struct DynamoTodoStore {
    db: DynamoDbClient,
}

impl DynamoTodoStore {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

fn dynamodb_error<E>(error: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::DynamoDb(DisplayErrorContext(error).to_string())
}

#[async_trait]
impl TodoStore for DynamoTodoStore {
    async fn put(&self, todo: &Todo) -> Result<(), AppError> {
        trace_store_operation(self.db.table_name(), "PutItem", async {
            self.db
                .client()
                .put_item()
                .table_name(self.db.table_name())
                .set_item(Some(todo_to_item(todo)))
                .send()
                .await
                .map_err(dynamodb_error)?;
            Ok(())
        })
        .await
    }

    async fn query_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Todo>, AppError> {
        trace_store_operation(self.db.table_name(), "Query", async {
            let mut todos = Vec::new();
            let mut start_key = None;

            // 1MB を超える結果はページ分割されるため LastEvaluatedKey を辿る
            loop {
                let output = self
                    .db
                    .client()
                    .query()
                    .table_name(self.db.table_name())
                    .key_condition_expression("#owner = :owner")
                    .expression_attribute_names("#owner", attributes::OWNER_ID)
                    .expression_attribute_values(
                        ":owner",
                        AttributeValue::S(owner_id.as_str().to_string()),
                    )
                    .set_exclusive_start_key(start_key.take())
                    .send()
                    .await
                    .map_err(dynamodb_error)?;

                for item in output.items() {
                    match todo_from_item(item) {
                        Ok(todo) => todos.push(todo),
                        Err(e) => warn!(owner_id = %owner_id, error = %e, "不正なアイテムをスキップ"),
                    }
                }

                match output.last_evaluated_key() {
                    Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                    _ => break,
                }
            }

            Ok(todos)
        })
        .await
    }

    async fn update(
        &self,
        owner_id: &OwnerId,
        todo_id: &TodoId,
        update: &TodoUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        trace_store_operation(self.db.table_name(), "UpdateItem", async {
            let result = self
                .db
                .client()
                .update_item()
                .table_name(self.db.table_name())
                .set_key(Some(key_attributes(owner_id, todo_id)))
                .update_expression(
                    "SET #title = :title, #completed = :completed, #updatedAt = :updatedAt",
                )
                .condition_expression("attribute_exists(#todoId)")
                .expression_attribute_names("#title", attributes::TITLE)
                .expression_attribute_names("#completed", attributes::COMPLETED)
                .expression_attribute_names("#updatedAt", attributes::UPDATED_AT)
                .expression_attribute_names("#todoId", attributes::TODO_ID)
                .expression_attribute_values(":title", AttributeValue::S(update.title.clone()))
                .expression_attribute_values(":completed", AttributeValue::Bool(update.completed))
                .expression_attribute_values(
                    ":updatedAt",
                    AttributeValue::S(timestamp::format(&updated_at)),
                )
                .send()
                .await;

            match result {
                Ok(_) => Ok(()),
                Err(e)
                    if e.as_service_error()
                        .map(|se| se.is_conditional_check_failed_exception())
                        .unwrap_or(false) =>
                {
                    Err(AppError::NotFound(format!("{owner_id}/{todo_id}")))
                }
                Err(e) => Err(dynamodb_error(e)),
            }
        })
        .await
    }

    async fn delete(&self, owner_id: &OwnerId, todo_id: &TodoId) -> Result<(), AppError> {
        trace_store_operation(self.db.table_name(), "DeleteItem", async {
            self.db
                .client()
                .delete_item()
                .table_name(self.db.table_name())
                .set_key(Some(key_attributes(owner_id, todo_id)))
                .send()
                .await
                .map_err(dynamodb_error)?;
            Ok(())
        })
        .await
    }
}
