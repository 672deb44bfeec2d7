use super::{finish, MISSING_REQUIRED_FIELDS};
use crate::request::ApiGatewayProxyRequest;
use crate::response::{ApiGatewayProxyResponse, DELETE_METHODS};
use crate::state::AppState;
use domain::{OwnerId, TodoId};
use infrastructure::TodoStore;
use serde_json::json;
use shared::{AppError, TodoOperation};
use tracing::info;

/// ToDo を削除する。存在しないアイテムの削除も成功として扱う。
pub async fn delete_todo(
    store: &dyn TodoStore,
    owner_id: Option<&OwnerId>,
    todo_id: Option<&TodoId>,
) -> Result<(), AppError> {
    let (Some(owner_id), Some(todo_id)) = (owner_id, todo_id) else {
        return Err(AppError::Validation(MISSING_REQUIRED_FIELDS.to_string()));
    };

    store.delete(owner_id, todo_id).await?;
    info!(todo_id = %todo_id, "ToDo削除完了");
    Ok(())
}

/// `DELETE /todos/{id}` ハンドラー
pub async fn handle_delete(
    request: &ApiGatewayProxyRequest,
    state: &AppState,
) -> ApiGatewayProxyResponse {
    let owner_id = request.owner_id();
    let todo_id = request.todo_id();
    let result = delete_todo(state.store(), owner_id.as_ref(), todo_id.as_ref())
        .await
        .map(|()| json!({ "message": "Todo deleted successfully" }));

    finish(state, request, TodoOperation::Delete, 200, DELETE_METHODS, result).await
}
