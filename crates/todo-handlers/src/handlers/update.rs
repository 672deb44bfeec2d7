use super::{finish, MISSING_REQUIRED_FIELDS};
use crate::request::ApiGatewayProxyRequest;
use crate::response::{ApiGatewayProxyResponse, UPDATE_METHODS};
use crate::state::AppState;
use domain::{timestamp, OwnerId, TodoId, TodoUpdate};
use infrastructure::TodoStore;
use serde::Deserialize;
use serde_json::json;
use shared::{AppError, TodoOperation};
use tracing::info;

/// `PUT /todos/{id}` のリクエストボディ（タイトルと完了フラグの両方が必須）
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// タイトルと完了フラグを上書きし、更新日時を現在時刻にする
///
/// 存在しないアイテムは `AppError::NotFound` となり、新規作成はしない。
pub async fn update_todo(
    store: &dyn TodoStore,
    owner_id: Option<&OwnerId>,
    todo_id: Option<&TodoId>,
    title: Option<&str>,
    completed: Option<bool>,
) -> Result<(), AppError> {
    let (Some(owner_id), Some(todo_id), Some(title), Some(completed)) = (
        owner_id,
        todo_id,
        title.filter(|t| !t.trim().is_empty()),
        completed,
    ) else {
        return Err(AppError::Validation(MISSING_REQUIRED_FIELDS.to_string()));
    };

    let update = TodoUpdate::new(title, completed)?;
    store
        .update(owner_id, todo_id, &update, timestamp::now())
        .await?;

    info!(todo_id = %todo_id, completed, "ToDo更新完了");
    Ok(())
}

/// `PUT /todos/{id}` ハンドラー
pub async fn handle_update(
    request: &ApiGatewayProxyRequest,
    state: &AppState,
) -> ApiGatewayProxyResponse {
    let owner_id = request.owner_id();
    let todo_id = request.todo_id();
    let result = match request.json_body::<UpdateTodoRequest>() {
        Ok(body) => {
            update_todo(
                state.store(),
                owner_id.as_ref(),
                todo_id.as_ref(),
                body.title.as_deref(),
                body.completed,
            )
            .await
        }
        Err(e) => Err(e),
    }
    .map(|()| json!({ "message": "Todo updated successfully" }));

    finish(state, request, TodoOperation::Update, 200, UPDATE_METHODS, result).await
}
