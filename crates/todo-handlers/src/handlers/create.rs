use super::{finish, MISSING_REQUIRED_FIELDS};
use crate::request::ApiGatewayProxyRequest;
use crate::response::{ApiGatewayProxyResponse, COLLECTION_METHODS};
use crate::state::AppState;
use domain::{OwnerId, Todo};
use infrastructure::TodoStore;
use serde::Deserialize;
use shared::{AppError, TodoOperation};
use tracing::info;

/// `POST /todos` のリクエストボディ
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// ToDo を作成して保存する
///
/// 所有者・タイトルのどちらかが欠けていれば何も書き込まずに検証エラーを返す。
pub async fn create_todo(
    store: &dyn TodoStore,
    owner_id: Option<&OwnerId>,
    title: Option<&str>,
) -> Result<Todo, AppError> {
    let (Some(owner_id), Some(title)) = (owner_id, title.filter(|t| !t.trim().is_empty())) else {
        return Err(AppError::Validation(MISSING_REQUIRED_FIELDS.to_string()));
    };

    let todo = Todo::create(owner_id.clone(), title)?;
    store.put(&todo).await?;

    info!(todo_id = %todo.todo_id, "ToDo作成完了");
    Ok(todo)
}

/// `POST /todos` ハンドラー（成功時 201 と作成したアイテム）
pub async fn handle_create(
    request: &ApiGatewayProxyRequest,
    state: &AppState,
) -> ApiGatewayProxyResponse {
    let owner_id = request.owner_id();
    let result = match request.json_body::<CreateTodoRequest>() {
        Ok(body) => create_todo(state.store(), owner_id.as_ref(), body.title.as_deref()).await,
        Err(e) => Err(e),
    };

    finish(
        state,
        request,
        TodoOperation::Create,
        201,
        COLLECTION_METHODS,
        result,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure::InMemoryTodoStore;

    fn owner() -> OwnerId {
        OwnerId::parse("user-1").unwrap()
    }

    #[tokio::test]
    async fn test_create_persists_item() {
        let store = InMemoryTodoStore::new();

        let todo = create_todo(&store, Some(&owner()), Some("Buy milk"))
            .await
            .unwrap();

        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
        assert_eq!(store.get(&owner(), &todo.todo_id).await, Some(todo));
    }

    #[tokio::test]
    async fn test_create_without_owner_writes_nothing() {
        let store = InMemoryTodoStore::new();

        let result = create_todo(&store, None, Some("Buy milk")).await;

        assert!(
            matches!(result, Err(AppError::Validation(ref msg)) if msg == MISSING_REQUIRED_FIELDS)
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_with_blank_title_writes_nothing() {
        let store = InMemoryTodoStore::new();

        for title in [None, Some(""), Some("   ")] {
            let result = create_todo(&store, Some(&owner()), title).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_title() {
        let store = InMemoryTodoStore::new();
        let title = "x".repeat(domain::MAX_TITLE_LENGTH + 1);

        let result = create_todo(&store, Some(&owner()), Some(&title)).await;

        assert!(matches!(result, Err(AppError::Domain(_))));
        assert!(store.is_empty().await);
    }
}
