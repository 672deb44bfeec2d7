use super::{finish, MISSING_USER_IDENTITY};
use crate::request::ApiGatewayProxyRequest;
use crate::response::{ApiGatewayProxyResponse, COLLECTION_METHODS};
use crate::state::AppState;
use domain::{OwnerId, Todo};
use infrastructure::TodoStore;
use shared::{AppError, TodoOperation};
use tracing::info;

/// 呼び出し元の ToDo を全件取得する（順序は保証しない）
pub async fn list_todos(
    store: &dyn TodoStore,
    owner_id: Option<&OwnerId>,
) -> Result<Vec<Todo>, AppError> {
    let owner_id =
        owner_id.ok_or_else(|| AppError::Validation(MISSING_USER_IDENTITY.to_string()))?;

    let todos = store.query_by_owner(owner_id).await?;
    info!(count = todos.len(), "ToDo一覧取得完了");
    Ok(todos)
}

/// `GET /todos` ハンドラー
pub async fn handle_list(
    request: &ApiGatewayProxyRequest,
    state: &AppState,
) -> ApiGatewayProxyResponse {
    let owner_id = request.owner_id();
    let result = list_todos(state.store(), owner_id.as_ref()).await;

    finish(state, request, TodoOperation::List, 200, COLLECTION_METHODS, result).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure::InMemoryTodoStore;

    #[tokio::test]
    async fn test_list_returns_only_own_items() {
        let store = InMemoryTodoStore::new();
        let alice = OwnerId::parse("alice").unwrap();
        let bob = OwnerId::parse("bob").unwrap();
        store.put(&Todo::create(alice.clone(), "a").unwrap()).await.unwrap();
        store.put(&Todo::create(bob.clone(), "b").unwrap()).await.unwrap();

        let todos = list_todos(&store, Some(&alice)).await.unwrap();

        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].owner_id, alice);
    }

    #[tokio::test]
    async fn test_list_empty_owner_is_empty_array() {
        let store = InMemoryTodoStore::new();
        let owner = OwnerId::parse("nobody").unwrap();

        assert!(list_todos(&store, Some(&owner)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_without_owner_is_rejected() {
        let store = InMemoryTodoStore::new();

        let result = list_todos(&store, None).await;

        assert!(
            matches!(result, Err(AppError::Validation(ref msg)) if msg == MISSING_USER_IDENTITY)
        );
    }
}
