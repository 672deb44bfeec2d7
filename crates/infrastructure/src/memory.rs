use crate::repositories::TodoStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{OwnerId, Todo, TodoId, TodoUpdate};
use shared::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// プロセス内メモリ上のストア（ローカル実行・テスト用）
///
/// 所有者ごとに挿入順を保持する。
#[derive(Default)]
pub struct InMemoryTodoStore {
    items: RwLock<HashMap<OwnerId, Vec<Todo>>>,
    unavailable: AtomicBool,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// true の間はすべての操作が失敗する
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 全所有者の総アイテム数
    pub async fn len(&self) -> usize {
        self.items.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 1件取得
    pub async fn get(&self, owner_id: &OwnerId, todo_id: &TodoId) -> Option<Todo> {
        self.items
            .read()
            .await
            .get(owner_id)
            .and_then(|todos| todos.iter().find(|t| &t.todo_id == todo_id))
            .cloned()
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::DynamoDb("in-memory store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn put(&self, todo: &Todo) -> Result<(), AppError> {
        self.check_available()?;

        let mut items = self.items.write().await;
        let todos = items.entry(todo.owner_id.clone()).or_default();
        match todos.iter_mut().find(|t| t.todo_id == todo.todo_id) {
            Some(existing) => *existing = todo.clone(),
            None => todos.push(todo.clone()),
        }
        Ok(())
    }

    async fn query_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Todo>, AppError> {
        self.check_available()?;

        Ok(self
            .items
            .read()
            .await
            .get(owner_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update(
        &self,
        owner_id: &OwnerId,
        todo_id: &TodoId,
        update: &TodoUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.check_available()?;

        let mut items = self.items.write().await;
        let todo = items
            .get_mut(owner_id)
            .and_then(|todos| todos.iter_mut().find(|t| &t.todo_id == todo_id))
            .ok_or_else(|| AppError::NotFound(format!("{owner_id}/{todo_id}")))?;

        todo.apply(update, updated_at);
        Ok(())
    }

    async fn delete(&self, owner_id: &OwnerId, todo_id: &TodoId) -> Result<(), AppError> {
        self.check_available()?;

        let mut items = self.items.write().await;
        if let Some(todos) = items.get_mut(owner_id) {
            todos.retain(|t| &t.todo_id != todo_id);
            if todos.is_empty() {
                items.remove(owner_id);
            }
        }
        Ok(())
    }
}
