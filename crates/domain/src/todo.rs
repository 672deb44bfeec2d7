use crate::errors::DomainError;
use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// タイトルの最大文字数
pub const MAX_TITLE_LENGTH: usize = 200;

/// ToDo の識別子（作成時にサーバー側で採番するランダムなトークン）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// 外部から受け取った識別子を検証して取り込む
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::InvalidTodoId("empty".to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 所有者の識別子（IdP が発行するクレームの `sub`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidOwnerId("empty".to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// タイトルを検証し、前後の空白を除去した値を返す
pub fn validate_title(raw: &str) -> Result<String, DomainError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}

/// ToDo アイテム
///
/// `(owner_id, todo_id)` で一意に識別される。`owner_id` と `created_at` は
/// 作成後に変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "userId")]
    pub owner_id: OwnerId,
    pub todo_id: TodoId,
    pub title: String,
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// 新しい ToDo を作成（識別子とタイムスタンプはここで確定する）
    pub fn create(owner_id: OwnerId, title: &str) -> Result<Self, DomainError> {
        Self::create_at(owner_id, title, timestamp::now())
    }

    pub fn create_at(
        owner_id: OwnerId,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = validate_title(title)?;

        Ok(Self {
            owner_id,
            todo_id: TodoId::new(),
            title,
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// 更新内容を適用する。タイトル・完了フラグ・更新日時のみ変わる。
    pub fn apply(&mut self, update: &TodoUpdate, now: DateTime<Utc>) {
        self.title = update.title.clone();
        self.completed = update.completed;
        self.updated_at = now;
    }
}

/// 上書き更新の内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: String,
    pub completed: bool,
}

impl TodoUpdate {
    pub fn new(title: &str, completed: bool) -> Result<Self, DomainError> {
        Ok(Self {
            title: validate_title(title)?,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn owner() -> OwnerId {
        OwnerId::parse("user-123").unwrap()
    }

    #[test]
    fn test_create_sets_defaults() {
        let todo = Todo::create(owner(), "  Buy milk ").unwrap();

        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
        assert_eq!(todo.owner_id, owner());
    }

    #[test]
    fn test_create_generates_unique_ids() {
        let ids: HashSet<_> = (0..100)
            .map(|_| Todo::create(owner(), "task").unwrap().todo_id)
            .collect();

        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        assert!(matches!(
            Todo::create(owner(), "   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_title_length_limit() {
        let ok = "a".repeat(MAX_TITLE_LENGTH);
        let too_long = "a".repeat(MAX_TITLE_LENGTH + 1);

        assert!(validate_title(&ok).is_ok());
        assert!(validate_title(&too_long).is_err());
    }

    #[test]
    fn test_apply_keeps_identity_and_created_at() {
        let mut todo = Todo::create(owner(), "Buy milk").unwrap();
        let before = todo.clone();
        let later = before.created_at + chrono::Duration::seconds(5);

        todo.apply(&TodoUpdate::new("Buy oat milk", true).unwrap(), later);

        assert_eq!(todo.owner_id, before.owner_id);
        assert_eq!(todo.todo_id, before.todo_id);
        assert_eq!(todo.created_at, before.created_at);
        assert_eq!(todo.updated_at, later);
        assert_eq!(todo.title, "Buy oat milk");
        assert!(todo.completed);
    }

    #[test]
    fn test_serializes_with_store_field_names() {
        let todo = Todo::create(owner(), "Buy milk").unwrap();
        let value = serde_json::to_value(&todo).unwrap();

        assert_eq!(value["userId"], "user-123");
        assert_eq!(value["todoId"], todo.todo_id.as_str());
        assert_eq!(value["completed"], false);
        assert_eq!(value["createdAt"], value["updatedAt"]);
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_ids_reject_empty() {
        assert!(TodoId::parse("").is_err());
        assert!(OwnerId::parse(" ").is_err());
        assert_eq!(TodoId::parse(" abc ").unwrap().as_str(), "abc");
    }
}
