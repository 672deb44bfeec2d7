use aws_sdk_dynamodb::types::AttributeValue;
use domain::{timestamp, OwnerId, Todo, TodoId};
use std::collections::HashMap;
use thiserror::Error;

/// テーブルの属性名
pub mod attributes {
    /// パーティションキー
    pub const OWNER_ID: &str = "userId";
    /// ソートキー
    pub const TODO_ID: &str = "todoId";
    pub const TITLE: &str = "title";
    pub const COMPLETED: &str = "completed";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Missing required attribute: {0}")]
    MissingAttribute(&'static str),
    #[error("Invalid attribute type for {0}")]
    InvalidType(&'static str),
    #[error("Invalid attribute value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// キー属性のみのマップ
pub fn key_attributes(owner_id: &OwnerId, todo_id: &TodoId) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            attributes::OWNER_ID.to_string(),
            AttributeValue::S(owner_id.as_str().to_string()),
        ),
        (
            attributes::TODO_ID.to_string(),
            AttributeValue::S(todo_id.as_str().to_string()),
        ),
    ])
}

/// DynamoDB AttributeValue マップに変換
pub fn todo_to_item(todo: &Todo) -> HashMap<String, AttributeValue> {
    let mut item = key_attributes(&todo.owner_id, &todo.todo_id);

    item.insert(
        attributes::TITLE.to_string(),
        AttributeValue::S(todo.title.clone()),
    );
    item.insert(
        attributes::COMPLETED.to_string(),
        AttributeValue::Bool(todo.completed),
    );
    item.insert(
        attributes::CREATED_AT.to_string(),
        AttributeValue::S(timestamp::format(&todo.created_at)),
    );
    item.insert(
        attributes::UPDATED_AT.to_string(),
        AttributeValue::S(timestamp::format(&todo.updated_at)),
    );

    item
}

/// DynamoDB AttributeValue マップから復元
///
/// `createdAt` が無い古いアイテムは `updatedAt` で補う。それ以外の欠落はエラー。
pub fn todo_from_item(item: &HashMap<String, AttributeValue>) -> Result<Todo, ModelError> {
    let owner_id = get_string(item, attributes::OWNER_ID)?;
    let todo_id = get_string(item, attributes::TODO_ID)?;

    let completed = match item.get(attributes::COMPLETED) {
        Some(value) => *value
            .as_bool()
            .map_err(|_| ModelError::InvalidType(attributes::COMPLETED))?,
        None => return Err(ModelError::MissingAttribute(attributes::COMPLETED)),
    };

    let updated_at = get_timestamp(item, attributes::UPDATED_AT)?;
    let created_at = match item.get(attributes::CREATED_AT) {
        Some(_) => get_timestamp(item, attributes::CREATED_AT)?,
        None => updated_at,
    };

    Ok(Todo {
        owner_id: OwnerId::parse(owner_id)
            .map_err(|e| ModelError::InvalidValue(attributes::OWNER_ID, e.to_string()))?,
        todo_id: TodoId::parse(todo_id)
            .map_err(|e| ModelError::InvalidValue(attributes::TODO_ID, e.to_string()))?,
        title: get_string(item, attributes::TITLE)?.to_string(),
        completed,
        created_at,
        updated_at,
    })
}

fn get_string<'a>(
    item: &'a HashMap<String, AttributeValue>,
    key: &'static str,
) -> Result<&'a str, ModelError> {
    item.get(key)
        .ok_or(ModelError::MissingAttribute(key))?
        .as_s()
        .map(String::as_str)
        .map_err(|_| ModelError::InvalidType(key))
}

fn get_timestamp(
    item: &HashMap<String, AttributeValue>,
    key: &'static str,
) -> Result<chrono::DateTime<chrono::Utc>, ModelError> {
    let raw = get_string(item, key)?;
    timestamp::parse(raw).map_err(|e| ModelError::InvalidValue(key, e.to_string()))
}
