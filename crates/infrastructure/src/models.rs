use crate::error::RepositoryError;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use domain::{Todo, TodoId};
use std::collections::HashMap;

/// 全 Todo を収めるパーティション（単一ユーザーなので 1 つで足りる）
pub const TODO_PARTITION: &str = "TODOS";
pub const TODO_ENTITY_TYPE: &str = "Todo";

pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_ENTITY_TYPE: &str = "EntityType";
pub const ATTR_ID: &str = "Id";
pub const ATTR_TITLE: &str = "Title";
pub const ATTR_DESCRIPTION: &str = "Description";
pub const ATTR_CREATED_AT: &str = "CreatedAt";
pub const ATTR_UPDATED_AT: &str = "UpdatedAt";

/// DynamoDB Single Table Design のキー構造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbKeys {
    pub pk: String, // パーティションキー
    pub sk: String, // ソートキー（ULID 順 = 作成順）
}

impl DynamoDbKeys {
    pub fn for_todo(todo_id: &TodoId) -> Self {
        Self {
            pk: TODO_PARTITION.to_string(),
            sk: format!("TODO#{}", todo_id.as_str()),
        }
    }

    pub fn to_key_map(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (ATTR_PK.to_string(), AttributeValue::S(self.pk.clone())),
            (ATTR_SK.to_string(), AttributeValue::S(self.sk.clone())),
        ])
    }
}

/// Todo を DynamoDB アイテムに変換
pub fn todo_to_item(todo: &Todo) -> HashMap<String, AttributeValue> {
    let mut map = DynamoDbKeys::for_todo(&todo.id).to_key_map();

    map.insert(
        ATTR_ENTITY_TYPE.to_string(),
        AttributeValue::S(TODO_ENTITY_TYPE.to_string()),
    );
    map.insert(ATTR_ID.to_string(), AttributeValue::S(todo.id.as_str().to_string()));
    map.insert(ATTR_TITLE.to_string(), AttributeValue::S(todo.title.clone()));

    if let Some(description) = &todo.description {
        map.insert(
            ATTR_DESCRIPTION.to_string(),
            AttributeValue::S(description.clone()),
        );
    }

    map.insert(
        ATTR_CREATED_AT.to_string(),
        AttributeValue::S(todo.created_at.to_rfc3339()),
    );
    map.insert(
        ATTR_UPDATED_AT.to_string(),
        AttributeValue::S(todo.updated_at.to_rfc3339()),
    );

    map
}

/// DynamoDB アイテムから Todo を復元
pub fn item_to_todo(item: &HashMap<String, AttributeValue>) -> Result<Todo, RepositoryError> {
    let id = string_attr(item, ATTR_ID)?;
    let id = TodoId::parse(id).map_err(|e| RepositoryError::Corrupted(e.to_string()))?;

    let description = match item.get(ATTR_DESCRIPTION) {
        Some(value) => Some(
            value
                .as_s()
                .map_err(|_| corrupted(ATTR_DESCRIPTION))?
                .clone(),
        ),
        None => None,
    };

    Ok(Todo {
        id,
        title: string_attr(item, ATTR_TITLE)?.to_string(),
        description,
        created_at: timestamp_attr(item, ATTR_CREATED_AT)?,
        updated_at: timestamp_attr(item, ATTR_UPDATED_AT)?,
    })
}

fn string_attr<'a>(
    item: &'a HashMap<String, AttributeValue>,
    name: &'static str,
) -> Result<&'a str, RepositoryError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(String::as_str)
        .ok_or_else(|| corrupted(name))
}

fn timestamp_attr(
    item: &HashMap<String, AttributeValue>,
    name: &'static str,
) -> Result<DateTime<Utc>, RepositoryError> {
    let raw = string_attr(item, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| corrupted(name))
}

fn corrupted(name: &str) -> RepositoryError {
    RepositoryError::Corrupted(format!("Missing or invalid {name}"))
}
