use crate::error::RepositoryError;
use crate::models::{
    item_to_todo, todo_to_item, DynamoDbKeys, ATTR_DESCRIPTION, ATTR_PK, ATTR_SK, ATTR_TITLE,
    ATTR_UPDATED_AT, TODO_PARTITION,
};
use crate::DynamoDbClient;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::Utc;
use domain::{Todo, TodoId, ValidTodo};
use std::collections::HashMap;
use tracing::{debug, info};

/// Todo の永続化境界
///
/// - `insert` は ID と作成/更新日時を採番する
/// - `list_all` は作成日時の新しい順
/// - 該当 ID が無い更新・削除は `RepositoryError::NotFound`
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn insert(&self, input: ValidTodo) -> Result<Todo, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<Todo>, RepositoryError>;

    async fn update_by_id(&self, id: &TodoId, input: ValidTodo) -> Result<Todo, RepositoryError>;

    async fn delete_by_id(&self, id: &TodoId) -> Result<(), RepositoryError>;
}

/// DynamoDB をドキュメントストアとして使うリポジトリ
#[derive(Clone)]
pub struct DynamoDbTodoRepository {
    db: DynamoDbClient,
}

impl DynamoDbTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for DynamoDbTodoRepository {
    async fn insert(&self, input: ValidTodo) -> Result<Todo, RepositoryError> {
        let todo = Todo::create(input, Utc::now());
        info!("Todoを保存中: todo_id={}", todo.id);

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(&todo)))
            .condition_expression("attribute_not_exists(PK) AND attribute_not_exists(SK)")
            .send()
            .await
            .map_err(|e| self.db.convert_error(e))?;

        debug!("Todo保存完了: {}", todo.id);
        Ok(todo)
    }

    async fn list_all(&self) -> Result<Vec<Todo>, RepositoryError> {
        let mut todos = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .db
                .client()
                .query()
                .table_name(self.db.table_name())
                .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(TODO_PARTITION.to_string()))
                .expression_attribute_values(":sk_prefix", AttributeValue::S("TODO#".to_string()))
                // SK は ULID なので降順 = 新しい順
                .scan_index_forward(false)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| self.db.convert_error(e))?;

            for item in output.items() {
                todos.push(item_to_todo(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!("Todo一覧取得完了: {} 件", todos.len());
        Ok(todos)
    }

    async fn update_by_id(&self, id: &TodoId, input: ValidTodo) -> Result<Todo, RepositoryError> {
        info!("Todoを更新中: todo_id={}", id);
        let keys = DynamoDbKeys::for_todo(id);

        let mut builder = self
            .db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .key(ATTR_PK, AttributeValue::S(keys.pk))
            .key(ATTR_SK, AttributeValue::S(keys.sk))
            .condition_expression("attribute_exists(PK)")
            .expression_attribute_names("#title", ATTR_TITLE)
            .expression_attribute_names("#description", ATTR_DESCRIPTION)
            .expression_attribute_names("#updated_at", ATTR_UPDATED_AT)
            .expression_attribute_values(":title", AttributeValue::S(input.title().to_string()))
            .expression_attribute_values(
                ":updated_at",
                AttributeValue::S(Utc::now().to_rfc3339()),
            )
            .return_values(ReturnValue::AllNew);

        // 説明が無い場合は属性ごと消す
        let expression = match input.description() {
            Some(description) => {
                builder = builder.expression_attribute_values(
                    ":description",
                    AttributeValue::S(description.to_string()),
                );
                "SET #title = :title, #description = :description, #updated_at = :updated_at"
            }
            None => "SET #title = :title, #updated_at = :updated_at REMOVE #description",
        };

        let output = builder
            .update_expression(expression)
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if not_found {
                    RepositoryError::NotFound
                } else {
                    self.db.convert_error(e)
                }
            })?;

        let item = output.attributes().ok_or(RepositoryError::NotFound)?;
        item_to_todo(item)
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<(), RepositoryError> {
        info!("Todoを削除中: todo_id={}", id);

        self.db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .set_key(Some(DynamoDbKeys::for_todo(id).to_key_map()))
            .condition_expression("attribute_exists(PK)")
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if not_found {
                    RepositoryError::NotFound
                } else {
                    self.db.convert_error(e)
                }
            })?;

        debug!("Todo削除完了: {}", id);
        Ok(())
    }
}
