use crate::error::RepositoryError;
use crate::repositories::TodoRepository;
use async_trait::async_trait;
use chrono::Utc;
use domain::{Todo, TodoId, ValidTodo};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// 簡易な InMemory 実装（開発/テスト用）
///
/// TodoId は単調増加する ULID なので、BTreeMap の逆順がそのまま新しい順になる。
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<BTreeMap<TodoId, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<TodoId, Todo>> {
        self.todos.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn insert(&self, input: ValidTodo) -> Result<Todo, RepositoryError> {
        let todo = Todo::create(input, Utc::now());
        self.lock().insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    async fn list_all(&self) -> Result<Vec<Todo>, RepositoryError> {
        Ok(self.lock().values().rev().cloned().collect())
    }

    async fn update_by_id(&self, id: &TodoId, input: ValidTodo) -> Result<Todo, RepositoryError> {
        let mut todos = self.lock();
        let todo = todos.get_mut(id).ok_or(RepositoryError::NotFound)?;
        todo.revise(input, Utc::now());
        Ok(todo.clone())
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<(), RepositoryError> {
        self.lock()
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
