use thiserror::Error;

/// ドメインエラー（入力の不変条件違反）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),
}
