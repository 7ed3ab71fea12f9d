use thiserror::Error;

/// データ層のエラー
///
/// `NotFound` は「該当 ID のレコードが無い」ことを表し、ストレージ障害とは区別する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Todo not found")]
    NotFound,

    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Corrupted item: {0}")]
    Corrupted(String),
}
