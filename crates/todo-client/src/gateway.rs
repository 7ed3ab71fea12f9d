//! API との通信
//!
//! [`TodoGateway`] を境界にしておき、テストではメモリ上の実装に差し替えます。

use async_trait::async_trait;
use domain::{Todo, TodoId, TodoInput};
use reqwest::{Client, Response};
use thiserror::Error;

/// 通信失敗の分類。画面には出さず、ログと reducer の分岐にのみ使う
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ClientError::Status(status.as_u16()),
            None => ClientError::Transport(err.to_string()),
        }
    }
}

#[async_trait]
pub trait TodoGateway: Send + Sync {
    /// 全件取得（サーバの返す順序のまま）
    async fn list(&self) -> Result<Vec<Todo>, ClientError>;

    async fn create(&self, input: &TodoInput) -> Result<Todo, ClientError>;

    async fn update(&self, id: &TodoId, input: &TodoInput) -> Result<Todo, ClientError>;

    async fn delete(&self, id: &TodoId) -> Result<(), ClientError>;
}

/// reqwest による HTTP 実装
#[derive(Clone)]
pub struct HttpTodoGateway {
    client: Client,
    base_url: String,
}

impl HttpTodoGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: &TodoId) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }
}

/// 2xx 以外は `ClientError::Status` にする
fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!(status = status.as_u16(), url = %response.url(), "request failed");
        Err(ClientError::Status(status.as_u16()))
    }
}

#[async_trait]
impl TodoGateway for HttpTodoGateway {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.client.get(self.todos_url()).send().await?;
        Ok(check(response)?.json().await?)
    }

    async fn create(&self, input: &TodoInput) -> Result<Todo, ClientError> {
        let response = self
            .client
            .post(self.todos_url())
            .json(input)
            .send()
            .await?;
        Ok(check(response)?.json().await?)
    }

    async fn update(&self, id: &TodoId, input: &TodoInput) -> Result<Todo, ClientError> {
        let response = self
            .client
            .put(self.todo_url(id))
            .json(input)
            .send()
            .await?;
        Ok(check(response)?.json().await?)
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ClientError> {
        let response = self.client.delete(self.todo_url(id)).send().await?;
        check(response)?;
        Ok(())
    }
}
