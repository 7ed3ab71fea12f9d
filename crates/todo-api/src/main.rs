//! todo-api バイナリのエントリポイント
//! 環境変数から設定を読み、HTTP サーバを起動します。

use infrastructure::{
    DynamoDbClient, DynamoDbTodoRepository, InMemoryTodoRepository, TodoRepository,
};
use shared::{init_tracing, Config, StorageBackend};
use std::sync::Arc;
use todo_api::{app_with_state, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing().map_err(|e| anyhow::anyhow!(e))?;

    let config = Config::from_env()?;

    let repo: Arc<dyn TodoRepository> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryTodoRepository::new()),
        StorageBackend::DynamoDb => {
            let client = DynamoDbClient::new(&config).await;
            client.ensure_table().await?;
            Arc::new(DynamoDbTodoRepository::new(client))
        }
    };

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = %config.environment,
        storage = ?config.storage,
        table = %config.dynamodb_table,
        "server starting"
    );

    axum::serve(listener, app_with_state(AppState::new(repo)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
