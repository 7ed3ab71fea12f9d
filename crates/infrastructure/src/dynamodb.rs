use crate::error::RepositoryError;
use aws_sdk_dynamodb::config::{Credentials, Region, SharedCredentialsProvider};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::client::Waiters;
use aws_sdk_dynamodb::types::TableStatus;
use aws_sdk_dynamodb::Client;
use shared::Config;
use std::time::Duration;
use tracing::{debug, info};

/// 作成したテーブルが ACTIVE になるまでの待ち時間の上限
pub const TABLE_ACTIVE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    pub async fn new(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));

        if let Some(endpoint) = &config.dynamodb_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        if uses_placeholder_credentials(config) {
            // DynamoDB Local は認証情報の中身を検証しない
            loader = loader.credentials_provider(SharedCredentialsProvider::new(
                Credentials::new("local", "local", None, None, "static"),
            ));
        }

        let aws_config = loader.load().await;
        let client = Client::new(&aws_config);

        Self {
            client,
            table_name: config.dynamodb_table.clone(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// SDK エラーを詳細付きの文字列に変換
    pub fn convert_error<E>(&self, err: E) -> RepositoryError
    where
        E: std::error::Error,
    {
        RepositoryError::DynamoDb(DisplayErrorContext(err).to_string())
    }

    /// テーブルが無ければ作成し、ACTIVE になるまで待つ（PK/SK の複合キー、オンデマンド課金）
    pub async fn ensure_table(&self) -> Result<(), RepositoryError> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(output) => {
                let status = output.table().and_then(|t| t.table_status());
                if status == Some(&TableStatus::Active) {
                    debug!("テーブル確認済み: {}", self.table_name);
                    return Ok(());
                }
                // 別プロセスが作成中
                return self.wait_until_active().await;
            }
            Err(e) => {
                let missing = e
                    .as_service_error()
                    .map(|se| se.is_resource_not_found_exception())
                    .unwrap_or(false);
                if !missing {
                    return Err(self.convert_error(e));
                }
            }
        }

        info!("テーブルを作成します: {}", self.table_name);

        let result = self
            .client
            .create_table()
            .table_name(&self.table_name)
            .billing_mode(BillingMode::PayPerRequest)
            .attribute_definitions(key_attribute("PK")?)
            .attribute_definitions(key_attribute("SK")?)
            .key_schema(key_schema("PK", KeyType::Hash)?)
            .key_schema(key_schema("SK", KeyType::Range)?)
            .send()
            .await;

        match result {
            Ok(_) => {}
            // 並行起動した別プロセスが先に作成した場合
            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_resource_in_use_exception())
                    .unwrap_or(false) => {}
            Err(e) => return Err(self.convert_error(e)),
        }

        // CREATING 中の書き込み・読み込みは ResourceNotFound になる
        self.wait_until_active().await
    }

    async fn wait_until_active(&self) -> Result<(), RepositoryError> {
        debug!("テーブルが ACTIVE になるのを待機中: {}", self.table_name);
        self.client
            .wait_until_table_exists()
            .table_name(&self.table_name)
            .wait(TABLE_ACTIVE_TIMEOUT)
            .await
            .map_err(|e| self.convert_error(e))?;

        info!("テーブル準備完了: {}", self.table_name);
        Ok(())
    }
}

/// エンドポイント上書きがあり、アクセスキーが未設定なら固定のダミー認証情報を使う
fn uses_placeholder_credentials(config: &Config) -> bool {
    config.dynamodb_endpoint.is_some() && config.aws_access_key_id.is_none()
}

fn key_attribute(name: &str) -> Result<AttributeDefinition, RepositoryError> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| RepositoryError::DynamoDb(e.to_string()))
}

fn key_schema(name: &str, key_type: KeyType) -> Result<KeySchemaElement, RepositoryError> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| RepositoryError::DynamoDb(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_credentials_only_for_local_endpoint() {
        let local = Config {
            dynamodb_endpoint: Some("http://localhost:8001".to_string()),
            ..Config::default()
        };
        assert!(uses_placeholder_credentials(&local));

        let local_with_keys = Config {
            aws_access_key_id: Some("AKIDEXAMPLE".to_string()),
            ..local
        };
        assert!(!uses_placeholder_credentials(&local_with_keys));

        // 本番 AWS では既定の認証チェーンに任せる
        assert!(!uses_placeholder_credentials(&Config::default()));
    }
}
