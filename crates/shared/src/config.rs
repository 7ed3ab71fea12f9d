use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// 永続化先の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    /// プロセス内メモリ（ローカル開発・テスト用）
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StorageBackend::DynamoDb),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

/// 環境変数から組み立てるサーバ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub storage: StorageBackend,
    pub dynamodb_table: String,
    /// DynamoDB Local などへの接続先上書き
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: String,
    /// 未設定かつ接続先上書きありの場合、DynamoDB Local 用のダミー認証情報を使う
    pub aws_access_key_id: Option<String>,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            storage: StorageBackend::DynamoDb,
            dynamodb_table: "todos".to_string(),
            dynamodb_endpoint: None,
            aws_region: "us-east-1".to_string(),
            aws_access_key_id: None,
            environment: "dev".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む（未設定の項目は既定値）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { name: "PORT", value: v })?,
            None => defaults.port,
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(v) => v
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidValue { name: "BIND_ADDR", value: v })?,
            None => defaults.bind_addr,
        };

        let storage = match lookup("STORAGE_BACKEND") {
            Some(v) => v
                .parse::<StorageBackend>()
                .map_err(|_| ConfigError::InvalidValue { name: "STORAGE_BACKEND", value: v })?,
            None => defaults.storage,
        };

        Ok(Config {
            bind_addr,
            port,
            storage,
            dynamodb_table: lookup("DYNAMODB_TABLE").unwrap_or(defaults.dynamodb_table),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|v| !v.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or(defaults.aws_region),
            aws_access_key_id: lookup("AWS_ACCESS_KEY_ID").filter(|v| !v.is_empty()),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
