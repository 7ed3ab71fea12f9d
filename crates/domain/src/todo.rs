use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, OnceLock};
use ulid::{Generator, Ulid};

/// 同一ミリ秒内でも単調増加する ULID を払い出すためのジェネレータ
static ID_GENERATOR: OnceLock<Mutex<Generator>> = OnceLock::new();

/// Todo の識別子（ULID 文字列）
///
/// 採番はデータ層のみが行い、作成後は変更されない。
/// ULID は生成時刻順にソートできるため、一覧の新しい順の並びにもそのまま使える。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        let generator = ID_GENERATOR.get_or_init(|| Mutex::new(Generator::new()));
        let mut generator = generator.lock().unwrap_or_else(|e| e.into_inner());
        // 同一ミリ秒内で乱数部が溢れた場合のみ単調性を諦める
        let ulid = generator.generate().unwrap_or_else(|_| Ulid::new());
        Self(ulid.to_string())
    }

    /// 外部から受け取った文字列を検証して TodoId にする
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        Ulid::from_string(id)
            .map(|ulid| Self(ulid.to_string()))
            .map_err(|_| DomainError::InvalidTodoId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 永続化済みの Todo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// 検証済みの入力から新しい Todo を作成（ID はここで採番）
    pub fn create(input: ValidTodo, now: DateTime<Utc>) -> Self {
        Self {
            id: TodoId::new(),
            title: input.title,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// タイトルと説明を置き換える。ID と作成日時は変わらない
    pub fn revise(&mut self, input: ValidTodo, now: DateTime<Utc>) {
        self.title = input.title;
        self.description = input.description;
        self.updated_at = now;
    }
}

/// 作成・更新リクエストの本文 `{title, description}`
///
/// どちらのフィールドも欠けていてよく、検証は [`TodoInput::validate`] で行う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TodoInput {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: Some(title.into()),
            description,
        }
    }

    pub fn validate(self) -> Result<ValidTodo, DomainError> {
        ValidTodo::new(self.title.unwrap_or_default(), self.description)
    }
}

/// 検証済みの入力。空タイトルの Todo はこの型を経由しないと作れない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTodo {
    title: String,
    description: Option<String>,
}

impl ValidTodo {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(Self { title, description })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
