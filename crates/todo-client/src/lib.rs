//! Todo クライアント
//!
//! 画面状態は [`ClientState`] ひとつにまとめ、すべての遷移を [`reduce`] で行います。
//! 副作用（HTTP 通信・削除確認・バナーのタイマー）は [`Effect`] として返し、
//! [`Store`] が実行して結果を再び [`Action`] として戻します。

pub mod commands;
pub mod gateway;
pub mod state;
pub mod store;
pub mod view;

pub use gateway::{ClientError, HttpTodoGateway, TodoGateway};
pub use state::{reduce, Action, Banner, ClientState, EditState, Effect, TodoForm, BANNER_TTL};
pub use store::{Confirm, Store, DELETE_PROMPT};
pub use view::render;
