//! reducer と副作用の実行をつなぐストア

use crate::gateway::TodoGateway;
use crate::state::{reduce, Action, ClientState, Effect};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this todo?";

/// 削除前の確認。端末では標準入力、テストでは固定値を返す
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

#[async_trait]
impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    async fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct Store<G, C> {
    state: Arc<Mutex<ClientState>>,
    gateway: G,
    confirm: C,
}

impl<G, C> Store<G, C>
where
    G: TodoGateway,
    C: Confirm,
{
    pub fn new(gateway: G, confirm: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClientState::new())),
            gateway,
            confirm,
        }
    }

    /// 現在の状態のスナップショット
    pub fn state(&self) -> ClientState {
        lock(&self.state).clone()
    }

    /// アクションを適用し、返ってきた副作用を結果が出尽くすまで実行する
    pub async fn send(&self, action: Action) {
        let mut queue = VecDeque::from([action]);

        while let Some(action) = queue.pop_front() {
            tracing::debug!(?action, "reduce");
            // ロックは reduce の間だけ保持し、通信中は手放す
            let effects = reduce(&mut lock(&self.state), action);
            for effect in effects {
                if let Some(next) = self.run(effect).await {
                    queue.push_back(next);
                }
            }
        }
    }

    async fn run(&self, effect: Effect) -> Option<Action> {
        match effect {
            Effect::FetchTodos => Some(Action::Loaded(self.gateway.list().await)),
            Effect::CreateTodo(input) => Some(Action::Created(self.gateway.create(&input).await)),
            Effect::UpdateTodo { id, input } => {
                let result = self.gateway.update(&id, &input).await;
                Some(Action::Updated { id, result })
            }
            Effect::AskDeleteConfirmation(id) => self
                .confirm
                .confirm(DELETE_PROMPT)
                .await
                .then_some(Action::ConfirmDelete(id)),
            Effect::DeleteTodo(id) => {
                let result = self.gateway.delete(&id).await;
                Some(Action::Deleted { id, result })
            }
            Effect::ExpireBanner { token, after } => {
                let state = Arc::clone(&self.state);
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    reduce(&mut lock(&state), Action::BannerExpired(token));
                });
                None
            }
        }
    }
}

fn lock(state: &Mutex<ClientState>) -> MutexGuard<'_, ClientState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
