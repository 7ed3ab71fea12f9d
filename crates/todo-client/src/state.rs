use crate::gateway::ClientError;
use domain::{Todo, TodoId, TodoInput};
use std::time::Duration;

/// 成功メッセージの表示時間
pub const BANNER_TTL: Duration = Duration::from_secs(3);

pub const MSG_FILL_BOTH: &str = "Please fill in both title and description";
pub const MSG_ADDED: &str = "Item added successfully!";
pub const MSG_UPDATED: &str = "Item updated successfully!";
pub const MSG_DELETED: &str = "Item deleted successfully!";
pub const MSG_LOAD_FAILED: &str = "Failed to load todo items";
pub const MSG_CREATE_FAILED: &str = "Failed to create todo item";
pub const MSG_UPDATE_FAILED: &str = "Failed to update todo item";
pub const MSG_DELETE_FAILED: &str = "Failed to delete todo item";

/// 入力中のタイトルと説明
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
}

impl TodoForm {
    /// タイトル・説明とも空白以外の文字を含むか
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }

    pub fn to_input(&self) -> TodoInput {
        TodoInput::new(self.title.clone(), Some(self.description.clone()))
    }
}

/// 編集中かどうか（「編集なし」を番兵値ではなく列挙で表す）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    NoEdit,
    Editing { id: TodoId, form: TodoForm },
}

impl EditState {
    pub fn editing_id(&self) -> Option<&TodoId> {
        match self {
            EditState::NoEdit => None,
            EditState::Editing { id, .. } => Some(id),
        }
    }
}

/// 一定時間で消える成功メッセージ。`token` で古いタイマーを見分ける
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub token: u64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub todos: Vec<Todo>,
    pub new_form: TodoForm,
    pub edit: EditState,
    pub message: Option<Banner>,
    pub error: Option<String>,
    next_token: u64,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_banners(&mut self) {
        self.message = None;
        self.error = None;
    }

    fn fail(&mut self, text: &str) {
        self.error = Some(text.to_string());
    }

    fn succeed(&mut self, text: &str) -> Effect {
        self.next_token += 1;
        let token = self.next_token;
        self.message = Some(Banner {
            token,
            text: text.to_string(),
        });
        Effect::ExpireBanner {
            token,
            after: BANNER_TTL,
        }
    }
}

/// 画面からの操作と、通信結果の取り込み
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 起動時の一覧取得
    Load,
    Loaded(Result<Vec<Todo>, ClientError>),

    SetTitle(String),
    SetDescription(String),
    Submit,
    Created(Result<Todo, ClientError>),

    BeginEdit(TodoId),
    SetEditTitle(String),
    SetEditDescription(String),
    SubmitEdit,
    Updated {
        id: TodoId,
        result: Result<Todo, ClientError>,
    },
    CancelEdit,

    /// 削除ボタン（確認前）
    RequestDelete(TodoId),
    /// 確認ダイアログで承認された削除
    ConfirmDelete(TodoId),
    Deleted {
        id: TodoId,
        result: Result<(), ClientError>,
    },

    BannerExpired(u64),
}

/// reducer が返す副作用の記述（実行は Store が行う）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchTodos,
    CreateTodo(TodoInput),
    UpdateTodo { id: TodoId, input: TodoInput },
    AskDeleteConfirmation(TodoId),
    DeleteTodo(TodoId),
    ExpireBanner { token: u64, after: Duration },
}

/// 状態遷移はすべてここを通る
pub fn reduce(state: &mut ClientState, action: Action) -> Vec<Effect> {
    match action {
        Action::Load => vec![Effect::FetchTodos],
        Action::Loaded(Ok(todos)) => {
            state.todos = todos;
            vec![]
        }
        Action::Loaded(Err(_)) => {
            state.fail(MSG_LOAD_FAILED);
            vec![]
        }

        Action::SetTitle(title) => {
            state.new_form.title = title;
            vec![]
        }
        Action::SetDescription(description) => {
            state.new_form.description = description;
            vec![]
        }
        Action::Submit => {
            state.clear_banners();
            if !state.new_form.is_complete() {
                state.fail(MSG_FILL_BOTH);
                return vec![];
            }
            vec![Effect::CreateTodo(state.new_form.to_input())]
        }
        Action::Created(Ok(todo)) => {
            state.todos.push(todo);
            state.new_form = TodoForm::default();
            vec![state.succeed(MSG_ADDED)]
        }
        Action::Created(Err(_)) => {
            state.fail(MSG_CREATE_FAILED);
            vec![]
        }

        Action::BeginEdit(id) => {
            if let Some(todo) = state.todos.iter().find(|t| t.id == id) {
                let form = TodoForm {
                    title: todo.title.clone(),
                    description: todo.description.clone().unwrap_or_default(),
                };
                state.edit = EditState::Editing { id, form };
            }
            vec![]
        }
        Action::SetEditTitle(title) => {
            if let EditState::Editing { form, .. } = &mut state.edit {
                form.title = title;
            }
            vec![]
        }
        Action::SetEditDescription(description) => {
            if let EditState::Editing { form, .. } = &mut state.edit {
                form.description = description;
            }
            vec![]
        }
        Action::SubmitEdit => {
            let EditState::Editing { id, form } = &state.edit else {
                return vec![];
            };
            let effect = form.is_complete().then(|| Effect::UpdateTodo {
                id: id.clone(),
                input: form.to_input(),
            });

            state.clear_banners();
            match effect {
                Some(effect) => vec![effect],
                None => {
                    state.fail(MSG_FILL_BOTH);
                    vec![]
                }
            }
        }
        Action::Updated { id, result: Ok(todo) } => {
            // サーバの返したレコードで置き換える（作成時と同じ方針）
            if let Some(slot) = state.todos.iter_mut().find(|t| t.id == id) {
                *slot = todo;
            }
            if state.edit.editing_id() == Some(&id) {
                state.edit = EditState::NoEdit;
            }
            vec![state.succeed(MSG_UPDATED)]
        }
        Action::Updated { result: Err(_), .. } => {
            // 編集状態は残し、再送かキャンセルを選べるようにする
            state.fail(MSG_UPDATE_FAILED);
            vec![]
        }
        Action::CancelEdit => {
            state.edit = EditState::NoEdit;
            state.clear_banners();
            vec![]
        }

        Action::RequestDelete(id) => vec![Effect::AskDeleteConfirmation(id)],
        Action::ConfirmDelete(id) => {
            state.clear_banners();
            vec![Effect::DeleteTodo(id)]
        }
        Action::Deleted { id, result: Ok(()) } => {
            state.todos.retain(|t| t.id != id);
            if state.edit.editing_id() == Some(&id) {
                state.edit = EditState::NoEdit;
            }
            vec![state.succeed(MSG_DELETED)]
        }
        Action::Deleted { result: Err(_), .. } => {
            state.fail(MSG_DELETE_FAILED);
            vec![]
        }

        Action::BannerExpired(token) => {
            if state.message.as_ref().map(|b| b.token) == Some(token) {
                state.message = None;
            }
            vec![]
        }
    }
}
