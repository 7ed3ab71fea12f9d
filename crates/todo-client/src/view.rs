use crate::state::{ClientState, EditState};
use std::fmt::Write;

/// 端末向けに画面全体を文字列化する
pub fn render(state: &ClientState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Personal Task List");
    let _ = writeln!(out);
    let _ = writeln!(out, "Add items");
    let _ = writeln!(out, "  title:       {}", state.new_form.title);
    let _ = writeln!(out, "  description: {}", state.new_form.description);

    if let Some(banner) = &state.message {
        let _ = writeln!(out, "[ok] {}", banner.text);
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "[error] {error}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Tasks Todo");
    if state.todos.is_empty() {
        let _ = writeln!(out, "  (no tasks)");
    }

    for (index, todo) in state.todos.iter().enumerate() {
        let number = index + 1;
        match &state.edit {
            EditState::Editing { id, form } if *id == todo.id => {
                let _ = writeln!(out, "{number:>3}. [editing]");
                let _ = writeln!(out, "     title:       {}", form.title);
                let _ = writeln!(out, "     description: {}", form.description);
            }
            _ => {
                let _ = writeln!(out, "{number:>3}. {}", todo.title);
                if let Some(description) = todo.description.as_deref().filter(|d| !d.is_empty()) {
                    let _ = writeln!(out, "     {description}");
                }
            }
        }
    }

    out
}
