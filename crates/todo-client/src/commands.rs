//! 端末入力の解釈
//!
//! 一覧の番号は表示どおり 1 始まり。番号から ID への変換は現在の状態で行う。

use crate::state::{Action, ClientState};
use domain::TodoId;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  title <text>      set the new item's title
  desc <text>       set the new item's description
  add               submit the new item
  edit <n>          start editing item n
  etitle <text>     set the edited title
  edesc <text>      set the edited description
  save              submit the edit
  cancel            cancel the edit
  delete <n>        delete item n (asks first)
  refresh           reload the list
  help              show this text
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Dispatch(Action),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (type `help`)")]
    Unknown(String),

    #[error("`{0}` needs an item number")]
    MissingIndex(&'static str),

    #[error("no item numbered {0}")]
    NoSuchItem(String),
}

pub fn parse(line: &str, state: &ClientState) -> Result<Input, CommandError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let action = match command {
        "title" => Action::SetTitle(rest.to_string()),
        "desc" => Action::SetDescription(rest.to_string()),
        "add" => Action::Submit,
        "edit" => Action::BeginEdit(lookup("edit", rest, state)?),
        "etitle" => Action::SetEditTitle(rest.to_string()),
        "edesc" => Action::SetEditDescription(rest.to_string()),
        "save" => Action::SubmitEdit,
        "cancel" => Action::CancelEdit,
        "delete" => Action::RequestDelete(lookup("delete", rest, state)?),
        "refresh" => Action::Load,
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" => return Ok(Input::Quit),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Input::Dispatch(action))
}

fn lookup(command: &'static str, arg: &str, state: &ClientState) -> Result<TodoId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingIndex(command));
    }
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| state.todos.get(index))
        .map(|todo| todo.id.clone())
        .ok_or_else(|| CommandError::NoSuchItem(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::reduce;
    use chrono::Utc;
    use domain::{Todo, ValidTodo};

    fn state_with(titles: &[&str]) -> ClientState {
        let todos = titles
            .iter()
            .map(|t| Todo::create(ValidTodo::new(*t, None).unwrap(), Utc::now()))
            .collect();
        let mut state = ClientState::new();
        reduce(&mut state, Action::Loaded(Ok(todos)));
        state
    }

    #[test]
    fn text_commands_keep_the_rest_of_the_line() {
        let state = ClientState::new();
        assert_eq!(
            parse("title Buy  milk ", &state),
            Ok(Input::Dispatch(Action::SetTitle("Buy  milk".into())))
        );
        assert_eq!(
            parse("desc", &state),
            Ok(Input::Dispatch(Action::SetDescription(String::new())))
        );
        assert_eq!(parse("add", &state), Ok(Input::Dispatch(Action::Submit)));
        assert_eq!(parse("quit", &state), Ok(Input::Quit));
        assert_eq!(parse("help", &state), Ok(Input::Help));
    }

    #[test]
    fn numbers_map_to_ids_one_based() {
        let state = state_with(&["A", "B"]);
        let b = state.todos[1].id.clone();

        assert_eq!(parse("edit 2", &state), Ok(Input::Dispatch(Action::BeginEdit(b.clone()))));
        assert_eq!(parse("delete 2", &state), Ok(Input::Dispatch(Action::RequestDelete(b))));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let state = state_with(&["A"]);
        assert_eq!(parse("edit", &state), Err(CommandError::MissingIndex("edit")));
        assert_eq!(parse("edit 0", &state), Err(CommandError::NoSuchItem("0".into())));
        assert_eq!(parse("delete 2", &state), Err(CommandError::NoSuchItem("2".into())));
        assert_eq!(parse("delete x", &state), Err(CommandError::NoSuchItem("x".into())));
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert_eq!(
            parse("frobnicate", &ClientState::new()),
            Err(CommandError::Unknown("frobnicate".into()))
        );
    }
}
