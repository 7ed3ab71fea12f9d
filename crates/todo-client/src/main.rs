//! todo-client: 端末から API を操作する
//!
//! 1 行 1 コマンド。操作のたびに画面全体を描き直します。

use async_trait::async_trait;
use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use todo_client::commands::{self, Input, HELP};
use todo_client::{render, Action, Confirm, HttpTodoGateway, Store};
use tracing_subscriber::EnvFilter;

/// コマンド入力と削除確認で共有する標準入力
type SharedStdin = Arc<Mutex<Lines<BufReader<Stdin>>>>;

#[derive(Parser)]
#[command(name = "todo-client")]
#[command(about = "Terminal client for the personal task list API", long_about = None)]
struct Cli {
    /// Base URL of the todo API
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:8000")]
    api_url: String,
}

/// 標準入力で y/N を尋ねる
struct StdinConfirm {
    stdin: SharedStdin,
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();

        match self.stdin.lock().await.next_line().await {
            Ok(Some(answer)) => {
                matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
            }
            _ => false,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 画面を汚さないようログは stderr、既定は warn
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(api_url = %cli.api_url, "starting client");

    let stdin: SharedStdin = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let confirm = StdinConfirm {
        stdin: Arc::clone(&stdin),
    };
    let store = Store::new(HttpTodoGateway::new(cli.api_url), confirm);
    store.send(Action::Load).await;
    draw(&render(&store.state()))?;

    loop {
        // 確認プロンプトが読めるよう、1 行読んだらロックを手放す
        let next = stdin.lock().await.next_line().await?;
        let Some(line) = next else {
            break;
        };
        if line.trim().is_empty() {
            draw(&render(&store.state()))?;
            continue;
        }

        match commands::parse(&line, &store.state()) {
            Ok(Input::Dispatch(action)) => {
                store.send(action).await;
                draw(&render(&store.state()))?;
            }
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Quit) => break,
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}

fn draw(screen: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{screen}")?;
    write!(stdout, "> ")?;
    stdout.flush()
}
