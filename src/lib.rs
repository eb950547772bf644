//! # Murder.Ai 侦探客户端 - 核心初始化模块
//!
//! 本模块负责终端客户端的完整启动流程：
//! - 初始化日志（`env_logger`，调试构建默认 info，发布构建默认 warn，可由 `RUST_LOG` 覆盖）
//! - 加载客户端配置与头像目录
//! - 创建桥接传输与游戏客户端
//! - 启动异步运行时，把标准输入的命令送入主循环
//!
//! ## 模块结构
//! - `commands/` - 终端前端（命令解析、文本呈现、配置读写）
//! - `models/` - 数据模型（线上报文、会话快照、显示事件）
//! - `services/` - 核心逻辑（桥接、证据板、工具状态机、聊天记录、运行时）
//! - `utils/` - 通用工具函数

mod commands;
pub mod models;
pub mod services;
mod utils;

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use commands::input::parse_line;
use commands::terminal::TerminalPresenter;
use services::bridge::HttpTransport;
use services::client::GameClient;
use services::runtime::{Runtime, UserCommand};

/// 命令通道容量
const COMMAND_BUFFER: usize = 32;

/// 客户端启动函数
///
/// 构建多线程 tokio 运行时并在其上运行客户端主循环，直到用户输入 `quit`
/// 或标准输入关闭。
///
/// # 错误
/// 运行时创建失败、配置文件损坏或 HTTP 客户端创建失败时返回错误信息
pub fn run() -> Result<(), String> {
    init_logging();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("创建异步运行时失败: {}", e))?;

    let result = runtime.block_on(run_client());
    // 标准输入的阻塞读取不会自行结束，不等待它
    runtime.shutdown_background();
    result
}

/// 初始化日志后端
fn init_logging() {
    let default_level = if cfg!(debug_assertions) { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

async fn run_client() -> Result<(), String> {
    let config = commands::settings::load_config().await?;
    let catalog = services::catalog::load_catalog(config.portrait_catalog.as_deref()).await;

    let transport = HttpTransport::new(
        config.bridge_url(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    log::info!("桥接端点: {}", transport.endpoint());

    let client = GameClient::new(config.timings(), catalog);
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let reader = tokio::spawn(read_commands(tx));

    println!("Connecting to the case server... (type `help` for commands)");
    let presenter = TerminalPresenter::new(std::io::stdout());
    Runtime::new(client, Arc::new(transport)).run(rx, presenter).await;

    reader.abort();
    Ok(())
}

/// 逐行读取标准输入并解析为命令
async fn read_commands(tx: mpsc::Sender<UserCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_line(&line) {
                Ok(Some(command)) => {
                    let quit = command == UserCommand::Quit;
                    if tx.send(command).await.is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => println!("! {}", message),
            },
            Ok(None) => break,
            Err(e) => {
                log::error!("读取标准输入失败: {}", e);
                break;
            }
        }
    }
}
