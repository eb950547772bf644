//! # Murder.Ai 侦探客户端 - 入口点
//!
//! 核心逻辑位于 `lib.rs`，这里只负责调用 `app_lib::run()` 并把启动错误转换为退出码。

fn main() {
    if let Err(e) = app_lib::run() {
        eprintln!("启动失败: {}", e);
        std::process::exit(1);
    }
}
